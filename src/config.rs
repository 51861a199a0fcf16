use crate::error::{LaneSignalError, LsResult, ScoreError};
use crate::scorer::types::CongestionLevel;
use clap::parser::ValueSource;
use clap::{ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[command(flatten)]
    pub policy: ScoringPolicy,
    #[command(flatten)]
    pub simulation: SimulationParams,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LsResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LaneSignalError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LsResult<()> {
        self.policy.validate()?;
        self.simulation.validate()
    }

    /// Overlays only the flags the user actually typed, so values from a
    /// config file survive clap's defaults.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(policy, medium_threshold);
        update_if_present!(policy, high_threshold);
        update_if_present!(policy, weight_low);
        update_if_present!(policy, weight_medium);
        update_if_present!(policy, weight_high);

        update_if_present!(simulation, min_lanes);
        update_if_present!(simulation, max_lanes);
        update_if_present!(simulation, min_vehicles);
        update_if_present!(simulation, max_vehicles);
        update_if_present!(simulation, min_confidence);
        update_if_present!(simulation, frame_width);
        update_if_present!(simulation, frame_height);
        update_if_present!(simulation, min_box_width);
        update_if_present!(simulation, max_box_width);
        update_if_present!(simulation, min_box_height);
        update_if_present!(simulation, max_box_height);
    }
}

/// Congestion thresholds and priority weights.
///
/// A lane is `low` below `medium_threshold` vehicles, `high` from
/// `high_threshold` up, `medium` in between (inclusive of the lower bound).
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoringPolicy {
    #[arg(long, default_value_t = 5)]
    pub medium_threshold: u32,
    #[arg(long, default_value_t = 10)]
    pub high_threshold: u32,

    #[arg(long, default_value_t = 1)]
    pub weight_low: u64,
    #[arg(long, default_value_t = 2)]
    pub weight_medium: u64,
    #[arg(long, default_value_t = 3)]
    pub weight_high: u64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            medium_threshold: 5,
            high_threshold: 10,
            weight_low: 1,
            weight_medium: 2,
            weight_high: 3,
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.medium_threshold == 0 {
            return Err(ScoreError::InvalidPolicy(
                "medium_threshold must be at least 1".to_string(),
            ));
        }
        if self.medium_threshold >= self.high_threshold {
            return Err(ScoreError::InvalidPolicy(format!(
                "medium_threshold ({}) must be below high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        if self.weight_low == 0 || self.weight_medium == 0 || self.weight_high == 0 {
            return Err(ScoreError::InvalidPolicy(
                "congestion weights must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classify(&self, vehicle_count: u32) -> CongestionLevel {
        if vehicle_count < self.medium_threshold {
            CongestionLevel::Low
        } else if vehicle_count < self.high_threshold {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        }
    }

    pub fn weight(&self, level: CongestionLevel) -> u64 {
        match level {
            CongestionLevel::Low => self.weight_low,
            CongestionLevel::Medium => self.weight_medium,
            CongestionLevel::High => self.weight_high,
        }
    }
}

/// Ranges for the simulated detector. Lower bounds are inclusive, upper
/// bounds on counts are inclusive, upper bounds on reals are exclusive.
#[derive(Args, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationParams {
    #[arg(long, default_value_t = 2)]
    pub min_lanes: u32,
    #[arg(long, default_value_t = 4)]
    pub max_lanes: u32,

    #[arg(long, default_value_t = 10)]
    pub min_vehicles: u32,
    #[arg(long, default_value_t = 39)]
    pub max_vehicles: u32,

    #[arg(long, default_value_t = 0.7)]
    pub min_confidence: f32,

    // Frame and box sizes in pixels
    #[arg(long, default_value_t = 800.0)]
    pub frame_width: f32,
    #[arg(long, default_value_t = 600.0)]
    pub frame_height: f32,
    #[arg(long, default_value_t = 50.0)]
    pub min_box_width: f32,
    #[arg(long, default_value_t = 150.0)]
    pub max_box_width: f32,
    #[arg(long, default_value_t = 40.0)]
    pub min_box_height: f32,
    #[arg(long, default_value_t = 120.0)]
    pub max_box_height: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            min_lanes: 2,
            max_lanes: 4,
            min_vehicles: 10,
            max_vehicles: 39,
            min_confidence: 0.7,
            frame_width: 800.0,
            frame_height: 600.0,
            min_box_width: 50.0,
            max_box_width: 150.0,
            min_box_height: 40.0,
            max_box_height: 120.0,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> LsResult<()> {
        if self.min_lanes == 0 || self.min_lanes > self.max_lanes {
            return Err(LaneSignalError::Config(format!(
                "lane range {}..={} is invalid",
                self.min_lanes, self.max_lanes
            )));
        }
        if self.min_vehicles > self.max_vehicles {
            return Err(LaneSignalError::Config(format!(
                "vehicle range {}..={} is invalid",
                self.min_vehicles, self.max_vehicles
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(LaneSignalError::Config(format!(
                "min_confidence {} is outside [0, 1]",
                self.min_confidence
            )));
        }
        if self.frame_width <= 0.0 || self.frame_height <= 0.0 {
            return Err(LaneSignalError::Config(
                "frame dimensions must be positive".to_string(),
            ));
        }
        if self.min_box_width > self.max_box_width || self.min_box_height > self.max_box_height {
            return Err(LaneSignalError::Config(
                "box size ranges are inverted".to_string(),
            ));
        }
        Ok(())
    }
}
