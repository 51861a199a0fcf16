use crate::vehicles::{VehicleType, VehicleTypeCounts};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

/// Pixel-space box in the source image. Serialized as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [f32; 4]) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x, b.y, b.width, b.height]
    }
}

/// One recognized vehicle. `confidence` and `bbox` are carried through
/// untouched; only `vehicle_type` and `lane_number` feed the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub vehicle_type: VehicleType,
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// 1-based lane index.
    pub lane_number: u32,
}

impl Detection {
    pub fn new(vehicle_type: VehicleType, lane_number: u32) -> Self {
        Self {
            vehicle_type,
            confidence: 1.0,
            bbox: BoundingBox::default(),
            lane_number,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneSummary {
    pub lane_number: u32,
    pub vehicle_count: u32,
    pub vehicle_types: VehicleTypeCounts,
    pub congestion_level: CongestionLevel,
    pub priority_score: u64,
}

/// The lane that should get the green signal.
///
/// Kept structured so callers choose the wording; `Display` renders the
/// classic `Lane 2 (7 vehicles, medium congestion)` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalRecommendation {
    pub lane_number: u32,
    pub vehicle_count: u32,
    pub congestion_level: CongestionLevel,
}

impl fmt::Display for SignalRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lane {} ({} vehicles, {} congestion)",
            self.lane_number, self.vehicle_count, self.congestion_level
        )
    }
}

impl From<&LaneSummary> for SignalRecommendation {
    fn from(lane: &LaneSummary) -> Self {
        Self {
            lane_number: lane.lane_number,
            vehicle_count: lane.vehicle_count,
            congestion_level: lane.congestion_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_vehicles: u32,
    pub vehicle_types: VehicleTypeCounts,
    pub lanes_detected: u32,
    /// Ranked: priority descending, then lane number ascending.
    pub lane_data: Vec<LaneSummary>,
    #[serde(rename = "signal_recommendation")]
    pub recommendation: SignalRecommendation,
    pub optimization_score: f64,
}

impl AnalysisResult {
    pub fn top_lane(&self) -> Option<&LaneSummary> {
        self.lane_data.first()
    }

    pub fn lane(&self, lane_number: u32) -> Option<&LaneSummary> {
        self.lane_data.iter().find(|l| l.lane_number == lane_number)
    }

    pub fn count_of(&self, vehicle_type: VehicleType) -> u32 {
        self.vehicle_types.get(&vehicle_type).copied().unwrap_or(0)
    }
}

/// A full set of detections for one image or video frame, plus the number
/// of lanes the source divided the roadway into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub lane_count: u32,
    pub detections: Vec<Detection>,
}
