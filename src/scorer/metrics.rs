use super::types::{CongestionLevel, LaneSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CongestionCounts {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Roadway-wide figures derived from lane summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficMetrics {
    pub total_vehicles: u32,
    pub avg_vehicles_per_lane: f64,
    pub congestion_counts: CongestionCounts,
    /// Lanes at `high` congestion, in the order given.
    pub critical_lanes: Vec<u32>,
}

impl TrafficMetrics {
    pub fn from_lanes(lanes: &[LaneSummary]) -> Self {
        let total_vehicles: u32 = lanes.iter().map(|l| l.vehicle_count).sum();
        let avg_vehicles_per_lane = if lanes.is_empty() {
            0.0
        } else {
            total_vehicles as f64 / lanes.len() as f64
        };

        let mut congestion_counts = CongestionCounts::default();
        let mut critical_lanes = Vec::new();
        for lane in lanes {
            match lane.congestion_level {
                CongestionLevel::High => {
                    congestion_counts.high += 1;
                    critical_lanes.push(lane.lane_number);
                }
                CongestionLevel::Medium => congestion_counts.medium += 1,
                CongestionLevel::Low => congestion_counts.low += 1,
            }
        }

        Self {
            total_vehicles,
            avg_vehicles_per_lane,
            congestion_counts,
            critical_lanes,
        }
    }
}
