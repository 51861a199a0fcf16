pub mod engine;
pub mod metrics;
pub mod types;

pub use self::metrics::{CongestionCounts, TrafficMetrics};
pub use self::types::{
    AnalysisResult, BoundingBox, CongestionLevel, Detection, Frame, LaneSummary,
    SignalRecommendation,
};
use crate::config::ScoringPolicy;
use crate::error::ScoreError;
use crate::vehicles::count_types;
use rayon::prelude::*;

/// Turns lane-assigned detections into a ranked signal recommendation.
///
/// Holds nothing but its policy, so one instance can be shared across
/// threads and called concurrently.
#[derive(Debug, Clone, Default)]
pub struct LaneScorer {
    policy: ScoringPolicy,
}

impl LaneScorer {
    pub fn new(policy: ScoringPolicy) -> Result<Self, ScoreError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn score(
        &self,
        detections: &[Detection],
        lane_count: u32,
    ) -> Result<AnalysisResult, ScoreError> {
        engine::validate_input(detections, lane_count)?;

        let mut lane_data = engine::aggregate_lanes(&self.policy, detections, lane_count)?;
        engine::rank_lanes(&mut lane_data);

        // lane_count >= 1 was checked above, so there is always a top lane
        let recommendation = SignalRecommendation::from(&lane_data[0]);
        let optimization_score = engine::optimization_score(&lane_data)?;

        Ok(AnalysisResult {
            total_vehicles: lane_data.iter().map(|l| l.vehicle_count).sum(),
            vehicle_types: count_types(detections.iter().map(|d| &d.vehicle_type)),
            lanes_detected: lane_count,
            lane_data,
            recommendation,
            optimization_score,
        })
    }

    pub fn score_frame(&self, frame: &Frame) -> Result<AnalysisResult, ScoreError> {
        self.score(&frame.detections, frame.lane_count)
    }

    /// Scores independent frames in parallel. Results keep input order and a
    /// bad frame does not affect its neighbours.
    pub fn score_batch(&self, frames: &[Frame]) -> Vec<Result<AnalysisResult, ScoreError>> {
        frames.par_iter().map(|f| self.score_frame(f)).collect()
    }
}

/// Scores with the default thresholds (5 / 10) and weights (1 / 2 / 3).
pub fn score(detections: &[Detection], lane_count: u32) -> Result<AnalysisResult, ScoreError> {
    LaneScorer::default().score(detections, lane_count)
}
