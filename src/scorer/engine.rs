use super::types::{Detection, LaneSummary};
use crate::config::ScoringPolicy;
use crate::error::ScoreError;
use crate::vehicles::VehicleTypeCounts;
use std::cmp::Ordering;

/// Rejects the whole input on the first bad lane assignment. Lanes are never
/// clamped: an out-of-range lane means the detection source is broken.
pub fn validate_input(detections: &[Detection], lane_count: u32) -> Result<(), ScoreError> {
    if lane_count < 1 {
        return Err(ScoreError::InvalidLaneCount(lane_count));
    }
    for (index, d) in detections.iter().enumerate() {
        if d.lane_number < 1 || d.lane_number > lane_count {
            return Err(ScoreError::DetectionOutOfRange {
                index,
                lane_number: d.lane_number,
                lane_count,
            });
        }
    }
    Ok(())
}

/// One summary per lane `1..=lane_count`, in lane order. Lanes nobody was
/// detected in still get an entry with a zero count.
///
/// Input must already have passed `validate_input`. Fails when a lane's
/// count times its weight does not fit in a `u64`.
pub fn aggregate_lanes(
    policy: &ScoringPolicy,
    detections: &[Detection],
    lane_count: u32,
) -> Result<Vec<LaneSummary>, ScoreError> {
    let mut per_lane: Vec<VehicleTypeCounts> = vec![VehicleTypeCounts::new(); lane_count as usize];
    for d in detections {
        let slot = &mut per_lane[(d.lane_number - 1) as usize];
        *slot.entry(d.vehicle_type).or_insert(0) += 1;
    }

    per_lane
        .into_iter()
        .enumerate()
        .map(|(i, vehicle_types)| {
            let lane_number = i as u32 + 1;
            let vehicle_count: u32 = vehicle_types.values().sum();
            let congestion_level = policy.classify(vehicle_count);
            let priority_score = (vehicle_count as u64)
                .checked_mul(policy.weight(congestion_level))
                .ok_or(ScoreError::PriorityOverflow { lane_number })?;
            Ok(LaneSummary {
                lane_number,
                vehicle_count,
                vehicle_types,
                congestion_level,
                priority_score,
            })
        })
        .collect()
}

/// Priority descending; equal priorities fall back to lane number ascending.
pub fn compare_priority(a: &LaneSummary, b: &LaneSummary) -> Ordering {
    b.priority_score
        .cmp(&a.priority_score)
        .then_with(|| a.lane_number.cmp(&b.lane_number))
}

pub fn rank_lanes(lanes: &mut [LaneSummary]) {
    lanes.sort_by(compare_priority);
}

/// Share of total priority held by the top lane, as a percentage.
///
/// Expects `lanes` ranked. An all-zero roadway scores 0.
pub fn optimization_score(lanes: &[LaneSummary]) -> Result<f64, ScoreError> {
    let total = lanes
        .iter()
        .try_fold(0u64, |acc, l| acc.checked_add(l.priority_score))
        .ok_or(ScoreError::TotalPriorityOverflow {
            lane_count: lanes.len() as u32,
        })?;
    Ok(match lanes.first() {
        Some(top) if total > 0 => (top.priority_score as f64 / total as f64 * 100.0).min(100.0),
        _ => 0.0,
    })
}
