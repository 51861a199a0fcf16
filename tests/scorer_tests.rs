mod common;

use common::{cars_per_lane, detection, vehicles};
use lanesignal::config::ScoringPolicy;
use lanesignal::error::ScoreError;
use lanesignal::scorer::{self, CongestionLevel, Frame, LaneScorer};
use lanesignal::vehicles::VehicleType;

#[test]
fn test_end_to_end_example() {
    let detections = vec![
        detection(VehicleType::Car, 1, 0.9),
        detection(VehicleType::Car, 1, 0.8),
        detection(VehicleType::Truck, 1, 0.75),
        detection(VehicleType::Car, 2, 0.95),
    ];
    let result = scorer::score(&detections, 2).expect("valid input");

    assert_eq!(result.total_vehicles, 4);
    assert_eq!(result.lanes_detected, 2);
    assert_eq!(result.count_of(VehicleType::Car), 3);
    assert_eq!(result.count_of(VehicleType::Truck), 1);
    assert_eq!(result.vehicle_types.len(), 2);

    let lane1 = &result.lane_data[0];
    assert_eq!(lane1.lane_number, 1);
    assert_eq!(lane1.vehicle_count, 3);
    assert_eq!(lane1.congestion_level, CongestionLevel::Low);
    assert_eq!(lane1.priority_score, 3);
    assert_eq!(lane1.vehicle_types.get(&VehicleType::Car), Some(&2));
    assert_eq!(lane1.vehicle_types.get(&VehicleType::Truck), Some(&1));

    let lane2 = &result.lane_data[1];
    assert_eq!(lane2.lane_number, 2);
    assert_eq!(lane2.vehicle_count, 1);
    assert_eq!(lane2.priority_score, 1);

    assert_eq!(result.optimization_score, 75.0);
    assert_eq!(result.recommendation.lane_number, 1);
    assert_eq!(result.recommendation.vehicle_count, 3);
    assert_eq!(result.recommendation.congestion_level, CongestionLevel::Low);
    assert_eq!(
        result.recommendation.to_string(),
        "Lane 1 (3 vehicles, low congestion)"
    );
}

#[test]
fn test_every_lane_is_reported_even_when_empty() {
    let detections = vehicles(VehicleType::Bus, 4, 2);
    let result = scorer::score(&detections, 5).unwrap();

    assert_eq!(result.lane_data.len(), 5);
    let mut lanes: Vec<u32> = result.lane_data.iter().map(|l| l.lane_number).collect();
    lanes.sort();
    assert_eq!(lanes, vec![1, 2, 3, 4, 5]);

    for n in [1, 2, 3, 5] {
        let lane = result.lane(n).unwrap();
        assert_eq!(lane.vehicle_count, 0);
        assert!(lane.vehicle_types.is_empty());
        assert_eq!(lane.priority_score, 0);
    }
    assert_eq!(result.top_lane().unwrap().lane_number, 4);
    assert_eq!(result.optimization_score, 100.0);
}

#[test]
fn test_no_detections_scores_zero() {
    let result = scorer::score(&[], 3).unwrap();

    assert_eq!(result.total_vehicles, 0);
    assert!(result.vehicle_types.is_empty());
    assert_eq!(result.lane_data.len(), 3);
    assert_eq!(result.optimization_score, 0.0);
    assert!(!result.optimization_score.is_nan());
    // All tied at zero: lowest lane number wins.
    assert_eq!(result.recommendation.lane_number, 1);
    assert_eq!(result.recommendation.vehicle_count, 0);
}

#[test]
fn test_ties_rank_by_lane_number() {
    // Sorting on priority alone leaves tie order to the sort
    // implementation; ties are explicitly broken by ascending lane number.
    let detections = cars_per_lane(&[2, 3, 3, 1, 3]);
    let result = scorer::score(&detections, 5).unwrap();

    let order: Vec<u32> = result.lane_data.iter().map(|l| l.lane_number).collect();
    assert_eq!(order, vec![2, 3, 5, 1, 4]);
    assert_eq!(result.recommendation.lane_number, 2);
}

#[test]
fn test_ties_ignore_detection_order() {
    let mut detections = cars_per_lane(&[4, 4]);
    detections.reverse();
    let result = scorer::score(&detections, 2).unwrap();
    assert_eq!(result.lane_data[0].lane_number, 1);
    assert_eq!(result.optimization_score, 50.0);
}

#[test]
fn test_congestion_weights_drive_ranking() {
    // lane1: 10 -> high (30), lane2: 9 -> medium (18), lane3: 4 -> low (4)
    let detections = cars_per_lane(&[10, 9, 4]);
    let result = scorer::score(&detections, 3).unwrap();

    let lane1 = result.lane(1).unwrap();
    assert_eq!(lane1.congestion_level, CongestionLevel::High);
    assert_eq!(lane1.priority_score, 30);
    assert_eq!(result.lane(2).unwrap().priority_score, 18);
    assert_eq!(result.lane(3).unwrap().priority_score, 4);

    let expected = 30.0 / 52.0 * 100.0;
    assert!((result.optimization_score - expected).abs() < 1e-9);
}

#[test]
fn test_lane_zero_is_rejected() {
    let mut detections = cars_per_lane(&[2, 2]);
    detections.push(detection(VehicleType::Car, 0, 0.9));
    let err = scorer::score(&detections, 2).unwrap_err();
    assert_eq!(
        err,
        ScoreError::DetectionOutOfRange {
            index: 4,
            lane_number: 0,
            lane_count: 2
        }
    );
}

#[test]
fn test_lane_past_count_is_rejected() {
    let detections = vec![detection(VehicleType::Bicycle, 3, 0.9)];
    let err = scorer::score(&detections, 2).unwrap_err();
    assert!(matches!(
        err,
        ScoreError::DetectionOutOfRange { lane_number: 3, .. }
    ));
}

#[test]
fn test_zero_lanes_is_rejected() {
    assert_eq!(
        scorer::score(&[], 0).unwrap_err(),
        ScoreError::InvalidLaneCount(0)
    );
}

#[test]
fn test_conservation_of_vehicles() {
    let mut detections = cars_per_lane(&[3, 0, 7, 12]);
    detections.extend(vehicles(VehicleType::Motorcycle, 2, 5));
    let result = scorer::score(&detections, 4).unwrap();

    let lane_sum: u32 = result.lane_data.iter().map(|l| l.vehicle_count).sum();
    let type_sum: u32 = result.vehicle_types.values().sum();
    assert_eq!(lane_sum, detections.len() as u32);
    assert_eq!(result.total_vehicles, detections.len() as u32);
    assert_eq!(type_sum, detections.len() as u32);
}

#[test]
fn test_custom_policy() {
    let policy = ScoringPolicy {
        medium_threshold: 2,
        high_threshold: 4,
        weight_low: 1,
        weight_medium: 5,
        weight_high: 10,
    };
    let scorer = LaneScorer::new(policy).unwrap();
    let result = scorer.score(&cars_per_lane(&[1, 3, 4]), 3).unwrap();

    assert_eq!(result.lane(1).unwrap().priority_score, 1);
    assert_eq!(result.lane(2).unwrap().priority_score, 15);
    assert_eq!(result.lane(3).unwrap().priority_score, 40);
    assert_eq!(result.recommendation.lane_number, 3);
}

#[test]
fn test_invalid_policy_is_rejected() {
    let policy = ScoringPolicy {
        medium_threshold: 10,
        high_threshold: 5,
        ..Default::default()
    };
    assert!(matches!(
        LaneScorer::new(policy),
        Err(ScoreError::InvalidPolicy(_))
    ));
}

#[test]
fn test_batch_matches_sequential() {
    let frames: Vec<Frame> = (1..=20u32)
        .map(|i| Frame {
            lane_count: 3,
            detections: cars_per_lane(&[i as usize % 7, (i as usize * 3) % 11, 2]),
        })
        .collect();
    let scorer = LaneScorer::default();

    let batch = scorer.score_batch(&frames);
    assert_eq!(batch.len(), frames.len());
    for (frame, result) in frames.iter().zip(batch) {
        assert_eq!(result.unwrap(), scorer.score_frame(frame).unwrap());
    }
}

#[test]
fn test_batch_isolates_bad_frames() {
    let frames = vec![
        Frame {
            lane_count: 2,
            detections: cars_per_lane(&[1, 1]),
        },
        Frame {
            lane_count: 1,
            detections: cars_per_lane(&[1, 1]),
        },
        Frame {
            lane_count: 2,
            detections: vec![],
        },
    ];
    let results = LaneScorer::default().score_batch(&frames);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}

#[test]
fn test_confidence_and_bbox_do_not_affect_scoring() {
    let a = vec![detection(VehicleType::Car, 1, 0.1)];
    let b = vec![detection(VehicleType::Car, 1, 0.99).with_bbox([500.0, 1.0, 2.0, 3.0].into())];
    assert_eq!(scorer::score(&a, 1).unwrap(), scorer::score(&b, 1).unwrap());
}
