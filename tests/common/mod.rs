#![allow(dead_code)]

use lanesignal::scorer::{BoundingBox, Detection};
use lanesignal::vehicles::VehicleType;

/// `n` detections of `vehicle_type` in `lane`.
pub fn vehicles(vehicle_type: VehicleType, lane: u32, n: usize) -> Vec<Detection> {
    (0..n).map(|_| Detection::new(vehicle_type, lane)).collect()
}

/// Lane counts in lane order -> one car per vehicle.
pub fn cars_per_lane(counts: &[usize]) -> Vec<Detection> {
    counts
        .iter()
        .enumerate()
        .flat_map(|(i, &n)| vehicles(VehicleType::Car, i as u32 + 1, n))
        .collect()
}

pub fn detection(vehicle_type: VehicleType, lane: u32, confidence: f32) -> Detection {
    Detection::new(vehicle_type, lane)
        .with_confidence(confidence)
        .with_bbox(BoundingBox {
            x: 10.0,
            y: 20.0,
            width: 60.0,
            height: 45.0,
        })
}
