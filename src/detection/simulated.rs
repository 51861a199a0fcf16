use super::{DetectionSource, Frame};
use crate::config::SimulationParams;
use crate::error::{LaneSignalError, LsResult};
use crate::scorer::types::{BoundingBox, Detection};
use crate::vehicles::VehicleType;
use tracing::debug;

/// Stand-in for a real detector: uniformly random vehicles spread over a
/// random number of lanes. Seeded instances are fully reproducible.
pub struct SimulatedDetector {
    params: SimulationParams,
    fixed_lanes: Option<u32>,
    vehicle_types: Vec<VehicleType>,
    rng: fastrand::Rng,
}

impl SimulatedDetector {
    pub fn new(params: SimulationParams, seed: Option<u64>) -> LsResult<Self> {
        params.validate()?;
        let rng = match seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        Ok(Self {
            params,
            fixed_lanes: None,
            vehicle_types: VehicleType::all(),
            rng,
        })
    }

    /// Pins every frame to `lanes` lanes instead of drawing a lane count.
    pub fn with_lane_count(mut self, lanes: u32) -> LsResult<Self> {
        if lanes == 0 {
            return Err(LaneSignalError::Config(
                "simulated lane count must be at least 1".to_string(),
            ));
        }
        self.fixed_lanes = Some(lanes);
        Ok(self)
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.rng.f32() * (max - min)
    }

    pub fn generate(&mut self) -> Frame {
        let p = self.params.clone();
        let lane_count = match self.fixed_lanes {
            Some(n) => n,
            None => self.rng.u32(p.min_lanes..=p.max_lanes),
        };
        let vehicle_count = self.rng.u32(p.min_vehicles..=p.max_vehicles);

        let detections = (0..vehicle_count)
            .map(|_| {
                let type_idx = self.rng.usize(..self.vehicle_types.len());
                let vehicle_type = self.vehicle_types[type_idx];
                let confidence = self.range_f32(p.min_confidence, 1.0);
                let bbox = BoundingBox {
                    x: self.range_f32(0.0, p.frame_width),
                    y: self.range_f32(0.0, p.frame_height),
                    width: self.range_f32(p.min_box_width, p.max_box_width),
                    height: self.range_f32(p.min_box_height, p.max_box_height),
                };
                Detection {
                    vehicle_type,
                    confidence,
                    bbox,
                    lane_number: self.rng.u32(1..=lane_count),
                }
            })
            .collect();

        debug!(
            "Simulated frame: {} vehicles over {} lanes",
            vehicle_count, lane_count
        );
        Frame {
            lane_count,
            detections,
        }
    }
}

impl DetectionSource for SimulatedDetector {
    fn name(&self) -> &str {
        "simulated"
    }

    fn next_frame(&mut self) -> LsResult<Option<Frame>> {
        Ok(Some(self.generate()))
    }
}
