//! Where detections come from. The scorer never generates its own input;
//! anything that yields lane-assigned frames can feed it.

pub mod file;
pub mod simulated;

pub use self::file::{CsvDetectionSource, JsonDetectionSource};
pub use self::simulated::SimulatedDetector;
pub use crate::scorer::types::Frame;

use crate::error::LsResult;

pub trait DetectionSource {
    /// Short label used in logs.
    fn name(&self) -> &str;

    /// Next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> LsResult<Option<Frame>>;

    /// Pulls up to `limit` frames.
    fn take_frames(&mut self, limit: usize) -> LsResult<Vec<Frame>> {
        let mut frames = Vec::with_capacity(limit.min(64));
        while frames.len() < limit {
            match self.next_frame()? {
                Some(f) => frames.push(f),
                None => break,
            }
        }
        Ok(frames)
    }
}
