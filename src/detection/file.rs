use super::{DetectionSource, Frame};
use crate::error::{LaneSignalError, LsResult};
use crate::scorer::types::{BoundingBox, Detection};
use crate::vehicles::VehicleType;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A JSON detection file holds either one frame or a list of frames.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameFile {
    Many(Vec<Frame>),
    One(Frame),
}

pub fn read_json_frames<R: Read>(reader: R) -> LsResult<Vec<Frame>> {
    let parsed: FrameFile = serde_json::from_reader(reader)?;
    let frames = match parsed {
        FrameFile::Many(frames) => frames,
        FrameFile::One(frame) => vec![frame],
    };
    for frame in &frames {
        warn_on_confidence(&frame.detections);
    }
    Ok(frames)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    vehicle_type: VehicleType,
    confidence: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    lane_number: u32,
}

/// Reads one frame from CSV with header
/// `vehicle_type,confidence,x,y,width,height,lane_number`.
pub fn read_csv_frame<R: Read>(reader: R, lane_count: u32) -> LsResult<Frame> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut detections = Vec::new();
    for (row_idx, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // +2: header line, then 1-based lines
        let row = result.map_err(|e| {
            LaneSignalError::Validation(format!("CSV row {}: {}", row_idx + 2, e))
        })?;
        detections.push(Detection {
            vehicle_type: row.vehicle_type,
            confidence: row.confidence,
            bbox: BoundingBox {
                x: row.x,
                y: row.y,
                width: row.width,
                height: row.height,
            },
            lane_number: row.lane_number,
        });
    }

    warn_on_confidence(&detections);
    Ok(Frame {
        lane_count,
        detections,
    })
}

// Confidence is carried through, not scored; odd values are only worth a log line.
fn warn_on_confidence(detections: &[Detection]) {
    let odd = detections
        .iter()
        .filter(|d| !(0.0..=1.0).contains(&d.confidence))
        .count();
    if odd > 0 {
        warn!("⚠️  {} detections have confidence outside [0, 1]", odd);
    }
}

fn open(path: &Path) -> LsResult<File> {
    File::open(path).map_err(|e| {
        LaneSignalError::Config(format!(
            "Could not open detections file '{}': {}",
            path.display(),
            e
        ))
    })
}

pub struct JsonDetectionSource {
    path: PathBuf,
    pending: Option<VecDeque<Frame>>,
}

impl JsonDetectionSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            pending: None,
        }
    }
}

impl DetectionSource for JsonDetectionSource {
    fn name(&self) -> &str {
        "json"
    }

    fn next_frame(&mut self) -> LsResult<Option<Frame>> {
        if self.pending.is_none() {
            let frames = read_json_frames(open(&self.path)?)?;
            info!(
                "📂 Loaded {} frame(s) from {}",
                frames.len(),
                self.path.display()
            );
            self.pending = Some(frames.into());
        }
        Ok(self.pending.as_mut().and_then(|q| q.pop_front()))
    }
}

pub struct CsvDetectionSource {
    path: PathBuf,
    lane_count: u32,
    consumed: bool,
}

impl CsvDetectionSource {
    pub fn new<P: Into<PathBuf>>(path: P, lane_count: u32) -> Self {
        Self {
            path: path.into(),
            lane_count,
            consumed: false,
        }
    }
}

impl DetectionSource for CsvDetectionSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn next_frame(&mut self) -> LsResult<Option<Frame>> {
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;
        let frame = read_csv_frame(open(&self.path)?, self.lane_count)?;
        info!(
            "📂 Loaded {} detections from {}",
            frame.detections.len(),
            self.path.display()
        );
        Ok(Some(frame))
    }
}
