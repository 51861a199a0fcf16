use crate::detection::{DetectionSource, Frame};
use crate::error::{LaneSignalError, LsResult};
use crate::scorer::{AnalysisResult, Detection, LaneScorer, TrafficMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What the user handed in. Only a tag; it never changes the scoring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    Image,
    Video,
    Webcam,
}

/// A scored analysis as it is shown and stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub input_type: InputType,
    #[serde(flatten)]
    pub result: AnalysisResult,
    /// Seconds spent detecting and scoring. For batches, the per-frame average.
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detections: Vec<Detection>,
}

impl AnalysisRecord {
    fn new(input_type: InputType, result: AnalysisResult, processing_time: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            input_type,
            result,
            processing_time,
            frame_index: None,
            detections: Vec::new(),
        }
    }

    pub fn metrics(&self) -> TrafficMetrics {
        TrafficMetrics::from_lanes(&self.result.lane_data)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    pub input_type: InputType,
    /// Copy raw detections into the record.
    pub keep_detections: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            input_type: InputType::Image,
            keep_detections: false,
        }
    }
}

/// Service: score one frame.
pub fn analyze_frame(
    scorer: &LaneScorer,
    frame: Frame,
    opts: AnalyzeOptions,
) -> LsResult<AnalysisRecord> {
    let start = Instant::now();
    let result = scorer.score_frame(&frame)?;
    let elapsed = start.elapsed().as_secs_f64();

    let mut record = AnalysisRecord::new(opts.input_type, result, elapsed);
    if opts.keep_detections {
        record.detections = frame.detections;
    }
    debug!(
        "Scored frame: {} vehicles, top {}",
        record.result.total_vehicles, record.result.recommendation
    );
    Ok(record)
}

/// Service: score several frames in parallel (video). Any invalid frame
/// fails the whole batch.
pub fn analyze_frames(
    scorer: &LaneScorer,
    frames: Vec<Frame>,
    opts: AnalyzeOptions,
) -> LsResult<Vec<AnalysisRecord>> {
    if frames.is_empty() {
        return Err(LaneSignalError::Validation(
            "No frames to analyze".to_string(),
        ));
    }

    let start = Instant::now();
    let results = scorer.score_batch(&frames);
    let per_frame = start.elapsed().as_secs_f64() / frames.len() as f64;

    let mut records = Vec::with_capacity(frames.len());
    for (i, (frame, result)) in frames.into_iter().zip(results).enumerate() {
        let result = result.map_err(|e| {
            warn!("❌ Frame {} rejected: {}", i, e);
            e
        })?;
        let mut record = AnalysisRecord::new(opts.input_type, result, per_frame);
        record.frame_index = Some(i);
        if opts.keep_detections {
            record.detections = frame.detections;
        }
        records.push(record);
    }
    Ok(records)
}

/// Service: pull up to `max_frames` frames from a source and score them.
/// Processing time includes detection.
pub fn analyze_source(
    scorer: &LaneScorer,
    source: &mut dyn DetectionSource,
    max_frames: usize,
    opts: AnalyzeOptions,
) -> LsResult<Vec<AnalysisRecord>> {
    let start = Instant::now();
    let mut frames = source.take_frames(max_frames.max(1))?;
    if frames.is_empty() {
        return Err(LaneSignalError::Validation(format!(
            "Detection source '{}' produced no frames",
            source.name()
        )));
    }
    info!(
        "🔎 Analyzing {} frame(s) from '{}' source",
        frames.len(),
        source.name()
    );

    let mut records = if frames.len() == 1 {
        vec![analyze_frame(scorer, frames.remove(0), opts)?]
    } else {
        analyze_frames(scorer, frames, opts)?
    };

    let per_frame = start.elapsed().as_secs_f64() / records.len() as f64;
    for r in &mut records {
        r.processing_time = per_frame;
    }
    Ok(records)
}
