use thiserror::Error;

/// Precondition violations raised by the lane scorer. None of these carry a
/// partial result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Invalid lane count: {0} (at least one lane is required)")]
    InvalidLaneCount(u32),

    #[error(
        "Detection #{index} is assigned to lane {lane_number}, outside the valid range 1..={lane_count}"
    )]
    DetectionOutOfRange {
        index: usize,
        lane_number: u32,
        lane_count: u32,
    },

    #[error("Invalid scoring policy: {0}")]
    InvalidPolicy(String),

    #[error("Priority score of lane {lane_number} overflows with the configured weights")]
    PriorityOverflow { lane_number: u32 },

    #[error("Total priority across {lane_count} lanes overflows with the configured weights")]
    TotalPriorityOverflow { lane_count: u32 },
}

#[derive(Error, Debug)]
pub enum LaneSignalError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scoring Error: {0}")]
    Score(#[from] ScoreError),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Not Found: {0}")]
    NotFound(String),
}

pub type LsResult<T> = Result<T, LaneSignalError>;
