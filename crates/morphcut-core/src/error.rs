//! Error types for MorphCut.

use thiserror::Error;

/// Main error type for MorphCut operations.
#[derive(Error, Debug)]
pub enum MorphcutError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown effect: {0}")]
    NotFound(String),

    #[error("effect already registered: {0}")]
    DuplicateName(String),

    #[error("invalid parameter: {0}")]
    Validation(String),

    #[error("frame dimension mismatch: {expected_width}x{expected_height} vs {actual_width}x{actual_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("job cancelled")]
    Cancelled,

    #[error("batch failed at pair {pair}: {reason}")]
    Batch { pair: usize, reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for MorphCut operations.
pub type Result<T> = std::result::Result<T, MorphcutError>;
