//! Error types for MDP decoration

use thiserror::Error;

/// Core error type for decoration operations
#[derive(Error, Debug)]
pub enum WrapError {
    /// A stage targets an observation slot the state does not have
    #[error("Slot out of range: index {index}, state has {len} inputs")]
    SlotOutOfRange { index: usize, len: usize },

    /// A transform received a tensor of unsupported rank
    #[error("Rank mismatch in {transform}: expected {expected}, got {actual}")]
    RankMismatch {
        transform: &'static str,
        expected: String,
        actual: usize,
    },

    /// A transform was configured with an unusable parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// More than one stacking stage targets the same slot
    #[error("Slot {index} is already stacked by an earlier stage")]
    DuplicateStack { index: usize },

    /// Array shape error
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Failure reported by the image resampling backend
    #[error("Resize error: {0}")]
    Resize(String),

    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for decoration operations
pub type Result<T> = std::result::Result<T, WrapError>;
