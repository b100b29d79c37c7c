//! Error types for attri-nn.

use attri_core::NodeId;
use thiserror::Error;

/// attri-nn error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Graph or sampler error.
    #[error(transparent)]
    Graph(#[from] attri_core::Error),

    /// Feature or row length does not match the model.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Node has no context embedding or no features.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Invalid training or inference input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Prediction requested before fitting.
    #[error("model is not fitted")]
    NotFitted,

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
