//! Error types for attri-core.

use crate::NodeId;
use thiserror::Error;

/// Errors raised while building graphs or configuring samplers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A construction argument is out of range or inconsistent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The graph has nothing to sample from.
    #[error("empty graph: {0}")]
    EmptyGraph(String),

    /// A node id is not present in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Feature vector has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Result type alias for attri-core.
pub type Result<T> = std::result::Result<T, Error>;
