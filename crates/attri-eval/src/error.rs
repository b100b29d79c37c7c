//! Error types for attri-eval.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Graph(#[from] attri_core::Error),

    #[error(transparent)]
    Model(#[from] attri_nn::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The split left no links to train or test on.
    #[error("insufficient links: {0}")]
    InsufficientLinks(String),
}

pub type Result<T> = std::result::Result<T, Error>;
