#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

//! Inductive node embeddings trained from sampled walk pairs.
//!
//! - [`Attri2Vec`] - features to embedding via a single sigmoid projection
//! - [`fit`] - epoch loop over an [`attri_core::PairFlow`]
//! - [`LogisticRegression`] - downstream link classifier
//!
//! Models implement [`EmbeddingModel`]; classifiers implement [`LinkClassifier`].

mod attri2vec;
mod classifier;
mod error;
mod model;
mod trainer;

pub use attri2vec::{Attri2Vec, Attri2VecConfig};
pub use classifier::{LinkClassifier, LogisticRegression, LogisticRegressionConfig};
pub use error::{Error, Result};
pub use model::EmbeddingModel;
pub use trainer::{fit, TrainingHistory};
