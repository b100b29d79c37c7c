#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]

//! Out-of-sample link prediction for attri2vec embeddings.
//!
//! Holds out a share of nodes, trains on the rest, then asks whether links
//! to the held-out nodes can be predicted from feature-only embeddings.
//!
//! ```rust,no_run
//! use attri_core::FeatureGraph;
//! use attri_eval::{evaluate_link_prediction, EvaluationConfig};
//!
//! # fn load() -> FeatureGraph { FeatureGraph::new(1) }
//! let graph: FeatureGraph = load();
//! let report = evaluate_link_prediction(&graph, &EvaluationConfig::default()).unwrap();
//! println!("AUC {:.3}", report.auc);
//! ```

mod auc;
mod error;
mod link;
mod split;

pub use auc::roc_auc;
pub use error::{Error, Result};
pub use link::{
    evaluate_link_prediction, link_features, EvaluationConfig, LinkOperator, LinkPredictionReport,
};
pub use split::{LabeledLink, NodeSplit, SplitConfig};
