// Allow minor clippy style warnings at crate level
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

//! Attributed graphs and unsupervised pair sampling for inductive node embeddings.
//!
//! - [`FeatureGraph`] - undirected graph whose nodes carry feature vectors
//! - [`GraphView`] - the read-only graph contract samplers and models consume
//! - [`UnsupervisedSampler`] - random walks to balanced (target, context, label) pairs
//! - [`PairFlow`] - endless, epoch-shuffled batch iterator over a pair pool
//!
//! # Why attributes
//!
//! DeepWalk and node2vec learn one free vector per node, so a node that was
//! not in the training graph has no embedding. attri2vec instead learns a
//! mapping from node *features* to embeddings, trained on the same
//! walk co-occurrence signal:
//!
//! ```text
//! h(v) = σ(Wᵀ x_v)                       target embedding from features
//! P(c | v) = σ(h(v) · u_c)               context score
//! ```
//!
//! The walk and pair machinery is identical to skip-gram with negative
//! sampling; only the target side changes. Any node with features, seen or
//! unseen, can then be embedded.
//!
//! # Pipeline
//!
//! | Step | Where |
//! |------|-------|
//! | Build graph | [`FeatureGraph`] |
//! | Walks | [`algo::random_walk`] |
//! | Positive / negative pairs | [`UnsupervisedSampler`] |
//! | Batches | [`PairFlow`] |
//! | Model and training | `attri-nn` |
//! | Link prediction | `attri-eval` |
//!
//! # Example
//!
//! ```rust
//! use attri_core::{FeatureGraph, NodeId, SamplerConfig, UnsupervisedSampler};
//!
//! let graph = FeatureGraph::from_parts(
//!     2,
//!     (0..6).map(|i| (NodeId(i), vec![i as f32, 1.0])),
//!     (0..6).map(|i| (NodeId(i), NodeId((i + 1) % 6))),
//! )
//! .unwrap();
//!
//! let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), SamplerConfig::default()).unwrap();
//! let walks = sampler.generate_walks();
//! assert_eq!(walks.len(), 6 * 4);
//!
//! let pairs = sampler.extract_pairs(&walks);
//! let positives = pairs.iter().filter(|p| p.label.is_positive()).count();
//! assert_eq!(positives * 2, pairs.len());
//! ```

pub mod algo;
mod error;
mod graph;
pub mod sampler;

pub use error::{Error, Result};
pub use graph::{FeatureGraph, GraphStats, GraphView, NodeId};
pub use sampler::{positive_pairs, Label, PairFlow, SamplerConfig, TrainingPair, UnsupervisedSampler};

// Re-export petgraph for callers that want the raw adjacency
pub use petgraph;
