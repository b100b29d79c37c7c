//! attri2vec: inductive node embeddings from node attributes.
//!
//! # The Core Insight
//!
//! Skip-gram learns a free vector per node, which says nothing about nodes
//! added later. attri2vec keeps skip-gram's objective but computes the target
//! vector from the node's features, so the learned map applies to any node
//! that has features.
//!
//! # Model
//!
//! ```text
//! h(v)  = σ(Wᵀ x_v)                 W: (feature_dim, embedding_dim)
//! s     = σ(h(v) · u_c)             u: one context vector per training node
//! L     = -[y log s + (1 - y) log(1 - s)]
//! ```
//!
//! Gradients (with g = s - y):
//!
//! ```text
//! ∂L/∂u_c   = g · h
//! ∂L/∂z_j   = g · u_cj · h_j (1 - h_j)     z = Wᵀ x
//! ∂L/∂W_ij  = x_i · ∂L/∂z_j
//! ```
//!
//! Updates are averaged over the minibatch and applied after the whole batch
//! is evaluated. Zero features are skipped, which keeps bag-of-words inputs
//! cheap.
//!
//! # Example
//!
//! ```rust
//! use attri_core::{FeatureGraph, NodeId, SamplerConfig, UnsupervisedSampler};
//! use attri_nn::{fit, Attri2Vec, Attri2VecConfig, EmbeddingModel};
//!
//! let graph = FeatureGraph::from_parts(
//!     3,
//!     (0..6).map(|i| (NodeId(i), vec![1.0, (i % 2) as f32, 0.5])),
//!     (0..6).map(|i| (NodeId(i), NodeId((i + 1) % 6))),
//! )
//! .unwrap();
//!
//! let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), SamplerConfig::default()).unwrap();
//! let mut flow = sampler.flow(16).unwrap();
//!
//! let mut model = Attri2Vec::new(&graph, Attri2VecConfig::default().with_embedding_dim(8)).unwrap();
//! let history = fit(&mut model, &graph, &mut flow, 2).unwrap();
//! assert_eq!(history.epoch_loss.len(), 2);
//!
//! // Unseen node: only its features are needed.
//! let emb = model.embed(&[0.0, 1.0, 1.0]).unwrap();
//! assert_eq!(emb.len(), 8);
//! ```
//!
//! # References
//!
//! - Zhang et al. (2019). "Attributed Network Embedding via Subspace Discovery."
//! - Mikolov et al. (2013). "Distributed Representations of Words and Phrases."

use crate::model::EmbeddingModel;
use crate::{Error, Result};
use attri_core::{GraphView, NodeId, TrainingPair};
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Floor inside the log of the loss.
const LOG_EPS: f32 = 1e-7;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// attri2vec configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attri2VecConfig {
    /// Embedding dimension (default: 128).
    pub embedding_dim: usize,
    /// SGD step size (default: 0.5).
    pub learning_rate: f32,
    /// L2 weight decay on the projection (default: 0.0).
    pub l2: f32,
    /// Seed for weight initialisation (default: 42).
    pub seed: u64,
}

impl Default for Attri2VecConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 128,
            learning_rate: 0.5,
            l2: 0.0,
            seed: 42,
        }
    }
}

impl Attri2VecConfig {
    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    pub fn with_learning_rate(mut self, lr: f32) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_l2(mut self, l2: f32) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(Error::InvalidConfig("embedding_dim must be >= 1".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "l2 must be >= 0, got {}",
                self.l2
            )));
        }
        Ok(())
    }
}

/// attri2vec model.
///
/// Uses two parameter blocks:
/// - `weights`: feature projection (what inference uses)
/// - `context`: one vector per training node (only used as training targets)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attri2Vec {
    config: Attri2VecConfig,
    feature_dim: usize,
    /// (feature_dim, embedding_dim), row-major
    weights: Vec<f32>,
    /// (nodes.len(), embedding_dim), row-major
    context: Vec<f32>,
    /// Owner of each context row
    nodes: Vec<NodeId>,
    #[serde(skip, default)]
    context_index: HashMap<NodeId, usize>,
}

impl Attri2Vec {
    /// Create a model with one context vector per node of `graph`.
    ///
    /// Projection weights use Glorot-uniform initialisation; context vectors
    /// start at zero.
    pub fn new<G: GraphView + ?Sized>(graph: &G, config: Attri2VecConfig) -> Result<Self> {
        config.validate()?;
        let feature_dim = graph.feature_dim();
        if feature_dim == 0 {
            return Err(Error::InvalidConfig("graph features are empty".into()));
        }
        let nodes = graph.node_ids();
        if nodes.is_empty() {
            return Err(attri_core::Error::EmptyGraph("no nodes for context vectors".into()).into());
        }

        let dim = config.embedding_dim;
        let mut rng = XorShiftRng::seed_from_u64(config.seed);
        let limit = (6.0 / (feature_dim + dim) as f32).sqrt();
        let dist = Uniform::new(-limit, limit)
            .map_err(|e| Error::InvalidConfig(format!("weight init: {e}")))?;

        let weights = (0..feature_dim * dim).map(|_| dist.sample(&mut rng)).collect();
        let context = vec![0.0; nodes.len() * dim];

        let mut model = Self {
            config,
            feature_dim,
            weights,
            context,
            nodes,
            context_index: HashMap::new(),
        };
        model.rebuild_index();
        Ok(model)
    }

    fn rebuild_index(&mut self) {
        self.context_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| (node, i))
            .collect();
    }

    /// Serialize parameters and configuration.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a model written by [`Attri2Vec::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let mut model: Self = serde_json::from_str(json)?;
        model.config.validate()?;
        let dim = model.config.embedding_dim;
        if model.weights.len() != model.feature_dim * dim {
            return Err(Error::DimensionMismatch {
                expected: model.feature_dim * dim,
                got: model.weights.len(),
            });
        }
        if model.context.len() != model.nodes.len() * dim {
            return Err(Error::DimensionMismatch {
                expected: model.nodes.len() * dim,
                got: model.context.len(),
            });
        }
        model.rebuild_index();
        Ok(model)
    }

    fn check_features(&self, features: &[f32]) -> Result<()> {
        if features.len() == self.feature_dim {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.feature_dim,
                got: features.len(),
            })
        }
    }

    /// h = σ(Wᵀ x). Caller checks the length of `x`.
    fn project(&self, x: &[f32]) -> Vec<f32> {
        let dim = self.config.embedding_dim;
        let mut z = vec![0.0f32; dim];
        for (i, &xi) in x.iter().enumerate() {
            if xi == 0.0 {
                continue;
            }
            let row = &self.weights[i * dim..(i + 1) * dim];
            for (zj, &w) in z.iter_mut().zip(row) {
                *zj += xi * w;
            }
        }
        for v in &mut z {
            *v = sigmoid(*v);
        }
        z
    }

    /// Context vector of a training node.
    pub fn context_embedding(&self, node: NodeId) -> Option<&[f32]> {
        let dim = self.config.embedding_dim;
        self.context_index
            .get(&node)
            .map(|&i| &self.context[i * dim..(i + 1) * dim])
    }

    /// Predicted probability that `context` appears in the walk context of a
    /// node with these features.
    pub fn score(&self, features: &[f32], context: NodeId) -> Result<f32> {
        self.check_features(features)?;
        let u = self
            .context_embedding(context)
            .ok_or(Error::NodeNotFound(context))?;
        let h = self.project(features);
        Ok(sigmoid(h.iter().zip(u).map(|(a, b)| a * b).sum()))
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    /// Nodes with a context vector.
    pub fn context_nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn config(&self) -> &Attri2VecConfig {
        &self.config
    }
}

impl EmbeddingModel for Attri2Vec {
    fn train_batch<G: GraphView + ?Sized>(
        &mut self,
        graph: &G,
        batch: &[TrainingPair],
    ) -> Result<f32> {
        if batch.is_empty() {
            return Ok(0.0);
        }

        let dim = self.config.embedding_dim;
        let mut grad_w = vec![0.0f32; self.weights.len()];
        let mut grad_ctx: HashMap<usize, Vec<f32>> = HashMap::new();
        let mut loss = 0.0f32;

        for pair in batch {
            let x = graph
                .features(pair.target)
                .ok_or(Error::NodeNotFound(pair.target))?;
            self.check_features(x)?;
            let c = *self
                .context_index
                .get(&pair.context)
                .ok_or(Error::NodeNotFound(pair.context))?;

            let h = self.project(x);
            let u = &self.context[c * dim..(c + 1) * dim];
            let s = sigmoid(h.iter().zip(u).map(|(a, b)| a * b).sum());
            let y = pair.label.value();
            loss -= y * s.max(LOG_EPS).ln() + (1.0 - y) * (1.0 - s).max(LOG_EPS).ln();

            let g = s - y;
            let gc = grad_ctx.entry(c).or_insert_with(|| vec![0.0; dim]);
            for j in 0..dim {
                gc[j] += g * h[j];
            }

            let dz: Vec<f32> = (0..dim).map(|j| g * u[j] * h[j] * (1.0 - h[j])).collect();
            for (i, &xi) in x.iter().enumerate() {
                if xi == 0.0 {
                    continue;
                }
                let row = &mut grad_w[i * dim..(i + 1) * dim];
                for (gw, &d) in row.iter_mut().zip(&dz) {
                    *gw += xi * d;
                }
            }
        }

        let n = batch.len() as f32;
        let step = self.config.learning_rate / n;
        let decay = self.config.learning_rate * self.config.l2;

        for (w, gw) in self.weights.iter_mut().zip(&grad_w) {
            *w -= step * gw + decay * *w;
        }
        for (c, gc) in grad_ctx {
            let row = &mut self.context[c * dim..(c + 1) * dim];
            for (u, g) in row.iter_mut().zip(gc) {
                *u -= step * g;
            }
        }

        Ok(loss / n)
    }

    fn embed(&self, features: &[f32]) -> Result<Vec<f32>> {
        self.check_features(features)?;
        Ok(self.project(features))
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }
}
