//! Unsupervised (target, context, label) pair sampling.
//!
//! # How pairs are made
//!
//! 1. From every root, run `walks_per_node` uniform walks of `walk_length` nodes.
//! 2. For each walk position `i` and every position `j` with
//!    `0 < |i - j| <= window_size`, emit the positive `(walk[i], walk[j], 1)`.
//! 3. For each positive, emit `(walk[i], v, 0)` with `v` drawn from the
//!    degree distribution (see [`crate::algo::negative`]).
//!
//! Positives and negatives are therefore always equal in number.
//!
//! # Batching
//!
//! [`UnsupervisedSampler::flow`] materialises the pair pool once and returns a
//! [`PairFlow`]: an endless iterator of batches. Each epoch is one shuffled
//! pass over the whole pool. The last batch of an epoch is shortened rather
//! than padded, so a pool of 25 with batch size 10 yields `[10, 10, 5]` in
//! every epoch.
//!
//! # Example
//!
//! ```rust
//! use attri_core::{FeatureGraph, NodeId, SamplerConfig, UnsupervisedSampler};
//!
//! let graph = FeatureGraph::from_parts(
//!     1,
//!     (0..4).map(|i| (NodeId(i), vec![i as f32])),
//!     (1..4).map(|i| (NodeId(i - 1), NodeId(i))),
//! )
//! .unwrap();
//!
//! let config = SamplerConfig::default().with_walk_length(3).with_window_size(1);
//! let mut sampler = UnsupervisedSampler::new(&graph, vec![NodeId(0)], config).unwrap();
//!
//! let mut flow = sampler.flow(8).unwrap();
//! let batch = flow.next().unwrap();
//! assert!(batch.len() <= 8);
//! ```

use crate::algo::negative::DegreeDistribution;
use crate::algo::random_walk::walks_from_roots;
use crate::{Error, GraphView, NodeId, Result};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

/// Sampler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Nodes per walk, root included (default: 5).
    pub walk_length: usize,
    /// Walks started from each root (default: 4).
    pub walks_per_node: usize,
    /// Context radius on each side of a target (default: 2).
    pub window_size: usize,
    /// Degree exponent of the negative distribution (default: 1.0).
    pub negative_exponent: f64,
    /// Random seed (default: 42).
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            walk_length: 5,
            walks_per_node: 4,
            window_size: 2,
            negative_exponent: 1.0,
            seed: 42,
        }
    }
}

impl SamplerConfig {
    pub fn with_walk_length(mut self, walk_length: usize) -> Self {
        self.walk_length = walk_length;
        self
    }

    pub fn with_walks_per_node(mut self, walks_per_node: usize) -> Self {
        self.walks_per_node = walks_per_node;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_negative_exponent(mut self, exponent: f64) -> Self {
        self.negative_exponent = exponent;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every count is at least one.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("walk_length", self.walk_length),
            ("walks_per_node", self.walks_per_node),
            ("window_size", self.window_size),
        ] {
            if value == 0 {
                return Err(Error::InvalidParameter(format!("{name} must be >= 1")));
            }
        }
        Ok(())
    }
}

/// Pair label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    /// 0.0 or 1.0, for loss computation.
    pub fn value(self) -> f32 {
        match self {
            Self::Negative => 0.0,
            Self::Positive => 1.0,
        }
    }

    pub fn is_positive(self) -> bool {
        self == Self::Positive
    }
}

/// A labeled (target, context) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingPair {
    pub target: NodeId,
    pub context: NodeId,
    pub label: Label,
}

impl TrainingPair {
    pub fn positive(target: NodeId, context: NodeId) -> Self {
        Self {
            target,
            context,
            label: Label::Positive,
        }
    }

    pub fn negative(target: NodeId, context: NodeId) -> Self {
        Self {
            target,
            context,
            label: Label::Negative,
        }
    }
}

/// Positive pairs from window co-occurrence, in walk order.
#[must_use]
pub fn positive_pairs(walks: &[Vec<NodeId>], window_size: usize) -> Vec<TrainingPair> {
    let mut pairs = Vec::new();
    for walk in walks {
        for (pos, &target) in walk.iter().enumerate() {
            let start = pos.saturating_sub(window_size);
            let end = (pos + window_size + 1).min(walk.len());
            for (ctx_pos, &context) in walk.iter().enumerate().take(end).skip(start) {
                if ctx_pos != pos {
                    pairs.push(TrainingPair::positive(target, context));
                }
            }
        }
    }
    pairs
}

/// Random-walk sampler producing balanced positive/negative pairs.
///
/// Owns its generator: two samplers built with the same graph, roots and
/// seed produce identical walks, pairs and batch streams.
pub struct UnsupervisedSampler<'a, G: ?Sized> {
    graph: &'a G,
    roots: Vec<NodeId>,
    config: SamplerConfig,
    negatives: DegreeDistribution,
    rng: XorShiftRng,
}

impl<'a, G: GraphView + Sync + ?Sized> UnsupervisedSampler<'a, G> {
    /// Create a sampler seeded from `config.seed`.
    ///
    /// An empty `roots` list means every node in the graph.
    pub fn new(graph: &'a G, roots: Vec<NodeId>, config: SamplerConfig) -> Result<Self> {
        let rng = XorShiftRng::seed_from_u64(config.seed);
        Self::with_rng(graph, roots, config, rng)
    }

    /// Create a sampler driven by a caller-supplied generator.
    ///
    /// `config.seed` is ignored.
    pub fn with_rng(
        graph: &'a G,
        roots: Vec<NodeId>,
        config: SamplerConfig,
        rng: XorShiftRng,
    ) -> Result<Self> {
        config.validate()?;
        if graph.node_count() == 0 {
            return Err(Error::EmptyGraph("graph has no nodes".into()));
        }

        let roots = if roots.is_empty() {
            graph.node_ids()
        } else {
            if let Some(missing) = roots.iter().find(|&&r| !graph.contains(r)) {
                return Err(Error::InvalidParameter(format!(
                    "root node {missing} is not in the graph"
                )));
            }
            roots
        };

        let negatives = DegreeDistribution::new(graph, config.negative_exponent)?;

        tracing::debug!(
            roots = roots.len(),
            negative_pool = negatives.len(),
            walk_length = config.walk_length,
            walks_per_node = config.walks_per_node,
            window_size = config.window_size,
            "unsupervised sampler ready"
        );

        Ok(Self {
            graph,
            roots,
            config,
            negatives,
            rng,
        })
    }

    /// Run `walks_per_node` walks from every root, root-major.
    pub fn generate_walks(&mut self) -> Vec<Vec<NodeId>> {
        let walks = walks_from_roots(
            self.graph,
            &self.roots,
            self.config.walk_length,
            self.config.walks_per_node,
            &mut self.rng,
        );
        tracing::trace!(walks = walks.len(), "generated walks");
        walks
    }

    /// Positives from `walks` followed by one degree-sampled negative per positive.
    pub fn extract_pairs(&mut self, walks: &[Vec<NodeId>]) -> Vec<TrainingPair> {
        let positives = positive_pairs(walks, self.config.window_size);
        let mut pairs = Vec::with_capacity(positives.len() * 2);
        pairs.extend_from_slice(&positives);
        for p in &positives {
            let context = self.negatives.sample(&mut self.rng);
            pairs.push(TrainingPair::negative(p.target, context));
        }
        pairs
    }

    /// Walk, extract, and wrap the pool into an endless batch iterator.
    ///
    /// Fails if `batch_size` is zero or if no pair could be produced (every
    /// root isolated).
    pub fn flow(&mut self, batch_size: usize) -> Result<PairFlow> {
        let walks = self.generate_walks();
        let pairs = self.extract_pairs(&walks);
        let flow_rng = XorShiftRng::seed_from_u64(self.rng.random());
        PairFlow::new(pairs, batch_size, flow_rng)
    }

    /// Roots walks start from.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// The negative sampling distribution.
    pub fn negatives(&self) -> &DegreeDistribution {
        &self.negatives
    }
}

/// Endless, epoch-shuffled stream of pair batches.
///
/// Iteration never returns `None`. Reaching the end of an epoch starts the
/// next one with a fresh shuffle; [`PairFlow::restart`] does the same on
/// demand, abandoning the rest of the current epoch.
#[derive(Debug, Clone)]
pub struct PairFlow {
    pairs: Vec<TrainingPair>,
    batch_size: usize,
    cursor: usize,
    epoch: usize,
    rng: XorShiftRng,
}

impl PairFlow {
    /// Wrap a pair pool. The first epoch is shuffled immediately.
    pub fn new(pairs: Vec<TrainingPair>, batch_size: usize, rng: XorShiftRng) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter("batch_size must be >= 1".into()));
        }
        if pairs.is_empty() {
            return Err(Error::InvalidParameter(
                "no training pairs: every root is isolated".into(),
            ));
        }

        let mut flow = Self {
            pairs,
            batch_size,
            cursor: 0,
            epoch: 0,
            rng,
        };
        flow.pairs.shuffle(&mut flow.rng);
        Ok(flow)
    }

    /// Reshuffle and start the next epoch.
    pub fn restart(&mut self) {
        self.pairs.shuffle(&mut self.rng);
        self.cursor = 0;
        self.epoch += 1;
        tracing::trace!(epoch = self.epoch, pairs = self.pairs.len(), "pair flow epoch");
    }

    /// True when the next batch starts an epoch.
    pub fn at_epoch_boundary(&self) -> bool {
        self.cursor == 0 || self.cursor >= self.pairs.len()
    }

    /// Zero-based index of the current epoch.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Batches in one epoch, the shortened last one included.
    pub fn batches_per_epoch(&self) -> usize {
        self.pairs.len().div_ceil(self.batch_size)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Pool size (pairs per epoch).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pool in current-epoch order.
    pub fn pairs(&self) -> &[TrainingPair] {
        &self.pairs
    }
}

impl Iterator for PairFlow {
    type Item = Vec<TrainingPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.pairs.len() {
            self.restart();
        }
        let end = (self.cursor + self.batch_size).min(self.pairs.len());
        let batch = self.pairs[self.cursor..end].to_vec();
        self.cursor = end;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
