//! Inductive node split for out-of-sample link prediction.
//!
//! A fraction of nodes is held out. The embedding model trains on the graph
//! induced by the remaining (in-sample) nodes, and is then judged on links
//! that touch a held-out node, which it never saw during training.

use crate::{Error, Result};
use attri_core::{FeatureGraph, GraphView, NodeId};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Node split settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Share of nodes held out of training (default: 0.2).
    pub out_of_sample_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            out_of_sample_fraction: 0.2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    pub fn with_out_of_sample_fraction(mut self, fraction: f64) -> Self {
        self.out_of_sample_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let f = self.out_of_sample_fraction;
        if !(f.is_finite() && f > 0.0 && f < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "out_of_sample_fraction must be in (0, 1), got {f}"
            )));
        }
        Ok(())
    }
}

/// A node pair with a 0/1 edge label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledLink {
    pub source: NodeId,
    pub target: NodeId,
    pub label: f32,
}

impl LabeledLink {
    fn edge(source: NodeId, target: NodeId) -> Self {
        Self { source, target, label: 1.0 }
    }

    fn non_edge(source: NodeId, target: NodeId) -> Self {
        Self { source, target, label: 0.0 }
    }
}

/// Result of splitting a graph into in-sample and out-of-sample nodes.
#[derive(Debug, Clone)]
pub struct NodeSplit {
    pub in_sample: Vec<NodeId>,
    pub out_of_sample: Vec<NodeId>,
    /// Graph induced by the in-sample nodes.
    pub in_sample_graph: FeatureGraph,
    /// In-sample edges plus as many in-sample non-edges.
    pub train_links: Vec<LabeledLink>,
    /// Edges touching an out-of-sample node plus as many such non-edges.
    pub test_links: Vec<LabeledLink>,
}

impl NodeSplit {
    pub fn new(graph: &FeatureGraph, config: &SplitConfig) -> Result<Self> {
        config.validate()?;
        let mut nodes = graph.node_ids();
        if nodes.len() < 2 {
            return Err(Error::InsufficientLinks(format!(
                "need at least 2 nodes to split, got {}",
                nodes.len()
            )));
        }

        let mut rng = XorShiftRng::seed_from_u64(config.seed);
        nodes.sort_unstable();
        nodes.shuffle(&mut rng);

        let held_out = ((nodes.len() as f64 * config.out_of_sample_fraction).round() as usize)
            .clamp(1, nodes.len() - 1);
        let in_sample = nodes.split_off(held_out);
        let out_of_sample = nodes;

        let keep: HashSet<NodeId> = in_sample.iter().copied().collect();
        let in_sample_graph = graph.induced_subgraph(&keep);

        let mut train_links: Vec<LabeledLink> = in_sample_graph
            .edges()
            .into_iter()
            .map(|(a, b)| LabeledLink::edge(a, b))
            .collect();
        if train_links.is_empty() {
            return Err(Error::InsufficientLinks("no edges among in-sample nodes".into()));
        }
        let wanted = train_links.len();
        train_links.extend(sample_non_edges(graph, &in_sample, &in_sample, wanted, &mut rng));

        let mut test_links: Vec<LabeledLink> = graph
            .edges()
            .into_iter()
            .filter(|(a, b)| !keep.contains(a) || !keep.contains(b))
            .map(|(a, b)| LabeledLink::edge(a, b))
            .collect();
        if test_links.is_empty() {
            return Err(Error::InsufficientLinks(
                "no edges touch an out-of-sample node".into(),
            ));
        }
        let wanted = test_links.len();
        let all_nodes = graph.node_ids();
        test_links.extend(sample_non_edges(graph, &out_of_sample, &all_nodes, wanted, &mut rng));

        tracing::debug!(
            in_sample = in_sample.len(),
            out_of_sample = out_of_sample.len(),
            train_links = train_links.len(),
            test_links = test_links.len(),
            "node split"
        );

        Ok(Self {
            in_sample,
            out_of_sample,
            in_sample_graph,
            train_links,
            test_links,
        })
    }
}

/// Up to `count` distinct non-adjacent pairs `(a, b)` with `a` from `sources`.
///
/// Gives up after a bounded number of draws on dense graphs.
fn sample_non_edges<R: Rng>(
    graph: &FeatureGraph,
    sources: &[NodeId],
    targets: &[NodeId],
    count: usize,
    rng: &mut R,
) -> Vec<LabeledLink> {
    let mut seen = HashSet::with_capacity(count);
    let mut links = Vec::with_capacity(count);
    let max_draws = count.saturating_mul(50).max(1000);

    for _ in 0..max_draws {
        if links.len() == count {
            break;
        }
        let (Some(&a), Some(&b)) = (sources.choose(rng), targets.choose(rng)) else {
            break;
        };
        if a == b || graph.has_edge(a, b) {
            continue;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if seen.insert(key) {
            links.push(LabeledLink::non_edge(a, b));
        }
    }

    if links.len() < count {
        tracing::warn!(wanted = count, found = links.len(), "graph too dense for requested non-edges");
    }
    links
}
