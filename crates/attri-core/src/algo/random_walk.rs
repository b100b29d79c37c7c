//! Uniform random walks (DeepWalk style).
//!
//! Each step moves to a neighbor of the current node chosen uniformly at
//! random. A walk stops early only when it reaches a node with no neighbors,
//! so in an undirected graph only isolated roots produce short walks.
//!
//! ## Determinism under parallelism
//!
//! Walks run in parallel via rayon, but every walk gets its own generator
//! seeded from a value drawn sequentially from the caller's generator. The
//! output (root-major, then walk index) is identical to a sequential run.

use crate::{GraphView, NodeId};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Configuration for walk generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Number of nodes in each walk, root included.
    pub walk_length: usize,
    /// Walks started from each root.
    pub walks_per_node: usize,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            walk_length: 5,
            walks_per_node: 4,
            seed: 42,
        }
    }
}

/// Generate walks from every root with a fresh generator seeded by `config.seed`.
///
/// # Returns
/// `roots.len() * walks_per_node` walks, root-major.
#[must_use]
pub fn generate_walks<G>(graph: &G, roots: &[NodeId], config: WalkConfig) -> Vec<Vec<NodeId>>
where
    G: GraphView + Sync + ?Sized,
{
    let mut rng = XorShiftRng::seed_from_u64(config.seed);
    walks_from_roots(
        graph,
        roots,
        config.walk_length,
        config.walks_per_node,
        &mut rng,
    )
}

/// Generate walks, drawing one seed per walk from `rng`.
///
/// Advances `rng` by exactly `roots.len() * walks_per_node` draws.
pub fn walks_from_roots<G, R>(
    graph: &G,
    roots: &[NodeId],
    walk_length: usize,
    walks_per_node: usize,
    rng: &mut R,
) -> Vec<Vec<NodeId>>
where
    G: GraphView + Sync + ?Sized,
    R: Rng,
{
    let seeds: Vec<u64> = (0..roots.len() * walks_per_node)
        .map(|_| rng.random())
        .collect();

    seeds
        .par_iter()
        .enumerate()
        .map(|(i, &seed)| {
            let mut walk_rng = XorShiftRng::seed_from_u64(seed);
            uniform_walk(graph, roots[i / walks_per_node], walk_length, &mut walk_rng)
        })
        .collect()
}

/// A single uniform random walk of at most `walk_length` nodes.
///
/// O(d) per step for the neighbor lookup.
pub fn uniform_walk<G, R>(graph: &G, start: NodeId, walk_length: usize, rng: &mut R) -> Vec<NodeId>
where
    G: GraphView + ?Sized,
    R: Rng + ?Sized,
{
    if walk_length == 0 {
        return Vec::new();
    }

    let mut walk = Vec::with_capacity(walk_length);
    walk.push(start);

    let mut curr = start;
    for _ in 1..walk_length {
        let neighbors = graph.neighbors(curr);
        match neighbors.choose(rng) {
            Some(&next) => curr = next,
            None => break,
        }
        walk.push(curr);
    }
    walk
}
