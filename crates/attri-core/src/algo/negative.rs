//! Degree-based negative sampling distribution.
//!
//! Negative pairs contrast a target against nodes drawn from the global
//! degree distribution:
//!
//! ```text
//! P(v) = deg(v)^α / Σᵤ deg(u)^α
//! ```
//!
//! With α = 1 sampling is proportional to degree. α = 0.75 is the word2vec
//! smoothing, which under-samples hubs relative to α = 1.
//!
//! Nodes of degree zero are never in the pool, whatever α is.

use crate::{Error, GraphView, NodeId, Result};
use rand::distr::weighted::WeightedIndex;
use rand::prelude::*;

/// Sampling distribution over non-isolated nodes.
#[derive(Debug, Clone)]
pub struct DegreeDistribution {
    nodes: Vec<NodeId>,
    weights: Vec<f64>,
    total: f64,
    index: WeightedIndex<f64>,
}

impl DegreeDistribution {
    /// Build the distribution from node degrees raised to `exponent`.
    ///
    /// Fails with [`Error::EmptyGraph`] if no node has an edge, and with
    /// [`Error::InvalidParameter`] if `exponent` is negative or not finite.
    pub fn new<G: GraphView + ?Sized>(graph: &G, exponent: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "negative exponent must be finite and >= 0, got {exponent}"
            )));
        }

        let mut nodes = Vec::new();
        let mut weights = Vec::new();
        for node in graph.node_ids() {
            let degree = graph.degree(node);
            if degree > 0 {
                nodes.push(node);
                weights.push((degree as f64).powf(exponent));
            }
        }

        if nodes.is_empty() {
            return Err(Error::EmptyGraph(
                "no node has an edge; negative pool is empty".into(),
            ));
        }

        let total: f64 = weights.iter().sum();
        let index = WeightedIndex::new(&weights)
            .map_err(|e| Error::InvalidParameter(format!("degree weights: {e}")))?;

        Ok(Self {
            nodes,
            weights,
            total,
            index,
        })
    }

    /// Draw one node.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeId {
        self.nodes[self.index.sample(rng)]
    }

    /// Sampling probability of `node` (zero if it is not in the pool).
    pub fn probability(&self, node: NodeId) -> f64 {
        self.nodes
            .iter()
            .position(|&n| n == node)
            .map_or(0.0, |i| self.weights[i] / self.total)
    }

    /// Nodes eligible as negatives, in graph order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Number of eligible nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a constructed distribution.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureGraph;
    use rand_xorshift::XorShiftRng;

    /// Star: 0 is joined to 1, 2, 3; node 4 is isolated.
    fn star() -> FeatureGraph {
        FeatureGraph::from_parts(
            1,
            (0..5).map(|i| (NodeId(i), vec![0.0])),
            [(0, 1), (0, 2), (0, 3)]
                .into_iter()
                .map(|(a, b)| (NodeId(a), NodeId(b))),
        )
        .unwrap()
    }

    #[test]
    fn test_proportional_to_degree() {
        let dist = DegreeDistribution::new(&star(), 1.0).unwrap();
        assert_eq!(dist.len(), 4);
        assert!((dist.probability(NodeId(0)) - 0.5).abs() < 1e-12);
        assert!((dist.probability(NodeId(1)) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_isolated_excluded() {
        let dist = DegreeDistribution::new(&star(), 1.0).unwrap();
        assert!(!dist.nodes().contains(&NodeId(4)));
        assert_eq!(dist.probability(NodeId(4)), 0.0);

        let mut rng = XorShiftRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert_ne!(dist.sample(&mut rng), NodeId(4));
        }
    }

    #[test]
    fn test_empirical_frequency() {
        let dist = DegreeDistribution::new(&star(), 1.0).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(11);
        let n = 20_000;
        let hub = (0..n)
            .filter(|_| dist.sample(&mut rng) == NodeId(0))
            .count();
        let freq = hub as f64 / n as f64;
        assert!((freq - 0.5).abs() < 0.03, "hub frequency {freq}");
    }

    #[test]
    fn test_uniform_with_zero_exponent() {
        let dist = DegreeDistribution::new(&star(), 0.0).unwrap();
        assert!((dist.probability(NodeId(0)) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_edgeless_graph_rejected() {
        let graph = FeatureGraph::from_parts(1, [(NodeId(0), vec![0.0])], Vec::new()).unwrap();
        assert!(matches!(
            DegreeDistribution::new(&graph, 1.0),
            Err(Error::EmptyGraph(_))
        ));
    }

    #[test]
    fn test_bad_exponent() {
        assert!(matches!(
            DegreeDistribution::new(&star(), -1.0),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            DegreeDistribution::new(&star(), f64::NAN),
            Err(Error::InvalidParameter(_))
        ));
    }
}
