use crate::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Identifier of a node (e.g. a paper id in a citation graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Read-only view of an attributed, undirected graph.
///
/// Samplers and models only go through this trait, so any storage that can
/// answer these questions can feed them.
pub trait GraphView {
    /// All node ids, in a stable order.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Whether the node exists.
    fn contains(&self, node: NodeId) -> bool;

    /// Neighbors of `node`. Unknown nodes have none.
    fn neighbors(&self, node: NodeId) -> Vec<NodeId>;

    /// Feature vector of `node`.
    fn features(&self, node: NodeId) -> Option<&[f32]>;

    /// Whether an undirected edge joins `a` and `b`.
    fn has_edge(&self, a: NodeId, b: NodeId) -> bool;

    /// Length of every feature vector.
    fn feature_dim(&self) -> usize;

    /// Number of neighbors of `node`.
    fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Number of nodes.
    fn node_count(&self) -> usize {
        self.node_ids().len()
    }
}

/// Summary statistics for a [`FeatureGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_count: usize,
    pub max_degree: usize,
    pub feature_dim: usize,
}

/// Undirected graph whose nodes carry fixed-length feature vectors.
///
/// Uses petgraph's `UnGraph` for adjacency. Node ids map to node indices
/// through a hash index; features are stored by node index.
///
/// # Example
///
/// ```rust
/// use attri_core::{FeatureGraph, GraphView, NodeId};
///
/// let mut graph = FeatureGraph::new(2);
/// graph.add_node(NodeId(1), vec![1.0, 0.0]).unwrap();
/// graph.add_node(NodeId(2), vec![0.0, 1.0]).unwrap();
/// graph.add_edge(NodeId(1), NodeId(2)).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.has_edge(NodeId(2), NodeId(1)));
/// ```
#[derive(Debug, Clone)]
pub struct FeatureGraph {
    graph: UnGraph<NodeId, ()>,
    node_index: HashMap<NodeId, NodeIndex>,
    /// Indexed by `NodeIndex::index()`.
    features: Vec<Vec<f32>>,
    feature_dim: usize,
}

impl FeatureGraph {
    /// Create an empty graph with the given feature dimension.
    pub fn new(feature_dim: usize) -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            node_index: HashMap::new(),
            features: Vec::new(),
            feature_dim,
        }
    }

    /// Create an empty graph with estimated capacity.
    pub fn with_capacity(feature_dim: usize, nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            node_index: HashMap::with_capacity(nodes),
            features: Vec::with_capacity(nodes),
            feature_dim,
        }
    }

    /// Build a graph from node and edge lists.
    ///
    /// Edges may only reference listed nodes; duplicate edges are ignored.
    pub fn from_parts<N, E>(feature_dim: usize, nodes: N, edges: E) -> Result<Self>
    where
        N: IntoIterator<Item = (NodeId, Vec<f32>)>,
        E: IntoIterator<Item = (NodeId, NodeId)>,
    {
        let mut graph = Self::new(feature_dim);
        for (id, features) in nodes {
            graph.add_node(id, features)?;
        }
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Add a node with its features.
    pub fn add_node(&mut self, id: NodeId, features: Vec<f32>) -> Result<()> {
        if features.len() != self.feature_dim {
            return Err(Error::DimensionMismatch {
                expected: self.feature_dim,
                got: features.len(),
            });
        }
        if self.node_index.contains_key(&id) {
            return Err(Error::InvalidParameter(format!("duplicate node {id}")));
        }

        let idx = self.graph.add_node(id);
        self.node_index.insert(id, idx);
        self.features.push(features);
        Ok(())
    }

    /// Add an undirected edge.
    ///
    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return Err(Error::InvalidParameter(format!("self-loop on node {a}")));
        }
        if self.graph.find_edge(ia, ib).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(ia, ib, ());
        Ok(true)
    }

    fn index_of(&self, id: NodeId) -> Result<NodeIndex> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(Error::NodeNotFound(id))
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges as `(a, b)` pairs, in insertion order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()]))
            .collect()
    }

    /// The graph restricted to `keep`, with every edge between kept nodes.
    pub fn induced_subgraph(&self, keep: &HashSet<NodeId>) -> Self {
        let mut sub = Self::with_capacity(self.feature_dim, keep.len(), self.edge_count());
        for idx in self.graph.node_indices() {
            let id = self.graph[idx];
            if keep.contains(&id) {
                let new_idx = sub.graph.add_node(id);
                sub.node_index.insert(id, new_idx);
                sub.features.push(self.features[idx.index()].clone());
            }
        }
        for e in self.graph.edge_references() {
            let (a, b) = (self.graph[e.source()], self.graph[e.target()]);
            if let (Some(&ia), Some(&ib)) = (sub.node_index.get(&a), sub.node_index.get(&b)) {
                sub.graph.add_edge(ia, ib, ());
            }
        }
        sub
    }

    /// Summary statistics.
    pub fn stats(&self) -> GraphStats {
        let degrees = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count());
        let (isolated_count, max_degree) =
            degrees.fold((0, 0), |(iso, max), d| (iso + usize::from(d == 0), max.max(d)));

        GraphStats {
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            isolated_count,
            max_degree,
            feature_dim: self.feature_dim,
        }
    }

    /// Access the underlying petgraph.
    pub fn as_petgraph(&self) -> &UnGraph<NodeId, ()> {
        &self.graph
    }
}

impl GraphView for FeatureGraph {
    fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_indices().map(|idx| self.graph[idx]).collect()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.node_index.contains_key(&node)
    }

    fn neighbors(&self, node: NodeId) -> Vec<NodeId> {
        match self.node_index.get(&node) {
            Some(&idx) => self.graph.neighbors(idx).map(|n| self.graph[n]).collect(),
            None => Vec::new(),
        }
    }

    fn features(&self, node: NodeId) -> Option<&[f32]> {
        self.node_index
            .get(&node)
            .map(|idx| self.features[idx.index()].as_slice())
    }

    fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        match (self.node_index.get(&a), self.node_index.get(&b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    fn degree(&self, node: NodeId) -> usize {
        self.node_index
            .get(&node)
            .map_or(0, |&idx| self.graph.neighbors(idx).count())
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
