//! Embedding model contract.

use crate::Result;
use attri_core::{GraphView, NodeId, TrainingPair};

/// A trainable node embedding model fed by labeled pairs.
///
/// Training looks up target features through the graph; inference only needs
/// a feature vector, so inductive models can embed nodes never seen in training.
pub trait EmbeddingModel {
    /// One optimisation step on `batch`. Returns the mean loss of the batch.
    fn train_batch<G: GraphView + ?Sized>(&mut self, graph: &G, batch: &[TrainingPair])
        -> Result<f32>;

    /// Embed a single feature vector.
    fn embed(&self, features: &[f32]) -> Result<Vec<f32>>;

    /// Output dimension.
    fn embedding_dim(&self) -> usize;

    /// Embed graph nodes by looking up their features.
    fn embed_nodes<G: GraphView + ?Sized>(&self, graph: &G, nodes: &[NodeId]) -> Result<Vec<Vec<f32>>> {
        nodes
            .iter()
            .map(|&node| {
                let features = graph
                    .features(node)
                    .ok_or(crate::Error::NodeNotFound(node))?;
                self.embed(features)
            })
            .collect()
    }
}
