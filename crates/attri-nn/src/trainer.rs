//! Epoch-driven training over a [`PairFlow`].

use crate::model::EmbeddingModel;
use crate::{Error, Result};
use attri_core::{GraphView, PairFlow};
use serde::{Deserialize, Serialize};

/// Loss recorded during [`fit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Pair-weighted mean loss of each epoch.
    pub epoch_loss: Vec<f32>,
}

impl TrainingHistory {
    /// Loss of the last epoch, if any ran.
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_loss.last().copied()
    }
}

/// Train `model` for `epochs` full passes over `flow`.
///
/// A flow stopped mid-epoch is restarted first so every epoch sees each pair
/// exactly once.
pub fn fit<M, G>(
    model: &mut M,
    graph: &G,
    flow: &mut PairFlow,
    epochs: usize,
) -> Result<TrainingHistory>
where
    M: EmbeddingModel,
    G: GraphView + ?Sized,
{
    if epochs == 0 {
        return Err(Error::InvalidConfig("epochs must be >= 1".into()));
    }
    if !flow.at_epoch_boundary() {
        flow.restart();
    }

    let per_epoch = flow.batches_per_epoch();
    let mut history = TrainingHistory::default();

    for epoch in 0..epochs {
        let mut total = 0.0f64;
        let mut seen = 0usize;
        for batch in flow.by_ref().take(per_epoch) {
            let loss = model.train_batch(graph, &batch)?;
            total += f64::from(loss) * batch.len() as f64;
            seen += batch.len();
        }

        let mean = (total / seen.max(1) as f64) as f32;
        tracing::info!(epoch, loss = mean, pairs = seen, "epoch finished");
        history.epoch_loss.push(mean);
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use attri_core::{NodeId, TrainingPair};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    /// Records batch sizes instead of learning.
    #[derive(Default)]
    struct Recorder {
        batches: Vec<usize>,
    }

    impl EmbeddingModel for Recorder {
        fn train_batch<G: GraphView + ?Sized>(
            &mut self,
            _graph: &G,
            batch: &[TrainingPair],
        ) -> Result<f32> {
            self.batches.push(batch.len());
            Ok(batch.len() as f32)
        }

        fn embed(&self, features: &[f32]) -> Result<Vec<f32>> {
            Ok(features.to_vec())
        }

        fn embedding_dim(&self) -> usize {
            0
        }
    }

    fn flow(pool: u64, batch: usize) -> PairFlow {
        let pairs = (0..pool)
            .map(|i| TrainingPair::positive(NodeId(i), NodeId(i)))
            .collect();
        PairFlow::new(pairs, batch, XorShiftRng::seed_from_u64(0)).unwrap()
    }

    #[test]
    fn test_epochs_consume_whole_pool() {
        let graph = attri_core::FeatureGraph::new(1);
        let mut model = Recorder::default();
        let mut flow = flow(25, 10);

        let history = fit(&mut model, &graph, &mut flow, 3).unwrap();
        assert_eq!(model.batches, vec![10, 10, 5, 10, 10, 5, 10, 10, 5]);
        assert_eq!(history.epoch_loss.len(), 3);
        // (10*10 + 10*10 + 5*5) / 25
        assert!((history.final_loss().unwrap() - 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_partial_epoch_restarted() {
        let graph = attri_core::FeatureGraph::new(1);
        let mut model = Recorder::default();
        let mut flow = flow(25, 10);
        flow.next();

        fit(&mut model, &graph, &mut flow, 1).unwrap();
        assert_eq!(model.batches, vec![10, 10, 5]);
        assert_eq!(flow.epoch(), 1);
    }

    #[test]
    fn test_zero_epochs_rejected() {
        let graph = attri_core::FeatureGraph::new(1);
        let mut flow = flow(4, 2);
        assert!(matches!(
            fit(&mut Recorder::default(), &graph, &mut flow, 0),
            Err(Error::InvalidConfig(_))
        ));
    }
}
