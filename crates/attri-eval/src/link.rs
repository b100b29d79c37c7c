//! Link features and the end-to-end out-of-sample link prediction run.

use crate::auc::roc_auc;
use crate::split::{LabeledLink, NodeSplit, SplitConfig};
use crate::{Error, Result};
use attri_core::{FeatureGraph, GraphView, NodeId, SamplerConfig, UnsupervisedSampler};
use attri_nn::{
    fit, Attri2Vec, Attri2VecConfig, EmbeddingModel, LinkClassifier, LogisticRegression,
    LogisticRegressionConfig,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Binary operator turning two node embeddings into one link feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkOperator {
    /// `a * b`
    Hadamard,
    /// `(a + b) / 2`
    Average,
    /// `|a - b|`
    L1,
    /// `(a - b)^2`
    #[default]
    L2,
}

impl LinkOperator {
    pub fn apply(self, a: &[f32], b: &[f32]) -> Vec<f32> {
        a.iter()
            .zip(b)
            .map(|(&x, &y)| match self {
                Self::Hadamard => x * y,
                Self::Average => (x + y) / 2.0,
                Self::L1 => (x - y).abs(),
                Self::L2 => (x - y) * (x - y),
            })
            .collect()
    }
}

/// Feature rows and labels for `links`.
pub fn link_features(
    embeddings: &HashMap<NodeId, Vec<f32>>,
    links: &[LabeledLink],
    operator: LinkOperator,
) -> Result<(Vec<Vec<f32>>, Vec<f32>)> {
    let lookup = |node: NodeId| {
        embeddings
            .get(&node)
            .ok_or(Error::Model(attri_nn::Error::NodeNotFound(node)))
    };

    let mut rows = Vec::with_capacity(links.len());
    let mut labels = Vec::with_capacity(links.len());
    for link in links {
        rows.push(operator.apply(lookup(link.source)?, lookup(link.target)?));
        labels.push(link.label);
    }
    Ok((rows, labels))
}

/// Everything one evaluation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub split: SplitConfig,
    pub sampler: SamplerConfig,
    pub model: Attri2VecConfig,
    pub classifier: LogisticRegressionConfig,
    pub operator: LinkOperator,
    /// Pairs per training batch (default: 50).
    pub batch_size: usize,
    /// Passes over the pair pool (default: 4).
    pub epochs: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            split: SplitConfig::default(),
            sampler: SamplerConfig::default(),
            model: Attri2VecConfig::default(),
            classifier: LogisticRegressionConfig::default(),
            operator: LinkOperator::default(),
            batch_size: 50,
            epochs: 4,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<()> {
        self.split.validate()?;
        self.sampler.validate()?;
        self.model.validate()?;
        self.classifier.validate()?;
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be >= 1".into()));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be >= 1".into()));
        }
        Ok(())
    }
}

/// Outcome of [`evaluate_link_prediction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPredictionReport {
    /// ROC AUC on out-of-sample links.
    pub auc: f64,
    /// Accuracy at threshold 0.5 on out-of-sample links.
    pub accuracy: f64,
    pub in_sample_nodes: usize,
    pub out_of_sample_nodes: usize,
    pub train_links: usize,
    pub test_links: usize,
    /// Mean embedding loss per epoch.
    pub epoch_loss: Vec<f32>,
}

/// Train attri2vec on the in-sample graph and score links to held-out nodes.
///
/// 1. Split nodes with [`NodeSplit`].
/// 2. Sample pairs on the in-sample graph and fit [`Attri2Vec`].
/// 3. Embed every node, held-out ones included, from its features.
/// 4. Fit [`LogisticRegression`] on in-sample link features.
/// 5. Score out-of-sample links.
pub fn evaluate_link_prediction(
    graph: &FeatureGraph,
    config: &EvaluationConfig,
) -> Result<LinkPredictionReport> {
    config.validate()?;
    let split = NodeSplit::new(graph, &config.split)?;
    let train_graph = &split.in_sample_graph;

    let mut sampler = UnsupervisedSampler::new(train_graph, Vec::new(), config.sampler)?;
    let mut flow = sampler.flow(config.batch_size)?;
    let mut model = Attri2Vec::new(train_graph, config.model.clone())?;
    let history = fit(&mut model, train_graph, &mut flow, config.epochs)?;

    let nodes = graph.node_ids();
    let vectors = model.embed_nodes(graph, &nodes)?;
    let embeddings: HashMap<NodeId, Vec<f32>> = nodes.into_iter().zip(vectors).collect();

    let (train_rows, train_labels) = link_features(&embeddings, &split.train_links, config.operator)?;
    let mut classifier = LogisticRegression::new(config.classifier.clone())?;
    classifier.fit(&train_rows, &train_labels)?;

    let (test_rows, test_labels) = link_features(&embeddings, &split.test_links, config.operator)?;
    let scores = classifier.predict_proba(&test_rows)?;

    let mut positive = Vec::new();
    let mut negative = Vec::new();
    let mut correct = 0usize;
    for (&score, &label) in scores.iter().zip(&test_labels) {
        if label == 1.0 {
            positive.push(score);
        } else {
            negative.push(score);
        }
        if (score >= 0.5) == (label == 1.0) {
            correct += 1;
        }
    }

    let report = LinkPredictionReport {
        auc: roc_auc(&positive, &negative),
        accuracy: correct as f64 / test_labels.len().max(1) as f64,
        in_sample_nodes: split.in_sample.len(),
        out_of_sample_nodes: split.out_of_sample.len(),
        train_links: split.train_links.len(),
        test_links: split.test_links.len(),
        epoch_loss: history.epoch_loss,
    };
    tracing::info!(
        auc = report.auc,
        accuracy = report.accuracy,
        test_links = report.test_links,
        operator = ?config.operator,
        "out-of-sample link prediction"
    );
    Ok(report)
}
