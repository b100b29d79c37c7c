//! Inductive link prediction on a synthetic citation network.
//!
//! Papers belong to topics, cite mostly within their topic, and carry a
//! bag-of-words vector biased towards their topic's vocabulary. A fifth of the
//! papers is held out; their citations are predicted from word vectors alone.
//!
//! ```text
//! RUST_LOG=debug cargo run -p attri-eval --example citation_link_prediction
//! ```

use attri_core::{FeatureGraph, NodeId};
use attri_eval::{evaluate_link_prediction, EvaluationConfig, LinkOperator};
use attri_nn::Attri2VecConfig;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use tracing_subscriber::EnvFilter;

const TOPICS: u64 = 7;
const PAPERS_PER_TOPIC: u64 = 60;
const WORDS_PER_TOPIC: usize = 20;

fn citation_graph(seed: u64) -> Result<FeatureGraph, attri_core::Error> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    let vocab = TOPICS as usize * WORDS_PER_TOPIC;
    let papers = TOPICS * PAPERS_PER_TOPIC;
    let mut graph = FeatureGraph::with_capacity(vocab, papers as usize, papers as usize * 4);

    for paper in 0..papers {
        let topic = (paper / PAPERS_PER_TOPIC) as usize;
        let words = (0..vocab)
            .map(|w| {
                let p = if w / WORDS_PER_TOPIC == topic { 0.3 } else { 0.02 };
                if rng.random_bool(p) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        graph.add_node(NodeId(paper), words)?;
    }

    // Each paper cites a few earlier ones, mostly in its own topic.
    for paper in 1..papers {
        let topic = paper / PAPERS_PER_TOPIC;
        for _ in 0..rng.random_range(1..=4) {
            let cited = if rng.random_bool(0.85) {
                topic * PAPERS_PER_TOPIC + rng.random_range(0..PAPERS_PER_TOPIC)
            } else {
                rng.random_range(0..papers)
            };
            if cited != paper {
                graph.add_edge(NodeId(paper), NodeId(cited))?;
            }
        }
    }
    Ok(graph)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("attri_eval=info,attri_nn=info,attri_core=warn")),
        )
        .init();

    let graph = citation_graph(2019)?;
    let stats = graph.stats();
    tracing::info!(
        papers = stats.node_count,
        citations = stats.edge_count,
        isolated = stats.isolated_count,
        "citation graph built"
    );

    let base = EvaluationConfig {
        model: Attri2VecConfig::default().with_embedding_dim(64),
        ..EvaluationConfig::default()
    };

    for operator in [
        LinkOperator::Hadamard,
        LinkOperator::Average,
        LinkOperator::L1,
        LinkOperator::L2,
    ] {
        let report = evaluate_link_prediction(&graph, &EvaluationConfig { operator, ..base.clone() })?;
        println!(
            "{:<9} auc={:.3} accuracy={:.3}",
            format!("{operator:?}"),
            report.auc,
            report.accuracy
        );
    }

    let report = evaluate_link_prediction(&graph, &base)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
