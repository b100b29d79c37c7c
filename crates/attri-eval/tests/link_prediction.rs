//! End-to-end out-of-sample link prediction on a planted-community graph.

use attri_core::{FeatureGraph, GraphView, NodeId};
use attri_eval::{evaluate_link_prediction, EvaluationConfig, LinkOperator, NodeSplit};
use attri_nn::Attri2VecConfig;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

const COMMUNITIES: u64 = 4;
const PER_COMMUNITY: u64 = 25;
const WORDS_PER_COMMUNITY: usize = 6;

/// Dense inside communities, sparse across; each community favours its own words.
fn planted_graph(seed: u64) -> FeatureGraph {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    let vocab = COMMUNITIES as usize * WORDS_PER_COMMUNITY;
    let n = COMMUNITIES * PER_COMMUNITY;
    let mut graph = FeatureGraph::new(vocab);

    for i in 0..n {
        let community = (i / PER_COMMUNITY) as usize;
        let features = (0..vocab)
            .map(|w| {
                let own = w / WORDS_PER_COMMUNITY == community;
                let p = if own { 0.7 } else { 0.05 };
                if rng.random_bool(p) {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        graph.add_node(NodeId(i), features).unwrap();
    }

    for a in 0..n {
        for b in a + 1..n {
            let same = a / PER_COMMUNITY == b / PER_COMMUNITY;
            if rng.random_bool(if same { 0.25 } else { 0.005 }) {
                graph.add_edge(NodeId(a), NodeId(b)).unwrap();
            }
        }
    }
    graph
}

fn config() -> EvaluationConfig {
    EvaluationConfig {
        model: Attri2VecConfig::default().with_embedding_dim(32),
        epochs: 3,
        ..EvaluationConfig::default()
    }
}

#[test]
fn held_out_links_beat_chance() {
    let graph = planted_graph(7);
    let report = evaluate_link_prediction(&graph, &config()).unwrap();

    assert_eq!(report.in_sample_nodes + report.out_of_sample_nodes, graph.node_count());
    assert_eq!(report.out_of_sample_nodes, 20);
    assert_eq!(report.epoch_loss.len(), 3);
    assert!(report.test_links > 0 && report.train_links > 0);
    assert!(report.auc > 0.6, "auc {}", report.auc);
    assert!((0.0..=1.0).contains(&report.accuracy));
}

#[test]
fn every_operator_runs() {
    let graph = planted_graph(11);
    for operator in [
        LinkOperator::Hadamard,
        LinkOperator::Average,
        LinkOperator::L1,
        LinkOperator::L2,
    ] {
        let report = evaluate_link_prediction(
            &graph,
            &EvaluationConfig {
                operator,
                epochs: 1,
                ..config()
            },
        )
        .unwrap();
        assert!((0.0..=1.0).contains(&report.auc));
    }
}

#[test]
fn seeded_runs_match() {
    let graph = planted_graph(3);
    let a = evaluate_link_prediction(&graph, &config()).unwrap();
    let b = evaluate_link_prediction(&graph, &config()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn held_out_nodes_are_unseen_in_training() {
    let graph = planted_graph(5);
    let split = NodeSplit::new(&graph, &config().split).unwrap();
    for node in &split.out_of_sample {
        assert!(!split.in_sample_graph.contains(*node));
    }
}
