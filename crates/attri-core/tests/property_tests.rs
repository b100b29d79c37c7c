//! Property-based tests for walk and pair sampling.
//!
//! Invariants checked over random graphs:
//! - Walk count and walk length bounds
//! - Walks only follow edges
//! - Positive pairs lie inside the context window
//! - Positive / negative balance per epoch
//! - Seeded determinism

use attri_core::{
    positive_pairs, FeatureGraph, GraphView, Label, NodeId, SamplerConfig, TrainingPair,
    UnsupervisedSampler,
};
use proptest::prelude::*;

prop_compose! {
    /// A graph with 2..20 nodes, random edges, and at least one edge.
    fn arb_graph()(n in 2u64..20)(
        n in Just(n),
        edges in prop::collection::vec((0..n, 0..n), 1..60),
    ) -> FeatureGraph {
        let mut graph = FeatureGraph::new(3);
        for i in 0..n {
            graph.add_node(NodeId(i), vec![i as f32, 0.5, 1.0]).unwrap();
        }
        for (a, b) in edges {
            if a != b {
                graph.add_edge(NodeId(a), NodeId(b)).unwrap();
            }
        }
        // Guarantee a non-empty negative pool.
        graph.add_edge(NodeId(0), NodeId(1)).unwrap();
        graph
    }
}

fn arb_config() -> impl Strategy<Value = SamplerConfig> {
    (1usize..8, 1usize..4, 1usize..4, any::<u64>()).prop_map(|(len, k, window, seed)| {
        SamplerConfig::default()
            .with_walk_length(len)
            .with_walks_per_node(k)
            .with_window_size(window)
            .with_seed(seed)
    })
}

/// Whether `pair` co-occurs within `window` in `walk`.
fn in_window(walk: &[NodeId], pair: &TrainingPair, window: usize) -> bool {
    walk.iter().enumerate().any(|(i, &t)| {
        t == pair.target
            && walk.iter().enumerate().any(|(j, &c)| {
                j != i && c == pair.context && i.abs_diff(j) <= window
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn walk_count_and_length(graph in arb_graph(), config in arb_config()) {
        let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), config).unwrap();
        let walks = sampler.generate_walks();

        prop_assert_eq!(walks.len(), graph.node_count() * config.walks_per_node);
        for walk in &walks {
            prop_assert!(!walk.is_empty());
            prop_assert!(walk.len() <= config.walk_length);
            // Undirected: only an isolated root stops a walk early.
            if graph.degree(walk[0]) > 0 {
                prop_assert_eq!(walk.len(), config.walk_length);
            } else {
                prop_assert_eq!(walk.len(), 1);
            }
            for step in walk.windows(2) {
                prop_assert!(graph.has_edge(step[0], step[1]));
            }
        }
    }

    #[test]
    fn positives_within_window(graph in arb_graph(), config in arb_config()) {
        let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), config).unwrap();
        let walks = sampler.generate_walks();

        // Check pairs walk by walk so each pair is matched to its own walk.
        for walk in &walks {
            for pair in positive_pairs(std::slice::from_ref(walk), config.window_size) {
                prop_assert!(in_window(walk, &pair, config.window_size));
            }
        }
    }

    #[test]
    fn balanced_epoch(graph in arb_graph(), config in arb_config(), batch in 1usize..32) {
        let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), config).unwrap();
        let Ok(mut flow) = sampler.flow(batch) else {
            // walk_length 1 gives no pairs at all.
            prop_assert_eq!(config.walk_length, 1);
            return Ok(());
        };

        let per_epoch = flow.batches_per_epoch();
        for _ in 0..2 {
            let epoch: Vec<TrainingPair> = flow.by_ref().take(per_epoch).flatten().collect();
            prop_assert_eq!(epoch.len(), flow.len());
            let positives = epoch.iter().filter(|p| p.label == Label::Positive).count();
            prop_assert_eq!(positives * 2, epoch.len());
            for pair in &epoch {
                prop_assert!(graph.contains(pair.target));
                prop_assert!(graph.contains(pair.context));
            }
        }
    }

    #[test]
    fn batch_sizes_stable_across_epochs(pool in 1usize..200, batch in 1usize..50) {
        use rand::SeedableRng;
        let pairs: Vec<TrainingPair> = (0..pool as u64)
            .map(|i| TrainingPair::positive(NodeId(i), NodeId(i)))
            .collect();
        let mut flow = attri_core::PairFlow::new(
            pairs,
            batch,
            rand_xorshift::XorShiftRng::seed_from_u64(0),
        )
        .unwrap();

        let per_epoch = flow.batches_per_epoch();
        let first: Vec<usize> = flow.by_ref().take(per_epoch).map(|b| b.len()).collect();
        let second: Vec<usize> = flow.by_ref().take(per_epoch).map(|b| b.len()).collect();

        prop_assert_eq!(first.iter().sum::<usize>(), pool);
        prop_assert_eq!(&first, &second);
        prop_assert!(first[..first.len() - 1].iter().all(|&s| s == batch));
    }

    #[test]
    fn seeded_runs_match(graph in arb_graph(), config in arb_config()) {
        let run = || {
            let mut sampler = UnsupervisedSampler::new(&graph, Vec::new(), config).unwrap();
            let walks = sampler.generate_walks();
            let pairs = sampler.extract_pairs(&walks);
            (walks, pairs)
        };
        prop_assert_eq!(run(), run());
    }
}
