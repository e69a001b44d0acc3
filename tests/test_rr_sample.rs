/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use dsi_progress_logger::no_logging;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rrsets::prelude::*;

/// The graph of spec fame: arcs 0 -> 1, 1 -> 2, 0 -> 2.
fn toy_graph() -> Digraph {
    Digraph::from_arcs(3, [(0, 1), (1, 2), (0, 2)])
}

/// Backward reachability computed by a plain BFS on the transpose.
fn backward_reachable(graph: &Digraph, root: usize) -> Vec<usize> {
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        for &pred in graph.transpose().successors(node) {
            if visited.insert(pred) {
                queue.push_back(pred);
            }
        }
    }
    let mut reachable = visited.into_iter().collect::<Vec<_>>();
    reachable.sort_unstable();
    reachable
}

#[test]
fn test_certain_propagation_on_toy_graph() {
    let graph = toy_graph();
    let mut sampler = RrSampler::new(&graph, PropagationModel::IndependentCascade(1.0));
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..200 {
        let rr_set = sampler.sample_one(&mut rng);
        let root = rr_set.vertices[0];
        let mut vertices = rr_set.vertices.to_vec();
        vertices.sort_unstable();
        match root {
            // 0 has no predecessors: the set is just the root.
            0 => {
                assert_eq!(vertices, [0]);
                assert_eq!(rr_set.width, 0);
            }
            1 => {
                assert_eq!(vertices, [0, 1]);
                assert_eq!(rr_set.width, 1);
            }
            // Expanding 2 examines both predecessors; 0 is then enqueued
            // twice (once from 2, once from 1) but counted once, and the
            // arc 0 -> 2 examined while expanding 1 adds one to the width.
            2 => {
                assert_eq!(vertices, [0, 1, 2]);
                assert_eq!(rr_set.width, 3);
            }
            _ => unreachable!(),
        }
    }
}

#[test]
fn test_certain_propagation_equals_backward_reachability() {
    // A pseudorandom graph dense enough to have nontrivial backward cones.
    let mut rng = SmallRng::seed_from_u64(7);
    let n = 40;
    let mut arcs = Vec::new();
    for src in 0..n {
        for dst in 0..n {
            if src != dst && rng.random::<f64>() < 0.05 {
                arcs.push((src, dst));
            }
        }
    }
    let graph = Digraph::from_arcs(n, arcs);

    let mut sampler = RrSampler::new(&graph, PropagationModel::IndependentCascade(1.0));
    for _ in 0..200 {
        let rr_set = sampler.sample_one(&mut rng);
        let root = rr_set.vertices[0];
        let mut vertices = rr_set.vertices.to_vec();
        vertices.sort_unstable();
        assert_eq!(vertices, backward_reachable(&graph, root));
    }
}

#[test]
fn test_root_membership_and_uniqueness() {
    // Node 3 is isolated: draws rooted there must still return {3}.
    let graph = Digraph::from_arcs(4, [(0, 1), (1, 2), (2, 0)]);
    let mut sampler = RrSampler::new(&graph, PropagationModel::WeightedCascade);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut roots_seen = HashSet::new();
    for _ in 0..500 {
        let rr_set = sampler.sample_one(&mut rng);
        assert!(!rr_set.vertices.is_empty());
        let root = rr_set.vertices[0];
        roots_seen.insert(root);
        let unique = rr_set.vertices.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), rr_set.vertices.len());
        if root == 3 {
            assert_eq!(rr_set.vertices, [3]);
            assert_eq!(rr_set.width, 0);
        }
    }
    assert_eq!(roots_seen.len(), 4);
}

#[test]
fn test_zero_probability_yields_root_only() {
    let graph = toy_graph();
    // Zero is rejected by the drivers, but the traversal itself is total on
    // [0, 1]: no arc can be retained, so every set is just its root.
    let mut sampler = RrSampler::new(&graph, PropagationModel::IndependentCascade(0.0));
    let mut rng = SmallRng::seed_from_u64(2);
    for _ in 0..100 {
        let rr_set = sampler.sample_one(&mut rng);
        let root = rr_set.vertices[0];
        assert_eq!(rr_set.vertices, [root]);
        // Width still counts the examined arcs of the root.
        assert_eq!(rr_set.width, graph.in_degree(root) as u64);
    }
}

#[test]
fn test_seeded_draws_are_reproducible() {
    let graph = Digraph::from_arcs(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 5), (5, 2)]);
    let mut draws = Vec::new();
    for _ in 0..2 {
        let mut sampler = RrSampler::new(&graph, PropagationModel::WeightedCascade);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut run = Vec::new();
        for _ in 0..100 {
            let rr_set = sampler.sample_one(&mut rng);
            run.push((rr_set.vertices.to_vec(), rr_set.width));
        }
        draws.push(run);
    }
    assert_eq!(draws[0], draws[1]);
}

#[test]
fn test_avg_size_monotone_in_probability() -> anyhow::Result<()> {
    // On a directed cycle the RR set of a root is a backward run whose
    // expected length grows with the retention probability.
    let n = 30;
    let graph = Digraph::from_arcs(n, (0..n).map(|i| (i, (i + 1) % n)));
    let mut avg_sizes = Vec::new();
    for p in [0.1, 0.5, 0.9] {
        let mut rng = SmallRng::seed_from_u64(3);
        let report = sample(
            &graph,
            PropagationModel::IndependentCascade(p),
            4000,
            &mut rng,
            no_logging![],
        )?;
        avg_sizes.push(report.stats.avg_size());
    }
    assert!(avg_sizes[0] < avg_sizes[1]);
    assert!(avg_sizes[1] < avg_sizes[2]);
    Ok(())
}

#[test]
fn test_zero_draws() -> anyhow::Result<()> {
    let graph = toy_graph();
    let mut rng = SmallRng::seed_from_u64(0);
    let report = sample(
        &graph,
        PropagationModel::WeightedCascade,
        0,
        &mut rng,
        no_logging![],
    )?;
    assert_eq!(report.stats, SampleStats::default());
    Ok(())
}

#[test]
fn test_empty_graph_is_rejected() {
    let graph = Digraph::from_arcs(0, []);
    let mut rng = SmallRng::seed_from_u64(0);
    assert_eq!(
        sample(
            &graph,
            PropagationModel::WeightedCascade,
            1,
            &mut rng,
            no_logging![],
        )
        .unwrap_err(),
        SampleError::EmptyGraph
    );
    // But zero draws on an empty graph are fine.
    assert!(sample(
        &graph,
        PropagationModel::WeightedCascade,
        0,
        &mut rng,
        no_logging![],
    )
    .is_ok());
}

#[test]
fn test_invalid_probabilities_are_rejected() {
    for p in [0.0, -0.1, 1.5, f64::NAN] {
        assert!(
            matches!(
                PropagationModel::IndependentCascade(p).validate(),
                Err(SampleError::InvalidProbability(_))
            ),
            "probability {}",
            p
        );
    }
    assert!(PropagationModel::IndependentCascade(1.0).validate().is_ok());
    assert!(PropagationModel::WeightedCascade.validate().is_ok());
}

#[test]
fn test_par_sample() -> anyhow::Result<()> {
    // Every node has at least one predecessor, so every draw examines at
    // least one arc.
    let graph = Digraph::from_arcs(6, [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 5), (5, 2)]);
    let model = PropagationModel::IndependentCascade(0.5);
    let theta = 200_000;
    let stop = AtomicBool::new(false);

    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;
    let first = par_sample(&graph, model, theta, 99, &pool, &stop, no_logging![])?;
    assert_eq!(first.stats.draws, theta);
    assert!(first.stats.total_size >= theta);
    assert!(first.stats.total_width >= theta);

    // Same seed, different thread count: identical aggregate.
    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build()?;
    let second = par_sample(&graph, model, theta, 99, &pool, &stop, no_logging![])?;
    assert_eq!(first.stats, second.stats);
    Ok(())
}

#[test]
fn test_par_sample_cancellation() -> anyhow::Result<()> {
    let graph = toy_graph();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build()?;
    let stop = AtomicBool::new(false);
    stop.store(true, Ordering::Relaxed);
    let report = par_sample(
        &graph,
        PropagationModel::WeightedCascade,
        1_000_000,
        0,
        &pool,
        &stop,
        no_logging![],
    )?;
    // A raised flag stops every shard before its first draw; the aggregate
    // is still well formed.
    assert_eq!(report.stats, SampleStats::default());
    Ok(())
}

#[test]
fn test_par_sample_empty_graph() {
    let graph = Digraph::from_arcs(0, []);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
    let stop = AtomicBool::new(false);
    assert_eq!(
        par_sample(
            &graph,
            PropagationModel::WeightedCascade,
            1,
            0,
            &pool,
            &stop,
            no_logging![],
        )
        .unwrap_err(),
        SampleError::EmptyGraph
    );
}
