/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Parallel RR-set sampling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use dsi_progress_logger::ConcurrentProgressLog;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use rayon::ThreadPool;

use super::stats::{SampleReport, SampleStats};
use super::{PropagationModel, RrSampler, SampleError};
use crate::graphs::Digraph;

/// The number of draws per work unit.
///
/// Shards are seeded by their index, so the aggregate does not depend on the
/// number of threads or on the order in which shards complete.
const SHARD_SIZE: u64 = 1 << 16;

/// Draws `theta` reverse-reachable sets on a thread pool and folds them into
/// aggregate statistics.
///
/// The draws are split into [fixed-size shards](SHARD_SIZE); shard *i* uses
/// a generator seeded with `seed + i`, so for a given `seed` the result is
/// the same whatever the size of the thread pool. Each worker folds into a
/// local accumulator, and the *only* synchronization point is the final sum.
///
/// Cancellation is checked between draws, never in the middle of one, so
/// after raising `stop` the returned statistics are still a valid aggregate
/// over the draws that did complete.
///
/// # Arguments
///
/// * `graph`: the graph, with its transpose.
///
/// * `model`: the propagation model.
///
/// * `theta`: the number of draws; zero yields empty statistics.
///
/// * `seed`: the seed for the per-shard pseudorandom number generators.
///
/// * `thread_pool`: the pool the shards are dispatched on.
///
/// * `stop`: a flag polled at per-draw granularity; when raised, workers
///   abandon their remaining draws.
///
/// * `pl`: a concurrent progress logger.
pub fn par_sample(
    graph: &Digraph,
    model: PropagationModel,
    theta: u64,
    seed: u64,
    thread_pool: &ThreadPool,
    stop: &AtomicBool,
    pl: &mut impl ConcurrentProgressLog,
) -> Result<SampleReport, SampleError> {
    model.validate()?;
    if theta > 0 && graph.num_nodes() == 0 {
        return Err(SampleError::EmptyGraph);
    }

    pl.item_name("draw");
    pl.expected_updates(Some(theta as usize));
    pl.start(format!(
        "Drawing {} RR sets on {} threads...",
        theta,
        thread_pool.current_num_threads()
    ));
    let start = Instant::now();

    let num_shards = theta.div_ceil(SHARD_SIZE);
    let shared_pl = pl.clone();
    let stats: SampleStats = thread_pool.install(|| {
        (0..num_shards)
            .into_par_iter()
            .map_init(
                || (RrSampler::new(graph, model), shared_pl.clone()),
                |(sampler, pl), shard| {
                    let mut rng = SmallRng::seed_from_u64(seed.wrapping_add(shard));
                    let draws = SHARD_SIZE.min(theta - shard * SHARD_SIZE);
                    let mut local = SampleStats::default();
                    for _ in 0..draws {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let rr_set = sampler.sample_one(&mut rng);
                        local.update(rr_set.vertices.len() as u64, rr_set.width);
                        pl.light_update();
                    }
                    local
                },
            )
            .sum()
    });

    let elapsed = start.elapsed();
    pl.done();
    Ok(SampleReport::new(stats, elapsed))
}
