/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Reverse-reachable set sampling.
//!
//! A reverse-reachable (RR) set is built by drawing a root uniformly at
//! random and performing a randomized breadth-first visit on the transpose of
//! the graph: each incoming arc of a visited node is retained with the
//! probability prescribed by the [propagation model](PropagationModel), and
//! retained predecessors are enqueued. The RR set is the set of visited
//! nodes, and its *width* is the number of arcs examined during the visit,
//! whether or not their random draw retained them.
//!
//! Since the number of draws is typically between 10⁷ and 10⁹, the drivers
//! [`sample`] and [`par_sample`](par::par_sample) fold each draw into
//! [aggregate statistics](stats::SampleStats) instead of materializing the
//! sets; [`RrSampler`] gives access to the single sets for callers that need
//! them.

pub mod par;
pub mod stats;

pub use par::par_sample;

use std::collections::VecDeque;
use std::time::Instant;

use dsi_progress_logger::prelude::*;
use rand::Rng;
use sux::bits::BitVec;
use thiserror::Error;

use crate::graphs::{CsrGraph, Digraph};
use stats::{SampleReport, SampleStats};

/// The diffusion model determining per-arc retention probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropagationModel {
    /// Every arc is retained independently with the given fixed probability,
    /// which must lie in (0, 1].
    IndependentCascade(f64),
    /// The arc (*u*, *v*), examined while expanding *v*, is retained with
    /// probability 1/*d*⁻(*v*). Nodes without predecessors simply do not
    /// extend the visit.
    WeightedCascade,
}

impl PropagationModel {
    /// Checks that the model parameters are valid.
    pub fn validate(&self) -> Result<(), SampleError> {
        match *self {
            PropagationModel::IndependentCascade(p) if !(p > 0.0 && p <= 1.0) => {
                Err(SampleError::InvalidProbability(p))
            }
            _ => Ok(()),
        }
    }
}

/// Errors rejected before sampling starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    /// A positive number of draws was requested on a graph without nodes.
    #[error("Cannot draw RR sets from a graph with no nodes")]
    EmptyGraph,

    /// A fixed retention probability outside (0, 1].
    #[error("The retention probability must lie in (0, 1]: got {0}")]
    InvalidProbability(f64),
}

/// One reverse-reachable set, borrowed from the sampler buffers.
///
/// The vertices appear in discovery order, the root first; each vertex
/// appears exactly once.
#[derive(Debug)]
pub struct RrSet<'a> {
    /// The visited vertices, root first.
    pub vertices: &'a [usize],
    /// The number of arcs examined during the visit, including arcs whose
    /// random draw rejected them.
    pub width: u64,
}

/// A reusable sampler of reverse-reachable sets.
///
/// The sampler owns the visit state (visited bits, frontier, output buffer)
/// and borrows the immutable transpose, so independent samplers can draw in
/// parallel from the same graph. The random source is passed explicitly to
/// each draw, which makes runs reproducible and lets parallel drivers seed
/// one generator per worker.
pub struct RrSampler<'a> {
    transpose: &'a CsrGraph,
    model: PropagationModel,
    visited: BitVec,
    frontier: VecDeque<usize>,
    rr_set: Vec<usize>,
}

impl<'a> RrSampler<'a> {
    /// Creates a sampler for the given graph and model.
    pub fn new(graph: &'a Digraph, model: PropagationModel) -> Self {
        Self {
            transpose: graph.transpose(),
            model,
            visited: BitVec::new(graph.num_nodes()),
            frontier: VecDeque::new(),
            rr_set: Vec::new(),
        }
    }

    /// Draws one reverse-reachable set.
    ///
    /// The returned set borrows the sampler buffers and is overwritten by the
    /// next draw.
    ///
    /// # Panics
    /// If the graph has no nodes.
    pub fn sample_one(&mut self, rng: &mut impl Rng) -> RrSet<'_> {
        // Clear only the bits of the previous draw; RR sets are usually
        // much smaller than the graph.
        for &node in &self.rr_set {
            self.visited.set(node, false);
        }
        self.rr_set.clear();
        self.frontier.clear();

        let root = rng.random_range(0..self.transpose.num_nodes());
        self.frontier.push_back(root);
        let mut width = 0_u64;

        while let Some(node) = self.frontier.pop_front() {
            // Duplicates are suppressed lazily, at dequeue time: a node may
            // be enqueued more than once before its first dequeue.
            if self.visited[node] {
                continue;
            }
            self.visited.set(node, true);
            self.rr_set.push(node);

            let preds = self.transpose.successors(node);
            let probability = match self.model {
                PropagationModel::IndependentCascade(p) => p,
                // Nodes without predecessors never reach the draw below.
                PropagationModel::WeightedCascade => 1.0 / preds.len() as f64,
            };
            for &pred in preds {
                width += 1;
                if self.visited[pred] {
                    continue;
                }
                if rng.random::<f64>() < probability {
                    self.frontier.push_back(pred);
                }
            }
        }

        RrSet {
            vertices: &self.rr_set,
            width,
        }
    }
}

/// Draws `theta` reverse-reachable sets sequentially and folds them into
/// aggregate statistics.
///
/// # Arguments
///
/// * `graph`: the graph, with its transpose.
///
/// * `model`: the propagation model.
///
/// * `theta`: the number of draws; zero yields empty statistics.
///
/// * `rng`: the random source; a seeded generator makes the run
///   reproducible.
///
/// * `pl`: a progress logger.
pub fn sample(
    graph: &Digraph,
    model: PropagationModel,
    theta: u64,
    rng: &mut impl Rng,
    pl: &mut impl ProgressLog,
) -> Result<SampleReport, SampleError> {
    model.validate()?;
    if theta > 0 && graph.num_nodes() == 0 {
        return Err(SampleError::EmptyGraph);
    }

    pl.item_name("draw");
    pl.expected_updates(Some(theta as usize));
    pl.start(format!("Drawing {} RR sets...", theta));
    let start = Instant::now();

    let mut stats = SampleStats::default();
    let mut sampler = RrSampler::new(graph, model);
    for _ in 0..theta {
        let rr_set = sampler.sample_one(rng);
        stats.update(rr_set.vertices.len() as u64, rr_set.width);
        pl.light_update();
    }

    let elapsed = start.elapsed();
    pl.done();
    Ok(SampleReport::new(stats, elapsed))
}
