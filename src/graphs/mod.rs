/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graph representations and edge-list ingestion.

pub mod csr_graph;
pub mod edge_list;

pub use csr_graph::CsrGraph;

use csr_graph::CsrBuilder;

/// A directed graph paired with its transpose.
///
/// Both directions are stored as [compressed sparse rows](CsrGraph), so that
/// backward visits can enumerate the predecessors of a node as a contiguous
/// slice. The two representations are structurally symmetric: the arc (*u*,
/// *v*) appears in the forward graph exactly as many times as *u* appears
/// among the predecessors of *v*.
///
/// Instances are built by [`edge_list::load`], which drops self-loops, or by
/// [`from_arcs`](Digraph::from_arcs), which stores the arcs as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digraph {
    forward: CsrGraph,
    transpose: CsrGraph,
    num_lines: u64,
}

impl Digraph {
    pub(crate) fn from_parts(forward: CsrGraph, transpose: CsrGraph, num_lines: u64) -> Self {
        debug_assert_eq!(forward.num_nodes(), transpose.num_nodes());
        debug_assert_eq!(forward.num_arcs(), transpose.num_arcs());
        Self {
            forward,
            transpose,
            num_lines,
        }
    }

    /// Creates a graph from a list of arcs, given the number of nodes.
    ///
    /// The arcs are stored as given, in the order in which they appear;
    /// parallel arcs are preserved and self-loops are not dropped.
    pub fn from_arcs(num_nodes: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs = arcs.into_iter().collect::<Vec<_>>();
        let mut out_degree = vec![0; num_nodes];
        let mut in_degree = vec![0; num_nodes];
        for &(src, dst) in &arcs {
            out_degree[src] += 1;
            in_degree[dst] += 1;
        }
        let mut forward = CsrBuilder::new(&out_degree);
        let mut transpose = CsrBuilder::new(&in_degree);
        for &(src, dst) in &arcs {
            forward.push(src, dst);
            transpose.push(dst, src);
        }
        Self::from_parts(forward.build(), transpose.build(), arcs.len() as u64)
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.forward.num_nodes()
    }

    /// Returns the number of arcs, after self-loop removal.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.forward.num_arcs()
    }

    /// Returns the number of edge lines in the source file, including
    /// self-loop lines (the *m* of the edge-list header).
    ///
    /// For graphs built with [`from_arcs`](Digraph::from_arcs) this is just
    /// the number of arcs.
    #[inline(always)]
    pub fn num_lines(&self) -> u64 {
        self.num_lines
    }

    /// Returns the forward graph.
    #[inline(always)]
    pub fn forward(&self) -> &CsrGraph {
        &self.forward
    }

    /// Returns the transpose graph.
    #[inline(always)]
    pub fn transpose(&self) -> &CsrGraph {
        &self.transpose
    }

    /// Returns the indegree of a node, that is, the number of its
    /// predecessors in the forward graph.
    #[inline(always)]
    pub fn in_degree(&self, node: usize) -> usize {
        self.transpose.outdegree(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arcs() {
        let g = Digraph::from_arcs(3, [(0, 1), (1, 2), (0, 2)]);
        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_arcs(), 3);
        assert_eq!(g.forward().successors(0), &[1, 2]);
        assert_eq!(g.forward().successors(1), &[2]);
        assert!(g.forward().successors(2).is_empty());
        assert!(g.transpose().successors(0).is_empty());
        assert_eq!(g.transpose().successors(1), &[0]);
        assert_eq!(g.transpose().successors(2), &[1, 0]);
        assert_eq!(g.in_degree(0), 0);
        assert_eq!(g.in_degree(1), 1);
        assert_eq!(g.in_degree(2), 2);
    }

    #[test]
    fn test_parallel_arcs() {
        let g = Digraph::from_arcs(2, [(0, 1), (0, 1)]);
        assert_eq!(g.forward().successors(0), &[1, 1]);
        assert_eq!(g.transpose().successors(1), &[0, 0]);
        assert_eq!(g.in_degree(1), 2);
    }
}
