/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// A compressed sparse-row graph.
///
/// The representation stores the degree-cumulative function (DCF) and a
/// single contiguous buffer of successors: the successors of node *v* are
/// `successors[dcf[v]..dcf[v + 1]]`. There is no per-node allocation, the
/// degree of a node is a difference of two adjacent offsets, and successor
/// enumeration is a bound check away from a slice access.
///
/// Parallel arcs are preserved, and successors appear in insertion order;
/// they are not necessarily sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    dcf: Box<[usize]>,
    successors: Box<[usize]>,
}

impl core::default::Default for CsrGraph {
    fn default() -> Self {
        Self {
            dcf: vec![0].into(),
            successors: vec![].into(),
        }
    }
}

impl CsrGraph {
    /// Creates an empty CSR graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new CSR graph from the given degree-cumulative function and
    /// successors.
    ///
    /// # Safety
    /// The degree-cumulative function must be monotone, start at zero, and be
    /// coherent with the successors.
    pub unsafe fn from_parts(dcf: Box<[usize]>, successors: Box<[usize]>) -> Self {
        Self { dcf, successors }
    }

    /// Creates a new CSR graph from a list of arcs, given the number of
    /// nodes.
    ///
    /// The arcs are laid out with the classical two-pass construction: a
    /// counting pass computes the DCF, and a second pass writes each
    /// successor directly at its final position.
    pub fn from_arcs(num_nodes: usize, arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let arcs = arcs.into_iter().collect::<Vec<_>>();
        let mut degree = vec![0; num_nodes];
        for &(src, _) in &arcs {
            degree[src] += 1;
        }
        let mut builder = CsrBuilder::new(&degree);
        for &(src, dst) in &arcs {
            builder.push(src, dst);
        }
        builder.build()
    }

    /// Returns the number of nodes.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.dcf.len() - 1
    }

    /// Returns the number of arcs.
    #[inline(always)]
    pub fn num_arcs(&self) -> u64 {
        self.successors.len() as u64
    }

    /// Returns the outdegree of a node.
    #[inline(always)]
    pub fn outdegree(&self, node: usize) -> usize {
        self.dcf[node + 1] - self.dcf[node]
    }

    /// Returns the successors of a node as a slice.
    #[inline(always)]
    pub fn successors(&self, node: usize) -> &[usize] {
        &self.successors[self.dcf[node]..self.dcf[node + 1]]
    }

    /// Returns an iterator over all nodes and their successors.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        (0..self.num_nodes()).map(move |node| (node, self.successors(node)))
    }
}

/// An incremental filler for a [`CsrGraph`] whose degrees are known.
///
/// The builder allocates the DCF and the successor buffer exactly once from
/// the degree counts, and then writes each pushed arc at its final position
/// through a per-node cursor.
pub(crate) struct CsrBuilder {
    dcf: Box<[usize]>,
    cursor: Box<[usize]>,
    successors: Box<[usize]>,
}

impl CsrBuilder {
    /// Creates a builder for a graph with the given per-node degrees.
    pub(crate) fn new(degrees: &[usize]) -> Self {
        let mut dcf = Vec::with_capacity(degrees.len() + 1);
        let mut offset = 0;
        dcf.push(0);
        for &degree in degrees {
            offset += degree;
            dcf.push(offset);
        }
        let dcf = dcf.into_boxed_slice();
        let cursor = dcf[..degrees.len()].to_vec().into_boxed_slice();
        Self {
            dcf,
            cursor,
            successors: vec![0; offset].into_boxed_slice(),
        }
    }

    /// Appends the arc (`src`, `dst`).
    #[inline(always)]
    pub(crate) fn push(&mut self, src: usize, dst: usize) {
        self.successors[self.cursor[src]] = dst;
        self.cursor[src] += 1;
    }

    /// Returns the finished graph.
    pub(crate) fn build(self) -> CsrGraph {
        debug_assert!(
            self.cursor
                .iter()
                .enumerate()
                .all(|(node, &cursor)| cursor == self.dcf[node + 1]),
            "Consistency check of the construction. Every node must have received exactly its counted degree."
        );
        CsrGraph {
            dcf: self.dcf,
            successors: self.successors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let g = CsrGraph::new();
        assert_eq!(g.num_nodes(), 0);
        assert_eq!(g.num_arcs(), 0);
        assert!(g.iter().next().is_none());
    }

    #[test]
    fn test_from_arcs() {
        let g = CsrGraph::from_arcs(4, [(0, 1), (0, 2), (2, 1), (0, 1)]);
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_arcs(), 4);
        assert_eq!(g.outdegree(0), 3);
        assert_eq!(g.successors(0), &[1, 2, 1]);
        assert!(g.successors(1).is_empty());
        assert_eq!(g.successors(2), &[1]);
        assert!(g.successors(3).is_empty());
        assert_eq!(
            g.iter().map(|(_, s)| s.len()).sum::<usize>(),
            g.num_arcs() as usize
        );
    }

    #[test]
    fn test_isolated_last_node() {
        let g = CsrGraph::from_arcs(3, [(0, 1)]);
        assert_eq!(g.outdegree(2), 0);
        assert!(g.successors(2).is_empty());
    }
}
