/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Two-pass ingestion of whitespace-separated edge lists.
//!
//! Each line contains at least two integer tokens, the external identifiers
//! of the source and target of an arc; a third token, if present, is ignored.
//! External identifiers are remapped to dense ones in appearance order, so
//! that the resulting identifiers and adjacency order are a deterministic
//! function of the input file.
//!
//! The first pass builds the identifier map and counts per-node degrees; the
//! second pass fills both the graph and its transpose, each laid out as
//! [compressed sparse rows](crate::graphs::CsrGraph) with a single exact
//! allocation. Self-loop lines are counted in *m* but do not generate arcs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use dsi_progress_logger::prelude::*;
use thiserror::Error;

use super::csr_graph::CsrBuilder;
use super::Digraph;

/// Errors that can occur while reading or writing an edge list.
#[derive(Error, Debug)]
pub enum EdgeListError {
    /// The file cannot be opened, read, or written.
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line does not start with two parseable integer identifiers.
    #[error("{path}:{line}: expected two integer vertex identifiers: {text:?}")]
    Parse {
        path: PathBuf,
        /// The 1-based number of the offending line.
        line: usize,
        text: String,
    },
}

/// Parses the first two whitespace-separated tokens of a line as external
/// vertex identifiers; further tokens are ignored.
fn parse_arc(line: &str) -> Option<(i64, i64)> {
    let mut tokens = line.split_ascii_whitespace();
    let src = tokens.next()?.parse().ok()?;
    let dst = tokens.next()?.parse().ok()?;
    Some((src, dst))
}

/// Loads an edge list, returning the graph and its transpose.
///
/// The identifier of a node is its rank in the order of first appearance in
/// the file; arcs appear in the adjacency lists in file order. Self-loops are
/// dropped, but still counted in [`num_lines`](Digraph::num_lines).
///
/// The file is scanned twice, so it must not change during the call.
pub fn load(path: impl AsRef<Path>, pl: &mut impl ProgressLog) -> Result<Digraph, EdgeListError> {
    let path = path.as_ref();
    let io_err = |source| EdgeListError::Io {
        path: path.into(),
        source,
    };

    // First pass: build the identifier map and count degrees.
    let mut ids = HashMap::new();
    let mut out_degree = Vec::new();
    let mut in_degree = Vec::new();
    let mut num_lines = 0_u64;

    let file = BufReader::new(File::open(path).map_err(io_err)?);
    pl.item_name("line");
    pl.start(format!("Scanning {}...", path.display()));

    for (line_num, line) in file.lines().enumerate() {
        let line = line.map_err(io_err)?;
        let (src, dst) = parse_arc(&line).ok_or_else(|| EdgeListError::Parse {
            path: path.into(),
            line: line_num + 1,
            text: line.clone(),
        })?;
        num_lines += 1;
        let src = dense_id(&mut ids, &mut out_degree, &mut in_degree, src);
        let dst = dense_id(&mut ids, &mut out_degree, &mut in_degree, dst);
        if src != dst {
            out_degree[src] += 1;
            in_degree[dst] += 1;
        }
        pl.light_update();
    }
    pl.done();

    let mut forward = CsrBuilder::new(&out_degree);
    let mut transpose = CsrBuilder::new(&in_degree);

    // Second pass: lay the arcs out at their final positions.
    let file = BufReader::new(File::open(path).map_err(io_err)?);
    pl.item_name("line");
    pl.expected_updates(Some(num_lines as usize));
    pl.start(format!("Reading {}...", path.display()));

    for (line_num, line) in file.lines().enumerate() {
        let line = line.map_err(io_err)?;
        // The map is total on the identifiers seen in the first pass, so a
        // miss here means the file changed between the passes.
        let (src, dst) = parse_arc(&line)
            .and_then(|(src, dst)| Some((*ids.get(&src)?, *ids.get(&dst)?)))
            .ok_or_else(|| EdgeListError::Parse {
                path: path.into(),
                line: line_num + 1,
                text: line.clone(),
            })?;
        if src != dst {
            forward.push(src, dst);
            transpose.push(dst, src);
        }
        pl.light_update();
    }
    pl.done();

    let graph = Digraph::from_parts(forward.build(), transpose.build(), num_lines);
    log::info!(
        "Read {}: n={} m={} arcs={}",
        path.display(),
        graph.num_nodes(),
        graph.num_lines(),
        graph.num_arcs()
    );
    Ok(graph)
}

/// Returns the dense identifier of an external one, assigning the next free
/// identifier on first encounter.
#[inline]
fn dense_id(
    ids: &mut HashMap<i64, usize>,
    out_degree: &mut Vec<usize>,
    in_degree: &mut Vec<usize>,
    external: i64,
) -> usize {
    let next_id = ids.len();
    *ids.entry(external).or_insert_with(|| {
        out_degree.push(0);
        in_degree.push(0);
        next_id
    })
}

/// Writes a graph as an edge list with dense identifiers.
///
/// The first line is `<n> <m>`, where *m* is the number of edge lines of the
/// source file; each following line is an arc of the forward graph, in
/// adjacency order. Since self-loops are dropped at ingestion time, the
/// number of arcs written can be smaller than *m*.
pub fn write(graph: &Digraph, path: impl AsRef<Path>) -> Result<(), EdgeListError> {
    let path = path.as_ref();
    let io_err = |source| EdgeListError::Io {
        path: path.into(),
        source,
    };

    let mut file = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(file, "{} {}", graph.num_nodes(), graph.num_lines()).map_err(io_err)?;
    for (src, successors) in graph.forward().iter() {
        for &dst in successors {
            writeln!(file, "{} {}", src, dst).map_err(io_err)?;
        }
    }
    file.flush().map_err(io_err)
}
