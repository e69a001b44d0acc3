/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod graphs;
pub mod sample;

pub mod prelude {
    pub use crate::graphs::csr_graph::CsrGraph;
    pub use crate::graphs::edge_list;
    pub use crate::graphs::edge_list::EdgeListError;
    pub use crate::graphs::Digraph;
    pub use crate::sample::stats::{SampleReport, SampleStats};
    pub use crate::sample::{par_sample, sample, PropagationModel, RrSampler, SampleError};
}
