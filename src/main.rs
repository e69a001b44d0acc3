/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::{concurrent_progress_logger, progress_logger};

use rrsets::prelude::*;

#[derive(Parser, Debug)]
#[command(
    about = "Draw reverse-reachable sets from a directed graph given as an edge list, and report aggregate statistics. Each line of the input must contain two integer vertex identifiers separated by whitespace (a third field is ignored); identifiers are remapped densely in appearance order, and self-loops are dropped.",
    version
)]
struct Cli {
    /// The edge-list file.
    graph: PathBuf,

    #[arg(short, long, default_value_t = 20_000_000)]
    /// The number of RR sets to draw.
    theta: u64,

    #[arg(short, long)]
    /// Fixed retention probability in (0, 1]; if not specified, the
    /// weighted-cascade model is used.
    probability: Option<f64>,

    #[arg(long, default_value_t = 0)]
    /// The seed for the pseudorandom number generators.
    seed: u64,

    #[arg(short = 'j', long, default_value_t = 0)]
    /// The number of threads; zero means one per core.
    threads: usize,

    #[arg(long)]
    /// Write the graph back to this path as an edge list with dense
    /// identifiers.
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut pl = progress_logger![item_name = "line", display_memory = true];
    let graph = edge_list::load(&cli.graph, &mut pl)?;

    let model = match cli.probability {
        Some(p) => PropagationModel::IndependentCascade(p),
        None => PropagationModel::WeightedCascade,
    };
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()?;

    let stop = AtomicBool::new(false);
    let mut pl = concurrent_progress_logger![item_name = "draw", display_memory = true];
    let report = par_sample(
        &graph,
        model,
        cli.theta,
        cli.seed,
        &thread_pool,
        &stop,
        &mut pl,
    )?;
    log::info!("{}", report);

    if let Some(output) = cli.output {
        edge_list::write(&graph, &output)?;
        log::info!("Wrote {}", output.display());
    }
    Ok(())
}
