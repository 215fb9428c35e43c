/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{Context, Result};
use dsi_progress_logger::prelude::*;
use graph_crawler::prelude::*;
use graph_crawler::report::save_report;
use std::sync::Arc;

fn main() -> Result<()> {
    stderrlog::new()
        .verbosity(2)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let args = CrawlArgs::parse(std::env::args())?;
    let config = CrawlerConfig::from_env()?;

    let thread_pool = Threads::NumThreads(config.threads)
        .build()
        .with_context(|| format!("Cannot build a pool of {} threads", config.threads))?;
    let source = HttpSource::new(&config).context("Cannot create the HTTP client")?;
    let fetcher = NeighborFetcher::with_cache(source, Arc::new(NeighborCache::new()))
        .with_failure_policy(config.failure_policy);

    log::info!("Starting BFS from {:?} on {}", args.start, config.base_url);
    let mut main_pl = progress_logger![display_memory = true];
    let traversal = breadth_first::ParLevels::new(&fetcher).par_visit(
        &args.start,
        args.max_depth,
        &thread_pool,
        &mut main_pl,
    );
    log::info!(
        "Visited {} nodes with {} lookups ({} failed) in {:?}",
        traversal.num_visited(),
        fetcher.remote_lookups(),
        fetcher.failures(),
        traversal.elapsed
    );

    let path = save_report(".", &traversal)?;
    println!("BFS results saved in {}", path.display());

    Ok(())
}
