/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bounded breadth-first exploration of graphs whose arcs live behind a
//! remote neighbor-lookup service.

pub mod config;
pub mod fetch;
pub mod report;
pub mod utils;
pub mod visits;

/// Opaque node identifier; equality is exact string equality.
pub type NodeId = String;

/// Module exposing all traits in a single level.
pub mod traits {
    use super::*;
    pub use fetch::NeighborSource;
}

/// Use `use graph_crawler::prelude::*;` to import common utilities, modules and
/// all traits.
pub mod prelude {
    use super::*;
    pub use config::{CrawlArgs, CrawlerConfig};
    pub use fetch::{FailurePolicy, FetchError, HttpSource, NeighborCache, NeighborFetcher};
    pub use traits::*;
    pub use utils::{Threads, VisitedRegistry};
    pub use visits::breadth_first;
    pub use crate::NodeId;
}

/// Builds a [`rayon::ThreadPool`] and returns a reference to it.
///
/// `threads![]` uses the default number of threads, `threads![n]` uses `n`
/// threads. The pool bounds the number of concurrent remote lookups of a
/// level.
#[macro_export]
macro_rules! threads {
    () => {
        &rayon::ThreadPoolBuilder::new()
            .build()
            .expect("Cannot build a ThreadPool with default parameters")
    };
    ($num_threads:expr) => {
        &rayon::ThreadPoolBuilder::new()
            .num_threads($num_threads)
            .build()
            .unwrap_or_else(|_| {
                panic!(
                    "Cannot build a ThreadPool with default parameters and {} threads",
                    $num_threads,
                )
            })
    };
}
