/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::Traversal;
use crate::{
    fetch::{NeighborFetcher, NeighborSource},
    utils::VisitedRegistry,
    NodeId,
};
use dsi_progress_logger::ProgressLog;
use rayon::{prelude::*, ThreadPool};
use std::time::Instant;

/// A parallel, level-synchronous, depth-bounded breadth-first visit.
///
/// At each iteration the whole current frontier is divided in chunks of
/// [`granularity`](ParLevels::with_granularity) nodes, and the chunks are
/// expanded by the threads of the pool: each thread fetches the neighbors of
/// its nodes and claims the undiscovered ones in a shared
/// [`VisitedRegistry`]. The claimed nodes form the next frontier, which is
/// assembled only once all lookups of the level have completed.
///
/// Since lookups are blocking, the number of threads of the pool is the
/// maximum number of lookups in flight.
///
/// # Examples
///
/// ```
/// use graph_crawler::prelude::*;
/// use graph_crawler::threads;
/// use dsi_progress_logger::no_logging;
///
/// struct Path;
///
/// impl NeighborSource for Path {
///     fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError> {
///         let next = node.parse::<usize>().unwrap() + 1;
///         Ok(vec![next.to_string()])
///     }
/// }
///
/// let fetcher = NeighborFetcher::new(Path);
/// let visit = breadth_first::ParLevels::new(&fetcher);
/// let traversal = visit.par_visit("0", 2, threads![], no_logging![]);
///
/// assert_eq!(traversal.levels, [["0"], ["1"], ["2"]]);
/// assert_eq!(traversal.distance("2"), Some(2));
/// ```
pub struct ParLevels<'a, S> {
    fetcher: &'a NeighborFetcher<S>,
    granularity: usize,
}

impl<'a, S: NeighborSource> ParLevels<'a, S> {
    /// Creates a visit using the given fetcher.
    ///
    /// The cache of the fetcher outlives the visit: neighbors fetched during
    /// a visit are not looked up again by later visits sharing the cache.
    pub fn new(fetcher: &'a NeighborFetcher<S>) -> Self {
        Self {
            fetcher,
            granularity: 1,
        }
    }

    /// Sets the number of frontier nodes expanded by a single task.
    ///
    /// The default, one, lets each lookup proceed independently, which is
    /// what we want when lookups are slow and their latency uneven.
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        assert!(granularity > 0, "the granularity must be positive");
        self.granularity = granularity;
        self
    }

    /// Returns the fetcher used by the visit.
    pub fn fetcher(&self) -> &NeighborFetcher<S> {
        self.fetcher
    }

    /// Visits the nodes at distance at most `max_depth` from `root`.
    ///
    /// # Arguments
    /// * `root`: the node to start the visit from.
    /// * `max_depth`: the maximum distance from `root`; nodes at this
    ///   distance are visited but not expanded.
    /// * `thread_pool`: the pool running the lookups.
    /// * `pl`: a progress logger, updated once for each expanded node.
    pub fn par_visit(
        &self,
        root: &str,
        max_depth: usize,
        thread_pool: &ThreadPool,
        pl: &mut impl ProgressLog,
    ) -> Traversal {
        let start = Instant::now();
        let visited = VisitedRegistry::new();
        visited.try_mark(root);
        let mut levels = vec![vec![root.to_owned()]];

        pl.item_name("node");
        pl.expected_updates(None);
        pl.start(format!(
            "Visiting from {:?} up to distance {}...",
            root, max_depth
        ));

        for distance in 0..max_depth {
            let frontier = &levels[distance];
            let mut next_frontier: Vec<NodeId> = thread_pool.install(|| {
                frontier
                    .par_chunks(self.granularity)
                    .flat_map_iter(|chunk| {
                        let mut discovered = Vec::new();
                        for node in chunk {
                            for succ in self.fetcher.fetch(node).iter() {
                                if visited.try_mark(succ) {
                                    discovered.push(succ.clone());
                                }
                            }
                        }
                        discovered
                    })
                    .collect()
            });
            pl.update_with_count(frontier.len());

            if next_frontier.is_empty() {
                break;
            }
            pl.info(format_args!(
                "{} new nodes at distance {}",
                next_frontier.len(),
                distance + 1
            ));
            next_frontier.sort_unstable();
            levels.push(next_frontier);
        }

        pl.done();
        debug_assert_eq!(visited.len(), levels.iter().map(Vec::len).sum::<usize>());

        Traversal {
            root: root.to_owned(),
            max_depth,
            levels,
            elapsed: start.elapsed(),
        }
    }
}
