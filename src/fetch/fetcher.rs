/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{cache::Lookup, NeighborCache, NeighborSource};
use crate::NodeId;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// What a [`NeighborFetcher`] remembers about a failed lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// The failure is cached as an empty neighbor list, so the node is never
    /// looked up again while the cache lives.
    #[default]
    CacheAsEmpty,
    /// The failure is shared with the callers waiting on the same lookup,
    /// then forgotten: the next fetch of the node performs a new lookup.
    Evict,
}

/// A memoizing, coalescing front end to a [`NeighborSource`].
///
/// Lookups are memoized in a [`NeighborCache`], which can be shared among
/// fetchers. Concurrent fetches of the same uncached node result in a single
/// call to the source, whose result is handed to all callers.
///
/// Failures of the source never reach the caller: they are logged, counted,
/// and reported as an empty neighbor list. Whether they are cached depends
/// on the [`FailurePolicy`].
///
/// # Examples
///
/// ```
/// use graph_crawler::prelude::*;
///
/// struct Star;
///
/// impl NeighborSource for Star {
///     fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError> {
///         Ok(match node {
///             "center" => vec!["a".into(), "b".into()],
///             _ => vec![],
///         })
///     }
/// }
///
/// let fetcher = NeighborFetcher::new(Star);
/// assert_eq!(&*fetcher.fetch("center"), ["a", "b"]);
/// assert_eq!(&*fetcher.fetch("center"), ["a", "b"]);
/// assert_eq!(fetcher.remote_lookups(), 1);
/// ```
pub struct NeighborFetcher<S> {
    source: S,
    cache: Arc<NeighborCache>,
    policy: FailurePolicy,
    remote_lookups: AtomicUsize,
    failures: AtomicUsize,
}

impl<S: NeighborSource> NeighborFetcher<S> {
    /// Creates a fetcher with a private, empty cache.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(NeighborCache::new()))
    }

    /// Creates a fetcher using the given cache.
    ///
    /// # Arguments
    /// * `source`: the uncached lookup.
    /// * `cache`: a cache, possibly shared with other fetchers.
    pub fn with_cache(source: S, cache: Arc<NeighborCache>) -> Self {
        Self {
            source,
            cache,
            policy: FailurePolicy::default(),
            remote_lookups: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// Sets the policy for failed lookups.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the cache used by this fetcher.
    pub fn cache(&self) -> &Arc<NeighborCache> {
        &self.cache
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the number of calls made to the source so far.
    pub fn remote_lookups(&self) -> usize {
        self.remote_lookups.load(Ordering::Relaxed)
    }

    /// Returns the number of calls to the source that failed so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the neighbors of `node`.
    ///
    /// A cached result is returned immediately. Otherwise the source is
    /// queried, unless another thread is already querying it for the same
    /// node, in which case this call waits for that result.
    ///
    /// If the lookup fails the result is empty.
    pub fn fetch(&self, node: &str) -> Arc<[NodeId]> {
        let slot = self.cache.slot(node);
        match slot.get_or_init(|| self.lookup(node)) {
            Lookup::Resolved(neighbors) => neighbors.clone(),
            Lookup::Failed => {
                if self.policy == FailurePolicy::Evict {
                    self.cache.evict(node, &slot);
                }
                Arc::from([])
            }
        }
    }

    fn lookup(&self, node: &str) -> Lookup {
        self.remote_lookups.fetch_add(1, Ordering::Relaxed);
        match self.source.neighbors(node) {
            Ok(neighbors) => Lookup::Resolved(neighbors.into()),
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                log::warn!("Lookup of {:?} failed, assuming no neighbors: {}", node, err);
                match self.policy {
                    FailurePolicy::Evict => Lookup::Failed,
                    FailurePolicy::CacheAsEmpty => Lookup::Resolved(Arc::from([])),
                }
            }
        }
    }
}
