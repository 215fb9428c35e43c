/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::NodeId;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// The settled outcome of a lookup.
#[derive(Debug, Clone)]
pub(crate) enum Lookup {
    Resolved(Arc<[NodeId]>),
    Failed,
}

/// A slot is created by the first caller asking for a key and filled exactly
/// once; callers arriving while the lookup is in flight block on it.
pub(crate) type Slot = OnceLock<Lookup>;

/// A memoizing cache from nodes to their neighbors.
///
/// The cache is shared (through an [`Arc`]) by the fetchers that use it, so
/// its lifetime is decided by the caller: a single cache can serve several
/// visits, and tests can use a fresh one each.
///
/// Entries are write-once: once a key holds a neighbor list it is never
/// looked up again, unless the cache is [cleared](NeighborCache::clear).
#[derive(Debug, Default)]
pub struct NeighborCache {
    slots: DashMap<NodeId, Arc<Slot>>,
}

impl NeighborCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached neighbors of `node`, if a lookup for it has
    /// completed successfully.
    pub fn get(&self, node: &str) -> Option<Arc<[NodeId]>> {
        let slot = self.slots.get(node)?.value().clone();
        match slot.get() {
            Some(Lookup::Resolved(neighbors)) => Some(neighbors.clone()),
            _ => None,
        }
    }

    /// Stores `neighbors` for `node` unless the key is already present.
    ///
    /// Returns `true` if the neighbors were stored.
    pub fn insert(&self, node: impl Into<NodeId>, neighbors: Vec<NodeId>) -> bool {
        let node: NodeId = node.into();
        self.slot(&node).set(Lookup::Resolved(neighbors.into())).is_ok()
    }

    /// Returns whether a lookup for `node` has settled, successfully or not.
    pub fn contains(&self, node: &str) -> bool {
        self.slots
            .get(node)
            .is_some_and(|slot| slot.value().get().is_some())
    }

    /// Returns the number of settled entries.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Returns whether no entry has settled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    ///
    /// Lookups in flight complete normally and their callers still receive
    /// the result, but it is not retained.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Returns the slot for `node`, creating it if needed.
    pub(crate) fn slot(&self, node: &str) -> Arc<Slot> {
        // The shard guard must be released before the caller blocks on the
        // slot.
        if let Some(slot) = self.slots.get(node) {
            return slot.value().clone();
        }
        self.slots
            .entry(node.to_owned())
            .or_default()
            .value()
            .clone()
    }

    /// Removes `slot` from the cache, provided it is still the one stored for
    /// `node`.
    pub(crate) fn evict(&self, node: &str, slot: &Arc<Slot>) {
        self.slots
            .remove_if(node, |_, stored| Arc::ptr_eq(stored, slot));
    }
}
