/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Depth-bounded breadth-first visits.
//!
//! Visits are level-synchronous: all nodes at distance `d` from the root are
//! expanded, concurrently, before any node at distance `d + 1`. Thus a node
//! is always discovered along a shortest path, and its distance does not
//! depend on the order in which lookups complete.

use crate::NodeId;
use std::{collections::BTreeSet, time::Duration};

mod par_levels;
pub use par_levels::*;

/// The outcome of a depth-bounded breadth-first visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal {
    /// The node the visit started from.
    pub root: NodeId,
    /// The maximum distance from the root of the visited nodes.
    pub max_depth: usize,
    /// The visited nodes grouped by distance from the root: `levels[d]`
    /// contains, sorted, the nodes at distance `d`. The first level is
    /// always `[root]`, and no level is empty.
    pub levels: Vec<Vec<NodeId>>,
    /// Wall-clock duration of the visit.
    pub elapsed: Duration,
}

impl Traversal {
    /// Returns the visited nodes in sorted order.
    pub fn visited(&self) -> BTreeSet<&str> {
        self.levels
            .iter()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Returns the number of visited nodes.
    pub fn num_visited(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Returns whether `node` has been visited.
    pub fn contains(&self, node: &str) -> bool {
        self.distance(node).is_some()
    }

    /// Returns the distance of `node` from the root, or [`None`] if `node`
    /// has not been visited.
    pub fn distance(&self, node: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.binary_search_by(|n| n.as_str().cmp(node)).is_ok())
    }
}
