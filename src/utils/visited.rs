/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::NodeId;
use dashmap::DashSet;

/// The set of nodes already discovered by a visit.
///
/// The set only grows. [`try_mark`](VisitedRegistry::try_mark) is atomic, so
/// when several threads discover the same node exactly one of them claims
/// it.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    nodes: DashSet<NodeId>,
}

impl VisitedRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `node` as visited.
    ///
    /// Returns `true` if and only if `node` was not marked before, that is,
    /// if this call claimed it.
    pub fn try_mark(&self, node: &str) -> bool {
        !self.nodes.contains(node) && self.nodes.insert(node.to_owned())
    }

    /// Returns whether `node` has been marked.
    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    /// Returns the number of marked nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether no node has been marked.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
