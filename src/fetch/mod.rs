/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Resolution of node identifiers to their neighbors.
//!
//! A [`NeighborSource`] performs the actual (uncached) lookup, usually
//! against a remote service through an [`HttpSource`]. A
//! [`NeighborFetcher`] wraps a source with a shared [`NeighborCache`],
//! coalesces concurrent lookups of the same node, and turns failures into
//! empty neighbor lists.

use crate::NodeId;
use thiserror::Error;

mod cache;
pub use cache::*;

mod fetcher;
pub use fetcher::*;

mod http;
pub use http::*;

/// Errors raised by a single neighbor lookup.
///
/// None of these is fatal for a visit: [`NeighborFetcher::fetch`] logs them
/// and degrades to an empty neighbor list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The base URL of the service is not an absolute URL accepting path
    /// segments.
    #[error("invalid base URL {0:?}")]
    BaseUrl(String),
    /// Connection refused, timeout, or any other failure of the transport.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status code.
    #[error("lookup service answered with status {0}")]
    Status(u16),
    /// The response body is not valid JSON.
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Returns whether another attempt of the same lookup may succeed.
    ///
    /// Transport failures, server errors and rate limiting are transient;
    /// client errors and malformed bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Transport(_) => true,
            FetchError::Status(status) => *status >= 500 || *status == 429,
            FetchError::BaseUrl(_) | FetchError::Parse(_) => false,
        }
    }
}

/// An uncached neighbor lookup.
///
/// Every call to [`neighbors`](NeighborSource::neighbors) is expected to hit
/// the underlying service; caching and deduplication are the business of
/// [`NeighborFetcher`]. Implementations are shared among the threads of a
/// visit, hence the [`Sync`] bound.
pub trait NeighborSource: Sync {
    /// Returns the neighbors of `node`, in the order reported by the service.
    fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError>;
}

impl<S: NeighborSource + ?Sized> NeighborSource for &S {
    fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError> {
        (**self).neighbors(node)
    }
}
