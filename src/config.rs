/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Settings of the crawler and parsing of the command line.

use crate::{fetch::FailurePolicy, NodeId};
use anyhow::{ensure, Context, Result};
use std::{num::ParseIntError, str::FromStr, time::Duration};
use thiserror::Error;

/// Settings of the lookup client and of the visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerConfig {
    /// Base URL of the lookup service; node identifiers are appended as a
    /// path segment.
    pub base_url: String,
    /// Timeout of a single request.
    pub timeout: Duration,
    /// Maximum number of retries of a transient failure.
    pub max_retries: u32,
    /// Wait before the first retry; it doubles at each further retry.
    pub initial_backoff: Duration,
    /// Upper bound on the wait between retries.
    pub max_backoff: Duration,
    /// Number of worker threads, that is, the maximum number of concurrent
    /// lookups.
    pub threads: usize,
    /// What to remember about failed lookups.
    pub failure_policy: FailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(5),
            threads: 16,
            failure_policy: FailurePolicy::CacheAsEmpty,
        }
    }
}

impl CrawlerConfig {
    pub const DEFAULT_BASE_URL: &'static str =
        "http://hollywood-graph-crawler.bridgesuncc.org/neighbors/";

    pub const BASE_URL_VAR: &'static str = "GRAPH_CRAWLER_BASE_URL";
    pub const THREADS_VAR: &'static str = "GRAPH_CRAWLER_THREADS";
    pub const TIMEOUT_MS_VAR: &'static str = "GRAPH_CRAWLER_TIMEOUT_MS";
    pub const MAX_RETRIES_VAR: &'static str = "GRAPH_CRAWLER_MAX_RETRIES";
    pub const CACHE_FAILURES_VAR: &'static str = "GRAPH_CRAWLER_CACHE_FAILURES";

    /// Returns the default configuration, overridden by the `GRAPH_CRAWLER_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Returns the default configuration, overridden by the values that
    /// `lookup` returns for the `GRAPH_CRAWLER_*` variable names.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(Self::BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(threads) = parse_var::<usize>(&lookup, Self::THREADS_VAR)? {
            ensure!(threads > 0, "{} must be positive", Self::THREADS_VAR);
            config.threads = threads;
        }
        if let Some(millis) = parse_var::<u64>(&lookup, Self::TIMEOUT_MS_VAR)? {
            config.timeout = Duration::from_millis(millis);
        }
        if let Some(max_retries) = parse_var::<u32>(&lookup, Self::MAX_RETRIES_VAR)? {
            config.max_retries = max_retries;
        }
        if let Some(cache_failures) = parse_var::<bool>(&lookup, Self::CACHE_FAILURES_VAR)? {
            config.failure_policy = if cache_failures {
                FailurePolicy::CacheAsEmpty
            } else {
                FailurePolicy::Evict
            };
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .with_context(|| format!("Invalid value {:?} for {}", value, name))
        })
        .transpose()
}

/// Invalid command line.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Usage: {program} <start_node> <max_depth>")]
    Arity { program: String },
    #[error("Invalid maximum depth {value:?}: {source}")]
    Depth {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// The positional arguments of the crawler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlArgs {
    /// The node to start the visit from; it may contain spaces.
    pub start: NodeId,
    /// The maximum distance from the start of the visited nodes.
    pub max_depth: usize,
}

impl CrawlArgs {
    /// Parses the full argument vector, program name included.
    ///
    /// Exactly two arguments must follow the program name: the start node
    /// and a non-negative maximum depth.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, UsageError> {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| "graph-crawler".to_owned());
        let (Some(start), Some(depth), None) = (args.next(), args.next(), args.next()) else {
            return Err(UsageError::Arity { program });
        };
        let max_depth = depth
            .trim()
            .parse::<usize>()
            .map_err(|source| UsageError::Depth {
                value: depth.clone(),
                source,
            })?;
        Ok(Self { start, max_depth })
    }
}
