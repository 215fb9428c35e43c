/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{FetchError, NeighborSource};
use crate::{config::CrawlerConfig, NodeId};
use reqwest::{blocking::Client, Url};
use serde_json::Value;
use std::time::Duration;

/// A [`NeighborSource`] querying an HTTP service.
///
/// The neighbors of a node are obtained with a `GET` of the base URL
/// followed by the percent-encoded node identifier as a single path segment.
/// The service answers with a JSON object whose `neighbors` field is an
/// array of strings.
///
/// Transient failures (see [`FetchError::is_transient`]) are retried with
/// exponential backoff.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl HttpSource {
    /// Creates a source from the given configuration.
    ///
    /// The HTTP client keeps at most
    /// [`threads`](CrawlerConfig::threads) idle connections, as at most that
    /// many lookups run at the same time.
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| FetchError::BaseUrl(config.base_url.clone()))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.threads)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            base_url,
            max_retries: config.max_retries,
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
        })
    }

    /// Returns the URL used to look up `node`.
    ///
    /// A trailing empty segment of the base URL is dropped, so that both
    /// `http://host/neighbors` and `http://host/neighbors/` map `Kevin Bacon`
    /// to `http://host/neighbors/Kevin%20Bacon`.
    pub fn url(&self, node: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(node);
        Ok(url)
    }

    fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

impl NeighborSource for HttpSource {
    fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError> {
        let url = self.url(node)?;
        let mut backoff = self.initial_backoff;
        let mut attempt = 0;

        loop {
            match self.get(&url) {
                Ok(body) => return parse_neighbors(&body),
                Err(err) if attempt < self.max_retries && err.is_transient() => {
                    attempt += 1;
                    log::debug!(
                        "Lookup of {:?} failed ({}), retry {}/{} in {:?}",
                        node,
                        err,
                        attempt,
                        self.max_retries,
                        backoff
                    );
                    std::thread::sleep(backoff);
                    backoff = (backoff * 2).min(self.max_backoff);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Extracts the neighbor list from the body of a lookup response.
///
/// Invalid JSON is an error. Valid JSON whose `neighbors` field is an array
/// of strings yields that array; any other valid JSON (no `neighbors` field,
/// a field of another type, an array with non-string items) means the node
/// has no neighbors.
///
/// # Examples
///
/// ```
/// use graph_crawler::fetch::parse_neighbors;
///
/// assert_eq!(parse_neighbors(r#"{"neighbors": ["A", "B"]}"#).unwrap(), ["A", "B"]);
/// assert!(parse_neighbors(r#"{"error": "unknown node"}"#).unwrap().is_empty());
/// assert!(parse_neighbors("<html>").is_err());
/// ```
pub fn parse_neighbors(body: &str) -> Result<Vec<NodeId>, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    let neighbors = value
        .get("neighbors")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect::<Option<Vec<_>>>()
        });

    if neighbors.is_none() {
        log::debug!("Response without a list of neighbors: {}", body);
    }
    Ok(neighbors.unwrap_or_default())
}
