/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![allow(dead_code)]

use graph_crawler::prelude::*;
use std::{
    collections::{BTreeSet, HashMap, HashSet, VecDeque},
    io::{BufRead, BufReader, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

/// An in-memory graph answering lookups and counting them.
#[derive(Default)]
pub struct MapSource {
    arcs: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MapSource {
    pub fn from_arcs<'a>(arcs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut source = Self::default();
        for (src, dst) in arcs {
            source
                .arcs
                .entry(src.to_owned())
                .or_default()
                .push(dst.to_owned());
        }
        source
    }

    /// Makes lookups of `node` fail with a service error.
    pub fn failing(mut self, node: &str) -> Self {
        self.failing.insert(node.to_owned());
        self
    }

    /// Makes every lookup take at least `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self, node: &str) -> usize {
        self.calls.lock().unwrap().get(node).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// The largest number of lookups observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// The nodes at distance at most `max_depth` from `root`, computed with a
    /// textbook sequential visit.
    pub fn reachable(&self, root: &str, max_depth: usize) -> BTreeSet<String> {
        let mut visited = BTreeSet::from([root.to_owned()]);
        let mut queue = VecDeque::from([(root.to_owned(), 0)]);
        while let Some((node, distance)) = queue.pop_front() {
            if distance == max_depth || self.failing.contains(&node) {
                continue;
            }
            for succ in self.arcs.get(&node).into_iter().flatten() {
                if visited.insert(succ.clone()) {
                    queue.push_back((succ.clone(), distance + 1));
                }
            }
        }
        visited
    }
}

impl NeighborSource for MapSource {
    fn neighbors(&self, node: &str) -> Result<Vec<NodeId>, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(node.to_owned())
            .or_default() += 1;
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(node) {
            return Err(FetchError::Status(503));
        }
        Ok(self.arcs.get(node).cloned().unwrap_or_default())
    }
}

pub fn set(nodes: &[&str]) -> BTreeSet<String> {
    nodes.iter().map(|node| node.to_string()).collect()
}

pub fn owned(visited: BTreeSet<&str>) -> BTreeSet<String> {
    visited.into_iter().map(str::to_owned).collect()
}

/// A minimal HTTP server on the loopback interface.
///
/// Each connection serves a single `GET`, answered from a table of routes
/// keyed by the raw request path; unknown paths get a 404. Requested paths
/// are recorded.
pub struct StubServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(routes: impl IntoIterator<Item = (&'static str, u16, &'static str)>) -> Self {
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(path, status, body)| (path.to_owned(), (status, body.to_owned())))
                .collect(),
        );
        let listener = TcpListener::bind("127.0.0.1:0").expect("cannot bind stub server");
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let routes = routes.clone();
                let recorded = recorded.clone();
                thread::spawn(move || serve(stream, &routes, &recorded));
            }
        });

        Self { addr, requests }
    }

    /// Returns the base URL of the lookup service.
    pub fn base_url(&self) -> String {
        format!("http://{}/neighbors/", self.addr)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    stream: TcpStream,
    routes: &HashMap<String, (u16, String)>,
    requests: &Mutex<Vec<String>>,
) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Skip the headers.
    let mut line = String::new();
    while reader.read_line(&mut line).is_ok_and(|n| n > 0) && line.trim_end() != "" {
        line.clear();
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_owned();
    requests.lock().unwrap().push(path.clone());

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, r#"{"error": "not found"}"#.to_owned()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let mut stream = stream;
    let _ = write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.flush();
}

/// Returns the base URL of a service that accepts connections but never
/// answers.
pub fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("cannot bind silent server");
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        // Keep the connections open without reading or writing.
        let mut open = Vec::new();
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            open.push(stream);
        }
    });
    format!("http://{}/neighbors/", addr)
}

/// Returns a configuration for tests against `base_url`: short timeouts and
/// backoffs, no retries.
pub fn test_config(base_url: String) -> CrawlerConfig {
    CrawlerConfig {
        base_url,
        timeout: Duration::from_secs(5),
        max_retries: 0,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(4),
        threads: 4,
        ..CrawlerConfig::default()
    }
}
