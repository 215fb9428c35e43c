/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Size of the pool running the lookups of a visit.
///
/// The lookups of a level run as tasks of the pool, so the number of threads
/// is also the maximum number of requests in flight.
#[derive(Debug, Clone, Copy)]
pub enum Threads {
    Default,
    NumThreads(usize),
}

impl Threads {
    pub fn build(self) -> Result<ThreadPool, ThreadPoolBuildError> {
        let builder = ThreadPoolBuilder::new().thread_name(|i| format!("crawler-{}", i));
        match self {
            Self::Default => builder.build(),
            Self::NumThreads(num_threads) => builder.num_threads(num_threads).build(),
        }
    }
}
