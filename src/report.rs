/*
 * SPDX-FileCopyrightText: 2024 Matteo Dell'Acqua
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Text reports of visits.

use crate::visits::breadth_first::Traversal;
use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Returns the name of the report file of a visit starting from `root`.
///
/// Spaces and path separators are replaced by underscores.
///
/// # Examples
///
/// ```
/// use graph_crawler::report::report_file_name;
///
/// assert_eq!(report_file_name("Kevin Bacon"), "bfs_output_Kevin_Bacon.txt");
/// ```
pub fn report_file_name(root: &str) -> String {
    let root: String = root
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    format!("bfs_output_{}.txt", root)
}

/// Writes the report of `traversal` on `out`.
///
/// The report names the root and the maximum distance, lists the visited
/// nodes in sorted order, and ends with the duration of the visit in
/// milliseconds.
pub fn write_report(out: &mut impl Write, traversal: &Traversal) -> std::io::Result<()> {
    writeln!(
        out,
        "\n BFS completed. Nodes reachable within depth {} from {}:",
        traversal.max_depth, traversal.root
    )?;
    for node in traversal.visited() {
        writeln!(out, "   ➜ {}", node)?;
    }
    writeln!(
        out,
        "\n Execution Time: {} ms",
        traversal.elapsed.as_nanos() as f64 / 1e6
    )?;
    Ok(())
}

/// Writes the report of `traversal` in `dir`, in a file named after the
/// root by [`report_file_name`].
///
/// Returns the path of the report.
pub fn save_report(dir: impl AsRef<Path>, traversal: &Traversal) -> Result<PathBuf> {
    let path = dir.as_ref().join(report_file_name(&traversal.root));
    let file = File::create(&path)
        .with_context(|| format!("Cannot create report file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_report(&mut out, traversal)
        .and_then(|()| out.flush())
        .with_context(|| format!("Cannot write report file {}", path.display()))?;
    Ok(path)
}
