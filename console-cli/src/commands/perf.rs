// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! `bencher-console perf` command - Project metric data into chart series.

use bencher_console_core::{latency_points, perf_lines, ApiClient};
use serde_json::Value;

use super::{open, Options};
use crate::error::CliError;

/// Metrics listing the latency chart reads from.
const METRICS_PATH: &str = "/v0/metrics";

fn read_json(path: &str) -> Result<Value, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_string(),
        source,
    })
}

/// Print one benchmark's latency series in nanoseconds.
pub async fn latency(
    options: &Options<'_>,
    benchmark: &str,
    file: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = match file {
        Some(path) => read_json(path)?,
        None => {
            let console = open(options)?;
            let url = format!("{}{}", console.config().api.url, METRICS_PATH);
            console.client().get(&url).await?
        }
    };

    let points = latency_points(&metrics, benchmark);
    if points.is_empty() {
        println!("No latency data for {}.", benchmark);
        return Ok(());
    }

    println!("{}", benchmark);
    println!("  {:<32} {:>20}", "Date Time", "Nanoseconds");
    for point in &points {
        println!("  {:<32} {:>20}", point.date_time, point.nanos);
    }
    println!();
    println!("Total: {} point(s)", points.len());
    Ok(())
}

/// Print the lines of a saved perf query response.
///
/// `active` lists the result indices to draw; empty draws all of them.
pub async fn lines(file: &str, active: &[usize]) -> Result<(), Box<dyn std::error::Error>> {
    let perf = read_json(file)?;

    let count = perf
        .get("results")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let mask: Vec<bool> = (0..count)
        .map(|index| active.is_empty() || active.contains(&index))
        .collect();

    let Some(plot) = perf_lines(&perf, &mask) else {
        eprintln!("✗ {} has no perf results", file);
        std::process::exit(1);
    };

    println!("{}", plot.label());
    for line in &plot.lines {
        println!();
        println!("Result {} ({} point(s))", line.index, line.points.len());
        for point in &line.points {
            let y = point
                .y
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!("  {}  {}", point.x.to_rfc3339(), y);
        }
    }
    Ok(())
}
