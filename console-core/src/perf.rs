// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Bencher Contributors

//! Projection of raw metric JSON into chart points.
//!
//! Charts are drawn elsewhere; this module only turns API payloads into
//! `(x, y)` series with deterministic unit conversion.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Kind of measurement a perf query returns. Picks the y-axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerfKind {
    Latency,
    Throughput,
    Compute,
    Memory,
    Storage,
    #[serde(other)]
    Unknown,
}

impl PerfKind {
    pub fn from_json(value: Option<&Value>) -> Self {
        value
            .and_then(|kind| serde_json::from_value(kind.clone()).ok())
            .unwrap_or(Self::Unknown)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Latency => "↑ Nanoseconds",
            Self::Throughput => "↑ Events per Nanoseconds",
            Self::Compute | Self::Memory | Self::Storage => "↑ Average Performance",
            Self::Unknown => "↑ UNITS",
        }
    }
}

impl fmt::Display for PerfKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatencyPoint {
    pub date_time: String,
    pub nanos: u64,
}

/// Total nanoseconds of a `{secs, nanos}` duration. `None` on overflow.
pub fn duration_nanos(duration: &Value) -> Option<u64> {
    let secs = duration.get("secs")?.as_u64()?;
    let nanos = duration.get("nanos")?.as_u64()?;
    secs.checked_mul(NANOS_PER_SEC)?.checked_add(nanos)
}

/// Latency series of one benchmark from a metrics listing.
///
/// Entries lacking any step of
/// `metrics.<benchmark>.latency.duration.{secs,nanos}` are skipped.
pub fn latency_points(metrics: &Value, benchmark: &str) -> Vec<LatencyPoint> {
    let Some(entries) = metrics.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let date_time = entry.get("date_time")?.as_str()?;
            let duration = entry
                .get("metrics")?
                .get(benchmark)?
                .get("latency")?
                .get("duration")?;
            Some(LatencyPoint {
                date_time: date_time.to_string(),
                nanos: duration_nanos(duration)?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfPoint {
    pub x: DateTime<Utc>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfLine {
    /// Position of the result in the query response.
    pub index: usize,
    pub points: Vec<PerfPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfPlot {
    pub kind: PerfKind,
    pub lines: Vec<PerfLine>,
}

impl PerfPlot {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

fn perf_point(metric: &Value) -> Option<PerfPoint> {
    let start = metric.get("start_time")?.as_str()?;
    let start = DateTime::parse_from_rfc3339(start).ok()?.with_timezone(&Utc);
    let iteration = metric.get("iteration")?.as_i64()?;
    Some(PerfPoint {
        x: start.checked_add_signed(Duration::try_seconds(iteration)?)?,
        y: metric
            .get("metric")
            .and_then(|m| m.get("value"))
            .and_then(Value::as_f64),
    })
}

/// Lines of a perf query, one per active result.
///
/// Each point sits `iteration` seconds after its `start_time`. A result is
/// drawn only if `active` has `true` at its index. Returns `None` when the
/// payload has no `results` array.
pub fn perf_lines(perf: &Value, active: &[bool]) -> Option<PerfPlot> {
    let results = perf.get("results")?.as_array()?;

    let lines = results
        .iter()
        .enumerate()
        .filter(|(index, _)| active.get(*index).copied().unwrap_or(false))
        .filter_map(|(index, result)| {
            let metrics = result.get("metrics")?.as_array()?;
            Some(PerfLine {
                index,
                points: metrics.iter().filter_map(perf_point).collect(),
            })
        })
        .collect();

    Some(PerfPlot {
        kind: PerfKind::from_json(perf.get("kind")),
        lines,
    })
}
