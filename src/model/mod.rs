//! Aggregation model: fold raw latency samples into one row per object count.

pub mod fit;

pub use fit::{FitLine, fit_latency};

use crate::log::SampleRow;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row per distinct object count after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub object_count: u64,
    pub latency_ms: f64,
    pub size_kb: f64,
}

/// Reduce samples to one row per object count.
///
/// Two stages:
/// 1. Sum latency and size within each (frame, object_count) pair, so a
///    frame that contributed several requests at the same object count is
///    folded into a single per-frame total first.
/// 2. Drop the frame dimension and take the arithmetic mean of those
///    per-frame totals for each object count.
///
/// Without stage 1, a frame with many requests would be over-weighted
/// relative to a frame with one.
///
/// Rows come back sorted ascending by object count, one per distinct value.
pub fn aggregate(samples: &[SampleRow]) -> Vec<AggregatedRow> {
    // Stage 1: per-frame sums.
    let mut per_frame: BTreeMap<(u64, u64), (f64, f64)> = BTreeMap::new();
    for s in samples {
        let entry = per_frame.entry((s.frame, s.object_count)).or_insert((0.0, 0.0));
        entry.0 += s.latency_ms;
        entry.1 += s.size_kb;
    }

    // Stage 2: cross-frame means.
    let mut by_count: BTreeMap<u64, (f64, f64, u64)> = BTreeMap::new();
    for ((_frame, object_count), (latency_ms, size_kb)) in per_frame {
        let entry = by_count.entry(object_count).or_insert((0.0, 0.0, 0));
        entry.0 += latency_ms;
        entry.1 += size_kb;
        entry.2 += 1;
    }

    by_count
        .into_iter()
        .map(|(object_count, (latency_sum, size_sum, frames))| AggregatedRow {
            object_count,
            latency_ms: latency_sum / frames as f64,
            size_kb: size_sum / frames as f64,
        })
        .collect()
}
