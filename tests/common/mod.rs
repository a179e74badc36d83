// Shared test helpers
#![allow(dead_code)]

use txview::config::HistogramConfig;
use txview::histogram::DurationHistogram;
use txview::models::*;

/// Synthetic root -> "http request" -> the given top-level timers.
pub fn request_tree(request_micros: u64, top_level: Vec<TimerNode>) -> TimerNode {
    TimerNode::synthetic_root(vec![TimerNode::named(
        "http request",
        request_micros,
        top_level,
    )])
}

pub fn overview_sample(
    capture_time: i64,
    transaction_count: u64,
    total_duration_micros: u64,
    synthetic_root_timer: TimerNode,
) -> OverviewSample {
    OverviewSample {
        capture_time,
        transaction_count,
        total_duration_micros,
        synthetic_root_timer,
        thread_stats: None,
    }
}

/// A sample whose single request timer accounts for all of its duration.
pub fn simple_overview_sample(capture_time: i64, transaction_count: u64) -> OverviewSample {
    let total = transaction_count * 1_000;
    overview_sample(
        capture_time,
        transaction_count,
        total,
        request_tree(total, vec![TimerNode::leaf("jdbc query", total / 2)]),
    )
}

pub fn histogram(values: &[u64]) -> DurationHistogram {
    DurationHistogram::from_values(values, HistogramConfig::default()).unwrap()
}

pub fn percentile_sample(capture_time: i64, values: &[u64]) -> PercentileSample {
    PercentileSample {
        capture_time,
        transaction_count: values.len() as u64,
        histogram: histogram(values),
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
