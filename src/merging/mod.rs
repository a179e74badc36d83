// Window-level merge of sampled aggregates into the summary shown beside each chart.
// Pure functions; callers pass samples already split from the prior-window boundary.

mod queries;
mod thread_stats;
mod timer_tree;

use std::collections::BTreeMap;

pub use queries::flatten_queries;
pub use thread_stats::merge_thread_stats;
pub use timer_tree::merge_timer_trees;

use crate::config::{ChartsConfig, HistogramConfig};
use crate::error::{ViewError, ViewResult};
use crate::histogram::DurationHistogram;
use crate::models::{
    Captured, OverviewSample, PercentileMergedAggregate, PercentileSample, PercentileValue,
    ThreadInfoAggregate, TimerMergedAggregate,
};
use crate::series::percentile_series_name;

/// Fails on the first capture time that does not strictly follow its predecessor.
/// Out-of-order input is never reordered.
pub fn validate_capture_times<T: Captured>(samples: &[T]) -> ViewResult<()> {
    for pair in samples.windows(2) {
        let (previous, current) = (pair[0].capture_time(), pair[1].capture_time());
        if current <= previous {
            return Err(ViewError::NonMonotonicCaptureTime { previous, current });
        }
    }
    Ok(())
}

pub fn validate_percentiles(percentiles: &[f64]) -> ViewResult<()> {
    match percentiles.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        Some(&p) => Err(ViewError::InvalidPercentile(p)),
        None => Ok(()),
    }
}

/// Drops the leading sample when it is captured exactly at the window start: it covers
/// the interval before the window and only seeds the chart boundary.
pub fn split_prior_boundary<T: Captured>(samples: &[T], window_from: i64) -> &[T] {
    match samples.first() {
        Some(first) if first.capture_time() == window_from => &samples[1..],
        _ => samples,
    }
}

/// Capture time -> transaction count for every returned sample.
pub fn transaction_counts<T: Captured>(samples: &[T]) -> BTreeMap<i64, u64> {
    samples
        .iter()
        .map(|s| (s.capture_time(), s.transaction_count()))
        .collect()
}

pub fn timer_merged_aggregate(samples: &[OverviewSample]) -> TimerMergedAggregate {
    TimerMergedAggregate {
        synthetic_root_timer: merge_timer_trees(samples.iter().map(|s| &s.synthetic_root_timer)),
        transaction_count: samples
            .iter()
            .map(|s| s.transaction_count)
            .fold(0, u64::saturating_add),
        total_duration_micros: samples
            .iter()
            .map(|s| s.total_duration_micros)
            .fold(0, u64::saturating_add),
    }
}

pub fn thread_info_aggregate(samples: &[OverviewSample]) -> ThreadInfoAggregate {
    merge_thread_stats(samples.iter().filter_map(|s| s.thread_stats.as_ref()))
}

pub fn percentile_merged_aggregate(
    samples: &[PercentileSample],
    percentiles: &[f64],
    histogram_config: HistogramConfig,
    charts: &ChartsConfig,
) -> ViewResult<PercentileMergedAggregate> {
    validate_percentiles(percentiles)?;
    let histogram =
        DurationHistogram::merge_all(samples.iter().map(|s| &s.histogram), histogram_config)?;
    let mut percentile_values = Vec::with_capacity(percentiles.len());
    for &percentile in percentiles {
        let micros = histogram.value_at_percentile(percentile)?;
        percentile_values.push(PercentileValue {
            data_series_name: percentile_series_name(percentile),
            value: micros as f64 / charts.micros_per_millisecond,
        });
    }
    Ok(PercentileMergedAggregate {
        transaction_count: samples
            .iter()
            .map(|s| s.transaction_count)
            .fold(0, u64::saturating_add),
        percentiles: percentiles.to_vec(),
        percentile_values,
        histogram,
    })
}
