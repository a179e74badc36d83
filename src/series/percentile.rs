// Percentile chart: one series per requested percentile, in milliseconds.

use super::GapFillPolicy;
use crate::config::{ChartsConfig, HistogramConfig};
use crate::error::ViewResult;
use crate::histogram::DurationHistogram;
use crate::merging::{validate_capture_times, validate_percentiles};
use crate::models::{DataSeries, PercentileSample, TimeWindow};

/// Each sample histogram is re-based onto `histogram_config` before it is queried, so
/// charted percentiles use the same resolution as the merged summary.
pub fn percentile_data_series(
    window: &TimeWindow,
    samples: &[PercentileSample],
    percentiles: &[f64],
    policy: &GapFillPolicy,
    charts: &ChartsConfig,
    histogram_config: HistogramConfig,
) -> ViewResult<Vec<DataSeries>> {
    validate_percentiles(percentiles)?;
    validate_capture_times(samples)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let mut series: Vec<DataSeries> = percentiles
        .iter()
        .map(|&p| DataSeries::named(percentile_series_name(p)))
        .collect();

    let mut last_capture_time: Option<i64> = None;
    for sample in samples {
        let capture_time = sample.capture_time;
        match last_capture_time {
            None => {
                policy.add_initial_upslope_if_needed(window.from, capture_time, &mut series, None)
            }
            Some(last) => policy.add_gap_if_needed(last, capture_time, &mut series, None),
        }
        last_capture_time = Some(capture_time);
        let histogram = DurationHistogram::merge_all([&sample.histogram], histogram_config)?;
        for (s, &percentile) in series.iter_mut().zip(percentiles) {
            let micros = histogram.value_at_percentile(percentile)?;
            s.add(capture_time, micros as f64 / charts.micros_per_millisecond);
        }
    }
    if let Some(last) = last_capture_time {
        policy.add_final_downslope_if_needed(window.to, last, &mut series, None);
    }
    Ok(series)
}

/// e.g. 0.95 -> "95th percentile".
pub fn percentile_series_name(percentile: f64) -> String {
    format!("{} percentile", percentile_with_suffix(percentile))
}

/// Percent text with its ordinal suffix: 0.5 -> "50th", 0.999 -> "99.9th", 0.01 -> "1st".
pub fn percentile_with_suffix(percentile: f64) -> String {
    let text = format!("{:.6}", percentile * 100.0);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    let suffix = if text.ends_with("11") || text.ends_with("12") || text.ends_with("13") {
        "th"
    } else if text.ends_with('1') {
        "st"
    } else if text.ends_with('2') {
        "nd"
    } else if text.ends_with('3') {
        "rd"
    } else {
        "th"
    };
    format!("{}{}", text, suffix)
}
