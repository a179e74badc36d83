// Stacked timer chart: self time per timer name, averaged per transaction.

use std::collections::HashMap;

use tracing::warn;

use super::GapFillPolicy;
use crate::config::ChartsConfig;
use crate::error::ViewResult;
use crate::merging::validate_capture_times;
use crate::models::{DataSeries, OverviewSample, TimeWindow, TimerNode};

/// Self time per timer name across the whole tree, however deep each timer sits.
/// The synthetic root and the real root timers are skipped: their self time is what
/// the "other" series picks up.
pub fn flatten_self_times(synthetic_root: &TimerNode) -> HashMap<String, u64> {
    let mut stacked: HashMap<String, u64> = HashMap::new();
    let mut clamped = 0usize;
    let mut stack: Vec<&TimerNode> = synthetic_root
        .child_nodes
        .iter()
        .flat_map(|real_root| real_root.child_nodes.iter())
        .collect();

    while let Some(timer) = stack.pop() {
        let self_micros = timer.self_micros().unwrap_or_else(|| {
            clamped += 1;
            0
        });
        // unnamed nested timers stay unattributed and fall through to "other"
        if let Some(name) = timer.name.as_deref() {
            let total = stacked.entry(name.to_owned()).or_insert(0);
            *total = total.saturating_add(self_micros);
        }
        stack.extend(timer.child_nodes.iter());
    }

    if clamped > 0 {
        warn!(
            clamped_timers = clamped,
            "nested timers exceed their parent's total; self time clamped to zero"
        );
    }
    stacked
}

/// Names ranked by self time summed over all points, largest first, ties by name.
pub fn top_timer_names(points: &[HashMap<String, u64>], top_k: usize) -> Vec<String> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for point in points {
        for (name, micros) in point {
            let total = totals.entry(name.as_str()).or_insert(0);
            *total = total.saturating_add(*micros);
        }
    }
    let mut ranked: Vec<(&str, u64)> = totals.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(top_k)
        .map(|(name, _)| name.to_owned())
        .collect()
}

/// One series per top timer, then the unnamed "other" series last. "Other" is emitted
/// even with fewer timers than `top_timer_count` so root-timer self time shows up.
pub fn timer_data_series(
    window: &TimeWindow,
    samples: &[OverviewSample],
    policy: &GapFillPolicy,
    charts: &ChartsConfig,
) -> ViewResult<Vec<DataSeries>> {
    validate_capture_times(samples)?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }
    let points: Vec<HashMap<String, u64>> = samples
        .iter()
        .map(|s| flatten_self_times(&s.synthetic_root_timer))
        .collect();
    let mut series: Vec<DataSeries> = top_timer_names(&points, charts.top_timer_count)
        .into_iter()
        .map(DataSeries::named)
        .collect();
    let mut other = DataSeries::new(None);

    let mut last_capture_time: Option<i64> = None;
    for (sample, stacked) in samples.iter().zip(&points) {
        let capture_time = sample.capture_time;
        match last_capture_time {
            None => policy.add_initial_upslope_if_needed(
                window.from,
                capture_time,
                &mut series,
                Some(&mut other),
            ),
            Some(last) => {
                policy.add_gap_if_needed(last, capture_time, &mut series, Some(&mut other))
            }
        }
        last_capture_time = Some(capture_time);

        let count = sample.transaction_count;
        let mut other_micros = sample.total_duration_micros;
        for s in series.iter_mut() {
            let micros = s.name().and_then(|n| stacked.get(n)).copied().unwrap_or(0);
            other_micros = other_micros.saturating_sub(micros);
            s.add(
                capture_time,
                average_millis(micros, count, charts.micros_per_millisecond),
            );
        }
        other.add(
            capture_time,
            average_millis(other_micros, count, charts.micros_per_millisecond),
        );
    }
    if let Some(last) = last_capture_time {
        policy.add_final_downslope_if_needed(window.to, last, &mut series, Some(&mut other));
    }
    series.push(other);
    Ok(series)
}

/// Average milliseconds per transaction; a sample with no transactions charts as zero.
fn average_millis(micros: u64, transaction_count: u64, micros_per_millisecond: f64) -> f64 {
    if transaction_count == 0 {
        return 0.0;
    }
    micros as f64 / transaction_count as f64 / micros_per_millisecond
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_millis_zero_transactions_is_zero() {
        assert_eq!(average_millis(5_000, 0, 1000.0), 0.0);
    }

    #[test]
    fn average_millis_divides_by_count_then_converts() {
        assert_eq!(average_millis(6_000, 2, 1000.0), 3.0);
    }
}
