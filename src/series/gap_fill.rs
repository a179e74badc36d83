// Inserts "no data" markers so a line chart breaks instead of interpolating across
// missing samples. Every marker is added to all series at once to keep them aligned.

use crate::error::{ViewError, ViewResult};
use crate::models::DataSeries;

/// Distance of a marker from the sample or window edge it guards.
const MARKER_OFFSET_MILLIS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapFillPolicy {
    interval_millis: i64,
    slack_factor: f64,
}

impl GapFillPolicy {
    pub fn new(interval_millis: i64, slack_factor: f64) -> ViewResult<Self> {
        if interval_millis <= 0 {
            return Err(ViewError::InvalidInterval(interval_millis));
        }
        Ok(Self {
            interval_millis,
            slack_factor,
        })
    }

    pub fn interval_millis(&self) -> i64 {
        self.interval_millis
    }

    /// First sample arrives more than one interval after the window start.
    pub fn add_initial_upslope_if_needed(
        &self,
        window_from: i64,
        capture_time: i64,
        series: &mut [DataSeries],
        other: Option<&mut DataSeries>,
    ) {
        if capture_time - window_from <= self.interval_millis {
            return;
        }
        add_marker(window_from + MARKER_OFFSET_MILLIS, series, other);
    }

    pub fn add_gap_if_needed(
        &self,
        last_capture_time: i64,
        capture_time: i64,
        series: &mut [DataSeries],
        mut other: Option<&mut DataSeries>,
    ) {
        let elapsed = (capture_time - last_capture_time) as f64;
        if elapsed <= self.interval_millis as f64 * (1.0 + self.slack_factor) {
            return;
        }
        let after_last = last_capture_time + MARKER_OFFSET_MILLIS;
        let before_next = capture_time - MARKER_OFFSET_MILLIS;
        add_marker(after_last, series, other.as_deref_mut());
        if before_next > after_last {
            add_marker(before_next, series, other);
        }
    }

    /// Last sample is more than one interval before the window end.
    pub fn add_final_downslope_if_needed(
        &self,
        window_to: i64,
        last_capture_time: i64,
        series: &mut [DataSeries],
        other: Option<&mut DataSeries>,
    ) {
        if window_to - last_capture_time <= self.interval_millis {
            return;
        }
        add_marker(window_to - MARKER_OFFSET_MILLIS, series, other);
    }
}

fn add_marker(capture_time: i64, series: &mut [DataSeries], other: Option<&mut DataSeries>) {
    for s in series.iter_mut() {
        s.add_absent(capture_time);
    }
    if let Some(other) = other {
        other.add_absent(capture_time);
    }
}
