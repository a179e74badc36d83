// Merged summaries over a window: one per chart tab.

use serde::Serialize;

use super::TimerNode;
use crate::histogram::DurationHistogram;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerMergedAggregate {
    pub synthetic_root_timer: TimerNode,
    pub transaction_count: u64,
    pub total_duration_micros: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileValue {
    pub data_series_name: String,
    /// Milliseconds.
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileMergedAggregate {
    pub transaction_count: u64,
    pub percentiles: Vec<f64>,
    pub percentile_values: Vec<PercentileValue>,
    #[serde(skip)]
    pub histogram: DurationHistogram,
}

/// Summed thread counters. A counter stays `None` when no merged sample reported it,
/// which is not the same as a reported zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInfoAggregate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cpu_micros: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocked_micros: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_waited_micros: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_allocated_kbytes: Option<u64>,
}

impl ThreadInfoAggregate {
    pub fn is_empty(&self) -> bool {
        self.total_cpu_micros.is_none()
            && self.total_blocked_micros.is_none()
            && self.total_waited_micros.is_none()
            && self.total_allocated_kbytes.is_none()
    }
}
