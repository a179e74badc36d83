// Sampled aggregates as returned by the aggregate source, one per recorded interval.

use serde::{Deserialize, Serialize};

use super::TimerNode;
use crate::error::{ViewError, ViewResult};
use crate::histogram::DurationHistogram;

/// Common view of the two sample kinds: where it sits on the time axis and how many
/// transactions it covers.
pub trait Captured {
    fn capture_time(&self) -> i64;
    fn transaction_count(&self) -> u64;
}

/// Thread-level counters. Each counter is optional since not every agent can collect it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStats {
    #[serde(default)]
    pub cpu_micros: Option<u64>,
    #[serde(default)]
    pub blocked_micros: Option<u64>,
    #[serde(default)]
    pub waited_micros: Option<u64>,
    #[serde(default)]
    pub allocated_kbytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSample {
    pub capture_time: i64,
    pub transaction_count: u64,
    pub total_duration_micros: u64,
    pub synthetic_root_timer: TimerNode,
    #[serde(default)]
    pub thread_stats: Option<ThreadStats>,
}

impl Captured for OverviewSample {
    fn capture_time(&self) -> i64 {
        self.capture_time
    }

    fn transaction_count(&self) -> u64 {
        self.transaction_count
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileSample {
    pub capture_time: i64,
    pub transaction_count: u64,
    pub histogram: DurationHistogram,
}

impl Captured for PercentileSample {
    fn capture_time(&self) -> i64 {
        self.capture_time
    }

    fn transaction_count(&self) -> u64 {
        self.transaction_count
    }
}

/// Requested chart window, both ends inclusive, in epoch millis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    pub fn new(from: i64, to: i64) -> ViewResult<Self> {
        if from > to {
            return Err(ViewError::InvalidWindow { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, capture_time: i64) -> bool {
        capture_time >= self.from && capture_time <= self.to
    }
}

/// Which transactions to look at. `transaction_name` of `None` means the overall
/// aggregate for the transaction type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub transaction_type: String,
    pub transaction_name: Option<String>,
    pub window: TimeWindow,
}

impl TransactionQuery {
    pub fn new(
        transaction_type: impl Into<String>,
        transaction_name: Option<String>,
        from: i64,
        to: i64,
    ) -> ViewResult<Self> {
        Ok(Self {
            transaction_type: transaction_type.into(),
            transaction_name,
            window: TimeWindow::new(from, to)?,
        })
    }
}
