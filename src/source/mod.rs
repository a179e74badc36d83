// Where sampled aggregates come from. The views only rely on this contract.

mod file;

use std::collections::BTreeMap;

pub use file::{AggregateDocument, FileSource, ProfileStack, QueryRecord, TransactionAggregates};

use crate::error::{ViewError, ViewResult};
use crate::models::{
    MergedQuery, OverviewSample, PercentileSample, ProfileTree, TimeWindow, TransactionQuery,
};

/// Stack-frame filters applied when the source merges profile samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    /// Keep only stacks with a frame containing one of these.
    pub include: Vec<String>,
    /// Drop stacks with a frame containing one of these.
    pub exclude: Vec<String>,
    /// Frames below this fraction of all samples are pruned, with everything they
    /// called. 0 keeps the whole tree.
    pub truncate_leaf_percentage: f64,
}

impl ProfileFilter {
    /// True when no stack is filtered out. Leaf truncation does not count.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    pub fn validate(&self) -> ViewResult<()> {
        if !(0.0..=1.0).contains(&self.truncate_leaf_percentage) {
            return Err(ViewError::InvalidTruncatePercentage(
                self.truncate_leaf_percentage,
            ));
        }
        Ok(())
    }

    /// Smallest sample count a frame needs to survive leaf truncation.
    pub fn min_leaf_samples(&self, total_samples: u64) -> u64 {
        (self.truncate_leaf_percentage * total_samples as f64).ceil() as u64
    }

    pub fn matches<S: AsRef<str>>(&self, frames: &[S]) -> bool {
        let contains_any = |patterns: &[String]| {
            frames
                .iter()
                .any(|f| patterns.iter().any(|p| f.as_ref().contains(p.as_str())))
        };
        (self.include.is_empty() || contains_any(&self.include)) && !contains_any(&self.exclude)
    }
}

pub trait AggregateSource {
    /// Samples ordered by capture time. The first one may be captured exactly at the
    /// window start, in which case it belongs to the prior window.
    fn overview_samples(&self, query: &TransactionQuery) -> anyhow::Result<Vec<OverviewSample>>;

    fn percentile_samples(&self, query: &TransactionQuery)
    -> anyhow::Result<Vec<PercentileSample>>;

    fn merged_profile(
        &self,
        query: &TransactionQuery,
        filter: &ProfileFilter,
    ) -> anyhow::Result<ProfileTree>;

    /// Query type -> merged queries of that type.
    fn merged_queries(
        &self,
        query: &TransactionQuery,
    ) -> anyhow::Result<BTreeMap<String, Vec<MergedQuery>>>;

    /// Nominal spacing between samples for this window.
    fn data_point_interval_millis(&self, window: &TimeWindow) -> i64;

    /// Whether the window should have had profile data (i.e. an empty profile means it
    /// was rolled up or overwritten, not that nothing happened).
    fn should_have_profile(&self, query: &TransactionQuery) -> anyhow::Result<bool>;

    fn should_have_queries(&self, query: &TransactionQuery) -> anyhow::Result<bool>;
}
