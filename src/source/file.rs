// JSON aggregate document on disk, loaded once and queried in memory.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{AggregateSource, ProfileFilter};
use crate::models::{
    MergedQuery, OverviewSample, PercentileSample, ProfileTree, TimeWindow, TransactionQuery,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateDocument {
    pub data_point_interval_millis: i64,
    #[serde(default)]
    pub transactions: Vec<TransactionAggregates>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAggregates {
    pub transaction_type: String,
    /// `None` for the overall aggregate of the transaction type.
    #[serde(default)]
    pub transaction_name: Option<String>,
    #[serde(default)]
    pub overview_samples: Vec<OverviewSample>,
    #[serde(default)]
    pub percentile_samples: Vec<PercentileSample>,
    #[serde(default)]
    pub profile_stacks: Vec<ProfileStack>,
    #[serde(default)]
    pub queries: Vec<QueryRecord>,
    /// Profiles and queries captured before this time were rolled up and dropped.
    #[serde(default)]
    pub detail_expired_before: Option<i64>,
}

/// One sampled stack, outermost frame first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStack {
    pub capture_time: i64,
    pub frames: Vec<String>,
    pub sample_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    pub capture_time: i64,
    pub query_type: String,
    pub query_text: String,
    pub total_micros: u64,
    pub execution_count: u64,
    pub total_rows: u64,
}

pub struct FileSource {
    document: AggregateDocument,
}

impl FileSource {
    pub fn new(document: AggregateDocument) -> anyhow::Result<Self> {
        anyhow::ensure!(
            document.data_point_interval_millis > 0,
            "dataPointIntervalMillis must be > 0, got {}",
            document.data_point_interval_millis
        );
        Ok(Self { document })
    }

    #[instrument(fields(source = "file", operation = "load"))]
    pub async fn load(path: &str) -> anyhow::Result<Self> {
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("read {}: {}", path, e))?;
        let source = Self::from_json(&s)?;
        info!(
            transactions = source.document.transactions.len(),
            "aggregate document loaded"
        );
        Ok(source)
    }

    pub fn from_json(s: &str) -> anyhow::Result<Self> {
        let document: AggregateDocument = serde_json::from_str(s)
            .map_err(|e| anyhow::anyhow!("aggregate document: {}", e))?;
        Self::new(document)
    }

    fn transaction(&self, query: &TransactionQuery) -> Option<&TransactionAggregates> {
        self.document.transactions.iter().find(|t| {
            t.transaction_type == query.transaction_type
                && t.transaction_name == query.transaction_name
        })
    }

    /// Detail records belong to the window when captured after its start.
    fn in_detail_window(window: &TimeWindow, capture_time: i64) -> bool {
        capture_time > window.from && capture_time <= window.to
    }

    fn should_have_detail(&self, query: &TransactionQuery) -> bool {
        let Some(t) = self.transaction(query) else {
            return false;
        };
        let expired = t
            .detail_expired_before
            .is_some_and(|cutoff| query.window.from < cutoff);
        let had_transactions = t.overview_samples.iter().any(|s| {
            Self::in_detail_window(&query.window, s.capture_time) && s.transaction_count > 0
        });
        expired && had_transactions
    }
}

impl AggregateSource for FileSource {
    fn overview_samples(&self, query: &TransactionQuery) -> anyhow::Result<Vec<OverviewSample>> {
        Ok(self
            .transaction(query)
            .map(|t| {
                t.overview_samples
                    .iter()
                    .filter(|s| query.window.contains(s.capture_time))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn percentile_samples(
        &self,
        query: &TransactionQuery,
    ) -> anyhow::Result<Vec<PercentileSample>> {
        Ok(self
            .transaction(query)
            .map(|t| {
                t.percentile_samples
                    .iter()
                    .filter(|s| query.window.contains(s.capture_time))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn merged_profile(
        &self,
        query: &TransactionQuery,
        filter: &ProfileFilter,
    ) -> anyhow::Result<ProfileTree> {
        filter.validate()?;
        let mut tree = ProfileTree::new();
        let Some(t) = self.transaction(query) else {
            return Ok(tree);
        };
        for stack in &t.profile_stacks {
            if Self::in_detail_window(&query.window, stack.capture_time)
                && filter.matches(&stack.frames)
            {
                tree.add_stack(&stack.frames, stack.sample_count);
            }
        }
        if filter.truncate_leaf_percentage > 0.0 {
            let min_samples = filter.min_leaf_samples(tree.sample_count());
            let truncated = tree.truncate_leafs(min_samples);
            debug!(
                min_samples,
                pruned_frames = tree.len() - truncated.len(),
                "profile leafs truncated"
            );
            tree = truncated;
        }
        Ok(tree)
    }

    fn merged_queries(
        &self,
        query: &TransactionQuery,
    ) -> anyhow::Result<BTreeMap<String, Vec<MergedQuery>>> {
        let mut merged: BTreeMap<String, Vec<MergedQuery>> = BTreeMap::new();
        let Some(t) = self.transaction(query) else {
            return Ok(merged);
        };
        for record in t
            .queries
            .iter()
            .filter(|q| Self::in_detail_window(&query.window, q.capture_time))
        {
            let queries = merged.entry(record.query_type.clone()).or_default();
            match queries
                .iter_mut()
                .find(|q| q.query_text == record.query_text)
            {
                Some(existing) => {
                    existing.total_micros =
                        existing.total_micros.saturating_add(record.total_micros);
                    existing.execution_count =
                        existing.execution_count.saturating_add(record.execution_count);
                    existing.total_rows = existing.total_rows.saturating_add(record.total_rows);
                }
                None => queries.push(MergedQuery {
                    query_text: record.query_text.clone(),
                    total_micros: record.total_micros,
                    execution_count: record.execution_count,
                    total_rows: record.total_rows,
                }),
            }
        }
        Ok(merged)
    }

    fn data_point_interval_millis(&self, _window: &TimeWindow) -> i64 {
        self.document.data_point_interval_millis
    }

    fn should_have_profile(&self, query: &TransactionQuery) -> anyhow::Result<bool> {
        Ok(self.should_have_detail(query))
    }

    fn should_have_queries(&self, query: &TransactionQuery) -> anyhow::Result<bool> {
        Ok(self.should_have_detail(query))
    }
}
