// Transaction views: pulls samples from the aggregate source and builds the chart
// series plus merged summary for each tab.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::config::{ChartsConfig, HistogramConfig};
use crate::flame_graph::{FlameGraph, reduce_flame_graph};
use crate::merging::{
    flatten_queries, percentile_merged_aggregate, split_prior_boundary, thread_info_aggregate,
    timer_merged_aggregate, transaction_counts, validate_capture_times, validate_percentiles,
};
use crate::models::{
    DataSeries, PercentileMergedAggregate, ProfileTree, QuerySummary, ThreadInfoAggregate,
    TimerMergedAggregate, TransactionQuery,
};
use crate::series::{GapFillPolicy, percentile_data_series, timer_data_series};
use crate::source::{AggregateSource, ProfileFilter};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewView {
    pub data_series: Vec<DataSeries>,
    pub transaction_counts: BTreeMap<i64, u64>,
    pub merged_aggregate: TimerMergedAggregate,
    #[serde(skip_serializing_if = "ThreadInfoAggregate::is_empty")]
    pub thread_info_aggregate: ThreadInfoAggregate,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileView {
    pub data_series: Vec<DataSeries>,
    pub transaction_counts: BTreeMap<i64, u64>,
    pub merged_aggregate: PercentileMergedAggregate,
}

/// Detail data, or a notice that the window had data which has since been rolled up.
#[derive(Debug, Clone, PartialEq)]
pub enum MaybeOverwritten<T> {
    Data(T),
    Overwritten,
}

impl<T> MaybeOverwritten<T> {
    pub fn is_overwritten(&self) -> bool {
        matches!(self, MaybeOverwritten::Overwritten)
    }

    pub fn data(self) -> Option<T> {
        match self {
            MaybeOverwritten::Data(t) => Some(t),
            MaybeOverwritten::Overwritten => None,
        }
    }
}

/// `Overwritten` serializes as `{"overwritten":true}`.
impl<T: Serialize> Serialize for MaybeOverwritten<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaybeOverwritten::Data(t) => t.serialize(serializer),
            MaybeOverwritten::Overwritten => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("overwritten", &true)?;
                map.end()
            }
        }
    }
}

pub struct TransactionViewService<S> {
    source: S,
    charts: ChartsConfig,
    histogram: HistogramConfig,
}

impl<S: AggregateSource> TransactionViewService<S> {
    pub fn new(source: S, charts: ChartsConfig, histogram: HistogramConfig) -> Self {
        Self {
            source,
            charts,
            histogram,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn gap_fill_policy(&self, query: &TransactionQuery) -> anyhow::Result<GapFillPolicy> {
        let interval = self.source.data_point_interval_millis(&query.window);
        Ok(GapFillPolicy::new(interval, self.charts.gap_slack_factor)?)
    }

    /// Stacked timer chart, transaction counts, merged timer tree and thread counters.
    #[instrument(skip(self, query), fields(view = "overview", transaction_type = %query.transaction_type))]
    pub fn overview_view(&self, query: &TransactionQuery) -> anyhow::Result<OverviewView> {
        let samples = self.source.overview_samples(query)?;
        validate_capture_times(&samples)?;
        let data_series = if samples.is_empty() {
            Vec::new()
        } else {
            timer_data_series(
                &query.window,
                &samples,
                &self.gap_fill_policy(query)?,
                &self.charts,
            )?
        };
        let transaction_counts = transaction_counts(&samples);
        let merged = split_prior_boundary(&samples, query.window.from);
        debug!(
            samples = samples.len(),
            merged = merged.len(),
            series = data_series.len(),
            "overview built"
        );
        Ok(OverviewView {
            data_series,
            transaction_counts,
            merged_aggregate: timer_merged_aggregate(merged),
            thread_info_aggregate: thread_info_aggregate(merged),
        })
    }

    /// Percentile chart and the percentiles of the merged histogram. `percentiles` are
    /// fractions in [0, 1].
    #[instrument(skip(self, query), fields(view = "percentiles", transaction_type = %query.transaction_type))]
    pub fn percentile_view(
        &self,
        query: &TransactionQuery,
        percentiles: &[f64],
    ) -> anyhow::Result<PercentileView> {
        validate_percentiles(percentiles)?;
        let samples = self.source.percentile_samples(query)?;
        validate_capture_times(&samples)?;
        let data_series = if samples.is_empty() {
            Vec::new()
        } else {
            percentile_data_series(
                &query.window,
                &samples,
                percentiles,
                &self.gap_fill_policy(query)?,
                &self.charts,
                self.histogram,
            )?
        };
        let transaction_counts = transaction_counts(&samples);
        let merged = split_prior_boundary(&samples, query.window.from);
        let merged_aggregate =
            percentile_merged_aggregate(merged, percentiles, self.histogram, &self.charts)?;
        debug!(
            samples = samples.len(),
            histogram_len = merged_aggregate.histogram.len(),
            "percentiles built"
        );
        Ok(PercentileView {
            data_series,
            transaction_counts,
            merged_aggregate,
        })
    }

    #[instrument(skip(self, query), fields(view = "flame_graph", transaction_type = %query.transaction_type))]
    pub fn flame_graph_view(
        &self,
        query: &TransactionQuery,
        filter: &ProfileFilter,
    ) -> anyhow::Result<FlameGraph> {
        filter.validate()?;
        let profile = self.source.merged_profile(query, filter)?;
        let flame_graph = reduce_flame_graph(&profile);
        debug!(
            profile_nodes = profile.len(),
            total_samples = flame_graph.total_samples(),
            "flame graph built"
        );
        Ok(flame_graph)
    }

    /// Merged profile tree, or `Overwritten` when it is empty only because the window's
    /// profiles have been rolled up. Filtered requests are never reported as overwritten.
    #[instrument(skip(self, query), fields(view = "profile", transaction_type = %query.transaction_type))]
    pub fn profile_view(
        &self,
        query: &TransactionQuery,
        filter: &ProfileFilter,
    ) -> anyhow::Result<MaybeOverwritten<ProfileTree>> {
        filter.validate()?;
        let profile = self.source.merged_profile(query, filter)?;
        if profile.is_empty() && filter.is_empty() && self.source.should_have_profile(query)? {
            return Ok(MaybeOverwritten::Overwritten);
        }
        Ok(MaybeOverwritten::Data(profile))
    }

    #[instrument(skip(self, query), fields(view = "queries", transaction_type = %query.transaction_type))]
    pub fn queries_view(
        &self,
        query: &TransactionQuery,
    ) -> anyhow::Result<MaybeOverwritten<Vec<QuerySummary>>> {
        let queries = flatten_queries(&self.source.merged_queries(query)?);
        if queries.is_empty() && self.source.should_have_queries(query)? {
            return Ok(MaybeOverwritten::Overwritten);
        }
        Ok(MaybeOverwritten::Data(queries))
    }
}
