// Domain models: sampled aggregates in, merged summaries and chart series out.

mod profile;
mod query;
mod sample;
mod series;
mod summary;
mod timer;

pub use profile::{ProfileNode, ProfileTree};
pub use query::{MergedQuery, QuerySummary};
pub use sample::{
    Captured, OverviewSample, PercentileSample, ThreadStats, TimeWindow, TransactionQuery,
};
pub use series::{DataSeries, SeriesValue};
pub use summary::{
    PercentileMergedAggregate, PercentileValue, ThreadInfoAggregate, TimerMergedAggregate,
};
pub use timer::TimerNode;
