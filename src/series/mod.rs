// Chart-ready data series built from sampled aggregates.

mod gap_fill;
mod percentile;
mod stacked;

pub use gap_fill::GapFillPolicy;
pub use percentile::{percentile_data_series, percentile_series_name, percentile_with_suffix};
pub use stacked::{flatten_self_times, timer_data_series, top_timer_names};
