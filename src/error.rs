// Validation errors raised by the view builders. Empty input is never an error.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ViewError {
    #[error("capture times must be strictly increasing: {current} follows {previous}")]
    NonMonotonicCaptureTime { previous: i64, current: i64 },

    #[error("percentile must be within [0, 1], got {0}")]
    InvalidPercentile(f64),

    #[error("window start {from} is after window end {to}")]
    InvalidWindow { from: i64, to: i64 },

    #[error("truncate leaf percentage must be within [0, 1], got {0}")]
    InvalidTruncatePercentage(f64),

    #[error("data point interval must be > 0 ms, got {0}")]
    InvalidInterval(i64),

    #[error("histogram: {0}")]
    Histogram(String),
}

pub type ViewResult<T> = Result<T, ViewError>;
