//! Core error types for efficiency calculations.
//!
//! Market data failures are carried unchanged from the market-data crate so
//! callers can tell an external outage from a defect in their own input.

use chrono::NaiveDate;
use efficiency_market_data::MarketDataError;
use thiserror::Error;

use crate::efficiency::{CalculationStage, Metric};

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the efficiency crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Efficiency calculation failed: {0}")]
    Efficiency(#[from] EfficiencyError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Errors raised while assembling a series or evaluating metrics.
#[derive(Error, Debug)]
pub enum EfficiencyError {
    /// The same date appeared twice in one input set.
    #[error("Duplicate date {0} in series input")]
    DuplicateDate(NaiveDate),

    /// An ordered record sequence went backwards or repeated a date.
    #[error("Series dates out of order: {current} follows {previous}")]
    UnorderedDates {
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// A metric was added before the stages it depends on.
    #[error("{metric} requires {missing} to be added first")]
    PrerequisiteMissing {
        metric: Metric,
        missing: CalculationStage,
    },

    /// Not enough observations to compute the metric.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// The metric has no finite value for this series.
    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("Too many benchmarks: {0} given, at most 5 allowed")]
    TooManyBenchmarks(usize),

    #[error("Benchmark '{0}' is not in the attached benchmark set")]
    UnknownBenchmark(String),

    #[error("Benchmark window unknown: criteria has no dates and the series is empty")]
    MissingBenchmarkWindow,

    #[error("Benchmark calculation task failed: {0}")]
    BenchmarkTask(String),

    #[error("Benchmark calculation requires a running Tokio runtime")]
    NoRuntime,
}

/// Validation errors for criteria and settings input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::Json(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
