//! Error types for the market data crate.
//!
//! Providers surface failures unchanged; nothing in this crate retries.
//! Callers that want retry or backoff can consult [`MarketDataError::is_transient`].

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while fetching benchmark data.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not know the requested index.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The index exists but has no quotes in the requested period.
    #[error("No data for date range")]
    NoDataForRange,

    /// No yield curve could be built for the requested date.
    #[error("Yield curve unavailable for {date}: {reason}")]
    YieldCurveUnavailable {
        /// Curve anchor date that was requested
        date: NaiveDate,
        /// Why the curve could not be produced
        reason: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider returned data that failed validation checks.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the same request could succeed if issued again later.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout { .. })
    }
}
