//! Benchmark data provider trait definitions.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{IndexQuote, YieldCurve};

/// Source of daily close series for reference indices.
#[async_trait]
pub trait IndexHistoryProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch daily closes for each index in `indices` between `start` and `end`
    /// (both inclusive).
    ///
    /// Quotes of one index are returned ordered by trade date ascending.
    async fn get_index_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        indices: &[String],
    ) -> Result<Vec<IndexQuote>, MarketDataError>;
}

/// Source of risk-free rates.
#[async_trait]
pub trait YieldCurveProvider: Send + Sync {
    /// Fetch the zero-coupon yield curve published for `date`.
    async fn get_yield_curve(&self, date: NaiveDate) -> Result<YieldCurve, MarketDataError>;

    /// Risk-free rate for `tenor_years` read off the curve anchored at `curve_date`.
    async fn get_risk_free_rate(
        &self,
        curve_date: NaiveDate,
        tenor_years: Decimal,
    ) -> Result<Decimal, MarketDataError> {
        let curve = self.get_yield_curve(curve_date).await?;
        Ok(curve.rate_for_tenor(tenor_years))
    }
}

/// Everything the benchmark calculation needs from the outside world.
pub trait BenchmarkDataProvider: IndexHistoryProvider + YieldCurveProvider {}

impl<T> BenchmarkDataProvider for T where T: IndexHistoryProvider + YieldCurveProvider + ?Sized {}
