//! In-memory benchmark data.
//!
//! Useful for offline runs and tests, or for callers that already hold index
//! closes and curve points from another system.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{IndexQuote, YieldCurve, YieldPoint};
use crate::provider::{IndexHistoryProvider, YieldCurveProvider};

const PROVIDER_ID: &str = "STATIC";

#[derive(Debug, Clone, Default)]
pub struct StaticMarketDataProvider {
    closes: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
    curves: BTreeMap<NaiveDate, Vec<YieldPoint>>,
}

impl StaticMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register daily closes for an index. Later closes for the same date win.
    pub fn with_index<I>(mut self, index: impl Into<String>, closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Decimal)>,
    {
        self.closes.entry(index.into()).or_default().extend(closes);
        self
    }

    /// Register the curve points published on `date`.
    pub fn with_yield_curve(mut self, date: NaiveDate, points: Vec<YieldPoint>) -> Self {
        self.curves.insert(date, points);
        self
    }
}

#[async_trait]
impl IndexHistoryProvider for StaticMarketDataProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_index_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        indices: &[String],
    ) -> Result<Vec<IndexQuote>, MarketDataError> {
        let mut quotes = Vec::new();
        for index in indices {
            let closes = self
                .closes
                .get(index)
                .ok_or_else(|| MarketDataError::IndexNotFound(index.clone()))?;

            quotes.extend(
                closes
                    .range(start..=end)
                    .map(|(date, close)| IndexQuote::new(index.as_str(), *date, *close)),
            );
        }
        Ok(quotes)
    }
}

#[async_trait]
impl YieldCurveProvider for StaticMarketDataProvider {
    /// Returns the curve for `date`, or the latest curve published before it.
    async fn get_yield_curve(&self, date: NaiveDate) -> Result<YieldCurve, MarketDataError> {
        let (curve_date, points) = self.curves.range(..=date).next_back().ok_or_else(|| {
            MarketDataError::YieldCurveUnavailable {
                date,
                reason: "no curve published on or before this date".to_string(),
            }
        })?;
        YieldCurve::new(*curve_date, points.clone())
    }
}
