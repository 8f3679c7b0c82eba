//! Benchmark comparison data for an efficiency window.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use efficiency_market_data::{BenchmarkDataProvider, IndexQuote, MarketDataError};
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::constants::MAX_BENCHMARKS;
use crate::errors::{EfficiencyError, Result, ValidationError};
use crate::settings::{self, EfficiencySettings};

use super::{
    BenchmarkEntry, BenchmarkSet, DailyRecord, EfficiencyConfigurer, EfficiencyQuery,
    QueryCriteria,
};

/// Runs the life-time, TWR and STD stages over reference index closes and
/// pairs them with a risk-free rate.
pub struct BenchmarkService {
    provider: Arc<dyn BenchmarkDataProvider>,
    settings: EfficiencySettings,
}

impl BenchmarkService {
    pub fn new(provider: Arc<dyn BenchmarkDataProvider>) -> Self {
        Self::with_settings(provider, settings::current())
    }

    pub fn with_settings(
        provider: Arc<dyn BenchmarkDataProvider>,
        settings: EfficiencySettings,
    ) -> Self {
        Self { provider, settings }
    }

    /// Benchmark set for the default benchmark names.
    pub async fn calculate_default_benchmarks(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BenchmarkSet> {
        let names = self.settings.benchmarks.clone();
        self.calculate_benchmarks(start, end, &names).await
    }

    /// Benchmark set for `names` over `start..=end`.
    ///
    /// The risk-free rate is read off the yield curve of 31 December of the
    /// start year, at a tenor equal to the window length in years. Provider
    /// failures are returned as they are.
    pub async fn calculate_benchmarks(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        names: &[String],
    ) -> Result<BenchmarkSet> {
        if names.len() > MAX_BENCHMARKS {
            return Err(EfficiencyError::TooManyBenchmarks(names.len()).into());
        }
        if start > end {
            return Err(ValidationError::InvalidInput(format!(
                "benchmark window start {} is after end {}",
                start, end
            ))
            .into());
        }

        let curve_date = NaiveDate::from_ymd_opt(start.year(), 12, 31).ok_or_else(|| {
            ValidationError::InvalidInput(format!("no year end for {}", start))
        })?;
        let tenor_years =
            Decimal::from((end - start).num_days()) / Decimal::from(self.settings.days_per_year);

        debug!(
            "Fetching {} benchmarks from {} over {} - {}, risk-free tenor {} years at {}",
            names.len(),
            self.provider.id(),
            start,
            end,
            tenor_years,
            curve_date
        );

        let (risk_free_rate, quotes) = futures::try_join!(
            self.provider.get_risk_free_rate(curve_date, tenor_years),
            self.provider.get_index_history(start, end, names),
        )?;

        let entries = names
            .iter()
            .map(|name| self.index_metrics(name, start, end, &quotes))
            .collect::<Result<Vec<_>>>()?;

        BenchmarkSet::new(risk_free_rate, entries)
    }

    fn index_metrics(
        &self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
        quotes: &[IndexQuote],
    ) -> Result<BenchmarkEntry> {
        let quoted: Vec<&IndexQuote> = quotes.iter().filter(|q| q.index == name).collect();

        // Days without a published close are skipped, never read as zero.
        let mut closes: Vec<(NaiveDate, Decimal)> = quoted
            .iter()
            .filter_map(|q| q.close.map(|close| (q.trade_date, close)))
            .collect();
        if closes.len() < quoted.len() {
            debug!(
                "Benchmark {}: skipped {} days without a close",
                name,
                quoted.len() - closes.len()
            );
        }
        if closes.is_empty() {
            warn!("No closes for benchmark {} between {} and {}", name, start, end);
            return Err(MarketDataError::NoDataForRange.into());
        }
        closes.sort_by_key(|(date, _)| *date);

        let records = closes
            .into_iter()
            .map(|(date, close)| {
                DailyRecord::new(date, Some(close), Decimal::ZERO, Decimal::ZERO)
            })
            .collect();
        let criteria = QueryCriteria::new()
            .with_dates(Some(start), Some(end))
            .with_isins([name]);
        let query = EfficiencyQuery::from_records(criteria, records)?;

        let efficiency = EfficiencyConfigurer::with_settings(query, self.settings.clone())?
            .add_life_time_calculation()?
            .add_twr_calculation()?
            .add_std_calculation()?
            .evaluate()?;

        match (efficiency.twr, efficiency.std) {
            (Some(twr), Some(std)) => {
                debug!("Benchmark {}: TWR {}, STD {}", name, twr, std);
                Ok(BenchmarkEntry {
                    name: name.to_string(),
                    twr,
                    std,
                })
            }
            _ => Err(EfficiencyError::InsufficientData(format!(
                "benchmark {} produced no TWR or STD",
                name
            ))
            .into()),
        }
    }
}
