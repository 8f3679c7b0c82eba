//! Staged efficiency calculator.
//!
//! Each `add_*` call checks that the stages it reads were added before it,
//! then registers a deferred computation. Nothing touches the series until
//! [`EfficiencyConfigurer::calculate`] (or [`EfficiencyConfigurer::evaluate`]),
//! which runs the registered computations in [`Metric`] order regardless of
//! the order they were added in.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use efficiency_market_data::BenchmarkDataProvider;
use log::{debug, error};
use rust_decimal::Decimal;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::constants::MAX_BENCHMARKS;
use crate::errors::{EfficiencyError, Result};
use crate::settings::{self, EfficiencySettings};

use super::growth_rates::calculate_growth_rates;
use super::metrics;
use super::{
    BenchmarkService, BenchmarkSet, CalculationStage, DailyRecord, Efficiency, EfficiencyQuery,
    GrowthSuppressionPolicy, IncomePolicy, Metric, QueryCriteria,
};

/// A deferred computation. It reads the series and the metrics evaluated
/// before it, and writes its own field.
type StagedComputation = Box<dyn Fn(&[DailyRecord], &mut Efficiency) -> Result<()> + Send + Sync>;

pub struct EfficiencyConfigurer {
    criteria: QueryCriteria,
    series: Vec<DailyRecord>,
    settings: EfficiencySettings,
    stages: CalculationStage,
    computations: BTreeMap<Metric, StagedComputation>,
    benchmarks: Option<BenchmarkSet>,
    pending_benchmarks: Option<JoinHandle<Result<BenchmarkSet>>>,
}

impl Efficiency {
    /// Start configuring a calculation over `query` with the process-wide settings.
    pub fn configure(query: EfficiencyQuery) -> Result<EfficiencyConfigurer> {
        EfficiencyConfigurer::new(query)
    }

    /// Like [`Efficiency::configure`], with the default benchmarks already
    /// being fetched in the background.
    pub fn configure_with_benchmarks(
        query: EfficiencyQuery,
        provider: Arc<dyn BenchmarkDataProvider>,
    ) -> Result<EfficiencyConfigurer> {
        EfficiencyConfigurer::new(query)?.add_benchmarks_calculation(provider)
    }
}

impl EfficiencyConfigurer {
    pub fn new(query: EfficiencyQuery) -> Result<Self> {
        Self::with_settings(query, settings::current())
    }

    pub fn with_settings(query: EfficiencyQuery, settings: EfficiencySettings) -> Result<Self> {
        settings.validate()?;
        let policy = settings.growth_policy();
        Self::with_growth_policy(query, settings, &policy)
    }

    /// Derives growth factors with `policy` instead of the one the settings describe.
    pub fn with_growth_policy(
        query: EfficiencyQuery,
        settings: EfficiencySettings,
        policy: &dyn GrowthSuppressionPolicy,
    ) -> Result<Self> {
        let (criteria, records) = query.into_parts();
        let series = calculate_growth_rates(records, policy)?;

        Ok(Self {
            criteria,
            series,
            settings,
            stages: CalculationStage::GROWTH_RATES,
            computations: BTreeMap::new(),
            benchmarks: None,
            pending_benchmarks: None,
        })
    }

    /// Stages completed so far.
    pub fn stages(&self) -> CalculationStage {
        self.stages
    }

    /// The series with growth factors attached.
    pub fn series(&self) -> &[DailyRecord] {
        &self.series
    }

    pub fn add_life_time_calculation(mut self) -> Result<Self> {
        self.stage(
            Metric::LifeTime,
            CalculationStage::LIFE_TIME,
            CalculationStage::INITIALIZED,
            deferred(|series, efficiency| {
                efficiency.life_time = Some(metrics::life_time(series)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Income under the configured [`IncomePolicy`].
    pub fn add_income_calculation(self) -> Result<Self> {
        let policy = self.settings.income_policy;
        self.add_income_calculation_with(policy)
    }

    pub fn add_income_calculation_with(mut self, policy: IncomePolicy) -> Result<Self> {
        self.stage(
            Metric::Income,
            CalculationStage::INCOME,
            CalculationStage::INITIALIZED,
            deferred(move |series, efficiency| {
                efficiency.income = Some(metrics::income(series, policy)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    pub fn add_average_portfolio_calculation(mut self) -> Result<Self> {
        self.stage(
            Metric::AveragePortfolio,
            CalculationStage::AVERAGE_PORTFOLIO,
            CalculationStage::INITIALIZED,
            deferred(|series, efficiency| {
                efficiency.average_portfolio = Some(metrics::average_portfolio(series)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    pub fn add_twr_calculation(mut self) -> Result<Self> {
        let days_per_year = self.settings.days_per_year;
        self.stage(
            Metric::Twr,
            CalculationStage::TWR,
            CalculationStage::GROWTH_RATES | CalculationStage::LIFE_TIME,
            deferred(move |series, efficiency| {
                let life_time = evaluated(efficiency.life_time, Metric::LifeTime)?;
                efficiency.twr = Some(metrics::twr(series, life_time, days_per_year)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    pub fn add_std_calculation(mut self) -> Result<Self> {
        let trading_days = self.settings.trading_days_per_year;
        self.stage(
            Metric::Std,
            CalculationStage::STD,
            CalculationStage::GROWTH_RATES,
            deferred(move |series, efficiency| {
                efficiency.std = Some(metrics::std(series, trading_days)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    pub fn add_mwr_calculation(mut self) -> Result<Self> {
        let days_per_year = self.settings.days_per_year;
        self.stage(
            Metric::Mwr,
            CalculationStage::INITIALIZED,
            CalculationStage::INCOME
                | CalculationStage::AVERAGE_PORTFOLIO
                | CalculationStage::LIFE_TIME,
            deferred(move |_, efficiency| {
                let income = evaluated(efficiency.income, Metric::Income)?;
                let average = evaluated(efficiency.average_portfolio, Metric::AveragePortfolio)?;
                let life_time = evaluated(efficiency.life_time, Metric::LifeTime)?;
                efficiency.mwr = Some(metrics::mwr(income, average, life_time, days_per_year)?);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Sharpe ratio against the risk-free rate of the attached benchmark set.
    pub fn add_sharpe_calculation(mut self) -> Result<Self> {
        self.stage(
            Metric::SharpeRatio,
            CalculationStage::INITIALIZED,
            CalculationStage::TWR | CalculationStage::STD | CalculationStage::BENCHMARKS,
            deferred(|_, efficiency| {
                let risk_free_rate = attached_benchmarks(efficiency, Metric::SharpeRatio)?
                    .risk_free_rate();
                let ratio = excess_ratio(efficiency, risk_free_rate)?;
                efficiency.sharpe_ratio = Some(ratio);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Sharpe ratio against a risk-free rate supplied by the caller.
    pub fn add_sharpe_calculation_with_rate(mut self, risk_free_rate: Decimal) -> Result<Self> {
        self.stage(
            Metric::SharpeRatio,
            CalculationStage::INITIALIZED,
            CalculationStage::TWR | CalculationStage::STD,
            deferred(move |_, efficiency| {
                let ratio = excess_ratio(efficiency, risk_free_rate)?;
                efficiency.sharpe_ratio = Some(ratio);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Information ratio against a benchmark TWR supplied by the caller.
    pub fn add_information_ratio_calculation(mut self, index_twr: Decimal) -> Result<Self> {
        self.stage(
            Metric::InformationRatio,
            CalculationStage::INITIALIZED,
            CalculationStage::TWR | CalculationStage::STD | CalculationStage::BENCHMARKS,
            deferred(move |_, efficiency| {
                let ratio = excess_ratio(efficiency, index_twr)?;
                efficiency.information_ratio = Some(ratio);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Information ratio against the TWR of `benchmark` in the attached set.
    pub fn add_information_ratio_for_benchmark(
        mut self,
        benchmark: impl Into<String>,
    ) -> Result<Self> {
        let benchmark = benchmark.into();
        self.stage(
            Metric::InformationRatio,
            CalculationStage::INITIALIZED,
            CalculationStage::TWR | CalculationStage::STD | CalculationStage::BENCHMARKS,
            deferred(move |_, efficiency| {
                let index_twr = attached_benchmarks(efficiency, Metric::InformationRatio)?
                    .twr_of(&benchmark)
                    .ok_or_else(|| EfficiencyError::UnknownBenchmark(benchmark.clone()))?;
                let ratio = excess_ratio(efficiency, index_twr)?;
                efficiency.information_ratio = Some(ratio);
                Ok(())
            }),
        )?;
        Ok(self)
    }

    /// Fetch the default benchmarks for this series' window in the background.
    pub fn add_benchmarks_calculation(
        self,
        provider: Arc<dyn BenchmarkDataProvider>,
    ) -> Result<Self> {
        let names = self.settings.benchmarks.clone();
        self.add_benchmarks_calculation_for(provider, names)
    }

    /// Fetch `names` for this series' window in the background.
    ///
    /// Spawns one task on the current Tokio runtime; it is joined by
    /// [`EfficiencyConfigurer::calculate`]. Calling this again replaces the
    /// pending task.
    pub fn add_benchmarks_calculation_for(
        mut self,
        provider: Arc<dyn BenchmarkDataProvider>,
        names: Vec<String>,
    ) -> Result<Self> {
        if names.len() > MAX_BENCHMARKS {
            return Err(EfficiencyError::TooManyBenchmarks(names.len()).into());
        }
        let runtime = Handle::try_current().map_err(|_| EfficiencyError::NoRuntime)?;
        let (start, end) = self.benchmark_window()?;

        debug!(
            "Spawning benchmark calculation for {:?} over {} - {}",
            names, start, end
        );
        let service = BenchmarkService::with_settings(provider, self.settings.clone());
        let task =
            runtime.spawn(async move { service.calculate_benchmarks(start, end, &names).await });

        if let Some(previous) = self.pending_benchmarks.replace(task) {
            previous.abort();
        }
        self.benchmarks = None;
        self.stages |= CalculationStage::BENCHMARKS;
        Ok(self)
    }

    /// Attach a benchmark set computed elsewhere.
    pub fn use_benchmarks(mut self, benchmarks: BenchmarkSet) -> Self {
        if let Some(previous) = self.pending_benchmarks.take() {
            previous.abort();
        }
        self.benchmarks = Some(benchmarks);
        self.stages |= CalculationStage::BENCHMARKS;
        self
    }

    /// Join the benchmark task, if one is pending, then evaluate.
    pub async fn calculate(&mut self) -> Result<Efficiency> {
        if let Some(task) = self.pending_benchmarks.take() {
            debug!("Waiting for benchmark calculation");
            match task.await {
                Ok(Ok(benchmarks)) => self.benchmarks = Some(benchmarks),
                Ok(Err(e)) => {
                    error!("Benchmark calculation failed: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Benchmark calculation task did not complete: {}", e);
                    return Err(EfficiencyError::BenchmarkTask(e.to_string()).into());
                }
            }
        }
        self.evaluate()
    }

    /// Evaluate every staged computation. Fails if a benchmark task is still
    /// pending; use [`EfficiencyConfigurer::calculate`] to join it.
    pub fn evaluate(&self) -> Result<Efficiency> {
        if self.pending_benchmarks.is_some() {
            return Err(EfficiencyError::BenchmarkTask(
                "benchmark calculation has not been joined".to_string(),
            )
            .into());
        }

        let mut efficiency = Efficiency {
            criteria: self.criteria.clone(),
            series: self.series.clone(),
            benchmarks: self.benchmarks.clone(),
            ..Default::default()
        };

        for (metric, computation) in &self.computations {
            debug!("Evaluating {}", metric);
            computation(&self.series, &mut efficiency)?;
        }

        Ok(efficiency)
    }

    fn stage(
        &mut self,
        metric: Metric,
        completes: CalculationStage,
        requires: CalculationStage,
        computation: StagedComputation,
    ) -> Result<()> {
        let missing = requires.difference(self.stages);
        if !missing.is_empty() {
            return Err(EfficiencyError::PrerequisiteMissing { metric, missing }.into());
        }

        debug!("Staged {} calculation", metric);
        self.computations.insert(metric, computation);
        self.stages |= completes;
        Ok(())
    }

    fn benchmark_window(&self) -> Result<(NaiveDate, NaiveDate)> {
        if let Some(window) = self.criteria.window() {
            return Ok(window);
        }
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) => Ok((first.date, last.date)),
            _ => Err(EfficiencyError::MissingBenchmarkWindow.into()),
        }
    }
}

fn deferred<F>(computation: F) -> StagedComputation
where
    F: Fn(&[DailyRecord], &mut Efficiency) -> Result<()> + Send + Sync + 'static,
{
    Box::new(computation)
}

/// Value of a metric evaluated earlier in the same run.
fn evaluated<T>(value: Option<T>, metric: Metric) -> Result<T> {
    value.ok_or_else(|| {
        EfficiencyError::InsufficientData(format!("{} was not evaluated", metric)).into()
    })
}

fn attached_benchmarks(efficiency: &Efficiency, metric: Metric) -> Result<&BenchmarkSet> {
    efficiency.benchmarks.as_ref().ok_or_else(|| {
        EfficiencyError::InsufficientData(format!("{} needs a benchmark set", metric)).into()
    })
}

fn excess_ratio(efficiency: &Efficiency, reference: Decimal) -> Result<Decimal> {
    let twr = evaluated(efficiency.twr, Metric::Twr)?;
    let std = evaluated(efficiency.std, Metric::Std)?;
    metrics::excess_return_ratio(twr, reference, std)
}
