use super::*;
use crate::errors::{EfficiencyError, Error};
use crate::settings::EfficiencySettings;
use async_trait::async_trait;
use chrono::NaiveDate;
use efficiency_market_data::{
    BenchmarkDataProvider, IndexHistoryProvider, IndexQuote, MarketDataError,
    StaticMarketDataProvider, YieldCurve, YieldCurveProvider, YieldPoint,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// IMOEX gains 21% and RUPCI 10.25% over 2023; the 1y risk-free rate is 8%.
fn static_provider() -> StaticMarketDataProvider {
    StaticMarketDataProvider::new()
        .with_index(
            "IMOEX",
            vec![
                (date(2023, 1, 1), dec!(2000)),
                (date(2023, 7, 1), dec!(2200)),
                (date(2024, 1, 1), dec!(2420)),
            ],
        )
        .with_index(
            "RUPCI",
            vec![
                (date(2023, 1, 1), dec!(100)),
                (date(2023, 7, 1), dec!(105)),
                (date(2024, 1, 1), dec!(110.25)),
            ],
        )
        .with_yield_curve(
            date(2023, 12, 29),
            vec![
                YieldPoint::new(dec!(0.5), dec!(0.06)),
                YieldPoint::new(dec!(1), dec!(0.08)),
                YieldPoint::new(dec!(5), dec!(0.1)),
            ],
        )
}

fn service(provider: impl BenchmarkDataProvider + 'static) -> BenchmarkService {
    BenchmarkService::with_settings(Arc::new(provider), EfficiencySettings::default())
}

/// Delegates to a static provider and records what it was asked for.
struct RecordingProvider {
    inner: StaticMarketDataProvider,
    curve_requests: Mutex<Vec<(NaiveDate, Decimal)>>,
    history_requests: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl RecordingProvider {
    fn new(inner: StaticMarketDataProvider) -> Self {
        Self {
            inner,
            curve_requests: Mutex::new(Vec::new()),
            history_requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl IndexHistoryProvider for RecordingProvider {
    fn id(&self) -> &'static str {
        "RECORDING"
    }

    async fn get_index_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        indices: &[String],
    ) -> Result<Vec<IndexQuote>, MarketDataError> {
        self.history_requests.lock().unwrap().push((start, end));
        self.inner.get_index_history(start, end, indices).await
    }
}

#[async_trait]
impl YieldCurveProvider for RecordingProvider {
    async fn get_yield_curve(&self, date: NaiveDate) -> Result<YieldCurve, MarketDataError> {
        self.inner.get_yield_curve(date).await
    }

    async fn get_risk_free_rate(
        &self,
        curve_date: NaiveDate,
        tenor_years: Decimal,
    ) -> Result<Decimal, MarketDataError> {
        self.curve_requests
            .lock()
            .unwrap()
            .push((curve_date, tenor_years));
        let curve = self.inner.get_yield_curve(curve_date).await?;
        Ok(curve.rate_for_tenor(tenor_years))
    }
}

fn one_year_query(criteria: QueryCriteria) -> EfficiencyQuery {
    let records = vec![
        DailyRecord::new(date(2023, 1, 1), Some(dec!(100)), dec!(0), dec!(0)),
        DailyRecord::new(date(2023, 7, 1), Some(dec!(110)), dec!(0), dec!(0)),
        DailyRecord::new(date(2024, 1, 1), Some(dec!(121)), dec!(0), dec!(0)),
    ];
    EfficiencyQuery::from_records(criteria, records).unwrap()
}

#[tokio::test]
async fn test_benchmarks_for_one_year() {
    let set = service(static_provider())
        .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["IMOEX", "RUPCI"]))
        .await
        .unwrap();

    assert_eq!(set.risk_free_rate(), dec!(0.08));
    assert_eq!(set.entries().len(), 2);
    assert_eq!(set.entries()[0].name, "IMOEX");
    assert_eq!(set.twr_of("IMOEX"), Some(dec!(0.21)));
    assert_eq!(set.twr_of("RUPCI"), Some(dec!(0.1025)));
    assert!(set.std_of("IMOEX").unwrap() > Decimal::ZERO);
}

#[tokio::test]
async fn test_risk_free_rate_is_read_at_start_year_end() {
    let provider = Arc::new(RecordingProvider::new(static_provider()));
    let service =
        BenchmarkService::with_settings(provider.clone(), EfficiencySettings::default());

    service
        .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["IMOEX"]))
        .await
        .unwrap();

    let requests = provider.curve_requests.lock().unwrap().clone();
    assert_eq!(requests, vec![(date(2023, 12, 31), dec!(1))]);
}

#[tokio::test]
async fn test_more_than_five_benchmarks_is_rejected() {
    let result = service(static_provider())
        .calculate_benchmarks(
            date(2023, 1, 1),
            date(2024, 1, 1),
            &names(&["A", "B", "C", "D", "E", "F"]),
        )
        .await;

    assert!(matches!(
        result,
        Err(Error::Efficiency(EfficiencyError::TooManyBenchmarks(6)))
    ));
}

#[tokio::test]
async fn test_inverted_window_is_rejected() {
    let result = service(static_provider())
        .calculate_benchmarks(date(2024, 1, 1), date(2023, 1, 1), &names(&["IMOEX"]))
        .await;

    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_unknown_index_surfaces_provider_error() {
    let result = service(static_provider())
        .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["RUPMI"]))
        .await;

    assert!(matches!(
        result,
        Err(Error::MarketData(MarketDataError::IndexNotFound(name))) if name == "RUPMI"
    ));
}

#[tokio::test]
async fn test_missing_yield_curve_surfaces_provider_error() {
    let provider = StaticMarketDataProvider::new().with_index(
        "IMOEX",
        vec![(date(2023, 1, 1), dec!(1)), (date(2024, 1, 1), dec!(2))],
    );
    let result = service(provider)
        .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["IMOEX"]))
        .await;

    assert!(matches!(
        result,
        Err(Error::MarketData(MarketDataError::YieldCurveUnavailable { .. }))
    ));
}

#[tokio::test]
async fn test_calculate_joins_background_benchmarks() {
    let mut configurer = EfficiencyConfigurer::with_settings(
        one_year_query(QueryCriteria::new()),
        EfficiencySettings::default(),
    )
    .unwrap()
    .add_benchmarks_calculation_for(Arc::new(static_provider()), names(&["IMOEX", "RUPCI"]))
    .unwrap()
    .add_life_time_calculation()
    .unwrap()
    .add_twr_calculation()
    .unwrap()
    .add_std_calculation()
    .unwrap()
    .add_sharpe_calculation()
    .unwrap()
    .add_information_ratio_for_benchmark("RUPCI")
    .unwrap();

    let efficiency = configurer.calculate().await.unwrap();

    let twr = efficiency.twr.unwrap();
    let std = efficiency.std.unwrap();
    assert_eq!(twr, dec!(0.21));
    assert_eq!(efficiency.sharpe_ratio, Some((twr - dec!(0.08)) / std));
    assert_eq!(
        efficiency.information_ratio,
        Some((twr - dec!(0.1025)) / std)
    );

    let again = configurer.calculate().await.unwrap();
    assert_eq!(efficiency, again);
}

#[tokio::test]
async fn test_benchmark_window_prefers_criteria_dates() {
    let provider = Arc::new(RecordingProvider::new(static_provider()));
    let criteria = QueryCriteria::new().with_dates(Some(date(2023, 1, 1)), Some(date(2023, 7, 1)));

    let mut configurer =
        EfficiencyConfigurer::with_settings(one_year_query(criteria), EfficiencySettings::default())
            .unwrap()
            .add_benchmarks_calculation_for(provider.clone(), names(&["IMOEX"]))
            .unwrap();
    configurer.calculate().await.unwrap();

    let requests = provider.history_requests.lock().unwrap().clone();
    assert_eq!(requests, vec![(date(2023, 1, 1), date(2023, 7, 1))]);
}

#[tokio::test]
async fn test_evaluate_before_join_fails() {
    let configurer = EfficiencyConfigurer::with_settings(
        one_year_query(QueryCriteria::new()),
        EfficiencySettings::default(),
    )
    .unwrap()
    .add_benchmarks_calculation_for(Arc::new(static_provider()), names(&["IMOEX"]))
    .unwrap();

    assert!(matches!(
        configurer.evaluate(),
        Err(Error::Efficiency(EfficiencyError::BenchmarkTask(_)))
    ));
}

#[tokio::test]
async fn test_failed_benchmarks_leave_sharpe_uncomputable() {
    let mut configurer = EfficiencyConfigurer::with_settings(
        one_year_query(QueryCriteria::new()),
        EfficiencySettings::default(),
    )
    .unwrap()
    .add_benchmarks_calculation_for(Arc::new(static_provider()), names(&["RUPMI"]))
    .unwrap()
    .add_life_time_calculation()
    .unwrap()
    .add_twr_calculation()
    .unwrap()
    .add_std_calculation()
    .unwrap()
    .add_sharpe_calculation()
    .unwrap();

    assert!(matches!(
        configurer.calculate().await,
        Err(Error::MarketData(MarketDataError::IndexNotFound(_)))
    ));
    assert!(matches!(
        configurer.calculate().await,
        Err(Error::Efficiency(EfficiencyError::InsufficientData(_)))
    ));
}

/// IMOEX closes with a day the exchange published no value for.
struct SparseCloseProvider {
    curves: StaticMarketDataProvider,
}

#[async_trait]
impl IndexHistoryProvider for SparseCloseProvider {
    fn id(&self) -> &'static str {
        "SPARSE"
    }

    async fn get_index_history(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
        indices: &[String],
    ) -> Result<Vec<IndexQuote>, MarketDataError> {
        let closes = [
            (date(2023, 1, 1), Some(dec!(2000))),
            (date(2023, 3, 1), Some(dec!(2100))),
            (date(2023, 6, 1), None),
            (date(2023, 9, 1), Some(dec!(2300))),
            (date(2024, 1, 1), Some(dec!(2420))),
        ];
        Ok(indices
            .iter()
            .flat_map(|index| {
                closes.iter().map(move |(trade_date, close)| IndexQuote {
                    index: index.clone(),
                    trade_date: *trade_date,
                    close: if index == "IMOEX" { *close } else { None },
                })
            })
            .collect())
    }
}

#[async_trait]
impl YieldCurveProvider for SparseCloseProvider {
    async fn get_yield_curve(&self, date: NaiveDate) -> Result<YieldCurve, MarketDataError> {
        self.curves.get_yield_curve(date).await
    }
}

#[tokio::test]
async fn test_days_without_close_are_skipped() {
    let set = service(SparseCloseProvider {
        curves: static_provider(),
    })
    .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["IMOEX"]))
    .await
    .unwrap();

    let twr = set.twr_of("IMOEX").unwrap();
    assert_eq!(twr.round_dp(10), dec!(0.21));
    assert!(set.std_of("IMOEX").unwrap() < dec!(1));
}

#[tokio::test]
async fn test_index_without_any_close_has_no_data() {
    let result = service(SparseCloseProvider {
        curves: static_provider(),
    })
    .calculate_benchmarks(date(2023, 1, 1), date(2024, 1, 1), &names(&["RUPCI"]))
    .await;

    assert!(matches!(
        result,
        Err(Error::MarketData(MarketDataError::NoDataForRange))
    ));
}
