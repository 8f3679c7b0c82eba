use super::*;
use crate::errors::{EfficiencyError, Error, Result, ValidationError};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 2, day).unwrap()
}

struct InMemoryRepository {
    values: Vec<AssetValue>,
    flows: Vec<AssetFlow>,
}

impl EfficiencyRepositoryTrait for InMemoryRepository {
    fn get_asset_values(&self, criteria: &QueryCriteria) -> Result<Vec<AssetValue>> {
        Ok(self
            .values
            .iter()
            .filter(|v| criteria.isins.is_empty() || criteria.isins.contains(&v.isin))
            .cloned()
            .collect())
    }

    fn get_asset_flows(&self, criteria: &QueryCriteria) -> Result<Vec<AssetFlow>> {
        Ok(self
            .flows
            .iter()
            .filter(|f| criteria.isins.is_empty() || criteria.isins.contains(&f.isin))
            .cloned()
            .collect())
    }
}

struct FailingRepository;

impl EfficiencyRepositoryTrait for FailingRepository {
    fn get_asset_values(&self, _criteria: &QueryCriteria) -> Result<Vec<AssetValue>> {
        Err(Error::Repository("connection refused".to_string()))
    }

    fn get_asset_flows(&self, _criteria: &QueryCriteria) -> Result<Vec<AssetFlow>> {
        Ok(Vec::new())
    }
}

fn value(day: u32, isin: &str, full_value: rust_decimal::Decimal) -> AssetValue {
    AssetValue {
        date: date(day),
        isin: isin.to_string(),
        full_value,
    }
}

fn repository() -> InMemoryRepository {
    InMemoryRepository {
        values: vec![
            value(1, "ISIN_B", dec!(300)),
            value(1, "ISIN_A", dec!(700)),
            value(2, "ISIN_A", dec!(720)),
        ],
        flows: vec![AssetFlow {
            date: date(3),
            isin: "ISIN_A".to_string(),
            full_value: dec!(100),
            direction: FlowDirection::Outflow,
            commission: dec!(1),
            broker_commission: dec!(0),
        }],
    }
}

#[test]
fn test_load_assembles_series_from_repository() {
    let query = EfficiencyQuery::load(&repository(), QueryCriteria::new()).unwrap();

    assert_eq!(query.isins(), &["ISIN_A".to_string(), "ISIN_B".to_string()]);
    let records = query.records();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].portfolio, Some(dec!(1000)));
    assert_eq!(records[1].portfolio, Some(dec!(720)));
    assert_eq!(records[2].portfolio, None);
    assert_eq!(records[2].flow, dec!(-100));
    assert_eq!(records[2].commission, dec!(1));
}

#[test]
fn test_load_passes_criteria_to_repository() {
    let criteria = QueryCriteria::new().with_isins(["ISIN_B"]);
    let query = EfficiencyQuery::load(&repository(), criteria.clone()).unwrap();

    assert_eq!(query.criteria(), &criteria);
    assert_eq!(query.records().len(), 1);
    assert_eq!(query.records()[0].portfolio, Some(dec!(300)));
}

#[test]
fn test_load_rejects_inverted_window() {
    let criteria = QueryCriteria::new().with_dates(Some(date(10)), Some(date(1)));
    let result = EfficiencyQuery::load(&repository(), criteria);
    assert!(matches!(
        result,
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));
}

#[test]
fn test_load_propagates_repository_errors() {
    let result = EfficiencyQuery::load(&FailingRepository, QueryCriteria::new());
    assert!(matches!(result, Err(Error::Repository(_))));
}

#[test]
fn test_from_records_rejects_unordered_series() {
    let records = vec![
        DailyRecord::new(date(2), Some(dec!(1)), dec!(0), dec!(0)),
        DailyRecord::new(date(1), Some(dec!(1)), dec!(0), dec!(0)),
    ];
    let result = EfficiencyQuery::from_records(QueryCriteria::new(), records);
    assert!(matches!(
        result,
        Err(Error::Efficiency(EfficiencyError::UnorderedDates { .. }))
    ));
}

#[test]
fn test_from_totals_keeps_criteria_isins() {
    let criteria = QueryCriteria::new().with_isins(["ISIN_A"]);
    let query = EfficiencyQuery::from_totals(
        criteria,
        &[ValuationTotal {
            date: date(1),
            portfolio: dec!(10),
        }],
        &[],
    )
    .unwrap();

    assert_eq!(query.isins(), &["ISIN_A".to_string()]);
    assert!(!query.is_empty());
}
