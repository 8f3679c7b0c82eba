//! Investment efficiency domain models.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_BENCHMARKS;
use crate::errors::{EfficiencyError, Result};

/// One day of the efficiency series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// Net asset value; `None` when nothing was valued on this date
    pub portfolio: Option<Decimal>,
    /// Signed external flow (subscriptions positive, redemptions negative)
    pub flow: Decimal,
    pub commission: Decimal,
    /// Day-over-day growth factor, 1 until derived
    pub growth: Decimal,
}

impl DailyRecord {
    pub fn new(
        date: NaiveDate,
        portfolio: Option<Decimal>,
        flow: Decimal,
        commission: Decimal,
    ) -> Self {
        Self {
            date,
            portfolio,
            flow,
            commission,
            growth: Decimal::ONE,
        }
    }

    /// Portfolio value with "no observation" read as zero.
    pub fn portfolio_or_zero(&self) -> Decimal {
        self.portfolio.unwrap_or(Decimal::ZERO)
    }
}

/// Filter description identifying which records a series was built from.
///
/// Carried next to the series as provenance; never changed once a query
/// has been generated from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub am_name: Option<String>,
    pub fund_name: Option<String>,
    pub entity_type: Option<String>,
    pub strategy_name: Option<String>,
    pub contract: Option<String>,
    pub asset_class: Option<String>,
    #[serde(default)]
    pub isins: Vec<String>,
    pub risk_type: Option<String>,
}

impl QueryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_asset_management_company(mut self, am_name: impl Into<String>) -> Self {
        self.am_name = Some(am_name.into());
        self
    }

    pub fn with_fund_name(mut self, fund_name: impl Into<String>) -> Self {
        self.fund_name = Some(fund_name.into());
        self
    }

    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy_name = Some(strategy.into());
        self
    }

    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = Some(contract.into());
        self
    }

    pub fn with_asset_class(mut self, asset_class: impl Into<String>) -> Self {
        self.asset_class = Some(asset_class.into());
        self
    }

    pub fn with_isins<I, S>(mut self, isins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.isins = isins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_risk_type(mut self, risk_type: impl Into<String>) -> Self {
        self.risk_type = Some(risk_type.into());
        self
    }

    /// Both window bounds, when the criteria fixes them.
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }
}

/// How income treats the opening day's flow and commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomePolicy {
    /// Always add the opening day's flow and commission back: they are the
    /// initial contribution, not performance.
    #[default]
    OpeningDayCorrection,
    /// Add the opening day back only when the series opens on 31 December,
    /// i.e. on a fiscal year-end balance.
    YearEndOpening,
}

impl IncomePolicy {
    /// Whether the opening day's flow and commission are added back for a
    /// series starting on `first_date`.
    pub fn corrects_opening_day(&self, first_date: NaiveDate) -> bool {
        match self {
            IncomePolicy::OpeningDayCorrection => true,
            IncomePolicy::YearEndOpening => first_date.month() == 12 && first_date.day() == 31,
        }
    }
}

/// TWR and STD of one reference index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub name: String,
    pub twr: Decimal,
    pub std: Decimal,
}

/// Up to five reference indices and a risk-free rate for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSet {
    risk_free_rate: Decimal,
    entries: Vec<BenchmarkEntry>,
}

impl BenchmarkSet {
    pub fn new(risk_free_rate: Decimal, entries: Vec<BenchmarkEntry>) -> Result<Self> {
        if entries.len() > MAX_BENCHMARKS {
            return Err(EfficiencyError::TooManyBenchmarks(entries.len()).into());
        }
        Ok(Self {
            risk_free_rate,
            entries,
        })
    }

    pub fn risk_free_rate(&self) -> Decimal {
        self.risk_free_rate
    }

    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&BenchmarkEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn twr_of(&self, name: &str) -> Option<Decimal> {
        self.get(name).map(|e| e.twr)
    }

    pub fn std_of(&self, name: &str) -> Option<Decimal> {
        self.get(name).map(|e| e.std)
    }
}

/// Result of one efficiency calculation.
///
/// A metric is `Some` only when its stage was requested; an unrequested
/// metric is absent rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Efficiency {
    /// Time-weighted rate of return, annualized
    pub twr: Option<Decimal>,
    /// Money-weighted rate of return, annualized
    pub mwr: Option<Decimal>,
    /// Annualized standard deviation of daily growth
    pub std: Option<Decimal>,
    pub income: Option<Decimal>,
    pub average_portfolio: Option<Decimal>,
    /// Days between the first and last date of the series
    pub life_time: Option<i64>,
    pub sharpe_ratio: Option<Decimal>,
    pub information_ratio: Option<Decimal>,
    pub benchmarks: Option<BenchmarkSet>,
    pub criteria: QueryCriteria,
    pub series: Vec<DailyRecord>,
}
