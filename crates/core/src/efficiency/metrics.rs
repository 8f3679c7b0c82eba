//! Metric formulas evaluated by the configurer at finalization.
//!
//! Every function returns an error instead of a sentinel when the metric has
//! no finite value, so a populated field is always a real result.

use log::warn;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, MathematicalOps};

use crate::errors::{EfficiencyError, Result};

use super::{DailyRecord, IncomePolicy};

fn undefined(message: impl Into<String>) -> crate::Error {
    EfficiencyError::UndefinedMetric(message.into()).into()
}

fn insufficient(message: impl Into<String>) -> crate::Error {
    EfficiencyError::InsufficientData(message.into()).into()
}

fn bounds<'a>(
    series: &'a [DailyRecord],
    metric: &str,
) -> Result<(&'a DailyRecord, &'a DailyRecord)> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => Ok((first, last)),
        _ => Err(insufficient(format!("{} needs a non-empty series", metric))),
    }
}

/// Days between the first and the last date.
pub fn life_time(series: &[DailyRecord]) -> Result<i64> {
    let (first, last) = bounds(series, "Life-time")?;
    Ok((last.date - first.date).num_days())
}

/// Change in value not explained by flows and commissions.
///
/// `last - first - Σflow - Σcommission`, plus the opening day's flow and
/// commission when `policy` treats them as the initial contribution.
pub fn income(series: &[DailyRecord], policy: IncomePolicy) -> Result<Decimal> {
    let (first, last) = bounds(series, "Income")?;

    let total_flow: Decimal = series.iter().map(|r| r.flow).sum();
    let total_commission: Decimal = series.iter().map(|r| r.commission).sum();

    let mut income =
        last.portfolio_or_zero() - first.portfolio_or_zero() - total_flow - total_commission;

    if policy.corrects_opening_day(first.date) {
        income += first.flow + first.commission;
    }

    Ok(income)
}

/// Mean of the non-zero portfolio values; zero when every value is zero.
pub fn average_portfolio(series: &[DailyRecord]) -> Result<Decimal> {
    if series.is_empty() {
        return Err(insufficient("Average portfolio needs a non-empty series"));
    }

    let observed: Vec<Decimal> = series
        .iter()
        .map(DailyRecord::portfolio_or_zero)
        .filter(|v| !v.is_zero())
        .collect();

    if observed.is_empty() {
        warn!(
            "Average portfolio over {} days: every value is zero",
            series.len()
        );
        return Ok(Decimal::ZERO);
    }

    let sum: Decimal = observed.iter().sum();
    Ok(sum / Decimal::from(observed.len()))
}

/// Time-weighted return: the chained growth factors annualized over
/// `life_time_days`.
pub fn twr(series: &[DailyRecord], life_time_days: i64, days_per_year: u32) -> Result<Decimal> {
    if life_time_days <= 0 {
        return Err(undefined(format!(
            "TWR cannot be annualized over a life-time of {} days",
            life_time_days
        )));
    }

    let product = series.iter().try_fold(Decimal::ONE, |acc, r| {
        acc.checked_mul(r.growth)
            .ok_or_else(|| undefined("TWR growth product overflows"))
    })?;

    if product.is_sign_negative() && !product.is_zero() {
        return Err(undefined(format!(
            "TWR of a negative growth product {}",
            product
        )));
    }
    if product.is_zero() {
        return Ok(Decimal::NEGATIVE_ONE);
    }
    if life_time_days == i64::from(days_per_year) {
        return Ok(product - Decimal::ONE);
    }

    // Decimal's exp series overflows for the large exponents short windows
    // produce, so the power itself is taken in f64.
    let base = product
        .to_f64()
        .ok_or_else(|| undefined("TWR growth product is not representable"))?;
    let exponent = f64::from(days_per_year) / life_time_days as f64;
    let annualized = base.powf(exponent) - 1.0;

    if !annualized.is_finite() {
        return Err(undefined(format!(
            "TWR annualization of {} over {} days overflows",
            product, life_time_days
        )));
    }

    Decimal::from_f64(annualized)
        .ok_or_else(|| undefined(format!("TWR {} is out of decimal range", annualized)))
}

/// Sample standard deviation of the growth factors, annualized with
/// `√trading_days_per_year`.
pub fn std(series: &[DailyRecord], trading_days_per_year: u32) -> Result<Decimal> {
    if series.len() < 2 {
        return Err(insufficient(format!(
            "STD needs at least 2 growth factors, got {}",
            series.len()
        )));
    }

    let count = Decimal::from(series.len());
    let total = series.iter().try_fold(Decimal::ZERO, |acc, r| {
        acc.checked_add(r.growth)
            .ok_or_else(|| undefined("STD growth sum overflows"))
    })?;
    let mean = total / count;

    let sum_squared_diff = series.iter().try_fold(Decimal::ZERO, |acc, r| {
        (r.growth - mean)
            .checked_mul(r.growth - mean)
            .and_then(|squared| acc.checked_add(squared))
            .ok_or_else(|| undefined("STD squared deviations overflow"))
    })?;

    let variance = sum_squared_diff / (count - Decimal::ONE);
    let daily = variance
        .sqrt()
        .ok_or_else(|| undefined(format!("STD of variance {}", variance)))?;
    let annualization = Decimal::from(trading_days_per_year)
        .sqrt()
        .ok_or_else(|| undefined("STD annualization factor"))?;

    Ok(daily * annualization)
}

/// Money-weighted return approximated as income over average capital,
/// annualized.
pub fn mwr(
    income: Decimal,
    average_portfolio: Decimal,
    life_time_days: i64,
    days_per_year: u32,
) -> Result<Decimal> {
    if average_portfolio.is_zero() {
        return Err(undefined("MWR with a zero average portfolio"));
    }
    if life_time_days <= 0 {
        return Err(undefined(format!(
            "MWR over a life-time of {} days",
            life_time_days
        )));
    }

    income
        .checked_div(average_portfolio)
        .and_then(|ratio| ratio.checked_div(Decimal::from(life_time_days)))
        .and_then(|daily| daily.checked_mul(Decimal::from(days_per_year)))
        .ok_or_else(|| undefined("MWR overflows"))
}

/// Return in excess of `reference` per unit of volatility. Used for both the
/// Sharpe ratio (reference = risk-free rate) and the information ratio
/// (reference = benchmark TWR).
pub fn excess_return_ratio(twr: Decimal, reference: Decimal, std: Decimal) -> Result<Decimal> {
    (twr - reference)
        .checked_div(std)
        .ok_or_else(|| undefined("ratio over a zero STD"))
}
