//! Plain-text rendering of an efficiency result.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::DISPLAY_DECIMAL_PRECISION;

use super::Efficiency;

const NOT_CALCULATED: &str = "n/a";

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

fn percent(value: Decimal, dp: u32) -> String {
    format!("{}%", fixed(value * Decimal::ONE_HUNDRED, dp))
}

fn optional_percent(value: Option<Decimal>) -> String {
    value.map_or_else(
        || NOT_CALCULATED.to_string(),
        |v| percent(v, DISPLAY_DECIMAL_PRECISION),
    )
}

fn optional_amount(value: Option<Decimal>) -> String {
    value.map_or_else(
        || NOT_CALCULATED.to_string(),
        |v| fixed(v, DISPLAY_DECIMAL_PRECISION),
    )
}

fn optional_text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let criteria = &self.criteria;
        writeln!(f, "AM: {}", optional_text(criteria.am_name.as_deref()))?;
        writeln!(f, "FUND: {}", optional_text(criteria.fund_name.as_deref()))?;
        writeln!(f, "PN/PR: {}", optional_text(criteria.entity_type.as_deref()))?;
        writeln!(f, "STR: {}", optional_text(criteria.strategy_name.as_deref()))?;
        writeln!(f, "DDU: {}", optional_text(criteria.contract.as_deref()))?;
        writeln!(f, "ASSET CL.: {}", optional_text(criteria.asset_class.as_deref()))?;
        writeln!(f, "RISK: {}", optional_text(criteria.risk_type.as_deref()))?;
        writeln!(f, "ISINs: {}", criteria.isins.join(" "))?;
        writeln!(f)?;

        writeln!(f, "TWR: {}", optional_percent(self.twr))?;
        writeln!(f, "MWR: {}", optional_percent(self.mwr))?;
        writeln!(f, "STD: {}", optional_percent(self.std))?;
        writeln!(f, "INC: {}", optional_amount(self.income))?;
        writeln!(f, "AVG: {}", optional_amount(self.average_portfolio))?;
        match self.life_time {
            Some(days) => writeln!(f, "LFT: {}", days)?,
            None => writeln!(f, "LFT: {}", NOT_CALCULATED)?,
        }
        writeln!(f, "SHARPE: {}", optional_amount(self.sharpe_ratio))?;
        writeln!(f, "IR: {}", optional_amount(self.information_ratio))?;

        if let Some(benchmarks) = &self.benchmarks {
            writeln!(f)?;
            writeln!(
                f,
                "RISK-FREE: {}",
                percent(benchmarks.risk_free_rate(), DISPLAY_DECIMAL_PRECISION)
            )?;
            for entry in benchmarks.entries() {
                writeln!(
                    f,
                    "{}: TWR {} | STD {}",
                    entry.name,
                    percent(entry.twr, DISPLAY_DECIMAL_PRECISION),
                    percent(entry.std, DISPLAY_DECIMAL_PRECISION)
                )?;
            }
        }

        writeln!(f)?;
        for record in &self.series {
            writeln!(
                f,
                "{} | {} | {} | {} | {}",
                record.date.format("%d.%m.%Y"),
                fixed(record.portfolio_or_zero(), DISPLAY_DECIMAL_PRECISION),
                fixed(record.flow, DISPLAY_DECIMAL_PRECISION),
                fixed(record.commission, DISPLAY_DECIMAL_PRECISION),
                percent(record.growth, 1)
            )?;
        }
        Ok(())
    }
}
