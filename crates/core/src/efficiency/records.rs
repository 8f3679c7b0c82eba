//! Raw valuation and flow records and their per-date totals.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value of one asset position on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetValue {
    pub date: NaiveDate,
    pub isin: String,
    pub full_value: Decimal,
}

/// Direction of an external cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlowDirection {
    Inflow,
    Outflow,
}

impl FlowDirection {
    pub fn sign(&self) -> Decimal {
        match self {
            FlowDirection::Inflow => Decimal::ONE,
            FlowDirection::Outflow => Decimal::NEGATIVE_ONE,
        }
    }
}

/// One external flow with the commissions charged on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFlow {
    pub date: NaiveDate,
    pub isin: String,
    /// Unsigned amount; the sign comes from `direction`
    pub full_value: Decimal,
    pub direction: FlowDirection,
    pub commission: Decimal,
    pub broker_commission: Decimal,
}

impl AssetFlow {
    pub fn signed_value(&self) -> Decimal {
        self.full_value * self.direction.sign()
    }

    pub fn total_commission(&self) -> Decimal {
        self.commission + self.broker_commission
    }
}

/// Portfolio value summed over all positions on one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationTotal {
    pub date: NaiveDate,
    pub portfolio: Decimal,
}

/// Net flow and commissions summed over one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowTotal {
    pub date: NaiveDate,
    pub flow: Decimal,
    pub commission: Decimal,
}

/// Sum asset values per date, ordered by date.
pub fn group_valuations(values: &[AssetValue]) -> Vec<ValuationTotal> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for value in values {
        *totals.entry(value.date).or_insert(Decimal::ZERO) += value.full_value;
    }
    totals
        .into_iter()
        .map(|(date, portfolio)| ValuationTotal { date, portfolio })
        .collect()
}

/// Sum signed flows and commissions per date, ordered by date.
pub fn group_flows(flows: &[AssetFlow]) -> Vec<FlowTotal> {
    let mut totals: BTreeMap<NaiveDate, (Decimal, Decimal)> = BTreeMap::new();
    for flow in flows {
        let entry = totals
            .entry(flow.date)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += flow.signed_value();
        entry.1 += flow.total_commission();
    }
    totals
        .into_iter()
        .map(|(date, (flow, commission))| FlowTotal {
            date,
            flow,
            commission,
        })
        .collect()
}

/// Distinct ISINs among the valued positions, sorted.
pub fn unique_isins(values: &[AssetValue]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.isin.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
