//! Builds the daily efficiency series from valuation and flow totals.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use crate::errors::{EfficiencyError, Result};

use super::{DailyRecord, FlowTotal, ValuationTotal};

#[derive(Default)]
struct DaySlot {
    portfolio: Option<Decimal>,
    flow: Option<(Decimal, Decimal)>,
}

/// Merges valuation totals and flow totals into one series covering the union
/// of their dates, ascending.
///
/// Dates without a valuation keep `portfolio = None`; dates without a flow get
/// zero flow and commission. Each input must list a date at most once; a
/// repeated date is reported as [`EfficiencyError::DuplicateDate`] instead of
/// being summed.
pub fn assemble_series(
    valuations: &[ValuationTotal],
    flows: &[FlowTotal],
) -> Result<Vec<DailyRecord>> {
    let mut days: BTreeMap<NaiveDate, DaySlot> = BTreeMap::new();

    for valuation in valuations {
        let slot = days.entry(valuation.date).or_default();
        if slot.portfolio.is_some() {
            return Err(EfficiencyError::DuplicateDate(valuation.date).into());
        }
        slot.portfolio = Some(valuation.portfolio);
    }

    for flow in flows {
        let slot = days.entry(flow.date).or_default();
        if slot.flow.is_some() {
            return Err(EfficiencyError::DuplicateDate(flow.date).into());
        }
        slot.flow = Some((flow.flow, flow.commission));
    }

    debug!(
        "Assembled {} days from {} valuation and {} flow dates",
        days.len(),
        valuations.len(),
        flows.len()
    );

    Ok(days
        .into_iter()
        .map(|(date, slot)| {
            let (flow, commission) = slot.flow.unwrap_or((Decimal::ZERO, Decimal::ZERO));
            DailyRecord::new(date, slot.portfolio, flow, commission)
        })
        .collect())
}

/// Checks that `records` are strictly ascending by date.
pub fn validate_order(records: &[DailyRecord]) -> Result<()> {
    for pair in records.windows(2) {
        let (previous, current) = (pair[0].date, pair[1].date);
        if current == previous {
            return Err(EfficiencyError::DuplicateDate(current).into());
        }
        if current < previous {
            return Err(EfficiencyError::UnorderedDates { previous, current }.into());
        }
    }
    Ok(())
}
