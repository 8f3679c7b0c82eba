//! Daily growth factors of an efficiency series.
//!
//! growth[i] = (value[i] - flow[i] - commission[i]) / value[i-1]
//!
//! The first record, and any record following a day without a usable value,
//! keeps growth 1. A [`GrowthSuppressionPolicy`] may also pin growth to 1 on
//! days where a flow is as large as the whole portfolio.

use log::warn;
use rust_decimal::Decimal;

use crate::constants::DEFAULT_SUPPRESSION_THRESHOLD_THOUSANDS;
use crate::errors::{EfficiencyError, Result};

use super::DailyRecord;

/// Decides whether a day's growth is forced to 1 because its flow would
/// otherwise distort the factor.
pub trait GrowthSuppressionPolicy: Send + Sync {
    fn suppresses(&self, portfolio: Decimal, flow: Decimal) -> bool;
}

/// Suppresses growth when the portfolio, in whole thousands, is above
/// `threshold_thousands` and equals the flow in whole thousands.
///
/// On such a day almost the whole value is new money, so
/// `value - flow` is close to zero and the factor says nothing about
/// investment performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThousandsTruncationPolicy {
    pub threshold_thousands: i64,
}

impl Default for ThousandsTruncationPolicy {
    fn default() -> Self {
        Self {
            threshold_thousands: DEFAULT_SUPPRESSION_THRESHOLD_THOUSANDS,
        }
    }
}

impl GrowthSuppressionPolicy for ThousandsTruncationPolicy {
    fn suppresses(&self, portfolio: Decimal, flow: Decimal) -> bool {
        let thousand = Decimal::ONE_THOUSAND;
        let portfolio_thousands = (portfolio / thousand).floor();
        portfolio_thousands > Decimal::from(self.threshold_thousands)
            && portfolio_thousands == (flow / thousand).floor()
    }
}

/// Never suppresses; every day uses the raw formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoSuppression;

impl GrowthSuppressionPolicy for NoSuppression {
    fn suppresses(&self, _portfolio: Decimal, _flow: Decimal) -> bool {
        false
    }
}

/// Attach growth factors to an ascending series.
pub fn calculate_growth_rates(
    mut records: Vec<DailyRecord>,
    policy: &dyn GrowthSuppressionPolicy,
) -> Result<Vec<DailyRecord>> {
    let mut previous: Option<Decimal> = None;
    let mut suppressed = 0usize;

    for record in records.iter_mut() {
        let portfolio = record.portfolio_or_zero();

        record.growth = match previous {
            None => Decimal::ONE,
            Some(prev) if prev.is_zero() => Decimal::ONE,
            Some(_) if policy.suppresses(portfolio, record.flow) => {
                suppressed += 1;
                Decimal::ONE
            }
            Some(prev) => (portfolio - record.flow - record.commission)
                .checked_div(prev)
                .ok_or_else(|| {
                    EfficiencyError::UndefinedMetric(format!(
                        "growth rate on {} overflows",
                        record.date
                    ))
                })?,
        };

        previous = record.portfolio;
    }

    if suppressed > 0 {
        warn!("Growth pinned to 1 on {} large-flow days", suppressed);
    }

    Ok(records)
}
