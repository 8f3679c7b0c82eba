use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Annual yield for a single tenor, as a fraction (0.12 = 12%).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldPoint {
    pub tenor_years: Decimal,
    pub rate: Decimal,
}

impl YieldPoint {
    pub fn new(tenor_years: Decimal, rate: Decimal) -> Self {
        Self { tenor_years, rate }
    }
}

/// Zero-coupon yield curve observed on a single date.
///
/// Points are kept sorted by tenor with unique tenors. Rates between two
/// tenors are interpolated linearly; outside the observed range the nearest
/// point is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldCurve {
    pub date: NaiveDate,
    points: Vec<YieldPoint>,
}

impl YieldCurve {
    pub fn new(date: NaiveDate, mut points: Vec<YieldPoint>) -> Result<Self, MarketDataError> {
        if points.is_empty() {
            return Err(MarketDataError::YieldCurveUnavailable {
                date,
                reason: "curve has no points".to_string(),
            });
        }
        if let Some(bad) = points.iter().find(|p| p.tenor_years.is_sign_negative()) {
            return Err(MarketDataError::ValidationFailed {
                message: format!("negative tenor {} on curve {}", bad.tenor_years, date),
            });
        }

        points.sort_by(|a, b| a.tenor_years.cmp(&b.tenor_years));
        points.dedup_by(|later, earlier| later.tenor_years == earlier.tenor_years);

        Ok(Self { date, points })
    }

    pub fn points(&self) -> &[YieldPoint] {
        &self.points
    }

    /// Rate for an arbitrary tenor.
    pub fn rate_for_tenor(&self, tenor_years: Decimal) -> Decimal {
        // Non-empty by construction.
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if tenor_years <= first.tenor_years {
            return first.rate;
        }
        if tenor_years >= last.tenor_years {
            return last.rate;
        }

        for pair in self.points.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if tenor_years >= lower.tenor_years && tenor_years <= upper.tenor_years {
                let span = upper.tenor_years - lower.tenor_years;
                let weight = (tenor_years - lower.tenor_years) / span;
                return lower.rate + (upper.rate - lower.rate) * weight;
            }
        }

        last.rate
    }
}
