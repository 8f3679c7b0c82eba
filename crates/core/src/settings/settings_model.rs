use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DAYS_PER_YEAR, DEFAULT_BENCHMARKS, DEFAULT_SUPPRESSION_THRESHOLD_THOUSANDS, MAX_BENCHMARKS,
    TRADING_DAYS_PER_YEAR,
};
use crate::efficiency::{IncomePolicy, ThousandsTruncationPolicy};
use crate::errors::{EfficiencyError, Error, Result};

/// Calculation defaults shared by every efficiency run in the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EfficiencySettings {
    /// Reference indices compared against when the caller names none
    pub benchmarks: Vec<String>,
    pub income_policy: IncomePolicy,
    /// Minimum portfolio value, in thousands, at which a flow matching the
    /// value suppresses that day's growth
    pub suppression_threshold_thousands: i64,
    pub trading_days_per_year: u32,
    pub days_per_year: u32,
}

impl Default for EfficiencySettings {
    fn default() -> Self {
        Self {
            benchmarks: DEFAULT_BENCHMARKS.iter().map(|s| s.to_string()).collect(),
            income_policy: IncomePolicy::default(),
            suppression_threshold_thousands: DEFAULT_SUPPRESSION_THRESHOLD_THOUSANDS,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            days_per_year: DAYS_PER_YEAR,
        }
    }
}

impl EfficiencySettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.benchmarks.len() > MAX_BENCHMARKS {
            return Err(EfficiencyError::TooManyBenchmarks(self.benchmarks.len()).into());
        }
        if let Some(blank) = self.benchmarks.iter().find(|b| b.trim().is_empty()) {
            return Err(Error::InvalidConfigValue(format!(
                "benchmark name '{}' is blank",
                blank
            )));
        }
        if self.suppression_threshold_thousands < 0 {
            return Err(Error::InvalidConfigValue(format!(
                "suppressionThresholdThousands must not be negative, got {}",
                self.suppression_threshold_thousands
            )));
        }
        if self.trading_days_per_year == 0 || self.days_per_year == 0 {
            return Err(Error::InvalidConfigValue(
                "tradingDaysPerYear and daysPerYear must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The large-flow suppression policy these settings describe.
    pub fn growth_policy(&self) -> ThousandsTruncationPolicy {
        ThousandsTruncationPolicy {
            threshold_thousands: self.suppression_threshold_thousands,
        }
    }
}
