//! A filtered, assembled daily series ready for configuration.

use log::debug;

use crate::errors::{Result, ValidationError};

use super::records::{group_flows, group_valuations, unique_isins};
use super::series_assembler::{assemble_series, validate_order};
use super::{DailyRecord, EfficiencyRepositoryTrait, FlowTotal, QueryCriteria, ValuationTotal};

/// Daily series plus the criteria it was selected by.
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyQuery {
    criteria: QueryCriteria,
    records: Vec<DailyRecord>,
    isins: Vec<String>,
}

impl EfficiencyQuery {
    /// Loads values and flows for `criteria` and assembles the daily series.
    pub fn load(repository: &dyn EfficiencyRepositoryTrait, criteria: QueryCriteria) -> Result<Self> {
        if let (Some(start), Some(end)) = (criteria.start_date, criteria.end_date) {
            if start > end {
                return Err(ValidationError::InvalidInput(format!(
                    "start date {} is after end date {}",
                    start, end
                ))
                .into());
            }
        }

        let values = repository.get_asset_values(&criteria)?;
        let flows = repository.get_asset_flows(&criteria)?;
        debug!(
            "Loaded {} asset values and {} flows for {:?}",
            values.len(),
            flows.len(),
            criteria
        );

        let isins = unique_isins(&values);
        let records = assemble_series(&group_valuations(&values), &group_flows(&flows))?;

        Ok(Self {
            criteria,
            records,
            isins,
        })
    }

    /// Assembles a series from totals already grouped by date.
    pub fn from_totals(
        criteria: QueryCriteria,
        valuations: &[ValuationTotal],
        flows: &[FlowTotal],
    ) -> Result<Self> {
        let records = assemble_series(valuations, flows)?;
        Ok(Self {
            isins: criteria.isins.clone(),
            criteria,
            records,
        })
    }

    /// Wraps records that are already one per date, ascending.
    pub fn from_records(criteria: QueryCriteria, records: Vec<DailyRecord>) -> Result<Self> {
        validate_order(&records)?;
        Ok(Self {
            isins: criteria.isins.clone(),
            criteria,
            records,
        })
    }

    pub fn criteria(&self) -> &QueryCriteria {
        &self.criteria
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Distinct ISINs that contributed a value to the series.
    pub fn isins(&self) -> &[String] {
        &self.isins
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_parts(self) -> (QueryCriteria, Vec<DailyRecord>) {
        (self.criteria, self.records)
    }
}
