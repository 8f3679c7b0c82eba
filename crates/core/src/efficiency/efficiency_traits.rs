//! Repository trait for the records an efficiency series is built from.

use crate::errors::Result;

use super::{AssetFlow, AssetValue, QueryCriteria};

/// Read access to position values and external flows.
pub trait EfficiencyRepositoryTrait: Send + Sync {
    /// Position values matching `criteria`, one row per asset and date.
    fn get_asset_values(&self, criteria: &QueryCriteria) -> Result<Vec<AssetValue>>;

    /// External flows matching `criteria`, with the commissions charged on them.
    fn get_asset_flows(&self, criteria: &QueryCriteria) -> Result<Vec<AssetFlow>>;
}
