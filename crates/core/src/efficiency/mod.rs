//! Investment efficiency: daily series assembly, growth factors and the
//! staged metrics calculator.

pub mod benchmark_service;
pub mod calculation_stage;
pub mod efficiency_configurer;
pub mod efficiency_model;
pub mod efficiency_query;
pub mod efficiency_traits;
pub mod growth_rates;
pub mod metrics;
pub mod records;
pub mod report;
pub mod series_assembler;

pub use benchmark_service::BenchmarkService;
pub use calculation_stage::{CalculationStage, Metric};
pub use efficiency_configurer::EfficiencyConfigurer;
pub use efficiency_model::*;
pub use efficiency_query::EfficiencyQuery;
pub use efficiency_traits::EfficiencyRepositoryTrait;
pub use growth_rates::{
    calculate_growth_rates, GrowthSuppressionPolicy, NoSuppression, ThousandsTruncationPolicy,
};
pub use records::{
    group_flows, group_valuations, unique_isins, AssetFlow, AssetValue, FlowDirection, FlowTotal,
    ValuationTotal,
};
pub use series_assembler::{assemble_series, validate_order};

#[cfg(test)]
mod benchmark_service_tests;
#[cfg(test)]
mod efficiency_query_tests;
#[cfg(test)]
mod series_assembler_tests;
