pub mod settings_model;
pub mod settings_store;

pub use settings_model::EfficiencySettings;
pub use settings_store::{current, default_benchmarks, set_default_benchmarks};
