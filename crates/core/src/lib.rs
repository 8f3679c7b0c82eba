//! Efficiency Core - Investment efficiency metrics.
//!
//! This crate turns per-date portfolio valuations and cash flows into a
//! gap-free daily series, derives daily growth factors from it and computes
//! the headline metrics (TWR, MWR, STD, income, average portfolio, life-time,
//! Sharpe and information ratios) through a staged calculator. Benchmark
//! comparison data comes from the `efficiency-market-data` crate.

pub mod constants;
pub mod efficiency;
pub mod errors;
pub mod settings;

pub use efficiency::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
