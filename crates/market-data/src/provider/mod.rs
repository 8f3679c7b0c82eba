//! Benchmark data provider abstractions and implementations.
//!
//! This module contains:
//! - The `IndexHistoryProvider` and `YieldCurveProvider` traits
//! - `BenchmarkDataProvider`, implemented by anything that offers both
//! - An in-memory provider and the MOEX ISS provider

mod traits;

pub mod moex;
pub mod static_provider;

pub use traits::{BenchmarkDataProvider, IndexHistoryProvider, YieldCurveProvider};
