//! Efficiency Market Data Crate
//!
//! This crate provides the benchmark data that investment efficiency
//! calculations compare a portfolio against.
//!
//! # Overview
//!
//! - Daily close series of reference indices
//! - Zero-coupon yield curves for the risk-free rate
//! - Provider traits so the calculation never depends on a concrete source
//!
//! # Core Types
//!
//! - [`IndexQuote`] - One daily close of a reference index
//! - [`YieldCurve`] - Tenor/yield points observed on a date
//! - [`BenchmarkDataProvider`] - Index history plus yield curve access
//! - [`MarketDataError`] - Failures surfaced by providers, never retried here

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{IndexQuote, YieldCurve, YieldPoint};
pub use provider::moex::MoexIssProvider;
pub use provider::static_provider::StaticMarketDataProvider;
pub use provider::{BenchmarkDataProvider, IndexHistoryProvider, YieldCurveProvider};
