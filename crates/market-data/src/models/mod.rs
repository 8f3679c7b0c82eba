//! Data models shared by benchmark data providers.

mod quote;
mod yield_curve;

pub use quote::IndexQuote;
pub use yield_curve::{YieldCurve, YieldPoint};
