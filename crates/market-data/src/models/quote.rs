use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily close of a reference index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexQuote {
    /// Index identifier (e.g. "IMOEX")
    pub index: String,

    /// Trading date of the close
    pub trade_date: NaiveDate,

    /// Closing value; absent when the exchange published no close for the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Decimal>,
}

impl IndexQuote {
    pub fn new(index: impl Into<String>, trade_date: NaiveDate, close: Decimal) -> Self {
        Self {
            index: index.into(),
            trade_date,
            close: Some(close),
        }
    }
}
