//! MOEX ISS response structures.
//!
//! ISS returns every block as a column list plus row arrays, so values are
//! looked up by column name rather than by position.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;

use super::PROVIDER_ID;

#[derive(Debug, Deserialize)]
pub(crate) struct IssBlock {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl IssBlock {
    pub fn column(&self, name: &str) -> Result<usize, MarketDataError> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .ok_or_else(|| parse_error(format!("missing column '{}'", name)))
    }
}

/// Response from /history/engines/stock/markets/index/securities/{secid}.json
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub history: IssBlock,
    #[serde(rename = "history.cursor")]
    pub cursor: Option<IssBlock>,
}

/// Response from /engines/stock/zcyc.json
#[derive(Debug, Deserialize)]
pub(crate) struct ZcycResponse {
    pub yearyields: IssBlock,
}

pub(crate) fn parse_error(message: String) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message,
    }
}

pub(crate) fn value_as_decimal(value: &Value) -> Result<Option<Decimal>, MarketDataError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map(Some)
                .map_err(|e| MarketDataError::ValidationFailed {
                    message: format!("invalid number '{}': {}", text, e),
                })
        }
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Decimal::from_str(s)
            .map(Some)
            .map_err(|e| MarketDataError::ValidationFailed {
                message: format!("invalid number '{}': {}", s, e),
            }),
        other => Err(MarketDataError::ValidationFailed {
            message: format!("expected a number, got {}", other),
        }),
    }
}

pub(crate) fn value_as_date(value: &Value) -> Result<NaiveDate, MarketDataError> {
    let text = value
        .as_str()
        .ok_or_else(|| parse_error(format!("expected a date string, got {}", value)))?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| parse_error(format!("invalid date '{}': {}", text, e)))
}
