//! MOEX ISS benchmark data provider.
//!
//! This module provides:
//! - Index close history via /history/engines/stock/markets/index/securities/{secid}
//! - Zero-coupon yield curve (G-curve) tenors via /engines/stock/zcyc
//!
//! ISS is public and needs no API key. History is paged; the provider walks
//! the cursor until every row in the window has been read.
//! API documentation: https://iss.moex.com/iss/reference/

mod models;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{IndexQuote, YieldCurve, YieldPoint};
use crate::provider::{IndexHistoryProvider, YieldCurveProvider};

use models::{
    parse_error, value_as_date, value_as_decimal, HistoryResponse, IssBlock, ZcycResponse,
};

const BASE_URL: &str = "https://iss.moex.com/iss";
pub(crate) const PROVIDER_ID: &str = "MOEX_ISS";

/// MOEX ISS provider for index history and the G-curve.
pub struct MoexIssProvider {
    client: Client,
    base_url: String,
}

impl Default for MoexIssProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MoexIssProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a mirror or a local stub.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Make a GET request to ISS and return the body.
    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<String, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("MOEX ISS request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .query(&[("iss.meta", "off")])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderError {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Unknown endpoint {}", path),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {} - {}", status, body),
            });
        }

        Ok(response.text().await?)
    }

    /// Fetch every history page of one index.
    async fn fetch_index(
        &self,
        index: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IndexQuote>, MarketDataError> {
        let path = format!("/history/engines/stock/markets/index/securities/{}.json", index);
        let mut quotes = Vec::new();
        let mut offset = 0usize;

        loop {
            let params = [
                ("from", start.format("%Y-%m-%d").to_string()),
                ("till", end.format("%Y-%m-%d").to_string()),
                ("start", offset.to_string()),
            ];
            let body = self.fetch(&path, &params).await?;
            let (page, total) = parse_history_page(index, &body)?;

            if page.is_empty() {
                break;
            }
            offset += page.len();
            quotes.extend(page);

            match total {
                Some(total) if offset < total => continue,
                _ => break,
            }
        }

        if quotes.is_empty() {
            return Err(MarketDataError::IndexNotFound(index.to_string()));
        }

        quotes.sort_by_key(|q| q.trade_date);
        quotes.dedup_by_key(|q| q.trade_date);
        Ok(quotes)
    }
}

/// Parse one history page. Returns the quotes and the total row count
/// reported by the cursor block, if any.
pub(crate) fn parse_history_page(
    index: &str,
    body: &str,
) -> Result<(Vec<IndexQuote>, Option<usize>), MarketDataError> {
    let response: HistoryResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(format!("Failed to parse history response: {}", e)))?;

    let history = &response.history;
    let date_col = history.column("TRADEDATE")?;
    let close_col = history.column("CLOSE")?;

    let quotes = history
        .data
        .iter()
        .map(|row| {
            let trade_date = row
                .get(date_col)
                .ok_or_else(|| parse_error("short history row".to_string()))
                .and_then(value_as_date)?;
            let close = match row.get(close_col) {
                Some(value) => value_as_decimal(value)?,
                None => None,
            };
            Ok(IndexQuote {
                index: index.to_string(),
                trade_date,
                close,
            })
        })
        .collect::<Result<Vec<_>, MarketDataError>>()?;

    let total = match &response.cursor {
        Some(cursor) => cursor_total(cursor)?,
        None => None,
    };

    Ok((quotes, total))
}

fn cursor_total(cursor: &IssBlock) -> Result<Option<usize>, MarketDataError> {
    let total_col = cursor.column("TOTAL")?;
    Ok(cursor
        .data
        .first()
        .and_then(|row| row.get(total_col))
        .and_then(|v| v.as_u64())
        .map(|v| v as usize))
}

/// Parse the `yearyields` block of a zcyc response. ISS publishes yields in
/// percent; the curve stores fractions.
pub(crate) fn parse_yield_curve(date: NaiveDate, body: &str) -> Result<YieldCurve, MarketDataError> {
    let response: ZcycResponse = serde_json::from_str(body)
        .map_err(|e| parse_error(format!("Failed to parse zcyc response: {}", e)))?;

    let block = &response.yearyields;
    let period_col = block.column("period")?;
    let value_col = block.column("value")?;
    let hundred = Decimal::ONE_HUNDRED;

    let mut points = Vec::with_capacity(block.data.len());
    for row in &block.data {
        let tenor = row.get(period_col).map(value_as_decimal).transpose()?.flatten();
        let value = row.get(value_col).map(value_as_decimal).transpose()?.flatten();
        if let (Some(tenor), Some(value)) = (tenor, value) {
            points.push(YieldPoint::new(tenor, value / hundred));
        }
    }

    YieldCurve::new(date, points)
}

#[async_trait]
impl IndexHistoryProvider for MoexIssProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_index_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        indices: &[String],
    ) -> Result<Vec<IndexQuote>, MarketDataError> {
        let mut quotes = Vec::new();
        for index in indices {
            quotes.extend(self.fetch_index(index, start, end).await?);
        }
        Ok(quotes)
    }
}

#[async_trait]
impl YieldCurveProvider for MoexIssProvider {
    async fn get_yield_curve(&self, date: NaiveDate) -> Result<YieldCurve, MarketDataError> {
        let params = [("date", date.format("%Y-%m-%d").to_string())];
        let body = self.fetch("/engines/stock/zcyc.json", &params).await?;
        parse_yield_curve(date, &body)
    }
}
