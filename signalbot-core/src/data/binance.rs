//! Binance spot klines provider.
//!
//! Fetches recent candles from `GET /api/v3/klines`. Each kline is a JSON
//! array: `[open_time, open, high, low, close, volume, close_time, ...]` with
//! prices and volume encoded as strings. Transport failures and 5xx responses
//! are retried with exponential backoff; malformed rows are never retried.
//! An unreadable price fails the row; an unreadable volume is kept as NaN.

use super::provider::{parse_numeric, parse_volume, DataError, MarketDataSource};
use crate::domain::{Candle, CandleField};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Largest `limit` the klines endpoint accepts.
pub const MAX_KLINES_LIMIT: u32 = 1000;

/// Binance klines provider.
pub struct BinanceKlines {
    client: reqwest::blocking::Client,
    base_url: String,
    limit: u32,
    max_retries: u32,
    base_delay: Duration,
}

impl BinanceKlines {
    pub fn new(base_url: impl Into<String>, limit: u32) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limit,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    /// Build the klines URL for a symbol and interval.
    fn klines_url(&self, symbol: &str, interval: &str) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={interval}&limit={}",
            self.base_url,
            symbol.to_uppercase(),
            self.limit
        )
    }

    /// Parse a klines response body into candles.
    pub fn parse_klines(rows: &[Vec<serde_json::Value>]) -> Result<Vec<Candle>, DataError> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() < 7 {
                    return Err(DataError::ResponseFormatChanged(format!(
                        "kline {index} has {} fields, expected at least 7",
                        row.len()
                    )));
                }
                let time = |i: usize| {
                    row[i].as_i64().ok_or_else(|| {
                        DataError::ResponseFormatChanged(format!(
                            "kline {index} field {i} is not an integer timestamp"
                        ))
                    })
                };
                Ok(Candle {
                    open_time: time(0)?,
                    open: parse_numeric(&row[1], index, CandleField::Open)?,
                    high: parse_numeric(&row[2], index, CandleField::High)?,
                    low: parse_numeric(&row[3], index, CandleField::Low)?,
                    close: parse_numeric(&row[4], index, CandleField::Close)?,
                    volume: parse_volume(&row[5]),
                    close_time: time(6)?,
                })
            })
            .collect()
    }

    fn fetch_with_retry(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>, DataError> {
        let url = self.klines_url(symbol, interval);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                debug!(attempt, ?delay, "retrying klines request");
                std::thread::sleep(delay);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(attempt, error = %e, "klines request failed");
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
            };

            let status = resp.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                || status == reqwest::StatusCode::IM_A_TEAPOT
            {
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
            }

            if status == reqwest::StatusCode::BAD_REQUEST {
                // Binance answers unknown symbols with 400 / code -1121
                let body = resp.text().unwrap_or_default();
                if body.contains("-1121") {
                    return Err(DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    });
                }
                return Err(DataError::Other(format!("HTTP 400 for {symbol}: {body}")));
            }

            if status.is_server_error() {
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            if !status.is_success() {
                return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
            }

            let rows: Vec<Vec<serde_json::Value>> = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!(
                    "failed to parse klines for {symbol}: {e}"
                ))
            })?;

            return Self::parse_klines(&rows);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl MarketDataSource for BinanceKlines {
    fn name(&self) -> &str {
        "binance"
    }

    fn fetch_candles(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>, DataError> {
        self.fetch_with_retry(symbol, interval)
    }
}
