//! Market data source trait and structured error types.
//!
//! The MarketDataSource trait abstracts over candle sources (Binance REST,
//! CSV files) so the controller can be driven live, offline, or by test fakes.

use crate::domain::{Candle, CandleField};
use thiserror::Error;

/// Structured error types for candle fetches.
///
/// These are designed to be displayable in both logs and notifications.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("malformed candle at index {index}: {field} is not numeric")]
    MalformedCandle { index: usize, field: CandleField },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for candle sources.
///
/// `fetch_candles` returns candles ordered oldest to newest. Implementations
/// own their transport concerns (timeouts, retries); callers see one pull.
pub trait MarketDataSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the most recent candles for a symbol at an interval (e.g. "15m").
    fn fetch_candles(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>, DataError>;
}

fn numeric(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Parse a price cell that may be a JSON number or a numeric string.
pub(crate) fn parse_numeric(
    value: &serde_json::Value,
    index: usize,
    field: CandleField,
) -> Result<f64, DataError> {
    numeric(value).ok_or(DataError::MalformedCandle { index, field })
}

/// Volume feeds no indicator, so an unreadable cell becomes NaN instead of
/// failing the candle.
pub(crate) fn parse_volume(value: &serde_json::Value) -> f64 {
    numeric(value).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_strings_and_numbers() {
        assert_eq!(parse_numeric(&json!("34.12"), 0, CandleField::Close).unwrap(), 34.12);
        assert_eq!(parse_numeric(&json!(7), 0, CandleField::Close).unwrap(), 7.0);
    }

    #[test]
    fn rejects_non_numeric() {
        let err = parse_numeric(&json!("abc"), 3, CandleField::Close).unwrap_err();
        assert!(matches!(
            err,
            DataError::MalformedCandle {
                index: 3,
                field: CandleField::Close
            }
        ));
        assert!(parse_numeric(&json!(null), 0, CandleField::Open).is_err());
        assert!(parse_numeric(&json!("NaN"), 0, CandleField::High).is_err());
    }

    #[test]
    fn volume_is_lenient() {
        assert_eq!(parse_volume(&json!("1520.40")), 1520.4);
        assert!(parse_volume(&json!("--")).is_nan());
        assert!(parse_volume(&json!(null)).is_nan());
    }
}
