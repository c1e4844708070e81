//! Candle: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OHLCV candle for a single symbol over one fixed interval.
///
/// Times are epoch milliseconds, exactly as the exchange reports them.
/// Sequences are ordered oldest to newest; the last candle is the one under
/// evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

/// Names the OHLC column that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleField {
    Open,
    High,
    Low,
    Close,
}

impl fmt::Display for CandleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CandleField::Open => "open",
            CandleField::High => "high",
            CandleField::Low => "low",
            CandleField::Close => "close",
        };
        f.write_str(name)
    }
}

impl Candle {
    /// First OHLC field that is NaN or infinite, if any.
    ///
    /// Volume is not consulted: no indicator reads it, and sources keep an
    /// unreadable volume as NaN.
    pub fn non_finite_field(&self) -> Option<CandleField> {
        [
            (CandleField::Open, self.open),
            (CandleField::High, self.high),
            (CandleField::Low, self.low),
            (CandleField::Close, self.close),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(field, _)| field)
    }

    /// Open time as a UTC timestamp (None if out of chrono's range).
    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle() -> Candle {
        Candle {
            open_time: 1_700_000_000_000,
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
            close_time: 1_700_000_899_999,
        }
    }

    #[test]
    fn finite_candle_has_no_bad_field() {
        assert_eq!(sample_candle().non_finite_field(), None);
    }

    #[test]
    fn detects_nan_close() {
        let mut candle = sample_candle();
        candle.close = f64::NAN;
        assert_eq!(candle.non_finite_field(), Some(CandleField::Close));
    }

    #[test]
    fn reports_first_bad_field() {
        let mut candle = sample_candle();
        candle.high = f64::INFINITY;
        candle.low = f64::NAN;
        assert_eq!(candle.non_finite_field(), Some(CandleField::High));
    }

    #[test]
    fn nan_volume_is_tolerated() {
        let mut candle = sample_candle();
        candle.volume = f64::NAN;
        assert_eq!(candle.non_finite_field(), None);
    }

    #[test]
    fn opened_at_converts_millis() {
        let at = sample_candle().opened_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
    }
}
