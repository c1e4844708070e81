//! CSV candle source for offline evaluation.
//!
//! Expected header: `open_time,open,high,low,close,volume,close_time`.
//! Price columns are read as text and parsed, so a non-numeric cell surfaces
//! as `DataError::MalformedCandle` rather than a generic CSV error. A
//! non-numeric volume is kept as NaN.

use super::provider::{parse_numeric, parse_volume, DataError, MarketDataSource};
use crate::domain::{Candle, CandleField};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    open_time: i64,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
    close_time: i64,
}

/// Reads the whole file on every fetch; symbol and interval are ignored.
#[derive(Debug, Clone)]
pub struct CsvCandleSource {
    path: PathBuf,
}

impl CsvCandleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse candles from any CSV reader.
    pub fn read_candles<R: std::io::Read>(reader: R) -> Result<Vec<Candle>, DataError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut candles = Vec::new();

        for (index, row) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::ResponseFormatChanged(format!("row {index}: {e}")))?;
            let cell = |text: &str, field: CandleField| {
                parse_numeric(&serde_json::Value::String(text.to_string()), index, field)
            };
            candles.push(Candle {
                open_time: row.open_time,
                open: cell(&row.open, CandleField::Open)?,
                high: cell(&row.high, CandleField::High)?,
                low: cell(&row.low, CandleField::Low)?,
                close: cell(&row.close, CandleField::Close)?,
                volume: parse_volume(&serde_json::Value::String(row.volume)),
                close_time: row.close_time,
            });
        }

        Ok(candles)
    }
}

impl MarketDataSource for CsvCandleSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_candles(&self, _symbol: &str, _interval: &str) -> Result<Vec<Candle>, DataError> {
        let file = std::fs::File::open(&self.path)?;
        Self::read_candles(file)
    }
}
