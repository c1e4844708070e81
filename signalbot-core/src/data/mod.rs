//! Candle sources

pub mod binance;
pub mod csv_source;
pub mod provider;

pub use binance::BinanceKlines;
pub use csv_source::CsvCandleSource;
pub use provider::{DataError, MarketDataSource};
