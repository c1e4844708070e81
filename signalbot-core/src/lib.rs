//! SignalBot Core: indicators, signal classification, order dispatch.
//!
//! One evaluation cycle per invocation:
//! - Candle history from a market data source (Binance klines or CSV)
//! - Stochastic RSI (K, D) and parabolic SAR over that history
//! - Oscillator classification into BUY / SELL / HOLD, trend stop as advisory
//! - At most one market order per cycle (BtcTurk or paper)
//! - One notification per evaluated cycle (Telegram or stdout)

pub mod config;
pub mod controller;
pub mod data;
pub mod decision;
pub mod domain;
pub mod engine;
pub mod exchange;
pub mod indicators;
pub mod notify;
