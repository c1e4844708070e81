//! Domain types for SignalBot

pub mod candle;
pub mod order;
pub mod signal;

pub use candle::{Candle, CandleField};
pub use order::{ExecutionResult, OrderRequest, OrderSide};
pub use signal::{OscillatorSignal, TrendSignal};
