//! Concrete indicator implementations.
//!
//! Stochastic RSI and parabolic SAR implement the `Indicator` trait; the
//! smoothing primitives (`ewm`, `rolling`) work on raw `f64` series so they can
//! be chained over derived values such as RSI.

pub mod ewm;
pub mod indicator;
pub mod parabolic_sar;
pub mod rolling;
pub mod rsi;
pub mod stoch_rsi;

pub use indicator::Indicator;
pub use parabolic_sar::{ParabolicSar, SarState};
pub use rsi::{Rsi, RsiSeries};
pub use stoch_rsi::{StochRsi, StochRsiSeries, FLAT_WINDOW_STOCH_RSI};

/// Create synthetic candles from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::domain::Candle> {
    let data: Vec<_> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            (open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect();
    make_ohlc_candles(&data)
}

/// Create 15-minute candles from (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Candle> {
    use crate::domain::Candle;
    const BASE_MS: i64 = 1_704_153_600_000;
    const STEP_MS: i64 = 15 * 60 * 1000;
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| {
            let open_time = BASE_MS + i as i64 * STEP_MS;
            Candle {
                open_time,
                open,
                high,
                low,
                close,
                volume: 1000.0,
                close_time: open_time + STEP_MS - 1,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
