//! Stochastic RSI with K and D smoothing lines.
//!
//! StochRSI = 100 * (rsi - min) / (max - min) over a trailing `period` window
//! of RSI values. K = SMA(StochRSI, smoothing), D = SMA(K, smoothing).
//!
//! Edge case: a flat RSI window (max == min) yields `FLAT_WINDOW_STOCH_RSI`,
//! flagged in `StochRsiSeries::flat_window`.
//!
//! As an `Indicator` it reports the D line; `series` exposes every
//! intermediate line.

use super::indicator::{closes, Indicator};
use super::rolling::{rolling_extremes, rolling_mean};
use super::rsi::Rsi;
use crate::domain::Candle;

/// Stochastic RSI value for a window whose RSI range is zero.
///
/// The midpoint sits between the oversold and overbought thresholds, so a
/// market that does not move never places an order.
pub const FLAT_WINDOW_STOCH_RSI: f64 = 50.0;

/// Every intermediate series of one Stochastic RSI computation.
#[derive(Debug, Clone)]
pub struct StochRsiSeries {
    pub rsi: Vec<f64>,
    pub stoch: Vec<f64>,
    pub k: Vec<f64>,
    pub d: Vec<f64>,
    /// RSI was pinned at 100 because the loss average was zero.
    pub zero_loss: Vec<bool>,
    /// The trailing RSI window had no range.
    pub flat_window: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct StochRsi {
    rsi: Rsi,
    smoothing: usize,
    name: String,
}

impl StochRsi {
    pub fn new(period: usize, smoothing: usize) -> Self {
        assert!(period >= 2, "Stochastic RSI period must be >= 2");
        assert!(smoothing >= 1, "smoothing window must be >= 1");
        Self {
            rsi: Rsi::new(period),
            smoothing,
            name: format!("stoch_rsi_{period}_{smoothing}"),
        }
    }

    pub fn period(&self) -> usize {
        self.rsi.period()
    }

    pub fn smoothing(&self) -> usize {
        self.smoothing
    }

    /// Candles needed before the D line has a value at the newest candle.
    ///
    /// One candle for the first change, `period` RSI values for the first
    /// window, then `smoothing - 1` more for each of the K and D means.
    /// Saturates at `usize::MAX` for windows no history could fill.
    pub fn min_history(&self) -> usize {
        (self.smoothing - 1)
            .saturating_mul(2)
            .saturating_add(self.period())
            .saturating_add(1)
    }

    /// Compute all Stochastic RSI series over a raw close series.
    pub fn series(&self, closes: &[f64]) -> StochRsiSeries {
        let rsi = self.rsi.series(closes);
        let n = closes.len();

        let mut stoch = vec![f64::NAN; n];
        let mut flat_window = vec![false; n];
        for (i, window) in rolling_extremes(&rsi.values, self.period())
            .into_iter()
            .enumerate()
        {
            let Some((min, max)) = window else {
                continue;
            };
            if max == min {
                stoch[i] = FLAT_WINDOW_STOCH_RSI;
                flat_window[i] = true;
            } else {
                stoch[i] = (rsi.values[i] - min) / (max - min) * 100.0;
            }
        }

        let k = rolling_mean(&stoch, self.smoothing);
        let d = rolling_mean(&k, self.smoothing);

        StochRsiSeries {
            rsi: rsi.values,
            stoch,
            k,
            d,
            zero_loss: rsi.zero_loss,
            flat_window,
        }
    }
}

impl Indicator for StochRsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.min_history() - 1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        self.series(&closes(candles)).d
    }
}
