//! Relative Strength Index (RSI).
//!
//! Gains and losses are smoothed with an unadjusted EWM, alpha = 1/period
//! (center of mass period - 1), seeded with the first close-to-close change.
//! RSI = 100 - 100 / (1 + ewm_gain / ewm_loss)
//! Lookback: 1 (the first change is at index 1).
//! Edge case: ewm_loss == 0 → RSI = 100, flagged in `RsiSeries::zero_loss`.

use super::ewm::{alpha_from_com, ewm_of_series};
use super::indicator::{closes, Indicator};
use crate::domain::Candle;

/// RSI values plus the indices where the loss average was zero.
#[derive(Debug, Clone)]
pub struct RsiSeries {
    pub values: Vec<f64>,
    pub zero_loss: Vec<bool>,
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Compute RSI over a raw close series.
    pub fn series(&self, closes: &[f64]) -> RsiSeries {
        let n = closes.len();
        let mut gains = vec![f64::NAN; n];
        let mut losses = vec![f64::NAN; n];

        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change.is_nan() {
                continue;
            }
            gains[i] = change.max(0.0);
            losses[i] = (-change).max(0.0);
        }

        let alpha = alpha_from_com(self.period as f64 - 1.0);
        let avg_gain = ewm_of_series(&gains, alpha);
        let avg_loss = ewm_of_series(&losses, alpha);

        let mut values = vec![f64::NAN; n];
        let mut zero_loss = vec![false; n];
        for i in 0..n {
            let (gain, loss) = (avg_gain[i], avg_loss[i]);
            if gain.is_nan() || loss.is_nan() {
                continue;
            }
            if loss == 0.0 {
                values[i] = 100.0;
                zero_loss[i] = true;
            } else {
                values[i] = 100.0 - 100.0 / (1.0 + gain / loss);
            }
        }

        RsiSeries { values, zero_loss }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        self.series(&closes(candles)).values
    }
}
