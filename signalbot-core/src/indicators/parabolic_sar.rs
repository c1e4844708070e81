//! Parabolic SAR: Wilder's acceleration factor system, TA-Lib flavour.
//!
//! Inherently sequential/stateful: the recursion is carried in an explicit
//! `SarState` (side, extreme point, acceleration factor, next SAR) that is
//! stepped once per candle over the full history.
//!
//! Initial side comes from the directional movement of the first two candles:
//! short when the low dropped more than the high rose, long otherwise.
//!
//! Parameters: acceleration (start and step, default 0.02), maximum (default 0.20).
//! Lookback: 1.

use super::indicator::Indicator;
use crate::domain::Candle;

/// Recursive SAR state between two candles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SarState {
    /// SAR level projected for the next candle.
    pub sar: f64,
    /// Highest high of an uptrend, lowest low of a downtrend.
    pub extreme: f64,
    pub acceleration: f64,
    pub is_long: bool,
}

#[derive(Debug, Clone)]
pub struct ParabolicSar {
    acceleration: f64,
    maximum: f64,
    name: String,
}

impl ParabolicSar {
    pub fn new(acceleration: f64, maximum: f64) -> Self {
        assert!(acceleration > 0.0, "acceleration must be > 0");
        assert!(maximum >= acceleration, "maximum must be >= acceleration");
        Self {
            acceleration,
            maximum,
            name: format!("psar_{acceleration}_{maximum}"),
        }
    }

    /// Default parameters: 0.02, 0.20
    pub fn default_params() -> Self {
        Self::new(0.02, 0.20)
    }

    /// Initial state from the first two candles.
    pub fn seed(&self, first: &Candle, second: &Candle) -> SarState {
        let up_move = second.high - first.high;
        let down_move = first.low - second.low;
        let is_long = !(down_move > 0.0 && up_move < down_move);

        if is_long {
            SarState {
                sar: first.low,
                extreme: second.high,
                acceleration: self.acceleration,
                is_long,
            }
        } else {
            SarState {
                sar: first.high,
                extreme: second.low,
                acceleration: self.acceleration,
                is_long,
            }
        }
    }

    /// Advance `state` over `today` and return today's SAR.
    ///
    /// `prev` is the candle before `today`, except on the first step where
    /// both are the second candle of the series.
    pub fn step(&self, state: &mut SarState, prev: &Candle, today: &Candle) -> f64 {
        if state.is_long {
            if today.low <= state.sar {
                // Reverse to short: SAR jumps to the prior extreme
                let sar = state.extreme.max(prev.high).max(today.high);
                state.is_long = false;
                state.acceleration = self.acceleration;
                state.extreme = today.low;
                state.sar = (sar + state.acceleration * (state.extreme - sar))
                    .max(prev.high)
                    .max(today.high);
                return sar;
            }

            let sar = state.sar;
            if today.high > state.extreme {
                state.extreme = today.high;
                state.acceleration = (state.acceleration + self.acceleration).min(self.maximum);
            }
            // Uptrend: SAR must not be above the two latest lows
            state.sar = (sar + state.acceleration * (state.extreme - sar))
                .min(prev.low)
                .min(today.low);
            sar
        } else {
            if today.high >= state.sar {
                // Reverse to long
                let sar = state.extreme.min(prev.low).min(today.low);
                state.is_long = true;
                state.acceleration = self.acceleration;
                state.extreme = today.high;
                state.sar = (sar + state.acceleration * (state.extreme - sar))
                    .min(prev.low)
                    .min(today.low);
                return sar;
            }

            let sar = state.sar;
            if today.low < state.extreme {
                state.extreme = today.low;
                state.acceleration = (state.acceleration + self.acceleration).min(self.maximum);
            }
            // Downtrend: SAR must not be below the two latest highs
            state.sar = (sar + state.acceleration * (state.extreme - sar))
                .max(prev.high)
                .max(today.high);
            sar
        }
    }

    /// SAR series plus the state left after the newest candle.
    pub fn run(&self, candles: &[Candle]) -> (Vec<f64>, Option<SarState>) {
        let n = candles.len();
        let mut result = vec![f64::NAN; n];

        if n < 2 {
            return (result, None);
        }

        let mut state = self.seed(&candles[0], &candles[1]);
        for i in 1..n {
            let prev = if i == 1 { &candles[1] } else { &candles[i - 1] };
            result[i] = self.step(&mut state, prev, &candles[i]);
        }

        (result, Some(state))
    }
}

impl Indicator for ParabolicSar {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, candles: &[Candle]) -> Vec<f64> {
        self.run(candles).0
    }
}
