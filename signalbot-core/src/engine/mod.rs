//! Indicator engine: candle history in, `IndicatorBundle` out.
//!
//! The engine is a pure function of its parameters and the candle slice:
//! 1. Validate length and OHLC values
//! 2. Compute Stochastic RSI (K, D) over the close series
//! 3. Compute parabolic SAR over the full history
//! 4. Keep only the newest values, plus the boundary events that fed them

pub mod bundle;

pub use bundle::{BoundaryEvent, Evaluation, IndicatorBundle};

use crate::domain::{Candle, CandleField};
use crate::indicators::indicator::closes;
use crate::indicators::{ParabolicSar, StochRsi};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a candle sequence could not be turned into a bundle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("insufficient history: need {required} candles, got {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    #[error("malformed candle at index {index}: {field} is not a finite number")]
    MalformedCandle { index: usize, field: CandleField },

    #[error("indicator '{indicator}' produced a non-finite value")]
    NonFinite { indicator: &'static str },
}

/// Indicator parameters, fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParams {
    /// RSI length and Stochastic RSI window.
    pub period: usize,
    /// K and D smoothing window.
    pub smoothing: usize,
    /// SAR acceleration start and step.
    pub sar_acceleration: f64,
    /// SAR acceleration cap.
    pub sar_maximum: f64,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            period: 14,
            smoothing: 3,
            sar_acceleration: 0.02,
            sar_maximum: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    stoch: StochRsi,
    sar: ParabolicSar,
}

impl IndicatorEngine {
    pub fn new(params: &EngineParams) -> Self {
        Self {
            stoch: StochRsi::new(params.period, params.smoothing),
            sar: ParabolicSar::new(params.sar_acceleration, params.sar_maximum),
        }
    }

    /// Minimum candle count for a complete bundle.
    pub fn min_history(&self) -> usize {
        self.stoch.min_history()
    }

    /// Compute the bundle for the newest candle of `candles`.
    pub fn evaluate(&self, candles: &[Candle]) -> Result<Evaluation, EngineError> {
        let required = self.min_history();
        if candles.len() < required {
            return Err(EngineError::InsufficientHistory {
                required,
                actual: candles.len(),
            });
        }

        for (index, candle) in candles.iter().enumerate() {
            if let Some(field) = candle.non_finite_field() {
                return Err(EngineError::MalformedCandle { index, field });
            }
        }

        let last = candles.len() - 1;
        let series = self.stoch.series(&closes(candles));
        let (sar, _) = self.sar.run(candles);

        let bundle = IndicatorBundle {
            k: finite(series.k[last], "stoch_rsi_k")?,
            d: finite(series.d[last], "stoch_rsi_d")?,
            trend_stop: finite(sar[last], "parabolic_sar")?,
            last_close: candles[last].close,
        };

        // Stochastic values behind the newest D, and the RSI values behind those
        let smoothing_span = 2 * (self.stoch.smoothing() - 1);
        let stoch_from = last - smoothing_span;
        let rsi_from = stoch_from + 1 - self.stoch.period();

        let mut boundary_events: Vec<BoundaryEvent> = (rsi_from..=last)
            .filter(|&i| series.zero_loss[i])
            .map(|index| BoundaryEvent::ZeroLossRsi { index })
            .collect();
        boundary_events.extend(
            (stoch_from..=last)
                .filter(|&i| series.flat_window[i])
                .map(|index| BoundaryEvent::FlatRsiWindow { index }),
        );

        Ok(Evaluation {
            bundle,
            boundary_events,
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(&EngineParams::default())
    }
}

fn finite(value: f64, indicator: &'static str) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite { indicator })
    }
}
