//! Per-cycle indicator output.

use serde::Serialize;
use std::fmt;

/// Derived scalars for one evaluation cycle.
///
/// All four values are finite. The bundle is deliberately neither `Clone` nor
/// `Copy`: it is built fresh from the candle history of one cycle and moved
/// into the controller, so a spent bundle cannot be evaluated twice.
#[derive(Debug, PartialEq, Serialize)]
pub struct IndicatorBundle {
    /// Latest Stochastic RSI K line.
    pub k: f64,
    /// Latest Stochastic RSI D line.
    pub d: f64,
    /// Latest parabolic SAR level.
    pub trend_stop: f64,
    /// Close of the newest candle.
    pub last_close: f64,
}

/// A zero-denominator condition resolved by a fixed policy value.
///
/// `index` is the candle index where the condition held. Only conditions that
/// feed the reported K/D values are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundaryEvent {
    /// Loss average was zero; RSI pinned at 100.
    ZeroLossRsi { index: usize },
    /// RSI window had no range; Stochastic RSI set to the flat-window value.
    FlatRsiWindow { index: usize },
}

impl fmt::Display for BoundaryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryEvent::ZeroLossRsi { index } => {
                write!(f, "zero loss average at candle {index}, RSI pinned at 100")
            }
            BoundaryEvent::FlatRsiWindow { index } => {
                write!(f, "flat RSI window ending at candle {index}")
            }
        }
    }
}

/// Engine output: the bundle plus the boundary events behind it.
#[derive(Debug, PartialEq)]
pub struct Evaluation {
    pub bundle: IndicatorBundle,
    pub boundary_events: Vec<BoundaryEvent>,
}
