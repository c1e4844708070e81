//! Discrete signals produced by the decision layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stochastic-RSI oscillator signal. The only signal that places orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OscillatorSignal {
    Buy,
    Sell,
    Hold,
}

impl OscillatorSignal {
    pub fn label(self) -> &'static str {
        match self {
            OscillatorSignal::Buy => "BUY",
            OscillatorSignal::Sell => "SELL",
            OscillatorSignal::Hold => "HOLD",
        }
    }

    /// Whether this signal places an order.
    pub fn is_actionable(self) -> bool {
        !matches!(self, OscillatorSignal::Hold)
    }
}

impl fmt::Display for OscillatorSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trend-stop signal. Reported alongside the oscillator, never traded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendSignal {
    Buy,
    Sell,
}

impl TrendSignal {
    pub fn label(self) -> &'static str {
        match self {
            TrendSignal::Buy => "BUY",
            TrendSignal::Sell => "SELL",
        }
    }
}

impl fmt::Display for TrendSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hold_is_not_actionable() {
        assert!(OscillatorSignal::Buy.is_actionable());
        assert!(OscillatorSignal::Sell.is_actionable());
        assert!(!OscillatorSignal::Hold.is_actionable());
    }

    #[test]
    fn serializes_as_labels() {
        let json = serde_json::to_string(&OscillatorSignal::Hold).unwrap();
        assert_eq!(json, "\"HOLD\"");
        let json = serde_json::to_string(&TrendSignal::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
    }
}
