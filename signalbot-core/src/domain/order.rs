//! Order requests and execution results exchanged with the order endpoint.

use super::signal::OscillatorSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Side for an oscillator signal; `Hold` has none.
    pub fn for_signal(signal: OscillatorSignal) -> Option<Self> {
        match signal {
            OscillatorSignal::Buy => Some(OrderSide::Buy),
            OscillatorSignal::Sell => Some(OrderSide::Sell),
            OscillatorSignal::Hold => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed-quantity market order for one symbol.
///
/// Built only when the oscillator fires, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: OrderSide,
    pub symbol: String,
    pub quantity: f64,
}

impl fmt::Display for OrderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side, self.quantity, self.symbol)
    }
}

/// Outcome reported by the order endpoint.
///
/// `detail` is the endpoint's own payload, kept verbatim for logs and
/// notifications; nothing downstream interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub accepted: bool,
    pub detail: serde_json::Value,
}

impl ExecutionResult {
    pub fn accepted(detail: serde_json::Value) -> Self {
        Self {
            accepted: true,
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_for_signal() {
        assert_eq!(
            OrderSide::for_signal(OscillatorSignal::Buy),
            Some(OrderSide::Buy)
        );
        assert_eq!(
            OrderSide::for_signal(OscillatorSignal::Sell),
            Some(OrderSide::Sell)
        );
        assert_eq!(OrderSide::for_signal(OscillatorSignal::Hold), None);
    }

    #[test]
    fn request_display() {
        let req = OrderRequest {
            side: OrderSide::Sell,
            symbol: "USDTTRY".into(),
            quantity: 60.0,
        };
        assert_eq!(req.to_string(), "sell 60 USDTTRY");
    }
}
