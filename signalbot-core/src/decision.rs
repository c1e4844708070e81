//! Signal classification.
//!
//! Pure mapping from an `IndicatorBundle` to the oscillator and trend
//! signals, and from the oscillator signal to an order request.
//!
//! The trend signal is advisory: it is reported next to the oscillator but
//! never produces an order.

use crate::domain::{OrderRequest, OrderSide, OscillatorSignal, TrendSignal};
use crate::engine::IndicatorBundle;
use serde::{Deserialize, Serialize};

/// Both K and D below this → oversold → buy.
pub const OVERSOLD: f64 = 20.0;
/// Both K and D above this → overbought → sell.
pub const OVERBOUGHT: f64 = 80.0;

/// Stochastic RSI classification, first match wins.
pub fn classify_oscillator(k: f64, d: f64) -> OscillatorSignal {
    if k < OVERSOLD && d < OVERSOLD {
        OscillatorSignal::Buy
    } else if k > OVERBOUGHT && d > OVERBOUGHT {
        OscillatorSignal::Sell
    } else {
        OscillatorSignal::Hold
    }
}

/// Price above the trailing stop is an uptrend bias.
pub fn classify_trend(last_close: f64, trend_stop: f64) -> TrendSignal {
    if last_close > trend_stop {
        TrendSignal::Buy
    } else {
        TrendSignal::Sell
    }
}

/// Fixed order parameters supplied at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderTemplate {
    pub symbol: String,
    pub quantity: f64,
}

impl OrderTemplate {
    pub fn request(&self, side: OrderSide) -> OrderRequest {
        OrderRequest {
            side,
            symbol: self.symbol.clone(),
            quantity: self.quantity,
        }
    }
}

/// Signals for one cycle and the order they call for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub oscillator: OscillatorSignal,
    pub trend: TrendSignal,
    pub order: Option<OrderRequest>,
}

pub fn decide(bundle: &IndicatorBundle, template: &OrderTemplate) -> Decision {
    let oscillator = classify_oscillator(bundle.k, bundle.d);
    let trend = classify_trend(bundle.last_close, bundle.trend_stop);
    let order = OrderSide::for_signal(oscillator).map(|side| template.request(side));
    Decision {
        oscillator,
        trend,
        order,
    }
}
