//! Cycle message text.

use crate::controller::OrderOutcome;
use crate::decision::Decision;
use crate::engine::IndicatorBundle;

/// Render the per-cycle notification.
///
/// Two fixed lines (oscillator, trend stop), plus an order line whenever an
/// order was attempted.
pub fn render_cycle_message(
    bundle: &IndicatorBundle,
    decision: &Decision,
    order: &OrderOutcome,
) -> String {
    let mut text = format!(
        "Stoch RSI K: {:.2}, D: {:.2}, Stochastic Signal: {}\n\
         Parabolic SAR: {:.2}, SAR Signal: {}",
        bundle.k, bundle.d, decision.oscillator, bundle.trend_stop, decision.trend
    );

    match order {
        OrderOutcome::NotPlaced => {}
        OrderOutcome::Accepted { request, .. } => {
            text.push_str(&format!("\nOrder: {request} accepted"));
        }
        OrderOutcome::Rejected { request, result } => {
            let reason = result
                .detail
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| result.detail.to_string());
            text.push_str(&format!("\nOrder: {request} rejected: {reason}"));
        }
        OrderOutcome::Failed { request, error } => {
            text.push_str(&format!("\nOrder: {request} failed: {error}"));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExecutionResult, OrderRequest, OrderSide, OscillatorSignal, TrendSignal};

    fn bundle() -> IndicatorBundle {
        IndicatorBundle {
            k: 12.346,
            d: 9.999,
            trend_stop: 34.5678,
            last_close: 35.0,
        }
    }

    fn buy_decision() -> Decision {
        Decision {
            oscillator: OscillatorSignal::Buy,
            trend: TrendSignal::Buy,
            order: Some(request()),
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            side: OrderSide::Buy,
            symbol: "USDTTRY".into(),
            quantity: 60.0,
        }
    }

    #[test]
    fn hold_message_has_two_lines() {
        let decision = Decision {
            oscillator: OscillatorSignal::Hold,
            trend: TrendSignal::Sell,
            order: None,
        };
        let text = render_cycle_message(&bundle(), &decision, &OrderOutcome::NotPlaced);
        assert_eq!(
            text,
            "Stoch RSI K: 12.35, D: 10.00, Stochastic Signal: HOLD\n\
             Parabolic SAR: 34.57, SAR Signal: SELL"
        );
    }

    #[test]
    fn accepted_order_line() {
        let outcome = OrderOutcome::Accepted {
            request: request(),
            result: ExecutionResult::accepted(serde_json::json!({"success": true})),
        };
        let text = render_cycle_message(&bundle(), &buy_decision(), &outcome);
        assert!(text.ends_with("\nOrder: buy 60 USDTTRY accepted"));
        assert!(text.contains("Stochastic Signal: BUY"));
    }

    #[test]
    fn rejected_order_uses_exchange_message() {
        let outcome = OrderOutcome::Rejected {
            request: request(),
            result: ExecutionResult {
                accepted: false,
                detail: serde_json::json!({"success": false, "message": "BALANCE_NOT_ENOUGH"}),
            },
        };
        let text = render_cycle_message(&bundle(), &buy_decision(), &outcome);
        assert!(text.ends_with("rejected: BALANCE_NOT_ENOUGH"));
    }

    #[test]
    fn failed_order_line() {
        let outcome = OrderOutcome::Failed {
            request: request(),
            error: "order endpoint unreachable: timeout".into(),
        };
        let text = render_cycle_message(&bundle(), &buy_decision(), &outcome);
        assert!(text.ends_with("failed: order endpoint unreachable: timeout"));
    }
}
