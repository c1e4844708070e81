//! Decision & dispatch controller: one evaluation cycle end to end.
//!
//! A cycle runs fetch → evaluate → classify → dispatch (at most once) →
//! notify, and never returns an error: every failure is classified into the
//! returned `CycleReport` and logged. `run_cycle` takes `&mut self`, so two
//! cycles of the same controller cannot overlap.
//!
//! Order and notification outcomes are independent. A notification failure
//! never re-dispatches or rolls back an order.

use crate::data::{DataError, MarketDataSource};
use crate::decision::{decide, Decision, OrderTemplate};
use crate::domain::{Candle, CandleField, ExecutionResult, OrderRequest};
use crate::engine::{
    BoundaryEvent, EngineError, EngineParams, Evaluation, IndicatorBundle, IndicatorEngine,
};
use crate::exchange::OrderExecutor;
use crate::notify::{render_cycle_message, Notifier};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// What one controller evaluates, fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSettings {
    /// Candle symbol at the market data source.
    pub symbol: String,
    /// Candle interval, e.g. "15m".
    pub interval: String,
    /// Fixed order placed when the oscillator fires.
    pub order: OrderTemplate,
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CycleStatus {
    /// Indicators computed, decision taken, notification attempted.
    Completed,
    /// Too few candles; nothing to report.
    InsufficientHistory { required: usize, actual: usize },
    /// A candle had a non-numeric OHLC value.
    MalformedInput { index: usize, field: CandleField },
    /// The market data source failed.
    FetchFailed { reason: String },
    /// Indicators came out non-finite despite valid input.
    Indeterminate { reason: String },
}

/// Result of the single dispatch attempt of a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OrderOutcome {
    NotPlaced,
    Accepted {
        request: OrderRequest,
        result: ExecutionResult,
    },
    Rejected {
        request: OrderRequest,
        result: ExecutionResult,
    },
    Failed {
        request: OrderRequest,
        error: String,
    },
}

impl OrderOutcome {
    /// Whether the order endpoint was called.
    pub fn was_dispatched(&self) -> bool {
        !matches!(self, OrderOutcome::NotPlaced)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotificationOutcome {
    NotSent,
    Delivered,
    Failed { reason: String },
}

/// Everything that happened in one cycle.
#[derive(Debug, Serialize)]
pub struct CycleReport {
    pub sequence: u64,
    pub symbol: String,
    pub status: CycleStatus,
    pub bundle: Option<IndicatorBundle>,
    pub boundary_events: Vec<BoundaryEvent>,
    pub decision: Option<Decision>,
    pub order: OrderOutcome,
    pub notification: NotificationOutcome,
}

impl CycleReport {
    fn aborted(sequence: u64, symbol: &str, status: CycleStatus) -> Self {
        Self {
            sequence,
            symbol: symbol.to_string(),
            status,
            bundle: None,
            boundary_events: Vec::new(),
            decision: None,
            order: OrderOutcome::NotPlaced,
            notification: NotificationOutcome::NotSent,
        }
    }
}

pub struct Controller {
    settings: CycleSettings,
    engine: IndicatorEngine,
    executor: Box<dyn OrderExecutor>,
    notifier: Box<dyn Notifier>,
    cycles: u64,
    dispatches: u64,
}

impl Controller {
    pub fn new(
        settings: CycleSettings,
        params: &EngineParams,
        executor: Box<dyn OrderExecutor>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            engine: IndicatorEngine::new(params),
            executor,
            notifier,
            cycles: 0,
            dispatches: 0,
        }
    }

    /// Cycles started so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Order endpoint calls so far.
    pub fn dispatches(&self) -> u64 {
        self.dispatches
    }

    /// Pull candles from `source` and run one cycle on them.
    pub fn run_cycle(&mut self, source: &dyn MarketDataSource) -> CycleReport {
        let sequence = self.next_sequence();
        let span = info_span!("cycle", symbol = %self.settings.symbol, sequence);
        let _enter = span.enter();

        match source.fetch_candles(&self.settings.symbol, &self.settings.interval) {
            Ok(candles) => self.evaluate(sequence, &candles),
            Err(DataError::MalformedCandle { index, field }) => {
                warn!(source = source.name(), index, %field, "malformed candle, cycle skipped");
                CycleReport::aborted(
                    sequence,
                    &self.settings.symbol,
                    CycleStatus::MalformedInput { index, field },
                )
            }
            Err(e) => {
                warn!(source = source.name(), error = %e, "candle fetch failed, cycle skipped");
                CycleReport::aborted(
                    sequence,
                    &self.settings.symbol,
                    CycleStatus::FetchFailed {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }

    /// Run one cycle on candles that are already in hand.
    pub fn run_on_candles(&mut self, candles: &[Candle]) -> CycleReport {
        let sequence = self.next_sequence();
        let span = info_span!("cycle", symbol = %self.settings.symbol, sequence);
        let _enter = span.enter();
        self.evaluate(sequence, candles)
    }

    fn next_sequence(&mut self) -> u64 {
        self.cycles += 1;
        self.cycles
    }

    fn evaluate(&mut self, sequence: u64, candles: &[Candle]) -> CycleReport {
        let status = match self.engine.evaluate(candles) {
            Ok(evaluation) => return self.act(sequence, evaluation),
            Err(EngineError::InsufficientHistory { required, actual }) => {
                info!(required, actual, "not enough candles yet, cycle skipped");
                CycleStatus::InsufficientHistory { required, actual }
            }
            Err(EngineError::MalformedCandle { index, field }) => {
                warn!(index, %field, "malformed candle, cycle skipped");
                CycleStatus::MalformedInput { index, field }
            }
            Err(e @ EngineError::NonFinite { .. }) => {
                warn!(error = %e, "indicator output discarded");
                CycleStatus::Indeterminate {
                    reason: e.to_string(),
                }
            }
        };
        CycleReport::aborted(sequence, &self.settings.symbol, status)
    }

    /// Classify, dispatch and notify. Consumes the evaluation.
    fn act(&mut self, sequence: u64, evaluation: Evaluation) -> CycleReport {
        let Evaluation {
            bundle,
            boundary_events,
        } = evaluation;

        for event in &boundary_events {
            info!(%event, "indicator boundary resolved by policy");
        }

        let decision = decide(&bundle, &self.settings.order);
        info!(
            k = bundle.k,
            d = bundle.d,
            trend_stop = bundle.trend_stop,
            last_close = bundle.last_close,
            oscillator = %decision.oscillator,
            trend = %decision.trend,
            "indicators evaluated"
        );

        let order = match &decision.order {
            Some(request) => self.dispatch(request),
            None => OrderOutcome::NotPlaced,
        };

        let text = render_cycle_message(&bundle, &decision, &order);
        let notification = match self.notifier.notify(&text) {
            Ok(()) => NotificationOutcome::Delivered,
            Err(e) => {
                warn!(channel = self.notifier.name(), error = %e, "notification failed");
                NotificationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        CycleReport {
            sequence,
            symbol: self.settings.symbol.clone(),
            status: CycleStatus::Completed,
            bundle: Some(bundle),
            boundary_events,
            decision: Some(decision),
            order,
            notification,
        }
    }

    fn dispatch(&mut self, request: &OrderRequest) -> OrderOutcome {
        self.dispatches += 1;
        let endpoint = self.executor.name();

        match self.executor.execute(request) {
            Ok(result) if result.accepted => {
                info!(
                    endpoint,
                    order = %request,
                    detail = %pretty(&result.detail),
                    "order accepted"
                );
                OrderOutcome::Accepted {
                    request: request.clone(),
                    result,
                }
            }
            Ok(result) => {
                warn!(
                    endpoint,
                    order = %request,
                    detail = %pretty(&result.detail),
                    "order rejected"
                );
                OrderOutcome::Rejected {
                    request: request.clone(),
                    result,
                }
            }
            Err(e) => {
                warn!(endpoint, order = %request, error = %e, "order dispatch failed");
                OrderOutcome::Failed {
                    request: request.clone(),
                    error: e.to_string(),
                }
            }
        }
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataError;
    use crate::domain::OrderSide;
    use crate::exchange::{DispatchError, PaperExecutor};
    use crate::indicators::make_candles;
    use crate::notify::NotifyError;
    use std::sync::{Arc, Mutex};

    fn settings() -> CycleSettings {
        CycleSettings {
            symbol: "USDTTRY".into(),
            interval: "15m".into(),
            order: OrderTemplate {
                symbol: "USDTTRY".into(),
                quantity: 60.0,
            },
        }
    }

    #[derive(Clone, Default)]
    struct Inbox(Arc<Mutex<Vec<String>>>);

    impl Notifier for Inbox {
        fn name(&self) -> &str {
            "inbox"
        }
        fn notify(&self, text: &str) -> Result<(), NotifyError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Down;

    impl Notifier for Down {
        fn name(&self) -> &str {
            "down"
        }
        fn notify(&self, _text: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Unreachable("connection refused".into()))
        }
    }

    struct Offline;

    impl OrderExecutor for Offline {
        fn name(&self) -> &str {
            "offline"
        }
        fn execute(&self, _order: &OrderRequest) -> Result<ExecutionResult, DispatchError> {
            Err(DispatchError::Unreachable("timeout".into()))
        }
    }

    struct Fixed(Vec<Candle>);

    impl MarketDataSource for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn fetch_candles(&self, _: &str, _: &str) -> Result<Vec<Candle>, DataError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl MarketDataSource for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn fetch_candles(&self, _: &str, _: &str) -> Result<Vec<Candle>, DataError> {
            Err(DataError::NetworkUnreachable("dns".into()))
        }
    }

    /// Rally then decline: RSI falls strictly, each reading the low of its
    /// window, so K and D settle at 0.
    fn falling(n: usize) -> Vec<Candle> {
        let closes: Vec<f64> = (0..n)
            .map(|i| {
                if i <= n / 2 {
                    100.0 + i as f64
                } else {
                    100.0 + (n - i) as f64
                }
            })
            .collect();
        make_candles(&closes)
    }

    #[test]
    fn short_history_aborts_without_side_effects() {
        let inbox = Inbox::default();
        let mut controller = Controller::new(
            settings(),
            &EngineParams::default(),
            Box::new(PaperExecutor::new()),
            Box::new(inbox.clone()),
        );
        let report = controller.run_on_candles(&make_candles(&[1.0; 10]));
        assert_eq!(
            report.status,
            CycleStatus::InsufficientHistory {
                required: 19,
                actual: 10
            }
        );
        assert_eq!(report.order, OrderOutcome::NotPlaced);
        assert_eq!(report.notification, NotificationOutcome::NotSent);
        assert_eq!(controller.dispatches(), 0);
        assert!(inbox.0.lock().unwrap().is_empty());
    }

    #[test]
    fn flat_market_notifies_without_order() {
        let inbox = Inbox::default();
        let mut controller = Controller::new(
            settings(),
            &EngineParams::default(),
            Box::new(PaperExecutor::new()),
            Box::new(inbox.clone()),
        );
        let report = controller.run_on_candles(&make_candles(&[34.0; 40]));
        assert_eq!(report.status, CycleStatus::Completed);
        assert_eq!(report.decision.unwrap().oscillator, crate::domain::OscillatorSignal::Hold);
        assert!(!report.boundary_events.is_empty());
        assert_eq!(controller.dispatches(), 0);
        assert_eq!(inbox.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn fetch_failure_is_contained() {
        let mut controller = Controller::new(
            settings(),
            &EngineParams::default(),
            Box::new(PaperExecutor::new()),
            Box::new(Inbox::default()),
        );
        let report = controller.run_cycle(&Failing);
        assert!(matches!(report.status, CycleStatus::FetchFailed { .. }));
        assert_eq!(controller.cycles(), 1);

        // The next cycle proceeds independently
        let report = controller.run_cycle(&Fixed(make_candles(&[34.0; 40])));
        assert_eq!(report.status, CycleStatus::Completed);
        assert_eq!(report.sequence, 2);
    }

    #[test]
    fn unreachable_exchange_is_reported_and_notified() {
        let inbox = Inbox::default();
        let mut controller = Controller::new(
            settings(),
            &EngineParams::default(),
            Box::new(Offline),
            Box::new(inbox.clone()),
        );
        let report = controller.run_cycle(&Fixed(falling(60)));
        let decision = report.decision.unwrap();
        assert_eq!(decision.oscillator, crate::domain::OscillatorSignal::Buy);
        assert!(matches!(report.order, OrderOutcome::Failed { .. }));
        assert_eq!(report.notification, NotificationOutcome::Delivered);
        assert_eq!(controller.dispatches(), 1);
        assert!(inbox.0.lock().unwrap()[0].contains("failed: order endpoint unreachable"));
    }

    #[test]
    fn notification_failure_keeps_single_order() {
        let mut controller = Controller::new(
            settings(),
            &EngineParams::default(),
            Box::new(PaperExecutor::new()),
            Box::new(Down),
        );
        let report = controller.run_cycle(&Fixed(falling(60)));
        match &report.order {
            OrderOutcome::Accepted { request, .. } => assert_eq!(request.side, OrderSide::Buy),
            other => panic!("expected accepted order, got {other:?}"),
        }
        assert!(matches!(report.notification, NotificationOutcome::Failed { .. }));
        assert_eq!(controller.dispatches(), 1);
    }
}
