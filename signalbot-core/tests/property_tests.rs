//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Idempotence: identical candles give bit-identical bundles
//! 2. Bounds: K and D always lie in [0, 100]
//! 3. No look-ahead: the bundle for a prefix ignores later candles
//! 4. Flat markets never dispatch
//! 5. Trend stop sits on the correct side of the bar that produced it

use proptest::prelude::*;
use signalbot_core::decision::{classify_oscillator, decide, OrderTemplate};
use signalbot_core::domain::{Candle, OscillatorSignal};
use signalbot_core::engine::{EngineError, EngineParams, IndicatorEngine};
use signalbot_core::indicators::ParabolicSar;

// ── Strategies (proptest) ────────────────────────────────────────────

const BASE_MS: i64 = 1_704_153_600_000;
const STEP_MS: i64 = 15 * 60 * 1000;

fn build(start: f64, steps: &[(f64, f64)]) -> Vec<Candle> {
    let mut close = start;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(change, spread))| {
            let open = close;
            close = (close + change).max(1.0);
            let open_time = BASE_MS + i as i64 * STEP_MS;
            Candle {
                open_time,
                open,
                high: open.max(close) + spread,
                low: (open.min(close) - spread).max(0.5),
                close,
                volume: 1_000.0,
                close_time: open_time + STEP_MS - 1,
            }
        })
        .collect()
}

/// Random-walk candles, long enough for a full bundle.
fn arb_candles(min: usize, max: usize) -> impl Strategy<Value = Vec<Candle>> {
    (
        10.0..200.0_f64,
        prop::collection::vec((-2.0..2.0_f64, 0.0..1.0_f64), min..max),
    )
        .prop_map(|(start, steps)| build(start, &steps))
}

fn arb_params() -> impl Strategy<Value = EngineParams> {
    (2usize..30, 1usize..5).prop_map(|(period, smoothing)| EngineParams {
        period,
        smoothing,
        ..EngineParams::default()
    })
}

fn template() -> OrderTemplate {
    OrderTemplate {
        symbol: "USDTTRY".into(),
        quantity: 60.0,
    }
}

// ── 1. Idempotence ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn evaluation_is_bit_identical(candles in arb_candles(19, 200)) {
        let engine = IndicatorEngine::default();
        let first = engine.evaluate(&candles).unwrap();
        let second = engine.evaluate(&candles).unwrap();

        prop_assert_eq!(first.bundle.k.to_bits(), second.bundle.k.to_bits());
        prop_assert_eq!(first.bundle.d.to_bits(), second.bundle.d.to_bits());
        prop_assert_eq!(first.bundle.trend_stop.to_bits(), second.bundle.trend_stop.to_bits());
        prop_assert_eq!(first.boundary_events, second.boundary_events);

        // A fresh engine with the same params agrees too
        let third = IndicatorEngine::new(&EngineParams::default()).evaluate(&candles).unwrap();
        prop_assert_eq!(first.bundle, third.bundle);
    }
}

// ── 2. Bounds ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn k_and_d_stay_in_range(candles in arb_candles(19, 200), params in arb_params()) {
        let engine = IndicatorEngine::new(&params);
        match engine.evaluate(&candles) {
            Ok(evaluation) => {
                let bundle = evaluation.bundle;
                prop_assert!((0.0..=100.0).contains(&bundle.k), "k = {}", bundle.k);
                prop_assert!((0.0..=100.0).contains(&bundle.d), "d = {}", bundle.d);
                prop_assert!(bundle.trend_stop.is_finite());
            }
            Err(EngineError::InsufficientHistory { required, actual }) => {
                prop_assert!(actual < required);
                prop_assert_eq!(required, engine.min_history());
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }
}

// ── 3. No look-ahead ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn prefix_bundle_ignores_future(candles in arb_candles(40, 150), cut in 19usize..40) {
        let engine = IndicatorEngine::default();
        let prefix = engine.evaluate(&candles[..cut]).unwrap().bundle;

        // Full-history SAR at the cut matches the prefix evaluation
        let (sar, _) = ParabolicSar::default_params().run(&candles);
        prop_assert_eq!(prefix.trend_stop.to_bits(), sar[cut - 1].to_bits());
        prop_assert_eq!(prefix.last_close.to_bits(), candles[cut - 1].close.to_bits());
    }
}

// ── 4. Flat markets ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn flat_market_never_dispatches(price in 0.01..10_000.0_f64, len in 19usize..120) {
        let candles: Vec<Candle> = (0..len)
            .map(|i| {
                let open_time = BASE_MS + i as i64 * STEP_MS;
                Candle {
                    open_time,
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    volume: 0.0,
                    close_time: open_time + STEP_MS - 1,
                }
            })
            .collect();

        let evaluation = IndicatorEngine::default().evaluate(&candles).unwrap();
        prop_assert!(!evaluation.boundary_events.is_empty());

        let decision = decide(&evaluation.bundle, &template());
        prop_assert_eq!(decision.oscillator, OscillatorSignal::Hold);
        prop_assert!(decision.order.is_none());
    }
}

// ── 5. Classification ────────────────────────────────────────────────

proptest! {
    #[test]
    fn only_joint_extremes_are_actionable(k in 0.0..=100.0_f64, d in 0.0..=100.0_f64) {
        let signal = classify_oscillator(k, d);
        match signal {
            OscillatorSignal::Buy => prop_assert!(k < 20.0 && d < 20.0),
            OscillatorSignal::Sell => prop_assert!(k > 80.0 && d > 80.0),
            OscillatorSignal::Hold => prop_assert!(
                !(k < 20.0 && d < 20.0) && !(k > 80.0 && d > 80.0)
            ),
        }
    }

    #[test]
    fn trend_stop_stays_outside_its_bar(candles in arb_candles(5, 120)) {
        let (sar, _) = ParabolicSar::default_params().run(&candles);
        for i in 2..candles.len() {
            let bar = &candles[i];
            // A stop inside the bar would have reversed on this bar
            prop_assert!(
                sar[i] <= bar.low + 1e-9 || sar[i] >= bar.high - 1e-9,
                "sar {} inside bar {} [{}, {}]", sar[i], i, bar.low, bar.high
            );
        }
    }
}
