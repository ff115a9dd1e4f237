use chrono::{Duration, TimeZone, Utc};
use common::{Candle, Signal};
use proptest::prelude::*;
use strategy::{build_strategy, CandleWindow, StrategyConfig};

fn candle(i: usize, close: f64, wick: f64) -> Candle {
    let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(i as i64 * 2);
    Candle::new(close, close + wick, close - wick, close, ts)
}

proptest! {
    /// The window holds at most `capacity` candles and always the newest ones.
    #[test]
    fn window_keeps_newest_within_capacity(
        capacity in 1usize..60,
        closes in prop::collection::vec(1.0f64..1000.0, 0..200),
    ) {
        let mut window = CandleWindow::new(capacity);
        for (i, close) in closes.iter().enumerate() {
            window.append(candle(i, *close, 0.5));
            prop_assert!(window.len() <= capacity);
        }
        let expected: Vec<f64> = closes.iter().rev().take(capacity).rev().copied().collect();
        prop_assert_eq!(window.closes(), expected);
    }

    /// Windows shorter than the strategy's minimum always evaluate to HOLD,
    /// including lengths past the indicator lookback.
    #[test]
    fn short_windows_always_hold(
        strategy_type in prop::sample::select(vec!["sma_crossover", "confluence"]),
        min_candles in 30usize..60,
        closes in prop::collection::vec(1.0f64..1000.0, 0..60),
    ) {
        let cfg = StrategyConfig {
            strategy_type: strategy_type.to_string(),
            min_candles: Some(min_candles),
            ..StrategyConfig::default()
        };
        let strategy = build_strategy(&cfg).unwrap();
        let len = closes.len().min(strategy.min_candles() - 1);
        let mut window = CandleWindow::new(100);
        for (i, close) in closes[..len].iter().enumerate() {
            window.append(candle(i, *close, 0.5));
        }
        let eval = strategy.evaluate(&window);
        prop_assert!(eval.is_degraded());
        prop_assert_eq!(eval.signal(), Signal::Hold);
    }

    /// Arbitrary (even degenerate) price data never panics the confluence strategy.
    #[test]
    fn confluence_never_panics(
        closes in prop::collection::vec(0.0001f64..1_000_000.0, 30..120),
        wick in 0.0f64..5.0,
    ) {
        let strategy = build_strategy(&StrategyConfig::default()).unwrap();
        let mut window = CandleWindow::new(100);
        for (i, close) in closes.iter().enumerate() {
            window.append(candle(i, *close, wick));
        }
        let eval = strategy.evaluate(&window);
        prop_assert!(!eval.reason().is_empty());
    }
}
