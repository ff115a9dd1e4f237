use common::Signal;

use crate::indicators::{MacdIndicator, MacdReading, StochasticIndicator, StochasticReading};
use crate::{CandleWindow, Decision, Evaluation, Strategy};

/// Lowest `min_candles` accepted for the confluence strategy.
pub const MIN_CONFLUENCE_CANDLES: usize = 30;

/// Stochastic + MACD confirmation strategy.
///
/// CALL needs all three of: %K crossing above %D on the latest candle, the
/// MACD line below its signal line, and a rising histogram. PUT is the mirror
/// image. Anything else is HOLD.
#[derive(Debug, Clone)]
pub struct ConfluenceStrategy {
    name: String,
    stochastic: StochasticIndicator,
    macd: MacdIndicator,
    min_candles: usize,
}

impl ConfluenceStrategy {
    pub fn new(
        name: impl Into<String>,
        stochastic: StochasticIndicator,
        macd: MacdIndicator,
        min_candles: usize,
    ) -> Self {
        let lookback = stochastic.min_len().max(macd.min_len());
        Self {
            name: name.into(),
            stochastic,
            macd,
            min_candles: min_candles.max(MIN_CONFLUENCE_CANDLES).max(lookback),
        }
    }
}

/// Combine indicator readings into a signal.
pub fn decide(stoch: &StochasticReading, macd: &MacdReading) -> Decision {
    let crossed_up = stoch.k_crosses_d_up();
    let crossed_down = stoch.k_crosses_d_down();

    let signal = if crossed_up && macd.macd < macd.signal && macd.histogram_increasing() {
        Signal::Call
    } else if crossed_down && macd.macd > macd.signal && macd.histogram_decreasing() {
        Signal::Put
    } else {
        Signal::Hold
    };

    let cross = if crossed_up {
        "K crossed above D"
    } else if crossed_down {
        "K crossed below D"
    } else {
        "no K/D cross"
    };

    let reason = format!(
        "{cross} (K {:.2}->{:.2}, D {:.2}->{:.2}); MACD {:.6} vs signal {:.6}; \
         histogram {:.6}->{:.6}",
        stoch.prev_k,
        stoch.k,
        stoch.prev_d,
        stoch.d,
        macd.macd,
        macd.signal,
        macd.prev_histogram,
        macd.histogram,
    );
    Decision::new(signal, reason)
}

impl Strategy for ConfluenceStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_candles(&self) -> usize {
        self.min_candles
    }

    fn describe(&self) -> String {
        format!(
            "Stochastic({}, {}, {}) + MACD({}, {}, {}) min_candles={}",
            self.stochastic.k_period,
            self.stochastic.k_smoothing,
            self.stochastic.d_period,
            self.macd.fast,
            self.macd.slow,
            self.macd.signal,
            self.min_candles
        )
    }

    fn evaluate(&self, window: &CandleWindow) -> Evaluation {
        if window.len() < self.min_candles {
            return Evaluation::degraded(format!(
                "insufficient data: {} of {} candles",
                window.len(),
                self.min_candles
            ));
        }

        let closes = window.closes();
        let stoch = match self
            .stochastic
            .compute(&window.highs(), &window.lows(), &closes)
        {
            Ok(reading) => reading,
            Err(e) => return Evaluation::degraded(format!("stochastic unavailable: {e}")),
        };
        let macd = match self.macd.compute(&closes) {
            Ok(reading) => reading,
            Err(e) => return Evaluation::degraded(format!("MACD unavailable: {e}")),
        };

        Evaluation::Decided(decide(&stoch, &macd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::window_from_closes;

    fn strategy() -> ConfluenceStrategy {
        ConfluenceStrategy::new(
            "test",
            StochasticIndicator::new(14, 3, 3),
            MacdIndicator::new(12, 26, 9),
            30,
        )
    }

    fn reading(prev_k: f64, prev_d: f64, k: f64, d: f64) -> StochasticReading {
        StochasticReading {
            prev_k,
            prev_d,
            k,
            d,
        }
    }

    fn macd(macd: f64, signal: f64, prev_histogram: f64, histogram: f64) -> MacdReading {
        MacdReading {
            prev_macd: 0.0,
            prev_signal: 0.0,
            prev_histogram,
            macd,
            signal,
            histogram,
        }
    }

    /// Accelerating decline followed by a one-candle bounce.
    fn bounce_after_decline() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 - 0.01 * (i * i) as f64).collect();
        let last = *closes.last().unwrap();
        closes.push(last + 1.0);
        closes
    }

    /// Accelerating rally followed by a one-candle drop.
    fn drop_after_rally() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + 0.01 * (i * i) as f64).collect();
        let last = *closes.last().unwrap();
        closes.push(last - 1.0);
        closes
    }

    #[test]
    fn min_candles_covers_macd_lookback() {
        assert_eq!(strategy().min_candles(), 35);
    }

    #[test]
    fn decide_call_on_full_bullish_confluence() {
        let stoch = reading(18.0, 20.0, 24.0, 21.0);
        let d = decide(&stoch, &macd(-0.5, -0.3, -0.25, -0.2));
        assert_eq!(d.signal, Signal::Call);
        assert!(d.reason.contains("K crossed above D"));
    }

    #[test]
    fn decide_put_on_full_bearish_confluence() {
        let stoch = reading(82.0, 80.0, 76.0, 79.0);
        let d = decide(&stoch, &macd(0.5, 0.3, 0.25, 0.2));
        assert_eq!(d.signal, Signal::Put);
    }

    #[test]
    fn decide_hold_when_macd_above_signal_on_bullish_cross() {
        let stoch = reading(18.0, 20.0, 24.0, 21.0);
        assert_eq!(decide(&stoch, &macd(0.5, 0.3, 0.1, 0.2)).signal, Signal::Hold);
    }

    #[test]
    fn decide_hold_when_histogram_not_rising_on_bullish_cross() {
        let stoch = reading(18.0, 20.0, 24.0, 21.0);
        assert_eq!(decide(&stoch, &macd(-0.5, -0.3, -0.2, -0.2)).signal, Signal::Hold);
    }

    #[test]
    fn decide_hold_without_cross() {
        let stoch = reading(30.0, 20.0, 35.0, 25.0);
        assert_eq!(decide(&stoch, &macd(-0.5, -0.3, -0.25, -0.2)).signal, Signal::Hold);
    }

    #[test]
    fn bounce_after_decline_is_call() {
        let eval = strategy().evaluate(&window_from_closes(&bounce_after_decline()));
        assert_eq!(eval.signal(), Signal::Call, "reason: {}", eval.reason());
    }

    #[test]
    fn drop_after_rally_is_put() {
        let eval = strategy().evaluate(&window_from_closes(&drop_after_rally()));
        assert_eq!(eval.signal(), Signal::Put, "reason: {}", eval.reason());
    }

    #[test]
    fn continued_decline_is_hold() {
        let closes: Vec<f64> = (0..41).map(|i| 100.0 - 0.01 * (i * i) as f64).collect();
        let eval = strategy().evaluate(&window_from_closes(&closes));
        assert!(!eval.is_degraded());
        assert_eq!(eval.signal(), Signal::Hold);
    }

    #[test]
    fn short_window_is_degraded_hold() {
        let closes: Vec<f64> = bounce_after_decline().into_iter().take(34).collect();
        let eval = strategy().evaluate(&window_from_closes(&closes));
        assert!(eval.is_degraded());
        assert_eq!(eval.signal(), Signal::Hold);
    }

    #[test]
    fn flat_market_is_degraded_hold() {
        let mut window = CandleWindow::new(50);
        let base = chrono::Utc::now();
        for i in 0..40 {
            window.append(common::Candle::new(
                100.0,
                100.0,
                100.0,
                100.0,
                base + chrono::Duration::seconds(i),
            ));
        }
        let eval = strategy().evaluate(&window);
        assert!(eval.is_degraded());
        assert!(eval.reason().contains("stochastic"), "reason: {}", eval.reason());
    }
}
