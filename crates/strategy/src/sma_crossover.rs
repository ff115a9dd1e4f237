use common::Signal;

use crate::indicators::sma;
use crate::{CandleWindow, Decision, Evaluation, Strategy};

/// Short/long simple moving average comparison on close prices.
///
/// CALL while the short SMA is above the long SMA, PUT while below, HOLD when
/// they are equal.
#[derive(Debug, Clone)]
pub struct SmaCrossoverStrategy {
    name: String,
    short_window: usize,
    long_window: usize,
    min_candles: usize,
}

impl SmaCrossoverStrategy {
    pub fn new(
        name: impl Into<String>,
        short_window: usize,
        long_window: usize,
        min_candles: usize,
    ) -> Self {
        assert!(short_window > 0, "SMA short window must be > 0");
        assert!(
            short_window < long_window,
            "SMA short window must be less than long window"
        );
        Self {
            name: name.into(),
            short_window,
            long_window,
            min_candles: min_candles.max(long_window),
        }
    }
}

impl Strategy for SmaCrossoverStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_candles(&self) -> usize {
        self.min_candles
    }

    fn describe(&self) -> String {
        format!(
            "SMA crossover short={} long={} min_candles={}",
            self.short_window, self.long_window, self.min_candles
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
        let short = match sma(&closes, self.short_window) {
            Ok(v) => v,
            Err(e) => return Evaluation::degraded(format!("short SMA unavailable: {e}")),
        };
        let long = match sma(&closes, self.long_window) {
            Ok(v) => v,
            Err(e) => return Evaluation::degraded(format!("long SMA unavailable: {e}")),
        };
        if !short.is_finite() || !long.is_finite() {
            return Evaluation::degraded(format!(
                "non-finite SMA values short={short} long={long}"
            ));
        }

        let (signal, relation) = if short > long {
            (Signal::Call, ">")
        } else if short < long {
            (Signal::Put, "<")
        } else {
            (Signal::Hold, "=")
        };

        Evaluation::Decided(Decision::new(
            signal,
            format!(
                "SMA{}={short:.5} {relation} SMA{}={long:.5}",
                self.short_window, self.long_window
            ),
        ))
    }
}
