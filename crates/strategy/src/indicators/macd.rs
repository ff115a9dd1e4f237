use super::{ema_series, ensure_finite, IndicatorError};

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// Computes: MACD line = EMA(fast) − EMA(slow), Signal = EMA(macd_line, signal),
/// Histogram = MACD line − Signal.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// The latest two bars of MACD output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdReading {
    pub prev_macd: f64,
    pub prev_signal: f64,
    pub prev_histogram: f64,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdReading {
    pub fn histogram_increasing(&self) -> bool {
        self.histogram > self.prev_histogram
    }

    pub fn histogram_decreasing(&self) -> bool {
        self.histogram < self.prev_histogram
    }
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && signal > 0, "MACD periods must be > 0");
        assert!(fast < slow, "MACD fast period must be less than slow period");
        Self { fast, slow, signal }
    }

    /// Closes needed for two consecutive histogram values.
    pub fn min_len(&self) -> usize {
        self.slow + self.signal
    }

    /// Compute the latest two MACD bars from close prices (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Result<MacdReading, IndicatorError> {
        if closes.len() < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                needed: self.min_len(),
                have: closes.len(),
            });
        }
        ensure_finite("close", closes)?;

        let fast_ema = ema_series(closes, self.fast);
        let slow_ema = ema_series(closes, self.slow);

        // slow_ema[j] and fast_ema[j + offset] describe the same bar
        let offset = self.slow - self.fast;
        let macd_line: Vec<f64> = slow_ema
            .iter()
            .enumerate()
            .map(|(j, slow)| fast_ema[j + offset] - slow)
            .collect();

        let signal_line = ema_series(&macd_line, self.signal);
        if signal_line.len() < 2 {
            return Err(IndicatorError::InsufficientData {
                needed: self.min_len(),
                have: closes.len(),
            });
        }

        let m = macd_line.len();
        let n = signal_line.len();
        let reading = MacdReading {
            prev_macd: macd_line[m - 2],
            prev_signal: signal_line[n - 2],
            prev_histogram: macd_line[m - 2] - signal_line[n - 2],
            macd: macd_line[m - 1],
            signal: signal_line[n - 1],
            histogram: macd_line[m - 1] - signal_line[n - 1],
        };
        ensure_finite(
            "MACD",
            &[reading.macd, reading.signal, reading.prev_macd, reading.prev_signal],
        )?;
        Ok(reading)
    }
}
