use super::{ensure_finite, sma_series, IndicatorError};

/// Slow Stochastic Oscillator.
///
/// Raw %K = 100 · (close − lowest low) / (highest high − lowest low) over
/// `k_period` candles, smoothed with an SMA of `k_smoothing`. %D is an SMA of
/// the smoothed %K over `d_period`.
#[derive(Debug, Clone)]
pub struct StochasticIndicator {
    pub k_period: usize,
    pub k_smoothing: usize,
    pub d_period: usize,
}

/// %K and %D for the latest two candles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticReading {
    pub prev_k: f64,
    pub prev_d: f64,
    pub k: f64,
    pub d: f64,
}

impl StochasticReading {
    pub fn k_crosses_d_up(&self) -> bool {
        self.prev_k <= self.prev_d && self.k > self.d
    }

    pub fn k_crosses_d_down(&self) -> bool {
        self.prev_k >= self.prev_d && self.k < self.d
    }
}

impl StochasticIndicator {
    pub fn new(k_period: usize, k_smoothing: usize, d_period: usize) -> Self {
        assert!(
            k_period > 0 && k_smoothing > 0 && d_period > 0,
            "stochastic periods must be > 0"
        );
        Self {
            k_period,
            k_smoothing,
            d_period,
        }
    }

    /// Candles needed for two consecutive %D values.
    pub fn min_len(&self) -> usize {
        self.k_period + self.k_smoothing + self.d_period - 1
    }

    /// Compute the latest two %K/%D pairs. Inputs are parallel slices, oldest
    /// first; only the trailing `min_len()` candles influence the result.
    pub fn compute(
        &self,
        highs: &[f64],
        lows: &[f64],
        closes: &[f64],
    ) -> Result<StochasticReading, IndicatorError> {
        let len = closes.len().min(highs.len()).min(lows.len());
        if len < self.min_len() {
            return Err(IndicatorError::InsufficientData {
                needed: self.min_len(),
                have: len,
            });
        }

        let start = len - self.min_len();
        let highs = &highs[start..len];
        let lows = &lows[start..len];
        let closes = &closes[start..len];
        ensure_finite("high", highs)?;
        ensure_finite("low", lows)?;
        ensure_finite("close", closes)?;

        let mut raw_k = Vec::with_capacity(closes.len() + 1 - self.k_period);
        for end in self.k_period - 1..closes.len() {
            let from = end + 1 - self.k_period;
            let highest = highs[from..=end].iter().copied().fold(f64::MIN, f64::max);
            let lowest = lows[from..=end].iter().copied().fold(f64::MAX, f64::min);
            let range = highest - lowest;
            if range <= 0.0 {
                return Err(IndicatorError::ZeroRange {
                    period: self.k_period,
                });
            }
            raw_k.push(100.0 * (closes[end] - lowest) / range);
        }

        let k_line = sma_series(&raw_k, self.k_smoothing);
        let d_line = sma_series(&k_line, self.d_period);
        if d_line.len() < 2 {
            return Err(IndicatorError::InsufficientData {
                needed: self.min_len(),
                have: len,
            });
        }

        let k = k_line.len();
        let d = d_line.len();
        Ok(StochasticReading {
            prev_k: k_line[k - 2],
            prev_d: d_line[d - 2],
            k: k_line[k - 1],
            d: d_line[d - 1],
        })
    }
}
