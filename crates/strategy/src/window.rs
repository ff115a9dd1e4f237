use std::collections::VecDeque;

use common::{Candle, Error, Result};

/// Bounded, arrival-ordered buffer of the most recent candles.
///
/// Once `capacity` is exceeded the oldest candles are evicted first, so the
/// window always holds the newest `min(len, capacity)` candles in order.
#[derive(Debug, Clone)]
pub struct CandleWindow {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl CandleWindow {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "candle window capacity must be > 0");
        Self {
            candles: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Add one candle, then trim from the front down to capacity.
    pub fn append(&mut self, candle: Candle) {
        self.candles.push_back(candle);
        while self.candles.len() > self.capacity {
            self.candles.pop_front();
        }
    }

    /// Validate `candle` and its arrival order before appending it.
    /// A rejected candle leaves the window untouched.
    pub fn try_append(&mut self, candle: Candle) -> Result<()> {
        candle.validate()?;
        if let Some(last) = self.candles.back() {
            if candle.timestamp < last.timestamp {
                return Err(Error::OutOfOrder(format!(
                    "candle at {} arrived after {}",
                    candle.timestamp, last.timestamp
                )));
            }
        }
        self.append(candle);
        Ok(())
    }

    /// True when at least `min_size` candles are buffered.
    pub fn is_ready(&self, min_size: usize) -> bool {
        self.candles.len() >= min_size
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }
}
