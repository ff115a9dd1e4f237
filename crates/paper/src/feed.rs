use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::Candle;

/// Random-walk candle generator.
///
/// Each candle opens at the previous close and walks `ticks_per_candle`
/// multiplicative steps of at most `volatility` (relative) each.
pub struct SyntheticFeed {
    rng: StdRng,
    price: f64,
    volatility: f64,
    ticks_per_candle: usize,
}

impl SyntheticFeed {
    /// Create a generator. A seed makes the price path reproducible.
    pub fn new(
        start_price: f64,
        volatility: f64,
        ticks_per_candle: usize,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            price: start_price,
            volatility: volatility.clamp(0.0, 0.5),
            ticks_per_candle: ticks_per_candle.max(1),
        }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn next_candle(&mut self, timestamp: DateTime<Utc>) -> Candle {
        let open = self.price;
        let mut high = open;
        let mut low = open;

        for _ in 0..self.ticks_per_candle {
            let step = if self.volatility > 0.0 {
                self.rng.gen_range(-self.volatility..self.volatility)
            } else {
                0.0
            };
            self.price *= 1.0 + step;
            high = high.max(self.price);
            low = low.min(self.price);
        }

        Candle::new(open, high, low, self.price, timestamp)
    }
}
