use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One aggregated price bucket from the broker's timed stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            open,
            high,
            low,
            close,
            timestamp,
        }
    }

    /// Reject candles that would poison indicator math: non-finite or
    /// non-positive prices, or an open/close outside the high/low range.
    pub fn validate(&self) -> Result<()> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(Error::InvalidCandle(format!(
                "non-finite or non-positive price in {self}"
            )));
        }
        if self.high < self.low {
            return Err(Error::InvalidCandle(format!("high below low in {self}")));
        }
        let in_range = |p: f64| p >= self.low && p <= self.high;
        if !in_range(self.open) || !in_range(self.close) {
            return Err(Error::InvalidCandle(format!(
                "open/close outside high/low range in {self}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Candle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] O={:.5} H={:.5} L={:.5} C={:.5}",
            self.timestamp.format("%H:%M:%S"),
            self.open,
            self.high,
            self.low,
            self.close
        )
    }
}

/// Side of a binary option: CALL bets the price ends higher, PUT lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Call,
    Put,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Call => write!(f, "CALL"),
            Direction::Put => write!(f, "PUT"),
        }
    }
}

/// Directional output of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Call,
    Put,
    Hold,
}

impl Signal {
    /// The order side this signal asks for, `None` for `Hold`.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Signal::Call => Some(Direction::Call),
            Signal::Put => Some(Direction::Put),
            Signal::Hold => None,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Call => write!(f, "CALL"),
            Signal::Put => write!(f, "PUT"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// A binary option to be placed with the broker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub id: String,
    pub symbol: String,
    pub direction: Direction,
    pub stake: f64,
    pub expiry: Duration,
}

impl OrderRequest {
    pub fn new(
        symbol: impl Into<String>,
        direction: Direction,
        stake: f64,
        expiry: Duration,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            direction,
            stake,
            expiry,
        }
    }
}

/// Broker-assigned identifier used to look up a trade's result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderHandle(pub String);

impl std::fmt::Display for OrderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Win => write!(f, "win"),
            TradeResult::Loss => write!(f, "loss"),
        }
    }
}

/// Resolved trade as reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeOutcome {
    pub result: TradeResult,
    /// Profit credited on a win; zero on a loss.
    pub payout: f64,
}

impl TradeOutcome {
    pub fn win(payout: f64) -> Self {
        Self {
            result: TradeResult::Win,
            payout,
        }
    }

    pub fn loss() -> Self {
        Self {
            result: TradeResult::Loss,
            payout: 0.0,
        }
    }

    pub fn is_win(&self) -> bool {
        self.result == TradeResult::Win
    }
}
