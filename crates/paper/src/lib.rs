pub mod feed;

pub use feed::SyntheticFeed;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use common::{
    BrokerSession, Candle, Direction, Error, OrderHandle, OrderRequest, Result, TradeOutcome,
};

const STREAM_BUFFER: usize = 256;

/// Settings for the simulated session.
#[derive(Debug, Clone)]
pub struct PaperConfig {
    pub start_price: f64,
    /// Maximum relative move per sub-tick.
    pub volatility: f64,
    /// Random-walk steps aggregated into one candle.
    pub ticks_per_candle: usize,
    /// Profit paid on a winning option as a fraction of the stake.
    pub payout_ratio: f64,
    /// Fixed seed for a reproducible price path.
    pub seed: Option<u64>,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            start_price: 1.08,
            volatility: 0.0004,
            ticks_per_candle: 8,
            payout_ratio: 0.92,
            seed: None,
        }
    }
}

#[derive(Debug, Clone)]
struct OpenOption {
    symbol: String,
    direction: Direction,
    stake: f64,
    entry_price: f64,
    expires_at: Instant,
}

/// Simulated brokerage session for paper trading.
///
/// Candles come from a `SyntheticFeed`; options resolve against the latest
/// feed price at expiry. No real orders are ever sent anywhere.
pub struct PaperSession {
    config: PaperConfig,
    /// Latest known price per symbol, updated by the feed task or `update_price`.
    prices: Arc<RwLock<HashMap<String, f64>>>,
    /// Placed options awaiting resolution.
    open_options: Arc<Mutex<HashMap<OrderHandle, OpenOption>>>,
}

impl PaperSession {
    pub fn new(session_id: &str, config: PaperConfig) -> Self {
        info!(
            session = %mask(session_id),
            start_price = config.start_price,
            volatility = config.volatility,
            payout_ratio = config.payout_ratio,
            "PaperSession initialized"
        );
        Self {
            config,
            prices: Arc::new(RwLock::new(HashMap::new())),
            open_options: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Override the latest price for a symbol.
    pub async fn update_price(&self, symbol: &str, price: f64) {
        self.prices.write().await.insert(symbol.to_string(), price);
    }

    async fn price(&self, symbol: &str) -> Result<f64> {
        self.prices.read().await.get(symbol).copied().ok_or_else(|| {
            Error::Broker(format!(
                "PaperSession has no price for '{symbol}'. Open a stream or set a price first."
            ))
        })
    }
}

#[async_trait]
impl BrokerSession for PaperSession {
    async fn open_timed_stream(
        &self,
        symbol: &str,
        granularity: Duration,
    ) -> Result<mpsc::Receiver<Candle>> {
        if granularity.is_zero() {
            return Err(Error::Broker("stream granularity must be > 0".to_string()));
        }

        let start_price = self
            .prices
            .read()
            .await
            .get(symbol)
            .copied()
            .unwrap_or(self.config.start_price);
        let mut feed = SyntheticFeed::new(
            start_price,
            self.config.volatility,
            self.config.ticks_per_candle,
            self.config.seed,
        );
        self.update_price(symbol, start_price).await;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let prices = self.prices.clone();
        let symbol = symbol.to_string();

        info!(symbol = %symbol, granularity = ?granularity, "Paper candle stream opened");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(granularity);
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                let candle = feed.next_candle(Utc::now());
                prices.write().await.insert(symbol.clone(), candle.close);
                if tx.send(candle).await.is_err() {
                    debug!(symbol = %symbol, "Paper stream receiver dropped");
                    return;
                }
            }
        });

        Ok(rx)
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<OrderHandle> {
        if !order.stake.is_finite() || order.stake <= 0.0 {
            return Err(Error::OrderRejected(format!(
                "stake must be positive, got {}",
                order.stake
            )));
        }
        let entry_price = self.price(&order.symbol).await?;

        let handle = OrderHandle(order.id.clone());
        let option = OpenOption {
            symbol: order.symbol.clone(),
            direction: order.direction,
            stake: order.stake,
            entry_price,
            expires_at: Instant::now() + order.expiry,
        };
        debug!(
            handle = %handle,
            symbol = %option.symbol,
            direction = %option.direction,
            stake = option.stake,
            entry = entry_price,
            "Paper option placed"
        );
        self.open_options.lock().await.insert(handle.clone(), option);
        Ok(handle)
    }

    async fn await_outcome(&self, handle: &OrderHandle) -> Result<TradeOutcome> {
        let option = self
            .open_options
            .lock()
            .await
            .remove(handle)
            .ok_or_else(|| Error::UnknownOrder(handle.to_string()))?;

        tokio::time::sleep_until(option.expires_at).await;
        let exit_price = self.price(&option.symbol).await?;

        let won = match option.direction {
            Direction::Call => exit_price > option.entry_price,
            Direction::Put => exit_price < option.entry_price,
        };
        let outcome = if won {
            TradeOutcome::win(option.stake * self.config.payout_ratio)
        } else {
            TradeOutcome::loss()
        };

        if exit_price == option.entry_price {
            warn!(handle = %handle, "Paper option expired at entry price, settled as loss");
        }
        debug!(
            handle = %handle,
            entry = option.entry_price,
            exit = exit_price,
            result = %outcome.result,
            "Paper option resolved"
        );
        Ok(outcome)
    }
}

/// Show only the last four characters of a session identifier.
fn mask(session_id: &str) -> String {
    let chars: Vec<char> = session_id.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
