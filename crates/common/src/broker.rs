use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{Candle, OrderHandle, OrderRequest, Result, TradeOutcome};

/// Abstraction over the brokerage session.
///
/// `PaperSession` implements this for simulation. A live broker would wrap its
/// client library behind the same three calls.
///
/// Only `TradeExecutor` in `crates/engine` places orders. Every order must be
/// cleared by the `RiskManager` before it reaches the executor.
#[async_trait]
pub trait BrokerSession: Send + Sync {
    /// Subscribe to candles for `symbol`, one per `granularity` bucket.
    /// Candles arrive in time order; the stream may run indefinitely.
    async fn open_timed_stream(
        &self,
        symbol: &str,
        granularity: Duration,
    ) -> Result<mpsc::Receiver<Candle>>;

    /// Place a binary option and return the handle used to look up its result.
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderHandle>;

    /// Wait until the option expires and report whether it won.
    async fn await_outcome(&self, handle: &OrderHandle) -> Result<TradeOutcome>;
}
