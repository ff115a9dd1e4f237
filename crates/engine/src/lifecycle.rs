use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use common::{Candle, Direction, Error, OrderRequest, Result, TradeOutcome};
use risk::{RiskManager, RiskSummary};
use strategy::{CandleWindow, Strategy};

use crate::TradeExecutor;

/// Cloneable handle used to stop a running `TradingLoop`.
#[derive(Clone)]
pub struct EngineHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl EngineHandle {
    /// Ask the loop to stop before the next candle. A trade already awaiting
    /// its outcome is allowed to finish.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

/// What happened to one candle.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Invalid or out-of-order candle, skipped.
    Rejected(String),
    /// Not enough candles for the strategy yet.
    WarmingUp { have: usize, need: usize },
    /// No directional signal (including degraded evaluations).
    Held { degraded: bool },
    /// Directional signal blocked by an active cooldown.
    Suppressed(Direction),
    Traded {
        direction: Direction,
        stake: f64,
        outcome: TradeOutcome,
    },
    /// The broker failed to place or resolve the order.
    ExecutionFailed { direction: Direction, stake: f64 },
}

/// Single-consumer orchestration: candle → window → signal → risk gate →
/// order → outcome → risk update.
pub struct TradingLoop {
    symbol: String,
    expiry: Duration,
    window: CandleWindow,
    strategy: Box<dyn Strategy>,
    risk: RiskManager,
    executor: TradeExecutor,
    shutdown_rx: watch::Receiver<bool>,
}

impl TradingLoop {
    pub fn new(
        symbol: impl Into<String>,
        expiry: Duration,
        window_capacity: usize,
        strategy: Box<dyn Strategy>,
        risk: RiskManager,
        executor: TradeExecutor,
    ) -> Result<(Self, EngineHandle)> {
        if window_capacity < strategy.min_candles() {
            return Err(Error::Config(format!(
                "window_capacity {window_capacity} is smaller than the {} candles '{}' needs",
                strategy.min_candles(),
                strategy.name()
            )));
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = EngineHandle {
            shutdown_tx: Arc::new(shutdown_tx),
        };

        let engine = TradingLoop {
            symbol: symbol.into(),
            expiry,
            window: CandleWindow::new(window_capacity),
            strategy,
            risk,
            executor,
            shutdown_rx,
        };
        Ok((engine, handle))
    }

    pub fn risk(&self) -> &RiskManager {
        &self.risk
    }

    pub fn window(&self) -> &CandleWindow {
        &self.window
    }

    /// Consume candles until stopped.
    ///
    /// Returns the final statistics on a requested stop (or when every
    /// `EngineHandle` has been dropped). A stream that ends on its own is an
    /// error.
    pub async fn run(mut self, mut candles: mpsc::Receiver<Candle>) -> Result<RiskSummary> {
        info!(
            symbol = %self.symbol,
            strategy = %self.strategy.name(),
            warm_up = self.strategy.min_candles(),
            "Trading loop running"
        );
        let mut shutdown = self.shutdown_rx.clone();

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        info!("All engine handles dropped, stopping");
                        break;
                    }
                }

                candle = candles.recv() => {
                    match candle {
                        Some(candle) => {
                            self.process_candle(candle).await;
                        }
                        None => {
                            warn!(symbol = %self.symbol, "Candle stream closed");
                            return Err(Error::StreamClosed);
                        }
                    }
                }
            }
        }

        let summary = self.risk.summary();
        info!(summary = %summary, "Trading loop stopped");
        Ok(summary)
    }

    /// Run one candle through the pipeline.
    pub async fn process_candle(&mut self, candle: Candle) -> StepOutcome {
        debug!(candle = %candle, "Candle received");

        if let Err(e) = self.window.try_append(candle) {
            warn!(error = %e, "Skipping candle");
            return StepOutcome::Rejected(e.to_string());
        }

        let need = self.strategy.min_candles();
        if !self.window.is_ready(need) {
            debug!(have = self.window.len(), need = need, "Warming up");
            return StepOutcome::WarmingUp {
                have: self.window.len(),
                need,
            };
        }

        let evaluation = self.strategy.evaluate(&self.window);
        if evaluation.is_degraded() {
            warn!(reason = %evaluation.reason(), "Indicators degraded, holding");
        } else {
            info!(
                signal = %evaluation.signal(),
                close = candle.close,
                reason = %evaluation.reason(),
                "Signal evaluated"
            );
        }

        // Cooldown is consumed on every steady-state candle, HOLD included.
        let permitted = self.risk.should_trade();

        let Some(direction) = evaluation.signal().direction() else {
            return StepOutcome::Held {
                degraded: evaluation.is_degraded(),
            };
        };

        if !permitted {
            info!(
                direction = %direction,
                cooldown_remaining = self.risk.state().cooldown_remaining,
                "Signal suppressed by cooldown"
            );
            return StepOutcome::Suppressed(direction);
        }

        let stake = self.risk.current_stake();
        let order = OrderRequest::new(&self.symbol, direction, stake, self.expiry);
        match self.executor.execute(&order).await {
            Some(outcome) => {
                self.risk.record_outcome(&outcome);
                info!(summary = %self.risk.summary(), "Trade complete");
                StepOutcome::Traded {
                    direction,
                    stake,
                    outcome,
                }
            }
            None => {
                warn!(
                    direction = %direction,
                    stake = stake,
                    "Execution failed, risk state unchanged"
                );
                StepOutcome::ExecutionFailed { direction, stake }
            }
        }
    }
}
