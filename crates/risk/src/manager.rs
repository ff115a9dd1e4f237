use tracing::{info, warn};

use common::{Result, TradeOutcome};

use crate::{RiskConfig, RiskEvent, RiskState, RiskSummary};

/// The gatekeeper between the strategy layer and the trade executor.
///
/// Sole owner of the `RiskState`. Every directional signal must be cleared by
/// `should_trade()` before an order is placed, and every resolved trade must
/// be fed back through `record_outcome()`.
#[derive(Debug)]
pub struct RiskManager {
    state: RiskState,
}

impl RiskManager {
    pub fn new(config: &RiskConfig) -> Result<Self> {
        config.validate()?;
        info!(
            initial_stake = config.initial_stake,
            martingale_step_cap = config.martingale_step_cap,
            max_stake = config.max_stake(),
            consecutive_loss_cap = config.consecutive_loss_cap,
            cooldown = config.cooldown_duration,
            "RiskManager initialized"
        );
        Ok(Self {
            state: RiskState::new(config),
        })
    }

    /// Stake for the next order.
    pub fn current_stake(&self) -> f64 {
        self.state.current_stake
    }

    pub fn state(&self) -> &RiskState {
        &self.state
    }

    /// Consume one trading opportunity. Returns `false` while cooling down.
    pub fn should_trade(&mut self) -> bool {
        let (next, allowed) = self.state.check_opportunity();
        self.state = next;
        if !allowed {
            info!(
                remaining = self.state.cooldown_remaining,
                "Cooldown active, opportunity skipped"
            );
        }
        allowed
    }

    /// Update stake and statistics from a resolved trade.
    pub fn record_outcome(&mut self, outcome: &TradeOutcome) {
        let staked = self.state.current_stake;
        let (next, events) = self.state.apply_outcome(outcome);
        self.state = next;

        info!(
            result = %outcome.result,
            staked = staked,
            payout = outcome.payout,
            next_stake = self.state.current_stake,
            consecutive_losses = self.state.consecutive_losses,
            "Trade outcome recorded"
        );

        for event in events {
            match event {
                RiskEvent::MartingaleAdvanced { step, stake } => {
                    info!(step = step, stake = stake, "Martingale step advanced");
                }
                RiskEvent::MartingaleReset { from_step } => {
                    info!(from_step = from_step, "Martingale progression reset");
                }
                RiskEvent::CooldownEntered {
                    trigger,
                    opportunities,
                } => {
                    warn!(
                        trigger = %trigger,
                        opportunities = opportunities,
                        "Cooldown entered"
                    );
                }
            }
        }
    }

    pub fn summary(&self) -> RiskSummary {
        self.state.summary()
    }
}
