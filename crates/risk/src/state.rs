use serde::{Deserialize, Serialize};

use common::{TradeOutcome, TradeResult};

use crate::RiskConfig;

/// Stake progression, loss counters and trade statistics.
///
/// A plain value: transitions take `self` and return the next state, so the
/// whole state machine can be driven without a broker session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskState {
    pub current_stake: f64,
    pub initial_stake: f64,
    pub martingale_step: u32,
    pub martingale_step_cap: u32,
    pub consecutive_losses: u32,
    pub consecutive_loss_cap: u32,
    pub cooldown_remaining: u32,
    pub cooldown_duration: u32,
    pub total_trades: u64,
    pub winning_trades: u64,
    /// Win payouts minus lost stakes.
    pub net_profit: f64,
}

/// What forced a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CooldownTrigger {
    /// Lost at the last step of the martingale progression.
    MartingaleCapReached,
    /// Hit the consecutive-loss limit.
    ConsecutiveLossCap,
}

impl std::fmt::Display for CooldownTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CooldownTrigger::MartingaleCapReached => write!(f, "martingale cap reached"),
            CooldownTrigger::ConsecutiveLossCap => write!(f, "consecutive loss cap reached"),
        }
    }
}

/// Notable transitions, emitted for logging.
#[derive(Debug, Clone, PartialEq)]
pub enum RiskEvent {
    MartingaleAdvanced { step: u32, stake: f64 },
    MartingaleReset { from_step: u32 },
    CooldownEntered { trigger: CooldownTrigger, opportunities: u32 },
}

/// Read-only statistics for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_trades: u64,
    pub winning_trades: u64,
    /// Fraction of winning trades, `0.0` before the first trade.
    pub win_rate: f64,
    pub current_stake: f64,
    pub net_profit: f64,
    pub martingale_step: u32,
    pub cooldown_remaining: u32,
}

impl std::fmt::Display for RiskSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trades={} wins={} win_rate={:.1}% stake={:.2} net={:+.2}",
            self.total_trades,
            self.winning_trades,
            self.win_rate * 100.0,
            self.current_stake,
            self.net_profit
        )
    }
}

impl RiskState {
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            current_stake: config.initial_stake,
            initial_stake: config.initial_stake,
            martingale_step: 0,
            martingale_step_cap: config.martingale_step_cap,
            consecutive_losses: 0,
            consecutive_loss_cap: config.consecutive_loss_cap,
            cooldown_remaining: 0,
            cooldown_duration: config.cooldown_duration,
            total_trades: 0,
            winning_trades: 0,
            net_profit: 0.0,
        }
    }

    /// Apply a resolved trade. The trade is assumed to have been placed at
    /// `current_stake`.
    #[must_use]
    pub fn apply_outcome(mut self, outcome: &TradeOutcome) -> (Self, Vec<RiskEvent>) {
        let mut events = Vec::new();
        self.total_trades += 1;

        match outcome.result {
            TradeResult::Win => {
                self.winning_trades += 1;
                self.net_profit += outcome.payout;
                if self.martingale_step > 0 {
                    events.push(RiskEvent::MartingaleReset {
                        from_step: self.martingale_step,
                    });
                }
                self.reset_progression();
                self.consecutive_losses = 0;
                self.cooldown_remaining = 0;
            }
            TradeResult::Loss => {
                self.net_profit -= self.current_stake;
                self.consecutive_losses += 1;

                if self.martingale_step + 1 < self.martingale_step_cap {
                    self.martingale_step += 1;
                    self.current_stake = self.stake_at(self.martingale_step);
                    events.push(RiskEvent::MartingaleAdvanced {
                        step: self.martingale_step,
                        stake: self.current_stake,
                    });
                } else {
                    events.push(RiskEvent::MartingaleReset {
                        from_step: self.martingale_step,
                    });
                    self.reset_progression();
                    self.cooldown_remaining = self.cooldown_duration;
                    events.push(RiskEvent::CooldownEntered {
                        trigger: CooldownTrigger::MartingaleCapReached,
                        opportunities: self.cooldown_duration,
                    });
                }
            }
        }

        if self.consecutive_losses >= self.consecutive_loss_cap {
            self.cooldown_remaining = self.cooldown_duration;
            self.consecutive_losses = 0;
            events.push(RiskEvent::CooldownEntered {
                trigger: CooldownTrigger::ConsecutiveLossCap,
                opportunities: self.cooldown_duration,
            });
        }

        (self, events)
    }

    /// One trading opportunity. Returns `false` (and consumes one unit of
    /// cooldown) while a cooldown is active.
    #[must_use]
    pub fn check_opportunity(mut self) -> (Self, bool) {
        if self.cooldown_remaining > 0 {
            self.cooldown_remaining -= 1;
            (self, false)
        } else {
            (self, true)
        }
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown_remaining > 0
    }

    pub fn win_rate(&self) -> f64 {
        if self.total_trades == 0 {
            0.0
        } else {
            self.winning_trades as f64 / self.total_trades as f64
        }
    }

    pub fn summary(&self) -> RiskSummary {
        RiskSummary {
            total_trades: self.total_trades,
            winning_trades: self.winning_trades,
            win_rate: self.win_rate(),
            current_stake: self.current_stake,
            net_profit: self.net_profit,
            martingale_step: self.martingale_step,
            cooldown_remaining: self.cooldown_remaining,
        }
    }

    fn stake_at(&self, step: u32) -> f64 {
        self.initial_stake * 2f64.powi(step as i32)
    }

    fn reset_progression(&mut self) {
        self.martingale_step = 0;
        self.current_stake = self.initial_stake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(step_cap: u32, loss_cap: u32, cooldown: u32) -> RiskConfig {
        RiskConfig {
            initial_stake: 1.0,
            martingale_step_cap: step_cap,
            consecutive_loss_cap: loss_cap,
            cooldown_duration: cooldown,
        }
    }

    fn lose(state: RiskState, n: usize) -> RiskState {
        (0..n).fold(state, |s, _| s.apply_outcome(&TradeOutcome::loss()).0)
    }

    #[test]
    fn losses_double_stake() {
        let state = RiskState::new(&config(4, 10, 5));
        for n in 0..3 {
            let s = lose(state, n);
            assert_eq!(s.current_stake, 2f64.powi(n as i32), "after {n} losses");
            assert_eq!(s.martingale_step, n as u32);
        }
    }

    #[test]
    fn losing_at_step_cap_resets_and_cools_down() {
        let state = lose(RiskState::new(&config(4, 10, 5)), 4);
        assert_eq!(state.current_stake, 1.0);
        assert_eq!(state.martingale_step, 0);
        assert_eq!(state.cooldown_remaining, 5);
        assert_eq!(state.total_trades, 4);
    }

    #[test]
    fn step_cap_loss_emits_cooldown_event() {
        let state = lose(RiskState::new(&config(2, 10, 3)), 1);
        let (_, events) = state.apply_outcome(&TradeOutcome::loss());
        assert!(events.contains(&RiskEvent::CooldownEntered {
            trigger: CooldownTrigger::MartingaleCapReached,
            opportunities: 3,
        }));
    }

    #[test]
    fn consecutive_loss_cap_triggers_independently() {
        let state = lose(RiskState::new(&config(4, 3, 5)), 3);
        assert_eq!(state.cooldown_remaining, 5);
        assert_eq!(state.consecutive_losses, 0);
        // progression continues
        assert_eq!(state.martingale_step, 3);
        assert_eq!(state.current_stake, 8.0);
    }

    #[test]
    fn both_triggers_can_fire_on_the_same_loss() {
        let state = lose(RiskState::new(&config(3, 3, 4)), 2);
        let (state, events) = state.apply_outcome(&TradeOutcome::loss());
        assert_eq!(state.cooldown_remaining, 4);
        assert_eq!(state.current_stake, 1.0);
        let cooldowns = events
            .iter()
            .filter(|e| matches!(e, RiskEvent::CooldownEntered { .. }))
            .count();
        assert_eq!(cooldowns, 2);
    }

    #[test]
    fn win_resets_progression_from_any_step() {
        for n in 0..4 {
            let state = lose(RiskState::new(&config(5, 10, 5)), n);
            let (state, _) = state.apply_outcome(&TradeOutcome::win(0.92));
            assert_eq!(state.current_stake, 1.0);
            assert_eq!(state.martingale_step, 0);
            assert_eq!(state.consecutive_losses, 0);
        }
    }

    #[test]
    fn win_clears_cooldown() {
        let state = lose(RiskState::new(&config(4, 2, 5)), 2);
        assert!(state.in_cooldown());
        let (state, _) = state.apply_outcome(&TradeOutcome::win(0.9));
        assert_eq!(state.cooldown_remaining, 0);
    }

    #[test]
    fn cooldown_blocks_exactly_duration_opportunities() {
        let mut state = lose(RiskState::new(&config(4, 1, 3)), 1);
        assert_eq!(state.cooldown_remaining, 3);
        for expected_left in (0..3).rev() {
            let (next, allowed) = state.check_opportunity();
            assert!(!allowed);
            assert_eq!(next.cooldown_remaining, expected_left);
            state = next;
        }
        let (state, allowed) = state.check_opportunity();
        assert!(allowed);
        assert_eq!(state.cooldown_remaining, 0);
    }

    #[test]
    fn win_rate_zero_without_trades() {
        let state = RiskState::new(&RiskConfig::default());
        assert_eq!(state.summary().win_rate, 0.0);
    }

    #[test]
    fn win_rate_one_in_three() {
        let state = RiskState::new(&config(4, 10, 5));
        let (state, _) = state.apply_outcome(&TradeOutcome::win(0.92));
        let state = lose(state, 2);
        let summary = state.summary();
        assert_eq!(summary.total_trades, 3);
        assert!((summary.win_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!(summary.to_string().contains("win_rate=33.3%"));
    }

    #[test]
    fn net_profit_tracks_payouts_and_stakes() {
        let state = RiskState::new(&config(4, 10, 5));
        let state = lose(state, 2); // -1, -2
        let (state, _) = state.apply_outcome(&TradeOutcome::win(3.68)); // stake 4 won
        assert!((state.net_profit - 0.68).abs() < 1e-9);
    }

    #[test]
    fn step_cap_of_one_never_progresses() {
        let state = lose(RiskState::new(&config(1, 10, 2)), 1);
        assert_eq!(state.current_stake, 1.0);
        assert_eq!(state.cooldown_remaining, 2);
    }
}
