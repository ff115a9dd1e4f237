use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// User-configurable stake and loss controls (`[risk]` table of the bot config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Stake of the first trade in a martingale progression.
    pub initial_stake: f64,
    /// Number of stakes in one progression (initial included). Losing at the
    /// last step resets the stake and starts a cooldown.
    pub martingale_step_cap: u32,
    /// Consecutive losses that force a cooldown regardless of martingale step.
    pub consecutive_loss_cap: u32,
    /// Trading opportunities skipped once a cooldown starts.
    pub cooldown_duration: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            initial_stake: 1.0,
            martingale_step_cap: 4,
            consecutive_loss_cap: 3,
            cooldown_duration: 5,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.initial_stake.is_finite() || self.initial_stake <= 0.0 {
            return Err(Error::Config(format!(
                "initial_stake must be a positive amount, got {}",
                self.initial_stake
            )));
        }
        if self.martingale_step_cap == 0 {
            return Err(Error::Config("martingale_step_cap must be >= 1".to_string()));
        }
        if self.consecutive_loss_cap == 0 {
            return Err(Error::Config("consecutive_loss_cap must be >= 1".to_string()));
        }
        Ok(())
    }

    /// Largest stake the progression can reach.
    pub fn max_stake(&self) -> f64 {
        self.initial_stake * 2f64.powi(self.martingale_step_cap.saturating_sub(1) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(RiskConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_stake() {
        let cfg = RiskConfig {
            initial_stake: 0.0,
            ..RiskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_caps() {
        let cfg = RiskConfig {
            martingale_step_cap: 0,
            ..RiskConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = RiskConfig {
            consecutive_loss_cap: 0,
            ..RiskConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn max_stake_follows_step_cap() {
        assert_eq!(RiskConfig::default().max_stake(), 8.0);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg: RiskConfig = toml::from_str("initial_stake = 2.5").unwrap();
        assert_eq!(cfg.initial_stake, 2.5);
        assert_eq!(cfg.martingale_step_cap, 4);
    }
}
