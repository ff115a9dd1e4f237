use std::time::Duration;

use serde::{Deserialize, Serialize};

use common::{Error, Result};
use risk::RiskConfig;
use strategy::StrategyConfig;

/// Bot config file (TOML).
///
/// Example `config/bot.toml`:
/// ```toml
/// symbol = "EURUSD_otc"
/// granularity_secs = 2
/// expiry_secs = 5
/// window_capacity = 100
///
/// [strategy]
/// type = "confluence"
/// name = "EURUSD Stoch+MACD"
///
/// [risk]
/// initial_stake = 1.0
/// martingale_step_cap = 4
/// consecutive_loss_cap = 3
/// cooldown_duration = 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Instrument to trade, e.g. "EURUSD_otc".
    pub symbol: String,
    /// Candle bucket size requested from the broker stream.
    #[serde(default = "default_granularity_secs")]
    pub granularity_secs: u64,
    /// Option expiry for every order.
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,
    /// Candles kept in the rolling window.
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
    #[serde(default)]
    pub strategy: StrategyConfig,
    #[serde(default)]
    pub risk: RiskConfig,
}

fn default_granularity_secs() -> u64 {
    2
}

fn default_expiry_secs() -> u64 {
    5
}

fn default_window_capacity() -> usize {
    100
}

impl BotConfig {
    /// Load and validate the config file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read bot config at '{path}': {e}")))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("invalid bot config at '{path}': {e}")))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: BotConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::Config("symbol must not be empty".to_string()));
        }
        if self.granularity_secs == 0 || self.expiry_secs == 0 {
            return Err(Error::Config(
                "granularity_secs and expiry_secs must be > 0".to_string(),
            ));
        }
        if self.window_capacity == 0 {
            return Err(Error::Config("window_capacity must be > 0".to_string()));
        }
        self.risk.validate()
    }

    pub fn granularity(&self) -> Duration {
        Duration::from_secs(self.granularity_secs)
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = BotConfig::parse(r#"symbol = "EURUSD_otc""#).unwrap();
        assert_eq!(cfg.granularity(), Duration::from_secs(2));
        assert_eq!(cfg.expiry(), Duration::from_secs(5));
        assert_eq!(cfg.window_capacity, 100);
        assert_eq!(cfg.strategy.strategy_type, "confluence");
        assert_eq!(cfg.risk.martingale_step_cap, 4);
    }

    #[test]
    fn full_config_parses() {
        let text = r#"
            symbol = "EURUSD_otc"
            granularity_secs = 1
            expiry_secs = 60
            window_capacity = 50

            [strategy]
            type = "sma_crossover"
            name = "EURUSD SMA"
            min_candles = 20

            [strategy.params]
            short_window = 5
            long_window = 10

            [risk]
            initial_stake = 2.0
            martingale_step_cap = 3
            consecutive_loss_cap = 2
            cooldown_duration = 10
        "#;
        let cfg = BotConfig::parse(text).unwrap();
        assert_eq!(cfg.strategy.min_candles, Some(20));
        assert_eq!(cfg.risk.initial_stake, 2.0);
        assert_eq!(cfg.expiry(), Duration::from_secs(60));
    }

    #[test]
    fn rejects_zero_expiry() {
        let err = BotConfig::parse("symbol = \"X\"\nexpiry_secs = 0").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_invalid_risk_section() {
        let text = "symbol = \"X\"\n[risk]\ninitial_stake = -1.0";
        assert!(BotConfig::parse(text).is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = BotConfig::load("/nonexistent/bot.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
