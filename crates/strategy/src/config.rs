use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `[strategy]` table of the bot config file.
///
/// ```toml
/// [strategy]
/// type = "confluence"
/// name = "EURUSD Stoch+MACD"
/// min_candles = 35
///
/// [strategy.params]
/// k_period = 14
/// k_smoothing = 3
/// d_period = 3
/// macd_fast = 12
/// macd_slow = 26
/// macd_signal = 9
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Strategy type identifier: "sma_crossover" or "confluence".
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Human-readable name shown in logs.
    pub name: String,
    /// Warm-up length before the first evaluation. Raised to the strategy's
    /// indicator lookback when smaller.
    #[serde(default)]
    pub min_candles: Option<usize>,
    /// Indicator-specific parameters.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            strategy_type: "confluence".to_string(),
            name: "Stochastic + MACD".to_string(),
            min_candles: None,
            params: HashMap::new(),
        }
    }
}
