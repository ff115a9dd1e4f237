/// Process-level settings loaded from environment variables at startup.
///
/// Trading parameters (symbol, strategy, risk caps) live in the TOML bot
/// config pointed to by `bot_config_path`; this struct only carries what
/// differs between deployments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Broker session identifier. When unset the binary prompts for it.
    pub session_id: Option<String>,

    // Bot config file path
    pub bot_config_path: String,

    // Paper session
    pub paper_start_price: f64,
    pub paper_volatility: f64,
    pub paper_payout_ratio: f64,
    pub paper_seed: Option<u64>,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Unset or unparsable optional values fall back
    /// to their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            session_id: optional_env("SESSION_ID").filter(|s| !s.trim().is_empty()),
            bot_config_path: optional_env("BOT_CONFIG_PATH")
                .unwrap_or_else(|| "config/bot.toml".to_string()),
            paper_start_price: optional_env("PAPER_START_PRICE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1.08),
            paper_volatility: optional_env("PAPER_VOLATILITY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.0004),
            paper_payout_ratio: optional_env("PAPER_PAYOUT_RATIO")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.92),
            paper_seed: optional_env("PAPER_SEED").and_then(|v| v.parse().ok()),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
