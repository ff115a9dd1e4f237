pub mod config;
pub mod executor;
pub mod lifecycle;

pub use config::BotConfig;
pub use executor::TradeExecutor;
pub use lifecycle::{EngineHandle, StepOutcome, TradingLoop};
