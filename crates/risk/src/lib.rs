pub mod config;
pub mod manager;
pub mod state;

pub use config::RiskConfig;
pub use manager::RiskManager;
pub use state::{CooldownTrigger, RiskEvent, RiskState, RiskSummary};
