pub mod config;
pub mod confluence;
pub mod factory;
pub mod indicators;
pub mod sma_crossover;
pub mod window;

pub use config::StrategyConfig;
pub use confluence::ConfluenceStrategy;
pub use factory::build_strategy;
pub use sma_crossover::SmaCrossoverStrategy;
pub use window::CandleWindow;

use common::Signal;

/// A signal together with the indicator values that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub signal: Signal,
    pub reason: String,
}

impl Decision {
    pub fn new(signal: Signal, reason: impl Into<String>) -> Self {
        Self {
            signal,
            reason: reason.into(),
        }
    }
}

/// Result of evaluating a strategy against the current window.
///
/// `Degraded` means the indicators could not be computed reliably; it is
/// always treated as `HOLD`.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Decided(Decision),
    Degraded { reason: String },
}

impl Evaluation {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Evaluation::Degraded {
            reason: reason.into(),
        }
    }

    pub fn signal(&self) -> Signal {
        match self {
            Evaluation::Decided(d) => d.signal,
            Evaluation::Degraded { .. } => Signal::Hold,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Evaluation::Decided(d) => &d.reason,
            Evaluation::Degraded { reason } => reason,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Evaluation::Degraded { .. })
    }
}

/// All strategy implementations must satisfy this trait.
///
/// Implementations are pure: `evaluate` depends only on the window passed in.
pub trait Strategy: Send + Sync {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Candles required before `evaluate` can produce a directional signal.
    fn min_candles(&self) -> usize;

    /// One-line summary of the indicator parameters, for the startup banner.
    fn describe(&self) -> String;

    /// Evaluate the current window.
    fn evaluate(&self, window: &CandleWindow) -> Evaluation;
}
