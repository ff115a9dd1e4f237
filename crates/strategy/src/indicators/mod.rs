pub mod macd;
pub mod moving_average;
pub mod stochastic;

pub use macd::{MacdIndicator, MacdReading};
pub use moving_average::{ema_series, sma, sma_series};
pub use stochastic::{StochasticIndicator, StochasticReading};

use thiserror::Error;

/// Why an indicator could not produce a value. Strategies turn these into a
/// degraded evaluation instead of propagating them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("need {needed} values, have {have}")]
    InsufficientData { needed: usize, have: usize },

    #[error("zero high/low range over {period} candles")]
    ZeroRange { period: usize },

    #[error("non-finite {0} value")]
    NonFinite(&'static str),
}

pub(crate) fn ensure_finite(name: &'static str, values: &[f64]) -> Result<(), IndicatorError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(IndicatorError::NonFinite(name))
    }
}
