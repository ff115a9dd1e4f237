use std::collections::HashMap;

use tracing::info;

use common::{Error, Result};

use crate::confluence::MIN_CONFLUENCE_CANDLES;
use crate::indicators::{MacdIndicator, StochasticIndicator};
use crate::{ConfluenceStrategy, SmaCrossoverStrategy, Strategy, StrategyConfig};

/// Build the configured strategy, rejecting unknown types and inconsistent
/// parameters.
pub fn build_strategy(cfg: &StrategyConfig) -> Result<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match cfg.strategy_type.as_str() {
        "sma_crossover" => {
            let short = param_usize(&cfg.params, "short_window", 5)?;
            let long = param_usize(&cfg.params, "long_window", 10)?;
            if short == 0 || short >= long {
                return Err(Error::Config(format!(
                    "sma_crossover needs 0 < short_window < long_window, got {short}/{long}"
                )));
            }
            let min_candles = cfg.min_candles.unwrap_or(long);
            Box::new(SmaCrossoverStrategy::new(&cfg.name, short, long, min_candles))
        }
        "confluence" => {
            let k_period = param_usize(&cfg.params, "k_period", 14)?;
            let k_smoothing = param_usize(&cfg.params, "k_smoothing", 3)?;
            let d_period = param_usize(&cfg.params, "d_period", 3)?;
            let fast = param_usize(&cfg.params, "macd_fast", 12)?;
            let slow = param_usize(&cfg.params, "macd_slow", 26)?;
            let signal = param_usize(&cfg.params, "macd_signal", 9)?;

            if k_period == 0 || k_smoothing == 0 || d_period == 0 {
                return Err(Error::Config(
                    "confluence stochastic periods must be > 0".to_string(),
                ));
            }
            if fast == 0 || signal == 0 || fast >= slow {
                return Err(Error::Config(format!(
                    "confluence needs 0 < macd_fast < macd_slow and macd_signal > 0, \
                     got {fast}/{slow}/{signal}"
                )));
            }
            let min_candles = cfg.min_candles.unwrap_or(MIN_CONFLUENCE_CANDLES);
            if min_candles < MIN_CONFLUENCE_CANDLES {
                return Err(Error::Config(format!(
                    "confluence min_candles must be >= {MIN_CONFLUENCE_CANDLES}, got {min_candles}"
                )));
            }

            Box::new(ConfluenceStrategy::new(
                &cfg.name,
                StochasticIndicator::new(k_period, k_smoothing, d_period),
                MacdIndicator::new(fast, slow, signal),
                min_candles,
            ))
        }
        other => {
            return Err(Error::Config(format!("unknown strategy type '{other}'")));
        }
    };

    info!(
        name = %strategy.name(),
        params = %strategy.describe(),
        "Built strategy"
    );
    Ok(strategy)
}

/// Read an optional non-negative integer parameter. A key that is present
/// with any other value is a configuration error.
fn param_usize(
    params: &HashMap<String, toml::Value>,
    key: &str,
    default: usize,
) -> Result<usize> {
    let Some(value) = params.get(key) else {
        return Ok(default);
    };
    value
        .as_integer()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| {
            Error::Config(format!(
                "strategy param `{key}` must be a non-negative integer, got {value}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(strategy_type: &str, params: &[(&str, i64)]) -> StrategyConfig {
        StrategyConfig {
            strategy_type: strategy_type.to_string(),
            name: "test".to_string(),
            min_candles: None,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), toml::Value::Integer(*v)))
                .collect(),
        }
    }

    #[test]
    fn builds_sma_crossover_with_defaults() {
        let s = build_strategy(&cfg("sma_crossover", &[])).unwrap();
        assert_eq!(s.min_candles(), 10);
        assert!(s.describe().contains("short=5 long=10"));
    }

    #[test]
    fn builds_confluence_with_defaults() {
        let s = build_strategy(&cfg("confluence", &[])).unwrap();
        assert_eq!(s.min_candles(), 35);
    }

    #[test]
    fn rejects_unknown_type() {
        let err = build_strategy(&cfg("rsi", &[])).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_fast_not_below_slow() {
        let err = build_strategy(&cfg("confluence", &[("macd_fast", 26), ("macd_slow", 12)]))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_confluence_min_candles_below_floor() {
        let mut c = cfg("confluence", &[]);
        c.min_candles = Some(20);
        assert!(build_strategy(&c).is_err());
    }

    #[test]
    fn negative_param_is_rejected() {
        let err = build_strategy(&cfg("sma_crossover", &[("short_window", -3)])).err().unwrap();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("short_window")));
    }

    #[test]
    fn non_integer_params_are_rejected() {
        let text = r#"
            type = "sma_crossover"
            name = "fractional"
            [params]
            long_window = 7.5
        "#;
        let c: StrategyConfig = toml::from_str(text).unwrap();
        assert!(matches!(build_strategy(&c), Err(Error::Config(_))));

        let text = r#"
            type = "confluence"
            name = "quoted"
            [params]
            macd_slow = "26"
        "#;
        let c: StrategyConfig = toml::from_str(text).unwrap();
        assert!(matches!(build_strategy(&c), Err(Error::Config(_))));
    }

    #[test]
    fn missing_params_use_defaults() {
        let s = build_strategy(&cfg("sma_crossover", &[])).unwrap();
        assert!(s.describe().contains("short=5 long=10"));
    }

    #[test]
    fn parses_from_toml() {
        let text = r#"
            type = "sma_crossover"
            name = "EURUSD SMA"
            min_candles = 20

            [params]
            short_window = 3
            long_window = 8
        "#;
        let c: StrategyConfig = toml::from_str(text).unwrap();
        let s = build_strategy(&c).unwrap();
        assert_eq!(s.name(), "EURUSD SMA");
        assert_eq!(s.min_candles(), 20);
    }
}
