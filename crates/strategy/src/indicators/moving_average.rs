use super::IndicatorError;

/// Simple moving average of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Result<f64, IndicatorError> {
    if period == 0 || values.len() < period {
        return Err(IndicatorError::InsufficientData {
            needed: period.max(1),
            have: values.len(),
        });
    }
    let sum: f64 = values.iter().rev().take(period).sum();
    Ok(sum / period as f64)
}

/// Rolling SMA. Element `i` averages `values[i..i + period]`, so the output
/// has `len - period + 1` entries (empty when there is not enough data).
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / period as f64)
        .collect()
}

/// EMA seeded with the SMA of the first `period` values. Element `i` is the
/// EMA as of `values[i + period - 1]`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(ema);
    for &value in &values[period..] {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}
