//! Small descriptive statistics shared by the estimator and summaries

/// Arithmetic mean; `None` for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Unbiased sample variance (denominator `n - 1`); `None` when `n < 2`
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Mean squared difference between observations and fitted values
#[must_use]
pub fn mean_squared_residual(observed: &[f64], fitted: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != fitted.len() {
        return None;
    }
    let ss: f64 = observed
        .iter()
        .zip(fitted)
        .map(|(y, y_hat)| (y - y_hat) * (y - y_hat))
        .sum();
    Some(ss / observed.len() as f64)
}

/// Percentile of already-sorted data with linear interpolation between ranks.
///
/// `p` is a fraction in `[0, 1]`.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&p) {
        return None;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
