//! Trailing-window reductions over a numeric series.
//!
//! A window is valid only when it is full and holds no NaN; otherwise the
//! output at that index is NaN.

/// Rolling mean over a trailing window of `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().sum::<f64>() / window as f64;
    }

    result
}

/// Rolling (min, max) over a trailing window of `window` values.
pub fn rolling_extremes(values: &[f64], window: usize) -> Vec<Option<(f64, f64)>> {
    let n = values.len();
    let mut result = vec![None; n];

    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let min = slice.iter().copied().fold(f64::INFINITY, f64::min);
        let max = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        result[i] = Some((min, max));
    }

    result
}
