//! Unadjusted exponentially weighted moving average.
//!
//! Recursive: EWM[t] = alpha * x[t] + (1 - alpha) * EWM[t-1]
//! Seed: the first finite value of the series (no bias correction).
//! Leading NaNs stay NaN; a NaN after the seed taints the rest of the series.

/// Smoothing factor for a center-of-mass parameterization: alpha = 1 / (1 + com).
pub fn alpha_from_com(com: f64) -> f64 {
    1.0 / (1.0 + com)
}

/// Compute the unadjusted EWM of `values` with smoothing factor `alpha`.
pub fn ewm_of_series(values: &[f64], alpha: f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };

    let mut prev = values[start];
    result[start] = prev;

    for i in (start + 1)..n {
        if values[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let ewm = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = ewm;
        prev = ewm;
    }

    result
}
