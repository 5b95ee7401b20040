//! Shared statistical helpers for the property tests in this directory.
//! Mirrors the bound formulas in `SPEC_FULL.md` Sec. 8 rather than pulling
//! in a statistics crate, matching the teacher's dependency-light style.

/// Bound multiplier used throughout Sec. 8's statistical properties.
pub const K: f64 = 3.29;

/// Sample mean and (unbiased, N-1) sample standard deviation.
pub fn mean_stddev(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

/// Asserts the sample mean lands within `K * sigma_hat / sqrt(N)` of
/// `expected_center` (Sec. 8's mean bound).
pub fn assert_mean_close(samples: &[f64], expected_center: f64) {
    let n = samples.len() as f64;
    let (mean, sigma_hat) = mean_stddev(samples);
    let bound = K * sigma_hat / n.sqrt();
    assert!(
        (mean - expected_center).abs() <= bound,
        "mean {mean} not within {bound} of expected center {expected_center}"
    );
}

/// Asserts the sample stddev lands within `K * sigma_hat / sqrt(2(N-1))`
/// of `expected_sigma` (Sec. 8's stddev bound).
pub fn assert_stddev_close(samples: &[f64], expected_sigma: f64) {
    let n = samples.len() as f64;
    let (_, sigma_hat) = mean_stddev(samples);
    let bound = K * sigma_hat / (2.0 * (n - 1.0)).sqrt();
    assert!(
        (sigma_hat - expected_sigma).abs() <= bound,
        "stddev {sigma_hat} not within {bound} of expected sigma {expected_sigma}"
    );
}
