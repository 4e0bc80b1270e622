//! Descriptive statistics over `f64` slices.

/// Arithmetic mean. Empty input yields 0.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Biased variance `E[x²] − E[x]²`. Empty input yields 0.
///
/// The one-pass form is adequate for metre-scale elevations; the result is
/// clamped at 0 to absorb floating-point negative drift.
pub fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mut sum = 0.0;
    let mut sum2 = 0.0;
    for &x in xs {
        sum += x;
        sum2 += x * x;
    }
    let m = sum / n;
    (sum2 / n - m * m).max(0.0)
}

/// Median by order-statistic selection at index `n / 2`.
///
/// Partial selection is O(n) expected vs O(n log n) for a full sort.
/// Panics on empty input.
pub fn median(xs: &[f64]) -> f64 {
    assert!(!xs.is_empty(), "median of empty slice");
    let mut buf = xs.to_vec();
    let mid = buf.len() / 2;
    let (_, m, _) = buf.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *m
}

/// Linear map onto `[0, 1]` using the slice min/max.
///
/// Panics on empty input; constant input divides by zero and propagates
/// non-finite values, matching the documented "undefined" contract.
pub fn normalize(xs: &[f64]) -> Vec<f64> {
    assert!(!xs.is_empty(), "normalize of empty slice");
    let lo = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let d = hi - lo;
    xs.iter().map(|&x| (x - lo) / d).collect()
}

/// Divide an integer histogram by its sum, yielding a PMF.
///
/// An empty or all-zero histogram keeps a sum of 1, so the result is the
/// zero vector rather than a NaN vector.
pub fn convert_to_pmf(h: &[usize]) -> Vec<f64> {
    let total = h.iter().sum::<usize>().max(1) as f64;
    h.iter().map(|&c| c as f64 / total).collect()
}
