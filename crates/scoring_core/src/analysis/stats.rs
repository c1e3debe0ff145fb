//! Descriptive statistics used by the analyzers.

use std::collections::BTreeMap;

/// Clamps a value into [0, 1]. NaN maps to 0.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation around a known mean.
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient of variation clamped to [0, 1].
///
/// Zero when fewer than two values or when the mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    match mean(values) {
        Some(m) if values.len() >= 2 && m > 0.0 => clamp_unit(population_std_dev(values, m) / m),
        _ => 0.0,
    }
}

/// Shannon entropy of a frequency table divided by `ln(k)`, k = distinct keys.
///
/// Zero for zero or one distinct key. Iterates in key order so the floating
/// sum is reproducible.
pub fn normalized_entropy<K: Ord>(counts: &BTreeMap<K, usize>) -> f64 {
    let distinct = counts.len();
    if distinct <= 1 {
        return 0.0;
    }
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let entropy: f64 = counts
        .values()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum();
    clamp_unit(entropy / (distinct as f64).ln())
}
