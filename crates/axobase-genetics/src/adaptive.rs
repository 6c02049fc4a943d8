//! Adaptive-rate controller — population pressure modulates mutation.
//!
//! Low genetic diversity, fitness stagnation, and environmental stress
//! each raise the base mutation rate; the derived operator rates follow
//! at fixed ratios. The base rate is clamped to `[0.005, 0.30]`.

use serde::{Deserialize, Serialize};

/// Diversity below this starts raising the mutation rate.
pub const DIVERSITY_THRESHOLD: f64 = 0.3;
/// Clamp band for the adapted base rate.
pub const RATE_MIN: f64 = 0.005;
pub const RATE_MAX: f64 = 0.30;

/// Population statistics fed to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationMetrics {
    pub average_fitness: f64,
    pub fitness_variance: f64,
    /// Pairwise genome diversity. Range `[0, 1]`.
    pub genetic_diversity: f64,
    pub generation: u32,
    /// Recent mean fitness values, oldest first.
    pub fitness_history: Vec<f64>,
}

/// Per-operator rates derived from the adapted base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveRates {
    /// Adapted point-mutation rate.
    pub base: f64,
    pub duplication: f64,
    pub structural: f64,
    pub hgt: f64,
    /// How stagnant the recent fitness history is. Range `[0, 1]`.
    pub stagnation_factor: f64,
    pub diversity_pressure: f64,
    pub stress_pressure: f64,
}

/// Coefficient of variation over the last `n` values.
fn coefficient_of_variation(history: &[f64], n: usize) -> Option<f64> {
    if history.len() < n {
        return None;
    }
    let window = &history[history.len() - n..];
    let mean = window.iter().sum::<f64>() / n as f64;
    if mean.abs() < f64::EPSILON {
        return Some(0.0);
    }
    let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    Some(variance.sqrt() / mean.abs())
}

/// Ordinary least-squares slope over the last `n` values against index.
fn ols_slope(history: &[f64], n: usize) -> Option<f64> {
    if history.len() < n {
        return None;
    }
    let window = &history[history.len() - n..];
    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = window.iter().sum::<f64>() / n as f64;
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in window.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    Some(num / den)
}

/// Stagnation factor over the last five fitness values: graded toward 1
/// as the coefficient of variation collapses, active only while the
/// trend slope is flat.
pub fn stagnation_factor(history: &[f64]) -> f64 {
    let (Some(cv), Some(slope)) = (
        coefficient_of_variation(history, 5),
        ols_slope(history, 5),
    ) else {
        return 0.0;
    };
    if cv < 0.05 && slope < 0.01 {
        ((0.05 - cv) / 0.05).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Compute adapted operator rates from population metrics and stress.
pub fn calculate_adaptive_rates(
    metrics: &PopulationMetrics,
    environmental_stress: f64,
    default_point_rate: f64,
) -> AdaptiveRates {
    let mut base = default_point_rate;

    let diversity_pressure = if metrics.genetic_diversity < DIVERSITY_THRESHOLD {
        4.0 * (DIVERSITY_THRESHOLD - metrics.genetic_diversity)
    } else {
        0.0
    };
    base *= 1.0 + diversity_pressure;

    let stagnation = stagnation_factor(&metrics.fitness_history);
    base *= 1.0 + 2.0 * stagnation;

    let stress = environmental_stress.clamp(0.0, 1.0);
    let stress_pressure = if stress > 0.5 {
        (stress - 0.5) * 3.0
    } else {
        0.0
    };
    base *= 1.0 + stress_pressure;

    let base = base.clamp(RATE_MIN, RATE_MAX);
    AdaptiveRates {
        base,
        duplication: base * 1.5,
        structural: base * 0.3,
        hgt: base * 0.5,
        stagnation_factor: stagnation,
        diversity_pressure,
        stress_pressure,
    }
}

/// Pairwise normalised Hamming distance over equal-length genome hashes:
/// the mean fraction of differing characters across all pairs.
pub fn hash_diversity(hashes: &[String]) -> f64 {
    if hashes.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    let mut pairs = 0u32;
    for i in 0..hashes.len() {
        for j in (i + 1)..hashes.len() {
            let (a, b) = (&hashes[i], &hashes[j]);
            let len = a.len().min(b.len());
            if len == 0 {
                continue;
            }
            let differing = a
                .chars()
                .zip(b.chars())
                .filter(|(ca, cb)| ca != cb)
                .count();
            total += differing as f64 / len as f64;
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

/// Variance of per-agent mean expression values, an alternative diversity
/// signal when hashes are unavailable.
pub fn expression_diversity(mean_expressions: &[f64]) -> f64 {
    if mean_expressions.len() < 2 {
        return 0.0;
    }
    let mean = mean_expressions.iter().sum::<f64>() / mean_expressions.len() as f64;
    let variance = mean_expressions
        .iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>()
        / mean_expressions.len() as f64;
    variance.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(diversity: f64, history: Vec<f64>) -> PopulationMetrics {
        PopulationMetrics {
            average_fitness: 0.5,
            fitness_variance: 0.01,
            genetic_diversity: diversity,
            generation: 10,
            fitness_history: history,
        }
    }

    #[test]
    fn healthy_population_keeps_default_rate() {
        let m = metrics(0.6, vec![0.1, 0.3, 0.5, 0.7, 0.9]);
        let rates = calculate_adaptive_rates(&m, 0.2, 0.05);
        assert!((rates.base - 0.05).abs() < 1e-9);
        assert!((rates.duplication - 0.075).abs() < 1e-9);
        assert!((rates.hgt - 0.025).abs() < 1e-9);
    }

    #[test]
    fn low_diversity_raises_rate() {
        let diverse = calculate_adaptive_rates(&metrics(0.6, vec![]), 0.0, 0.05);
        let inbred = calculate_adaptive_rates(&metrics(0.1, vec![]), 0.0, 0.05);
        assert!(inbred.base > diverse.base);
        assert!(inbred.diversity_pressure > 0.0);
    }

    #[test]
    fn stagnation_is_detected() {
        // Flat history: tiny CV and slope.
        let flat = vec![0.500, 0.501, 0.499, 0.500, 0.500];
        assert!(stagnation_factor(&flat) > 0.5);
        // Climbing history: healthy slope.
        let climbing = vec![0.1, 0.3, 0.5, 0.7, 0.9];
        assert_eq!(stagnation_factor(&climbing), 0.0);
        // Too short to judge.
        assert_eq!(stagnation_factor(&[0.5, 0.5]), 0.0);
    }

    #[test]
    fn stress_above_half_raises_rate() {
        let calm = calculate_adaptive_rates(&metrics(0.6, vec![]), 0.4, 0.05);
        let stressed = calculate_adaptive_rates(&metrics(0.6, vec![]), 0.9, 0.05);
        assert_eq!(calm.stress_pressure, 0.0);
        assert!(stressed.base > calm.base);
    }

    #[test]
    fn base_rate_is_clamped() {
        let worst = calculate_adaptive_rates(
            &metrics(0.0, vec![0.5, 0.5, 0.5, 0.5, 0.5]),
            1.0,
            0.05,
        );
        assert!(worst.base <= RATE_MAX + 1e-12);
        let best = calculate_adaptive_rates(&metrics(1.0, vec![]), 0.0, 0.001);
        assert!(best.base >= RATE_MIN - 1e-12);
    }

    #[test]
    fn hash_diversity_of_identical_hashes_is_zero() {
        let same = vec!["aaaa".to_string(), "aaaa".to_string()];
        assert_eq!(hash_diversity(&same), 0.0);
        let different = vec!["aaaa".to_string(), "bbbb".to_string()];
        assert_eq!(hash_diversity(&different), 1.0);
    }
}
