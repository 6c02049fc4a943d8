//! Contractual configuration defaults.
//!
//! These numbers are part of the engine's contract and are reproduced by
//! tests; applications may override any of them through the builder-style
//! setters on each struct.

use serde::{Deserialize, Serialize};

/// Per-operator rates for the breeding pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    /// Per-gene probability of a Gaussian value perturbation.
    pub point: f64,
    /// Standard deviation of the point-mutation noise.
    pub point_sigma: f64,
    /// Per-gene probability of replacing the value with a uniform draw.
    pub large: f64,
    /// Per-gene probability of a Gaussian weight perturbation.
    pub weight: f64,
    /// Standard deviation of the weight perturbation.
    pub weight_sigma: f64,
    /// Per-gene duplication probability.
    pub duplication: f64,
    /// Base per-gene deletion probability.
    pub deletion: f64,
    /// Base deletion probability under starvation.
    pub starvation_deletion: f64,
    /// Per-breeding probability of synthesizing one new gene.
    pub de_novo: f64,
    /// Horizontal transfer probability per invocation.
    pub hgt: f64,
    /// Per-chromosome inversion probability.
    pub inversion: f64,
    /// Per-breeding translocation probability.
    pub translocation: f64,
    /// Per-pair gene conversion probability.
    pub conversion: f64,
    /// Probability of adding one random regulatory edge.
    pub regulatory_add: f64,
    /// Probability of deleting one random regulatory edge.
    pub regulatory_delete: f64,
    /// Probability of perturbing one random edge strength.
    pub regulatory_modify: f64,
    /// Probability of inheriting a chromosome whole rather than
    /// recombining gene by gene.
    pub chromosome_crossover: f64,
    /// Probability of inheriting a gene present in only one parent.
    pub extra_gene_inheritance: f64,
}

impl Default for MutationRates {
    fn default() -> Self {
        Self {
            point: 0.05,
            point_sigma: 0.08,
            large: 0.0025,
            weight: 0.05,
            weight_sigma: 0.1,
            duplication: 0.03,
            deletion: 0.02,
            starvation_deletion: 0.15,
            de_novo: 0.005,
            hgt: 0.05,
            inversion: 0.005,
            translocation: 0.002,
            conversion: 0.002,
            regulatory_add: 0.02,
            regulatory_delete: 0.02,
            regulatory_modify: 0.05,
            chromosome_crossover: 0.7,
            extra_gene_inheritance: 0.5,
        }
    }
}

impl MutationRates {
    /// Scale the point-mutation rate, clamped to the adaptive band.
    pub fn with_point(mut self, rate: f64) -> Self {
        self.point = rate.clamp(0.0, 1.0);
        self
    }
}

/// Stable-unit balance thresholds driving mode transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceThresholds {
    pub low: f64,
    pub emergency: f64,
    pub critical: f64,
    pub hibernation: f64,
    /// Minimum native (gas surrogate) balance; below this the agent is
    /// forced into emergency regardless of stable balance.
    pub min_native: f64,
}

impl Default for BalanceThresholds {
    fn default() -> Self {
        Self {
            low: 5.0,
            emergency: 2.0,
            critical: 1.0,
            hibernation: 0.5,
            min_native: 1e-3,
        }
    }
}

/// Expression engine tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpressionConfig {
    /// Fixed cost per tick regardless of genome content.
    pub base_rate: f64,
    /// Cost per gene carried.
    pub per_gene_overhead: f64,
    /// Iteration cap for the regulatory fixed point.
    pub max_regulatory_iterations: u32,
    /// Convergence threshold for the fixed point.
    pub convergence_threshold: f64,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.001,
            per_gene_overhead: 5e-5,
            max_regulatory_iterations: 10,
            convergence_threshold: 0.001,
        }
    }
}

/// Expression cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_size: usize,
    pub ttl_ms: u64,
    pub cleanup_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 1000,
            ttl_ms: 60_000,
            cleanup_interval_ms: 300_000,
        }
    }
}

/// Decision engine timing and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionConfig {
    pub min_decision_interval_ms: u64,
    pub max_deliberation_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// How many filtered strategies are offered to the language model.
    pub max_candidates: usize,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            min_decision_interval_ms: 60_000,
            max_deliberation_ms: 30_000,
            temperature: 0.7,
            max_tokens: 2000,
            max_candidates: 7,
        }
    }
}

/// Survival loop cycle intervals, selected by the expressed `cycle_speed`
/// trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub fast_ms: u64,
    pub normal_ms: u64,
    pub slow_ms: u64,
    /// `cycle_speed` above this selects the fast interval.
    pub fast_above: f64,
    /// `cycle_speed` below this selects the slow interval.
    pub slow_below: f64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            fast_ms: 5 * 60 * 1000,
            normal_ms: 10 * 60 * 1000,
            slow_ms: 30 * 60 * 1000,
            fast_above: 0.7,
            slow_below: 0.3,
        }
    }
}

impl CycleConfig {
    /// Interval for a given expressed `cycle_speed` (clamped to `[0, 1]`).
    pub fn interval_ms(&self, cycle_speed: f64) -> u64 {
        let speed = cycle_speed.clamp(0.0, 1.0);
        if speed > self.fast_above {
            self.fast_ms
        } else if speed < self.slow_below {
            self.slow_ms
        } else {
            self.normal_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contractual_defaults() {
        let r = MutationRates::default();
        assert_eq!(r.point, 0.05);
        assert_eq!(r.large, 0.0025);
        assert_eq!(r.weight, 0.05);
        assert_eq!(r.duplication, 0.03);
        assert_eq!(r.deletion, 0.02);
        assert_eq!(r.starvation_deletion, 0.15);
        assert_eq!(r.de_novo, 0.005);
        assert_eq!(r.hgt, 0.05);
        assert_eq!(r.inversion, 0.005);
        assert_eq!(r.translocation, 0.002);
        assert_eq!(r.conversion, 0.002);
        assert_eq!(r.regulatory_add, 0.02);
        assert_eq!(r.regulatory_delete, 0.02);
        assert_eq!(r.regulatory_modify, 0.05);
        assert_eq!(r.point_sigma, 0.08);

        let t = BalanceThresholds::default();
        assert_eq!(t.low, 5.0);
        assert_eq!(t.emergency, 2.0);
        assert_eq!(t.critical, 1.0);
        assert_eq!(t.hibernation, 0.5);

        let c = CacheConfig::default();
        assert_eq!(c.max_size, 1000);
        assert_eq!(c.ttl_ms, 60_000);
        assert_eq!(c.cleanup_interval_ms, 300_000);
    }

    #[test]
    fn cycle_interval_from_speed() {
        let c = CycleConfig::default();
        assert_eq!(c.interval_ms(0.9), 5 * 60 * 1000);
        assert_eq!(c.interval_ms(0.5), 10 * 60 * 1000);
        assert_eq!(c.interval_ms(0.1), 30 * 60 * 1000);
    }
}
