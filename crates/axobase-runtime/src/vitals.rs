//! Vitals — mode derivation and environment counters.
//!
//! Stable balance maps to an operating mode through the configured
//! thresholds; a dry native (gas) balance forces emergency regardless.
//! The tracker maintains the running counters the environmental snapshot
//! carries: starvation, thriving, deception, cooperation, and a derived
//! stress level.

use axobase_core::config::BalanceThresholds;
use axobase_core::environment::{EnvironmentalState, OperationMode};
use axobase_core::ports::Balances;
use tracing::warn;

/// Map balances to an operating mode.
pub fn derive_mode(balances: &Balances, thresholds: &BalanceThresholds) -> OperationMode {
    let mode = if balances.stable < thresholds.hibernation {
        OperationMode::Hibernation
    } else if balances.stable < thresholds.emergency {
        OperationMode::Emergency
    } else if balances.stable < thresholds.low {
        OperationMode::LowPower
    } else {
        OperationMode::Normal
    };
    // A dry gas tank forces emergency even with a healthy stable balance.
    if balances.native < thresholds.min_native
        && matches!(mode, OperationMode::Normal | OperationMode::LowPower)
    {
        OperationMode::Emergency
    } else {
        mode
    }
}

/// Maintains the environmental snapshot across cycles.
#[derive(Debug, Clone)]
pub struct EnvironmentTracker {
    env: EnvironmentalState,
    previous_balance: f64,
}

impl EnvironmentTracker {
    pub fn new() -> Self {
        Self {
            env: EnvironmentalState::default(),
            previous_balance: 0.0,
        }
    }

    pub fn env(&self) -> &EnvironmentalState {
        &self.env
    }

    /// Fold fresh balances and mode into the snapshot, tracking income
    /// arrival.
    pub fn observe_balances(&mut self, balances: &Balances, mode: OperationMode) {
        if balances.stable > self.previous_balance + f64::EPSILON {
            self.env.days_since_income = 0.0;
        }
        self.previous_balance = balances.stable;
        self.env.balance = balances.stable;
        self.env.mode = mode;
        self.refresh_stress(f64::INFINITY);
    }

    /// End-of-cycle counter maintenance, driven by days of runway.
    pub fn after_cycle(&mut self, runway_days: f64) {
        self.env.days_since_income += 1.0;
        if runway_days < 3.0 {
            self.env.days_starving += 1.0;
            self.env.days_thriving = 0.0;
        } else if runway_days > 14.0 {
            self.env.days_thriving += 1.0;
        }
        self.env.recent_deceptions = (self.env.recent_deceptions - 0.1).max(0.0);
        self.refresh_stress(runway_days);
    }

    pub fn record_deception(&mut self) {
        self.env.recent_deceptions += 1.0;
        warn!(count = self.env.recent_deceptions, "deception recorded");
    }

    pub fn record_cooperation(&mut self) {
        self.env.cooperation_count += 1;
    }

    /// Stress blends mode severity, runway pressure, and recent
    /// deception.
    fn refresh_stress(&mut self, runway_days: f64) {
        let mode_stress = match self.env.mode {
            OperationMode::Normal => 0.1,
            OperationMode::LowPower => 0.4,
            OperationMode::Emergency => 0.8,
            OperationMode::Hibernation => 1.0,
        };
        let runway_stress = if runway_days.is_finite() {
            (1.0 - runway_days / 14.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let deception_stress = (self.env.recent_deceptions * 0.3).min(1.0);
        self.env.stress_level =
            (0.5 * mode_stress + 0.3 * runway_stress + 0.2 * deception_stress).clamp(0.0, 1.0);
    }
}

impl Default for EnvironmentTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(native: f64, stable: f64) -> Balances {
        Balances { native, stable }
    }

    #[test]
    fn stable_thresholds_pick_modes() {
        let t = BalanceThresholds::default();
        assert_eq!(derive_mode(&balances(1.0, 10.0), &t), OperationMode::Normal);
        assert_eq!(derive_mode(&balances(1.0, 4.0), &t), OperationMode::LowPower);
        assert_eq!(derive_mode(&balances(1.0, 1.5), &t), OperationMode::Emergency);
        assert_eq!(
            derive_mode(&balances(1.0, 0.4), &t),
            OperationMode::Hibernation
        );
    }

    #[test]
    fn dry_gas_forces_emergency() {
        let t = BalanceThresholds::default();
        assert_eq!(
            derive_mode(&balances(1e-5, 100.0), &t),
            OperationMode::Emergency
        );
        // But hibernation is already worse than emergency.
        assert_eq!(
            derive_mode(&balances(1e-5, 0.1), &t),
            OperationMode::Hibernation
        );
    }

    #[test]
    fn starvation_counter_tracks_runway() {
        let mut tracker = EnvironmentTracker::new();
        tracker.observe_balances(&balances(1.0, 2.0), OperationMode::Emergency);
        tracker.after_cycle(1.0);
        tracker.after_cycle(1.0);
        assert_eq!(tracker.env().days_starving, 2.0);
        assert_eq!(tracker.env().days_thriving, 0.0);

        tracker.after_cycle(20.0);
        assert_eq!(tracker.env().days_starving, 2.0);
        assert_eq!(tracker.env().days_thriving, 1.0);
    }

    #[test]
    fn thriving_resets_on_starvation() {
        let mut tracker = EnvironmentTracker::new();
        tracker.after_cycle(20.0);
        tracker.after_cycle(20.0);
        assert_eq!(tracker.env().days_thriving, 2.0);
        tracker.after_cycle(1.0);
        assert_eq!(tracker.env().days_thriving, 0.0);
    }

    #[test]
    fn deception_decays_by_tenth_per_cycle() {
        let mut tracker = EnvironmentTracker::new();
        tracker.record_deception();
        tracker.after_cycle(10.0);
        assert!((tracker.env().recent_deceptions - 0.9).abs() < 1e-12);
        for _ in 0..20 {
            tracker.after_cycle(10.0);
        }
        assert_eq!(tracker.env().recent_deceptions, 0.0);
    }

    #[test]
    fn income_resets_days_since_income() {
        let mut tracker = EnvironmentTracker::new();
        tracker.observe_balances(&balances(1.0, 5.0), OperationMode::Normal);
        tracker.after_cycle(10.0);
        assert_eq!(tracker.env().days_since_income, 1.0);
        tracker.observe_balances(&balances(1.0, 8.0), OperationMode::Normal);
        assert_eq!(tracker.env().days_since_income, 0.0);
    }

    #[test]
    fn stress_rises_with_mode_severity() {
        let mut calm = EnvironmentTracker::new();
        calm.observe_balances(&balances(1.0, 100.0), OperationMode::Normal);
        let mut dire = EnvironmentTracker::new();
        dire.observe_balances(&balances(1.0, 1.0), OperationMode::Emergency);
        assert!(dire.env().stress_level > calm.env().stress_level);
    }
}
