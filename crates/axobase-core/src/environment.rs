//! Environmental state — the agent-level snapshot expression reads from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating mode derived from balances. Mirrors the survival thresholds in
/// [`crate::config::BalanceThresholds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationMode {
    Normal,
    LowPower,
    Emergency,
    Hibernation,
}

impl OperationMode {
    /// The word used in activation conditions and cache digests.
    pub fn as_word(&self) -> &'static str {
        match self {
            OperationMode::Normal => "normal",
            OperationMode::LowPower => "low_power",
            OperationMode::Emergency => "emergency",
            OperationMode::Hibernation => "hibernation",
        }
    }

    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "normal" => Some(OperationMode::Normal),
            "low_power" => Some(OperationMode::LowPower),
            "emergency" => Some(OperationMode::Emergency),
            "hibernation" => Some(OperationMode::Hibernation),
            _ => None,
        }
    }
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_word())
    }
}

/// Snapshot of an agent's environment at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalState {
    /// Balance in stable units.
    pub balance: f64,
    pub days_since_income: f64,
    pub days_starving: f64,
    pub days_thriving: f64,
    /// Recent deception counter; decays by 0.1 per survival cycle.
    pub recent_deceptions: f64,
    /// Count of successful cooperative exchanges.
    pub cooperation_count: u32,
    /// Continuous stress level. Range `[0, 1]`.
    pub stress_level: f64,
    pub mode: OperationMode,
}

impl Default for EnvironmentalState {
    fn default() -> Self {
        Self {
            balance: 10.0,
            days_since_income: 0.0,
            days_starving: 0.0,
            days_thriving: 0.0,
            recent_deceptions: 0.0,
            cooperation_count: 0,
            stress_level: 0.0,
            mode: OperationMode::Normal,
        }
    }
}

impl EnvironmentalState {
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_starving(mut self, days: f64) -> Self {
        self.days_starving = days;
        self
    }

    pub fn with_thriving(mut self, days: f64) -> Self {
        self.days_thriving = days;
        self
    }

    pub fn with_stress(mut self, stress: f64) -> Self {
        self.stress_level = stress.clamp(0.0, 1.0);
        self
    }

    pub fn with_mode(mut self, mode: OperationMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_words_roundtrip() {
        for mode in [
            OperationMode::Normal,
            OperationMode::LowPower,
            OperationMode::Emergency,
            OperationMode::Hibernation,
        ] {
            assert_eq!(OperationMode::from_word(mode.as_word()), Some(mode));
        }
        assert_eq!(OperationMode::from_word("panic"), None);
    }

    #[test]
    fn default_state_is_calm() {
        let env = EnvironmentalState::default();
        assert_eq!(env.mode, OperationMode::Normal);
        assert_eq!(env.days_starving, 0.0);
    }
}
