//! Perception — everything the filter and decision engine see in one
//! tick.

use axobase_core::environment::EnvironmentalState;
use axobase_expression::ExpressedGenome;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Something the agent noticed that might be worth acting on.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub description: String,
    /// Estimated value in stable units.
    pub estimated_value: f64,
}

/// A recent memory entry surfaced into the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryEvent {
    pub summary: String,
    /// Outcome flag when the event was an executed action.
    pub success: Option<bool>,
}

/// The assembled snapshot a decision is made from.
#[derive(Debug, Clone, Serialize)]
pub struct Perception {
    pub agent_id: String,
    pub env: EnvironmentalState,
    pub expressed: ExpressedGenome,
    /// Metabolic cost per survival cycle.
    pub cycle_metabolic_cost: f64,
    /// Metabolic cost per day at the current cycle rate.
    pub daily_metabolic_cost: f64,
    pub available_tools: HashSet<String>,
    /// Aggregate market risk estimate. Range `[0, 1]`.
    pub market_risk: f64,
    pub opportunities: Vec<Opportunity>,
    pub recent_events: Vec<MemoryEvent>,
    /// Per-strategy experience bonus from past outcomes.
    pub experience: HashMap<String, f64>,
}

impl Perception {
    /// Days of runway at the current daily burn.
    pub fn runway_days(&self) -> f64 {
        if self.daily_metabolic_cost <= 0.0 {
            return f64::INFINITY;
        }
        self.env.balance / self.daily_metabolic_cost
    }
}
