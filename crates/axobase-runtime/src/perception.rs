//! Perception assembly — gather the tick's inputs into one snapshot for
//! the decision engine.

use crate::agent::AgentState;
use crate::memory::MemoryStore;
use axobase_core::config::CycleConfig;
use axobase_core::environment::EnvironmentalState;
use axobase_decision::{Opportunity, Perception};
use axobase_expression::ExpressionResult;
use std::collections::HashSet;

/// Cycles per day at the interval the expressed `cycle_speed` selects.
pub fn cycles_per_day(cycle: &CycleConfig, cycle_speed: f64) -> f64 {
    86_400_000.0 / cycle.interval_ms(cycle_speed) as f64
}

/// Build the perception for one decision.
#[allow(clippy::too_many_arguments)]
pub fn build_perception(
    agent: &AgentState,
    env: &EnvironmentalState,
    expression: &ExpressionResult,
    memory: &MemoryStore,
    available_tools: &HashSet<String>,
    market_risk: f64,
    opportunities: Vec<Opportunity>,
    cycle_config: &CycleConfig,
) -> Perception {
    let cycle_cost = expression.expressed.total_metabolic_cost;
    let speed = expression.expressed.value_of("cycle_speed").min(1.0);
    let daily_cost = cycle_cost * cycles_per_day(cycle_config, speed);

    Perception {
        agent_id: agent.id.to_string(),
        env: env.clone(),
        expressed: expression.expressed.clone(),
        cycle_metabolic_cost: cycle_cost,
        daily_metabolic_cost: daily_cost,
        available_tools: available_tools.clone(),
        market_risk,
        opportunities,
        recent_events: memory.recent(5),
        experience: memory.experience_map(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axobase_core::genome::LineageId;
    use axobase_core::ports::AgentId;
    use axobase_expression::{ExpressOptions, ExpressionEngine};
    use axobase_genetics::genesis::genesis_genome;

    #[test]
    fn perception_carries_daily_cost_and_memory() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let agent = AgentState::new(AgentId::from_seed(1), "0xabc", genome, 0);
        let env = EnvironmentalState::default();
        let engine = ExpressionEngine::default();
        let result = engine.express(&agent.genome, &env, &ExpressOptions::default());
        let mut memory = MemoryStore::new();
        memory.record_event("first gig", Some(true));

        let perception = build_perception(
            &agent,
            &env,
            &result,
            &memory,
            &HashSet::new(),
            0.2,
            vec![],
            &CycleConfig::default(),
        );
        assert!(perception.daily_metabolic_cost > perception.cycle_metabolic_cost);
        assert_eq!(perception.recent_events.len(), 1);
        assert!(perception.runway_days() > 0.0);
    }
}
