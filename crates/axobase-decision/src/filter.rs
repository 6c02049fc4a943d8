//! Strategy filter — prune the catalogue to what is currently viable,
//! then rank the survivors.
//!
//! Gates run in a fixed order: gene requirements (with 20% tolerance),
//! tool availability, risk tolerance, complexity tolerance, resources
//! and runway, the emergency override, and social orientation.
//! Tolerances derive from expressed traits; expressed values above 1 are
//! treated as fully developed.

use crate::perception::Perception;
use crate::strategy::{catalogue, Strategy, StrategyCategory, TimeHorizon};
use axobase_core::environment::OperationMode;
use axobase_core::gene::GeneDomain;
use axobase_expression::ExpressedGenome;
use serde::Serialize;

/// Risk above `1.5 × riskTolerance` is rejected.
const RISK_HEADROOM: f64 = 1.5;
/// Gene requirements pass at 80% of the stated minimum.
const GENE_TOLERANCE: f64 = 0.8;
/// Social strategies need at least this orientation.
const SOCIAL_FLOOR: f64 = 0.3;
/// Non-survival strategies must leave this many days of runway.
const RESERVE_DAYS: f64 = 7.0;

/// Tolerances derived from the expressed genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToleranceProfile {
    pub risk_tolerance: f64,
    pub complexity_tolerance: f64,
    pub social_orientation: f64,
}

/// Clamp an expressed value into `[0, 1]` for tolerance arithmetic.
fn unit(expressed: &ExpressedGenome, name: &str) -> f64 {
    expressed.value_of(name).min(1.0)
}

impl ToleranceProfile {
    pub fn from_expression(expressed: &ExpressedGenome) -> Self {
        let risk_domain_max = expressed.domain_max(GeneDomain::RiskAssessment).min(1.0);
        let cooperation_domain_max = expressed.domain_max(GeneDomain::Cooperation).min(1.0);
        Self {
            risk_tolerance: 0.4 * unit(expressed, "risk_appetite")
                + 0.3 * unit(expressed, "uncertainty_tolerance")
                + 0.2 * (1.0 - unit(expressed, "acute_stress_response"))
                + 0.1 * risk_domain_max,
            complexity_tolerance: 0.5 * unit(expressed, "working_memory")
                + 0.3 * unit(expressed, "metacognition")
                + 0.2 * unit(expressed, "learning_rate"),
            social_orientation: 0.4 * unit(expressed, "agent_cooperation")
                + 0.4 * unit(expressed, "trust_default")
                + 0.2 * cooperation_domain_max,
        }
    }
}

/// A strategy that survived the gates, with its scores.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluatedStrategy {
    pub strategy: &'static Strategy,
    pub genome_match: f64,
    pub estimated_success: f64,
    pub urgency: f64,
    pub priority: f64,
}

/// A strategy the gates rejected, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedStrategy {
    pub id: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterResult {
    /// Survivors sorted by priority, highest first.
    pub accepted: Vec<EvaluatedStrategy>,
    pub rejected: Vec<RejectedStrategy>,
    pub tolerances: ToleranceProfile,
}

/// Runs the gate pipeline over the catalogue.
#[derive(Debug, Clone, Default)]
pub struct StrategyFilter;

impl StrategyFilter {
    pub fn filter(&self, perception: &Perception) -> FilterResult {
        let tolerances = ToleranceProfile::from_expression(&perception.expressed);
        let runway = perception.runway_days();
        let mut accepted = Vec::new();
        let mut rejected = Vec::new();

        for strategy in catalogue() {
            match self.gate(strategy, perception, &tolerances, runway) {
                Err(reason) => rejected.push(RejectedStrategy {
                    id: strategy.id,
                    reason,
                }),
                Ok(()) => {
                    let genome_match = genome_match(strategy, &perception.expressed);
                    let tool_coverage = tool_coverage(strategy, perception);
                    let experience = perception
                        .experience
                        .get(strategy.id)
                        .copied()
                        .unwrap_or(0.0);
                    let estimated_success = (0.6
                        * genome_match
                        * (1.0 - perception.market_risk * 0.3)
                        * tool_coverage
                        + experience)
                        .clamp(0.1, 0.95);
                    let urgency = category_urgency(strategy.category, perception, runway);
                    let payoff_norm = (strategy.typical_payoff / 10.0 + 0.5).clamp(0.0, 1.0);
                    let priority = 0.25 * genome_match + 0.25 * estimated_success
                        + 0.3 * urgency
                        + 0.1 * payoff_norm
                        - 0.1 * strategy.risk;
                    accepted.push(EvaluatedStrategy {
                        strategy,
                        genome_match,
                        estimated_success,
                        urgency,
                        priority,
                    });
                }
            }
        }

        accepted.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        FilterResult {
            accepted,
            rejected,
            tolerances,
        }
    }

    fn gate(
        &self,
        strategy: &Strategy,
        perception: &Perception,
        tolerances: &ToleranceProfile,
        runway: f64,
    ) -> Result<(), String> {
        // 1. Gene requirements, with 20% tolerance.
        for (gene, min) in strategy.gene_requirements {
            let actual = perception.expressed.value_of(gene);
            if actual < min * GENE_TOLERANCE {
                return Err(format!(
                    "Gene requirement not met: {gene} at {actual:.2} (needs {min:.2})"
                ));
            }
        }

        // 2. Required tools.
        for tool in strategy.required_tools {
            if !perception.available_tools.contains(*tool) {
                return Err(format!("Missing required tool: {tool}"));
            }
        }

        // 3. Risk.
        if strategy.risk > RISK_HEADROOM * tolerances.risk_tolerance {
            return Err(format!(
                "Risk {:.2} exceeds tolerance {:.2}",
                strategy.risk, tolerances.risk_tolerance
            ));
        }

        // 4. Complexity.
        if strategy.complexity > tolerances.complexity_tolerance {
            return Err(format!(
                "Complexity {:.2} exceeds tolerance {:.2}",
                strategy.complexity, tolerances.complexity_tolerance
            ));
        }

        // 5. Resources and runway.
        if strategy.category != StrategyCategory::Survival {
            let after_payoff = perception.env.balance + strategy.typical_payoff.min(0.0);
            if after_payoff < RESERVE_DAYS * perception.daily_metabolic_cost {
                return Err("Insufficient resources after payoff".to_string());
            }
            match strategy.horizon {
                TimeHorizon::Long if runway < 14.0 => {
                    return Err("Runway too short for a long horizon".to_string());
                }
                TimeHorizon::Medium if runway < 7.0 => {
                    return Err("Runway too short for a medium horizon".to_string());
                }
                _ => {}
            }
        }

        // 6. Emergency override.
        if perception.env.mode == OperationMode::Emergency
            && strategy.category != StrategyCategory::Survival
            && !(strategy.category == StrategyCategory::Defense && strategy.risk < 0.3)
        {
            return Err("Emergency mode restricts to survival".to_string());
        }

        // 7. Social orientation.
        if strategy.category == StrategyCategory::Social
            && tolerances.social_orientation < SOCIAL_FLOOR
        {
            return Err("Social orientation too low".to_string());
        }

        Ok(())
    }
}

/// `Σ min(1, actual/min)·min / Σ min`, or 1.0 with no requirements.
fn genome_match(strategy: &Strategy, expressed: &ExpressedGenome) -> f64 {
    if strategy.gene_requirements.is_empty() {
        return 1.0;
    }
    let mut weighted = 0.0;
    let mut total = 0.0;
    for (gene, min) in strategy.gene_requirements {
        let actual = expressed.value_of(gene);
        weighted += (actual / min).min(1.0) * min;
        total += min;
    }
    weighted / total
}

fn tool_coverage(strategy: &Strategy, perception: &Perception) -> f64 {
    if strategy.required_tools.is_empty() {
        return 1.0;
    }
    let present = strategy
        .required_tools
        .iter()
        .filter(|t| perception.available_tools.contains(**t))
        .count();
    present as f64 / strategy.required_tools.len() as f64
}

fn category_urgency(category: StrategyCategory, perception: &Perception, runway: f64) -> f64 {
    match category {
        StrategyCategory::Survival => (1.0 - runway / 14.0).clamp(0.0, 1.0),
        StrategyCategory::Income => (1.0 - runway / 30.0).clamp(0.3, 1.0),
        StrategyCategory::Defense => {
            if perception.env.recent_deceptions > 0.0 {
                0.8
            } else {
                0.0
            }
        }
        StrategyCategory::Reproduction => {
            if perception.env.days_thriving > 7.0 {
                0.6
            } else {
                0.0
            }
        }
        StrategyCategory::Learning => 0.2,
        StrategyCategory::Social => 0.25,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::Perception;
    use axobase_core::environment::EnvironmentalState;
    use axobase_core::gene::{Gene, GeneDomain};
    use axobase_core::genome::LineageId;
    use axobase_expression::{ExpressedGene, ExpressedGenome};
    use std::collections::{HashMap, HashSet};

    fn expressed_with(traits: &[(&str, GeneDomain, f64)]) -> ExpressedGenome {
        ExpressedGenome {
            lineage: LineageId::from("L"),
            generation: 0,
            genome_hash: "0".repeat(64),
            genes: traits
                .iter()
                .map(|(name, domain, value)| ExpressedGene {
                    gene: Gene::new(*name, *name, *domain),
                    expressed_value: *value,
                    regulatory_effect: 1.0,
                    epigenetic_effect: 1.0,
                })
                .collect(),
            total_metabolic_cost: 0.05,
        }
    }

    /// A capable, comfortable agent with every tool.
    fn rich_perception(expressed: ExpressedGenome) -> Perception {
        Perception {
            agent_id: "agent".to_string(),
            env: EnvironmentalState::default().with_balance(100.0),
            expressed,
            cycle_metabolic_cost: 0.01,
            daily_metabolic_cost: 1.0,
            available_tools: ["dex", "staking", "social", "http", "messaging", "wallet"]
                .into_iter()
                .map(String::from)
                .collect(),
            market_risk: 0.2,
            opportunities: vec![],
            recent_events: vec![],
            experience: HashMap::new(),
        }
    }

    fn capable_traits(cooperation: f64, trust: f64) -> ExpressedGenome {
        use GeneDomain::*;
        expressed_with(&[
            ("risk_appetite", RiskAssessment, 0.7),
            ("uncertainty_tolerance", RiskAssessment, 0.7),
            ("acute_stress_response", StressResponse, 0.3),
            ("working_memory", Memory, 0.9),
            ("metacognition", Cognition, 0.8),
            ("learning_rate", Learning, 0.8),
            ("agent_cooperation", Cooperation, cooperation),
            ("trust_default", TrustModel, trust),
            ("communication_clarity", Communication, 0.7),
            ("reciprocity_tracking", Cooperation, cooperation),
            ("market_perception", Perception, 0.7),
            ("investment_horizon", Planning, 0.7),
            ("resource_conservation", ResourceManagement, 0.6),
            ("resource_storage", ResourceManagement, 0.6),
            ("emergency_response", Adaptation, 0.6),
        ])
    }

    #[test]
    fn social_strategies_accepted_with_high_orientation() {
        let filter = StrategyFilter;
        let perception = rich_perception(capable_traits(0.9, 0.9));
        let result = filter.filter(&perception);
        assert!(result.tolerances.social_orientation >= 0.3);
        assert!(result
            .accepted
            .iter()
            .any(|s| s.strategy.category == StrategyCategory::Social));
    }

    #[test]
    fn social_strategies_rejected_with_zero_orientation() {
        let filter = StrategyFilter;
        let perception = rich_perception(capable_traits(0.0, 0.0));
        let result = filter.filter(&perception);
        assert!(!result
            .accepted
            .iter()
            .any(|s| s.strategy.category == StrategyCategory::Social));
        let social_rejections: Vec<_> = result
            .rejected
            .iter()
            .filter(|r| r.reason == "Social orientation too low")
            .collect();
        assert!(
            !social_rejections.is_empty(),
            "social rejections should carry the canonical reason"
        );
    }

    #[test]
    fn emergency_mode_leaves_only_survival_and_safe_defense() {
        let filter = StrategyFilter;
        let mut perception = rich_perception(capable_traits(0.9, 0.9));
        perception.env = perception.env.with_mode(OperationMode::Emergency);
        let result = filter.filter(&perception);
        for s in &result.accepted {
            let safe_defense =
                s.strategy.category == StrategyCategory::Defense && s.strategy.risk < 0.3;
            assert!(
                s.strategy.category == StrategyCategory::Survival || safe_defense,
                "{} leaked through the emergency override",
                s.strategy.id
            );
        }
    }

    #[test]
    fn missing_tools_are_reported() {
        let filter = StrategyFilter;
        let mut perception = rich_perception(capable_traits(0.9, 0.9));
        perception.available_tools.remove("dex");
        let result = filter.filter(&perception);
        assert!(result
            .rejected
            .iter()
            .any(|r| r.id == "provide-liquidity" && r.reason.contains("dex")));
    }

    #[test]
    fn long_horizon_needs_runway() {
        let filter = StrategyFilter;
        let mut perception = rich_perception(capable_traits(0.9, 0.9));
        // 10 days of runway: long-horizon strategies must go.
        perception.env.balance = 10.0;
        perception.daily_metabolic_cost = 1.0;
        let result = filter.filter(&perception);
        assert!(result
            .rejected
            .iter()
            .any(|r| r.id == "stake-holdings" && r.reason.contains("long horizon")));
    }

    #[test]
    fn gene_requirements_allow_twenty_percent_shortfall() {
        let filter = StrategyFilter;
        use GeneDomain::*;
        let mut traits = capable_traits(0.9, 0.9);
        // data-analysis-gig needs data_analysis >= 0.5; 0.41 passes the
        // 20% tolerance, 0.39 does not.
        traits.genes.push(ExpressedGene {
            gene: Gene::new("data_analysis", "data_analysis", DataAnalysis),
            expressed_value: 0.41,
            regulatory_effect: 1.0,
            epigenetic_effect: 1.0,
        });
        let perception = rich_perception(traits);
        let result = filter.filter(&perception);
        assert!(result.accepted.iter().any(|s| s.strategy.id == "data-analysis-gig"));

        let mut traits = capable_traits(0.9, 0.9);
        traits.genes.push(ExpressedGene {
            gene: Gene::new("data_analysis", "data_analysis", DataAnalysis),
            expressed_value: 0.39,
            regulatory_effect: 1.0,
            epigenetic_effect: 1.0,
        });
        let perception = rich_perception(traits);
        let result = filter.filter(&perception);
        assert!(result
            .rejected
            .iter()
            .any(|r| r.id == "data-analysis-gig" && r.reason.contains("data_analysis")));
    }

    #[test]
    fn survivors_are_sorted_by_priority() {
        let filter = StrategyFilter;
        let perception = rich_perception(capable_traits(0.9, 0.9));
        let result = filter.filter(&perception);
        assert!(!result.accepted.is_empty());
        for pair in result.accepted.windows(2) {
            assert!(pair[0].priority >= pair[1].priority);
        }
    }

    #[test]
    fn success_estimate_stays_in_band() {
        let filter = StrategyFilter;
        let perception = rich_perception(capable_traits(0.9, 0.9));
        let result = filter.filter(&perception);
        for s in &result.accepted {
            assert!((0.1..=0.95).contains(&s.estimated_success));
        }
    }
}
