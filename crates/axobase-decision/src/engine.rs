//! The decision engine — rate-limited, bounded deliberation with a
//! deterministic fallback.

use crate::action::ActionType;
use crate::filter::{EvaluatedStrategy, StrategyFilter};
use crate::perception::Perception;
use crate::prompt::{build_decision_prompt, parse_decision_response};
use crate::strategy;
use axobase_core::config::DecisionConfig;
use axobase_core::error::{AxobaseError, Result};
use axobase_core::ports::{Clock, LanguageModel, ThinkOptions};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One selected strategy, one concrete action, and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub selected_strategy: String,
    pub selected_action: ActionType,
    pub reasoning: String,
    /// Range `[0, 1]`; fallback decisions carry at most 0.4 so callers
    /// can tell them apart.
    pub confidence: f64,
    /// Other candidate ids, best first.
    pub alternatives: Vec<String>,
    pub risk_assessment: String,
    pub expected_cost: f64,
}

impl Decision {
    fn from_candidate(
        candidate: &EvaluatedStrategy,
        confidence: f64,
        reasoning: String,
        risk_assessment: String,
        alternatives: Vec<String>,
    ) -> Self {
        Self {
            selected_strategy: candidate.strategy.id.to_string(),
            selected_action: candidate.strategy.action,
            reasoning,
            confidence,
            alternatives,
            risk_assessment,
            expected_cost: candidate.strategy.action.expected_cost(),
        }
    }
}

/// Builds prompts, calls the language-model port, parses, and falls back.
pub struct DecisionEngine {
    llm: Arc<dyn LanguageModel>,
    clock: Arc<dyn Clock>,
    config: DecisionConfig,
    filter: StrategyFilter,
    last_decision_ms: Option<u64>,
}

impl DecisionEngine {
    pub fn new(llm: Arc<dyn LanguageModel>, clock: Arc<dyn Clock>, config: DecisionConfig) -> Self {
        Self {
            llm,
            clock,
            config,
            filter: StrategyFilter,
            last_decision_ms: None,
        }
    }

    /// Make one decision. Fails with [`AxobaseError::RateLimited`] when
    /// called before the minimum interval has elapsed; never fails on
    /// language-model trouble (the filter fallback covers that).
    pub async fn decide(&mut self, perception: &Perception) -> Result<Decision> {
        let now = self.clock.monotonic_millis();
        if let Some(last) = self.last_decision_ms {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.config.min_decision_interval_ms {
                return Err(AxobaseError::RateLimited {
                    wait_ms: self.config.min_decision_interval_ms - elapsed,
                });
            }
        }
        self.last_decision_ms = Some(now);

        let filtered = self.filter.filter(perception);
        let candidates: Vec<EvaluatedStrategy> = filtered
            .accepted
            .into_iter()
            .take(self.config.max_candidates)
            .collect();

        if candidates.is_empty() {
            // Nothing is viable; go dormant.
            return Ok(Decision {
                selected_strategy: "emergency-survival".to_string(),
                selected_action: ActionType::EnterDormancy,
                reasoning: "No viable strategies passed the filter".to_string(),
                confidence: 0.5,
                alternatives: Vec::new(),
                risk_assessment: "Dormancy has no downside risk".to_string(),
                expected_cost: ActionType::EnterDormancy.expected_cost(),
            });
        }

        let alternatives: Vec<String> = candidates
            .iter()
            .skip(1)
            .take(3)
            .map(|c| c.strategy.id.to_string())
            .collect();

        let prompt = build_decision_prompt(perception, &candidates);
        let options = ThinkOptions {
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let deliberation = Duration::from_millis(self.config.max_deliberation_ms);
        let reply = tokio::time::timeout(deliberation, self.llm.think(&prompt, &options)).await;

        let decision = match reply {
            Ok(Ok(text)) => match parse_decision_response(&text) {
                Some(parsed) => {
                    let chosen = candidates
                        .iter()
                        .find(|c| c.strategy.id == parsed.strategy_id)
                        .unwrap_or_else(|| {
                            debug!(
                                returned = %parsed.strategy_id,
                                "model chose an unknown strategy; using top candidate"
                            );
                            &candidates[0]
                        });
                    Decision::from_candidate(
                        chosen,
                        parsed.confidence,
                        parsed.reasoning,
                        parsed.risk_assessment,
                        alternatives,
                    )
                }
                None => {
                    warn!("unparseable model reply; falling back to top candidate");
                    self.fallback(&candidates, alternatives)
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "language model failed; falling back");
                self.fallback(&candidates, alternatives)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.max_deliberation_ms,
                    "deliberation timed out; falling back"
                );
                self.fallback(&candidates, alternatives)
            }
        };
        Ok(decision)
    }

    fn fallback(&self, candidates: &[EvaluatedStrategy], alternatives: Vec<String>) -> Decision {
        Decision::from_candidate(
            &candidates[0],
            0.4,
            "Filter fallback: top-priority candidate selected without deliberation".to_string(),
            "Unassessed".to_string(),
            alternatives,
        )
    }

    /// The action a strategy id maps to, from the fixed table.
    pub fn action_for(strategy_id: &str) -> Option<ActionType> {
        strategy::by_id(strategy_id).map(|s| s.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::{MemoryEvent, Opportunity, Perception};
    use axobase_core::environment::EnvironmentalState;
    use axobase_core::gene::{Gene, GeneDomain};
    use axobase_core::genome::LineageId;
    use axobase_core::mock::{FixedClock, MockLlm};
    use axobase_expression::{ExpressedGene, ExpressedGenome};
    use std::collections::{HashMap, HashSet};

    fn expressed() -> ExpressedGenome {
        use GeneDomain::*;
        let traits = [
            ("risk_appetite", RiskAssessment, 0.7),
            ("uncertainty_tolerance", RiskAssessment, 0.7),
            ("acute_stress_response", StressResponse, 0.3),
            ("working_memory", Memory, 0.9),
            ("metacognition", Cognition, 0.8),
            ("learning_rate", Learning, 0.8),
            ("agent_cooperation", Cooperation, 0.8),
            ("trust_default", TrustModel, 0.8),
            ("communication_clarity", Communication, 0.7),
            ("data_analysis", DataAnalysis, 0.8),
            ("web_navigation", WebNavigation, 0.7),
            ("search_depth", WebNavigation, 0.6),
            ("resource_conservation", ResourceManagement, 0.6),
            ("resource_storage", ResourceManagement, 0.6),
            ("emergency_response", Adaptation, 0.6),
        ];
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

    fn perception() -> Perception {
        Perception {
            agent_id: "agent".to_string(),
            env: EnvironmentalState::default().with_balance(100.0),
            expressed: expressed(),
            cycle_metabolic_cost: 0.01,
            daily_metabolic_cost: 1.0,
            available_tools: ["http", "messaging", "wallet"]
                .into_iter()
                .map(String::from)
                .collect(),
            market_risk: 0.2,
            opportunities: vec![Opportunity {
                description: "open data bounty".to_string(),
                estimated_value: 3.0,
            }],
            recent_events: vec![MemoryEvent {
                summary: "completed a web research gig".to_string(),
                success: Some(true),
            }],
            experience: HashMap::new(),
        }
    }

    fn engine_with(llm: MockLlm, config: DecisionConfig) -> DecisionEngine {
        DecisionEngine::new(
            Arc::new(llm),
            Arc::new(FixedClock::at(1_000_000)),
            config,
        )
    }

    #[tokio::test]
    async fn chooses_the_model_selected_candidate() {
        let llm = MockLlm::new(
            "STRATEGY_ID: data-analysis-gig\nACTION: fetch\nCONFIDENCE: 0.8\n\
             REASONING: strong analysis traits\nRISK_ASSESSMENT: low",
        );
        let mut engine = engine_with(llm, DecisionConfig::default());
        let decision = engine.decide(&perception()).await.unwrap();
        assert_eq!(decision.selected_strategy, "data-analysis-gig");
        assert_eq!(decision.selected_action, ActionType::Fetch);
        assert!(decision.confidence > 0.4);
    }

    #[tokio::test]
    async fn unknown_strategy_falls_back_to_top_candidate() {
        let llm = MockLlm::new("STRATEGY_ID: rob-a-bank\nCONFIDENCE: 0.99");
        let mut engine = engine_with(llm, DecisionConfig::default());
        let decision = engine.decide(&perception()).await.unwrap();
        // The invented strategy is not in the candidate list.
        assert_ne!(decision.selected_strategy, "rob-a-bank");
    }

    #[tokio::test]
    async fn llm_failure_yields_low_confidence_fallback() {
        let llm = MockLlm::new("ignored");
        llm.set_failing(true);
        let mut engine = engine_with(llm, DecisionConfig::default());
        let decision = engine.decide(&perception()).await.unwrap();
        assert!(decision.confidence <= 0.4);
        assert!(!decision.selected_strategy.is_empty());
    }

    #[tokio::test]
    async fn slow_llm_is_cut_off_at_deliberation_budget() {
        let llm = MockLlm::new("STRATEGY_ID: data-analysis-gig")
            .with_delay(Duration::from_millis(2_000));
        let config = DecisionConfig {
            max_deliberation_ms: 100,
            ..Default::default()
        };
        let mut engine = engine_with(llm, config);
        let started = std::time::Instant::now();
        let decision = engine.decide(&perception()).await.unwrap();
        let elapsed = started.elapsed();
        assert!(decision.confidence <= 0.4, "timeout must fall back");
        assert!(
            elapsed < Duration::from_millis(1_000),
            "deliberation budget not honoured: {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn second_call_is_rate_limited() {
        let llm = MockLlm::new("STRATEGY_ID: data-analysis-gig\nCONFIDENCE: 0.8");
        let mut engine = engine_with(llm, DecisionConfig::default());
        engine.decide(&perception()).await.unwrap();
        match engine.decide(&perception()).await {
            Err(AxobaseError::RateLimited { wait_ms }) => assert!(wait_ms > 0),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_filter_enters_dormancy() {
        let llm = MockLlm::new("ignored");
        let mut engine = engine_with(llm, DecisionConfig::default());
        let mut p = perception();
        // No tools, no traits: nothing passes.
        p.available_tools.clear();
        p.expressed.genes.clear();
        p.env.balance = 0.0;
        let decision = engine.decide(&p).await.unwrap();
        assert_eq!(decision.selected_strategy, "emergency-survival");
        assert_eq!(decision.selected_action, ActionType::EnterDormancy);
    }
}
