//! Evolution coordinator — mate signalling, partner evaluation, and
//! breeding invocation.
//!
//! The coordinator owns the per-pair cooperation ledger and the lineage
//! cache. Mating signals advertise a fitness distorted in proportion to
//! the signaller's dishonesty; evaluations discount it with the
//! evaluator's deception detection. Breeding is gated on kinship: a
//! Jaccard gene-set similarity above 0.8, or a shared ancestor within
//! three generations, refuses the pair outright.

use axobase_core::error::{AxobaseError, Result};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use axobase_expression::{ExpressedGenome, ExpressionResult};
use axobase_genetics::hgt::CooperationRecord;
use axobase_genetics::pipeline::{
    jaccard_similarity, BreedingContext, BreedingEngine, BreedingResult,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Jaccard similarity above this refuses breeding.
pub const KINSHIP_JACCARD_LIMIT: f64 = 0.8;
/// Shared-ancestor search depth for the lineage gate.
pub const KINSHIP_GENERATIONS: u32 = 3;
/// Stable units a fully invested parent offers.
const BASE_INVESTMENT: f64 = 5.0;

/// A broadcastable advertisement of breeding availability.
#[derive(Debug, Clone, Serialize)]
pub struct MatingSignal {
    pub agent_id: String,
    pub lineage: String,
    pub genome_hash: String,
    pub generation: u32,
    pub gene_count: usize,
    /// True fitness distorted by `1 − signal_honesty`.
    pub advertised_fitness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MateDecision {
    Accept,
    Reject,
    Negotiate,
}

/// The outcome of evaluating a partner's signal.
#[derive(Debug, Clone, Serialize)]
pub struct MateEvaluation {
    pub attractiveness: f64,
    pub genetic_compatibility: f64,
    pub estimated_fitness: f64,
    pub kinship: f64,
    pub risk_assessment: RiskLevel,
    pub decision: MateDecision,
}

/// A concrete proposal built on a signal.
#[derive(Debug, Clone, Serialize)]
pub struct MatingProposal {
    pub proposer: String,
    pub signal: MatingSignal,
    /// Offered offspring investment in stable units.
    pub offered_investment: f64,
}

/// The response to a proposal.
#[derive(Debug, Clone, Serialize)]
pub struct MatingResponse {
    pub decision: MateDecision,
    /// Present when negotiating: the responder's preferred investment.
    pub counter_investment: Option<f64>,
    pub evaluation: MateEvaluation,
}

/// Coordinates reproduction across agents. One instance owns its
/// cooperation ledger and lineage cache exclusively.
pub struct EvolutionCoordinator {
    breeding: BreedingEngine,
    /// `(agent, agent)` sorted pair → accumulated cooperation.
    cooperation: HashMap<(String, String), CooperationRecord>,
    /// Agent id → its two parents, for the kinship gate.
    parents: HashMap<String, (String, String)>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl EvolutionCoordinator {
    pub fn new(breeding: BreedingEngine) -> Self {
        Self {
            breeding,
            cooperation: HashMap::new(),
            parents: HashMap::new(),
        }
    }

    // --- Cooperation ledger ---

    pub fn record_interaction(&mut self, a: &str, b: &str, hours: f64, interactions: u32) {
        let entry = self.cooperation.entry(pair_key(a, b)).or_default();
        entry.hours += hours;
        entry.interactions += interactions;
        debug!(a, b, hours = entry.hours, interactions = entry.interactions, "cooperation recorded");
    }

    pub fn cooperation(&self, a: &str, b: &str) -> CooperationRecord {
        self.cooperation
            .get(&pair_key(a, b))
            .copied()
            .unwrap_or_default()
    }

    // --- Lineage cache ---

    pub fn register_offspring(&mut self, child: &str, parent_a: &str, parent_b: &str) {
        self.parents
            .insert(child.to_string(), (parent_a.to_string(), parent_b.to_string()));
    }

    /// All ancestors of `agent` within `depth` generations, including the
    /// agent itself.
    fn ancestry(&self, agent: &str, depth: u32) -> HashSet<String> {
        let mut out = HashSet::new();
        let mut frontier = vec![agent.to_string()];
        out.insert(agent.to_string());
        for _ in 0..depth {
            let mut next = Vec::new();
            for id in frontier {
                if let Some((a, b)) = self.parents.get(&id) {
                    for parent in [a, b] {
                        if out.insert(parent.clone()) {
                            next.push(parent.clone());
                        }
                    }
                }
            }
            frontier = next;
        }
        out
    }

    /// Whether two agents share an ancestor within the kinship depth.
    pub fn related(&self, a: &str, b: &str) -> bool {
        let ancestors_a = self.ancestry(a, KINSHIP_GENERATIONS);
        let ancestors_b = self.ancestry(b, KINSHIP_GENERATIONS);
        !ancestors_a.is_disjoint(&ancestors_b)
    }

    // --- Fitness and signalling ---

    /// Fitness: metabolic efficiency, expression entropy, and essential
    /// gene expression, weighted 0.4 / 0.3 / 0.3.
    pub fn fitness(&self, genome: &DynamicGenome, expression: &ExpressionResult) -> f64 {
        let expressed = &expression.expressed;
        let n = genome.gene_count();
        if n == 0 {
            return 0.0;
        }

        // Efficiency relative to the worst-case cost of a genome this size.
        let config = axobase_core::config::ExpressionConfig::default();
        let worst_cost =
            config.base_rate + n as f64 * (config.per_gene_overhead + 0.01 * 3.0);
        let efficiency =
            (1.0 - expressed.total_metabolic_cost / worst_cost).clamp(0.0, 1.0);

        // Normalised Shannon entropy over the expression distribution.
        let total: f64 = expressed.genes.iter().map(|g| g.expressed_value).sum();
        let entropy = if total > 0.0 && n > 1 {
            let h: f64 = expressed
                .genes
                .iter()
                .filter(|g| g.expressed_value > 0.0)
                .map(|g| {
                    let p = g.expressed_value / total;
                    -p * p.ln()
                })
                .sum();
            (h / (n as f64).ln()).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Mean expression of essential genes, normalised so mid-range
        // expression earns full marks.
        let essential: Vec<f64> = expressed
            .genes
            .iter()
            .filter(|g| g.gene.essentiality >= 0.8)
            .map(|g| g.expressed_value)
            .collect();
        let essential_expression = if essential.is_empty() {
            0.0
        } else {
            ((essential.iter().sum::<f64>() / essential.len() as f64) / 1.5).clamp(0.0, 1.0)
        };

        0.4 * efficiency + 0.3 * entropy + 0.3 * essential_expression
    }

    /// Build a mating signal. Dishonest signallers inflate their
    /// advertised fitness in proportion to `1 − signal_honesty`.
    pub fn generate_mating_signal(
        &self,
        agent_id: &str,
        genome: &DynamicGenome,
        expression: &ExpressionResult,
        rng: &mut dyn EntropySource,
    ) -> MatingSignal {
        let true_fitness = self.fitness(genome, expression);
        let honesty = expression.expressed.value_of("signal_honesty").min(1.0);
        let distortion = (1.0 - honesty) * rng.next_f64() * 0.5;
        let advertised = (true_fitness * (1.0 + distortion)).clamp(0.0, 1.0);
        MatingSignal {
            agent_id: agent_id.to_string(),
            lineage: genome.metadata.lineage.to_string(),
            genome_hash: genome.metadata.genome_hash.clone(),
            generation: genome.metadata.generation,
            gene_count: genome.metadata.total_genes,
            advertised_fitness: advertised,
        }
    }

    /// Evaluate a partner's signal against our own genome.
    pub fn evaluate_partner(
        &self,
        my_agent_id: &str,
        my_genome: &DynamicGenome,
        my_expressed: &ExpressedGenome,
        signal: &MatingSignal,
    ) -> MateEvaluation {
        // Kinship surrogate: structural hash similarity, overridden by
        // the lineage cache.
        let kinship = if self.related(my_agent_id, &signal.agent_id) {
            1.0
        } else {
            1.0 - hamming_fraction(&my_genome.metadata.genome_hash, &signal.genome_hash)
        };

        let my_count = my_genome.gene_count().max(1) as f64;
        let size_gap =
            (my_count - signal.gene_count as f64).abs() / my_count.max(signal.gene_count as f64);
        let genetic_compatibility = ((1.0 - size_gap) * (1.0 - kinship)).clamp(0.0, 1.0);

        // Skeptics haircut the advertised number.
        let deception_detection = my_expressed.value_of("deception_detection").min(1.0);
        let estimated_fitness = signal.advertised_fitness * (1.0 - 0.3 * deception_detection);

        let attractiveness = (0.5 * estimated_fitness
            + 0.3 * genetic_compatibility
            + 0.2 * (1.0 - kinship))
            .clamp(0.0, 1.0);

        let risk_assessment = if kinship > 0.5 {
            RiskLevel::High
        } else if estimated_fitness < 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        // Choosier agents demand more.
        let choosiness = my_expressed.value_of("mate_selection").min(1.0);
        let accept_at = 0.45 + 0.2 * choosiness;
        let decision = if kinship > 0.5 {
            MateDecision::Reject
        } else if attractiveness >= accept_at {
            MateDecision::Accept
        } else if attractiveness >= accept_at - 0.2 {
            MateDecision::Negotiate
        } else {
            MateDecision::Reject
        };

        MateEvaluation {
            attractiveness,
            genetic_compatibility,
            estimated_fitness,
            kinship,
            risk_assessment,
            decision,
        }
    }

    /// Build a proposal; the offered investment follows the
    /// parental-investment trait.
    pub fn propose_mating(
        &self,
        proposer: &str,
        signal: MatingSignal,
        my_expressed: &ExpressedGenome,
    ) -> MatingProposal {
        let investment = my_expressed.value_of("parental_investment").min(1.0) * BASE_INVESTMENT;
        MatingProposal {
            proposer: proposer.to_string(),
            signal,
            offered_investment: investment,
        }
    }

    /// Respond to a proposal. Negotiations counter with the responder's
    /// own investment preference.
    pub fn respond_to_proposal(
        &self,
        my_agent_id: &str,
        my_genome: &DynamicGenome,
        my_expressed: &ExpressedGenome,
        proposal: &MatingProposal,
    ) -> MatingResponse {
        let evaluation =
            self.evaluate_partner(my_agent_id, my_genome, my_expressed, &proposal.signal);
        let my_preference =
            my_expressed.value_of("parental_investment").min(1.0) * BASE_INVESTMENT;
        let counter_investment = match evaluation.decision {
            MateDecision::Negotiate => Some(my_preference.max(proposal.offered_investment)),
            _ => None,
        };
        MatingResponse {
            decision: evaluation.decision,
            counter_investment,
            evaluation,
        }
    }

    /// Run the inbreeding gate, then the operator pipeline. Holds both
    /// genomes by value, so the breed is atomic with respect to the
    /// parents.
    pub fn execute_breeding(
        &mut self,
        parent_a: DynamicGenome,
        parent_b: DynamicGenome,
        parent_a_id: &str,
        parent_b_id: &str,
        child_id: &str,
        environmental_stress: f64,
        starvation_mode: bool,
        rng: &mut dyn EntropySource,
    ) -> Result<BreedingResult> {
        let similarity = jaccard_similarity(&parent_a, &parent_b);
        if similarity > KINSHIP_JACCARD_LIMIT {
            return Err(AxobaseError::Inbreeding(format!(
                "gene-set similarity {similarity:.2} exceeds {KINSHIP_JACCARD_LIMIT}"
            )));
        }
        if self.related(parent_a_id, parent_b_id) {
            return Err(AxobaseError::Inbreeding(format!(
                "{parent_a_id} and {parent_b_id} share an ancestor within {KINSHIP_GENERATIONS} generations"
            )));
        }

        let ctx = BreedingContext {
            parent_a,
            parent_b,
            parent_a_id: parent_a_id.to_string(),
            parent_b_id: parent_b_id.to_string(),
            environmental_stress,
            starvation_mode,
        };
        let result = self.breeding.breed(&ctx, rng);
        if result.aborted.is_none() {
            self.register_offspring(child_id, parent_a_id, parent_b_id);
            info!(
                child = child_id,
                generation = result.child.metadata.generation,
                genes = result.child.metadata.total_genes,
                "breeding complete"
            );
        }
        Ok(result)
    }
}

impl Default for EvolutionCoordinator {
    fn default() -> Self {
        Self::new(BreedingEngine::default())
    }
}

/// Fraction of positions at which two equal-length hex strings differ.
fn hamming_fraction(a: &str, b: &str) -> f64 {
    let len = a.len().min(b.len());
    if len == 0 {
        return 1.0;
    }
    let differing = a.chars().zip(b.chars()).filter(|(x, y)| x != y).count();
    differing as f64 / len as f64
}
