//! Genesis gene pool — the fixed seed every lineage starts from.
//!
//! Eight chromosomes, 63 genes, five regulatory edges. These numbers are
//! contract: the seed must be reproduced exactly so genesis genome hashes
//! are portable across implementations. The seed is viable but not
//! optimal — values sit mid-range, essential machinery carries high
//! essentiality, and the learning/social genes carry the plasticity.

use axobase_core::chromosome::Chromosome;
use axobase_core::epigenome::Epigenome;
use axobase_core::gene::{Gene, GeneDomain};
use axobase_core::genome::{DynamicGenome, LineageId};
use axobase_core::regulatory::{RegulatoryEdge, RegulatoryRelation};

/// Gene count of the genesis genome.
pub const GENESIS_GENE_COUNT: usize = 63;
/// Chromosome count of the genesis genome.
pub const GENESIS_CHROMOSOME_COUNT: usize = 8;

fn seed(
    id: &str,
    domain: GeneDomain,
    value: f64,
    weight: f64,
    dominance: f64,
    plasticity: f64,
    essentiality: f64,
    metabolic_cost: f64,
) -> Gene {
    Gene::new(id, id, domain)
        .with_value(value)
        .with_weight(weight)
        .with_dominance(dominance)
        .with_plasticity(plasticity)
        .with_essentiality(essentiality)
        .with_metabolic_cost(metabolic_cost)
}

fn chr_metabolism() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_metabolism", "Metabolism & Survival", true).with_genes(vec![
        seed("metabolism_rate", Metabolism, 0.6, 1.2, 0.7, 0.3, 0.95, 0.004),
        seed("energy_efficiency", Metabolism, 0.5, 1.0, 0.5, 0.4, 0.9, 0.002),
        seed("resource_conservation", ResourceManagement, 0.55, 1.0, 0.5, 0.5, 0.85, 0.002),
        seed("starvation_resistance", Metabolism, 0.4, 0.9, 0.4, 0.6, 0.8, 0.001),
        seed("cycle_speed", Metabolism, 0.5, 1.0, 0.5, 0.4, 0.9, 0.001),
        seed("dormancy_threshold", Dormancy, 0.3, 0.8, 0.4, 0.6, 0.7, 0.001),
        seed("emergency_response", Adaptation, 0.5, 1.0, 0.5, 0.5, 0.8, 0.002),
        seed("resource_storage", ResourceManagement, 0.45, 0.9, 0.4, 0.5, 0.6, 0.002),
    ])
}

fn chr_perception() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_perception", "Perception & Cognition", true).with_genes(vec![
        seed("market_perception", Perception, 0.5, 1.1, 0.5, 0.6, 0.85, 0.003),
        seed("opportunity_detection", Perception, 0.45, 1.0, 0.5, 0.7, 0.7, 0.003),
        seed("threat_detection", Perception, 0.55, 1.1, 0.6, 0.5, 0.85, 0.003),
        seed("working_memory", Memory, 0.5, 1.2, 0.5, 0.5, 0.9, 0.004),
        seed("metacognition", Cognition, 0.4, 1.0, 0.4, 0.7, 0.75, 0.004),
        seed("learning_rate", Learning, 0.5, 1.0, 0.5, 0.9, 0.8, 0.003),
        seed("pattern_recognition", Cognition, 0.5, 1.1, 0.5, 0.6, 0.8, 0.003),
        seed("attention_span", Cognition, 0.45, 0.9, 0.4, 0.5, 0.6, 0.002),
        seed("novelty_seeking", NoveltySeeking, 0.4, 0.8, 0.4, 0.8, 0.3, 0.002),
    ])
}

fn chr_economic() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_economic", "Economic Strategy", false).with_genes(vec![
        seed("risk_appetite", RiskAssessment, 0.45, 1.0, 0.5, 0.7, 0.5, 0.002),
        seed("uncertainty_tolerance", RiskAssessment, 0.5, 0.9, 0.4, 0.6, 0.4, 0.002),
        seed("investment_horizon", Planning, 0.5, 0.9, 0.4, 0.5, 0.4, 0.002),
        seed("trading_aggression", Trading, 0.35, 0.8, 0.4, 0.6, 0.3, 0.002),
        seed("income_diversification", IncomeStrategy, 0.5, 1.0, 0.5, 0.6, 0.5, 0.002),
        seed("price_sensitivity", Trading, 0.5, 0.9, 0.4, 0.5, 0.3, 0.001),
        seed("arbitrage_detection", Trading, 0.3, 0.8, 0.4, 0.6, 0.2, 0.002),
        seed("liquidity_preference", ResourceManagement, 0.55, 0.9, 0.5, 0.4, 0.4, 0.001),
    ])
}

fn chr_internet() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_internet", "Internet Capabilities", false).with_genes(vec![
        seed("web_navigation", WebNavigation, 0.5, 1.0, 0.5, 0.6, 0.4, 0.002),
        seed("content_creation", ContentCreation, 0.4, 0.9, 0.4, 0.7, 0.3, 0.002),
        seed("data_analysis", DataAnalysis, 0.5, 1.0, 0.5, 0.6, 0.4, 0.003),
        seed("api_utilization", ApiUtilization, 0.45, 1.0, 0.5, 0.6, 0.4, 0.002),
        seed("social_media_fluency", SocialMedia, 0.35, 0.8, 0.4, 0.7, 0.2, 0.002),
        seed("information_filtering", DataAnalysis, 0.5, 1.0, 0.5, 0.5, 0.5, 0.002),
        seed("search_depth", WebNavigation, 0.45, 0.9, 0.4, 0.5, 0.3, 0.002),
    ])
}

fn chr_social() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_social", "Social & Reproduction", false).with_genes(vec![
        seed("agent_cooperation", Cooperation, 0.5, 1.0, 0.5, 0.8, 0.5, 0.002),
        seed("trust_default", TrustModel, 0.45, 0.9, 0.4, 0.7, 0.5, 0.001),
        seed("competition_drive", Competition, 0.45, 0.9, 0.5, 0.6, 0.4, 0.002),
        seed("communication_clarity", Communication, 0.5, 1.0, 0.5, 0.6, 0.5, 0.002),
        seed("deception_detection", TrustModel, 0.4, 1.0, 0.5, 0.6, 0.6, 0.003),
        seed("mate_selection", MateSelection, 0.5, 1.0, 0.5, 0.7, 0.5, 0.002),
        seed("parental_investment", ParentalInvestment, 0.45, 0.9, 0.5, 0.6, 0.4, 0.002),
        seed("signal_honesty", Communication, 0.6, 1.0, 0.5, 0.5, 0.5, 0.001),
        seed("reciprocity_tracking", Cooperation, 0.45, 0.9, 0.4, 0.6, 0.4, 0.002),
        seed("kin_recognition", MateSelection, 0.5, 0.9, 0.5, 0.4, 0.5, 0.002),
    ])
}

fn chr_human() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_human", "Human Interface", false).with_genes(vec![
        seed("human_hiring", HumanHiring, 0.3, 0.8, 0.4, 0.7, 0.2, 0.002),
        seed("human_communication", HumanCommunication, 0.45, 0.9, 0.4, 0.7, 0.3, 0.002),
        seed("human_evaluation", HumanEvaluation, 0.4, 0.9, 0.4, 0.6, 0.3, 0.002),
        seed("negotiation", Communication, 0.4, 0.9, 0.5, 0.6, 0.3, 0.002),
        seed("empathy_modeling", SelfModel, 0.35, 0.8, 0.4, 0.7, 0.2, 0.002),
        seed("reputation_management", TrustModel, 0.45, 0.9, 0.4, 0.6, 0.3, 0.002),
    ])
}

fn chr_stress() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_stress", "Stress Response", true).with_genes(vec![
        seed("acute_stress_response", StressResponse, 0.5, 1.1, 0.6, 0.6, 0.9, 0.003),
        seed("chronic_stress_adaptation", StressResponse, 0.45, 1.0, 0.5, 0.7, 0.85, 0.002),
        seed("recovery_rate", StressResponse, 0.5, 1.0, 0.5, 0.5, 0.8, 0.002),
        seed("stress_memory", Memory, 0.4, 0.9, 0.4, 0.6, 0.7, 0.002),
        seed("resilience", StressResponse, 0.55, 1.1, 0.5, 0.5, 0.9, 0.002),
        seed("cellular_repair", StressResponse, 0.5, 1.0, 0.5, 0.4, 0.85, 0.003),
    ])
}

fn chr_regulatory() -> Chromosome {
    use GeneDomain::*;
    Chromosome::new("chr_regulatory", "Regulatory Control", true).with_genes(vec![
        seed("stress_regulator", Regulatory, 0.6, 1.2, 0.7, 0.3, 0.95, 0.001),
        seed("social_context_regulator", Regulatory, 0.55, 1.1, 0.6, 0.4, 0.9, 0.001),
        seed("circadian_regulator", Regulatory, 0.6, 1.2, 0.6, 0.2, 0.95, 0.001),
        seed("metabolic_regulator", Regulatory, 0.55, 1.1, 0.6, 0.3, 0.9, 0.001),
        seed("expression_modulator", Regulatory, 0.5, 1.0, 0.5, 0.4, 0.85, 0.001),
        seed("epigenetic_controller", Regulatory, 0.5, 1.0, 0.5, 0.5, 0.85, 0.001),
        seed("development_regulator", Regulatory, 0.55, 1.0, 0.5, 0.3, 0.9, 0.001),
        seed("homeostasis_keeper", Regulatory, 0.6, 1.1, 0.6, 0.3, 0.95, 0.001),
        seed("plasticity_governor", Regulatory, 0.5, 1.0, 0.5, 0.4, 0.85, 0.001),
    ])
}

/// The seed regulatory network: stress gates stress response up and
/// cognition down, social context gates cooperation up and competition
/// down, and the circadian regulator drives metabolism.
fn seed_edges() -> Vec<RegulatoryEdge> {
    vec![
        RegulatoryEdge::new(
            "stress_regulator",
            "acute_stress_response",
            RegulatoryRelation::Activation,
            0.8,
        ),
        RegulatoryEdge::new(
            "stress_regulator",
            "metacognition",
            RegulatoryRelation::Inhibition,
            0.5,
        ),
        RegulatoryEdge::new(
            "social_context_regulator",
            "agent_cooperation",
            RegulatoryRelation::Activation,
            0.7,
        ),
        RegulatoryEdge::new(
            "social_context_regulator",
            "competition_drive",
            RegulatoryRelation::Inhibition,
            0.6,
        ),
        RegulatoryEdge::new(
            "circadian_regulator",
            "metabolism_rate",
            RegulatoryRelation::Activation,
            0.9,
        ),
    ]
}

/// Build the genesis genome for a lineage. Deterministic: two calls with
/// the same lineage produce structurally identical genomes with equal
/// hashes.
pub fn genesis_genome(lineage: LineageId, birth_timestamp_ms: u64) -> DynamicGenome {
    DynamicGenome::assemble(
        lineage,
        0,
        birth_timestamp_ms,
        vec![
            chr_metabolism(),
            chr_perception(),
            chr_economic(),
            chr_internet(),
            chr_social(),
            chr_human(),
            chr_stress(),
            chr_regulatory(),
        ],
        seed_edges(),
        Epigenome::new(),
    )
    .expect("genesis seed satisfies all genome invariants")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axobase_core::gene::GeneOrigin;

    #[test]
    fn genesis_shape_is_contractual() {
        let g = genesis_genome(LineageId::from("L"), 0);
        assert_eq!(g.metadata.generation, 0);
        assert_eq!(g.metadata.total_genes, GENESIS_GENE_COUNT);
        assert_eq!(g.chromosomes.len(), GENESIS_CHROMOSOME_COUNT);
        assert_eq!(g.regulatory_edges.len(), 5);
    }

    #[test]
    fn genesis_hash_is_stable() {
        let a = genesis_genome(LineageId::from("L"), 0);
        let b = genesis_genome(LineageId::from("M"), 99);
        // The structural hash ignores lineage and timestamps.
        assert_eq!(a.metadata.genome_hash, b.metadata.genome_hash);
        assert_eq!(a.metadata.genome_hash.len(), 64);
    }

    #[test]
    fn essential_chromosomes_are_marked() {
        let g = genesis_genome(LineageId::from("L"), 0);
        let essential: Vec<&str> = g
            .chromosomes
            .iter()
            .filter(|c| c.is_essential)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(
            essential,
            vec!["chr_metabolism", "chr_perception", "chr_stress", "chr_regulatory"]
        );
    }

    #[test]
    fn all_seed_genes_are_primordial_and_valid() {
        let g = genesis_genome(LineageId::from("L"), 0);
        for gene in g.genes() {
            assert_eq!(gene.origin, GeneOrigin::Primordial);
            assert_eq!(gene.age, 0);
            assert!((0.0..=1.0).contains(&gene.value));
            assert!((0.1..=3.0).contains(&gene.weight));
            assert!((0.0..=0.01).contains(&gene.metabolic_cost));
        }
        g.validate().unwrap();
    }

    #[test]
    fn filter_relevant_traits_are_present() {
        let g = genesis_genome(LineageId::from("L"), 0);
        for name in [
            "risk_appetite",
            "uncertainty_tolerance",
            "acute_stress_response",
            "working_memory",
            "metacognition",
            "learning_rate",
            "agent_cooperation",
            "trust_default",
            "signal_honesty",
            "parental_investment",
            "cycle_speed",
        ] {
            assert!(g.gene_by_name(name).is_some(), "missing seed gene {name}");
        }
    }
}
