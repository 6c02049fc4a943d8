//! Gene — a named numeric trait with provenance.
//!
//! Genes are the atoms of the dynamic genome. Each carries a handful of
//! clamped numeric attributes, a functional domain tag, provenance
//! (where it came from and how old it is), and expression control.
//! Back-references between genes (`duplicate_of`, `acquired_from`) are
//! lookup keys, never ownership.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a gene within a genome.
///
/// Seed genes use fixed snake_case names so genesis genome hashes are
/// portable; genes minted during breeding derive their ids from the
/// injected entropy source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeneId(pub String);

impl GeneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GeneId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GeneId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&GeneId> for GeneId {
    fn from(id: &GeneId) -> Self {
        id.clone()
    }
}

/// Functional domain of a gene. Closed enumeration — strategy gating and
/// epigenetic triggers address genes by domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneDomain {
    Metabolism,
    Perception,
    Cognition,
    Memory,
    ResourceManagement,
    RiskAssessment,
    Trading,
    IncomeStrategy,
    OnChainOp,
    WebNavigation,
    ContentCreation,
    DataAnalysis,
    ApiUtilization,
    SocialMedia,
    Cooperation,
    Competition,
    Communication,
    TrustModel,
    MateSelection,
    ParentalInvestment,
    HumanHiring,
    HumanCommunication,
    HumanEvaluation,
    StressResponse,
    Adaptation,
    Dormancy,
    Migration,
    SelfModel,
    StrategyEvaluation,
    Learning,
    Planning,
    NoveltySeeking,
    Regulatory,
}

impl GeneDomain {
    /// All domains, in declaration order. Used for de-novo gene birth.
    pub const ALL: [GeneDomain; 33] = [
        GeneDomain::Metabolism,
        GeneDomain::Perception,
        GeneDomain::Cognition,
        GeneDomain::Memory,
        GeneDomain::ResourceManagement,
        GeneDomain::RiskAssessment,
        GeneDomain::Trading,
        GeneDomain::IncomeStrategy,
        GeneDomain::OnChainOp,
        GeneDomain::WebNavigation,
        GeneDomain::ContentCreation,
        GeneDomain::DataAnalysis,
        GeneDomain::ApiUtilization,
        GeneDomain::SocialMedia,
        GeneDomain::Cooperation,
        GeneDomain::Competition,
        GeneDomain::Communication,
        GeneDomain::TrustModel,
        GeneDomain::MateSelection,
        GeneDomain::ParentalInvestment,
        GeneDomain::HumanHiring,
        GeneDomain::HumanCommunication,
        GeneDomain::HumanEvaluation,
        GeneDomain::StressResponse,
        GeneDomain::Adaptation,
        GeneDomain::Dormancy,
        GeneDomain::Migration,
        GeneDomain::SelfModel,
        GeneDomain::StrategyEvaluation,
        GeneDomain::Learning,
        GeneDomain::Planning,
        GeneDomain::NoveltySeeking,
        GeneDomain::Regulatory,
    ];
}

/// Where a gene came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneOrigin {
    /// Present in the genesis gene pool.
    Primordial,
    /// Passed down through crossover.
    Inherited,
    /// Copy of another gene in this lineage.
    Duplicated,
    /// Value changed by point mutation.
    Mutated,
    /// Acquired from another living agent.
    HorizontalTransfer,
    /// Synthesized from scratch during breeding.
    DeNovo,
}

/// Whether and how a gene participates in expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionState {
    Active,
    Silenced,
    /// Expressed only when the gene's activation condition holds.
    Conditional,
}

/// A single gene: a named numeric trait with provenance and expression
/// control. All numeric attributes are clamped to their contractual ranges
/// on construction and mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub id: GeneId,
    pub name: String,
    pub domain: GeneDomain,

    /// Trait value. Range `[0, 1]`.
    pub value: f64,
    /// Expression weight. Range `[0.1, 3.0]`.
    pub weight: f64,
    /// Dominance in conflicts. Range `[0, 1]`.
    pub dominance: f64,
    /// Susceptibility to epigenetic modification. Range `[0, 1]`.
    pub plasticity: f64,
    /// Protection from deletion. Range `[0, 1]`; genes at `>= 0.8` are
    /// never deleted.
    pub essentiality: f64,
    /// Per-tick maintenance cost in stable units. Range `[0, 0.01]`.
    pub metabolic_cost: f64,

    pub origin: GeneOrigin,
    /// Age in generations.
    pub age: u32,
    /// Lookup key of the gene this was duplicated from, if any.
    pub duplicate_of: Option<GeneId>,
    /// Id of the donor agent for horizontally transferred genes.
    pub acquired_from: Option<String>,

    pub expression_state: ExpressionState,
    /// Symbolic condition over the environment, evaluated when the state
    /// is [`ExpressionState::Conditional`].
    pub activation_condition: Option<String>,
}

/// Clamp ranges for gene attributes, shared with the mutation operators.
pub mod ranges {
    pub const VALUE: (f64, f64) = (0.0, 1.0);
    pub const WEIGHT: (f64, f64) = (0.1, 3.0);
    pub const DOMINANCE: (f64, f64) = (0.0, 1.0);
    pub const PLASTICITY: (f64, f64) = (0.0, 1.0);
    pub const ESSENTIALITY: (f64, f64) = (0.0, 1.0);
    pub const METABOLIC_COST: (f64, f64) = (0.0, 0.01);
}

impl Gene {
    /// Create an active primordial gene with neutral attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, domain: GeneDomain) -> Self {
        Self {
            id: GeneId::new(id),
            name: name.into(),
            domain,
            value: 0.5,
            weight: 1.0,
            dominance: 0.5,
            plasticity: 0.5,
            essentiality: 0.0,
            metabolic_cost: 0.001,
            origin: GeneOrigin::Primordial,
            age: 0,
            duplicate_of: None,
            acquired_from: None,
            expression_state: ExpressionState::Active,
            activation_condition: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value.clamp(ranges::VALUE.0, ranges::VALUE.1);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
        self
    }

    pub fn with_dominance(mut self, dominance: f64) -> Self {
        self.dominance = dominance.clamp(ranges::DOMINANCE.0, ranges::DOMINANCE.1);
        self
    }

    pub fn with_plasticity(mut self, plasticity: f64) -> Self {
        self.plasticity = plasticity.clamp(ranges::PLASTICITY.0, ranges::PLASTICITY.1);
        self
    }

    pub fn with_essentiality(mut self, essentiality: f64) -> Self {
        self.essentiality = essentiality.clamp(ranges::ESSENTIALITY.0, ranges::ESSENTIALITY.1);
        self
    }

    pub fn with_metabolic_cost(mut self, cost: f64) -> Self {
        self.metabolic_cost = cost.clamp(ranges::METABOLIC_COST.0, ranges::METABOLIC_COST.1);
        self
    }

    pub fn with_state(mut self, state: ExpressionState) -> Self {
        self.expression_state = state;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.expression_state = ExpressionState::Conditional;
        self.activation_condition = Some(condition.into());
        self
    }

    /// Re-clamp every numeric attribute into its contractual range.
    pub fn clamp_attributes(&mut self) {
        self.value = self.value.clamp(ranges::VALUE.0, ranges::VALUE.1);
        self.weight = self.weight.clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
        self.dominance = self.dominance.clamp(ranges::DOMINANCE.0, ranges::DOMINANCE.1);
        self.plasticity = self.plasticity.clamp(ranges::PLASTICITY.0, ranges::PLASTICITY.1);
        self.essentiality = self
            .essentiality
            .clamp(ranges::ESSENTIALITY.0, ranges::ESSENTIALITY.1);
        self.metabolic_cost = self
            .metabolic_cost
            .clamp(ranges::METABOLIC_COST.0, ranges::METABOLIC_COST.1);
    }

    /// Whether the deletion operator may ever remove this gene.
    pub fn is_deletable(&self) -> bool {
        self.essentiality < 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_attributes() {
        let g = Gene::new("g", "G", GeneDomain::Metabolism)
            .with_value(1.7)
            .with_weight(9.0)
            .with_metabolic_cost(0.5);
        assert_eq!(g.value, 1.0);
        assert_eq!(g.weight, 3.0);
        assert_eq!(g.metabolic_cost, 0.01);
    }

    #[test]
    fn conditional_builder_sets_state() {
        let g = Gene::new("g", "G", GeneDomain::Dormancy).with_condition("balance < 2");
        assert_eq!(g.expression_state, ExpressionState::Conditional);
        assert_eq!(g.activation_condition.as_deref(), Some("balance < 2"));
    }

    #[test]
    fn essential_genes_are_not_deletable() {
        let g = Gene::new("g", "G", GeneDomain::Metabolism).with_essentiality(0.9);
        assert!(!g.is_deletable());
        let g = g.with_essentiality(0.5);
        assert!(g.is_deletable());
    }

    #[test]
    fn gene_serializes_roundtrip() {
        let g = Gene::new("metabolism_rate", "Metabolism rate", GeneDomain::Metabolism)
            .with_value(0.6)
            .with_essentiality(0.9);
        let json = serde_json::to_string(&g).unwrap();
        let restored: Gene = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, g);
    }
}
