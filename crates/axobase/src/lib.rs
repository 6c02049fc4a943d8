//! # Axobase
//!
//! The Evolutionary Genome & Decision Engine: autonomous agents carry a
//! variable-length dynamic genome, express it against their economic
//! environment, decide under genetic constraints, and reproduce with
//! heritable variation under real resource pressure.
//!
//! ## Quick Start
//!
//! ```rust
//! use axobase::prelude::*;
//!
//! // Every lineage starts from the fixed genesis pool.
//! let genome = genesis_genome(LineageId::from("lineage-1"), 0);
//! assert_eq!(genome.metadata.total_genes, 63);
//!
//! // Expression turns genome + environment into trait values and a cost.
//! let engine = ExpressionEngine::default();
//! let env = EnvironmentalState::default();
//! let result = engine.express(&genome, &env, &ExpressOptions::default());
//! assert!(result.expressed.total_metabolic_cost > 0.0);
//!
//! // Breeding is deterministic under a seeded entropy source.
//! let ctx = BreedingContext {
//!     parent_a: genome.clone(),
//!     parent_b: genome.clone(),
//!     parent_a_id: "a".into(),
//!     parent_b_id: "b".into(),
//!     environmental_stress: 0.2,
//!     starvation_mode: false,
//! };
//! let mut rng = ChaChaEntropy::seeded(42);
//! let child = BreedingEngine::default().breed(&ctx, &mut rng);
//! assert_eq!(child.child.metadata.generation, 1);
//! ```
//!
//! ## Architecture
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`axobase_core`] | Genome model, invariants, hashing, serialization, ports, config |
//! | [`axobase_expression`] | Expression engine, condition language, cache |
//! | [`axobase_genetics`] | Genesis pool, breeding pipeline, HGT, epigenetics, adaptive rates |
//! | [`axobase_decision`] | Strategy catalogue, filter, LLM-backed decision engine |
//! | [`axobase_runtime`] | Survival loop, executor, evolution coordinator |

pub use axobase_core as core;
pub use axobase_decision as decision;
pub use axobase_expression as expression;
pub use axobase_genetics as genetics;
pub use axobase_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use axobase::prelude::*;
/// ```
pub mod prelude {
    // Core model
    pub use axobase_core::chromosome::{Chromosome, ChromosomeId};
    pub use axobase_core::config::{
        BalanceThresholds, CacheConfig, CycleConfig, DecisionConfig, ExpressionConfig,
        MutationRates,
    };
    pub use axobase_core::environment::{EnvironmentalState, OperationMode};
    pub use axobase_core::epigenome::{Epigenome, EpigeneticMark, Modification};
    pub use axobase_core::error::{AxobaseError, ExpressionWarning, Result};
    pub use axobase_core::gene::{ExpressionState, Gene, GeneDomain, GeneId, GeneOrigin};
    pub use axobase_core::genome::{DynamicGenome, GenomeMetadata, LineageId};
    pub use axobase_core::regulatory::{RegulatoryEdge, RegulatoryLogic, RegulatoryRelation};
    pub use axobase_core::serialize::{from_json, to_json, GenomeRecord, RECORD_VERSION};

    // Ports and mocks
    pub use axobase_core::mock::{
        FixedClock, MockLedger, MockLlm, MockMessaging, MockStorage, MockWallet,
    };
    pub use axobase_core::ports::{
        AgentId, AgentPorts, Balances, ChaChaEntropy, Clock, EntropySource, LanguageModel,
        Ledger, Messaging, PermanentStorage, SystemClock, ThinkOptions, Wallet,
    };

    // Expression
    pub use axobase_expression::{
        ExpressOptions, ExpressedGene, ExpressedGenome, ExpressionCache, ExpressionEngine,
        ExpressionResult, ExpressionStats, InvalidateFilter,
    };

    // Genetics
    pub use axobase_genetics::adaptive::{
        calculate_adaptive_rates, AdaptiveRates, PopulationMetrics,
    };
    pub use axobase_genetics::epigenetics::{default_triggers, update_epigenome};
    pub use axobase_genetics::genesis::genesis_genome;
    pub use axobase_genetics::hgt::{horizontal_transfer, CooperationRecord};
    pub use axobase_genetics::pipeline::{
        jaccard_similarity, BreedingContext, BreedingEngine, BreedingResult,
    };

    // Decision
    pub use axobase_decision::{
        catalogue, ActionType, Decision, DecisionEngine, MemoryEvent, Opportunity, Perception,
        Strategy, StrategyCategory, StrategyFilter, TimeHorizon,
    };

    // Runtime
    pub use axobase_runtime::{
        derive_mode, ActionExecutor, AgentState, AgentStatus, EvolutionCoordinator,
        MemoryStore, SurvivalConfig, SurvivalHandle, SurvivalLoop,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
