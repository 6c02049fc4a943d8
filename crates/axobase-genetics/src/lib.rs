//! # Axobase Genetics
//!
//! Heritable variation for Axobase agents. This crate holds:
//!
//! - the **genesis gene pool** — the fixed 8-chromosome / 63-gene seed
//!   every lineage starts from
//! - the **breeding pipeline** — crossover, point mutation, duplication,
//!   deletion, de-novo birth, regulatory recombination, structural
//!   variation, and gene conversion, run in that order
//! - **horizontal gene transfer** between live, cooperating agents
//! - the **epigenetic layer** — environmental triggers, mark decay, and
//!   inheritance at breeding
//! - the **adaptive-rate controller** — population diversity, stagnation,
//!   and stress feed back into operator rates
//!
//! Every probabilistic operator draws from one injected
//! [`axobase_core::ports::EntropySource`], so a seeded generator makes
//! breeding bit-reproducible.

pub mod adaptive;
pub mod epigenetics;
pub mod genesis;
pub mod hgt;
pub mod operators;
pub mod pipeline;
pub mod sampling;

pub use adaptive::{calculate_adaptive_rates, AdaptiveRates, PopulationMetrics};
pub use epigenetics::{default_triggers, inherit_marks, update_epigenome, EpigenomeUpdate};
pub use genesis::genesis_genome;
pub use hgt::{horizontal_transfer, CooperationRecord};
pub use pipeline::{jaccard_similarity, BreedingContext, BreedingEngine, BreedingResult};
