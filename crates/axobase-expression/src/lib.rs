//! # Axobase Expression
//!
//! Turns a dynamic genome plus an environmental snapshot into numeric
//! trait values and a metabolic cost. The pipeline, per call:
//!
//! 1. resolve conditional genes against the environment
//! 2. apply developmental stage modifiers and critical windows
//! 3. compute base expression (`value · weight · developmental`)
//! 4. iterate the regulatory network to a fixed point
//! 5. apply decayed epigenetic marks
//! 6. compose and clamp to `[0, 3]`
//! 7. apply optional epistatic interactions
//! 8. sum the metabolic cost
//!
//! Expression is a pure function of `(genome, environment, age, wall clock)`
//! — no randomness, no ambient time — so results are memoizable. The
//! [`cache`] module provides the LRU memo keyed by a coarse environment
//! digest.

pub mod cache;
pub mod condition;
pub mod development;
pub mod engine;
pub mod epistasis;
pub mod regulation;

pub use cache::{CacheStats, ExpressionCache, InvalidateFilter};
pub use condition::Condition;
pub use development::DevelopmentalStage;
pub use engine::{
    ExpressOptions, ExpressedGene, ExpressedGenome, ExpressionEngine, ExpressionResult,
    ExpressionStats,
};
pub use epistasis::{EpistaticInteraction, EpistaticRelationship};
