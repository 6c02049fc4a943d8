//! # Axobase Core
//!
//! Core data model and shared types for the Axobase Evolutionary Genome &
//! Decision Engine. Agents in Axobase carry a variable-length dynamic genome:
//!
//! - **Genes** — named numeric traits with provenance and expression control
//! - **Chromosomes** — ordered gene sequences grouped by functional area
//! - **Regulatory edges** — a directed multigraph shaping expression
//! - **Epigenetic marks** — decaying, partially heritable modifiers driven
//!   by the environment
//!
//! This crate defines the model, its invariants, the 256-bit genome hash,
//! the versioned serialization format, and the *ports* — narrow capability
//! traits through which the core reaches the surrounding system (wallet,
//! language model, permanent storage, messaging, ledger, clock, entropy).
//!
//! Everything algorithmic lives in sibling crates: expression in
//! `axobase-expression`, breeding in `axobase-genetics`, strategy selection
//! in `axobase-decision`, and the per-agent survival loop in
//! `axobase-runtime`.
//!
//! ## Quick Start
//!
//! ```rust
//! use axobase_core::prelude::*;
//!
//! let gene = Gene::new("risk_appetite", "Risk appetite", GeneDomain::RiskAssessment);
//! assert_eq!(gene.expression_state, ExpressionState::Active);
//! ```

pub mod chromosome;
pub mod config;
pub mod environment;
pub mod epigenome;
pub mod error;
pub mod gene;
pub mod genome;
pub mod mock;
pub mod ports;
pub mod prelude;
pub mod regulatory;
pub mod serialize;
