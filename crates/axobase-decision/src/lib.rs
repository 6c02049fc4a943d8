//! # Axobase Decision
//!
//! From expressed traits to one concrete action. The flow:
//!
//! 1. the **strategy catalogue** — a fixed set of 22 strategies across
//!    survival, income, social, reproduction, learning, and defense
//! 2. the **filter** — gene-gated, tool-gated, resource-gated pruning of
//!    the catalogue against the agent's expressed genome and environment,
//!    with priority scoring of the survivors
//! 3. the **decision engine** — a structured prompt over the candidates,
//!    one bounded language-model call, a canonical-block parse, and a
//!    deterministic fallback when the model is slow, wrong, or down
//!
//! The language model only ever chooses among strategies the filter has
//! already approved; it cannot invent actions.

pub mod action;
pub mod engine;
pub mod filter;
pub mod perception;
pub mod prompt;
pub mod strategy;

pub use action::ActionType;
pub use engine::{Decision, DecisionEngine};
pub use filter::{EvaluatedStrategy, FilterResult, StrategyFilter, ToleranceProfile};
pub use perception::{MemoryEvent, Opportunity, Perception};
pub use strategy::{catalogue, Strategy, StrategyCategory, TimeHorizon};
