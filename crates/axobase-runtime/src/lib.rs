//! # Axobase Runtime
//!
//! The living agent. Each agent runs one cooperative survival loop that,
//! every cycle: queries balances, derives its operating mode, expresses
//! its genome through the cache, updates its epigenome, builds a
//! perception, decides, executes, and updates its environment counters.
//! Balances below the hibernation threshold for a full cycle kill the
//! agent.
//!
//! Reproduction flows through the [`coordinator::EvolutionCoordinator`]:
//! genome-aware mate signalling, partner evaluation, proposal
//! negotiation, the inbreeding gate, and the breeding pipeline.
//!
//! Agents share nothing mutable; all cross-agent traffic goes through
//! ports, and every await point in the loop is an explicit suspension.

pub mod agent;
pub mod coordinator;
pub mod executor;
pub mod memory;
pub mod perception;
pub mod survival;
pub mod vitals;

pub use agent::{AgentState, AgentStatus};
pub use coordinator::{EvolutionCoordinator, MateDecision, MateEvaluation, MatingSignal};
pub use executor::{ActionExecutor, ActionOutcome};
pub use memory::MemoryStore;
pub use survival::{CycleReport, SurvivalConfig, SurvivalHandle, SurvivalLoop, SurvivalStats};
pub use vitals::{derive_mode, EnvironmentTracker};
