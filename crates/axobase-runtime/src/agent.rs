//! Agent state — identity, genome, and lifecycle status.

use axobase_core::genome::DynamicGenome;
use axobase_core::ports::AgentId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentStatus {
    Alive,
    Dead,
}

/// Everything an agent exclusively owns.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub id: AgentId,
    /// Wallet address handed to the wallet port.
    pub address: String,
    pub genome: DynamicGenome,
    pub status: AgentStatus,
    /// Completed survival cycles.
    pub cycle: u64,
    pub born_wall_ms: u64,
}

impl AgentState {
    pub fn new(id: AgentId, address: impl Into<String>, genome: DynamicGenome, born_wall_ms: u64) -> Self {
        Self {
            id,
            address: address.into(),
            genome,
            status: AgentStatus::Alive,
            cycle: 0,
            born_wall_ms,
        }
    }

    /// Age in days at the given wall clock.
    pub fn age_days(&self, wall_ms: u64) -> f64 {
        wall_ms.saturating_sub(self.born_wall_ms) as f64 / 86_400_000.0
    }

    pub fn is_alive(&self) -> bool {
        self.status == AgentStatus::Alive
    }
}
