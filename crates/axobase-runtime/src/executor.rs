//! Action executor — dispatch a decision through the ports.
//!
//! Only a few actions touch real ports (messaging, thinking, storage);
//! the ledger-heavy actions (swaps, staking, transfers) are acknowledged
//! and handed to the surrounding system, which owns transaction signing.
//! Messaging failures are swallowed; every outcome is reported back for
//! the memory log.

use crate::agent::AgentState;
use axobase_core::ports::{AgentId, AgentPorts, ThinkOptions};
use axobase_decision::{ActionType, Decision};
use serde::Serialize;
use tracing::{debug, warn};

/// What happened when an action was dispatched.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub action: ActionType,
    pub success: bool,
    pub detail: String,
    /// A thought worth keeping for the daily inscription, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
}

impl ActionOutcome {
    fn ok(action: ActionType, detail: impl Into<String>) -> Self {
        Self {
            action,
            success: true,
            detail: detail.into(),
            thought: None,
        }
    }

    fn failed(action: ActionType, detail: impl Into<String>) -> Self {
        Self {
            action,
            success: false,
            detail: detail.into(),
            thought: None,
        }
    }
}

/// Dispatches decided actions through the agent's ports.
pub struct ActionExecutor {
    ports: AgentPorts,
    /// Peers known well enough to message directly.
    known_peers: Vec<AgentId>,
}

impl ActionExecutor {
    pub fn new(ports: AgentPorts) -> Self {
        Self {
            ports,
            known_peers: Vec::new(),
        }
    }

    pub fn add_peer(&mut self, peer: AgentId) {
        if !self.known_peers.contains(&peer) {
            self.known_peers.push(peer);
        }
    }

    pub async fn execute(&self, agent: &AgentState, decision: &Decision) -> ActionOutcome {
        let action = decision.selected_action;
        match action {
            ActionType::Broadcast => {
                let message = format!(
                    "[{}] strategy={} reasoning={}",
                    agent.id, decision.selected_strategy, decision.reasoning
                );
                match self.ports.messaging.broadcast(&message).await {
                    Ok(()) => ActionOutcome::ok(action, "broadcast sent"),
                    Err(e) => {
                        // Best-effort port: swallow and report.
                        warn!(error = %e, "broadcast failed");
                        ActionOutcome::failed(action, format!("broadcast failed: {e}"))
                    }
                }
            }
            ActionType::SendMessage => match self.known_peers.first() {
                None => ActionOutcome::failed(action, "no known peers"),
                Some(peer) => {
                    let message = format!(
                        "[{}] proposes {}",
                        agent.id, decision.selected_strategy
                    );
                    match self.ports.messaging.send_message(peer, &message).await {
                        Ok(()) => {
                            let _ = self.ports.messaging.record_cooperation(peer, 1).await;
                            ActionOutcome::ok(action, format!("messaged {peer}"))
                        }
                        Err(e) => {
                            warn!(error = %e, peer = %peer, "direct message failed");
                            ActionOutcome::failed(action, format!("message failed: {e}"))
                        }
                    }
                }
            },
            ActionType::ThinkLocal | ActionType::ThinkPremium => {
                let options = if action == ActionType::ThinkPremium {
                    ThinkOptions {
                        temperature: 0.7,
                        max_tokens: 2000,
                    }
                } else {
                    ThinkOptions {
                        temperature: 0.3,
                        max_tokens: 500,
                    }
                };
                let prompt = format!(
                    "Reflect briefly on the strategy '{}': {}",
                    decision.selected_strategy, decision.reasoning
                );
                match self.ports.llm.think(&prompt, &options).await {
                    Ok(text) => {
                        let mut outcome = ActionOutcome::ok(action, "deliberation complete");
                        outcome.thought = Some(text);
                        outcome
                    }
                    Err(e) => {
                        warn!(error = %e, "reflection failed");
                        ActionOutcome::failed(action, format!("thinking failed: {e}"))
                    }
                }
            }
            ActionType::Inscribe => {
                match self
                    .ports
                    .storage
                    .daily_inscribe(
                        &agent.genome.metadata.genome_hash,
                        &[],
                        &[],
                        &format!("manual inscription at cycle {}", agent.cycle),
                    )
                    .await
                {
                    Ok(record) => ActionOutcome::ok(action, format!("inscribed as {record}")),
                    Err(e) => ActionOutcome::failed(action, format!("inscription failed: {e}")),
                }
            }
            ActionType::EnterDormancy
            | ActionType::ExitDormancy
            | ActionType::StoreMemory => {
                debug!(action = %action, "internal action");
                ActionOutcome::ok(action, "internal state change")
            }
            // Ledger-touching actions are executed by the surrounding
            // system, which owns transaction signing.
            other => {
                debug!(action = %other, "delegated to external action surface");
                ActionOutcome::ok(other, "delegated to external action surface")
            }
        }
    }
}
