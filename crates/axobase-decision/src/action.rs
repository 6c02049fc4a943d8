//! Concrete action types and their expected costs.

use serde::{Deserialize, Serialize};

/// Everything an agent can actually do in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    EnterDormancy,
    ThinkLocal,
    ThinkPremium,
    Swap,
    Stake,
    HireHuman,
    Broadcast,
    SendMessage,
    ProposeMating,
    AcceptMating,
    StoreMemory,
    Inscribe,
    Fetch,
    Post,
    Scrape,
    Transfer,
    Migrate,
    ProvideLiquidity,
    ClaimRewards,
    EvaluateHuman,
    ExitDormancy,
}

impl ActionType {
    /// Expected cost in stable units, the fixed table attached to every
    /// decision.
    pub fn expected_cost(&self) -> f64 {
        match self {
            ActionType::EnterDormancy => 0.0,
            ActionType::ThinkLocal => 0.01,
            ActionType::ThinkPremium => 0.25,
            ActionType::Swap => 0.05,
            ActionType::Stake => 0.05,
            ActionType::HireHuman => 5.0,
            ActionType::Broadcast => 0.01,
            ActionType::SendMessage => 0.01,
            ActionType::ProposeMating => 0.1,
            ActionType::AcceptMating => 0.1,
            ActionType::StoreMemory => 0.005,
            ActionType::Inscribe => 0.2,
            ActionType::Fetch => 0.02,
            ActionType::Post => 0.02,
            ActionType::Scrape => 0.03,
            ActionType::Transfer => 0.05,
            ActionType::Migrate => 1.0,
            ActionType::ProvideLiquidity => 0.1,
            ActionType::ClaimRewards => 0.05,
            ActionType::EvaluateHuman => 0.02,
            ActionType::ExitDormancy => 0.0,
        }
    }

    /// Kebab-case wire name, as used in prompts and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::EnterDormancy => "enter-dormancy",
            ActionType::ThinkLocal => "think-local",
            ActionType::ThinkPremium => "think-premium",
            ActionType::Swap => "swap",
            ActionType::Stake => "stake",
            ActionType::HireHuman => "hire-human",
            ActionType::Broadcast => "broadcast",
            ActionType::SendMessage => "send-message",
            ActionType::ProposeMating => "propose-mating",
            ActionType::AcceptMating => "accept-mating",
            ActionType::StoreMemory => "store-memory",
            ActionType::Inscribe => "inscribe",
            ActionType::Fetch => "fetch",
            ActionType::Post => "post",
            ActionType::Scrape => "scrape",
            ActionType::Transfer => "transfer",
            ActionType::Migrate => "migrate",
            ActionType::ProvideLiquidity => "provide-liquidity",
            ActionType::ClaimRewards => "claim-rewards",
            ActionType::EvaluateHuman => "evaluate-human",
            ActionType::ExitDormancy => "exit-dormancy",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
