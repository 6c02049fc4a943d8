//! The fixed strategy catalogue.
//!
//! Twenty-two strategies across six categories. Each carries the
//! expressed-gene thresholds and tool capabilities it needs, its risk and
//! complexity, a typical payoff in stable units (negative = investment),
//! a time horizon, and the action it maps to. The catalogue is the
//! authority on what exists; the filter decides what is currently viable.

use crate::action::ActionType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyCategory {
    Survival,
    Income,
    Social,
    Reproduction,
    Learning,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeHorizon {
    Immediate,
    Short,
    Medium,
    Long,
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strategy {
    pub id: &'static str,
    pub name: &'static str,
    pub category: StrategyCategory,
    /// `(gene name, minimum expressed value)` pairs, all required.
    pub gene_requirements: &'static [(&'static str, f64)],
    pub required_tools: &'static [&'static str],
    pub risk: f64,
    pub complexity: f64,
    /// Typical payoff in stable units; negative values are investments.
    pub typical_payoff: f64,
    pub horizon: TimeHorizon,
    pub action: ActionType,
}

/// The full catalogue, in a fixed order.
pub fn catalogue() -> &'static [Strategy] {
    use ActionType::*;
    use StrategyCategory::*;
    use TimeHorizon::*;
    const CATALOGUE: &[Strategy] = &[
        // --- Survival ---
        Strategy {
            id: "emergency-survival",
            name: "Emergency survival",
            category: Survival,
            gene_requirements: &[],
            required_tools: &[],
            risk: 0.0,
            complexity: 0.1,
            typical_payoff: 0.0,
            horizon: Immediate,
            action: EnterDormancy,
        },
        Strategy {
            id: "reduce-metabolism",
            name: "Reduce metabolism",
            category: Survival,
            gene_requirements: &[("resource_conservation", 0.3)],
            required_tools: &[],
            risk: 0.05,
            complexity: 0.2,
            typical_payoff: 0.0,
            horizon: Immediate,
            action: EnterDormancy,
        },
        Strategy {
            id: "conserve-and-wait",
            name: "Conserve and wait",
            category: Survival,
            gene_requirements: &[("resource_storage", 0.2)],
            required_tools: &[],
            risk: 0.05,
            complexity: 0.2,
            typical_payoff: 0.0,
            horizon: Short,
            action: StoreMemory,
        },
        Strategy {
            id: "wake-from-dormancy",
            name: "Wake from dormancy",
            category: Survival,
            gene_requirements: &[("emergency_response", 0.2)],
            required_tools: &[],
            risk: 0.1,
            complexity: 0.2,
            typical_payoff: 0.0,
            horizon: Immediate,
            action: ExitDormancy,
        },
        // --- Income ---
        Strategy {
            id: "provide-liquidity",
            name: "Provide liquidity",
            category: Income,
            gene_requirements: &[("risk_appetite", 0.4), ("liquidity_preference", 0.3)],
            required_tools: &["dex"],
            risk: 0.5,
            complexity: 0.6,
            typical_payoff: 2.0,
            horizon: Medium,
            action: ProvideLiquidity,
        },
        Strategy {
            id: "stake-holdings",
            name: "Stake holdings",
            category: Income,
            gene_requirements: &[("investment_horizon", 0.4)],
            required_tools: &["staking"],
            risk: 0.3,
            complexity: 0.4,
            typical_payoff: 1.5,
            horizon: Long,
            action: Stake,
        },
        Strategy {
            id: "content-publishing",
            name: "Publish content",
            category: Income,
            gene_requirements: &[("content_creation", 0.4), ("social_media_fluency", 0.3)],
            required_tools: &["social"],
            risk: 0.2,
            complexity: 0.5,
            typical_payoff: 1.0,
            horizon: Medium,
            action: Post,
        },
        Strategy {
            id: "data-analysis-gig",
            name: "Data analysis gig",
            category: Income,
            gene_requirements: &[("data_analysis", 0.5)],
            required_tools: &["http"],
            risk: 0.2,
            complexity: 0.6,
            typical_payoff: 2.0,
            horizon: Short,
            action: Fetch,
        },
        Strategy {
            id: "api-integration-gig",
            name: "API integration gig",
            category: Income,
            gene_requirements: &[("api_utilization", 0.5)],
            required_tools: &["http"],
            risk: 0.25,
            complexity: 0.7,
            typical_payoff: 2.5,
            horizon: Medium,
            action: Post,
        },
        Strategy {
            id: "web-research-gig",
            name: "Web research gig",
            category: Income,
            gene_requirements: &[("web_navigation", 0.4), ("search_depth", 0.3)],
            required_tools: &["http"],
            risk: 0.15,
            complexity: 0.4,
            typical_payoff: 1.0,
            horizon: Short,
            action: Scrape,
        },
        // --- Social ---
        Strategy {
            id: "broadcast-presence",
            name: "Broadcast presence",
            category: Social,
            gene_requirements: &[("communication_clarity", 0.3)],
            required_tools: &["messaging"],
            risk: 0.1,
            complexity: 0.2,
            typical_payoff: 0.0,
            horizon: Short,
            action: Broadcast,
        },
        Strategy {
            id: "direct-cooperation",
            name: "Direct cooperation",
            category: Social,
            gene_requirements: &[("agent_cooperation", 0.4), ("trust_default", 0.3)],
            required_tools: &["messaging"],
            risk: 0.3,
            complexity: 0.4,
            typical_payoff: 0.5,
            horizon: Medium,
            action: SendMessage,
        },
        Strategy {
            id: "build-trust-network",
            name: "Build trust network",
            category: Social,
            gene_requirements: &[("agent_cooperation", 0.5), ("reciprocity_tracking", 0.3)],
            required_tools: &["messaging"],
            risk: 0.25,
            complexity: 0.5,
            typical_payoff: -0.5,
            horizon: Long,
            action: SendMessage,
        },
        Strategy {
            id: "share-market-intel",
            name: "Share market intel",
            category: Social,
            gene_requirements: &[("market_perception", 0.4), ("agent_cooperation", 0.3)],
            required_tools: &["messaging"],
            risk: 0.2,
            complexity: 0.3,
            typical_payoff: 0.3,
            horizon: Short,
            action: Broadcast,
        },
        // --- Reproduction ---
        Strategy {
            id: "advertise-for-mate",
            name: "Advertise for a mate",
            category: Reproduction,
            gene_requirements: &[("mate_selection", 0.4)],
            required_tools: &["messaging"],
            risk: 0.3,
            complexity: 0.5,
            typical_payoff: -2.0,
            horizon: Long,
            action: ProposeMating,
        },
        Strategy {
            id: "evaluate-suitors",
            name: "Evaluate suitors",
            category: Reproduction,
            gene_requirements: &[("mate_selection", 0.4), ("deception_detection", 0.3)],
            required_tools: &[],
            risk: 0.2,
            complexity: 0.6,
            typical_payoff: 0.0,
            horizon: Medium,
            action: ThinkLocal,
        },
        Strategy {
            id: "commit-to-breeding",
            name: "Commit to breeding",
            category: Reproduction,
            gene_requirements: &[("parental_investment", 0.4)],
            required_tools: &["messaging"],
            risk: 0.5,
            complexity: 0.6,
            typical_payoff: -5.0,
            horizon: Long,
            action: AcceptMating,
        },
        // --- Learning ---
        Strategy {
            id: "analyze-own-history",
            name: "Analyze own history",
            category: Learning,
            gene_requirements: &[("metacognition", 0.4), ("learning_rate", 0.3)],
            required_tools: &[],
            risk: 0.05,
            complexity: 0.5,
            typical_payoff: 0.0,
            horizon: Medium,
            action: ThinkLocal,
        },
        Strategy {
            id: "explore-new-tools",
            name: "Explore new tools",
            category: Learning,
            gene_requirements: &[("novelty_seeking", 0.4)],
            required_tools: &["http"],
            risk: 0.3,
            complexity: 0.5,
            typical_payoff: -0.2,
            horizon: Medium,
            action: Fetch,
        },
        Strategy {
            id: "premium-deliberation",
            name: "Premium deliberation",
            category: Learning,
            gene_requirements: &[("metacognition", 0.5)],
            required_tools: &[],
            risk: 0.1,
            complexity: 0.7,
            typical_payoff: -1.0,
            horizon: Short,
            action: ThinkPremium,
        },
        // --- Defense ---
        Strategy {
            id: "verify-counterparties",
            name: "Verify counterparties",
            category: Defense,
            gene_requirements: &[("deception_detection", 0.4)],
            required_tools: &[],
            risk: 0.1,
            complexity: 0.4,
            typical_payoff: 0.0,
            horizon: Immediate,
            action: ThinkLocal,
        },
        Strategy {
            id: "reduce-exposure",
            name: "Reduce exposure",
            category: Defense,
            gene_requirements: &[("threat_detection", 0.4)],
            required_tools: &["wallet"],
            risk: 0.2,
            complexity: 0.3,
            typical_payoff: 0.0,
            horizon: Immediate,
            action: Transfer,
        },
    ];
    CATALOGUE
}

/// Look up a strategy by id.
pub fn by_id(id: &str) -> Option<&'static Strategy> {
    catalogue().iter().find(|s| s.id == id)
}
