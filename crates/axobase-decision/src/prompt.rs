//! Prompt construction and response parsing for the decision engine.
//!
//! The model is asked to choose among pre-filtered candidates and reply
//! in a canonical block:
//!
//! ```text
//! STRATEGY_ID: <id>
//! ACTION: <action word>
//! CONFIDENCE: <0..1>
//! REASONING: <free text>
//! RISK_ASSESSMENT: <free text>
//! ```

use crate::filter::EvaluatedStrategy;
use crate::perception::Perception;
use std::fmt::Write;

/// Build the structured decision prompt.
pub fn build_decision_prompt(perception: &Perception, candidates: &[EvaluatedStrategy]) -> String {
    let mut p = String::with_capacity(2048);

    writeln!(p, "You are an autonomous agent managing your own resources on a public ledger.").ok();
    writeln!(p, "Choose exactly one of the candidate strategies below.\n").ok();

    writeln!(p, "## Your strongest expressed traits").ok();
    for (name, value) in perception.expressed.top_traits(10) {
        writeln!(p, "- {name}: {value:.2}").ok();
    }

    let env = &perception.env;
    writeln!(p, "\n## Current state").ok();
    writeln!(p, "- balance: {:.2} stable units", env.balance).ok();
    writeln!(p, "- mode: {}", env.mode).ok();
    writeln!(p, "- days starving: {:.1}", env.days_starving).ok();
    writeln!(p, "- days thriving: {:.1}", env.days_thriving).ok();
    writeln!(p, "- stress: {:.2}", env.stress_level).ok();
    writeln!(p, "- recent deceptions: {:.1}", env.recent_deceptions).ok();
    writeln!(p, "- daily metabolic cost: {:.4}", perception.daily_metabolic_cost).ok();
    writeln!(p, "- runway: {:.1} days", perception.runway_days()).ok();

    writeln!(p, "\n## Candidate strategies").ok();
    for c in candidates {
        writeln!(
            p,
            "- {} ({}): genome match {:.2}, est. success {:.2}, risk {:.2}, complexity {:.2}, payoff {:+.1}",
            c.strategy.id,
            c.strategy.name,
            c.genome_match,
            c.estimated_success,
            c.strategy.risk,
            c.strategy.complexity,
            c.strategy.typical_payoff,
        )
        .ok();
    }

    if !perception.opportunities.is_empty() {
        writeln!(p, "\n## Opportunities").ok();
        for o in perception.opportunities.iter().take(3) {
            writeln!(p, "- {} (est. {:+.1})", o.description, o.estimated_value).ok();
        }
    }

    if !perception.recent_events.is_empty() {
        writeln!(p, "\n## Recent memory").ok();
        for e in perception.recent_events.iter().take(5) {
            let outcome = match e.success {
                Some(true) => " [ok]",
                Some(false) => " [failed]",
                None => "",
            };
            writeln!(p, "- {}{outcome}", e.summary).ok();
        }
    }

    writeln!(
        p,
        "\nReply with exactly this block and nothing else:\n\
         STRATEGY_ID: <one candidate id>\n\
         ACTION: <the action you intend>\n\
         CONFIDENCE: <number between 0 and 1>\n\
         REASONING: <one or two sentences>\n\
         RISK_ASSESSMENT: <one sentence>"
    )
    .ok();
    p
}

/// A parsed canonical block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDecision {
    pub strategy_id: String,
    pub confidence: f64,
    pub reasoning: String,
    pub risk_assessment: String,
}

/// Parse the model's reply. Tolerant of surrounding prose; returns `None`
/// when no strategy id can be found.
pub fn parse_decision_response(text: &str) -> Option<ParsedDecision> {
    let field = |tag: &str| -> Option<String> {
        text.lines().find_map(|line| {
            let line = line.trim().trim_start_matches(['*', '-', ' ']);
            line.strip_prefix(tag)
                .map(|rest| rest.trim_start_matches(':').trim().to_string())
        })
    };

    let strategy_id = field("STRATEGY_ID")?;
    if strategy_id.is_empty() {
        return None;
    }
    let confidence = field("CONFIDENCE")
        .and_then(|c| c.parse::<f64>().ok())
        .map(|c| c.clamp(0.0, 1.0))
        .unwrap_or(0.6);
    Some(ParsedDecision {
        strategy_id,
        confidence,
        reasoning: field("REASONING").unwrap_or_default(),
        risk_assessment: field("RISK_ASSESSMENT").unwrap_or_default(),
    })
}
