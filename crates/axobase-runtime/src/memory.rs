//! Agent memory — recent events, daily accumulators, and per-strategy
//! experience.

use axobase_decision::MemoryEvent;
use std::collections::{HashMap, VecDeque};

/// How many recent events are retained.
const EVENT_CAPACITY: usize = 100;
/// Experience bonus per net success, and its clamp band.
const EXPERIENCE_STEP: f64 = 0.02;
const EXPERIENCE_BAND: f64 = 0.1;

/// In-memory store of what the agent has recently lived through.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: VecDeque<MemoryEvent>,
    thoughts: Vec<String>,
    transactions: Vec<String>,
    /// Per-strategy `(successes, failures)`.
    outcomes: HashMap<String, (u32, u32)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, summary: impl Into<String>, success: Option<bool>) {
        if self.events.len() >= EVENT_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(MemoryEvent {
            summary: summary.into(),
            success,
        });
    }

    /// The `n` most recent events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<MemoryEvent> {
        self.events.iter().rev().take(n).rev().cloned().collect()
    }

    pub fn note_thought(&mut self, thought: impl Into<String>) {
        self.thoughts.push(thought.into());
    }

    pub fn note_transaction(&mut self, tx: impl Into<String>) {
        self.transactions.push(tx.into());
    }

    /// The accumulated daily payload, left in place until
    /// [`MemoryStore::clear_daily`] confirms a successful inscription.
    pub fn daily_payload(&self) -> (&[String], &[String]) {
        (&self.thoughts, &self.transactions)
    }

    pub fn clear_daily(&mut self) {
        self.thoughts.clear();
        self.transactions.clear();
    }

    pub fn record_outcome(&mut self, strategy_id: &str, success: bool) {
        let entry = self.outcomes.entry(strategy_id.to_string()).or_insert((0, 0));
        if success {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    /// Experience bonus for one strategy: 0.02 per net success, clamped
    /// to ±0.1.
    pub fn experience_bonus(&self, strategy_id: &str) -> f64 {
        match self.outcomes.get(strategy_id) {
            None => 0.0,
            Some((s, f)) => ((*s as f64 - *f as f64) * EXPERIENCE_STEP)
                .clamp(-EXPERIENCE_BAND, EXPERIENCE_BAND),
        }
    }

    pub fn experience_map(&self) -> HashMap<String, f64> {
        self.outcomes
            .keys()
            .map(|id| (id.clone(), self.experience_bonus(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_returns_newest_last() {
        let mut memory = MemoryStore::new();
        for i in 0..5 {
            memory.record_event(format!("event {i}"), None);
        }
        let recent = memory.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].summary, "event 2");
        assert_eq!(recent[2].summary, "event 4");
    }

    #[test]
    fn events_are_capped() {
        let mut memory = MemoryStore::new();
        for i in 0..250 {
            memory.record_event(format!("event {i}"), None);
        }
        assert_eq!(memory.recent(1000).len(), EVENT_CAPACITY);
    }

    #[test]
    fn daily_payload_survives_until_cleared() {
        let mut memory = MemoryStore::new();
        memory.note_thought("pondered liquidity");
        memory.note_transaction("tx-1");
        assert_eq!(memory.daily_payload().0.len(), 1);
        assert_eq!(memory.daily_payload().1.len(), 1);
        memory.clear_daily();
        assert!(memory.daily_payload().0.is_empty());
    }

    #[test]
    fn experience_rewards_net_success() {
        let mut memory = MemoryStore::new();
        for _ in 0..3 {
            memory.record_outcome("data-analysis-gig", true);
        }
        memory.record_outcome("data-analysis-gig", false);
        assert!((memory.experience_bonus("data-analysis-gig") - 0.04).abs() < 1e-12);

        for _ in 0..20 {
            memory.record_outcome("provide-liquidity", false);
        }
        assert_eq!(memory.experience_bonus("provide-liquidity"), -0.1);
        assert_eq!(memory.experience_bonus("never-tried"), 0.0);
    }
}
