//! Regulatory edges — a directed multigraph over the gene id space.
//!
//! Each edge shapes the expression of its target gene from the current
//! value of its source. Plain edges combine additively or multiplicatively;
//! enhanced edges carry a logic tag (threshold with Hill kinetics,
//! AND/OR/NAND gating, or a wall-clock oscillator). Self-loops are
//! permitted; duplicate source/target pairs are permitted.

use crate::gene::GeneId;
use serde::{Deserialize, Serialize};

/// The direction of influence an edge exerts on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegulatoryRelation {
    Activation,
    Inhibition,
}

/// How an edge's contribution is combined at the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegulatoryLogic {
    Additive,
    Multiplicative,
    /// Sigmoidal response via Hill kinetics; uses `threshold` and
    /// `cooperativity`.
    Threshold,
    /// Contributes only when every activator source exceeds 0.3.
    And,
    /// Contributes the maximum activator input.
    Or,
    /// Zero when every activator source exceeds 0.3, else the maximum
    /// dampened by half.
    Nand,
    /// Sinusoidal modulation from the wall clock; uses `period` and `phase`.
    Oscillator,
}

/// Default Hill exponent for threshold edges.
pub const DEFAULT_COOPERATIVITY: f64 = 2.0;
/// Default activation threshold for threshold edges.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// A directed regulatory link between two genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryEdge {
    pub source: GeneId,
    pub target: GeneId,
    pub relation: RegulatoryRelation,
    /// Influence strength. Range `[0, 1]`.
    pub strength: f64,
    pub logic: RegulatoryLogic,
    /// Hill threshold for [`RegulatoryLogic::Threshold`] edges.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub threshold: Option<f64>,
    /// Hill exponent for [`RegulatoryLogic::Threshold`] edges (default 2).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cooperativity: Option<f64>,
    /// Phase offset in radians for oscillator edges.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phase: Option<f64>,
    /// Oscillation period in wall-clock milliseconds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub period: Option<f64>,
}

impl RegulatoryEdge {
    /// Plain additive edge.
    pub fn new(
        source: impl Into<GeneId>,
        target: impl Into<GeneId>,
        relation: RegulatoryRelation,
        strength: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation,
            strength: strength.clamp(0.0, 1.0),
            logic: RegulatoryLogic::Additive,
            threshold: None,
            cooperativity: None,
            phase: None,
            period: None,
        }
    }

    pub fn with_logic(mut self, logic: RegulatoryLogic) -> Self {
        self.logic = logic;
        self
    }

    pub fn with_threshold(mut self, threshold: f64, cooperativity: f64) -> Self {
        self.logic = RegulatoryLogic::Threshold;
        self.threshold = Some(threshold);
        self.cooperativity = Some(cooperativity);
        self
    }

    pub fn with_oscillation(mut self, period_ms: f64, phase: f64) -> Self {
        self.logic = RegulatoryLogic::Oscillator;
        self.period = Some(period_ms);
        self.phase = Some(phase);
        self
    }

    pub fn set_strength(&mut self, strength: f64) {
        self.strength = strength.clamp(0.0, 1.0);
    }

    /// The `"source->target"` string this edge contributes to the genome hash.
    pub fn hash_token(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }
}
