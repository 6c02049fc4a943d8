//! Epigenetic marks — decaying, partially heritable expression modifiers.
//!
//! Marks are created by environmental triggers, decay geometrically per
//! generation, and inherit to offspring with probability equal to their
//! heritability. At most one mark exists per gene; newer marks overwrite
//! older ones.

use crate::gene::GeneId;
use serde::{Deserialize, Serialize};

/// The kind of expression change a mark applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modification {
    Upregulate,
    Downregulate,
    Silence,
    Activate,
}

/// A single epigenetic mark on one gene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpigeneticMark {
    pub target: GeneId,
    pub modification: Modification,
    /// Initial strength. Range `[0, 1]`.
    pub strength: f64,
    /// Symbolic cause, e.g. the trigger id that created the mark.
    pub cause: String,
    /// Probability of inheriting to offspring. Range `[0, 1]`.
    pub heritability: f64,
    /// Per-generation geometric decay rate. Range `[0, 1]`.
    pub decay: f64,
    pub generation_created: u32,
}

impl EpigeneticMark {
    /// Strength after geometric decay: `s · (1 − decay)^(gen − created)`.
    pub fn decayed_strength(&self, current_generation: u32) -> f64 {
        let elapsed = current_generation.saturating_sub(self.generation_created);
        self.strength * (1.0 - self.decay).powi(elapsed as i32)
    }
}

/// The full set of marks on a genome. Maintains the one-mark-per-gene
/// invariant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Epigenome {
    pub marks: Vec<EpigeneticMark>,
}

impl Epigenome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn mark_for(&self, gene: &GeneId) -> Option<&EpigeneticMark> {
        self.marks.iter().find(|m| &m.target == gene)
    }

    /// Insert a mark, overwriting any existing mark on the same gene.
    pub fn set_mark(&mut self, mark: EpigeneticMark) {
        self.marks.retain(|m| m.target != mark.target);
        self.marks.push(mark);
    }

    pub fn remove_mark(&mut self, gene: &GeneId) -> Option<EpigeneticMark> {
        let idx = self.marks.iter().position(|m| &m.target == gene)?;
        Some(self.marks.remove(idx))
    }

    /// Drop marks whose decayed strength has fallen to `threshold` or below.
    /// Returns the removed marks.
    pub fn prune_decayed(&mut self, current_generation: u32, threshold: f64) -> Vec<EpigeneticMark> {
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .marks
            .drain(..)
            .partition(|m| m.decayed_strength(current_generation) > threshold);
        self.marks = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(target: &str, strength: f64, decay: f64, created: u32) -> EpigeneticMark {
        EpigeneticMark {
            target: GeneId::from(target),
            modification: Modification::Upregulate,
            strength,
            cause: "test".to_string(),
            heritability: 0.3,
            decay,
            generation_created: created,
        }
    }

    #[test]
    fn decayed_strength_is_geometric() {
        let m = mark("g", 0.8, 0.5, 0);
        assert!((m.decayed_strength(0) - 0.8).abs() < 1e-12);
        assert!((m.decayed_strength(1) - 0.4).abs() < 1e-12);
        assert!((m.decayed_strength(2) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn set_mark_overwrites_same_gene() {
        let mut epi = Epigenome::new();
        epi.set_mark(mark("g", 0.5, 0.1, 0));
        epi.set_mark(mark("g", 0.9, 0.1, 1));
        assert_eq!(epi.len(), 1);
        assert!((epi.mark_for(&GeneId::from("g")).unwrap().strength - 0.9).abs() < 1e-12);
    }

    #[test]
    fn prune_removes_weak_marks() {
        let mut epi = Epigenome::new();
        epi.set_mark(mark("fresh", 0.8, 0.1, 5));
        epi.set_mark(mark("stale", 0.3, 0.5, 0));
        let removed = epi.prune_decayed(5, 0.1);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].target, GeneId::from("stale"));
        assert_eq!(epi.len(), 1);
    }
}
