//! Chromosome — an ordered gene sequence grouped by functional area.
//!
//! Gene order matters: structural variation (inversion, translocation)
//! operates on contiguous segments. Essential chromosomes can never be
//! emptied; that invariant is enforced at the genome level where removals
//! are issued.

use crate::gene::{Gene, GeneId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a chromosome within a genome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChromosomeId(pub String);

impl ChromosomeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChromosomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChromosomeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An ordered sequence of genes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    pub id: ChromosomeId,
    pub name: String,
    /// Essential chromosomes must always retain at least one gene.
    pub is_essential: bool,
    pub genes: Vec<Gene>,
}

impl Chromosome {
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_essential: bool) -> Self {
        Self {
            id: ChromosomeId::new(id),
            name: name.into(),
            is_essential,
            genes: Vec::new(),
        }
    }

    pub fn with_genes(mut self, genes: Vec<Gene>) -> Self {
        self.genes = genes;
        self
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn gene(&self, id: &GeneId) -> Option<&Gene> {
        self.genes.iter().find(|g| &g.id == id)
    }

    pub fn gene_mut(&mut self, id: &GeneId) -> Option<&mut Gene> {
        self.genes.iter_mut().find(|g| &g.id == id)
    }

    pub fn contains(&self, id: &GeneId) -> bool {
        self.genes.iter().any(|g| &g.id == id)
    }

    pub fn gene_ids(&self) -> impl Iterator<Item = &GeneId> {
        self.genes.iter().map(|g| &g.id)
    }

    /// Reverse the gene order of `[start, start + len)` in place.
    /// No-op when the segment falls outside the chromosome.
    pub fn invert_segment(&mut self, start: usize, len: usize) {
        if len < 2 || start + len > self.genes.len() {
            return;
        }
        self.genes[start..start + len].reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::GeneDomain;

    fn chr_with(names: &[&str]) -> Chromosome {
        Chromosome::new("chr_test", "Test", false).with_genes(
            names
                .iter()
                .map(|n| Gene::new(*n, *n, GeneDomain::Cognition))
                .collect(),
        )
    }

    #[test]
    fn lookup_by_id() {
        let chr = chr_with(&["a", "b", "c"]);
        assert!(chr.contains(&GeneId::from("b")));
        assert!(chr.gene(&GeneId::from("z")).is_none());
    }

    #[test]
    fn invert_segment_reverses_order() {
        let mut chr = chr_with(&["a", "b", "c", "d"]);
        chr.invert_segment(1, 3);
        let ids: Vec<&str> = chr.genes.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn invert_segment_twice_is_identity() {
        let mut chr = chr_with(&["a", "b", "c", "d", "e"]);
        let before = chr.clone();
        chr.invert_segment(1, 3);
        chr.invert_segment(1, 3);
        assert_eq!(chr, before);
    }

    #[test]
    fn invert_out_of_bounds_is_noop() {
        let mut chr = chr_with(&["a", "b"]);
        let before = chr.clone();
        chr.invert_segment(1, 5);
        assert_eq!(chr, before);
    }
}
