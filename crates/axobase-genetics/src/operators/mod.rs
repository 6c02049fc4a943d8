//! Genetic operators and their replay records.
//!
//! Each operator is a pure function of `(genome parts, rates, entropy)`.
//! Every change is logged as a record sufficient to replay the decision;
//! per-gene failures are swallowed into [`MutationRecord::OperatorSkipped`]
//! entries rather than aborting the pipeline.

pub mod conversion;
pub mod crossover;
pub mod de_novo;
pub mod deletion;
pub mod duplication;
pub mod mutation;
pub mod regulatory;
pub mod structural;

use axobase_core::chromosome::ChromosomeId;
use axobase_core::gene::{GeneDomain, GeneId};
use serde::Serialize;

/// Which parent contributed a chromosome or gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParentTag {
    A,
    B,
}

/// One logged mutation, sufficient to replay the decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MutationRecord {
    Point {
        gene: GeneId,
        old_value: f64,
        new_value: f64,
    },
    Large {
        gene: GeneId,
        old_value: f64,
        new_value: f64,
    },
    Weight {
        gene: GeneId,
        old_weight: f64,
        new_weight: f64,
    },
    Duplication {
        source: GeneId,
        copy: GeneId,
        chromosome: ChromosomeId,
    },
    Deletion {
        gene: GeneId,
        chromosome: ChromosomeId,
        probability: f64,
    },
    DeNovo {
        gene: GeneId,
        domain: GeneDomain,
        chromosome: ChromosomeId,
    },
    RegulatoryAdd {
        source: GeneId,
        target: GeneId,
    },
    RegulatoryDelete {
        source: GeneId,
        target: GeneId,
    },
    RegulatoryModify {
        source: GeneId,
        target: GeneId,
        old_strength: f64,
        new_strength: f64,
    },
    HorizontalTransfer {
        gene: GeneId,
        donor: String,
        chromosome: ChromosomeId,
    },
    /// A per-gene operator step was skipped; the pipeline continued.
    OperatorSkipped {
        stage: &'static str,
        reason: String,
    },
}

/// One logged crossover decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CrossoverEvent {
    /// The chromosome existed in only one parent and was inherited.
    SingleParent {
        chromosome: ChromosomeId,
        from: ParentTag,
    },
    /// One parent's copy was taken whole.
    WholeChromosome {
        chromosome: ChromosomeId,
        from: ParentTag,
    },
    /// Uniform gene-level recombination.
    GeneLevel {
        chromosome: ChromosomeId,
        genes_from_a: usize,
        genes_from_b: usize,
    },
}

/// One logged structural variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuralVariation {
    Inversion {
        chromosome: ChromosomeId,
        start: usize,
        len: usize,
    },
    Translocation {
        first: ChromosomeId,
        second: ChromosomeId,
        break_first: usize,
        break_second: usize,
    },
}

/// One logged gene conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneConversionRecord {
    pub chromosome: ChromosomeId,
    pub donor: GeneId,
    pub recipient: GeneId,
}
