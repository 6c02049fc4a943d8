//! Stage 4 — gene deletion.
//!
//! Deletion pressure scales with how expendable a gene is:
//! `p = base · (1 − essentiality)`, where the base is 0.02 normally,
//! 0.15 under starvation, and elevated for silenced (0.08) and low-weight
//! (0.05) genes. Starvation adds a 1.5× factor for metabolically
//! expensive genes. Genes with essentiality ≥ 0.8 are untouchable, and a
//! chromosome is never emptied by deletion.

use super::MutationRecord;
use axobase_core::config::MutationRates;
use axobase_core::gene::{ExpressionState, Gene, GeneId};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

/// Weight below which a gene counts as low-weight for deletion pressure.
const LOW_WEIGHT: f64 = 0.3;
/// Metabolic cost above which starvation amplifies deletion.
const EXPENSIVE_COST: f64 = 0.005;

fn deletion_probability(gene: &Gene, rates: &MutationRates, starvation: bool) -> f64 {
    if !gene.is_deletable() {
        return 0.0;
    }
    let base = if starvation {
        rates.starvation_deletion
    } else if gene.expression_state == ExpressionState::Silenced {
        0.08
    } else if gene.weight < LOW_WEIGHT {
        0.05
    } else {
        rates.deletion
    };
    let mut p = base * (1.0 - gene.essentiality);
    if starvation && gene.metabolic_cost > EXPENSIVE_COST {
        p *= 1.5;
    }
    p
}

pub fn delete_genes(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    starvation: bool,
    rng: &mut dyn EntropySource,
) -> Vec<MutationRecord> {
    let mut log = Vec::new();
    for chr in &mut genome.chromosomes {
        let mut doomed: Vec<(GeneId, f64)> = Vec::new();
        for gene in &chr.genes {
            let p = deletion_probability(gene, rates, starvation);
            if p > 0.0 && rng.chance(p) {
                doomed.push((gene.id.clone(), p));
            }
        }
        for (id, p) in doomed {
            // Never empty a chromosome, essential or not; structural
            // operators rely on chromosomes persisting.
            if chr.len() <= 1 {
                break;
            }
            if let Some(idx) = chr.genes.iter().position(|g| g.id == id) {
                chr.genes.remove(idx);
                log.push(MutationRecord::Deletion {
                    gene: id,
                    chromosome: chr.id.clone(),
                    probability: p,
                });
            }
        }
    }
    genome.drop_dangling_references();
    genome.recompute();
    log
}
