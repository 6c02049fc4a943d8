//! Stage 3 — gene duplication.
//!
//! Each gene may spawn a fresh copy at the duplication rate: new id,
//! halved weight, a small value bump, and a `duplicate_of` back-reference.
//! Copies land at the end of the source gene's chromosome and are not
//! re-visited in the same pass.

use super::MutationRecord;
use crate::sampling::{gaussian, hex_token};
use axobase_core::config::MutationRates;
use axobase_core::gene::{ranges, Gene, GeneId, GeneOrigin};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

pub fn duplicate_genes(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<MutationRecord> {
    let mut log = Vec::new();
    for chr in &mut genome.chromosomes {
        let mut copies: Vec<Gene> = Vec::new();
        for gene in &chr.genes {
            if !rng.chance(rates.duplication) {
                continue;
            }
            let copy_id = GeneId::new(format!("{}_dup_{}", gene.id, hex_token(rng, 4)));
            let mut copy = gene.clone();
            copy.id = copy_id.clone();
            copy.weight = (gene.weight * 0.5).clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
            copy.value =
                (gene.value + gaussian(rng, 0.05)).clamp(ranges::VALUE.0, ranges::VALUE.1);
            copy.origin = GeneOrigin::Duplicated;
            copy.age = 0;
            copy.duplicate_of = Some(gene.id.clone());
            log.push(MutationRecord::Duplication {
                source: gene.id.clone(),
                copy: copy_id,
                chromosome: chr.id.clone(),
            });
            copies.push(copy);
        }
        chr.genes.extend(copies);
    }
    genome.recompute();
    log
}
