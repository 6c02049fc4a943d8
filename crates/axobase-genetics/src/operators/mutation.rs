//! Stage 2 — point mutation.
//!
//! Per gene: Gaussian value noise at the point rate, wholesale value
//! replacement at the large rate, and independent Gaussian weight
//! perturbation at the weight rate. Genes are visited in chromosome
//! order, so a seeded entropy source replays exactly.

use super::MutationRecord;
use crate::sampling::gaussian;
use axobase_core::config::MutationRates;
use axobase_core::gene::{ranges, GeneOrigin};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

/// Mutate values and weights in place.
pub fn point_mutation(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<MutationRecord> {
    let mut log = Vec::new();
    for gene in genome.genes_mut() {
        if rng.chance(rates.point) {
            let old = gene.value;
            gene.value = (gene.value + gaussian(rng, rates.point_sigma))
                .clamp(ranges::VALUE.0, ranges::VALUE.1);
            gene.origin = GeneOrigin::Mutated;
            log.push(MutationRecord::Point {
                gene: gene.id.clone(),
                old_value: old,
                new_value: gene.value,
            });
        }
        if rng.chance(rates.large) {
            let old = gene.value;
            gene.value = rng.next_f64();
            gene.origin = GeneOrigin::Mutated;
            log.push(MutationRecord::Large {
                gene: gene.id.clone(),
                old_value: old,
                new_value: gene.value,
            });
        }
        if rng.chance(rates.weight) {
            let old = gene.weight;
            gene.weight = (gene.weight + gaussian(rng, rates.weight_sigma))
                .clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
            log.push(MutationRecord::Weight {
                gene: gene.id.clone(),
                old_weight: old,
                new_weight: gene.weight,
            });
        }
    }
    log
}
