//! Stage 5 — de-novo gene birth.
//!
//! Rarely, breeding synthesizes an entirely new gene: random domain, low
//! weight, high plasticity, negligible essentiality. New genes arrive in
//! the conditional state gated on an as-yet-unknown environmental trigger,
//! which the condition language evaluates as true until a real trigger is
//! learned. They land in a random non-essential chromosome; an "Accessory"
//! chromosome is created when none exists.

use super::MutationRecord;
use crate::sampling::hex_token;
use axobase_core::chromosome::Chromosome;
use axobase_core::config::MutationRates;
use axobase_core::gene::{Gene, GeneDomain, GeneOrigin};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

/// Symbolic activation condition for genes without a learned trigger.
pub const UNKNOWN_TRIGGER: &str = "environment_trigger_unknown > 0";

pub fn spawn_de_novo(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<MutationRecord> {
    if !rng.chance(rates.de_novo) {
        return Vec::new();
    }

    let domain = GeneDomain::ALL[rng.next_index(GeneDomain::ALL.len())];
    let id = format!("de_novo_{}", hex_token(rng, 4));
    let gene = Gene::new(id.clone(), id.clone(), domain)
        .with_value(rng.next_f64())
        .with_weight(rng.next_range(0.1, 0.3))
        .with_dominance(rng.next_range(0.0, 0.3))
        .with_plasticity(rng.next_range(0.5, 1.0))
        .with_essentiality(rng.next_range(0.0, 0.2))
        .with_metabolic_cost(rng.next_range(0.0, 0.002))
        .with_condition(UNKNOWN_TRIGGER);
    let mut gene = gene;
    gene.origin = GeneOrigin::DeNovo;

    let non_essential: Vec<usize> = genome
        .chromosomes
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_essential)
        .map(|(i, _)| i)
        .collect();
    let chr_index = if non_essential.is_empty() {
        genome
            .chromosomes
            .push(Chromosome::new("chr_accessory", "Accessory", false));
        genome.chromosomes.len() - 1
    } else {
        non_essential[rng.next_index(non_essential.len())]
    };

    let chr = &mut genome.chromosomes[chr_index];
    let record = MutationRecord::DeNovo {
        gene: gene.id.clone(),
        domain,
        chromosome: chr.id.clone(),
    };
    chr.genes.push(gene);
    genome.recompute();
    vec![record]
}
