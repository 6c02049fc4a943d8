//! Stage 7 — structural variation.
//!
//! Inversion reverses a random contiguous segment within a non-essential
//! chromosome; translocation swaps the suffixes of two non-essential
//! chromosomes at random break points. Both reorder genes without
//! creating or destroying them, so only the genome hash changes.

use super::StructuralVariation;
use axobase_core::config::MutationRates;
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

pub fn apply_inversions(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<StructuralVariation> {
    let mut variations = Vec::new();
    for chr in &mut genome.chromosomes {
        if chr.is_essential || chr.len() < 2 {
            continue;
        }
        if !rng.chance(rates.inversion) {
            continue;
        }
        let start = rng.next_index(chr.len() - 1);
        let max_len = chr.len() - start;
        let len = 2 + rng.next_index(max_len - 1);
        chr.invert_segment(start, len);
        variations.push(StructuralVariation::Inversion {
            chromosome: chr.id.clone(),
            start,
            len,
        });
    }
    if !variations.is_empty() {
        genome.recompute();
    }
    variations
}

pub fn apply_translocation(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<StructuralVariation> {
    if !rng.chance(rates.translocation) {
        return Vec::new();
    }
    let candidates: Vec<usize> = genome
        .chromosomes
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_essential && c.len() >= 2)
        .map(|(i, _)| i)
        .collect();
    if candidates.len() < 2 {
        return Vec::new();
    }
    let first = candidates[rng.next_index(candidates.len())];
    let second = loop {
        let pick = candidates[rng.next_index(candidates.len())];
        if pick != first {
            break pick;
        }
    };

    let break_first = 1 + rng.next_index(genome.chromosomes[first].len() - 1);
    let break_second = 1 + rng.next_index(genome.chromosomes[second].len() - 1);

    let suffix_first: Vec<_> = genome.chromosomes[first].genes.split_off(break_first);
    let suffix_second: Vec<_> = genome.chromosomes[second].genes.split_off(break_second);
    genome.chromosomes[first].genes.extend(suffix_second);
    genome.chromosomes[second].genes.extend(suffix_first);

    let record = StructuralVariation::Translocation {
        first: genome.chromosomes[first].id.clone(),
        second: genome.chromosomes[second].id.clone(),
        break_first,
        break_second,
    };
    genome.recompute();
    vec![record]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::genesis_genome;
    use axobase_core::genome::LineageId;
    use axobase_core::ports::ChaChaEntropy;

    fn forced() -> MutationRates {
        MutationRates {
            inversion: 1.0,
            translocation: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn inversion_preserves_gene_sets_but_changes_hash() {
        let mut genome = genesis_genome(LineageId::from("L"), 0);
        let ids_before = genome.gene_ids();
        let hash_before = genome.metadata.genome_hash.clone();
        let mut rng = ChaChaEntropy::seeded(3);
        let variations = apply_inversions(&mut genome, &forced(), &mut rng);
        assert!(!variations.is_empty());
        assert_eq!(genome.gene_ids(), ids_before);
        assert_ne!(genome.metadata.genome_hash, hash_before);
        genome.validate().unwrap();
    }

    #[test]
    fn inversion_skips_essential_chromosomes() {
        let mut genome = genesis_genome(LineageId::from("L"), 0);
        let mut rng = ChaChaEntropy::seeded(3);
        let variations = apply_inversions(&mut genome, &forced(), &mut rng);
        for v in &variations {
            if let StructuralVariation::Inversion { chromosome, .. } = v {
                assert!(!genome.chromosome(chromosome).unwrap().is_essential);
            }
        }
    }

    #[test]
    fn translocation_swaps_suffixes() {
        let mut genome = genesis_genome(LineageId::from("L"), 0);
        let total_before = genome.gene_count();
        let ids_before = genome.gene_ids();
        let mut rng = ChaChaEntropy::seeded(5);
        let variations = apply_translocation(&mut genome, &forced(), &mut rng);
        assert_eq!(variations.len(), 1);
        assert_eq!(genome.gene_count(), total_before);
        assert_eq!(genome.gene_ids(), ids_before);
        genome.validate().unwrap();
    }

    #[test]
    fn translocated_inversion_twice_is_identity_on_segments() {
        // apply_inversions with a fixed seed twice re-inverts the same
        // segment only if the draws repeat; instead verify the primitive.
        let mut genome = genesis_genome(LineageId::from("L"), 0);
        let chr = genome
            .chromosomes
            .iter_mut()
            .find(|c| !c.is_essential)
            .unwrap();
        let before = chr.genes.clone();
        chr.invert_segment(1, 4);
        chr.invert_segment(1, 4);
        assert_eq!(chr.genes, before);
    }
}
