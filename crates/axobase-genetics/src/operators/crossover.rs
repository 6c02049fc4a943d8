//! Stage 1 — crossover.
//!
//! For each chromosome id in either parent: a chromosome held by one
//! parent only is inherited with probability 0.5 (always, when essential);
//! a chromosome held by both is taken whole from one parent with the
//! chromosome-level crossover rate, otherwise recombined gene by gene.
//! Ages of inherited genes are incremented.

use super::{CrossoverEvent, MutationRecord, ParentTag};
use axobase_core::chromosome::Chromosome;
use axobase_core::config::MutationRates;
use axobase_core::gene::{Gene, GeneId};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use std::collections::HashSet;

pub struct CrossoverOutcome {
    pub chromosomes: Vec<Chromosome>,
    pub events: Vec<CrossoverEvent>,
    pub log: Vec<MutationRecord>,
}

/// Recombine the two parents' chromosome sets.
pub fn recombine(
    parent_a: &DynamicGenome,
    parent_b: &DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> CrossoverOutcome {
    let mut chromosomes = Vec::new();
    let mut events = Vec::new();
    let mut log = Vec::new();
    // Gene ids must stay unique across the child even when ancestors moved
    // genes between chromosomes.
    let mut claimed: HashSet<GeneId> = HashSet::new();

    // Parent A's chromosomes in order, then parent-B-only chromosomes.
    for chr_a in &parent_a.chromosomes {
        match parent_b.chromosome(&chr_a.id) {
            None => {
                if chr_a.is_essential || rng.chance(0.5) {
                    chromosomes.push(inherit_whole(chr_a, &mut claimed, &mut log));
                    events.push(CrossoverEvent::SingleParent {
                        chromosome: chr_a.id.clone(),
                        from: ParentTag::A,
                    });
                }
            }
            Some(chr_b) => {
                if rng.chance(rates.chromosome_crossover) {
                    let (source, tag) = if rng.chance(0.5) {
                        (chr_a, ParentTag::A)
                    } else {
                        (chr_b, ParentTag::B)
                    };
                    let mut inherited = inherit_whole(source, &mut claimed, &mut log);
                    // An essential chromosome must not arrive empty.
                    if inherited.is_empty() && chr_a.is_essential {
                        inherited = inherit_whole(chr_a, &mut claimed, &mut log);
                    }
                    chromosomes.push(inherited);
                    events.push(CrossoverEvent::WholeChromosome {
                        chromosome: chr_a.id.clone(),
                        from: tag,
                    });
                } else {
                    let (child, from_a, from_b) =
                        gene_level(chr_a, chr_b, rates, rng, &mut claimed, &mut log);
                    events.push(CrossoverEvent::GeneLevel {
                        chromosome: chr_a.id.clone(),
                        genes_from_a: from_a,
                        genes_from_b: from_b,
                    });
                    chromosomes.push(child);
                }
            }
        }
    }
    for chr_b in &parent_b.chromosomes {
        if parent_a.chromosome(&chr_b.id).is_none() && (chr_b.is_essential || rng.chance(0.5)) {
            chromosomes.push(inherit_whole(chr_b, &mut claimed, &mut log));
            events.push(CrossoverEvent::SingleParent {
                chromosome: chr_b.id.clone(),
                from: ParentTag::B,
            });
        }
    }

    CrossoverOutcome {
        chromosomes,
        events,
        log,
    }
}

fn inherit_whole(
    source: &Chromosome,
    claimed: &mut HashSet<GeneId>,
    log: &mut Vec<MutationRecord>,
) -> Chromosome {
    let mut chr = Chromosome::new(source.id.as_str(), source.name.clone(), source.is_essential);
    for gene in &source.genes {
        if !claimed.insert(gene.id.clone()) {
            log.push(MutationRecord::OperatorSkipped {
                stage: "crossover",
                reason: format!("gene '{}' already inherited elsewhere", gene.id),
            });
            continue;
        }
        let mut gene = gene.clone();
        gene.age += 1;
        chr.genes.push(gene);
    }
    chr
}

/// Uniform gene-level crossover over the union of the two copies' gene
/// ids: shared genes pick a parent at random, genes held by one copy only
/// are inherited with the extra-gene rate.
fn gene_level(
    chr_a: &Chromosome,
    chr_b: &Chromosome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
    claimed: &mut HashSet<GeneId>,
    log: &mut Vec<MutationRecord>,
) -> (Chromosome, usize, usize) {
    let mut child = Chromosome::new(chr_a.id.as_str(), chr_a.name.clone(), chr_a.is_essential);
    let (mut from_a, mut from_b) = (0usize, 0usize);

    // A's gene order first, then B-only genes in B's order.
    for gene_a in &chr_a.genes {
        match chr_b.gene(&gene_a.id) {
            Some(gene_b) => {
                if rng.chance(0.5) {
                    push(gene_a, &mut from_a, &mut child, claimed, log);
                } else {
                    push(gene_b, &mut from_b, &mut child, claimed, log);
                }
            }
            None => {
                if rng.chance(rates.extra_gene_inheritance) {
                    push(gene_a, &mut from_a, &mut child, claimed, log);
                }
            }
        }
    }
    for gene_b in &chr_b.genes {
        if chr_a.gene(&gene_b.id).is_none() && rng.chance(rates.extra_gene_inheritance) {
            push(gene_b, &mut from_b, &mut child, claimed, log);
        }
    }

    // Gene-level recombination may drop everything; essential chromosomes
    // fall back to parent A's copy.
    if child.is_empty() && child.is_essential {
        for gene_a in &chr_a.genes {
            push(gene_a, &mut from_a, &mut child, claimed, log);
        }
    }

    (child, from_a, from_b)
}

/// Claim a gene for the child, aging it by one generation. Genes already
/// claimed elsewhere in the child are skipped with a log entry.
fn push(
    gene: &Gene,
    counter: &mut usize,
    child: &mut Chromosome,
    claimed: &mut HashSet<GeneId>,
    log: &mut Vec<MutationRecord>,
) {
    if !claimed.insert(gene.id.clone()) {
        log.push(MutationRecord::OperatorSkipped {
            stage: "crossover",
            reason: format!("gene '{}' already inherited elsewhere", gene.id),
        });
        return;
    }
    let mut gene = gene.clone();
    gene.age += 1;
    child.genes.push(gene);
    *counter += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::genesis_genome;
    use axobase_core::genome::LineageId;
    use axobase_core::ports::ChaChaEntropy;

    #[test]
    fn identical_parents_yield_identical_gene_sets() {
        let a = genesis_genome(LineageId::from("A"), 0);
        let b = genesis_genome(LineageId::from("B"), 0);
        let mut rng = ChaChaEntropy::seeded(3);
        let out = recombine(&a, &b, &MutationRates::default(), &mut rng);
        let child_genes: usize = out.chromosomes.iter().map(|c| c.len()).sum();
        assert_eq!(child_genes, a.gene_count());
        assert_eq!(out.chromosomes.len(), a.chromosomes.len());
    }

    #[test]
    fn inherited_genes_age() {
        let a = genesis_genome(LineageId::from("A"), 0);
        let b = genesis_genome(LineageId::from("B"), 0);
        let mut rng = ChaChaEntropy::seeded(3);
        let out = recombine(&a, &b, &MutationRates::default(), &mut rng);
        for chr in &out.chromosomes {
            for gene in &chr.genes {
                assert_eq!(gene.age, 1);
            }
        }
    }

    #[test]
    fn crossover_is_reproducible() {
        let a = genesis_genome(LineageId::from("A"), 0);
        let b = genesis_genome(LineageId::from("B"), 0);
        let mut rng1 = ChaChaEntropy::seeded(11);
        let mut rng2 = ChaChaEntropy::seeded(11);
        let out1 = recombine(&a, &b, &MutationRates::default(), &mut rng1);
        let out2 = recombine(&a, &b, &MutationRates::default(), &mut rng2);
        assert_eq!(out1.chromosomes, out2.chromosomes);
        assert_eq!(out1.events, out2.events);
    }

    #[test]
    fn no_duplicate_gene_ids_in_child() {
        let a = genesis_genome(LineageId::from("A"), 0);
        let b = genesis_genome(LineageId::from("B"), 0);
        for seed in 0..20 {
            let mut rng = ChaChaEntropy::seeded(seed);
            let out = recombine(&a, &b, &MutationRates::default(), &mut rng);
            let mut seen = std::collections::HashSet::new();
            for chr in &out.chromosomes {
                for gene in &chr.genes {
                    assert!(seen.insert(gene.id.clone()), "duplicate {}", gene.id);
                }
            }
        }
    }
}
