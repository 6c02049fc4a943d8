//! Stage 8 — gene conversion.
//!
//! Within one chromosome, paralogous gene pairs (same domain, or sharing
//! an id root through duplication) occasionally homogenize: the
//! lower-fitness gene's value and weight are pulled 70/30 toward the
//! higher-fitness gene's, each attribute blended independently.

use super::GeneConversionRecord;
use axobase_core::config::MutationRates;
use axobase_core::gene::{ranges, Gene};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;

/// Id root: the part before any `_dup_` suffix, so duplicates pair with
/// their source.
fn id_root(id: &str) -> &str {
    match id.find("_dup_") {
        Some(idx) => &id[..idx],
        None => id,
    }
}

fn paralogous(a: &Gene, b: &Gene) -> bool {
    a.domain == b.domain || id_root(a.id.as_str()) == id_root(b.id.as_str())
}

/// Expression potential used to rank the pair.
fn potential(g: &Gene) -> f64 {
    g.value * g.weight
}

pub fn convert_genes(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<GeneConversionRecord> {
    let mut records = Vec::new();
    for chr in &mut genome.chromosomes {
        for i in 0..chr.genes.len() {
            for j in (i + 1)..chr.genes.len() {
                if !paralogous(&chr.genes[i], &chr.genes[j]) {
                    continue;
                }
                if !rng.chance(rates.conversion) {
                    continue;
                }
                let (donor_idx, recipient_idx) =
                    if potential(&chr.genes[i]) >= potential(&chr.genes[j]) {
                        (i, j)
                    } else {
                        (j, i)
                    };
                let donor_value = chr.genes[donor_idx].value;
                let donor_weight = chr.genes[donor_idx].weight;
                let recipient = &mut chr.genes[recipient_idx];
                recipient.value = (0.7 * donor_value + 0.3 * recipient.value)
                    .clamp(ranges::VALUE.0, ranges::VALUE.1);
                recipient.weight = (0.7 * donor_weight + 0.3 * recipient.weight)
                    .clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
                records.push(GeneConversionRecord {
                    chromosome: chr.id.clone(),
                    donor: chr.genes[donor_idx].id.clone(),
                    recipient: chr.genes[recipient_idx].id.clone(),
                });
            }
        }
    }
    records
}
