//! Horizontal gene transfer between live, cooperating agents.
//!
//! Unlike the breeding pipeline this operates on a live recipient: given
//! enough accumulated cooperation with the donor, one highly expressed
//! donor gene is cloned into a random recipient chromosome at reduced
//! weight, tagged with the donor's identity.

use crate::operators::MutationRecord;
use crate::sampling::hex_token;
use axobase_core::config::MutationRates;
use axobase_core::gene::{ranges, ExpressionState, GeneId, GeneOrigin};
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cooperation thresholds gating transfer.
pub const MIN_COOPERATION_HOURS: f64 = 72.0;
pub const MIN_INTERACTIONS: u32 = 20;
/// Donor genes must carry at least this weight to be worth taking.
pub const DONOR_WEIGHT_FLOOR: f64 = 1.0;

/// Accumulated cooperation between one pair of agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CooperationRecord {
    pub hours: f64,
    pub interactions: u32,
}

impl CooperationRecord {
    pub fn qualifies_for_transfer(&self) -> bool {
        self.hours >= MIN_COOPERATION_HOURS && self.interactions >= MIN_INTERACTIONS
    }
}

/// Attempt a horizontal transfer from donor to recipient. Returns the
/// record of the acquired gene, or `None` when the rate draw, the
/// cooperation gate, or candidate selection declines.
pub fn horizontal_transfer(
    recipient: &mut DynamicGenome,
    donor: &DynamicGenome,
    donor_id: &str,
    cooperation: &CooperationRecord,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Option<MutationRecord> {
    if !cooperation.qualifies_for_transfer() {
        return None;
    }
    if !rng.chance(rates.hgt) {
        return None;
    }

    let candidates: Vec<_> = donor
        .genes()
        .filter(|g| {
            g.expression_state == ExpressionState::Active && g.weight > DONOR_WEIGHT_FLOOR
        })
        .collect();
    if candidates.is_empty() || recipient.chromosomes.is_empty() {
        return None;
    }
    let source = candidates[rng.next_index(candidates.len())];

    let mut gene = source.clone();
    gene.id = GeneId::new(format!("{}_hgt_{}", source.id, hex_token(rng, 4)));
    gene.weight = (source.weight * 0.3).clamp(ranges::WEIGHT.0, ranges::WEIGHT.1);
    gene.origin = GeneOrigin::HorizontalTransfer;
    gene.acquired_from = Some(donor_id.to_string());
    gene.age = 0;
    gene.duplicate_of = None;

    let chr_index = rng.next_index(recipient.chromosomes.len());
    let chr = &mut recipient.chromosomes[chr_index];
    let record = MutationRecord::HorizontalTransfer {
        gene: gene.id.clone(),
        donor: donor_id.to_string(),
        chromosome: chr.id.clone(),
    };
    info!(
        gene = %gene.id,
        donor = donor_id,
        chromosome = %chr.id,
        "horizontal gene transfer"
    );
    chr.genes.push(gene);
    recipient.recompute();
    Some(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::genesis_genome;
    use axobase_core::genome::LineageId;
    use axobase_core::ports::ChaChaEntropy;

    fn qualified() -> CooperationRecord {
        CooperationRecord {
            hours: 100.0,
            interactions: 30,
        }
    }

    fn certain_rates() -> MutationRates {
        MutationRates {
            hgt: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn transfer_requires_cooperation_history() {
        let donor = genesis_genome(LineageId::from("D"), 0);
        let mut recipient = genesis_genome(LineageId::from("R"), 0);
        let mut rng = ChaChaEntropy::seeded(1);
        let thin = CooperationRecord {
            hours: 10.0,
            interactions: 30,
        };
        assert!(horizontal_transfer(
            &mut recipient,
            &donor,
            "donor",
            &thin,
            &certain_rates(),
            &mut rng
        )
        .is_none());
    }

    #[test]
    fn transferred_gene_carries_donor_tag_and_reduced_weight() {
        let donor = genesis_genome(LineageId::from("D"), 0);
        let mut recipient = genesis_genome(LineageId::from("R"), 0);
        let before = recipient.gene_count();
        let mut rng = ChaChaEntropy::seeded(1);
        let record = horizontal_transfer(
            &mut recipient,
            &donor,
            "donor-7",
            &qualified(),
            &certain_rates(),
            &mut rng,
        )
        .expect("transfer should fire at rate 1.0");

        assert_eq!(recipient.gene_count(), before + 1);
        let MutationRecord::HorizontalTransfer { gene, donor, .. } = &record else {
            panic!("wrong record kind");
        };
        assert_eq!(donor, "donor-7");
        let acquired = recipient.gene(gene).unwrap();
        assert_eq!(acquired.origin, GeneOrigin::HorizontalTransfer);
        assert_eq!(acquired.acquired_from.as_deref(), Some("donor-7"));
        // Donor genes above weight 1.0 arrive at 30%.
        assert!(acquired.weight <= 1.0);
        recipient.validate().unwrap();
    }

    #[test]
    fn only_heavy_active_genes_are_taken() {
        let mut donor = genesis_genome(LineageId::from("D"), 0);
        for gene in donor.genes_mut() {
            gene.weight = 0.5;
        }
        let mut recipient = genesis_genome(LineageId::from("R"), 0);
        let mut rng = ChaChaEntropy::seeded(1);
        assert!(horizontal_transfer(
            &mut recipient,
            &donor,
            "donor",
            &qualified(),
            &certain_rates(),
            &mut rng
        )
        .is_none());
    }
}
