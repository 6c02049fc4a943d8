//! Stage 6 — regulatory recombination.
//!
//! The child's edge set starts from the union of both parents' edges,
//! restricted to genes the child actually carries; where both parents
//! regulate the same `(source, target)` pair, a coin flip picks whose
//! version survives. The set then drifts: one random edge may be added,
//! one removed, and one perturbed, each at its own rate.

use super::MutationRecord;
use crate::sampling::gaussian;
use axobase_core::config::MutationRates;
use axobase_core::gene::GeneId;
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use axobase_core::regulatory::{RegulatoryEdge, RegulatoryRelation};
use std::collections::HashSet;

/// Merge parental edge sets for a child whose genes are already in place.
pub fn merge_parental_edges(
    child: &DynamicGenome,
    parent_a_edges: &[RegulatoryEdge],
    parent_b_edges: &[RegulatoryEdge],
    rng: &mut dyn EntropySource,
) -> Vec<RegulatoryEdge> {
    let ids = child.gene_ids();
    let valid = |e: &RegulatoryEdge| ids.contains(&e.source) && ids.contains(&e.target);

    let a_valid: Vec<&RegulatoryEdge> = parent_a_edges.iter().filter(|e| valid(e)).collect();
    let b_valid: Vec<&RegulatoryEdge> = parent_b_edges.iter().filter(|e| valid(e)).collect();

    let a_pairs: HashSet<(GeneId, GeneId)> = a_valid
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();
    let b_pairs: HashSet<(GeneId, GeneId)> = b_valid
        .iter()
        .map(|e| (e.source.clone(), e.target.clone()))
        .collect();

    // Each (source, target) pair is resolved exactly once, even when a
    // parent carries parallel edges for it.
    let mut edges = Vec::new();
    let mut resolved: HashSet<(GeneId, GeneId)> = HashSet::new();
    for edge in &a_valid {
        let pair = (edge.source.clone(), edge.target.clone());
        if !b_pairs.contains(&pair) {
            edges.push((*edge).clone());
            continue;
        }
        if !resolved.insert(pair.clone()) {
            continue;
        }
        let winner: Vec<&&RegulatoryEdge> = if rng.chance(0.5) {
            a_valid
                .iter()
                .filter(|e| e.source == pair.0 && e.target == pair.1)
                .collect()
        } else {
            b_valid
                .iter()
                .filter(|e| e.source == pair.0 && e.target == pair.1)
                .collect()
        };
        edges.extend(winner.into_iter().map(|e| (**e).clone()));
    }
    for edge in &b_valid {
        let pair = (edge.source.clone(), edge.target.clone());
        if !a_pairs.contains(&pair) {
            edges.push((*edge).clone());
        }
    }
    edges
}

/// Apply add/delete/modify drift to the child's edge set in place.
pub fn drift_edges(
    genome: &mut DynamicGenome,
    rates: &MutationRates,
    rng: &mut dyn EntropySource,
) -> Vec<MutationRecord> {
    let mut log = Vec::new();

    if rng.chance(rates.regulatory_add) {
        let mut ids: Vec<GeneId> = genome.gene_ids().into_iter().collect();
        ids.sort();
        if ids.len() >= 2 {
            let source = ids[rng.next_index(ids.len())].clone();
            let target = ids[rng.next_index(ids.len())].clone();
            let relation = if rng.chance(0.5) {
                RegulatoryRelation::Activation
            } else {
                RegulatoryRelation::Inhibition
            };
            let edge = RegulatoryEdge::new(
                source.clone(),
                target.clone(),
                relation,
                rng.next_f64(),
            );
            genome.regulatory_edges.push(edge);
            log.push(MutationRecord::RegulatoryAdd { source, target });
        }
    }

    if rng.chance(rates.regulatory_delete) && !genome.regulatory_edges.is_empty() {
        let idx = rng.next_index(genome.regulatory_edges.len());
        let edge = genome.regulatory_edges.remove(idx);
        log.push(MutationRecord::RegulatoryDelete {
            source: edge.source,
            target: edge.target,
        });
    }

    if rng.chance(rates.regulatory_modify) && !genome.regulatory_edges.is_empty() {
        let idx = rng.next_index(genome.regulatory_edges.len());
        let delta = gaussian(rng, 0.1);
        let edge = &mut genome.regulatory_edges[idx];
        let old = edge.strength;
        edge.set_strength(old + delta);
        log.push(MutationRecord::RegulatoryModify {
            source: edge.source.clone(),
            target: edge.target.clone(),
            old_strength: old,
            new_strength: edge.strength,
        });
    }

    genome.recompute();
    log
}
