//! The breeding pipeline — two parents in, one child and a replay log out.
//!
//! Stages run in a fixed order: crossover, point mutation, duplication,
//! deletion, de-novo birth, regulatory recombination, structural
//! variation, gene conversion. Given a seeded entropy source the whole
//! pipeline is bit-reproducible. A pipeline-level failure aborts the
//! breed and returns an untouched copy of parent A with the error
//! attached.

use crate::epigenetics;
use crate::operators::{
    conversion, crossover, de_novo, deletion, duplication, mutation, regulatory, structural,
    CrossoverEvent, GeneConversionRecord, MutationRecord, StructuralVariation,
};
use axobase_core::config::MutationRates;
use axobase_core::error::AxobaseError;
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Everything a breeding invocation needs.
pub struct BreedingContext {
    pub parent_a: DynamicGenome,
    pub parent_b: DynamicGenome,
    pub parent_a_id: String,
    pub parent_b_id: String,
    /// Environmental stress at breeding time. Range `[0, 1]`.
    pub environmental_stress: f64,
    pub starvation_mode: bool,
}

/// A child genome plus records sufficient to replay every decision.
#[derive(Debug, Clone, Serialize)]
pub struct BreedingResult {
    pub child: DynamicGenome,
    pub mutations: Vec<MutationRecord>,
    pub crossover_events: Vec<CrossoverEvent>,
    pub structural_variations: Vec<StructuralVariation>,
    pub gene_conversions: Vec<GeneConversionRecord>,
    /// Set when the pipeline aborted; `child` is then an untouched copy
    /// of parent A.
    #[serde(skip)]
    pub aborted: Option<AxobaseError>,
}

/// Jaccard similarity over the two parents' gene-id sets, the kinship
/// surrogate used by the inbreeding gate.
pub fn jaccard_similarity(a: &DynamicGenome, b: &DynamicGenome) -> f64 {
    let ids_a = a.gene_ids();
    let ids_b = b.gene_ids();
    let intersection = ids_a.intersection(&ids_b).count();
    let union: HashSet<_> = ids_a.union(&ids_b).collect();
    if union.is_empty() {
        0.0
    } else {
        intersection as f64 / union.len() as f64
    }
}

/// Runs the operator pipeline.
#[derive(Debug, Clone)]
pub struct BreedingEngine {
    rates: MutationRates,
    /// Stage 7 (inversion/translocation) switch.
    pub enable_structural: bool,
    /// Stage 8 (gene conversion) switch.
    pub enable_conversion: bool,
}

impl Default for BreedingEngine {
    /// Default rates with structural variation and gene conversion on.
    fn default() -> Self {
        Self::new(MutationRates::default())
    }
}

impl BreedingEngine {
    pub fn new(rates: MutationRates) -> Self {
        Self {
            rates,
            enable_structural: true,
            enable_conversion: true,
        }
    }

    pub fn rates(&self) -> &MutationRates {
        &self.rates
    }

    pub fn with_structural(mut self, enabled: bool) -> Self {
        self.enable_structural = enabled;
        self
    }

    pub fn with_conversion(mut self, enabled: bool) -> Self {
        self.enable_conversion = enabled;
        self
    }

    /// Run the full pipeline. Per-gene failures are swallowed into the
    /// mutation log; a structurally invalid child aborts the breed.
    pub fn breed(&self, ctx: &BreedingContext, rng: &mut dyn EntropySource) -> BreedingResult {
        let generation = ctx
            .parent_a
            .metadata
            .generation
            .max(ctx.parent_b.metadata.generation)
            + 1;

        // Stage 1 — crossover.
        let crossed = crossover::recombine(&ctx.parent_a, &ctx.parent_b, &self.rates, rng);
        let mut mutations = crossed.log;
        let crossover_events = crossed.events;

        let mut child = DynamicGenome {
            metadata: axobase_core::genome::GenomeMetadata {
                generation,
                lineage: ctx.parent_a.metadata.lineage.clone(),
                genome_hash: String::new(),
                total_genes: 0,
                birth_timestamp_ms: ctx
                    .parent_a
                    .metadata
                    .birth_timestamp_ms
                    .max(ctx.parent_b.metadata.birth_timestamp_ms),
            },
            chromosomes: crossed.chromosomes,
            regulatory_edges: Vec::new(),
            epigenome: axobase_core::epigenome::Epigenome::new(),
        };

        // Stage 2 — point mutation.
        mutations.extend(mutation::point_mutation(&mut child, &self.rates, rng));

        // Stage 3 — duplication.
        mutations.extend(duplication::duplicate_genes(&mut child, &self.rates, rng));

        // Stage 4 — deletion.
        mutations.extend(deletion::delete_genes(
            &mut child,
            &self.rates,
            ctx.starvation_mode,
            rng,
        ));

        // Stage 5 — de-novo birth.
        mutations.extend(de_novo::spawn_de_novo(&mut child, &self.rates, rng));

        // Stage 6 — regulatory recombination.
        child.regulatory_edges = regulatory::merge_parental_edges(
            &child,
            &ctx.parent_a.regulatory_edges,
            &ctx.parent_b.regulatory_edges,
            rng,
        );
        mutations.extend(regulatory::drift_edges(&mut child, &self.rates, rng));

        // Stage 7 — structural variation.
        let mut structural_variations = Vec::new();
        if self.enable_structural {
            structural_variations.extend(structural::apply_inversions(&mut child, &self.rates, rng));
            structural_variations.extend(structural::apply_translocation(
                &mut child,
                &self.rates,
                rng,
            ));
        }

        // Stage 8 — gene conversion.
        let gene_conversions = if self.enable_conversion {
            conversion::convert_genes(&mut child, &self.rates, rng)
        } else {
            Vec::new()
        };

        // Epigenetic inheritance, then final bookkeeping.
        epigenetics::inherit_marks(&ctx.parent_a, &ctx.parent_b, &mut child, rng);
        child.drop_dangling_references();
        child.recompute();

        if let Err(e) = child.validate() {
            warn!(error = %e, "breeding pipeline produced an invalid child; aborting");
            return BreedingResult {
                child: ctx.parent_a.clone(),
                mutations,
                crossover_events,
                structural_variations,
                gene_conversions,
                aborted: Some(e),
            };
        }

        info!(
            generation,
            genes = child.metadata.total_genes,
            mutations = mutations.len(),
            "bred child genome"
        );
        BreedingResult {
            child,
            mutations,
            crossover_events,
            structural_variations,
            gene_conversions,
            aborted: None,
        }
    }
}
