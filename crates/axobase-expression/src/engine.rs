//! Expression engine — compose base value, development, regulation, and
//! epigenetics into expressed trait values and a metabolic cost.

use crate::condition::Condition;
use crate::development::{developmental_modifier, DevelopmentalStage};
use crate::epistasis::{self, EpistaticInteraction};
use crate::regulation;
use axobase_core::config::{CycleConfig, ExpressionConfig};
use axobase_core::environment::EnvironmentalState;
use axobase_core::epigenome::Modification;
use axobase_core::error::ExpressionWarning;
use axobase_core::gene::{ExpressionState, Gene, GeneDomain, GeneId};
use axobase_core::genome::{DynamicGenome, LineageId};
use serde::Serialize;
use std::collections::HashMap;

/// Per-call inputs beyond genome and environment.
#[derive(Debug, Clone, Default)]
pub struct ExpressOptions {
    /// Agent age in days, for developmental modulation.
    pub age_days: f64,
    /// Wall clock in milliseconds, for oscillator edges.
    pub wall_millis: u64,
    /// Optional epistatic interactions, applied in order.
    pub interactions: Vec<EpistaticInteraction>,
}

/// One gene with its expression outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressedGene {
    pub gene: Gene,
    /// Final expression. Range `[0, 3]`; silenced genes are exactly 0.
    pub expressed_value: f64,
    /// The regulatory multiplier that was applied.
    pub regulatory_effect: f64,
    /// The epigenetic multiplier that was applied.
    pub epigenetic_effect: f64,
}

/// A genome with expression outcomes attached. Derived, never persisted;
/// holds no references back into its source genome beyond gene ids.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressedGenome {
    pub lineage: LineageId,
    pub generation: u32,
    pub genome_hash: String,
    pub genes: Vec<ExpressedGene>,
    pub total_metabolic_cost: f64,
}

impl ExpressedGenome {
    /// Expressed value of a gene by id or human name, or 0 when absent.
    pub fn value_of(&self, name: &str) -> f64 {
        self.genes
            .iter()
            .find(|g| g.gene.id.as_str() == name || g.gene.name == name)
            .map(|g| g.expressed_value)
            .unwrap_or(0.0)
    }

    /// Highest expressed value across a domain, or 0 when the domain is
    /// absent.
    pub fn domain_max(&self, domain: GeneDomain) -> f64 {
        self.genes
            .iter()
            .filter(|g| g.gene.domain == domain)
            .map(|g| g.expressed_value)
            .fold(0.0, f64::max)
    }

    /// Mean expressed value across all genes.
    pub fn mean_expression(&self) -> f64 {
        if self.genes.is_empty() {
            return 0.0;
        }
        self.genes.iter().map(|g| g.expressed_value).sum::<f64>() / self.genes.len() as f64
    }

    /// The `(name, value)` pairs of the `n` most expressed genes,
    /// descending.
    pub fn top_traits(&self, n: usize) -> Vec<(String, f64)> {
        let mut traits: Vec<(String, f64)> = self
            .genes
            .iter()
            .map(|g| (g.gene.name.clone(), g.expressed_value))
            .collect();
        traits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        traits.truncate(n);
        traits
    }
}

/// Aggregate statistics over one expression call.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionStats {
    pub total_genes: usize,
    pub active_genes: usize,
    pub silenced_genes: usize,
    pub domain_counts: HashMap<String, usize>,
    pub average_plasticity: f64,
    pub average_essentiality: f64,
    pub average_age: f64,
    pub regulatory_edges: usize,
    pub epigenetic_marks: usize,
}

/// Everything one expression call produces.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionResult {
    pub expressed: ExpressedGenome,
    pub stats: ExpressionStats,
    /// The life stage the agent expressed at.
    pub developmental_stage: DevelopmentalStage,
    #[serde(skip)]
    pub warnings: Vec<ExpressionWarning>,
}

/// The expression engine. Stateless apart from configuration; expression
/// is a pure function of `(genome, environment, age, wall clock)`.
#[derive(Debug, Clone, Default)]
pub struct ExpressionEngine {
    config: ExpressionConfig,
    cycle: CycleConfig,
}

impl ExpressionEngine {
    pub fn new(config: ExpressionConfig) -> Self {
        Self {
            config,
            cycle: CycleConfig::default(),
        }
    }

    pub fn config(&self) -> &ExpressionConfig {
        &self.config
    }

    /// Run the full expression pipeline.
    pub fn express(
        &self,
        genome: &DynamicGenome,
        env: &EnvironmentalState,
        opts: &ExpressOptions,
    ) -> ExpressionResult {
        let mut warnings = Vec::new();

        // 1. Conditional resolution. The stored state is never mutated;
        // a false condition silences the gene for this call only.
        let mut silenced: HashMap<GeneId, bool> = HashMap::new();
        for gene in genome.genes() {
            let off = match gene.expression_state {
                ExpressionState::Active => false,
                ExpressionState::Silenced => true,
                ExpressionState::Conditional => match &gene.activation_condition {
                    None => false,
                    Some(cond) => match Condition::parse(cond) {
                        Ok(parsed) => !parsed.eval(env),
                        Err(_) => {
                            warnings.push(ExpressionWarning::InvalidCondition {
                                gene: gene.id.clone(),
                                condition: cond.clone(),
                            });
                            false
                        }
                    },
                },
            };
            silenced.insert(gene.id.clone(), off);
        }

        // 2–3. Developmental modulation and base expression.
        let mut base: HashMap<GeneId, f64> = HashMap::new();
        for gene in genome.genes() {
            let value = if silenced[&gene.id] {
                0.0
            } else {
                gene.value * gene.weight * developmental_modifier(opts.age_days, gene)
            };
            base.insert(gene.id.clone(), value);
        }

        // 4. Regulatory fixed point.
        let regulation = regulation::solve(genome, &base, opts.wall_millis, &self.config);
        if let Some(warning) = regulation.warning {
            warnings.push(warning);
        }

        // 5–6. Epigenetic multiplier and composition.
        let generation = genome.metadata.generation;
        let mut composed: HashMap<GeneId, f64> = HashMap::new();
        let mut epigenetic_effects: HashMap<GeneId, f64> = HashMap::new();
        for gene in genome.genes() {
            let epi = match genome.epigenome.mark_for(&gene.id) {
                None => 1.0,
                Some(mark) => {
                    let s = mark.decayed_strength(generation);
                    let factor = match mark.modification {
                        Modification::Upregulate => 1.0 + 0.5 * s,
                        Modification::Downregulate => 1.0 - 0.5 * s,
                        Modification::Silence => 1.0 - s,
                        Modification::Activate => 1.0 + s,
                    };
                    factor.max(0.0)
                }
            };
            epigenetic_effects.insert(gene.id.clone(), epi);

            let value = if silenced[&gene.id] {
                0.0
            } else {
                (base[&gene.id] * regulation.multipliers[&gene.id] * epi).clamp(0.0, 3.0)
            };
            composed.insert(gene.id.clone(), value);
        }

        // 7. Epistasis.
        let epistasis_outcome = epistasis::apply(&mut composed, &opts.interactions);
        for id in &epistasis_outcome.suppressed {
            silenced.insert(id.clone(), true);
        }

        // 8. Metabolic cost.
        let total_genes = genome.gene_count();
        let mut total_cost = self.config.base_rate + total_genes as f64 * self.config.per_gene_overhead;
        for gene in genome.genes() {
            total_cost += gene.metabolic_cost * composed[&gene.id];
        }

        let genes: Vec<ExpressedGene> = genome
            .genes()
            .map(|gene| ExpressedGene {
                gene: gene.clone(),
                expressed_value: composed[&gene.id],
                regulatory_effect: regulation.multipliers[&gene.id],
                epigenetic_effect: epigenetic_effects[&gene.id],
            })
            .collect();

        let stats = self.stats(genome, &silenced);
        ExpressionResult {
            expressed: ExpressedGenome {
                lineage: genome.metadata.lineage.clone(),
                generation,
                genome_hash: genome.metadata.genome_hash.clone(),
                genes,
                total_metabolic_cost: total_cost,
            },
            stats,
            developmental_stage: DevelopmentalStage::for_age(opts.age_days),
            warnings,
        }
    }

    fn stats(&self, genome: &DynamicGenome, silenced: &HashMap<GeneId, bool>) -> ExpressionStats {
        let total = genome.gene_count();
        let silenced_count = genome.genes().filter(|g| silenced[&g.id]).count();
        let mut domain_counts: HashMap<String, usize> = HashMap::new();
        let (mut plasticity, mut essentiality, mut age) = (0.0, 0.0, 0.0);
        for gene in genome.genes() {
            *domain_counts
                .entry(format!("{:?}", gene.domain))
                .or_default() += 1;
            plasticity += gene.plasticity;
            essentiality += gene.essentiality;
            age += gene.age as f64;
        }
        let denom = total.max(1) as f64;
        ExpressionStats {
            total_genes: total,
            active_genes: total - silenced_count,
            silenced_genes: silenced_count,
            domain_counts,
            average_plasticity: plasticity / denom,
            average_essentiality: essentiality / denom,
            average_age: age / denom,
            regulatory_edges: genome.regulatory_edges.len(),
            epigenetic_marks: genome.epigenome.len(),
        }
    }

    /// Metabolic cost without running regulation: base rate, per-gene
    /// overhead, and each non-silenced gene's cost at `value · weight`.
    pub fn quick_metabolic_cost(&self, genome: &DynamicGenome) -> f64 {
        let mut cost =
            self.config.base_rate + genome.gene_count() as f64 * self.config.per_gene_overhead;
        for gene in genome.genes() {
            if gene.expression_state != ExpressionState::Silenced {
                cost += gene.metabolic_cost * (gene.value * gene.weight).clamp(0.0, 3.0);
            }
        }
        cost
    }

    /// Whether `balance` covers `days` of upkeep at the genome's quick
    /// metabolic cost and cycle rate.
    pub fn can_survive(&self, genome: &DynamicGenome, balance: f64, days: f64) -> bool {
        let per_cycle = self.quick_metabolic_cost(genome);
        let cycle_speed = genome
            .gene_by_name("cycle_speed")
            .map(|g| g.value)
            .unwrap_or(0.5);
        let cycles_per_day = 86_400_000.0 / self.cycle.interval_ms(cycle_speed) as f64;
        balance >= per_cycle * cycles_per_day * days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axobase_core::chromosome::Chromosome;
    use axobase_core::epigenome::{Epigenome, EpigeneticMark};
    use axobase_core::gene::GeneDomain;
    use axobase_core::regulatory::{RegulatoryEdge, RegulatoryRelation};

    fn two_gene_genome(b_state: ExpressionState) -> DynamicGenome {
        let chr = Chromosome::new("chr", "C", true).with_genes(vec![
            Gene::new("a", "A", GeneDomain::Regulatory)
                .with_value(1.0)
                .with_weight(1.0),
            Gene::new("b", "B", GeneDomain::Metabolism)
                .with_value(0.5)
                .with_state(b_state),
        ]);
        DynamicGenome::assemble(
            LineageId::from("L"),
            0,
            0,
            vec![chr],
            vec![RegulatoryEdge::new(
                "a",
                "b",
                RegulatoryRelation::Activation,
                1.0,
            )],
            Epigenome::new(),
        )
        .unwrap()
    }

    fn adult_opts() -> ExpressOptions {
        ExpressOptions {
            age_days: 45.0,
            ..Default::default()
        }
    }

    #[test]
    fn silenced_gene_expresses_zero_despite_activation() {
        let genome = two_gene_genome(ExpressionState::Silenced);
        let engine = ExpressionEngine::default();
        let result = engine.express(&genome, &EnvironmentalState::default(), &adult_opts());
        assert_eq!(result.expressed.value_of("b"), 0.0);
        assert!(result.expressed.value_of("a") > 0.0);
        assert_eq!(result.stats.silenced_genes, 1);
    }

    #[test]
    fn active_gene_is_lifted_by_activation() {
        let genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let result = engine.express(&genome, &EnvironmentalState::default(), &adult_opts());
        // base 0.5, activator at 1.0 with strength 1.0 -> multiplier 1.3
        assert!(result.expressed.value_of("b") > 0.5);
    }

    #[test]
    fn expression_is_pure() {
        let genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let env = EnvironmentalState::default();
        let opts = ExpressOptions {
            age_days: 12.0,
            wall_millis: 55_000,
            interactions: vec![],
        };
        let a = engine.express(&genome, &env, &opts);
        let b = engine.express(&genome, &env, &opts);
        assert_eq!(
            serde_json::to_string(&a.expressed).unwrap(),
            serde_json::to_string(&b.expressed).unwrap()
        );
    }

    #[test]
    fn conditional_gene_follows_environment() {
        let chr = Chromosome::new("chr", "C", true).with_genes(vec![Gene::new(
            "dormant",
            "Dormant",
            GeneDomain::Dormancy,
        )
        .with_value(0.8)
        .with_condition("balance < 2")]);
        let genome = DynamicGenome::assemble(
            LineageId::from("L"),
            0,
            0,
            vec![chr],
            vec![],
            Epigenome::new(),
        )
        .unwrap();
        let engine = ExpressionEngine::default();

        let rich = EnvironmentalState::default().with_balance(50.0);
        let poor = EnvironmentalState::default().with_balance(1.0);
        assert_eq!(
            engine
                .express(&genome, &rich, &adult_opts())
                .expressed
                .value_of("dormant"),
            0.0
        );
        assert!(
            engine
                .express(&genome, &poor, &adult_opts())
                .expressed
                .value_of("dormant")
                > 0.0
        );
    }

    #[test]
    fn unparseable_condition_warns_and_stays_active() {
        let chr = Chromosome::new("chr", "C", true).with_genes(vec![Gene::new(
            "g",
            "G",
            GeneDomain::Cognition,
        )
        .with_value(0.5)
        .with_condition("?? nonsense ??")]);
        let genome = DynamicGenome::assemble(
            LineageId::from("L"),
            0,
            0,
            vec![chr],
            vec![],
            Epigenome::new(),
        )
        .unwrap();
        let engine = ExpressionEngine::default();
        let result = engine.express(&genome, &EnvironmentalState::default(), &adult_opts());
        assert!(result.expressed.value_of("g") > 0.0);
        assert!(matches!(
            result.warnings.as_slice(),
            [ExpressionWarning::InvalidCondition { .. }]
        ));
    }

    #[test]
    fn cost_has_structural_floor() {
        let genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let result = engine.express(&genome, &EnvironmentalState::default(), &adult_opts());
        let floor = engine.config.base_rate + 2.0 * engine.config.per_gene_overhead;
        assert!(result.expressed.total_metabolic_cost >= floor);
    }

    #[test]
    fn expressed_values_stay_in_bounds() {
        let genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let result = engine.express(&genome, &EnvironmentalState::default(), &adult_opts());
        for g in &result.expressed.genes {
            assert!((0.0..=3.0).contains(&g.expressed_value));
        }
    }

    #[test]
    fn epigenetic_mark_shifts_expression() {
        let mut genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let before = engine
            .express(&genome, &EnvironmentalState::default(), &adult_opts())
            .expressed
            .value_of("b");
        genome.epigenome.set_mark(EpigeneticMark {
            target: "b".into(),
            modification: Modification::Upregulate,
            strength: 0.8,
            cause: "test".into(),
            heritability: 0.3,
            decay: 0.2,
            generation_created: 0,
        });
        let after = engine
            .express(&genome, &EnvironmentalState::default(), &adult_opts())
            .expressed
            .value_of("b");
        assert!(after > before);
    }

    #[test]
    fn quick_cost_and_survival() {
        let genome = two_gene_genome(ExpressionState::Active);
        let engine = ExpressionEngine::default();
        let quick = engine.quick_metabolic_cost(&genome);
        assert!(quick > 0.0);
        assert!(engine.can_survive(&genome, 1_000.0, 7.0));
        assert!(!engine.can_survive(&genome, 0.0001, 7.0));
    }
}
