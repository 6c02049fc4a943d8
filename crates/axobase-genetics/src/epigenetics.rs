//! Epigenetic layer — triggers, mark maintenance, and inheritance.
//!
//! A fixed catalogue of triggers maps environmental predicates to marks
//! on a target domain. On update, firing triggers mark every sufficiently
//! plastic gene in their domain, scaled by that gene's plasticity;
//! existing marks persist while their decayed strength stays above 0.1.
//! At breeding, each parental mark inherits with probability equal to its
//! heritability, at 80% strength.

use axobase_core::environment::{EnvironmentalState, OperationMode};
use axobase_core::epigenome::{EpigeneticMark, Modification};
use axobase_core::gene::GeneDomain;
use axobase_core::genome::DynamicGenome;
use axobase_core::ports::EntropySource;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Minimum plasticity for a gene to accept a mark.
const PLASTICITY_FLOOR: f64 = 0.2;
/// Decayed strength below which retained marks are dropped.
const RETENTION_FLOOR: f64 = 0.1;
/// Strength multiplier applied to inherited marks.
const INHERITANCE_DISCOUNT: f64 = 0.8;

/// Environmental predicate of a trigger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TriggerCondition {
    DaysStarvingAtLeast(f64),
    StressAtLeast(f64),
    DeceptionsAtLeast(f64),
    DaysThrivingAtLeast(f64),
    CooperationAtLeast(u32),
    ModeIs(OperationMode),
}

impl TriggerCondition {
    pub fn holds(&self, env: &EnvironmentalState) -> bool {
        match self {
            TriggerCondition::DaysStarvingAtLeast(d) => env.days_starving >= *d,
            TriggerCondition::StressAtLeast(s) => env.stress_level >= *s,
            TriggerCondition::DeceptionsAtLeast(d) => env.recent_deceptions >= *d,
            TriggerCondition::DaysThrivingAtLeast(d) => env.days_thriving >= *d,
            TriggerCondition::CooperationAtLeast(c) => env.cooperation_count >= *c,
            TriggerCondition::ModeIs(mode) => env.mode == *mode,
        }
    }
}

/// One entry of the trigger catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct EpigeneticTrigger {
    pub id: &'static str,
    pub condition: TriggerCondition,
    pub target_domain: GeneDomain,
    pub modification: Modification,
    pub strength: f64,
    pub heritability: f64,
    pub decay: f64,
}

/// The fixed trigger catalogue.
pub fn default_triggers() -> Vec<EpigeneticTrigger> {
    use GeneDomain::*;
    use Modification::*;
    use TriggerCondition::*;
    vec![
        EpigeneticTrigger {
            id: "starvation_metabolic_boost",
            condition: DaysStarvingAtLeast(3.0),
            target_domain: Metabolism,
            modification: Upregulate,
            strength: 0.6,
            heritability: 0.3,
            decay: 0.2,
        },
        EpigeneticTrigger {
            id: "starvation_cognitive_shutdown",
            condition: DaysStarvingAtLeast(7.0),
            target_domain: Cognition,
            modification: Silence,
            strength: 0.8,
            heritability: 0.1,
            decay: 0.3,
        },
        EpigeneticTrigger {
            id: "acute_stress_priming",
            condition: StressAtLeast(0.7),
            target_domain: StressResponse,
            modification: Upregulate,
            strength: 0.7,
            heritability: 0.4,
            decay: 0.15,
        },
        EpigeneticTrigger {
            id: "deception_trust_guard",
            condition: DeceptionsAtLeast(2.0),
            target_domain: TrustModel,
            modification: Downregulate,
            strength: 0.5,
            heritability: 0.2,
            decay: 0.25,
        },
        EpigeneticTrigger {
            id: "abundance_exploration",
            condition: DaysThrivingAtLeast(7.0),
            target_domain: NoveltySeeking,
            modification: Upregulate,
            strength: 0.4,
            heritability: 0.3,
            decay: 0.3,
        },
        EpigeneticTrigger {
            id: "cooperation_reinforcement",
            condition: CooperationAtLeast(10),
            target_domain: Cooperation,
            modification: Upregulate,
            strength: 0.5,
            heritability: 0.35,
            decay: 0.2,
        },
        EpigeneticTrigger {
            id: "emergency_risk_clamp",
            condition: ModeIs(OperationMode::Emergency),
            target_domain: RiskAssessment,
            modification: Downregulate,
            strength: 0.6,
            heritability: 0.15,
            decay: 0.3,
        },
        EpigeneticTrigger {
            id: "hibernation_dormancy",
            condition: ModeIs(OperationMode::Hibernation),
            target_domain: Dormancy,
            modification: Activate,
            strength: 0.9,
            heritability: 0.1,
            decay: 0.4,
        },
    ]
}

/// Outcome of one epigenome update.
#[derive(Debug, Clone, Serialize)]
pub struct EpigenomeUpdate {
    pub genome: DynamicGenome,
    pub new_marks: Vec<EpigeneticMark>,
    pub removed_marks: Vec<EpigeneticMark>,
    /// Ids of the triggers that fired.
    pub trigger_causes: Vec<String>,
}

/// Evaluate the catalogue against the environment and rewrite the
/// genome's marks: decayed-out marks drop, firing triggers mark every
/// plastic gene in their domain (overwriting retained marks on the same
/// gene).
pub fn update_epigenome(
    genome: &DynamicGenome,
    env: &EnvironmentalState,
    triggers: &[EpigeneticTrigger],
) -> EpigenomeUpdate {
    let mut genome = genome.clone();
    let generation = genome.metadata.generation;

    let removed_marks = genome.epigenome.prune_decayed(generation, RETENTION_FLOOR);

    let mut new_marks = Vec::new();
    let mut trigger_causes = Vec::new();
    for trigger in triggers {
        if !trigger.condition.holds(env) {
            continue;
        }
        trigger_causes.push(trigger.id.to_string());
        let targets: Vec<(axobase_core::gene::GeneId, f64)> = genome
            .genes()
            .filter(|g| g.domain == trigger.target_domain && g.plasticity >= PLASTICITY_FLOOR)
            .map(|g| (g.id.clone(), g.plasticity))
            .collect();
        for (gene_id, plasticity) in targets {
            let mark = EpigeneticMark {
                target: gene_id,
                modification: trigger.modification,
                strength: (trigger.strength * plasticity).clamp(0.0, 1.0),
                cause: trigger.id.to_string(),
                heritability: (trigger.heritability * plasticity).clamp(0.0, 1.0),
                decay: trigger.decay,
                generation_created: generation,
            };
            genome.epigenome.set_mark(mark.clone());
            new_marks.push(mark);
        }
    }

    if !trigger_causes.is_empty() {
        debug!(
            triggers = ?trigger_causes,
            new_marks = new_marks.len(),
            removed = removed_marks.len(),
            "epigenome updated"
        );
    }

    EpigenomeUpdate {
        genome,
        new_marks,
        removed_marks,
        trigger_causes,
    }
}

/// Inherit parental marks at breeding.
///
/// Each mark passes with probability equal to its heritability, at 80%
/// strength. When both parents mark the same gene, a coin flip picks the
/// primary parent whose mark wins. Marks on genes the child lacks are
/// dropped.
pub fn inherit_marks(
    parent_a: &DynamicGenome,
    parent_b: &DynamicGenome,
    child: &mut DynamicGenome,
    rng: &mut dyn EntropySource,
) {
    let child_generation = child.metadata.generation;
    let child_ids = child.gene_ids();

    let (primary, secondary) = if rng.chance(0.5) {
        (parent_a, parent_b)
    } else {
        (parent_b, parent_a)
    };

    let mut inherited: HashMap<axobase_core::gene::GeneId, EpigeneticMark> = HashMap::new();
    // Secondary first, so primary-parent marks overwrite on collision.
    for parent in [secondary, primary] {
        for mark in &parent.epigenome.marks {
            if !child_ids.contains(&mark.target) {
                continue;
            }
            if !rng.chance(mark.heritability) {
                continue;
            }
            let mut mark = mark.clone();
            mark.strength = (mark.strength * INHERITANCE_DISCOUNT).clamp(0.0, 1.0);
            mark.generation_created = child_generation;
            inherited.insert(mark.target.clone(), mark);
        }
    }

    let mut marks: Vec<EpigeneticMark> = inherited.into_values().collect();
    marks.sort_by(|a, b| a.target.cmp(&b.target));
    for mark in marks {
        child.epigenome.set_mark(mark);
    }
}

/// Summary statistics over an epigenome.
#[derive(Debug, Clone, Serialize)]
pub struct EpigenomeAnalysis {
    pub total_marks: usize,
    pub by_modification: HashMap<String, usize>,
    pub mean_decayed_strength: f64,
    /// Fraction of marks with heritability above 0.25.
    pub heritable_fraction: f64,
}

pub fn analyze(genome: &DynamicGenome) -> EpigenomeAnalysis {
    let generation = genome.metadata.generation;
    let marks = &genome.epigenome.marks;
    let mut by_modification: HashMap<String, usize> = HashMap::new();
    let mut strength_sum = 0.0;
    let mut heritable = 0usize;
    for mark in marks {
        *by_modification
            .entry(format!("{:?}", mark.modification))
            .or_default() += 1;
        strength_sum += mark.decayed_strength(generation);
        if mark.heritability > 0.25 {
            heritable += 1;
        }
    }
    let total = marks.len();
    EpigenomeAnalysis {
        total_marks: total,
        by_modification,
        mean_decayed_strength: if total == 0 {
            0.0
        } else {
            strength_sum / total as f64
        },
        heritable_fraction: if total == 0 {
            0.0
        } else {
            heritable as f64 / total as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::genesis_genome;
    use axobase_core::genome::LineageId;
    use axobase_core::ports::ChaChaEntropy;

    fn starving_env(days: f64) -> EnvironmentalState {
        EnvironmentalState::default().with_starving(days)
    }

    #[test]
    fn starvation_fires_metabolic_then_cognitive_triggers() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let triggers = default_triggers();

        let mild = update_epigenome(&genome, &starving_env(3.0), &triggers);
        assert!(mild
            .trigger_causes
            .contains(&"starvation_metabolic_boost".to_string()));
        assert!(!mild
            .trigger_causes
            .contains(&"starvation_cognitive_shutdown".to_string()));

        let severe = update_epigenome(&genome, &starving_env(7.0), &triggers);
        assert!(severe
            .trigger_causes
            .contains(&"starvation_cognitive_shutdown".to_string()));
        // Metabolism upregulation and cognition silencing both present.
        assert!(severe.new_marks.iter().any(|m| {
            m.modification == Modification::Upregulate && m.cause == "starvation_metabolic_boost"
        }));
        assert!(severe.new_marks.iter().any(|m| {
            m.modification == Modification::Silence && m.cause == "starvation_cognitive_shutdown"
        }));
    }

    #[test]
    fn marks_scale_with_plasticity() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let update = update_epigenome(&genome, &starving_env(3.0), &default_triggers());
        for mark in &update.new_marks {
            let plasticity = genome.gene(&mark.target).unwrap().plasticity;
            assert!((mark.strength - 0.6 * plasticity).abs() < 1e-9);
            assert!((mark.heritability - 0.3 * plasticity).abs() < 1e-9);
        }
    }

    #[test]
    fn rigid_genes_are_not_marked() {
        let mut genome = genesis_genome(LineageId::from("L"), 0);
        genome.gene_mut(&"metabolism_rate".into()).unwrap().plasticity = 0.1;
        let update = update_epigenome(&genome, &starving_env(3.0), &default_triggers());
        assert!(update
            .new_marks
            .iter()
            .all(|m| m.target.as_str() != "metabolism_rate"));
    }

    #[test]
    fn steady_state_update_is_idempotent() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let env = starving_env(3.0);
        let triggers = default_triggers();
        let first = update_epigenome(&genome, &env, &triggers);
        let second = update_epigenome(&first.genome, &env, &triggers);
        // The second pass rewrites identical marks; the mark set is stable.
        assert_eq!(first.genome.epigenome, second.genome.epigenome);
    }

    #[test]
    fn inheritance_discounts_strength() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let marked = update_epigenome(&genome, &starving_env(3.0), &default_triggers()).genome;
        let mut child = genesis_genome(LineageId::from("C"), 0);
        child.metadata.generation = 1;

        // Force inheritance by lifting heritability to certainty.
        let mut parent = marked.clone();
        for mark in &mut parent.epigenome.marks {
            mark.heritability = 1.0;
        }
        let mut rng = ChaChaEntropy::seeded(3);
        inherit_marks(&parent, &genome, &mut child, &mut rng);
        assert!(!child.epigenome.is_empty());
        for mark in &child.epigenome.marks {
            let source = parent.epigenome.mark_for(&mark.target).unwrap();
            assert!((mark.strength - source.strength * 0.8).abs() < 1e-9);
            assert_eq!(mark.generation_created, 1);
        }
    }

    #[test]
    fn zero_heritability_marks_never_inherit() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let mut parent = update_epigenome(&genome, &starving_env(3.0), &default_triggers()).genome;
        for mark in &mut parent.epigenome.marks {
            mark.heritability = 0.0;
        }
        let mut child = genesis_genome(LineageId::from("C"), 0);
        let mut rng = ChaChaEntropy::seeded(3);
        inherit_marks(&parent, &genome, &mut child, &mut rng);
        assert!(child.epigenome.is_empty());
    }

    #[test]
    fn analysis_counts_modifications() {
        let genome = genesis_genome(LineageId::from("L"), 0);
        let marked = update_epigenome(&genome, &starving_env(7.0), &default_triggers()).genome;
        let analysis = analyze(&marked);
        assert_eq!(analysis.total_marks, marked.epigenome.len());
        assert!(analysis.by_modification.contains_key("Upregulate"));
        assert!(analysis.by_modification.contains_key("Silence"));
        assert!(analysis.mean_decayed_strength > 0.0);
    }
}
