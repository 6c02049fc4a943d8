//! Epistasis — gene-on-gene interactions applied after composition.
//!
//! Each interaction gates on the epistatic gene's post-composition value
//! and modifies the hypostatic gene (or both, for synergy). Interactions
//! apply in list order.

use axobase_core::gene::GeneId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpistaticRelationship {
    /// The epistatic gene masks the hypostatic one when expressed.
    Dominant,
    /// The epistatic gene masks only when barely expressed itself.
    Recessive,
    /// A strongly expressed epistatic gene forces the hypostatic to zero.
    Suppressive,
    /// Both genes boost each other.
    Synergistic,
    /// The hypostatic gene is reduced in proportion to the epistatic one.
    Antagonistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpistaticInteraction {
    pub epistatic: GeneId,
    pub hypostatic: GeneId,
    pub relationship: EpistaticRelationship,
    /// How fully the interaction manifests. Range `[0, 1]`.
    pub penetrance: f64,
}

impl EpistaticInteraction {
    pub fn new(
        epistatic: impl Into<GeneId>,
        hypostatic: impl Into<GeneId>,
        relationship: EpistaticRelationship,
        penetrance: f64,
    ) -> Self {
        Self {
            epistatic: epistatic.into(),
            hypostatic: hypostatic.into(),
            relationship,
            penetrance: penetrance.clamp(0.0, 1.0),
        }
    }
}

/// Gene ids forced to silenced by suppressive interactions in the last
/// [`apply`] call.
pub struct EpistasisOutcome {
    pub suppressed: Vec<GeneId>,
}

/// Apply interactions in order to post-composition expression values.
/// Unknown gene ids are skipped.
pub fn apply(
    values: &mut HashMap<GeneId, f64>,
    interactions: &[EpistaticInteraction],
) -> EpistasisOutcome {
    let mut suppressed = Vec::new();
    for ix in interactions {
        let Some(&epi) = values.get(&ix.epistatic) else {
            continue;
        };
        if !values.contains_key(&ix.hypostatic) {
            continue;
        }
        let p = ix.penetrance;
        match ix.relationship {
            EpistaticRelationship::Dominant => {
                if epi > 0.5 {
                    scale(values, &ix.hypostatic, 1.0 - 0.7 * p);
                }
            }
            EpistaticRelationship::Recessive => {
                if epi < 0.2 {
                    scale(values, &ix.hypostatic, 1.0 - 0.5 * p);
                }
            }
            EpistaticRelationship::Suppressive => {
                if epi > 0.5 {
                    values.insert(ix.hypostatic.clone(), 0.0);
                    suppressed.push(ix.hypostatic.clone());
                }
            }
            EpistaticRelationship::Synergistic => {
                if epi > 0.3 {
                    let boost = 1.0 + 0.3 * p;
                    scale(values, &ix.hypostatic, boost);
                    scale(values, &ix.epistatic, boost);
                }
            }
            EpistaticRelationship::Antagonistic => {
                let factor = 1.0 - 0.4 * p * epi.min(1.0);
                scale(values, &ix.hypostatic, factor.max(0.0));
            }
        }
    }
    EpistasisOutcome { suppressed }
}

fn scale(values: &mut HashMap<GeneId, f64>, id: &GeneId, factor: f64) {
    if let Some(v) = values.get_mut(id) {
        *v = (*v * factor).clamp(0.0, 3.0);
    }
}
