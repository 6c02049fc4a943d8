//! Developmental modulation — life stage and critical windows.
//!
//! Agent age in days maps to a stage with fixed per-domain expression
//! multipliers. Critical windows add a plasticity-scaled boost while open:
//! a fully plastic gene gets the whole window multiplier, a rigid gene
//! none of it.

use axobase_core::gene::{Gene, GeneDomain};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DevelopmentalStage {
    Neonate,
    Juvenile,
    Adult,
    Senescent,
}

impl DevelopmentalStage {
    /// `[0,7)` neonate, `[7,30)` juvenile, `[30,90)` adult, `[90,∞)`
    /// senescent.
    pub fn for_age(age_days: f64) -> Self {
        if age_days < 7.0 {
            DevelopmentalStage::Neonate
        } else if age_days < 30.0 {
            DevelopmentalStage::Juvenile
        } else if age_days < 90.0 {
            DevelopmentalStage::Adult
        } else {
            DevelopmentalStage::Senescent
        }
    }

    /// Fixed per-stage expression multiplier for a domain.
    pub fn domain_modifier(&self, domain: GeneDomain) -> f64 {
        use GeneDomain::*;
        match self {
            DevelopmentalStage::Neonate => match domain {
                Learning | Cooperation => 1.3,
                Metabolism => 0.8,
                _ => 1.0,
            },
            DevelopmentalStage::Juvenile => match domain {
                Adaptation | NoveltySeeking => 1.3,
                Planning => 0.8,
                _ => 1.0,
            },
            DevelopmentalStage::Adult => match domain {
                MateSelection | ParentalInvestment => 1.3,
                _ => 1.0,
            },
            DevelopmentalStage::Senescent => match domain {
                StressResponse | Metabolism | Memory => 0.85,
                _ => 1.0,
            },
        }
    }
}

/// Plasticity multiplier of the critical window open at this age for this
/// domain, or 1.0 when none is.
pub fn critical_window_multiplier(age_days: f64, domain: GeneDomain) -> f64 {
    // (domain, open_from, open_until, multiplier)
    const WINDOWS: [(GeneDomain, f64, f64, f64); 4] = [
        (GeneDomain::Learning, 0.0, 7.0, 1.5),
        (GeneDomain::Cooperation, 0.0, 14.0, 1.4),
        (GeneDomain::MateSelection, 3.0, 21.0, 1.3),
        (GeneDomain::RiskAssessment, 7.0, 30.0, 1.2),
    ];
    for (d, from, until, mult) in WINDOWS {
        if d == domain && age_days >= from && age_days < until {
            return mult;
        }
    }
    1.0
}

/// Combined developmental modifier for one gene: the stage modifier, with
/// any open critical window scaled by the gene's plasticity.
pub fn developmental_modifier(age_days: f64, gene: &Gene) -> f64 {
    let stage = DevelopmentalStage::for_age(age_days);
    let base = stage.domain_modifier(gene.domain);
    let window = critical_window_multiplier(age_days, gene.domain);
    base * (1.0 + (window - 1.0) * gene.plasticity)
}
