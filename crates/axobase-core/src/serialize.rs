//! Versioned genome records and the canonical encoding.
//!
//! A genome travels as `{version: 2, genome, checksum}`. The checksum is
//! the SHA-256 of the *canonical encoding*: chromosomes in declaration
//! order, genes in list order with every numeric field rounded to six
//! decimal places, edges sorted by `(source, target)`, marks sorted by
//! target gene id. The canonical form is byte-for-byte reproducible so
//! genomes round-trip across implementations.

use crate::epigenome::EpigeneticMark;
use crate::error::{AxobaseError, Result};
use crate::genome::DynamicGenome;
use crate::regulatory::RegulatoryEdge;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The current record major version.
pub const RECORD_VERSION: u32 = 2;

/// A versioned, self-describing genome record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeRecord {
    pub version: u32,
    pub genome: DynamicGenome,
    /// Hex SHA-256 of the canonical encoding.
    pub checksum: String,
}

/// Round a float to six decimal places, the canonical precision.
fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

// Canonical mirror types: field order is fixed by declaration, floats are
// pre-rounded, collections pre-sorted. Serialized with serde_json, which
// preserves struct field order.

#[derive(Serialize)]
struct CanonicalGene<'a> {
    id: &'a str,
    name: &'a str,
    domain: String,
    value: f64,
    weight: f64,
    dominance: f64,
    plasticity: f64,
    essentiality: f64,
    metabolic_cost: f64,
    origin: String,
    age: u32,
    duplicate_of: Option<&'a str>,
    acquired_from: Option<&'a str>,
    expression_state: String,
    activation_condition: Option<&'a str>,
}

#[derive(Serialize)]
struct CanonicalChromosome<'a> {
    id: &'a str,
    name: &'a str,
    is_essential: bool,
    genes: Vec<CanonicalGene<'a>>,
}

#[derive(Serialize)]
struct CanonicalEdge<'a> {
    source: &'a str,
    target: &'a str,
    relation: String,
    strength: f64,
    logic: String,
    threshold: Option<f64>,
    cooperativity: Option<f64>,
    phase: Option<f64>,
    period: Option<f64>,
}

#[derive(Serialize)]
struct CanonicalMark<'a> {
    target: &'a str,
    modification: String,
    strength: f64,
    cause: &'a str,
    heritability: f64,
    decay: f64,
    generation_created: u32,
}

#[derive(Serialize)]
struct CanonicalGenome<'a> {
    generation: u32,
    lineage: &'a str,
    chromosomes: Vec<CanonicalChromosome<'a>>,
    edges: Vec<CanonicalEdge<'a>>,
    marks: Vec<CanonicalMark<'a>>,
}

fn tag<T: Serialize>(value: &T) -> String {
    // Enum variants serialize as bare strings; strip the JSON quotes.
    serde_json::to_string(value)
        .unwrap_or_default()
        .trim_matches('"')
        .to_string()
}

/// Produce the canonical JSON encoding of a genome.
pub fn canonical_encoding(genome: &DynamicGenome) -> Result<String> {
    let chromosomes = genome
        .chromosomes
        .iter()
        .map(|c| CanonicalChromosome {
            id: c.id.as_str(),
            name: &c.name,
            is_essential: c.is_essential,
            genes: c
                .genes
                .iter()
                .map(|g| CanonicalGene {
                    id: g.id.as_str(),
                    name: &g.name,
                    domain: tag(&g.domain),
                    value: round6(g.value),
                    weight: round6(g.weight),
                    dominance: round6(g.dominance),
                    plasticity: round6(g.plasticity),
                    essentiality: round6(g.essentiality),
                    metabolic_cost: round6(g.metabolic_cost),
                    origin: tag(&g.origin),
                    age: g.age,
                    duplicate_of: g.duplicate_of.as_ref().map(|d| d.as_str()),
                    acquired_from: g.acquired_from.as_deref(),
                    expression_state: tag(&g.expression_state),
                    activation_condition: g.activation_condition.as_deref(),
                })
                .collect(),
        })
        .collect();

    let mut edges: Vec<&RegulatoryEdge> = genome.regulatory_edges.iter().collect();
    edges.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
    let edges = edges
        .into_iter()
        .map(|e| CanonicalEdge {
            source: e.source.as_str(),
            target: e.target.as_str(),
            relation: tag(&e.relation),
            strength: round6(e.strength),
            logic: tag(&e.logic),
            threshold: e.threshold.map(round6),
            cooperativity: e.cooperativity.map(round6),
            phase: e.phase.map(round6),
            period: e.period.map(round6),
        })
        .collect();

    let mut marks: Vec<&EpigeneticMark> = genome.epigenome.marks.iter().collect();
    marks.sort_by(|a, b| a.target.cmp(&b.target));
    let marks = marks
        .into_iter()
        .map(|m| CanonicalMark {
            target: m.target.as_str(),
            modification: tag(&m.modification),
            strength: round6(m.strength),
            cause: &m.cause,
            heritability: round6(m.heritability),
            decay: round6(m.decay),
            generation_created: m.generation_created,
        })
        .collect();

    let canonical = CanonicalGenome {
        generation: genome.metadata.generation,
        lineage: genome.metadata.lineage.as_str(),
        chromosomes,
        edges,
        marks,
    };
    serde_json::to_string(&canonical).map_err(|e| AxobaseError::Serialization(e.to_string()))
}

/// Hex SHA-256 of the canonical encoding.
pub fn canonical_checksum(genome: &DynamicGenome) -> Result<String> {
    let encoding = canonical_encoding(genome)?;
    let mut hasher = Sha256::new();
    hasher.update(encoding.as_bytes());
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect())
}

/// Wrap a genome into a versioned record.
pub fn encode(genome: &DynamicGenome) -> Result<GenomeRecord> {
    Ok(GenomeRecord {
        version: RECORD_VERSION,
        genome: genome.clone(),
        checksum: canonical_checksum(genome)?,
    })
}

/// Serialize a genome record to JSON.
pub fn to_json(genome: &DynamicGenome) -> Result<String> {
    let record = encode(genome)?;
    serde_json::to_string(&record).map_err(|e| AxobaseError::Serialization(e.to_string()))
}

/// Unwrap a record, checking version and checksum.
pub fn decode(record: GenomeRecord) -> Result<DynamicGenome> {
    if record.version != RECORD_VERSION {
        return Err(AxobaseError::IncompatibleGenome {
            expected: RECORD_VERSION,
            found: record.version,
        });
    }
    let checksum = canonical_checksum(&record.genome)?;
    if checksum != record.checksum {
        return Err(AxobaseError::Serialization(format!(
            "checksum mismatch: expected {}, computed {checksum}",
            record.checksum
        )));
    }
    record.genome.validate()?;
    Ok(record.genome)
}

/// Deserialize a genome record from JSON.
pub fn from_json(json: &str) -> Result<DynamicGenome> {
    // Peek the version before full decoding so foreign majors fail with
    // IncompatibleGenome rather than a shape error.
    #[derive(Deserialize)]
    struct VersionProbe {
        version: u32,
    }
    let probe: VersionProbe = serde_json::from_str(json)
        .map_err(|e| AxobaseError::Serialization(format!("unreadable record: {e}")))?;
    if probe.version != RECORD_VERSION {
        return Err(AxobaseError::IncompatibleGenome {
            expected: RECORD_VERSION,
            found: probe.version,
        });
    }
    let record: GenomeRecord =
        serde_json::from_str(json).map_err(|e| AxobaseError::Serialization(e.to_string()))?;
    decode(record)
}
