//! Dynamic genome — chromosomes, regulatory edges, epigenome, metadata.
//!
//! Invariants maintained by every mutating operation:
//!
//! 1. every regulatory edge references existing gene ids
//! 2. gene ids are unique across the genome
//! 3. essential chromosomes retain at least one gene
//! 4. the genome hash is a function of the gene-id sequences and the edge
//!    `source->target` strings only
//!
//! Cross-gene references (`duplicate_of`, `acquired_from`, edges) are plain
//! lookup keys; there are no pointer cycles.

use crate::chromosome::{Chromosome, ChromosomeId};
use crate::epigenome::Epigenome;
use crate::error::{AxobaseError, Result};
use crate::gene::{Gene, GeneId};
use crate::regulatory::RegulatoryEdge;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fmt;

/// Identifier of a lineage (a line of descent across breedings).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineageId(pub String);

impl LineageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LineageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Genome-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeMetadata {
    pub generation: u32,
    pub lineage: LineageId,
    /// Hex-encoded 256-bit structural hash; see [`DynamicGenome::compute_hash`].
    pub genome_hash: String,
    pub total_genes: usize,
    pub birth_timestamp_ms: u64,
}

/// A complete variable-length genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicGenome {
    pub metadata: GenomeMetadata,
    pub chromosomes: Vec<Chromosome>,
    pub regulatory_edges: Vec<RegulatoryEdge>,
    pub epigenome: Epigenome,
}

impl DynamicGenome {
    /// Assemble a genome from parts, recomputing gene count and hash, and
    /// validating the invariants.
    pub fn assemble(
        lineage: LineageId,
        generation: u32,
        birth_timestamp_ms: u64,
        chromosomes: Vec<Chromosome>,
        regulatory_edges: Vec<RegulatoryEdge>,
        epigenome: Epigenome,
    ) -> Result<Self> {
        let mut genome = Self {
            metadata: GenomeMetadata {
                generation,
                lineage,
                genome_hash: String::new(),
                total_genes: 0,
                birth_timestamp_ms,
            },
            chromosomes,
            regulatory_edges,
            epigenome,
        };
        genome.recompute();
        genome.validate()?;
        Ok(genome)
    }

    // --- Lookup ---

    pub fn chromosome(&self, id: &ChromosomeId) -> Option<&Chromosome> {
        self.chromosomes.iter().find(|c| &c.id == id)
    }

    pub fn chromosome_mut(&mut self, id: &ChromosomeId) -> Option<&mut Chromosome> {
        self.chromosomes.iter_mut().find(|c| &c.id == id)
    }

    pub fn gene(&self, id: &GeneId) -> Option<&Gene> {
        self.chromosomes.iter().find_map(|c| c.gene(id))
    }

    pub fn gene_mut(&mut self, id: &GeneId) -> Option<&mut Gene> {
        self.chromosomes.iter_mut().find_map(|c| c.gene_mut(id))
    }

    /// Find a gene by its human name (seed genes have `id == name`).
    pub fn gene_by_name(&self, name: &str) -> Option<&Gene> {
        self.genes().find(|g| g.name == name || g.id.as_str() == name)
    }

    pub fn genes(&self) -> impl Iterator<Item = &Gene> {
        self.chromosomes.iter().flat_map(|c| c.genes.iter())
    }

    pub fn genes_mut(&mut self) -> impl Iterator<Item = &mut Gene> {
        self.chromosomes.iter_mut().flat_map(|c| c.genes.iter_mut())
    }

    pub fn gene_count(&self) -> usize {
        self.chromosomes.iter().map(|c| c.len()).sum()
    }

    pub fn gene_ids(&self) -> HashSet<GeneId> {
        self.genes().map(|g| g.id.clone()).collect()
    }

    pub fn contains_gene(&self, id: &GeneId) -> bool {
        self.chromosomes.iter().any(|c| c.contains(id))
    }

    // --- Mutation with invariants checked ---

    /// Add a gene to a chromosome. Fails if the gene id already exists or
    /// the chromosome is unknown.
    pub fn add_gene(&mut self, chromosome: &ChromosomeId, gene: Gene) -> Result<()> {
        if self.contains_gene(&gene.id) {
            return Err(AxobaseError::invariant(format!(
                "duplicate gene id '{}'",
                gene.id
            )));
        }
        let chr = self
            .chromosome_mut(chromosome)
            .ok_or_else(|| AxobaseError::invariant(format!("unknown chromosome '{chromosome}'")))?;
        chr.genes.push(gene);
        self.recompute();
        Ok(())
    }

    /// Remove a gene. Fails when removal would empty an essential
    /// chromosome. Dangling edges and marks referencing the gene are
    /// dropped alongside it.
    pub fn remove_gene(&mut self, id: &GeneId) -> Result<Gene> {
        let chr = self
            .chromosomes
            .iter_mut()
            .find(|c| c.contains(id))
            .ok_or_else(|| AxobaseError::invariant(format!("unknown gene '{id}'")))?;
        if chr.is_essential && chr.len() == 1 {
            return Err(AxobaseError::invariant(format!(
                "removing '{id}' would empty essential chromosome '{}'",
                chr.id
            )));
        }
        let idx = chr
            .genes
            .iter()
            .position(|g| &g.id == id)
            .ok_or_else(|| AxobaseError::invariant(format!("unknown gene '{id}'")))?;
        let gene = chr.genes.remove(idx);
        self.regulatory_edges
            .retain(|e| &e.source != id && &e.target != id);
        self.epigenome.remove_mark(id);
        self.recompute();
        Ok(gene)
    }

    /// Add a regulatory edge. Fails if either endpoint does not resolve.
    pub fn add_edge(&mut self, edge: RegulatoryEdge) -> Result<()> {
        if !self.contains_gene(&edge.source) {
            return Err(AxobaseError::invariant(format!(
                "edge source '{}' does not resolve",
                edge.source
            )));
        }
        if !self.contains_gene(&edge.target) {
            return Err(AxobaseError::invariant(format!(
                "edge target '{}' does not resolve",
                edge.target
            )));
        }
        self.regulatory_edges.push(edge);
        self.recompute();
        Ok(())
    }

    /// Remove dangling edges and marks after bulk structural surgery.
    pub fn drop_dangling_references(&mut self) {
        let ids = self.gene_ids();
        self.regulatory_edges
            .retain(|e| ids.contains(&e.source) && ids.contains(&e.target));
        self.epigenome.marks.retain(|m| ids.contains(&m.target));
    }

    /// Refresh derived metadata (gene count and structural hash).
    pub fn recompute(&mut self) {
        self.metadata.total_genes = self.gene_count();
        self.metadata.genome_hash = self.compute_hash();
    }

    /// The structural hash: SHA-256 over the chromosome gene-id sequences
    /// and the sorted edge `source->target` strings. Numeric fields and
    /// edge order do not participate.
    pub fn compute_hash(&self) -> String {
        let chrom_part: Vec<String> = self
            .chromosomes
            .iter()
            .map(|c| {
                c.gene_ids()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();
        let mut edge_part: Vec<String> = self
            .regulatory_edges
            .iter()
            .map(|e| e.hash_token())
            .collect();
        edge_part.sort();

        let mut hasher = Sha256::new();
        hasher.update(chrom_part.join(";").as_bytes());
        hasher.update(b"|");
        hasher.update(edge_part.join(",").as_bytes());
        let digest = hasher.finalize();
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<&GeneId> = HashSet::new();
        for gene in self.genes() {
            if !seen.insert(&gene.id) {
                return Err(AxobaseError::invariant(format!(
                    "duplicate gene id '{}'",
                    gene.id
                )));
            }
        }
        for edge in &self.regulatory_edges {
            if !seen.contains(&edge.source) {
                return Err(AxobaseError::invariant(format!(
                    "edge source '{}' does not resolve",
                    edge.source
                )));
            }
            if !seen.contains(&edge.target) {
                return Err(AxobaseError::invariant(format!(
                    "edge target '{}' does not resolve",
                    edge.target
                )));
            }
        }
        for chr in &self.chromosomes {
            if chr.is_essential && chr.is_empty() {
                return Err(AxobaseError::invariant(format!(
                    "essential chromosome '{}' is empty",
                    chr.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::GeneDomain;
    use crate::regulatory::RegulatoryRelation;

    fn tiny_genome() -> DynamicGenome {
        let chr = Chromosome::new("chr_a", "A", true).with_genes(vec![
            Gene::new("g1", "G1", GeneDomain::Metabolism),
            Gene::new("g2", "G2", GeneDomain::Cognition),
        ]);
        let extra = Chromosome::new("chr_b", "B", false)
            .with_genes(vec![Gene::new("g3", "G3", GeneDomain::Trading)]);
        DynamicGenome::assemble(
            LineageId::from("L"),
            0,
            0,
            vec![chr, extra],
            vec![RegulatoryEdge::new(
                "g1",
                "g2",
                RegulatoryRelation::Activation,
                0.5,
            )],
            Epigenome::new(),
        )
        .unwrap()
    }

    #[test]
    fn hash_ignores_numeric_fields() {
        let mut a = tiny_genome();
        let before = a.metadata.genome_hash.clone();
        a.gene_mut(&GeneId::from("g1")).unwrap().value = 0.123;
        a.regulatory_edges[0].set_strength(0.9);
        a.recompute();
        assert_eq!(a.metadata.genome_hash, before);
    }

    #[test]
    fn hash_ignores_edge_order_but_not_gene_order() {
        let mut a = tiny_genome();
        a.add_edge(RegulatoryEdge::new(
            "g2",
            "g1",
            RegulatoryRelation::Inhibition,
            0.3,
        ))
        .unwrap();
        let hash_fwd = a.metadata.genome_hash.clone();
        a.regulatory_edges.reverse();
        a.recompute();
        assert_eq!(a.metadata.genome_hash, hash_fwd);

        a.chromosomes[0].genes.reverse();
        a.recompute();
        assert_ne!(a.metadata.genome_hash, hash_fwd);
    }

    #[test]
    fn add_gene_rejects_duplicate_ids() {
        let mut g = tiny_genome();
        let dup = Gene::new("g1", "Dup", GeneDomain::Trading);
        assert!(g.add_gene(&ChromosomeId::from("chr_b"), dup).is_err());
    }

    #[test]
    fn add_edge_rejects_dangling_endpoints() {
        let mut g = tiny_genome();
        let e = RegulatoryEdge::new("g1", "ghost", RegulatoryRelation::Activation, 0.5);
        assert!(g.add_edge(e).is_err());
    }

    #[test]
    fn remove_gene_cascades_edges() {
        let mut g = tiny_genome();
        g.remove_gene(&GeneId::from("g2")).unwrap();
        assert!(g.regulatory_edges.is_empty());
        assert_eq!(g.metadata.total_genes, 2);
    }

    #[test]
    fn essential_chromosome_cannot_be_emptied() {
        let mut g = tiny_genome();
        g.remove_gene(&GeneId::from("g1")).unwrap();
        let err = g.remove_gene(&GeneId::from("g2"));
        assert!(err.is_err());
        // The non-essential chromosome can lose its last gene.
        assert!(g.remove_gene(&GeneId::from("g3")).is_ok());
    }

    #[test]
    fn hash_is_64_hex_chars() {
        let g = tiny_genome();
        assert_eq!(g.metadata.genome_hash.len(), 64);
        assert!(g.metadata.genome_hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
