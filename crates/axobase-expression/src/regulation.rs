//! Regulatory network solver — iterate gene regulation to a fixed point.
//!
//! Incoming edges are grouped by logic tag at each target and combined
//! into one multiplier per gene, clamped to `[0.05, 3.0]`. The solver
//! sweeps genes in ascending id order (Gauss-Seidel style, so results are
//! identical across implementations) for up to ten rounds or until the
//! largest multiplier change falls below the convergence threshold.

use axobase_core::config::ExpressionConfig;
use axobase_core::error::ExpressionWarning;
use axobase_core::gene::GeneId;
use axobase_core::genome::DynamicGenome;
use axobase_core::regulatory::{
    RegulatoryEdge, RegulatoryLogic, RegulatoryRelation, DEFAULT_COOPERATIVITY, DEFAULT_THRESHOLD,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Clamp bounds for the per-gene regulatory multiplier.
pub const MULTIPLIER_MIN: f64 = 0.05;
pub const MULTIPLIER_MAX: f64 = 3.0;

/// Hill function `xⁿ / (θⁿ + xⁿ)`.
pub fn hill(x: f64, theta: f64, n: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let xn = x.powf(n);
    xn / (theta.powf(n) + xn)
}

/// Oscillator value `(sin(2π·t/period + phase) + 1) / 2`.
pub fn oscillation(wall_millis: u64, period_ms: f64, phase: f64) -> f64 {
    let period = if period_ms > 0.0 { period_ms } else { 86_400_000.0 };
    ((2.0 * PI * wall_millis as f64 / period + phase).sin() + 1.0) / 2.0
}

/// Outcome of the fixed-point iteration.
pub struct RegulationOutcome {
    /// Final multiplier per gene id.
    pub multipliers: HashMap<GeneId, f64>,
    pub iterations: u32,
    pub warning: Option<ExpressionWarning>,
}

/// Contribution of one edge group at one target.
fn group_factor(
    logic: RegulatoryLogic,
    edges: &[&RegulatoryEdge],
    values: &HashMap<GeneId, f64>,
    wall_millis: u64,
) -> f64 {
    let src = |e: &RegulatoryEdge| values.get(&e.source).copied().unwrap_or(0.0);

    match logic {
        RegulatoryLogic::Additive | RegulatoryLogic::Multiplicative => edges
            .iter()
            .map(|e| match e.relation {
                RegulatoryRelation::Activation => 1.0 + e.strength * src(e) * 0.3,
                RegulatoryRelation::Inhibition => (1.0 - e.strength * src(e)).max(0.1),
            })
            .product(),
        RegulatoryLogic::Threshold => edges
            .iter()
            .map(|e| {
                let theta = e.threshold.unwrap_or(DEFAULT_THRESHOLD);
                let n = e.cooperativity.unwrap_or(DEFAULT_COOPERATIVITY);
                let h = hill(src(e), theta, n);
                match e.relation {
                    RegulatoryRelation::Activation => 1.0 + e.strength * h,
                    RegulatoryRelation::Inhibition => (1.0 - e.strength * h).max(0.1),
                }
            })
            .product(),
        RegulatoryLogic::Oscillator => edges
            .iter()
            .map(|e| {
                let osc = oscillation(
                    wall_millis,
                    e.period.unwrap_or(86_400_000.0),
                    e.phase.unwrap_or(0.0),
                );
                match e.relation {
                    RegulatoryRelation::Activation => 1.0 + e.strength * osc * 0.5,
                    RegulatoryRelation::Inhibition => (1.0 - e.strength * osc * 0.5).max(0.1),
                }
            })
            .product(),
        RegulatoryLogic::And => {
            let activators: Vec<_> = edges
                .iter()
                .filter(|e| e.relation == RegulatoryRelation::Activation)
                .collect();
            let inhibitor_factor: f64 = edges
                .iter()
                .filter(|e| e.relation == RegulatoryRelation::Inhibition)
                .map(|e| (1.0 - e.strength * src(e)).max(0.1))
                .product();
            // Activators contribute only when every one of them is on.
            let all_on = !activators.is_empty() && activators.iter().all(|e| src(e) > 0.3);
            let activator_factor: f64 = if all_on {
                activators
                    .iter()
                    .map(|e| 1.0 + e.strength * src(e) * 0.3)
                    .product()
            } else {
                1.0
            };
            activator_factor * inhibitor_factor
        }
        RegulatoryLogic::Or => {
            let best = edges
                .iter()
                .filter(|e| e.relation == RegulatoryRelation::Activation)
                .map(|e| e.strength * src(e))
                .fold(0.0_f64, f64::max);
            let inhibitor_factor: f64 = edges
                .iter()
                .filter(|e| e.relation == RegulatoryRelation::Inhibition)
                .map(|e| (1.0 - e.strength * src(e)).max(0.1))
                .product();
            (1.0 + best * 0.3) * inhibitor_factor
        }
        RegulatoryLogic::Nand => {
            let activators: Vec<_> = edges
                .iter()
                .filter(|e| e.relation == RegulatoryRelation::Activation)
                .collect();
            if !activators.is_empty() && activators.iter().all(|e| src(e) > 0.3) {
                return 0.0;
            }
            let best = activators
                .iter()
                .map(|e| e.strength * src(e))
                .fold(0.0_f64, f64::max);
            1.0 + 0.5 * best * 0.3
        }
    }
}

/// Solve for the regulatory multipliers.
///
/// `base_values` holds the pre-regulation expression of every gene;
/// silenced genes must already be zero there, which makes their outgoing
/// influence zero.
pub fn solve(
    genome: &DynamicGenome,
    base_values: &HashMap<GeneId, f64>,
    wall_millis: u64,
    config: &ExpressionConfig,
) -> RegulationOutcome {
    // Ascending id order fixes the sweep order across implementations.
    let mut gene_ids: Vec<GeneId> = base_values.keys().cloned().collect();
    gene_ids.sort();

    let mut incoming: HashMap<&GeneId, Vec<&RegulatoryEdge>> = HashMap::new();
    for edge in &genome.regulatory_edges {
        incoming.entry(&edge.target).or_default().push(edge);
    }

    let mut multipliers: HashMap<GeneId, f64> =
        gene_ids.iter().map(|id| (id.clone(), 1.0)).collect();
    let mut values: HashMap<GeneId, f64> = base_values.clone();

    let mut iterations = 0;
    let mut residual: f64 = 0.0;
    for round in 1..=config.max_regulatory_iterations {
        iterations = round;
        residual = 0.0;
        for id in &gene_ids {
            let Some(edges) = incoming.get(id) else {
                continue;
            };
            // Group incoming edges by logic tag, preserving edge-list order
            // within each group.
            let mut groups: Vec<(RegulatoryLogic, Vec<&RegulatoryEdge>)> = Vec::new();
            for edge in edges {
                match groups.iter_mut().find(|(l, _)| *l == edge.logic) {
                    Some((_, group)) => group.push(edge),
                    None => groups.push((edge.logic, vec![edge])),
                }
            }
            let mut multiplier = 1.0;
            for (logic, group) in &groups {
                multiplier *= group_factor(*logic, group, &values, wall_millis);
            }
            let multiplier = multiplier.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX);

            let previous = multipliers[id];
            residual = residual.max((multiplier - previous).abs());
            multipliers.insert(id.clone(), multiplier);
            let base = base_values[id];
            values.insert(id.clone(), base * multiplier);
        }
        if residual < config.convergence_threshold {
            return RegulationOutcome {
                multipliers,
                iterations,
                warning: None,
            };
        }
    }

    RegulationOutcome {
        multipliers,
        iterations,
        warning: Some(ExpressionWarning::Convergence {
            iterations,
            residual,
        }),
    }
}

/// Regulatory feedback loops (strongly connected components of size > 1,
/// plus self-loops), for epigenome and network analysis.
pub fn feedback_loops(genome: &DynamicGenome) -> Vec<Vec<GeneId>> {
    let mut graph: DiGraph<GeneId, ()> = DiGraph::new();
    let mut nodes = HashMap::new();
    for gene in genome.genes() {
        let idx = graph.add_node(gene.id.clone());
        nodes.insert(gene.id.clone(), idx);
    }
    for edge in &genome.regulatory_edges {
        if let (Some(&a), Some(&b)) = (nodes.get(&edge.source), nodes.get(&edge.target)) {
            graph.add_edge(a, b, ());
        }
    }
    tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| {
            scc.len() > 1
                || scc
                    .first()
                    .map(|&n| graph.find_edge(n, n).is_some())
                    .unwrap_or(false)
        })
        .map(|scc| scc.into_iter().map(|n| graph[n].clone()).collect())
        .collect()
}
