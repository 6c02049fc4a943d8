//! End-to-end engine properties across the whole workspace.

use axobase::prelude::*;

#[test]
fn genesis_shape_and_hash_portability() {
    let a = genesis_genome(LineageId::from("L"), 0);
    assert_eq!(a.metadata.total_genes, 63);
    assert_eq!(a.metadata.generation, 0);
    assert_eq!(a.chromosomes.len(), 8);

    // Structural hashes ignore lineage, so genesis hashes are portable.
    let b = genesis_genome(LineageId::from("another"), 12345);
    assert_eq!(a.metadata.genome_hash, b.metadata.genome_hash);
}

#[test]
fn genome_roundtrips_through_the_versioned_record() {
    let genome = genesis_genome(LineageId::from("L"), 0);
    let json = to_json(&genome).unwrap();
    let restored = from_json(&json).unwrap();
    assert_eq!(restored, genome);
}

#[test]
fn silenced_target_ignores_activation() {
    // A regulator at full strength cannot express a silenced target.
    let mut genome = genesis_genome(LineageId::from("L"), 0);
    genome
        .gene_mut(&GeneId::from("agent_cooperation"))
        .unwrap()
        .expression_state = ExpressionState::Silenced;

    let engine = ExpressionEngine::default();
    let result = engine.express(
        &genome,
        &EnvironmentalState::default(),
        &ExpressOptions::default(),
    );
    assert_eq!(result.expressed.value_of("agent_cooperation"), 0.0);
    // Its regulator still expresses.
    assert!(result.expressed.value_of("social_context_regulator") > 0.0);
}

#[test]
fn metabolic_cost_has_structural_floor() {
    let genome = genesis_genome(LineageId::from("L"), 0);
    let engine = ExpressionEngine::default();
    let config = ExpressionConfig::default();
    let result = engine.express(
        &genome,
        &EnvironmentalState::default(),
        &ExpressOptions::default(),
    );
    let floor = config.base_rate + genome.gene_count() as f64 * config.per_gene_overhead;
    assert!(result.expressed.total_metabolic_cost >= floor);
    for gene in &result.expressed.genes {
        assert!((0.0..=3.0).contains(&gene.expressed_value));
    }
}

#[test]
fn breeding_through_the_coordinator_respects_the_inbreeding_gate() {
    let mut coordinator = EvolutionCoordinator::default();
    let a = genesis_genome(LineageId::from("A"), 0);
    let b = genesis_genome(LineageId::from("B"), 0);
    let mut rng = ChaChaEntropy::seeded(7);
    let refused = coordinator.execute_breeding(a, b, "a", "b", "child", 0.1, false, &mut rng);
    assert!(matches!(refused, Err(AxobaseError::Inbreeding(_))));
}

#[test]
fn adaptive_rates_derive_from_the_base() {
    let metrics = PopulationMetrics {
        average_fitness: 0.5,
        fitness_variance: 0.02,
        genetic_diversity: 0.5,
        generation: 3,
        fitness_history: vec![0.2, 0.3, 0.4, 0.5, 0.6],
    };
    let rates = calculate_adaptive_rates(&metrics, 0.2, MutationRates::default().point);
    assert!((rates.duplication - rates.base * 1.5).abs() < 1e-12);
    assert!((rates.structural - rates.base * 0.3).abs() < 1e-12);
    assert!((rates.hgt - rates.base * 0.5).abs() < 1e-12);
    assert!(rates.base >= 0.005 && rates.base <= 0.30);
}

#[test]
fn horizontal_transfer_requires_earned_trust() {
    let donor = genesis_genome(LineageId::from("D"), 0);
    let mut recipient = genesis_genome(LineageId::from("R"), 0);
    let rates = MutationRates {
        hgt: 1.0,
        ..Default::default()
    };
    let mut rng = ChaChaEntropy::seeded(3);

    let strangers = CooperationRecord {
        hours: 1.0,
        interactions: 1,
    };
    assert!(horizontal_transfer(
        &mut recipient,
        &donor,
        "donor",
        &strangers,
        &rates,
        &mut rng
    )
    .is_none());

    let allies = CooperationRecord {
        hours: 100.0,
        interactions: 40,
    };
    let record = horizontal_transfer(&mut recipient, &donor, "donor", &allies, &rates, &mut rng);
    assert!(record.is_some());
    assert_eq!(recipient.gene_count(), 64);
}

#[tokio::test]
async fn a_full_tick_against_mock_ports() {
    use std::sync::Arc;

    let ports = AgentPorts {
        wallet: Arc::new(MockWallet::new(1.0, 25.0)),
        llm: Arc::new(MockLlm::new(
            "STRATEGY_ID: conserve-and-wait\nCONFIDENCE: 0.7\nREASONING: saving up\nRISK_ASSESSMENT: low",
        )),
        storage: Arc::new(MockStorage::new()),
        messaging: Arc::new(MockMessaging::new()),
        ledger: Arc::new(MockLedger::new()),
        clock: Arc::new(FixedClock::at(86_400_000)),
    };
    let genome = genesis_genome(LineageId::from("tick"), 0);
    let state = AgentState::new(AgentId::from_seed(4), "0xtick", genome, 86_400_000);
    let (mut survival, _handle) = SurvivalLoop::new(state, ports, SurvivalConfig::default());

    survival.startup().await.unwrap();
    let report = survival.tick().await.unwrap();
    assert_eq!(report.mode, OperationMode::Normal);
    assert!(!report.died);
    assert!(report.next_interval_ms >= 5 * 60 * 1000);
}
