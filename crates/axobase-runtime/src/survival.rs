//! The survival loop — one cooperative task per agent.
//!
//! Per cycle: query balances, derive the mode, refresh the environment,
//! express through the cache, update the epigenome, decide, execute, and
//! maintain the counters. Balances below the hibernation threshold for a
//! full cycle kill the agent: final inscription, ledger death record,
//! task exit. A daily boundary on the UTC wall clock inscribes the
//! accumulated thoughts and transactions; failed inscriptions retry at
//! the next boundary with the payload intact.

use crate::agent::{AgentState, AgentStatus};
use crate::executor::ActionExecutor;
use crate::memory::MemoryStore;
use crate::perception::build_perception;
use crate::vitals::{derive_mode, EnvironmentTracker};
use axobase_core::config::{
    BalanceThresholds, CacheConfig, CycleConfig, DecisionConfig, ExpressionConfig,
};
use axobase_core::environment::OperationMode;
use axobase_core::error::{AxobaseError, Result};
use axobase_core::ports::AgentPorts;
use axobase_decision::{Decision, DecisionEngine, Opportunity};
use axobase_expression::{ExpressOptions, ExpressionCache, ExpressionEngine};
use axobase_genetics::epigenetics::{default_triggers, update_epigenome, EpigeneticTrigger};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

/// Loop-level configuration; every field has a contractual default.
#[derive(Debug, Clone)]
pub struct SurvivalConfig {
    pub thresholds: BalanceThresholds,
    pub cycle: CycleConfig,
    pub decision: DecisionConfig,
    pub expression: ExpressionConfig,
    pub cache: CacheConfig,
    /// Tool capabilities granted by the surrounding system.
    pub available_tools: HashSet<String>,
    /// Aggregate market risk supplied by the surrounding system.
    pub market_risk: f64,
}

impl Default for SurvivalConfig {
    fn default() -> Self {
        Self {
            thresholds: BalanceThresholds::default(),
            cycle: CycleConfig::default(),
            decision: DecisionConfig::default(),
            expression: ExpressionConfig::default(),
            cache: CacheConfig::default(),
            available_tools: HashSet::new(),
            market_risk: 0.2,
        }
    }
}

/// Counters mirrored into status reports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurvivalStats {
    pub cycles: u64,
    pub mode_switches: u64,
    pub decisions: u64,
    pub actions_failed: u64,
    pub inscriptions: u64,
    pub started_wall_ms: u64,
}

/// What one cycle produced.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: u64,
    pub mode: OperationMode,
    pub balance: f64,
    pub decision: Option<Decision>,
    pub died: bool,
    pub next_interval_ms: u64,
}

/// Cooperative stop handle; the task exits before its next suspension
/// returns.
pub struct SurvivalHandle {
    stop_tx: watch::Sender<bool>,
}

impl SurvivalHandle {
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }
}

/// One agent's survival task. Owns the genome, cache, memory, and
/// trackers exclusively; all shared state is behind ports.
pub struct SurvivalLoop {
    state: AgentState,
    ports: AgentPorts,
    config: SurvivalConfig,
    engine: ExpressionEngine,
    cache: ExpressionCache,
    decisions: DecisionEngine,
    triggers: Vec<EpigeneticTrigger>,
    tracker: EnvironmentTracker,
    memory: MemoryStore,
    executor: ActionExecutor,
    stats: SurvivalStats,
    opportunities: Vec<Opportunity>,
    last_inscribed_day: u64,
    cycles_below_hibernation: u32,
    stop_rx: watch::Receiver<bool>,
}

impl SurvivalLoop {
    pub fn new(state: AgentState, ports: AgentPorts, config: SurvivalConfig) -> (Self, SurvivalHandle) {
        let (stop_tx, stop_rx) = watch::channel(false);
        let decisions = DecisionEngine::new(ports.llm.clone(), ports.clock.clone(), config.decision);
        let current_day = ports.clock.utc_day();
        let started = ports.clock.wall_millis();
        let survival = Self {
            executor: ActionExecutor::new(ports.clone()),
            engine: ExpressionEngine::new(config.expression),
            cache: ExpressionCache::new(config.cache),
            decisions,
            triggers: default_triggers(),
            tracker: EnvironmentTracker::new(),
            memory: MemoryStore::new(),
            stats: SurvivalStats {
                started_wall_ms: started,
                ..Default::default()
            },
            opportunities: Vec::new(),
            last_inscribed_day: current_day,
            cycles_below_hibernation: 0,
            state,
            ports,
            config,
            stop_rx,
        };
        (survival, SurvivalHandle { stop_tx })
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn stats(&self) -> &SurvivalStats {
        &self.stats
    }

    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }

    /// Surface an opportunity for the next decision.
    pub fn offer_opportunity(&mut self, description: impl Into<String>, estimated_value: f64) {
        self.opportunities.push(Opportunity {
            description: description.into(),
            estimated_value,
        });
    }

    /// Startup checks: wallet reachability, initial mode, birth
    /// registration, best-effort birth announcement.
    pub async fn startup(&mut self) -> Result<()> {
        let balances = self.ports.wallet.balances(&self.state.address).await?;
        let mode = derive_mode(&balances, &self.config.thresholds);
        self.tracker.observe_balances(&balances, mode);
        info!(
            agent = %self.state.id,
            native = balances.native,
            stable = balances.stable,
            mode = %mode,
            "agent starting"
        );
        if balances.stable < self.config.thresholds.hibernation {
            warn!(stable = balances.stable, "starting below the hibernation threshold");
        }

        self.ports
            .ledger
            .register_birth(
                &self.state.genome.metadata.lineage,
                &self.state.genome.metadata.genome_hash,
            )
            .await?;

        let announcement = format!(
            "agent {} awakened; generation {}, {} genes",
            self.state.id,
            self.state.genome.metadata.generation,
            self.state.genome.metadata.total_genes
        );
        if let Err(e) = self.ports.messaging.broadcast(&announcement).await {
            // Messaging is best-effort everywhere.
            warn!(error = %e, "birth announcement failed");
        }
        Ok(())
    }

    /// One full survival cycle.
    pub async fn tick(&mut self) -> Result<CycleReport> {
        let cycle = self.state.cycle;

        // 1. Balances. A wallet failure aborts the tick with the previous
        // status preserved.
        let balances = self
            .ports
            .wallet
            .balances(&self.state.address)
            .await
            .map_err(|e| {
                warn!(error = %e, cycle, "wallet unreachable; tick aborted");
                e
            })?;

        // 2. Mode.
        let previous_mode = self.tracker.env().mode;
        let mode = derive_mode(&balances, &self.config.thresholds);
        if mode != previous_mode && cycle > 0 {
            self.stats.mode_switches += 1;
            warn!(
                agent = %self.state.id,
                from = %previous_mode,
                to = %mode,
                stable = balances.stable,
                "operating mode switched"
            );
        }

        // 3. Environment snapshot.
        self.tracker.observe_balances(&balances, mode);
        let env = self.tracker.env().clone();

        // 4. Expression, through the cache.
        let now_wall = self.ports.clock.wall_millis();
        let opts = ExpressOptions {
            age_days: self.state.age_days(now_wall),
            wall_millis: now_wall,
            interactions: Vec::new(),
        };
        let expression = self
            .cache
            .express(&self.engine, &self.state.genome, &env, &opts, now_wall);

        // 5. Epigenome update; the stored genome is replaced.
        let update = update_epigenome(&self.state.genome, &env, &self.triggers);
        self.state.genome = update.genome;

        // 6. Perceive and decide.
        let perception = build_perception(
            &self.state,
            &env,
            &expression,
            &self.memory,
            &self.config.available_tools,
            self.config.market_risk,
            std::mem::take(&mut self.opportunities),
            &self.config.cycle,
        );
        let decision = match self.decisions.decide(&perception).await {
            Ok(decision) => {
                self.stats.decisions += 1;
                Some(decision)
            }
            Err(AxobaseError::RateLimited { wait_ms }) => {
                info!(wait_ms, "decision rate limited; skipping this cycle");
                None
            }
            Err(e) => {
                warn!(error = %e, "decision failed; skipping this cycle");
                None
            }
        };

        // 7. Execute; errors are logged and the loop continues.
        if let Some(decision) = &decision {
            let outcome = self.executor.execute(&self.state, decision).await;
            if !outcome.success {
                self.stats.actions_failed += 1;
            }
            if let Some(thought) = &outcome.thought {
                self.memory.note_thought(thought.clone());
            }
            self.memory.record_outcome(&decision.selected_strategy, outcome.success);
            self.memory.record_event(
                format!("{}: {}", decision.selected_strategy, outcome.detail),
                Some(outcome.success),
            );
        }

        // 8. Counters.
        let runway = perception.runway_days();
        self.tracker.after_cycle(runway);

        // 9. Death check: a full cycle below the hibernation threshold.
        let below = balances.stable < self.config.thresholds.hibernation;
        let died = below && self.cycles_below_hibernation >= 1;
        self.cycles_below_hibernation = if below {
            self.cycles_below_hibernation + 1
        } else {
            0
        };
        if died {
            self.die().await;
        }

        self.state.cycle += 1;
        self.stats.cycles += 1;

        let speed = expression.expressed.value_of("cycle_speed").min(1.0);
        Ok(CycleReport {
            cycle,
            mode,
            balance: balances.stable,
            decision,
            died,
            next_interval_ms: self.config.cycle.interval_ms(speed),
        })
    }

    /// Inscribe the daily payload when the UTC day has rolled over.
    /// Failures keep the payload for the next boundary.
    pub async fn maybe_daily_inscription(&mut self) {
        let day = self.ports.clock.utc_day();
        if day <= self.last_inscribed_day {
            return;
        }
        let (thoughts, transactions) = self.memory.daily_payload();
        let summary = format!(
            "day {day}: cycle {}, mode {}",
            self.state.cycle,
            self.tracker.env().mode
        );
        match self
            .ports
            .storage
            .daily_inscribe(
                &self.state.genome.metadata.genome_hash,
                thoughts,
                transactions,
                &summary,
            )
            .await
        {
            Ok(record) => {
                info!(record, day, "daily inscription complete");
                self.memory.clear_daily();
                self.last_inscribed_day = day;
                self.stats.inscriptions += 1;
            }
            Err(e) => {
                warn!(error = %e, day, "daily inscription failed; will retry at next boundary");
            }
        }
    }

    async fn die(&mut self) {
        warn!(agent = %self.state.id, cycle = self.state.cycle, "agent died of starvation");
        self.state.status = AgentStatus::Dead;
        let (thoughts, transactions) = self.memory.daily_payload();
        if let Err(e) = self
            .ports
            .storage
            .daily_inscribe(
                &self.state.genome.metadata.genome_hash,
                thoughts,
                transactions,
                &format!("death at cycle {}", self.state.cycle),
            )
            .await
        {
            warn!(error = %e, "death inscription failed");
        }
        if let Err(e) = self
            .ports
            .ledger
            .record_death(
                &self.state.genome.metadata.lineage,
                &self.state.genome.metadata.genome_hash,
            )
            .await
        {
            warn!(error = %e, "death record failed");
        }
    }

    /// Graceful shutdown: one final best-effort inscription.
    async fn shutdown(&mut self) {
        if self.state.status == AgentStatus::Dead {
            return;
        }
        let (thoughts, transactions) = self.memory.daily_payload();
        match self
            .ports
            .storage
            .daily_inscribe(
                &self.state.genome.metadata.genome_hash,
                thoughts,
                transactions,
                &format!("shutdown at cycle {}", self.state.cycle),
            )
            .await
        {
            Ok(record) => {
                info!(record, "final inscription complete");
                self.memory.clear_daily();
            }
            Err(e) => warn!(error = %e, "final inscription failed"),
        }
    }

    /// Run until death or stop. Errors inside a cycle are logged and the
    /// next cycle is scheduled.
    pub async fn run(mut self) -> AgentState {
        loop {
            if *self.stop_rx.borrow() {
                break;
            }
            let interval = match self.tick().await {
                Ok(report) if report.died => break,
                Ok(report) => report.next_interval_ms,
                Err(e) => {
                    warn!(error = %e, "cycle aborted; scheduling the next one");
                    self.config.cycle.normal_ms
                }
            };
            self.maybe_daily_inscription().await;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(interval)) => {}
                _ = self.stop_rx.changed() => {}
            }
        }
        self.shutdown().await;
        self.state
    }
}
