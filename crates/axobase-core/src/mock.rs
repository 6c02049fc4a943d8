//! Mock port implementations for tests and demos.
//!
//! Published from the library (not behind `cfg(test)`) so downstream
//! crates can drive the engine without any real external services.

use crate::error::{AxobaseError, Result};
use crate::genome::LineageId;
use crate::ports::{
    AgentId, Balances, Clock, Ledger, LanguageModel, Messaging, PermanentStorage, ThinkOptions,
    Wallet,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Wallet with settable balances.
pub struct MockWallet {
    balances: Mutex<Balances>,
    fail: Mutex<bool>,
}

impl MockWallet {
    pub fn new(native: f64, stable: f64) -> Self {
        Self {
            balances: Mutex::new(Balances { native, stable }),
            fail: Mutex::new(false),
        }
    }

    pub fn set_balances(&self, native: f64, stable: f64) {
        *self.balances.lock().unwrap() = Balances { native, stable };
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn balances(&self, _address: &str) -> Result<Balances> {
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("wallet", "mock failure"));
        }
        Ok(*self.balances.lock().unwrap())
    }
}

/// Language model that returns a canned response, optionally after a delay.
pub struct MockLlm {
    response: Mutex<String>,
    delay: Mutex<Option<Duration>>,
    fail: Mutex<bool>,
    calls: Mutex<Vec<String>>,
}

impl MockLlm {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(response.into()),
            delay: Mutex::new(None),
            fail: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn set_response(&self, response: impl Into<String>) {
        *self.response.lock().unwrap() = response.into();
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Prompts received so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockLlm {
    async fn think(&self, prompt: &str, _options: &ThinkOptions) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("llm", "mock failure"));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Records every inscription.
#[derive(Default)]
pub struct MockStorage {
    inscriptions: Mutex<Vec<(String, usize, usize, String)>>,
    fail: Mutex<bool>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// `(genome_hash, thought_count, transaction_count, summary)` tuples.
    pub fn inscriptions(&self) -> Vec<(String, usize, usize, String)> {
        self.inscriptions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermanentStorage for MockStorage {
    async fn daily_inscribe(
        &self,
        genome_hash: &str,
        thoughts: &[String],
        transactions: &[String],
        summary: &str,
    ) -> Result<String> {
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("permanent-storage", "mock failure"));
        }
        let mut log = self.inscriptions.lock().unwrap();
        log.push((
            genome_hash.to_string(),
            thoughts.len(),
            transactions.len(),
            summary.to_string(),
        ));
        Ok(format!("inscription-{}", log.len()))
    }
}

/// Records broadcasts and direct messages.
#[derive(Default)]
pub struct MockMessaging {
    broadcasts: Mutex<Vec<String>>,
    messages: Mutex<Vec<(AgentId, String)>>,
    fail: Mutex<bool>,
}

impl MockMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn broadcasts(&self) -> Vec<String> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(AgentId, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messaging for MockMessaging {
    async fn broadcast(&self, message: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("messaging", "mock failure"));
        }
        self.broadcasts.lock().unwrap().push(message.to_string());
        Ok(())
    }

    async fn send_message(&self, peer: &AgentId, message: &str) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("messaging", "mock failure"));
        }
        self.messages
            .lock()
            .unwrap()
            .push((*peer, message.to_string()));
        Ok(())
    }

    async fn record_cooperation(&self, _peer: &AgentId, _interactions: u32) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(AxobaseError::port("messaging", "mock failure"));
        }
        Ok(())
    }
}

/// Records ledger events.
#[derive(Default)]
pub struct MockLedger {
    events: Mutex<Vec<String>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, kind: &str, lineage: &LineageId) -> Result<String> {
        let mut events = self.events.lock().unwrap();
        events.push(format!("{kind}:{lineage}"));
        Ok(format!("{kind}-{}", events.len()))
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn register_birth(&self, lineage: &LineageId, _genome_hash: &str) -> Result<String> {
        self.record("birth", lineage)
    }

    async fn update_genome(&self, lineage: &LineageId, _genome_hash: &str) -> Result<String> {
        self.record("update", lineage)
    }

    async fn record_death(&self, lineage: &LineageId, _genome_hash: &str) -> Result<String> {
        self.record("death", lineage)
    }
}

/// Manually advanced clock for deterministic timing tests.
pub struct FixedClock {
    wall: AtomicU64,
    monotonic: AtomicU64,
}

impl FixedClock {
    pub fn at(wall_millis: u64) -> Self {
        Self {
            wall: AtomicU64::new(wall_millis),
            monotonic: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.wall.fetch_add(millis, Ordering::SeqCst);
        self.monotonic.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn set_wall(&self, wall_millis: u64) {
        self.wall.store(wall_millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn wall_millis(&self) -> u64 {
        self.wall.load(Ordering::SeqCst)
    }

    fn monotonic_millis(&self) -> u64 {
        self.monotonic.load(Ordering::SeqCst)
    }
}
