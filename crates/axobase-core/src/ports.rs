//! Ports — the narrow capability traits the core consumes.
//!
//! Everything outside the evolutionary core (wallet, language model,
//! permanent storage, messaging, ledger contracts, clock, entropy) is
//! reached through one of these traits. Implementations are injected into
//! constructors; the core never touches ambient singletons, ambient time,
//! or ambient randomness.

use crate::error::Result;
use crate::genome::LineageId;
use async_trait::async_trait;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a live agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Deterministic id for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self(Uuid::from_u64_pair(seed, seed.wrapping_mul(0x9e3779b97f4a7c15)))
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Balances returned by the wallet port.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    /// Native token (gas surrogate).
    pub native: f64,
    /// Stable unit the metabolic economy runs in.
    pub stable: f64,
}

/// Wallet port: balance queries only. Transaction signing lives behind the
/// action executor, not here.
#[async_trait]
pub trait Wallet: Send + Sync {
    async fn balances(&self, address: &str) -> Result<Balances>;
}

/// Sampling options for a language-model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThinkOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ThinkOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Language-model port: a single bounded-latency completion call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn think(&self, prompt: &str, options: &ThinkOptions) -> Result<String>;
}

/// Permanent-storage port: one inscription per day plus the death record.
#[async_trait]
pub trait PermanentStorage: Send + Sync {
    /// Returns the opaque record id of the inscription.
    async fn daily_inscribe(
        &self,
        genome_hash: &str,
        thoughts: &[String],
        transactions: &[String],
        summary: &str,
    ) -> Result<String>;
}

/// Messaging port: all operations are best-effort.
#[async_trait]
pub trait Messaging: Send + Sync {
    async fn broadcast(&self, message: &str) -> Result<()>;
    async fn send_message(&self, peer: &AgentId, message: &str) -> Result<()>;
    async fn record_cooperation(&self, peer: &AgentId, interactions: u32) -> Result<()>;
}

/// Ledger port: opaque to the core except the returned record ids.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn register_birth(&self, lineage: &LineageId, genome_hash: &str) -> Result<String>;
    async fn update_genome(&self, lineage: &LineageId, genome_hash: &str) -> Result<String>;
    async fn record_death(&self, lineage: &LineageId, genome_hash: &str) -> Result<String>;
}

/// Clock port: wall clock for oscillators and daily boundaries, monotonic
/// time for rate limiting.
pub trait Clock: Send + Sync {
    fn wall_millis(&self) -> u64;
    fn monotonic_millis(&self) -> u64;

    /// UTC day number of the current wall clock, for daily-boundary
    /// detection.
    fn utc_day(&self) -> u64 {
        self.wall_millis() / 86_400_000
    }
}

/// System clock backed by chrono and `std::time::Instant`.
pub struct SystemClock {
    started: std::time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn wall_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }

    fn monotonic_millis(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Entropy port: every probabilistic operator draws from one injected
/// generator so tests can seed it.
pub trait EntropySource: Send {
    /// Uniform draw from `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    fn next_bytes(&mut self, n: usize) -> Vec<u8>;

    /// Uniform draw from `[lo, hi)`.
    fn next_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index below `n`. `n` must be nonzero.
    fn next_index(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    /// Bernoulli trial with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// ChaCha20-backed entropy source: cryptographically strong and fully
/// seedable for reproducible breeding.
pub struct ChaChaEntropy {
    rng: ChaCha20Rng,
}

impl ChaChaEntropy {
    /// Deterministic source from a 64-bit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating-system entropy.
    pub fn from_os_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }
}

impl EntropySource for ChaChaEntropy {
    fn next_f64(&mut self) -> f64 {
        // 53 bits of mantissa, the standard uniform-double construction.
        (self.rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut buf = vec![0u8; n];
        self.rng.fill_bytes(&mut buf);
        buf
    }
}

/// Bundle of shared ports handed to an agent at construction.
#[derive(Clone)]
pub struct AgentPorts {
    pub wallet: Arc<dyn Wallet>,
    pub llm: Arc<dyn LanguageModel>,
    pub storage: Arc<dyn PermanentStorage>,
    pub messaging: Arc<dyn Messaging>,
    pub ledger: Arc<dyn Ledger>,
    pub clock: Arc<dyn Clock>,
}
