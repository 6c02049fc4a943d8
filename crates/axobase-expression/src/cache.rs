//! Expression cache — LRU memo keyed by genome hash and a coarse
//! environment digest.
//!
//! The digest quantises the environment so that near-identical snapshots
//! share an entry: balance in 10-unit buckets, starvation in 2-day
//! buckets, thriving in 7-day buckets, stress into three bands, plus the
//! mode word and a deceived/trusted flag. Two environments with the same
//! digest are contractually interchangeable for expression.
//!
//! The cache is process-local and single-threaded; callers pass the
//! current time explicitly so eviction is deterministic under test.

use crate::engine::{ExpressOptions, ExpressionEngine, ExpressionResult};
use axobase_core::config::CacheConfig;
use axobase_core::environment::EnvironmentalState;
use axobase_core::genome::DynamicGenome;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Coarse digest of an environment: 8 hex characters.
pub fn environment_digest(env: &EnvironmentalState) -> String {
    let balance_bucket = (env.balance / 10.0).floor() as i64;
    let starving_bucket = (env.days_starving / 2.0).floor() as i64;
    let thriving_bucket = (env.days_thriving / 7.0).floor() as i64;
    let stress_band = if env.stress_level < 0.33 {
        "low"
    } else if env.stress_level < 0.66 {
        "med"
    } else {
        "high"
    };
    let trust_flag = if env.recent_deceptions > 0.0 {
        "deceived"
    } else {
        "trusted"
    };
    let raw = format!(
        "b{balance_bucket}|s{starving_bucket}|t{thriving_bucket}|{stress_band}|{}|{trust_flag}",
        env.mode.as_word()
    );
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hasher
        .finalize()
        .iter()
        .take(4)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Cache key: 16 hex characters of genome hash plus the 8-character
/// environment digest.
pub fn cache_key(genome: &DynamicGenome, env: &EnvironmentalState) -> String {
    let hash_prefix: String = genome.metadata.genome_hash.chars().take(16).collect();
    format!("{hash_prefix}{}", environment_digest(env))
}

struct CacheEntry {
    result: ExpressionResult,
    inserted_ms: u64,
    last_access_ms: u64,
    ttl_ms: u64,
    hit_count: u64,
}

/// Hit/miss counters and footprint estimate.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub entries: usize,
    /// Rough footprint: entries × genes × an assumed per-gene size.
    pub estimated_bytes: usize,
}

/// Criteria for selective invalidation. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct InvalidateFilter {
    /// Entries whose key starts with this genome-hash prefix.
    pub genome_hash_prefix: Option<String>,
    /// Entries inserted before `now - older_than_ms`.
    pub older_than_ms: Option<u64>,
    /// Entries with a hit count strictly below this.
    pub low_hit_count: Option<u64>,
}

/// Process-local LRU map from `(genomeHash16 ‖ envDigest8)` to expression
/// results.
pub struct ExpressionCache {
    config: CacheConfig,
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
    expirations: u64,
    last_cleanup_ms: u64,
    /// Keys currently being computed in a batch, for deduplication.
    pending: HashSet<String>,
}

impl ExpressionCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            evictions: 0,
            expirations: 0,
            last_cleanup_ms: 0,
            pending: HashSet::new(),
        }
    }

    /// Look up a key, honouring TTL and bumping recency.
    pub fn get(&mut self, key: &str, now_ms: u64) -> Option<ExpressionResult> {
        let expired = match self.entries.get(key) {
            None => {
                self.misses += 1;
                return None;
            }
            Some(entry) => now_ms.saturating_sub(entry.inserted_ms) > entry.ttl_ms,
        };
        if expired {
            self.entries.remove(key);
            self.expirations += 1;
            self.misses += 1;
            return None;
        }
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access_ms = now_ms;
            entry.hit_count += 1;
            self.hits += 1;
            return Some(entry.result.clone());
        }
        self.misses += 1;
        None
    }

    /// Insert a result, evicting the least recently used entry when full.
    pub fn insert(&mut self, key: String, result: ExpressionResult, now_ms: u64) {
        if self.entries.len() >= self.config.max_size && !self.entries.contains_key(&key) {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access_ms)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&oldest);
                self.evictions += 1;
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                result,
                inserted_ms: now_ms,
                last_access_ms: now_ms,
                ttl_ms: self.config.ttl_ms,
                hit_count: 0,
            },
        );
    }

    /// Express through the cache.
    pub fn express(
        &mut self,
        engine: &ExpressionEngine,
        genome: &DynamicGenome,
        env: &EnvironmentalState,
        opts: &ExpressOptions,
        now_ms: u64,
    ) -> ExpressionResult {
        self.maybe_cleanup(now_ms);
        let key = cache_key(genome, env);
        if let Some(result) = self.get(&key, now_ms) {
            return result;
        }
        let result = engine.express(genome, env, opts);
        self.insert(key, result.clone(), now_ms);
        result
    }

    /// Express a batch, computing each distinct key exactly once. Requests
    /// that collide on a key share the first computation's result.
    pub fn express_batch(
        &mut self,
        engine: &ExpressionEngine,
        requests: &[(&DynamicGenome, &EnvironmentalState, &ExpressOptions)],
        now_ms: u64,
    ) -> Vec<ExpressionResult> {
        self.maybe_cleanup(now_ms);
        let mut results: Vec<ExpressionResult> = Vec::with_capacity(requests.len());
        let mut computed: HashMap<String, usize> = HashMap::new();

        for (genome, env, opts) in requests {
            let key = cache_key(genome, env);
            if let Some(&first) = computed.get(&key) {
                let shared = results[first].clone();
                results.push(shared);
                continue;
            }
            computed.insert(key.clone(), results.len());
            if let Some(result) = self.get(&key, now_ms) {
                results.push(result);
                continue;
            }
            // Register the pending computation so a re-entrant batch on the
            // same key would observe it.
            self.pending.insert(key.clone());
            let result = engine.express(genome, env, opts);
            self.pending.remove(&key);
            self.insert(key, result.clone(), now_ms);
            results.push(result);
        }
        results
    }

    /// Remove entries matching every set criterion. Returns how many were
    /// removed.
    pub fn invalidate(&mut self, filter: &InvalidateFilter, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            if let Some(prefix) = &filter.genome_hash_prefix {
                if !key.starts_with(prefix.as_str()) {
                    return true;
                }
            }
            if let Some(age) = filter.older_than_ms {
                if now_ms.saturating_sub(entry.inserted_ms) < age {
                    return true;
                }
            }
            if let Some(min_hits) = filter.low_hit_count {
                if entry.hit_count >= min_hits {
                    return true;
                }
            }
            false
        });
        before - self.entries.len()
    }

    /// Drop expired entries when the cleanup interval has elapsed.
    pub fn maybe_cleanup(&mut self, now_ms: u64) {
        if now_ms.saturating_sub(self.last_cleanup_ms) < self.config.cleanup_interval_ms {
            return;
        }
        self.last_cleanup_ms = now_ms;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now_ms.saturating_sub(e.inserted_ms) <= e.ttl_ms);
        let removed = before - self.entries.len();
        self.expirations += removed as u64;
        if removed > 0 {
            debug!(removed, remaining = self.entries.len(), "expression cache cleanup");
        }
    }

    pub fn stats(&self) -> CacheStats {
        let genes: usize = self
            .entries
            .values()
            .map(|e| e.result.expressed.genes.len())
            .sum();
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            expirations: self.expirations,
            entries: self.entries.len(),
            // ~300 bytes per expressed gene is a fair envelope for the
            // gene copy plus expression fields.
            estimated_bytes: genes * 300,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ExpressionCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axobase_core::chromosome::Chromosome;
    use axobase_core::epigenome::Epigenome;
    use axobase_core::gene::{Gene, GeneDomain};
    use axobase_core::genome::{DynamicGenome, LineageId};

    fn genome(tag: &str) -> DynamicGenome {
        let chr = Chromosome::new("chr", "C", true).with_genes(vec![Gene::new(
            format!("g_{tag}"),
            "G",
            GeneDomain::Metabolism,
        )
        .with_value(0.5)]);
        DynamicGenome::assemble(LineageId::from("L"), 0, 0, vec![chr], vec![], Epigenome::new())
            .unwrap()
    }

    #[test]
    fn digest_quantises_balance() {
        let a = EnvironmentalState::default().with_balance(11.0);
        let b = EnvironmentalState::default().with_balance(19.0);
        let c = EnvironmentalState::default().with_balance(21.0);
        assert_eq!(environment_digest(&a), environment_digest(&b));
        assert_ne!(environment_digest(&b), environment_digest(&c));
    }

    #[test]
    fn digest_separates_modes_and_deception() {
        use axobase_core::environment::OperationMode;
        let normal = EnvironmentalState::default();
        let emergency = EnvironmentalState::default().with_mode(OperationMode::Emergency);
        assert_ne!(environment_digest(&normal), environment_digest(&emergency));

        let mut deceived = EnvironmentalState::default();
        deceived.recent_deceptions = 1.0;
        assert_ne!(environment_digest(&normal), environment_digest(&deceived));
    }

    #[test]
    fn second_lookup_hits() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::default();
        let g = genome("a");
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();

        cache.express(&engine, &g, &env, &opts, 1_000);
        cache.express(&engine, &g, &env, &opts, 2_000);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn entries_expire_after_ttl() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::new(CacheConfig {
            ttl_ms: 1_000,
            ..Default::default()
        });
        let g = genome("a");
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();

        cache.express(&engine, &g, &env, &opts, 0);
        cache.express(&engine, &g, &env, &opts, 5_000);
        assert_eq!(cache.stats().misses, 2);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn lru_evicts_oldest_access() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::new(CacheConfig {
            max_size: 2,
            ..Default::default()
        });
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();
        let (a, b, c) = (genome("a"), genome("b"), genome("c"));

        cache.express(&engine, &a, &env, &opts, 1);
        cache.express(&engine, &b, &env, &opts, 2);
        // Touch `a` so `b` becomes the least recently used.
        cache.express(&engine, &a, &env, &opts, 3);
        cache.express(&engine, &c, &env, &opts, 4);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&cache_key(&b, &env), 5).is_none());
        assert!(cache.get(&cache_key(&a, &env), 5).is_some());
    }

    #[test]
    fn batch_deduplicates_identical_requests() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::default();
        let g = genome("a");
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();

        let requests = vec![(&g, &env, &opts), (&g, &env, &opts), (&g, &env, &opts)];
        let results = cache.express_batch(&engine, &requests, 1_000);
        assert_eq!(results.len(), 3);
        // One computation; the rest shared it without counting as hits.
        assert_eq!(cache.stats().entries, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn invalidate_by_prefix() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::default();
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();
        let (a, b) = (genome("a"), genome("b"));

        cache.express(&engine, &a, &env, &opts, 1);
        cache.express(&engine, &b, &env, &opts, 2);
        let prefix: String = a.metadata.genome_hash.chars().take(16).collect();
        let removed = cache.invalidate(
            &InvalidateFilter {
                genome_hash_prefix: Some(prefix),
                ..Default::default()
            },
            3,
        );
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_low_hit_entries() {
        let engine = ExpressionEngine::default();
        let mut cache = ExpressionCache::default();
        let env = EnvironmentalState::default();
        let opts = ExpressOptions::default();
        let (a, b) = (genome("a"), genome("b"));

        cache.express(&engine, &a, &env, &opts, 1);
        cache.express(&engine, &a, &env, &opts, 2); // one hit for `a`
        cache.express(&engine, &b, &env, &opts, 3);
        let removed = cache.invalidate(
            &InvalidateFilter {
                low_hit_count: Some(1),
                ..Default::default()
            },
            4,
        );
        assert_eq!(removed, 1);
        assert!(cache.get(&cache_key(&a, &env), 5).is_some());
    }
}
