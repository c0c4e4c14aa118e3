//! Response cache for generated myths.
//!
//! [`ResponseCache`] maps a request [`Fingerprint`] to a previously generated
//! [`MythArtifact`], bounding duplicate calls to the completion API.
//!
//! # Architecture
//!
//! The cache is owned by [`MythService`](crate::service::MythService) and sits
//! above the [`MythGenerator`](crate::generator::MythGenerator): a hit skips
//! moderation, prompting and generation entirely. Hit/miss metrics are
//! emitted here.
//!
//! # Expiry
//!
//! Entries carry their insertion time from an injected [`Clock`]. A `get`
//! on an entry older than the TTL is a miss; the stale entry stays in place
//! until the next `put` for the same fingerprint overwrites it. moka's own
//! time-to-live and capacity bound evict abandoned entries in the
//! background.
//!
//! # Concurrency
//!
//! Reads and writes are safe from any number of tasks. There is no
//! single-flight: two concurrent misses for the same fingerprint both
//! generate, and the later `put` wins.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;

use super::clock::{Clock, SystemClock};
use crate::telemetry;
use crate::types::{CultureChoice, MythArtifact};

/// Configuration for the response cache.
///
/// ```rust
/// # use mythweaver::cache::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .ttl(Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of cached entries.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Stable key identifying equivalent requests.
///
/// Derived from the sanitized scenario, the *requested* culture (so `auto`
/// and an explicit tag are distinct keys) and the tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Uses `DefaultHasher` (SipHash with fixed keys): deterministic within
    /// a build, which is all a process-local cache needs.
    pub fn of(scenario: &str, culture: CultureChoice, tone: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        scenario.hash(&mut hasher);
        culture.as_str().hash(&mut hasher);
        tone.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A cached artifact and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub artifact: MythArtifact,
    pub created_at: Instant,
}

/// In-memory TTL cache of generated myths.
pub struct ResponseCache {
    cache: Cache<Fingerprint, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create a cache on the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self {
            cache,
            ttl: config.ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry. Expired entries behave as misses.
    pub async fn get(&self, key: &Fingerprint) -> Option<MythArtifact> {
        let now = self.clock.now();
        match self.cache.get(key).await {
            Some(entry) if now.saturating_duration_since(entry.created_at) < self.ttl => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                Some(entry.artifact)
            }
            _ => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
        }
    }

    /// Store (or overwrite) the artifact for `key`.
    pub async fn put(&self, key: Fingerprint, artifact: MythArtifact) {
        let entry = CacheEntry {
            artifact,
            created_at: self.clock.now(),
        };
        self.cache.insert(key, entry).await;
    }

    /// Approximate number of stored entries, stale ones included.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
