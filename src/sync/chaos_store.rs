//! A configurable store wrapper for sync fault injection testing.
//!
//! [`ChaosStore`] wraps any [`DocumentStore`] implementation and makes it
//! misbehave on purpose: reads and writes fail with store errors at
//! configured rates, subscriptions can be refused, and delivered snapshots
//! can arrive with their body dropped. Sessions are supposed to survive all
//! of this — failed publishes surface to the caller and nothing retries,
//! while a dropped snapshot reads as "no data right now" — and the tests
//! that prove it run against this wrapper.
//!
//! Failure decisions come from a seeded PCG32 generator, so a given seed
//! always produces the same failure pattern.
//!
//! # Example
//!
//! ```
//! use scorebook::{ChaosConfig, ChaosStore, Config, MemoryStore};
//!
//! struct LeagueConfig;
//! impl Config for LeagueConfig {
//!     type PlayerId = String;
//!     type TeamId = String;
//!     type UserId = String;
//! }
//!
//! let config = ChaosConfig {
//!     write_failure_rate: 0.25,
//!     seed: Some(42), // deterministic failure pattern
//!     ..ChaosConfig::passthrough()
//! };
//! let store = ChaosStore::new(MemoryStore::<LeagueConfig>::new(), config);
//! # let _ = store;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::sync::documents::MetadataPatch;
use crate::sync::store::{
    CollectionPath, DocPath, DocumentBody, DocumentSnapshot, DocumentStore, SnapshotObserver,
    SubscriptionId, WriteStamp,
};
use crate::{Config, ScorebookError, ScorebookResult};

// PCG32 (XSH-RR variant): 64 bits of state, 32-bit output, period 2^64.
// A tiny local generator keeps `rand` and its transitive tree out of the
// dependency graph; statistical quality is far beyond what failure
// injection needs. Reference: <https://www.pcg-random.org/>
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;
const PCG_MULTIPLIER: u64 = 6364136223846793005;

struct Pcg32 {
    state: u64,
    inc: u64,
}

impl Pcg32 {
    fn seed_from_u64(seed: u64) -> Self {
        let inc = (PCG_DEFAULT_INCREMENT << 1) | 1;
        let mut pcg = Pcg32 { state: 0, inc };
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(seed);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform in `[0, 1)` from the top 53 bits of two draws.
    fn next_f64(&mut self) -> f64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        let bits = ((high << 32) | low) >> 11;
        bits as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// One failure decision at `rate`. Rates at the extremes never touch the
/// generator, so passthrough stores stay deterministic regardless of call
/// count.
fn roll(rng: &Mutex<Pcg32>, rate: f64) -> bool {
    if rate <= 0.0 {
        false
    } else if rate >= 1.0 {
        true
    } else {
        rng.lock().next_f64() < rate
    }
}

/// Configuration for store fault injection.
///
/// All rates default to `0.0` (no effect) and clamp to `[0.0, 1.0]` at the
/// point of use. With no seed, one is derived from the wall clock at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChaosConfig {
    /// Probability that a `get` or `list` fails with a store error.
    pub read_failure_rate: f64,

    /// Probability that a `set`, `merge_metadata`, or `delete` fails with a
    /// store error. Failed writes never reach the inner store.
    pub write_failure_rate: f64,

    /// Probability that a `subscribe` call is refused.
    pub subscribe_failure_rate: f64,

    /// Probability that a delivered snapshot has its body dropped, arriving
    /// as "document has no data". Missing snapshots pass through unchanged.
    pub snapshot_drop_rate: f64,

    /// Seed for the failure generator (default: derived from the clock).
    pub seed: Option<u64>,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        ChaosConfig {
            read_failure_rate: 0.0,
            write_failure_rate: 0.0,
            subscribe_failure_rate: 0.0,
            snapshot_drop_rate: 0.0,
            seed: None,
        }
    }
}

impl ChaosConfig {
    /// A config that injects nothing (passthrough mode).
    #[must_use]
    pub fn passthrough() -> Self {
        ChaosConfig::default()
    }

    /// A config where reads and writes both fail at `rate`.
    #[must_use]
    pub fn flaky(rate: f64) -> Self {
        ChaosConfig {
            read_failure_rate: rate,
            write_failure_rate: rate,
            ..ChaosConfig::default()
        }
    }
}

/// Counters for injected faults, kept per store instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChaosStats {
    /// `get`/`list` calls attempted.
    pub reads_attempted: u64,
    /// `get`/`list` calls failed by injection.
    pub reads_failed: u64,
    /// `set`/`merge_metadata`/`delete` calls attempted.
    pub writes_attempted: u64,
    /// `set`/`merge_metadata`/`delete` calls failed by injection.
    pub writes_failed: u64,
    /// `subscribe` calls attempted.
    pub subscribes_attempted: u64,
    /// `subscribe` calls refused by injection.
    pub subscribes_failed: u64,
    /// Delivered snapshots whose body was dropped.
    pub snapshots_dropped: u64,
}

/// A store wrapper that injects configurable faults.
///
/// Every operation consults the failure generator before reaching the
/// wrapped store, so a failed operation leaves the inner store untouched.
/// Snapshot dropping happens on the delivery side: the observer handed to
/// the inner store is wrapped, and a dropped delivery replaces an existing
/// body with a missing one. Rates are consulted per call, so
/// [`set_config`](ChaosStore::set_config) takes effect for live
/// subscriptions too — an "outage" can start and clear mid-test.
pub struct ChaosStore<T, S>
where
    T: Config,
    S: DocumentStore<T>,
{
    inner: S,
    config: Arc<Mutex<ChaosConfig>>,
    rng: Arc<Mutex<Pcg32>>,
    stats: Arc<Mutex<ChaosStats>>,
    marker: PhantomData<T>,
}

/// Clones share the fault switches, generator, and counters. The inner
/// store is cloned per its own semantics; a cloned [`MemoryStore`] shares
/// its documents, so the clone is a second handle onto the same chaos.
///
/// [`MemoryStore`]: crate::MemoryStore
impl<T, S> Clone for ChaosStore<T, S>
where
    T: Config,
    S: DocumentStore<T> + Clone,
{
    fn clone(&self) -> Self {
        ChaosStore {
            inner: self.inner.clone(),
            config: Arc::clone(&self.config),
            rng: Arc::clone(&self.rng),
            stats: Arc::clone(&self.stats),
            marker: PhantomData,
        }
    }
}

impl<T, S> ChaosStore<T, S>
where
    T: Config,
    S: DocumentStore<T>,
{
    /// Wraps `inner` with the given fault configuration.
    pub fn new(inner: S, config: ChaosConfig) -> Self {
        let seed = config.seed.unwrap_or_else(crate::unix_millis_now);
        ChaosStore {
            inner,
            config: Arc::new(Mutex::new(config)),
            rng: Arc::new(Mutex::new(Pcg32::seed_from_u64(seed))),
            stats: Arc::new(Mutex::new(ChaosStats::default())),
            marker: PhantomData,
        }
    }

    /// The wrapped store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Consumes the wrapper and returns the wrapped store.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// A copy of the current fault configuration.
    #[must_use]
    pub fn config(&self) -> ChaosConfig {
        self.config.lock().clone()
    }

    /// Replaces the fault configuration, for this handle and every clone.
    /// The failure generator keeps its current position.
    pub fn set_config(&self, config: ChaosConfig) {
        *self.config.lock() = config;
    }

    /// A copy of the fault counters.
    #[must_use]
    pub fn stats(&self) -> ChaosStats {
        self.stats.lock().clone()
    }

    /// Resets the fault counters to zero.
    pub fn reset_stats(&self) {
        *self.stats.lock() = ChaosStats::default();
    }

    fn should_fail(&self, rate: f64) -> bool {
        roll(&self.rng, rate)
    }

    fn read_rate(&self) -> f64 {
        self.config.lock().read_failure_rate
    }

    fn write_rate(&self) -> f64 {
        self.config.lock().write_failure_rate
    }

    fn injected(operation: &str, detail: &dyn std::fmt::Debug) -> ScorebookError {
        ScorebookError::StoreError {
            context: format!("injected {operation} failure at {detail:?}"),
        }
    }

    fn note_read(&self, failed: bool) {
        let mut stats = self.stats.lock();
        stats.reads_attempted += 1;
        if failed {
            stats.reads_failed += 1;
        }
    }

    fn note_write(&self, failed: bool) {
        let mut stats = self.stats.lock();
        stats.writes_attempted += 1;
        if failed {
            stats.writes_failed += 1;
        }
    }

    fn note_subscribe(&self, failed: bool) {
        let mut stats = self.stats.lock();
        stats.subscribes_attempted += 1;
        if failed {
            stats.subscribes_failed += 1;
        }
    }
}

impl<T, S> DocumentStore<T> for ChaosStore<T, S>
where
    T: Config,
    S: DocumentStore<T>,
{
    fn get(&self, path: &DocPath<T>) -> ScorebookResult<DocumentSnapshot<T>> {
        let failed = self.should_fail(self.read_rate());
        self.note_read(failed);
        if failed {
            warn!(path = ?path, "injected read failure");
            return Err(Self::injected("read", path));
        }
        self.inner.get(path)
    }

    fn set(&self, path: &DocPath<T>, body: DocumentBody<T>) -> ScorebookResult<WriteStamp> {
        let failed = self.should_fail(self.write_rate());
        self.note_write(failed);
        if failed {
            warn!(path = ?path, "injected write failure");
            return Err(Self::injected("write", path));
        }
        self.inner.set(path, body)
    }

    fn merge_metadata(
        &self,
        path: &DocPath<T>,
        patch: MetadataPatch<T>,
    ) -> ScorebookResult<WriteStamp> {
        let failed = self.should_fail(self.write_rate());
        self.note_write(failed);
        if failed {
            warn!(path = ?path, "injected merge failure");
            return Err(Self::injected("merge", path));
        }
        self.inner.merge_metadata(path, patch)
    }

    fn delete(&self, path: &DocPath<T>) -> ScorebookResult<()> {
        let failed = self.should_fail(self.write_rate());
        self.note_write(failed);
        if failed {
            warn!(path = ?path, "injected delete failure");
            return Err(Self::injected("delete", path));
        }
        self.inner.delete(path)
    }

    fn subscribe(
        &self,
        path: &DocPath<T>,
        observer: SnapshotObserver<T>,
    ) -> ScorebookResult<SubscriptionId> {
        let failed = self.should_fail(self.config.lock().subscribe_failure_rate);
        self.note_subscribe(failed);
        if failed {
            warn!(path = ?path, "injected subscribe failure");
            return Err(Self::injected("subscribe", path));
        }
        // The drop rate is read per delivery, not captured here, so a
        // reconfigured store affects subscriptions that already exist.
        let config = Arc::clone(&self.config);
        let rng = Arc::clone(&self.rng);
        let stats = Arc::clone(&self.stats);
        let wrapped: SnapshotObserver<T> = Arc::new(move |snapshot: DocumentSnapshot<T>| {
            let rate = config.lock().snapshot_drop_rate;
            let dropped = snapshot.exists() && roll(&rng, rate);
            if dropped {
                stats.lock().snapshots_dropped += 1;
                observer(DocumentSnapshot::missing(snapshot.path));
            } else {
                observer(snapshot);
            }
        });
        self.inner.subscribe(path, wrapped)
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.inner.unsubscribe(subscription);
    }

    fn list(&self, collection: &CollectionPath) -> ScorebookResult<Vec<DocumentSnapshot<T>>> {
        let failed = self.should_fail(self.read_rate());
        self.note_read(failed);
        if failed {
            warn!(collection = ?collection, "injected list failure");
            return Err(Self::injected("list", collection));
        }
        self.inner.list(collection)
    }
}

// ###################
// # UNIT TESTS      #
// ###################
