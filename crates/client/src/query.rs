//! Query keys, freshness and request ordering.
//!
//! The cache does not hold response bodies: controllers keep their own data.
//! What it tracks per [`QueryKey`] is whether the last fetched data is still
//! fresh and which request for the key is the newest one, so that a slow
//! response can never overwrite the result of a request issued after it.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::{sync::broadcast, time::Instant};

use crate::error::ApiError;

pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

/// Size above which idle entries are dropped when a new request begins.
const MAX_ENTRIES: usize = 128;

/// Stable identifier of a query: resource name followed by its parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    #[must_use]
    pub fn with(mut self, segment: impl fmt::Display) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn root(&self) -> &str {
        &self.0[0]
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Well-known key roots shared by the controllers.
pub mod keys {
    use super::QueryKey;

    pub fn categories() -> QueryKey {
        QueryKey::new("categories")
    }

    pub fn transactions() -> QueryKey {
        QueryKey::new("transactions")
    }

    pub fn dashboard() -> QueryKey {
        QueryKey::new("dashboard")
    }

    pub fn reports() -> QueryKey {
        QueryKey::new("reports")
    }
}

/// Proof that a request for `key` was started; see [`QueryCache::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    key: QueryKey,
    generation: u64,
}

impl Ticket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

#[derive(Debug, Default)]
struct Entry {
    generation: u64,
    started_at: Option<Instant>,
    fetched_at: Option<Instant>,
    invalidated: bool,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.fetched_at.is_some_and(|at| at.elapsed() < stale_time)
    }

    /// Stale, with no request started within the stale time.
    fn is_idle(&self, stale_time: Duration) -> bool {
        !self.is_fresh(stale_time) && self.started_at.is_none_or(|at| at.elapsed() >= stale_time)
    }
}

pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    stale_time: Duration,
    invalidations: broadcast::Sender<QueryKey>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        let (invalidations, _) = broadcast::channel(32);
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_time,
            invalidations,
        }
    }

    /// Registers a new request for `key`, superseding any request in flight.
    pub fn begin(&self, key: QueryKey) -> Ticket {
        let mut entries = self.lock();
        if entries.len() >= MAX_ENTRIES {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_idle(self.stale_time));
            tracing::debug!(evicted = before - entries.len(), "pruned idle queries");
        }
        let entry = entries.entry(key.clone()).or_default();
        entry.generation += 1;
        entry.started_at = Some(Instant::now());
        Ticket {
            key,
            generation: entry.generation,
        }
    }

    /// True while no newer request for the same key has been started.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.lock()
            .get(&ticket.key)
            .is_some_and(|entry| entry.generation == ticket.generation)
    }

    /// Records a successful response. Returns `false` (and changes nothing)
    /// when the ticket has been superseded: the response must be dropped.
    pub fn complete(&self, ticket: &Ticket) -> bool {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.generation != ticket.generation {
            tracing::debug!(key = %ticket.key, "dropping superseded response");
            return false;
        }
        entry.fetched_at = Some(Instant::now());
        entry.invalidated = false;
        true
    }

    /// Marks every key under `prefix` stale and notifies subscribers so they
    /// can refetch. Returns the number of known keys affected.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut affected = 0;
        for (key, entry) in self.lock().iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                affected += 1;
            }
        }
        tracing::debug!(prefix = %prefix, affected, "invalidated queries");
        let _ = self.invalidations.send(prefix.clone());
        affected
    }

    /// Never fetched, invalidated, or older than the stale time.
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        !self
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_fresh(self.stale_time))
    }

    /// Receives the prefix of every invalidation.
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.invalidations.subscribe()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Runs a read request, retrying it once on transport or server failures.
///
/// Only idempotent reads go through here; mutations are issued directly.
pub async fn fetch_with_retry<T, F, Fut>(mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match op().await {
        Err(err) if err.is_retryable() => {
            tracing::debug!("read failed, retrying once: {err}");
            op().await
        }
        other => other,
    }
}
