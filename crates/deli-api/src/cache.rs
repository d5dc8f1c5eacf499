//! # Query Cache
//!
//! One cached list per resource, shared by every screen.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  Sales screen ──┐                                                     │
//! │                 ├──► QueryCache["clientes"] ──miss──► GET /clientes   │
//! │  Inventory ─────┘          ▲                                          │
//! │                            │ invalidate                               │
//! │  Customers screen ── create/update/remove ────────────────────────────│
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Entries are type-erased so the cache can hold any record list. A lookup
//! with the wrong type behaves like a miss.
//!
//! ## Generations
//! Every key carries a counter that `invalidate` bumps. A fetch records the
//! counter before it starts and only stores its answer if the counter has
//! not moved, so a list read that raced a mutation never overwrites the
//! invalidation with pre-mutation data.
//!
//! ```text
//!   fetch starts (gen 4) ──── GET ─────────────────► answer arrives
//!                 mutation ─► invalidate (gen 5)      gen 5 ≠ 4: not stored
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Default)]
struct Slots {
    entries: HashMap<&'static str, Entry>,
    generations: HashMap<&'static str, u64>,
}

impl Slots {
    fn generation(&self, key: &'static str) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }
}

/// Shared read-through cache keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    slots: Arc<RwLock<Slots>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, if present and of type `T`.
    pub async fn get<T: Any + Send + Sync>(&self, key: &'static str) -> Option<Arc<T>> {
        let entry = self.slots.read().await.entries.get(key).cloned()?;
        entry.downcast::<T>().ok()
    }

    /// Stores `value` unconditionally.
    pub async fn insert<T: Any + Send + Sync>(&self, key: &'static str, value: Arc<T>) {
        self.slots.write().await.entries.insert(key, value);
    }

    /// Current generation of `key`. Take it before starting a fetch.
    pub async fn generation(&self, key: &'static str) -> u64 {
        self.slots.read().await.generation(key)
    }

    /// Stores `value` only if `key` has not been invalidated since
    /// `generation` was read. Returns whether it was stored.
    pub async fn insert_if_current<T: Any + Send + Sync>(
        &self,
        key: &'static str,
        generation: u64,
        value: Arc<T>,
    ) -> bool {
        let mut slots = self.slots.write().await;
        if slots.generation(key) != generation {
            debug!(resource = key, "Stale fetch not cached");
            return false;
        }
        slots.entries.insert(key, value);
        true
    }

    /// Drops the entry for `key` so the next read fetches again, and
    /// invalidates any fetch still in flight.
    pub async fn invalidate(&self, key: &'static str) {
        let mut slots = self.slots.write().await;
        *slots.generations.entry(key).or_insert(0) += 1;
        if slots.entries.remove(key).is_some() {
            debug!(resource = key, "Query cache invalidated");
        }
    }

    /// Returns the cached value or runs `fetch` and caches its result.
    ///
    /// Failed fetches are not cached. A fetch overtaken by `invalidate`
    /// still returns its value to the caller but leaves the cache empty.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &'static str, fetch: F) -> Result<Arc<T>, E>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let generation = {
            let slots = self.slots.read().await;
            let cached = slots.entries.get(key).cloned();
            if let Some(hit) = cached.and_then(|entry| entry.downcast::<T>().ok()) {
                debug!(resource = key, "Query cache hit");
                return Ok(hit);
            }
            slots.generation(key)
        };

        let value = Arc::new(fetch().await?);
        self.insert_if_current(key, generation, Arc::clone(&value)).await;
        Ok(value)
    }
}
