//! In-memory document cache.
//!
//! Maps canonical identifiers to parsed documents with two independent
//! eviction mechanisms: a bounded entry count (oldest insertion evicted
//! first) and a time-to-live (expired entries are treated as absent and
//! reloaded on next access).
//!
//! The concurrency contract is at-most-one in-flight load per identifier:
//! concurrent requests for the same identifier share a per-key gate, so the
//! second waits for the first and reuses its result instead of issuing a
//! duplicate fetch. Loads of different identifiers proceed fully in
//! parallel. A failed load is never cached; the next request retries from
//! scratch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::ServerConfig;
use crate::document::{DocumentId, ParsedDocument};
use crate::error::Result;

struct CacheEntry {
    doc: Arc<ParsedDocument>,
    inserted_at: Instant,
}

/// Shared cache of parsed documents.
pub struct DocumentCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    gates: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    capacity: usize,
    ttl: Duration,
}

impl DocumentCache {
    /// Creates a cache with the configured capacity and TTL.
    #[must_use]
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            capacity: config.cache_capacity.max(1),
            ttl: config.cache_ttl,
        }
    }

    /// Returns the cached document or runs `loader` to populate it.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; nothing is cached on failure.
    pub async fn get_or_load<F, Fut>(
        &self,
        id: &DocumentId,
        loader: F,
    ) -> Result<Arc<ParsedDocument>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ParsedDocument>>,
    {
        let key = id.cache_key();
        if let Some(doc) = self.lookup(&key) {
            debug!(%id, "cache hit");
            return Ok(doc);
        }

        let gate = self.gate_for(&key);
        let _guard = gate.lock().await;

        // A load that finished while we waited on the gate serves us too.
        if let Some(doc) = self.lookup(&key) {
            debug!(%id, "cache hit after coalesced load");
            self.release_gate(&key, &gate);
            return Ok(doc);
        }

        debug!(%id, "cache miss, loading");
        let result = loader().await.map(Arc::new);
        // Publish before releasing the gate: a request that grabs a fresh
        // gate right after removal must still hit the double-check lookup.
        if let Ok(doc) = &result {
            self.insert(key.clone(), doc.clone());
        }
        self.release_gate(&key, &gate);
        result
    }

    /// Number of live (possibly expired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns `true` when the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Option<Arc<ParsedDocument>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.doc.clone())
    }

    fn gate_for(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.gates.lock().map_or_else(
            |_| Arc::new(tokio::sync::Mutex::new(())),
            |mut gates| gates.entry(key.to_string()).or_default().clone(),
        )
    }

    /// Drops the per-key gate once no other request is waiting on it.
    fn release_gate(&self, key: &str, gate: &Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut gates) = self.gates.lock() {
            // Two strong refs mean only the map and this caller hold it.
            if Arc::strong_count(gate) <= 2 {
                gates.remove(key);
            }
        }
    }

    /// Inserts an entry, evicting expired entries and then the oldest
    /// insertions until the capacity bound holds. Runs opportunistically on
    /// insert; there is no background timer.
    fn insert(&self, key: String, doc: Arc<ParsedDocument>) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    debug!(key = %k, "evicting oldest cache entry");
                    entries.remove(&k);
                }
                None => break,
            }
        }

        entries.insert(
            key,
            CacheEntry {
                doc,
                inserted_at: Instant::now(),
            },
        );
    }
}
