//! Persistent cache of the last ready view per channel.
//!
//! Reads and writes are best effort: store failures and corrupted entries are
//! logged and reported as a miss / failed write, never as errors. When the
//! cache is disabled `get` always misses and `put` does nothing.

pub mod errors;
pub mod persistence;
pub mod store;
pub mod types;

use std::sync::Arc;

pub use errors::CacheError;
pub use persistence::FileStore;
pub use store::{KeyValueStore, MemoryStore};
pub use types::CacheEntry;

use crate::config::PanelSettings;

#[derive(Clone)]
pub struct PersistentCache {
    store: Arc<dyn KeyValueStore>,
    enabled: bool,
    installation_id: String,
}

impl PersistentCache {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        enabled: bool,
        installation_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            enabled,
            installation_id: installation_id.into(),
        }
    }

    pub fn from_settings(store: Arc<dyn KeyValueStore>, settings: &PanelSettings) -> Self {
        Self::new(
            store,
            settings.cache_enabled,
            settings.installation_id.clone(),
        )
    }

    /// Enabled cache over a fresh [`MemoryStore`].
    pub fn in_memory(installation_id: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), true, installation_id)
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(MemoryStore::new()), false, "disabled")
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Storage key for a channel: `{installation_id}-{channel_id}`.
    pub fn key_for(&self, channel_id: &str) -> String {
        format!("{}-{}", self.installation_id, channel_id)
    }

    pub fn get(&self, channel_id: &str) -> Option<CacheEntry> {
        if !self.enabled {
            return None;
        }

        let key = self.key_for(channel_id);
        let blob = match self.store.get(&key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(event = "core.cache.miss", key = %key);
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.cache.read_failed",
                    key = %key,
                    error = %e,
                    "Treating unreadable cache entry as a miss"
                );
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry>(&blob) {
            Ok(entry) => {
                tracing::debug!(
                    event = "core.cache.hit",
                    key = %key,
                    status = %entry.status
                );
                Some(entry)
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.cache.entry_corrupted",
                    key = %key,
                    error = %e,
                    "Cache entry does not match the expected schema - ignoring it"
                );
                None
            }
        }
    }

    /// Store an entry. Returns whether the write happened.
    ///
    /// Only ready entries are written; anything else is refused.
    pub fn put(&self, channel_id: &str, entry: &CacheEntry) -> bool {
        if !self.enabled {
            return false;
        }

        let key = self.key_for(channel_id);
        if !entry.is_ready() {
            tracing::warn!(
                event = "core.cache.write_refused",
                key = %key,
                status = %entry.status,
                "Refusing to cache a view that is not ready"
            );
            return false;
        }

        let blob = match serde_json::to_string(entry) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::error!(
                    event = "core.cache.serialize_failed",
                    key = %key,
                    error = %e
                );
                return false;
            }
        };

        match self.store.put(&key, &blob) {
            Ok(()) => {
                tracing::debug!(event = "core.cache.write_completed", key = %key);
                true
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.cache.write_failed",
                    key = %key,
                    error = %e
                );
                false
            }
        }
    }

    /// Drop the entry for a channel. Returns whether the removal succeeded.
    pub fn remove(&self, channel_id: &str) -> bool {
        if !self.enabled {
            return false;
        }

        let key = self.key_for(channel_id);
        match self.store.remove(&key) {
            Ok(()) => {
                tracing::info!(event = "core.cache.entry_removed", key = %key);
                true
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.cache.remove_failed",
                    key = %key,
                    error = %e
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for PersistentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentCache")
            .field("enabled", &self.enabled)
            .field("installation_id", &self.installation_id)
            .finish_non_exhaustive()
    }
}
