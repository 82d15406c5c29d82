//! Timestamped, prefix-namespaced cache over a host key-value store.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::CacheError;
use crate::db::Storage;
use crate::model::{CacheEntry, CacheKey, MaxAge, Params, DEFAULT_PREFIX};
use crate::time::{Clock, SystemClock};

/// Cache owning its storage handle and clock.
///
/// The plain operations (`save`, `get`, `clear`, `clear_all`, `keys`) never fail:
/// storage and encoding problems are logged and the entry is treated as absent.
/// The `try_*` variants return the underlying [`CacheError`] instead.
#[derive(Debug)]
pub struct Cache<S, C = SystemClock> {
    storage: S,
    clock: C,
    prefix: String,
}

impl<S: Storage> Cache<S> {
    /// Creates a cache on the system clock under [`DEFAULT_PREFIX`].
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: Storage, C: Clock> Cache<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Replaces the namespace prefix used for key generation and bulk clearing.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Builds a key for `kind`/`identifier`/`params` under this cache's prefix.
    pub fn key(&self, kind: &str, identifier: &str, params: &Params) -> CacheKey {
        CacheKey::with_prefix(&self.prefix, kind, identifier, params)
    }

    /// Whether `key` lives in this cache's namespace.
    pub fn is_managed(&self, key: &str) -> bool {
        key.starts_with(&self.prefix)
    }

    /// Stores `data` under `key`, stamped with the current time.
    pub fn try_save<T>(&self, key: impl AsRef<str>, data: &T) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
    {
        let key = key.as_ref();
        let entry = CacheEntry::new(self.clock.now_millis(), data);
        let encoded = serde_json::to_string(&entry).map_err(|source| CacheError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.storage.set_item(key, &encoded)?;
        Ok(())
    }

    /// Stores `data` under `key`. Returns whether the write landed.
    pub fn save<T>(&self, key: impl AsRef<str>, data: &T) -> bool
    where
        T: Serialize + ?Sized,
    {
        let key = key.as_ref();
        match self.try_save(key, data) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    component = "cache",
                    event = "save_failed",
                    key = %key,
                    error = %e,
                    cause = ?std::error::Error::source(&e).map(|s| s.to_string()),
                    "error saving to storage"
                );
                false
            }
        }
    }

    /// Reads the payload under `key` if it is younger than `max_age`.
    /// A stale entry is removed. A corrupt entry is reported but left in place.
    pub fn try_get<T>(&self, key: impl AsRef<str>, max_age: MaxAge) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        let key = key.as_ref();
        let Some(raw) = self.storage.get_item(key)? else {
            return Ok(None);
        };

        let entry = CacheEntry::<T>::decode(&raw).map_err(|source| CacheError::Decode {
            key: key.to_string(),
            source,
        })?;

        let now = self.clock.now_millis();
        if entry.is_stale(now, max_age) {
            self.storage.remove_item(key)?;
            debug!(
                component = "cache",
                event = "entry_expired",
                key = %key,
                age_ms = entry.age_millis(now),
                max_age_ms = max_age.as_millis(),
                "stale entry removed"
            );
            return Ok(None);
        }

        Ok(Some(entry.into_data()))
    }

    /// Reads the payload under `key` if it is younger than `max_age`.
    ///
    /// Stale and unreadable entries are removed and reported as absent.
    pub fn get<T>(&self, key: impl AsRef<str>, max_age: MaxAge) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = key.as_ref();
        match self.try_get(key, max_age) {
            Ok(v) => v,
            Err(e) => {
                match &e {
                    CacheError::Decode { source, .. } => warn!(
                        component = "cache",
                        event = "entry_corrupted",
                        key = %key,
                        error = %source,
                        "corrupted entry dropped"
                    ),
                    _ => error!(
                        component = "cache",
                        event = "get_failed",
                        key = %key,
                        error = %e,
                        cause = ?std::error::Error::source(&e).map(|s| s.to_string()),
                        "error retrieving from storage"
                    ),
                }
                self.discard(key);
                None
            }
        }
    }

    /// Removes the entry under `key`.
    pub fn try_clear(&self, key: impl AsRef<str>) -> Result<(), CacheError> {
        self.storage.remove_item(key.as_ref())?;
        Ok(())
    }

    /// Removes the entry under `key`. Returns whether the removal succeeded.
    pub fn clear(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        match self.try_clear(key) {
            Ok(()) => true,
            Err(e) => {
                error!(
                    component = "cache",
                    event = "clear_failed",
                    key = %key,
                    error = %e,
                    "error clearing cache entry"
                );
                false
            }
        }
    }

    /// Keys in this cache's namespace, in storage index order.
    pub fn try_keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = self.storage.keys()?;
        keys.retain(|k| self.is_managed(k));
        Ok(keys)
    }

    pub fn keys(&self) -> Vec<String> {
        match self.try_keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!(
                    component = "cache",
                    event = "list_failed",
                    error = %e,
                    "error listing cache keys"
                );
                Vec::new()
            }
        }
    }

    /// Removes every key in this cache's namespace, stopping at the first failure.
    /// Returns the number of removed keys.
    pub fn try_clear_all(&self) -> Result<usize, CacheError> {
        let keys = self.try_keys()?;
        for key in &keys {
            self.storage.remove_item(key)?;
        }
        Ok(keys.len())
    }

    /// Removes every key in this cache's namespace. A key that fails to delete
    /// is logged and skipped. Returns the number of removed keys.
    pub fn clear_all(&self) -> usize {
        let keys = match self.try_keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!(
                    component = "cache",
                    event = "clear_all_failed",
                    error = %e,
                    "error clearing all caches"
                );
                return 0;
            }
        };

        let mut removed = 0;
        for key in &keys {
            match self.storage.remove_item(key) {
                Ok(()) => removed += 1,
                Err(e) => error!(
                    component = "cache",
                    event = "clear_all_failed",
                    key = %key,
                    error = %e,
                    "error clearing cache entry"
                ),
            }
        }

        debug!(
            component = "cache",
            event = "cleared_all",
            prefix = %self.prefix,
            removed,
            failed = keys.len() - removed,
            "namespace cleared"
        );
        removed
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            error!(
                component = "cache",
                event = "discard_failed",
                key = %key,
                error = %e,
                "error removing unreadable entry"
            );
        }
    }
}
