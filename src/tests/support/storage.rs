// Storage wrapper with switchable failures for error-path tests.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::db::{MemoryStorage, Storage, StorageError};

/// Wraps a [`MemoryStorage`] and fails selected operations on demand.
///
/// Only the index-based primitives are forwarded, so `keys()` goes through the
/// trait's default `len`/`key` walk.
#[derive(Default)]
pub struct FaultyStorage {
    inner: MemoryStorage,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_len: AtomicBool,
    fail_remove: Mutex<HashSet<String>>,
    removals: AtomicUsize,
}

impl FaultyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStorage {
        &self.inner
    }

    pub fn fail_get(&self, on: bool) {
        self.fail_get.store(on, Ordering::Relaxed);
    }

    pub fn fail_set(&self, on: bool) {
        self.fail_set.store(on, Ordering::Relaxed);
    }

    pub fn fail_len(&self, on: bool) {
        self.fail_len.store(on, Ordering::Relaxed);
    }

    /// Makes removal of `key` fail until [`FaultyStorage::heal_remove`].
    pub fn fail_remove(&self, key: &str) {
        self.fail_remove.lock().insert(key.to_string());
    }

    pub fn heal_remove(&self, key: &str) {
        self.fail_remove.lock().remove(key);
    }

    /// Number of remove_item calls, successful or not.
    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::Relaxed)
    }
}

fn injected() -> StorageError {
    StorageError::Io {
        path: "faulty".into(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "injected failure"),
    }
}

impl Storage for FaultyStorage {
    fn len(&self) -> Result<usize, StorageError> {
        if self.fail_len.load(Ordering::Relaxed) {
            return Err(injected());
        }
        self.inner.len()
    }

    fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
        self.inner.key(index)
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_get.load(Ordering::Relaxed) {
            return Err(injected());
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_set.load(Ordering::Relaxed) {
            return Err(StorageError::QuotaExceeded {
                requested: key.len() + value.len(),
                quota: 0,
            });
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.removals.fetch_add(1, Ordering::Relaxed);
        if self.fail_remove.lock().contains(key) {
            return Err(injected());
        }
        self.inner.remove_item(key)
    }
}
