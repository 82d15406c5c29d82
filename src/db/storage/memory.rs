//! In-process storage.

use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::{quota, Storage, StorageError};

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<String, String>,
    used: usize,
}

/// Volatile storage backed by a sorted map, with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes which would grow it past `quota_bytes`
    /// (sum of key and value byte lengths).
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            quota: Some(quota_bytes),
        }
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently accounted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.inner.read().used
    }
}

impl Storage for MemoryStorage {
    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().items.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().items.keys().nth(index).cloned())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        quota::check(self.quota, inner.used, &inner.items, key, value)?;

        let added = quota::weight(key, value);
        if let Some(old) = inner.items.insert(key.to_string(), value.to_string()) {
            inner.used -= quota::weight(key, &old);
        }
        inner.used += added;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        if let Some(old) = inner.items.remove(key) {
            inner.used -= quota::weight(key, &old);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.inner.read().items.keys().cloned().collect())
    }
}
