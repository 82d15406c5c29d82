//! Host key-value storage abstraction and its implementations.

pub mod error;
pub mod file;
pub mod memory;
mod quota;

#[cfg(test)]
mod file_test;

use std::sync::Arc;

pub use error::StorageError;
pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Flat string-to-string persistent store addressed by key or by index.
///
/// Receivers are `&self`; implementations handle their own interior mutability.
/// Index order is implementation-defined and only stable between mutations.
pub trait Storage {
    /// Number of stored keys.
    fn len(&self) -> Result<usize, StorageError>;

    /// Key at `index`, or `None` when out of range.
    fn key(&self, index: usize) -> Result<Option<String>, StorageError>;

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of every key, taken by index.
    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let len = self.len()?;
        let mut keys = Vec::with_capacity(len);
        for i in 0..len {
            if let Some(key) = self.key(i)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

macro_rules! forward_storage {
    ($ty:ty) => {
        impl<S: Storage + ?Sized> Storage for $ty {
            fn len(&self) -> Result<usize, StorageError> {
                (**self).len()
            }

            fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
                (**self).key(index)
            }

            fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
                (**self).get_item(key)
            }

            fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
                (**self).set_item(key, value)
            }

            fn remove_item(&self, key: &str) -> Result<(), StorageError> {
                (**self).remove_item(key)
            }

            fn keys(&self) -> Result<Vec<String>, StorageError> {
                (**self).keys()
            }
        }
    };
}

forward_storage!(&S);
forward_storage!(Box<S>);
forward_storage!(Arc<S>);
