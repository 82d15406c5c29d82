use std::path::PathBuf;

/// Errors raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {requested} bytes requested, quota is {quota} bytes")]
    QuotaExceeded { requested: usize, quota: usize },

    #[error("storage file {path:?} is unreadable")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path:?} is not a valid key-value document")]
    Encoding {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}
