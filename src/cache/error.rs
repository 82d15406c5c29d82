use crate::db::StorageError;

/// Errors surfaced by the propagating cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("storage failure")]
    Storage(#[from] StorageError),

    #[error("failed to encode entry for {key:?}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("corrupted entry at {key:?}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
