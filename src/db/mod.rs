pub mod storage;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Backend, Config, ConfigTrait};

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

/// Opens the storage backend selected by the configuration.
pub fn open(cfg: &Config) -> Result<Box<dyn Storage + Send + Sync>> {
    let storage_cfg = cfg.storage();
    let quota = storage_cfg.quota_bytes;

    let storage: Box<dyn Storage + Send + Sync> = match storage_cfg.backend {
        Backend::Memory => match quota {
            Some(q) => Box::new(MemoryStorage::with_quota(q)),
            None => Box::new(MemoryStorage::new()),
        },
        Backend::File => {
            let path = storage_cfg.path();
            let file = FileStorage::open(&path)
                .with_context(|| format!("failed to open file storage at {:?}", path))?;
            match quota {
                Some(q) => Box::new(file.with_quota(q)),
                None => Box::new(file),
            }
        }
    };

    info!(
        component = "db",
        event = "storage_opened",
        backend = ?storage_cfg.backend,
        quota_bytes = ?quota,
        "storage backend opened"
    );

    Ok(storage)
}
