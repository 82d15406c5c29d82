#[path = "shared/sort/mod.rs"]
pub mod sort;
#[path = "shared/time/mod.rs"]
pub mod time;
#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod cache;
pub mod config;
pub mod db;
pub mod model;

pub use cache::{Cache, CacheError};
pub use db::{FileStorage, MemoryStorage, Storage, StorageError};
pub use model::{generate_cache_key, CacheEntry, CacheKey, MaxAge, Params, DEFAULT_PREFIX};
pub use time::{Clock, ManualClock, SystemClock};
