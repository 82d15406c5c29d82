// Package model provides the cache record, key building and expiry threshold.

pub mod entry;
pub mod keys;
pub mod max_age;
pub mod params;


// Re-export main types
pub use entry::CacheEntry;
pub use keys::{generate_cache_key, CacheKey, DEFAULT_PREFIX};
pub use max_age::MaxAge;
pub use params::Params;
