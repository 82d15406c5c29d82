pub mod cache;
pub mod error;


pub use cache::Cache;
pub use error::CacheError;
