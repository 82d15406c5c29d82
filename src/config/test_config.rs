use super::{Backend, CacheBox, Config, Expiry, Logs, Namespace, Storage};
use std::time::Duration;

/// Creates a new test configuration backed by in-memory storage.
pub fn new_test_config() -> Config {
    Config {
        cache: CacheBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            namespace: Some(Namespace {
                prefix: Some(crate::model::DEFAULT_PREFIX.to_string()),
            }),
            expiry: Some(Expiry {
                max_age: Some(Duration::from_secs(24 * 60 * 60)),
            }),
            storage: Storage {
                backend: Backend::Memory,
                path: None,
                quota_bytes: None,
            },
        },
    }
}
