// Common test utilities for scenario tests.

use serde::{Deserialize, Serialize};
use std::sync::Once;
use std::time::Duration;

use crate::cache::Cache;
use crate::db::Storage;
use crate::time::ManualClock;

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// 2023-11-14T22:13:20Z.
pub const EPOCH_MS: i64 = 1_700_000_000_000;

static LOGS: Once = Once::new();

/// Routes tracing output through the test writer so failing cases show their logs.
pub fn init_test_logging() {
    LOGS.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_test_writer()
            .try_init();
    });
}

/// Builds a cache on `storage` with a manual clock frozen at [`EPOCH_MS`].
pub fn cache_on<S: Storage>(storage: S) -> (Cache<S, ManualClock>, ManualClock) {
    init_test_logging();
    let clock = ManualClock::new(EPOCH_MS);
    (Cache::with_clock(storage, clock.clone()), clock)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stargazer {
    pub login: String,
    pub starred_at: String,
}

/// A page of `n` synthetic stargazers.
pub fn stargazers_page(page: usize, n: usize) -> Vec<Stargazer> {
    (0..n)
        .map(|i| Stargazer {
            login: format!("user{}_{}", page, i),
            starred_at: format!("2024-01-{:02}T00:00:00Z", (i % 28) + 1),
        })
        .collect()
}
