// Package model provides cache key building.

use std::fmt::{self, Display};

use super::Params;

/// Namespace every managed key starts with unless a cache is configured otherwise.
pub const DEFAULT_PREFIX: &str = "github_star_history_cache_";

/// Deterministic key of the form `{prefix}{kind}_{identifier}_{params}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key under [`DEFAULT_PREFIX`].
    pub fn new(kind: &str, identifier: &str, params: &Params) -> Self {
        Self::with_prefix(DEFAULT_PREFIX, kind, identifier, params)
    }

    /// Builds a key under a custom prefix.
    pub fn with_prefix(prefix: &str, kind: &str, identifier: &str, params: &Params) -> Self {
        let params = params.to_string();
        let mut buf =
            String::with_capacity(prefix.len() + kind.len() + identifier.len() + params.len() + 2);
        buf.push_str(prefix);
        buf.push_str(kind);
        buf.push('_');
        buf.push_str(identifier);
        buf.push('_');
        buf.push_str(&params);
        Self(buf)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

/// Shorthand for [`CacheKey::new`].
pub fn generate_cache_key(kind: &str, identifier: &str, params: &Params) -> CacheKey {
    CacheKey::new(kind, identifier, params)
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}
