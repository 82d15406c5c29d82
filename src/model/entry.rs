//! Timestamped cache record.

use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::MaxAge;

/// A payload paired with the Unix milliseconds at which it was written.
///
/// Encoded as `{"timestamp": <ms>, "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub timestamp: i64,
    pub data: T,
}

impl<T> CacheEntry<T> {
    pub fn new(timestamp: i64, data: T) -> Self {
        Self { timestamp, data }
    }

    /// Milliseconds elapsed since the entry was written. Negative if the
    /// clock moved backwards after the write.
    pub fn age_millis(&self, now_millis: i64) -> i64 {
        now_millis.saturating_sub(self.timestamp)
    }

    /// Whether the entry is older than `max_age` at `now_millis`.
    pub fn is_stale(&self, now_millis: i64, max_age: MaxAge) -> bool {
        max_age.is_exceeded_by(self.age_millis(now_millis))
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T: DeserializeOwned> CacheEntry<T> {
    /// Decodes a stored record. Only the object form is accepted; the derived
    /// visitor alone would also take `[timestamp, data]` arrays.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        if value.is_object() {
            return serde_json::from_value(value);
        }
        let unexpected = match &value {
            Value::Object(_) => Unexpected::Map,
            Value::Array(_) => Unexpected::Seq,
            Value::String(s) => Unexpected::Str(s),
            Value::Bool(b) => Unexpected::Bool(*b),
            Value::Number(_) => Unexpected::Other("number"),
            Value::Null => Unexpected::Unit,
        };
        Err(de::Error::invalid_type(unexpected, &"a cache entry object"))
    }
}
