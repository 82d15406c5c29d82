use std::collections::BTreeMap;

use super::StorageError;

/// Byte footprint of a stored pair.
pub(super) fn weight(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Total footprint of the map.
pub(super) fn used(items: &BTreeMap<String, String>) -> usize {
    items.iter().map(|(k, v)| weight(k, v)).sum()
}

/// Checks that writing `key = value` keeps the store within `quota`,
/// given its current footprint `used`. Only the net growth of an overwrite counts.
pub(super) fn check(
    quota: Option<usize>,
    used: usize,
    items: &BTreeMap<String, String>,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let replaced = items.get(key).map(|old| weight(key, old)).unwrap_or(0);
    let requested = used - replaced + weight(key, value);
    if requested > quota {
        return Err(StorageError::QuotaExceeded { requested, quota });
    }
    Ok(())
}
