// Scenario tests for the cache over durable file storage.

use std::fs;

use crate::config::{Backend, ConfigTrait};
use crate::db::{self, FileStorage, Storage};
use crate::model::{MaxAge, Params};
use crate::support::{cache_on, stargazers_page, Stargazer, DAY};

/// Entries written in one session are served, or expired, in the next.
#[test]
fn test_entries_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("starcache.json");
    let params = Params::new().with("page", 1);

    {
        let (cache, _clock) = cache_on(FileStorage::open(&path).unwrap());
        let key = cache.key("stargazers", "a/b", &params);
        assert!(cache.save(&key, &stargazers_page(1, 3)));
    }

    let (cache, clock) = cache_on(FileStorage::open(&path).unwrap());
    clock.advance(DAY);
    let key = cache.key("stargazers", "a/b", &params);

    let got: Option<Vec<Stargazer>> = cache.get(&key, MaxAge::days(2.0));
    assert_eq!(got, Some(stargazers_page(1, 3)));

    let got: Option<Vec<Stargazer>> = cache.get(&key, MaxAge::days(0.5));
    assert_eq!(got, None);
    assert!(FileStorage::open(&path).unwrap().is_empty().unwrap());
}

/// The on-disk document is a flat JSON object of string values.
#[test]
fn test_on_disk_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("starcache.json");
    let (cache, _clock) = cache_on(FileStorage::open(&path).unwrap());
    cache.save("github_star_history_cache_repos_octocat_", &vec!["hello-world"]);

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let raw = doc["github_star_history_cache_repos_octocat_"].as_str().unwrap();
    let entry: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert_eq!(entry["data"], serde_json::json!(["hello-world"]));
    assert!(entry["timestamp"].is_i64());
}

/// Bulk clear is persisted.
#[test]
fn test_clear_all_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("starcache.json");
    {
        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("settings", "{}").unwrap();
        let (cache, _clock) = cache_on(storage);
        cache.save(cache.key("repos", "a", &Params::new()), &1);
        cache.save(cache.key("repos", "b", &Params::new()), &2);
        assert_eq!(cache.clear_all(), 2);
    }

    assert_eq!(FileStorage::open(&path).unwrap().keys().unwrap(), vec!["settings"]);
}

/// Storage selection from configuration.
#[test]
fn test_open_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg-store.json");

    let mut cfg = crate::config::test_config::new_test_config();
    assert_eq!(cfg.storage().backend, Backend::Memory);
    let memory = db::open(&cfg).unwrap();
    memory.set_item("k", "v").unwrap();
    assert!(!path.exists());

    cfg.cache.storage.backend = Backend::File;
    cfg.cache.storage.path = Some(path.clone());
    cfg.cache.storage.quota_bytes = Some(8);
    let file = db::open(&cfg).unwrap();
    file.set_item("k", "v").unwrap();
    assert!(file.set_item("big", "0123456789").unwrap_err().is_quota_exceeded());
    assert!(path.exists());
}
