#[cfg(test)]
mod tests {
    use std::fs;

    use crate::db::storage::{FileStorage, Storage, StorageError};

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("absent.json")).unwrap();
        assert!(storage.is_empty().unwrap());
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_items_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/store.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set_item("a", "1").unwrap();
            storage.set_item("b", "2").unwrap();
            storage.remove_item("a").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["b"]);
        assert_eq!(reopened.get_item("b").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.used_bytes(), 2);
        assert!(!path.with_file_name("store.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        match FileStorage::open(&path) {
            Err(StorageError::Encoding { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected encoding error, got {other:?}"),
        }
    }

    #[test]
    fn test_quota_refusal_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = FileStorage::open(&path).unwrap().with_quota(6);

        storage.set_item("k", "12345").unwrap();
        assert!(storage.set_item("k2", "1").unwrap_err().is_quota_exceeded());

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.keys().unwrap(), vec!["k"]);
    }

    #[test]
    fn test_failed_persist_rolls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = FileStorage::open(&path).unwrap();

        // The target path becomes a non-empty directory, so the final rename fails.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupant"), "x").unwrap();

        assert!(storage.set_item("a", "1").is_err());
        assert_eq!(storage.get_item("a").unwrap(), None);
        assert_eq!(storage.used_bytes(), 0);
        assert!(!dir.path().join("store.json.tmp").exists());
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let a = FileStorage::open(&path).unwrap();
        let b = FileStorage::open(&path).unwrap();
        a.set_item("shared", "yes").unwrap();

        assert_eq!(b.get_item("shared").unwrap(), None);
        b.reload().unwrap();
        assert_eq!(b.get_item("shared").unwrap().as_deref(), Some("yes"));
    }
}
