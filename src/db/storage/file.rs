//! Storage persisted as a single JSON document on disk.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{quota, Storage, StorageError};

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<String, String>,
    used: usize,
}

/// Durable storage. The whole namespace is rewritten on every mutation via a
/// temporary sibling file that is renamed over the target.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    inner: RwLock<Inner>,
    quota: Option<usize>,
}

impl FileStorage {
    /// Opens the store at `path`. A missing file yields an empty store; the
    /// file and its parent directories are created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = read_items(&path)?;
        let used = quota::used(&items);

        debug!(
            component = "storage",
            scope = "file",
            event = "opened",
            path = ?path,
            keys = items.len(),
            bytes = used,
            "file storage opened"
        );

        Ok(Self {
            path,
            inner: RwLock::new(Inner { items, used }),
            quota: None,
        })
    }

    /// Refuses writes which would grow the store past `quota_bytes`.
    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota = Some(quota_bytes);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    pub fn used_bytes(&self) -> usize {
        self.inner.read().used
    }

    /// Discards in-memory state and re-reads the file.
    pub fn reload(&self) -> Result<(), StorageError> {
        let items = read_items(&self.path)?;
        let used = quota::used(&items);
        *self.inner.write() = Inner { items, used };
        Ok(())
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }

        let tmp = tmp_path(&self.path);
        let written = self
            .write_tmp(&tmp, items)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(io_err));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    fn write_tmp(&self, tmp: &Path, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: tmp.to_path_buf(),
            source,
        };

        let file = fs::File::create(tmp).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, items).map_err(|source| StorageError::Encoding {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(io_err)?;
        writer.get_ref().sync_all().map_err(io_err)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().items.len())
    }

    fn key(&self, index: usize) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().items.keys().nth(index).cloned())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.read().items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        quota::check(self.quota, inner.used, &inner.items, key, value)?;

        let old = inner.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&inner.items) {
            // Roll back so memory keeps matching the file.
            match old {
                Some(old) => inner.items.insert(key.to_string(), old),
                None => inner.items.remove(key),
            };
            return Err(e);
        }

        if let Some(old) = old {
            inner.used -= quota::weight(key, &old);
        }
        inner.used += quota::weight(key, value);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        let Some(old) = inner.items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist(&inner.items) {
            inner.items.insert(key.to_string(), old);
            return Err(e);
        }
        inner.used -= quota::weight(key, &old);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.inner.read().items.keys().cloned().collect())
    }
}

fn read_items(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StorageError::Encoding {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
