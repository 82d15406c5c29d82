// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{MaxAge, DEFAULT_PREFIX};

#[cfg(test)]
pub mod test_config;

pub const PROD: &str = "prod";
pub const DEV: &str = "dev";
pub const DEBUG: &str = "debug";
pub const TEST: &str = "test";

pub const DEFAULT_STORAGE_PATH: &str = "data/starcache.json";
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(rename = "cache")]
    pub cache: CacheBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheBox {
    #[serde(default = "default_env")]
    pub env: String,
    pub logs: Option<Logs>,
    pub namespace: Option<Namespace>,
    pub expiry: Option<Expiry>,
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Namespace {
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Expiry {
    #[serde(rename = "max_age", default, with = "humantime_serde")]
    pub max_age: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    File,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Storage {
    #[serde(default)]
    pub backend: Backend,
    pub path: Option<PathBuf>,
    #[serde(rename = "quota_bytes")]
    pub quota_bytes: Option<usize>,
}

impl Storage {
    /// Path of the file backend, falling back to [`DEFAULT_STORAGE_PATH`].
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH))
    }
}

fn default_env() -> String {
    DEV.to_string()
}

pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn is_debug(&self) -> bool;
    fn is_dev(&self) -> bool;
    fn is_test(&self) -> bool;
    fn prefix(&self) -> &str;
    fn max_age(&self) -> MaxAge;
    fn storage(&self) -> &Storage;
}

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.cache.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.cache.env == PROD
    }

    fn is_debug(&self) -> bool {
        self.cache.env == DEBUG
    }

    fn is_dev(&self) -> bool {
        self.cache.env == DEV
    }

    fn is_test(&self) -> bool {
        self.cache.env == TEST
    }

    fn prefix(&self) -> &str {
        self.cache
            .namespace
            .as_ref()
            .and_then(|ns| ns.prefix.as_deref())
            .unwrap_or(DEFAULT_PREFIX)
    }

    fn max_age(&self) -> MaxAge {
        self.cache
            .expiry
            .as_ref()
            .and_then(|e| e.max_age)
            .unwrap_or(DEFAULT_MAX_AGE)
            .into()
    }

    fn storage(&self) -> &Storage {
        &self.cache.storage
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheBox {
                env: default_env(),
                logs: None,
                namespace: None,
                expiry: None,
                storage: Storage::default(),
            },
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        let cfg = Self::from_yaml(&data)
            .with_context(|| format!("load config from {:?}", abs_path))?;

        Ok(cfg)
    }

    /// Parses and validates configuration from a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if let Some(prefix) = self.cache.namespace.as_ref().and_then(|ns| ns.prefix.as_ref()) {
            if prefix.is_empty() {
                anyhow::bail!("namespace.prefix must not be empty");
            }
        }

        let storage = &self.cache.storage;
        if storage.backend == Backend::File {
            if let Some(ref path) = storage.path {
                if path.as_os_str().is_empty() {
                    anyhow::bail!("storage.path must not be empty for the file backend");
                }
            }
        }

        match self.cache.env.as_str() {
            PROD | DEV | DEBUG | TEST => Ok(()),
            other => anyhow::bail!("unknown env {:?}", other),
        }
    }
}
