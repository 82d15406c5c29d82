// Main entrypoint for the starcache admin tool.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

use starcache::config::{Config, ConfigTrait};
use starcache::{db, Cache, Clock, MaxAge, Params, Storage};

const CONFIG_PATH: &str = "cfg/starcache.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/starcache.cfg.local.yaml";

/// starcache - timestamped key-value cache over persistent storage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the cache key for a data type, identifier and parameters
    Key {
        kind: String,
        identifier: String,
        /// Differentiating parameter, repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Store a JSON payload under a key
    Set { key: String, json: String },
    /// Print the payload under a key if it is still fresh
    Get {
        key: String,
        /// Maximum age, e.g. "7days" or "12h" (defaults to the configured max age)
        #[arg(long, value_parser = humantime::parse_duration, conflicts_with = "max_age_days")]
        max_age: Option<Duration>,
        /// Maximum age in (possibly fractional) days
        #[arg(long)]
        max_age_days: Option<f64>,
    },
    /// Remove a single entry
    Clear { key: String },
    /// Remove every entry in the cache namespace
    ClearAll,
    /// List keys in the cache namespace
    List,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid parameter {:?}, expected KEY=VALUE", s))
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then the default config, then built-in defaults.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, String)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path.display().to_string()));
    }

    for candidate in [CONFIG_PATH_LOCAL, CONFIG_PATH] {
        let candidate_path = PathBuf::from(candidate);
        if candidate_path.exists() {
            let cfg = Config::load(&candidate_path)
                .with_context(|| format!("failed to load config from {}", candidate))?;
            return Ok((cfg, candidate.to_string()));
        }
    }

    Ok((Config::default(), "<defaults>".to_string()))
}

fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let (cfg, source) = load_cfg(args.cfg)?;
    configure_logger(&cfg);
    info!(
        component = "config",
        event = "load_success",
        path = %source,
        "config loaded"
    );

    let storage = db::open(&cfg)?;
    let cache = Cache::new(storage).with_prefix(cfg.prefix());

    let mut stdout = std::io::stdout().lock();
    match run(&cache, cfg.max_age(), args.command, &mut stdout)? {
        Outcome::Done => Ok(ExitCode::SUCCESS),
        Outcome::Miss => Ok(ExitCode::FAILURE),
    }
}

/// Result of a command that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// `get` found no fresh entry.
    Miss,
}

/// Executes one command against `cache`, writing its output to `out`.
fn run<S: Storage, C: Clock>(
    cache: &Cache<S, C>,
    default_max_age: MaxAge,
    command: Command,
    out: &mut dyn Write,
) -> Result<Outcome> {
    match command {
        Command::Key {
            kind,
            identifier,
            params,
        } => {
            let params: Params = params.into_iter().collect();
            writeln!(out, "{}", cache.key(&kind, &identifier, &params))?;
        }
        Command::Set { key, json } => {
            let value: serde_json::Value =
                serde_json::from_str(&json).context("payload is not valid JSON")?;
            if !cache.save(&key, &value) {
                anyhow::bail!("failed to save entry {:?}", key);
            }
        }
        Command::Get {
            key,
            max_age,
            max_age_days,
        } => {
            let max_age = match (max_age, max_age_days) {
                (Some(d), _) => MaxAge::from(d),
                (None, Some(days)) => MaxAge::days(days),
                (None, None) => default_max_age,
            };
            match cache.get::<serde_json::Value>(&key, max_age) {
                Some(value) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
                }
                None => {
                    warn!(
                        component = "main",
                        event = "cache_miss",
                        key = %key,
                        "no fresh entry"
                    );
                    return Ok(Outcome::Miss);
                }
            }
        }
        Command::Clear { key } => {
            if !cache.clear(&key) {
                anyhow::bail!("failed to clear entry {:?}", key);
            }
        }
        Command::ClearAll => {
            let removed = cache.clear_all();
            info!(
                component = "main",
                event = "cleared_all",
                removed,
                "cache namespace cleared"
            );
            writeln!(out, "{}", removed)?;
        }
        Command::List => {
            for key in cache.keys() {
                writeln!(out, "{}", key)?;
            }
        }
    }

    Ok(Outcome::Done)
}
