//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, if the required ones are set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//! 3. Otherwise built-in defaults
//!
//! A file that exists but cannot be parsed is an error, never silently
//! replaced by defaults.
//!
//! ## Environment Variables
//! - `CALLHOP_HTTP_TIMEOUT_SECS` (required): whole-request timeout
//! - `CALLHOP_HTTP_USER_AGENT`: `User-Agent` header
//! - `CALLHOP_DISPATCH_WORKER_THREADS` (required): callback runtime threads
//! - `CALLHOP_DISPATCH_THREAD_NAME`: callback runtime thread name
//!
//! ## File Locations
//! `callhop.toml`, `callhop.json`, `config.toml`, `config.json`, looked up
//! in the working directory, then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use callhop_domain::{CallError, Config, DispatchConfig, HttpConfig, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["callhop.toml", "callhop.json", "config.toml", "config.json"];

const TIMEOUT_VAR: &str = "CALLHOP_HTTP_TIMEOUT_SECS";
const USER_AGENT_VAR: &str = "CALLHOP_HTTP_USER_AGENT";
const WORKERS_VAR: &str = "CALLHOP_DISPATCH_WORKER_THREADS";
const THREAD_NAME_VAR: &str = "CALLHOP_DISPATCH_THREAD_NAME";

/// Result of reading the environment.
enum EnvConfig {
    Complete(Config),
    /// A required variable is unset.
    Missing(&'static str),
}

/// Load configuration with automatic fallback strategy
///
/// Falls back to a file only when a required variable is unset. A variable
/// that is set but invalid is an error.
///
/// # Errors
/// Returns `CallError::Config` if an environment variable or config file
/// holds an invalid value.
pub fn load() -> Result<Config> {
    match read_env()? {
        EnvConfig::Complete(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        EnvConfig::Missing(key) => {
            tracing::debug!(missing = key, "Environment incomplete, trying file");
        }
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `CallError::Config` if a required variable is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    match read_env()? {
        EnvConfig::Complete(config) => Ok(config),
        EnvConfig::Missing(key) => {
            Err(CallError::Config(format!("Missing required environment variable: {}", key)))
        }
    }
}

// Every variable that is set is parsed and validated before a missing one is
// reported.
fn read_env() -> Result<EnvConfig> {
    let defaults = Config::default();

    let timeout_secs = env_parse::<u64>(TIMEOUT_VAR)?;
    let worker_threads = env_parse::<usize>(WORKERS_VAR)?;
    let thread_name = std::env::var(THREAD_NAME_VAR).ok();
    if timeout_secs == Some(0) {
        return Err(invalid_env(TIMEOUT_VAR, "http.timeout_secs must be greater than 0"));
    }
    if worker_threads == Some(0) {
        return Err(invalid_env(WORKERS_VAR, "dispatch.worker_threads must be at least 1"));
    }
    if thread_name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(invalid_env(THREAD_NAME_VAR, "dispatch.thread_name must not be empty"));
    }

    let Some(timeout_secs) = timeout_secs else {
        return Ok(EnvConfig::Missing(TIMEOUT_VAR));
    };
    let Some(worker_threads) = worker_threads else {
        return Ok(EnvConfig::Missing(WORKERS_VAR));
    };

    let user_agent = std::env::var(USER_AGENT_VAR).unwrap_or(defaults.http.user_agent);
    let thread_name = thread_name.unwrap_or(defaults.dispatch.thread_name);

    let config = Config {
        http: HttpConfig { timeout_secs, user_agent },
        dispatch: DispatchConfig { worker_threads, thread_name },
    };
    Ok(EnvConfig::Complete(config))
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is chosen by
/// extension (`.toml` or `.json`).
///
/// # Errors
/// Returns `CallError::Config` if the file is missing, unreadable, invalid,
/// or holds values that fail [`validate`].
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CallError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CallError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CallError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Reject values no runtime or client can be built from.
///
/// # Errors
/// Returns `CallError::Config` naming the offending field.
pub fn validate(config: &Config) -> Result<()> {
    if config.http.timeout_secs == 0 {
        return Err(CallError::Config("http.timeout_secs must be greater than 0".to_string()));
    }
    if config.dispatch.worker_threads == 0 {
        return Err(CallError::Config("dispatch.worker_threads must be at least 1".to_string()));
    }
    if config.dispatch.thread_name.trim().is_empty() {
        return Err(CallError::Config("dispatch.thread_name must not be empty".to_string()));
    }
    Ok(())
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CallError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CallError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CallError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the working directory, then the executable's directory
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn invalid_env(key: &str, reason: &str) -> CallError {
    CallError::Config(format!("{} (from {})", reason, key))
}

/// Parse an optional environment variable; unset yields `None`.
fn env_parse<V>(key: &str) -> Result<Option<V>>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    let Ok(raw) = std::env::var(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<V>()
        .map(Some)
        .map_err(|e| CallError::Config(format!("Invalid value for {}: {}", key, e)))
}
