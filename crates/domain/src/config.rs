//! Configuration structures
//!
//! Loaded by `callhop-infra`'s config loader from the environment or a
//! TOML/JSON file. Every field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CALLBACK_THREAD_NAME, DEFAULT_CALLBACK_WORKER_THREADS, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub dispatch: DispatchConfig,
}

/// Settings for the HTTP delegate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Settings for the dedicated callback runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of threads callbacks run on. One keeps delivery serial.
    pub worker_threads: usize,
    pub thread_name: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_threads: DEFAULT_CALLBACK_WORKER_THREADS,
            thread_name: DEFAULT_CALLBACK_THREAD_NAME.to_string(),
        }
    }
}
