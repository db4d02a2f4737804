//! Domain constants
//!
//! Centralized defaults shared by configuration and the HTTP delegate.

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("callhop/", env!("CARGO_PKG_VERSION"));

// Callback runtime defaults
pub const DEFAULT_CALLBACK_WORKER_THREADS: usize = 1;
pub const DEFAULT_CALLBACK_THREAD_NAME: &str = "callhop-callback";

/// Message carried by the synthetic cancellation error.
pub const CANCELED_MESSAGE: &str = "Canceled";
