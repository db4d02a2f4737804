//! Tracing subscriber setup
//!
//! Libraries only emit `tracing` events; binaries and tests opt in to
//! printing them with [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Output format of the installed subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Install a global fmt subscriber filtered by `default_filter`.
///
/// `RUST_LOG`, when set and valid, takes precedence over `default_filter`.
/// Returns `false` if a global subscriber was already installed, in which
/// case nothing changes.
pub fn init_tracing(default_filter: &str) -> bool {
    init_tracing_with(LogFormat::Text, default_filter)
}

pub fn init_tracing_with(format: LogFormat, default_filter: &str) -> bool {
    let filter = env_filter(default_filter);
    let installed = match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(?format, "tracing initialised");
    }
    installed.is_ok()
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
