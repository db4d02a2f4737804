//! Error types used throughout callhop

use std::time::Duration;

use thiserror::Error;

use crate::constants::CANCELED_MESSAGE;
use crate::impl_wire_name_conversions;

/// Broad classes of [`CallError`], used for logging and caller decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport-level failures, including cancellation
    Io,
    /// The server answered with a non-2xx status
    Http,
    /// The call was misused (missing callback, reused call)
    Usage,
    /// The response body could not be turned into the expected type
    Decode,
    /// Invalid or missing configuration
    Config,
}

impl_wire_name_conversions!(ErrorCategory {
    Io => "io",
    Http => "http",
    Usage => "usage",
    Decode => "decode",
    Config => "config",
});

/// Main error type for call execution and delivery
#[derive(Error, Debug)]
pub enum CallError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Synthetic failure delivered when a result arrives after `cancel()`.
    #[error("{}", CANCELED_MESSAGE)]
    Canceled,

    #[error("Already executed")]
    AlreadyExecuted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("HTTP {code} {message}")]
    Http { code: u16, message: String },

    #[error("Response body was empty")]
    EmptyBody,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CallError {
    /// Get the category for this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Canceled | Self::Io(_) | Self::Network(_) | Self::Timeout(_) => {
                ErrorCategory::Io
            }
            Self::Http { .. } => ErrorCategory::Http,
            Self::InvalidArgument(_) | Self::AlreadyExecuted => ErrorCategory::Usage,
            Self::Decode(_) | Self::EmptyBody => ErrorCategory::Decode,
            Self::Config(_) => ErrorCategory::Config,
        }
    }

    /// True for I/O-classified failures. The synthetic cancellation counts.
    pub const fn is_io(&self) -> bool {
        matches!(self.category(), ErrorCategory::Io)
    }

    /// True if this is the synthetic cancellation error.
    pub const fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Result type alias for callhop operations
pub type Result<T> = std::result::Result<T, CallError>;
