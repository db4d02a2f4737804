//! # Callhop Infrastructure
//!
//! Runtime-backed implementations of the ports defined in `callhop-core`.
//!
//! This crate contains:
//! - Tokio executors and a dedicated callback runtime
//! - A reqwest-backed [`Call`](callhop_core::Call) implementation
//! - Configuration loading (environment, TOML, JSON)
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `callhop-core`
//! - Depends on `callhop-domain` and `callhop-core`
//! - Contains all "impure" code (network, threads, environment)

pub mod config;
pub mod executor;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use executor::{CallbackRuntime, TokioExecutor};
pub use http::{HttpCall, HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, init_tracing_with, LogFormat};
