//! # Callhop Domain
//!
//! Value types shared by every callhop crate.
//!
//! This crate contains:
//! - HTTP request/response descriptions handed between calls and callbacks
//! - The [`CallError`] taxonomy and [`Result`] alias
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other callhop crates
//! - No I/O, no runtime
//! - Pure data types

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
