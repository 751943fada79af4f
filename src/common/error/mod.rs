//! Unified error type for rtfflow.
//!
//! Module-level errors (such as [`crate::rtf::FlowError`]) convert into
//! [`Error`] so callers can use a single `Result` across the crate.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
