//! Common types and utilities shared by the converter.
//!
//! Unit conversions, XML text encoding, colors and the crate-level error type.

// Submodule declarations
pub mod error;
pub mod style;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use style::RGBColor;
