//! Unified error type for rtfflow.
use crate::rtf::FlowError;
use thiserror::Error;

/// Main error type for rtfflow operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Document tree error
    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Result type for rtfflow operations.
pub type Result<T> = std::result::Result<T, Error>;
