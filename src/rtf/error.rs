//! Error types for the RTF flow-content core.

use thiserror::Error;

/// Result type for flow-content operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Conditions detected by the document-tree diagnostics.
///
/// Tree-shape variants signal bugs in the caller or in the tree engine; they
/// surface only through the invariant checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A node's recorded index disagrees with its slot
    #[error("node at slot {slot} records index {recorded:?}")]
    BrokenIndex { slot: usize, recorded: Option<usize> },

    /// A node's descendant range runs past the end of the array
    #[error("node at slot {slot} claims {child_count} descendants but only {available} slots follow")]
    ChildRangeOverflow {
        slot: usize,
        child_count: usize,
        available: usize,
    },

    /// A node lies inside an ancestor range it is not connected to
    #[error("node at slot {slot} is not contained by its parent at slot {parent:?}")]
    ParentMismatch { slot: usize, parent: Option<usize> },

    /// A structural node has a parent of the wrong type
    #[error("{child} at slot {slot} is nested in {parent}")]
    UnexpectedParent {
        slot: usize,
        child: &'static str,
        parent: &'static str,
    },

    /// Unknown Windows language identifier
    #[error("unknown language identifier {0:#06x}")]
    UnknownLocale(u16),
}
