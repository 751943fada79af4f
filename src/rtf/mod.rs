//! RTF to flow-content conversion core.
//!
//! This module holds the document tree an RTF reader builds while it walks
//! the token stream, and the machinery that turns that tree into flow-content
//! markup (`Section`, `Paragraph`, `Table`, `List`, ...).
//!
//! # Architecture
//!
//! - **Nodes**: [`DocumentNode`] carries a type, a snapshot of the character,
//!   paragraph and row formatting in effect, and an accumulated markup buffer
//! - **Array**: [`DocumentNodeArray`] stores the whole tree as a flat preorder
//!   sequence; each node knows its slot and the size of its subtree
//! - **Repair**: before emission, bidi runs are wrapped, list margins and
//!   directions are normalized, and table geometry is resolved (columns,
//!   horizontal and vertical merges, splitting tables whose rows do not align)
//! - **Coalescing**: subtrees are folded bottom-up into their root, leaving the
//!   finished markup on the surviving nodes
//!
//! # Example
//!
//! ```rust
//! use rtfflow::rtf::{DocumentNode, DocumentNodeArray, DocumentNodeType, DocumentTables, HAlign};
//!
//! let tables = DocumentTables::default();
//! let mut dna = DocumentNodeArray::new();
//!
//! let mut para = DocumentNode::new(DocumentNodeType::Paragraph);
//! para.format.h_align = HAlign::Center;
//! dna.push(para);
//!
//! let text = dna.push(DocumentNode::new(DocumentNodeType::Text));
//! dna.node_mut(text).append_xaml_encoded("Hello & welcome");
//! dna.close_at(1);
//! dna.close_at(0);
//!
//! dna.coalesce_all(&tables);
//! let xaml = dna.top_level_xaml();
//! assert!(xaml.starts_with("<Paragraph "));
//! assert!(xaml.contains("TextAlignment=\"Center\""));
//! assert!(xaml.contains("Hello &amp; welcome"));
//! ```

mod array;
mod border;
mod coalesce;
mod column;
mod converter;
mod error;
mod format;
mod lang;
mod list;
mod markup;
mod names;
mod node;
mod options;
mod types;

// Re-exports
pub use array::DocumentNodeArray;
pub use border::{Border, BorderStyle, Borders};
pub use column::{ColumnState, ColumnStateArray};
pub use converter::{ConverterState, DocumentTables, SHADING_FULL};
pub use error::{FlowError, FlowResult};
pub use format::{CellFormat, CellMerge, DirState, FormatState, HAlign, RowFormat, Strike, Underline};
pub use lang::language_tag;
pub use list::{MarkerList, MarkerListEntry, MarkerStyle};
pub use names::XamlName;
pub use node::{DocumentNode, DocumentNodeType, NodeAux, NodeId, NodeTraits, strip_invalid_chars};
pub use options::XamlOptions;
pub use types::{ColorRef, ColorTable, ColorTableEntry, FontRef, FontTable, FontTableEntry};
