//! rtfflow - Conversion core for turning RTF documents into flow-content markup
//!
//! The crate models the document tree an RTF reader builds while it consumes
//! control words and text, and emits WPF-style flow-content XAML from it
//! (`Section`, `Paragraph`, `Span`, `Hyperlink`, `List`, `ListItem`, `Table`,
//! `TableRowGroup`, `TableRow`, `TableCell`, `LineBreak`).
//!
//! # Features
//!
//! - **Flat tree storage**: the tree lives in a single preorder array, so
//!   wrapping, splitting and excising subtrees are slice edits
//! - **Structural repair**: bidi runs, list margins and directions, table
//!   columns, horizontal and vertical cell merges, misaligned table rows
//! - **Markup emission**: font, color, border, margin and language attributes
//!   derived from the formatting snapshot of each node
//!
//! # Example
//!
//! ```
//! use rtfflow::rtf::{DocumentNode, DocumentNodeArray, DocumentNodeType, DocumentTables};
//!
//! let tables = DocumentTables::default();
//! let mut dna = DocumentNodeArray::new();
//! dna.push(DocumentNode::new(DocumentNodeType::Paragraph));
//! let text = dna.push(DocumentNode::new(DocumentNodeType::Text));
//! dna.node_mut(text).append_xaml_encoded("Hello");
//!
//! // Pending nodes are closed before folding
//! dna.coalesce_all(&tables);
//! assert!(dna.top_level_xaml().contains(">Hello</Paragraph>"));
//! ```

/// Common types and utilities shared by the converter
pub mod common;

/// RTF document tree and flow-content emission
pub mod rtf;
