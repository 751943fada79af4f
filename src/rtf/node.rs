//! Document tree nodes.
//!
//! A [`DocumentNode`] is one slot of the flattened document tree held by a
//! [`DocumentNodeArray`](super::array::DocumentNodeArray). Nodes never own
//! their children: the descendants of the node at slot `i` are the
//! `child_count` slots that follow it. Every node is stored in the array's
//! arena and addressed by a stable [`NodeId`]; its position in the flat
//! sequence is tracked separately as `index`.

use super::column::ColumnStateArray;
use super::format::FormatState;
use super::names::XamlName;
use crate::common::xml::append_encoded;
use bitflags::bitflags;

/// Stable handle of a node inside its array's arena.
///
/// A handle stays valid for the lifetime of the array, including after the
/// node has been excised from the flat sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(raw: usize) -> Self {
        let raw = u32::try_from(raw);
        debug_assert!(raw.is_ok(), "node arena outgrew 32-bit handles");
        Self(raw.unwrap_or(u32::MAX))
    }

    #[inline]
    pub(crate) fn raw(self) -> usize {
        self.0 as usize
    }
}

/// Node type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DocumentNodeType {
    Text,
    Inline,
    LineBreak,
    Hyperlink,
    Paragraph,
    InlineUIContainer,
    BlockUIContainer,
    Image,
    List,
    ListItem,
    Table,
    TableBody,
    Row,
    Cell,
    Section,
    Figure,
    Floater,
    FieldBegin,
    FieldEnd,
    Shape,
    ListText,
}

bitflags! {
    /// Structural classification of a node type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NodeTraits: u8 {
        /// Flows inside a paragraph
        const INLINE = 0x01;
        /// Block-level container
        const BLOCK = 0x02;
        /// Serialized as a self-closing element
        const EMPTY = 0x04;
        /// Emits no markup of its own
        const HIDDEN = 0x08;
    }
}

/// Per-type traits and element name, indexed by `DocumentNodeType as usize`.
static NODE_TYPE_INFO: [(NodeTraits, Option<XamlName>); 21] = [
    (NodeTraits::INLINE, Some(XamlName::Span)), // Text
    (NodeTraits::INLINE, Some(XamlName::Span)), // Inline
    (NodeTraits::INLINE.union(NodeTraits::EMPTY), Some(XamlName::LineBreak)),
    (NodeTraits::INLINE, Some(XamlName::Hyperlink)),
    (NodeTraits::BLOCK, Some(XamlName::Paragraph)),
    (NodeTraits::INLINE, Some(XamlName::InlineUIContainer)),
    (NodeTraits::BLOCK, Some(XamlName::BlockUIContainer)),
    (NodeTraits::INLINE, Some(XamlName::InlineUIContainer)), // Image
    (NodeTraits::BLOCK, Some(XamlName::List)),
    (NodeTraits::BLOCK, Some(XamlName::ListItem)),
    (NodeTraits::BLOCK, Some(XamlName::Table)),
    (NodeTraits::BLOCK, Some(XamlName::TableRowGroup)),
    (NodeTraits::BLOCK, Some(XamlName::TableRow)),
    (NodeTraits::BLOCK, Some(XamlName::TableCell)),
    (NodeTraits::BLOCK, Some(XamlName::Section)),
    (NodeTraits::BLOCK, Some(XamlName::Figure)),
    (NodeTraits::BLOCK, Some(XamlName::Floater)),
    (NodeTraits::HIDDEN, None), // FieldBegin
    (NodeTraits::HIDDEN, None), // FieldEnd
    (NodeTraits::HIDDEN, None), // Shape
    (NodeTraits::INLINE.union(NodeTraits::HIDDEN), None), // ListText
];

impl DocumentNodeType {
    #[inline]
    pub fn traits(self) -> NodeTraits {
        NODE_TYPE_INFO[self as usize].0
    }

    /// Element emitted for nodes of this type, if any.
    #[inline]
    pub fn xaml_name(self) -> Option<XamlName> {
        NODE_TYPE_INFO[self as usize].1
    }

    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            DocumentNodeType::Text => "Text",
            DocumentNodeType::Inline => "Inline",
            DocumentNodeType::LineBreak => "LineBreak",
            DocumentNodeType::Hyperlink => "Hyperlink",
            DocumentNodeType::Paragraph => "Paragraph",
            DocumentNodeType::InlineUIContainer => "InlineUIContainer",
            DocumentNodeType::BlockUIContainer => "BlockUIContainer",
            DocumentNodeType::Image => "Image",
            DocumentNodeType::List => "List",
            DocumentNodeType::ListItem => "ListItem",
            DocumentNodeType::Table => "Table",
            DocumentNodeType::TableBody => "TableBody",
            DocumentNodeType::Row => "Row",
            DocumentNodeType::Cell => "Cell",
            DocumentNodeType::Section => "Section",
            DocumentNodeType::Figure => "Figure",
            DocumentNodeType::Floater => "Floater",
            DocumentNodeType::FieldBegin => "FieldBegin",
            DocumentNodeType::FieldEnd => "FieldEnd",
            DocumentNodeType::Shape => "Shape",
            DocumentNodeType::ListText => "ListText",
        }
    }
}

/// Type-dependent string payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeAux {
    #[default]
    None,
    /// Generated label of a list item
    ListLabel(String),
    /// Target of a hyperlink
    NavigateUri(String),
}

/// One node of the flattened document tree.
#[derive(Debug, Clone)]
pub struct DocumentNode {
    ty: DocumentNodeType,
    pub(crate) index: Option<usize>,
    pub(crate) child_count: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) pending: bool,
    pub(crate) terminated: bool,
    /// Already reshaped by a repair pass
    pub(crate) repaired: bool,
    matched: bool,
    pub format: FormatState,
    pub(crate) row_span: u32,
    pub(crate) col_span: u32,
    virtual_list_level: Option<u32>,
    aux: NodeAux,
    pub(crate) xaml: String,
    has_marker_content: bool,
    pub(crate) columns: Option<ColumnStateArray>,
}

impl DocumentNode {
    /// Create a pending, detached node with default formatting.
    pub fn new(ty: DocumentNodeType) -> Self {
        Self {
            ty,
            index: None,
            child_count: 0,
            parent: None,
            pending: true,
            terminated: false,
            repaired: false,
            matched: ty != DocumentNodeType::FieldBegin,
            format: FormatState::default(),
            row_span: 1,
            col_span: 1,
            virtual_list_level: None,
            aux: NodeAux::None,
            xaml: String::new(),
            has_marker_content: false,
            columns: None,
        }
    }

    /// Create a node whose formatting starts from `format`.
    pub fn with_format(ty: DocumentNodeType, format: FormatState) -> Self {
        let mut node = Self::new(ty);
        node.format = format;
        node
    }

    #[inline]
    pub fn node_type(&self) -> DocumentNodeType {
        self.ty
    }

    /// Slot in the owning array, `None` while detached.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.index.is_some()
    }

    /// Number of slots occupied by all descendants.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// Slot of the last descendant (the node's own slot when it has none).
    #[inline]
    pub fn last_child_index(&self) -> Option<usize> {
        self.index.map(|i| i + self.child_count)
    }

    /// Parent fixed by closing; see `DocumentNodeArray::parent_during_parse`
    /// for the parse-time fallback.
    #[inline]
    pub fn closed_parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Open and not yet closed. Detached nodes are never pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.index.is_some() && self.pending
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched
    }

    #[inline]
    pub fn set_matched(&mut self, matched: bool) {
        self.matched = matched;
    }

    /// Whether the node still belongs in the open-node set.
    pub fn is_tracked_as_open(&self) -> bool {
        self.index.is_some()
            && self.ty != DocumentNodeType::FieldEnd
            && ((self.is_pending() && !self.terminated) || !self.matched)
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        self.ty.traits().contains(NodeTraits::INLINE)
    }

    #[inline]
    pub fn is_block(&self) -> bool {
        self.ty.traits().contains(NodeTraits::BLOCK)
    }

    #[inline]
    pub fn is_empty_node(&self) -> bool {
        self.ty.traits().contains(NodeTraits::EMPTY)
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.ty.traits().contains(NodeTraits::HIDDEN)
    }

    /// Unterminated text holding nothing but whitespace.
    pub fn is_whitespace(&self) -> bool {
        !self.terminated && self.ty == DocumentNodeType::Text && self.xaml.trim().is_empty()
    }

    /// Has descendants or content of its own.
    #[inline]
    pub fn is_non_empty(&self) -> bool {
        self.child_count > 0 || !self.xaml.is_empty()
    }

    #[inline]
    pub fn row_span(&self) -> u32 {
        self.row_span
    }

    #[inline]
    pub fn set_row_span(&mut self, row_span: u32) {
        self.row_span = row_span;
    }

    /// Columns covered; 0 marks a cell absorbed by a merge.
    #[inline]
    pub fn col_span(&self) -> u32 {
        self.col_span
    }

    #[inline]
    pub fn set_col_span(&mut self, col_span: u32) {
        self.col_span = col_span;
    }

    #[inline]
    pub fn virtual_list_level(&self) -> Option<u32> {
        self.virtual_list_level
    }

    #[inline]
    pub fn set_virtual_list_level(&mut self, level: Option<u32>) {
        self.virtual_list_level = level;
    }

    #[inline]
    pub fn aux(&self) -> &NodeAux {
        &self.aux
    }

    pub fn list_label(&self) -> Option<&str> {
        match &self.aux {
            NodeAux::ListLabel(s) => Some(s),
            _ => None,
        }
    }

    pub fn set_list_label(&mut self, label: impl Into<String>) {
        self.aux = NodeAux::ListLabel(label.into());
    }

    pub fn navigate_uri(&self) -> Option<&str> {
        match &self.aux {
            NodeAux::NavigateUri(s) => Some(s),
            _ => None,
        }
    }

    pub fn set_navigate_uri(&mut self, uri: impl Into<String>) {
        self.aux = NodeAux::NavigateUri(uri.into());
    }

    #[inline]
    pub fn has_marker_content(&self) -> bool {
        self.has_marker_content
    }

    #[inline]
    pub fn set_has_marker_content(&mut self, value: bool) {
        self.has_marker_content = value;
    }

    /// Resolved column grid; present on tables once pre-coalesced.
    #[inline]
    pub fn column_state_array(&self) -> Option<&ColumnStateArray> {
        self.columns.as_ref()
    }

    /// Serialized output accumulated so far.
    #[inline]
    pub fn xaml(&self) -> &str {
        &self.xaml
    }

    /// Start a new block scope from `parent` formatting.
    ///
    /// Character formatting is inherited; indents, spacing, list marker and
    /// paragraph background restart at their defaults.
    pub fn inherit_format_state(&mut self, parent: &FormatState) {
        self.format = parent.for_new_block();
    }

    /// Append text content, escaping markup characters.
    ///
    /// `&`, `<` and `>` become entity references, form feed becomes `&#xc;`,
    /// tab is kept and every other control character is dropped.
    pub fn append_xaml_encoded(&mut self, text: &str) {
        append_encoded(&mut self.xaml, text);
    }

    /// Append UTF-16 text content, dropping unpaired surrogates first.
    pub fn append_xaml_encoded_utf16(&mut self, units: &[u16]) {
        let clean = strip_invalid_chars(units);
        let text: String = char::decode_utf16(clean.iter().copied())
            .filter_map(Result::ok)
            .collect();
        append_encoded(&mut self.xaml, &text);
    }

    /// Append already-serialized markup verbatim.
    #[inline]
    pub fn append_xaml(&mut self, xaml: &str) {
        self.xaml.push_str(xaml);
    }
}

/// Remove unpaired UTF-16 surrogates.
///
/// A high surrogate not immediately followed by a low surrogate is dropped, as
/// is a low surrogate with no high surrogate before it. Well-formed pairs and
/// all other units pass through unchanged.
pub fn strip_invalid_chars(units: &[u16]) -> Vec<u16> {
    const fn is_high(u: u16) -> bool {
        matches!(u, 0xD800..=0xDBFF)
    }
    const fn is_low(u: u16) -> bool {
        matches!(u, 0xDC00..=0xDFFF)
    }

    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let u = units[i];
        if is_high(u) {
            match units.get(i + 1) {
                Some(&next) if is_low(next) => {
                    out.push(u);
                    out.push(next);
                    i += 2;
                    continue;
                },
                _ => {},
            }
        } else if !is_low(u) {
            out.push(u);
        }
        i += 1;
    }
    out
}
