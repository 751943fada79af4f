//! Element names of the flow-content markup.

/// Elements the converter emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum XamlName {
    Span,
    LineBreak,
    Hyperlink,
    Paragraph,
    InlineUIContainer,
    BlockUIContainer,
    Image,
    List,
    ListItem,
    Table,
    TableRowGroup,
    TableRow,
    TableCell,
    Section,
    Figure,
    Floater,
    Field,
    ListText,
    TableColumns,
    TableColumn,
}

static XAML_NAMES: [&str; 20] = [
    "Span",
    "LineBreak",
    "Hyperlink",
    "Paragraph",
    "InlineUIContainer",
    "BlockUIContainer",
    "Image",
    "List",
    "ListItem",
    "Table",
    "TableRowGroup",
    "TableRow",
    "TableCell",
    "Section",
    "Figure",
    "Floater",
    "Field",
    "ListText",
    "Table.Columns",
    "TableColumn",
];

impl XamlName {
    #[inline]
    pub fn as_str(self) -> &'static str {
        XAML_NAMES[self as usize]
    }
}

impl std::fmt::Display for XamlName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
