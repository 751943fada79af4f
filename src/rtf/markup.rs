//! Per-node flow-content markup.
//!
//! Each node contributes an opening fragment (prefix) and a closing fragment
//! (postfix) around its own content and its folded children. Formatting
//! attributes are emitted as differences from a baseline: the parent's
//! formatting for character properties, the parent's direction for
//! `FlowDirection`.

use super::array::DocumentNodeArray;
use super::border::{Border, BorderStyle, Borders};
use super::converter::ConverterState;
use super::format::{DirState, FormatState, RowFormat, Strike, Underline, EMPTY_FORMAT_STATE};
use super::lang::language_tag;
use super::list::MarkerStyle;
use super::node::{DocumentNodeType, NodeId};
use crate::common::unit::{push_int, push_positive_twip_px, push_twip_px};
use crate::common::xml::escape_xml_attr;

const LOG_TARGET: &str = "rtfflow.markup";

/// Minimum list item indent at the outermost list level, in twips.
const MIN_LIST_INDENT: i64 = 360;

const CRLF: &str = "\r\n";

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(value);
    out.push('"');
}

fn push_px_quad(out: &mut String, name: &str, values: [i64; 4], signed: bool) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for (i, v) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if signed {
            push_twip_px(out, v);
        } else {
            push_positive_twip_px(out, v);
        }
    }
    out.push('"');
}

fn push_borders(out: &mut String, borders: &Borders, state: &dyn ConverterState) {
    let [l, t, r, b] = borders.ltrb().map(|b| b.effective_width());
    push_px_quad(out, "BorderThickness", [l, t, r, b], false);
    let brush = state.solid_color(borders.brush_color()).unwrap_or_default();
    push_attr(out, "BorderBrush", &brush.to_argb_hex());
}

impl DocumentNodeArray {
    // ------------------------------------------------------------------
    // Direction
    // ------------------------------------------------------------------

    /// Resolved direction of a node.
    ///
    /// Inline nodes use their character direction, paragraphs and lists their
    /// paragraph direction and tables their row direction. An unset direction,
    /// and every other node type, inherits from the parent. The root default
    /// is left-to-right.
    pub fn xaml_dir(&self, id: NodeId) -> DirState {
        let n = self.node(id);
        let own = if n.is_inline() {
            n.format.dir_char
        } else {
            match n.node_type() {
                DocumentNodeType::Paragraph | DocumentNodeType::List => n.format.dir_para,
                DocumentNodeType::Table => self
                    .table_row_format(id)
                    .map_or(DirState::Default, |rf| rf.dir),
                _ => DirState::Default,
            }
        };
        match own {
            DirState::Default => self.parent_xaml_dir(id),
            dir => dir,
        }
    }

    /// Resolved direction of the node's context.
    pub fn parent_xaml_dir(&self, id: NodeId) -> DirState {
        self.parent_during_parse(id)
            .map_or(DirState::Ltr, |p| self.xaml_dir(p))
    }

    /// Whether the node must state its own `FlowDirection`.
    #[inline]
    pub fn requires_xaml_dir(&self, id: NodeId) -> bool {
        self.xaml_dir(id) != self.parent_xaml_dir(id)
    }

    /// Indent on the side text starts from.
    pub fn near_margin(&self, id: NodeId) -> i64 {
        let fs = &self.node(id).format;
        if self.parent_xaml_dir(id).is_rtl() { fs.ri } else { fs.li }
    }

    /// Indent on the side text flows towards.
    pub fn far_margin(&self, id: NodeId) -> i64 {
        let fs = &self.node(id).format;
        if self.parent_xaml_dir(id).is_rtl() { fs.li } else { fs.ri }
    }

    pub fn set_near_margin(&mut self, id: NodeId, margin: i64) {
        let rtl = self.parent_xaml_dir(id).is_rtl();
        let fs = &mut self.node_mut(id).format;
        if rtl {
            fs.ri = margin;
        } else {
            fs.li = margin;
        }
    }

    // ------------------------------------------------------------------
    // Character formatting
    // ------------------------------------------------------------------

    /// Formatting that character properties are compared against.
    ///
    /// This is the parent's, skipping a hyperlink parent. Paragraphs and
    /// parentless nodes compare against the default formatting.
    pub fn parent_format_state_for_font(&self, id: NodeId) -> &FormatState {
        if self.node(id).node_type() == DocumentNodeType::Paragraph {
            return &EMPTY_FORMAT_STATE;
        }
        let mut parent = self.parent_during_parse(id);
        if let Some(p) = parent
            && self.node(p).node_type() == DocumentNodeType::Hyperlink
        {
            parent = self.parent_during_parse(p);
        }
        parent.map_or(&EMPTY_FORMAT_STATE, |p| &self.node(p).format)
    }

    /// Whether any character property differs from the font baseline.
    pub fn requires_xaml_font_properties(&self, id: NodeId) -> bool {
        self.node(id)
            .format
            .font_differs_from(self.parent_format_state_for_font(id))
    }

    /// Append the character attributes that differ from the font baseline.
    pub fn append_xaml_font_properties(
        &self,
        id: NodeId,
        state: &dyn ConverterState,
        out: &mut String,
    ) {
        let fs = &self.node(id).format;
        let base = self.parent_format_state_for_font(id);

        if fs.font != base.font
            && let Some(entry) = fs.font.and_then(|f| state.font_entry(f))
            && !entry.name.is_empty()
        {
            let name: String = entry
                .name
                .chars()
                .take(self.options().max_font_name_len)
                .collect();
            push_attr(out, "FontFamily", &escape_xml_attr(&name));
        }

        if fs.font_size != base.font_size
            && let Some(size) = fs.font_size
        {
            let size = if size <= 1 { 2 } else { size };
            out.push_str(" FontSize=\"");
            push_int(out, i64::from(size / 2));
            if size % 2 == 1 {
                out.push_str(".5");
            }
            out.push_str("pt\"");
        }

        if fs.bold != base.bold {
            push_attr(out, "FontWeight", if fs.bold { "Bold" } else { "Normal" });
        }
        if fs.italic != base.italic {
            push_attr(out, "FontStyle", if fs.italic { "Italic" } else { "Normal" });
        }

        if fs.cf != base.cf
            && let Some(color) = state.solid_color(fs.cf)
        {
            push_attr(out, "Foreground", &color.to_argb_hex());
        }

        if fs.underline != base.underline || fs.strike != base.strike {
            let underline = fs.underline != Underline::None;
            let strike = fs.strike != Strike::None;
            let value = match (underline, strike) {
                (true, true) => "Underline, Strikethrough",
                (true, false) => "Underline",
                (false, true) => "Strikethrough",
                (false, false) => "None",
            };
            push_attr(out, "TextDecorations", value);
        }

        if self.options().emit_language
            && fs.lang_cur != base.lang_cur
            && let Some(lcid) = fs.lang_cur
        {
            match language_tag(lcid) {
                Ok(tag) => push_attr(out, "xml:lang", tag),
                Err(err) => log::debug!(target: LOG_TARGET, "skipping language: {err}"),
            }
        }
    }

    /// Attributes of the `<Span>` wrapping an inline node.
    fn inline_span_attributes(&self, id: NodeId, state: &dyn ConverterState) -> String {
        let mut attrs = String::new();
        let fs = &self.node(id).format;
        let base = self.parent_format_state_for_font(id);

        if self.requires_xaml_dir(id) {
            push_attr(&mut attrs, "FlowDirection", self.xaml_dir(id).flow_direction());
        }
        if fs.cb != base.cb
            && let Some(color) = state.solid_color(fs.cb)
        {
            push_attr(&mut attrs, "Background", &color.to_argb_hex());
        }
        self.append_xaml_font_properties(id, state, &mut attrs);
        if fs.superscript != base.superscript || fs.subscript != base.subscript {
            let variant = if fs.superscript {
                "Superscript"
            } else if fs.subscript {
                "Subscript"
            } else {
                "Normal"
            };
            push_attr(&mut attrs, "Typography.Variants", variant);
        }
        attrs
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Row definition describing a table: its own, else its first row's.
    pub(crate) fn table_row_format(&self, table: NodeId) -> Option<&RowFormat> {
        let n = self.node(table);
        if let Some(rf) = n.format.row_format.as_ref() {
            return Some(rf);
        }
        let index = n.index?;
        ((index + 1)..=(index + n.child_count).min(self.len().saturating_sub(1)))
            .filter_map(|i| self.entry_at(i))
            .find(|&row| self.node(row).node_type() == DocumentNodeType::Row)
            .and_then(|row| self.node(row).format.row_format.as_ref())
    }

    fn table_prefix(&self, id: NodeId, out: &mut String) {
        let rf = self.table_row_format(id);
        out.push_str("<Table");
        if self.requires_xaml_dir(id) {
            push_attr(out, "FlowDirection", self.xaml_dir(id).flow_direction());
        }
        out.push_str(" CellSpacing=\"");
        push_positive_twip_px(out, rf.map_or(0, |rf| rf.gap));
        out.push_str("\" Margin=\"");
        push_twip_px(out, rf.map_or(0, |rf| rf.left));
        out.push_str(",0,0,0\">");

        if !self.options().emit_table_columns {
            return;
        }
        let Some(columns) = self.node(id).column_state_array() else {
            return;
        };
        if columns.is_empty() {
            return;
        }
        out.push_str("<Table.Columns>");
        for width in columns.widths(rf.map_or(0, |rf| rf.left)) {
            out.push_str("<TableColumn Width=\"");
            push_positive_twip_px(out, width);
            out.push_str("\" />");
        }
        out.push_str("</Table.Columns>");
    }

    fn cell_prefix(&self, id: NodeId, state: &dyn ConverterState, out: &mut String) {
        let n = self.node(id);
        out.push_str("<TableCell");

        let cell_format = self.parent(id).and_then(|row| {
            let rf = self.node(row).format.row_format.as_ref()?;
            rf.nth_cell(self.child_ordinal(id)?)
        });
        match cell_format {
            Some(cf) => {
                if cf.borders.has_any_border() {
                    push_borders(out, &cf.borders, state);
                }
                if let Some(color) = state.color_to_use(cf.cb, cf.cf, cf.shading) {
                    push_attr(out, "Background", &color.to_argb_hex());
                }
            },
            None => push_borders(out, &Borders::all(Border::new(BorderStyle::Single)), state),
        }

        if n.col_span() > 1 {
            out.push_str(" ColumnSpan=\"");
            push_int(out, i64::from(n.col_span()));
            out.push('"');
        }
        if n.row_span() > 1 {
            out.push_str(" RowSpan=\"");
            push_int(out, i64::from(n.row_span()));
            out.push('"');
        }
        if self.requires_xaml_dir(id) {
            push_attr(out, "FlowDirection", self.xaml_dir(id).flow_direction());
        }
        out.push('>');
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    fn paragraph_prefix(&self, id: NodeId, state: &dyn ConverterState, out: &mut String) {
        let fs = &self.node(id).format;
        out.push_str("<Paragraph");

        if let Some(color) = state.color_to_use(fs.cb_para, fs.cf_para, fs.para_shading) {
            push_attr(out, "Background", &color.to_argb_hex());
        }
        if self.requires_xaml_dir(id) {
            push_attr(out, "FlowDirection", self.xaml_dir(id).flow_direction());
        }
        push_px_quad(
            out,
            "Margin",
            [self.near_margin(id), fs.sb, self.far_margin(id), fs.sa],
            false,
        );
        self.append_xaml_font_properties(id, state, out);
        if fs.fi != 0 {
            out.push_str(" TextIndent=\"");
            push_twip_px(out, fs.fi);
            out.push('"');
        }
        if let Some(align) = fs.h_align.text_alignment(self.xaml_dir(id)) {
            push_attr(out, "TextAlignment", align);
        }
        if fs.has_para_border() {
            push_borders(out, &fs.para_borders, state);
        }
        out.push('>');
    }

    fn list_item_prefix(&self, id: NodeId, out: &mut String) {
        let mut margin = self.near_margin(id);
        if margin < MIN_LIST_INDENT && self.list_depth(id) == 1 {
            let hidden = self
                .parent_of_type(id, DocumentNodeType::List)
                .is_some_and(|list| self.node(list).format.marker == MarkerStyle::Hidden);
            if !hidden {
                margin = MIN_LIST_INDENT;
            }
        }
        out.push_str("<ListItem Margin=\"");
        push_positive_twip_px(out, margin);
        out.push_str(",0,0,0\">");
    }

    fn list_prefix(&self, id: NodeId, out: &mut String) {
        let fs = &self.node(id).format;
        out.push_str("<List Margin=\"0,0,0,0\" Padding=\"0,0,0,0\"");
        push_attr(out, "MarkerStyle", fs.marker.xaml_name());
        if let Some(start) = fs.start_index
            && start != 1
        {
            out.push_str(" StartIndex=\"");
            push_int(out, start);
            out.push('"');
        }
        if self.requires_xaml_dir(id) {
            push_attr(out, "FlowDirection", self.xaml_dir(id).flow_direction());
        }
        out.push('>');
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Opening fragment of a node.
    pub fn xaml_prefix(&self, id: NodeId, state: &dyn ConverterState) -> String {
        use DocumentNodeType as T;
        let n = self.node(id);
        let mut out = String::new();
        if n.is_hidden() {
            return out;
        }

        match n.node_type() {
            T::Text => {
                let attrs = self.inline_span_attributes(id, state);
                if !attrs.is_empty() {
                    out.push_str("<Span");
                    out.push_str(&attrs);
                    out.push('>');
                }
            },
            T::Inline => {
                out.push_str("<Span");
                out.push_str(&self.inline_span_attributes(id, state));
                out.push('>');
            },
            T::LineBreak => {
                if self.requires_xaml_font_properties(id) {
                    out.push_str("<Span");
                    self.append_xaml_font_properties(id, state, &mut out);
                    out.push('>');
                }
                out.push_str("<LineBreak />");
            },
            T::Hyperlink => {
                out.push_str("<Hyperlink");
                if self.requires_xaml_dir(id) {
                    push_attr(&mut out, "FlowDirection", self.xaml_dir(id).flow_direction());
                }
                if let Some(uri) = n.navigate_uri()
                    && !uri.is_empty()
                {
                    push_attr(&mut out, "NavigateUri", &escape_xml_attr(uri));
                }
                out.push('>');
            },
            T::Paragraph => self.paragraph_prefix(id, state, &mut out),
            T::ListItem => self.list_item_prefix(id, &mut out),
            T::List => self.list_prefix(id, &mut out),
            T::Table => self.table_prefix(id, &mut out),
            T::Cell => self.cell_prefix(id, state, &mut out),
            ty => {
                if let Some(name) = ty.xaml_name() {
                    out.push('<');
                    out.push_str(name.as_str());
                    out.push('>');
                }
            },
        }
        out
    }

    /// Closing fragment of a node.
    pub fn xaml_postfix(&self, id: NodeId, state: &dyn ConverterState) -> String {
        use DocumentNodeType as T;
        let n = self.node(id);
        let mut out = String::new();
        if n.is_hidden() {
            return out;
        }

        match n.node_type() {
            T::Text => {
                if !self.inline_span_attributes(id, state).is_empty() {
                    out.push_str("</Span>");
                }
            },
            T::LineBreak => {
                if self.requires_xaml_font_properties(id) {
                    out.push_str("</Span>");
                }
            },
            ty => {
                let Some(name) = ty.xaml_name() else {
                    return out;
                };
                out.push_str("</");
                out.push_str(name.as_str());
                out.push('>');
                if n.is_block() {
                    out.push_str(CRLF);
                }
            },
        }
        out
    }

    /// Prepend the node's opening fragment to its content.
    pub fn append_xaml_prefix(&mut self, id: NodeId, state: &dyn ConverterState) {
        let prefix = self.xaml_prefix(id, state);
        self.node_mut(id).xaml.insert_str(0, &prefix);
    }

    /// Append the node's closing fragment to its content.
    pub fn append_xaml_postfix(&mut self, id: NodeId, state: &dyn ConverterState) {
        let postfix = self.xaml_postfix(id, state);
        self.node_mut(id).xaml.push_str(&postfix);
    }

    /// Wrap a leaf node's content in its markup. Repeated calls have no
    /// further effect.
    ///
    /// Unpaired surrogates never reach the content buffer; UTF-16 input is
    /// cleaned by [`DocumentNode::append_xaml_encoded_utf16`].
    ///
    /// [`DocumentNode::append_xaml_encoded_utf16`]: super::node::DocumentNode::append_xaml_encoded_utf16
    pub fn terminate(&mut self, id: NodeId, state: &dyn ConverterState) {
        if self.node(id).is_terminated() {
            return;
        }
        let prefix = self.xaml_prefix(id, state);
        let postfix = self.xaml_postfix(id, state);
        let n = self.node_mut(id);
        n.xaml.insert_str(0, &prefix);
        n.xaml.push_str(&postfix);
        n.terminated = true;
        self.finish_terminated(id);
    }

    /// Post-processing shared by leaf termination and folding.
    pub(crate) fn finish_terminated(&mut self, id: NodeId) {
        let n = self.node(id);
        if n.node_type() == DocumentNodeType::ListText {
            if !n.xaml().trim().is_empty()
                && let Some(item) = self.parent_of_type(id, DocumentNodeType::ListItem)
            {
                self.node_mut(item).set_has_marker_content(true);
            }
            self.node_mut(id).xaml.clear();
        } else if n.col_span() == 0 {
            self.node_mut(id).xaml.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::style::RGBColor;
    use crate::rtf::converter::DocumentTables;
    use crate::rtf::format::HAlign;
    use crate::rtf::node::DocumentNode;
    use crate::rtf::options::XamlOptions;
    use crate::rtf::types::{ColorTableEntry, FontTableEntry};
    use DocumentNodeType as T;

    fn tables() -> DocumentTables {
        let mut t = DocumentTables::default();
        t.fonts.insert(0, FontTableEntry::new("Times New Roman"));
        t.fonts
            .insert(1, FontTableEntry::new("An Extraordinarily Long Font Family Name"));
        t.colors.add(ColorTableEntry::auto());
        t.colors.add_color(RGBColor::new(0xFF, 0, 0));
        t.colors.add_color(RGBColor::new(0, 0x80, 0));
        t
    }

    fn dna() -> DocumentNodeArray {
        DocumentNodeArray::with_options(XamlOptions::new().with_invariant_checks(true))
    }

    fn push_with(dna: &mut DocumentNodeArray, ty: T, f: impl FnOnce(&mut FormatState)) -> NodeId {
        let mut node = DocumentNode::new(ty);
        f(&mut node.format);
        dna.push(node)
    }

    #[test]
    fn test_paragraph_attributes() {
        let state = tables();
        let mut dna = dna();
        let para = push_with(&mut dna, T::Paragraph, |fs| {
            fs.li = 720;
            fs.ri = 150;
            fs.sb = 240;
            fs.sa = -15;
            fs.fi = -360;
            fs.h_align = HAlign::Center;
            fs.bold = true;
            fs.cb_para = Some(2);
        });
        dna.close_at(0);

        assert_eq!(
            dna.xaml_prefix(para, &state),
            "<Paragraph Background=\"#FF008000\" Margin=\"48,16,10,0\" FontWeight=\"Bold\" \
             TextIndent=\"-24\" TextAlignment=\"Center\">"
        );
        assert_eq!(dna.xaml_postfix(para, &state), "</Paragraph>\r\n");
    }

    #[test]
    fn test_paragraph_borders() {
        let state = tables();
        let mut dna = dna();
        let para = push_with(&mut dna, T::Paragraph, |fs| {
            fs.para_borders.top = Border::new(BorderStyle::Single).with_width(30).with_color(1);
            fs.para_borders.bottom = Border::new(BorderStyle::Single);
        });
        dna.close_at(0);
        let prefix = dna.xaml_prefix(para, &state);
        assert!(
            prefix.ends_with(" BorderThickness=\"0,2,0,1\" BorderBrush=\"#FFFF0000\">"),
            "{prefix}"
        );
    }

    #[test]
    fn test_rtl_paragraph_swaps_margins_and_alignment() {
        let state = tables();
        let mut dna = dna();
        let para = push_with(&mut dna, T::Paragraph, |fs| {
            fs.dir_para = DirState::Rtl;
            fs.li = 150;
            fs.ri = 300;
            fs.h_align = HAlign::Left;
        });
        dna.close_at(0);
        // Root context is left-to-right, so margins stay physical
        assert_eq!(dna.near_margin(para), 150);
        assert_eq!(
            dna.xaml_prefix(para, &state),
            "<Paragraph FlowDirection=\"RightToLeft\" Margin=\"10,0,20,0\" TextAlignment=\"Right\">"
        );
    }

    #[test]
    fn test_near_margin_follows_context_direction() {
        let mut dna = dna();
        push_with(&mut dna, T::List, |fs| fs.dir_para = DirState::Rtl);
        let item = push_with(&mut dna, T::ListItem, |fs| {
            fs.li = 100;
            fs.ri = 200;
        });
        dna.close_at(0);
        assert_eq!(dna.near_margin(item), 200);
        assert_eq!(dna.far_margin(item), 100);
        dna.set_near_margin(item, 50);
        assert_eq!(dna.node(item).format.ri, 50);
    }

    #[test]
    fn test_text_without_differences_has_no_span() {
        let state = tables();
        let mut dna = dna();
        push_with(&mut dna, T::Paragraph, |fs| fs.bold = true);
        let text = push_with(&mut dna, T::Text, |fs| fs.bold = true);
        dna.close_at(0);
        assert!(!dna.requires_xaml_font_properties(text));
        assert_eq!(dna.xaml_prefix(text, &state), "");
        assert_eq!(dna.xaml_postfix(text, &state), "");
    }

    #[test]
    fn test_inline_span_attributes() {
        let state = tables();
        let mut dna = dna();
        push_with(&mut dna, T::Paragraph, |fs| fs.font = Some(0));
        let text = push_with(&mut dna, T::Text, |fs| {
            fs.font = Some(1);
            fs.font_size = Some(21);
            fs.italic = true;
            fs.cf = Some(1);
            fs.cb = Some(2);
            fs.underline = Underline::Normal;
            fs.superscript = true;
            fs.lang_cur = Some(0x0407);
        });
        dna.close_at(0);

        assert_eq!(
            dna.xaml_prefix(text, &state),
            "<Span Background=\"#FF008000\" FontFamily=\"An Extraordinarily Long Font Fam\" \
             FontSize=\"10.5pt\" FontStyle=\"Italic\" Foreground=\"#FFFF0000\" \
             TextDecorations=\"Underline\" xml:lang=\"de-DE\" Typography.Variants=\"Superscript\">"
        );
        assert_eq!(dna.xaml_postfix(text, &state), "</Span>");
    }

    #[test]
    fn test_font_size_floor_and_auto_color() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        let text = push_with(&mut dna, T::Inline, |fs| {
            fs.font_size = Some(1);
            fs.cf = Some(0);
        });
        dna.close_at(0);
        // Auto color entries emit nothing
        assert_eq!(dna.xaml_prefix(text, &state), "<Span FontSize=\"1pt\">");
    }

    fn push(dna: &mut DocumentNodeArray, ty: T) -> NodeId {
        dna.push(DocumentNode::new(ty))
    }

    #[test]
    fn test_unknown_language_is_skipped() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        let text = push_with(&mut dna, T::Text, |fs| fs.lang_cur = Some(0x7FFF));
        dna.close_at(0);
        assert!(dna.requires_xaml_font_properties(text));
        let mut out = String::new();
        dna.append_xaml_font_properties(text, &state, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_hyperlink_is_skipped_as_font_baseline() {
        let state = tables();
        let mut dna = dna();
        push_with(&mut dna, T::Paragraph, |fs| fs.cf = Some(1));
        let link = push_with(&mut dna, T::Hyperlink, |fs| fs.cf = Some(2));
        dna.node_mut(link).set_navigate_uri("http://a.example/?x=1&y=\"2\"");
        let text = push_with(&mut dna, T::Text, |fs| fs.cf = Some(2));
        dna.close_at(0);

        assert_eq!(dna.parent_format_state_for_font(text).cf, Some(1));
        assert_eq!(dna.xaml_prefix(text, &state), "<Span Foreground=\"#FF008000\">");
        assert_eq!(
            dna.xaml_prefix(link, &state),
            "<Hyperlink NavigateUri=\"http://a.example/?x=1&amp;y=&quot;2&quot;\">"
        );
        assert_eq!(dna.xaml_postfix(link, &state), "</Hyperlink>");
    }

    #[test]
    fn test_line_break_wraps_in_span_for_fonts() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        let plain = push(&mut dna, T::LineBreak);
        dna.close_at(1);
        let bold = push_with(&mut dna, T::LineBreak, |fs| fs.bold = true);
        dna.close_at(0);

        dna.terminate(plain, &state);
        dna.terminate(bold, &state);
        assert_eq!(dna.node(plain).xaml(), "<LineBreak />");
        assert_eq!(
            dna.node(bold).xaml(),
            "<Span FontWeight=\"Bold\"><LineBreak /></Span>"
        );
    }

    #[test]
    fn test_terminate_is_idempotent() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        let text = push_with(&mut dna, T::Text, |fs| fs.bold = true);
        dna.node_mut(text).append_xaml_encoded("a<b");
        dna.close_at(0);

        dna.terminate(text, &state);
        let once = dna.node(text).xaml().to_string();
        dna.terminate(text, &state);
        assert_eq!(dna.node(text).xaml(), once);
        assert_eq!(once, "<Span FontWeight=\"Bold\">a&lt;b</Span>");
    }

    #[test]
    fn test_hidden_nodes_emit_nothing() {
        let state = tables();
        let mut dna = dna();
        for ty in [T::FieldBegin, T::FieldEnd, T::Shape] {
            let id = push(&mut dna, ty);
            assert_eq!(dna.xaml_prefix(id, &state), "");
            assert_eq!(dna.xaml_postfix(id, &state), "");
        }
    }

    #[test]
    fn test_list_text_flags_list_item() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::List);
        let item = push(&mut dna, T::ListItem);
        push(&mut dna, T::Paragraph);
        let label = push(&mut dna, T::ListText);
        dna.node_mut(label).append_xaml_encoded("1.");
        dna.close_at(0);

        dna.terminate(label, &state);
        assert_eq!(dna.node(label).xaml(), "");
        assert!(dna.node(item).has_marker_content());
    }

    #[test]
    fn test_list_and_list_item_prefix() {
        let state = tables();
        let mut dna = dna();
        let list = push_with(&mut dna, T::List, |fs| {
            fs.marker = MarkerStyle::UpperAlpha;
            fs.start_index = Some(3);
        });
        let item = push_with(&mut dna, T::ListItem, |fs| fs.li = 180);
        dna.close_at(0);

        assert_eq!(
            dna.xaml_prefix(list, &state),
            "<List Margin=\"0,0,0,0\" Padding=\"0,0,0,0\" MarkerStyle=\"UpperLatin\" StartIndex=\"3\">"
        );
        // Outermost items are indented at least 360 twips
        assert_eq!(dna.xaml_prefix(item, &state), "<ListItem Margin=\"24,0,0,0\">");

        dna.node_mut(list).format.marker = MarkerStyle::Hidden;
        assert_eq!(dna.xaml_prefix(item, &state), "<ListItem Margin=\"12,0,0,0\">");
    }

    #[test]
    fn test_cell_without_row_format_gets_default_border() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push(&mut dna, T::Row);
        let cell = push(&mut dna, T::Cell);
        dna.close_at(0);
        assert_eq!(
            dna.xaml_prefix(cell, &state),
            "<TableCell BorderThickness=\"1,1,1,1\" BorderBrush=\"#FF000000\">"
        );
        assert_eq!(dna.xaml_postfix(cell, &state), "</TableCell>\r\n");
    }

    #[test]
    fn test_cell_background_and_spans_from_row_format() {
        let state = tables();
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_with(&mut dna, T::Row, |fs| {
            let mut rf = RowFormat::with_boundaries(&[1440, 2880]);
            if let Some(cf) = rf.nth_cell_mut(1) {
                cf.cb = Some(1);
            }
            fs.row_format = Some(rf);
        });
        let first = push(&mut dna, T::Cell);
        dna.close_at(3);
        let second = push(&mut dna, T::Cell);
        dna.close_at(0);
        assert_eq!(dna.parent(second), dna.parent(first));
        dna.node_mut(second).set_col_span(2);
        dna.node_mut(second).set_row_span(3);

        assert_eq!(dna.xaml_prefix(first, &state), "<TableCell>");
        assert_eq!(
            dna.xaml_prefix(second, &state),
            "<TableCell Background=\"#FFFF0000\" ColumnSpan=\"2\" RowSpan=\"3\">"
        );
    }

    #[test]
    fn test_direction_inherits_when_unset() {
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_with(&mut dna, T::Row, |fs| {
            let mut rf = RowFormat::with_boundaries(&[1000]);
            rf.dir = DirState::Rtl;
            fs.row_format = Some(rf);
        });
        let cell = push(&mut dna, T::Cell);
        let para = push(&mut dna, T::Paragraph);
        let text = push_with(&mut dna, T::Text, |fs| fs.dir_char = DirState::Ltr);
        dna.close_at(0);

        assert_eq!(dna.xaml_dir(cell), DirState::Rtl);
        assert_eq!(dna.xaml_dir(para), DirState::Rtl);
        assert!(!dna.requires_xaml_dir(para));
        assert!(dna.requires_xaml_dir(text));
        assert!(dna.requires_xaml_dir(dna.entry_at(0).unwrap()));
    }
}
