//! Folding the flat tree into markup.
//!
//! Coalescing walks a subtree from its last slot back to its root. Leaves are
//! terminated in place; an inner node is reached only after all of its
//! descendants have been folded into single slots, so its output is its
//! prefix, its immediate children's output and its postfix. The folded
//! children are then excised.
//!
//! Before folding, a repair pass reshapes the subtree: runs of inline content
//! sharing a foreign direction are wrapped in one span, list indentation is
//! made relative, tables with irregular column grids are split and cell spans
//! are resolved from horizontal and vertical merges.

use super::array::DocumentNodeArray;
use super::column::{ColumnState, ColumnStateArray};
use super::converter::ConverterState;
use super::format::DirState;
use super::node::{DocumentNode, DocumentNodeType, NodeId};

const LOG_TARGET: &str = "rtfflow.coalesce";

impl DocumentNodeArray {
    /// Last slot of the subtree rooted at `start`.
    fn subtree_end(&self, start: usize) -> usize {
        let cc = self.node_at(start).map_or(0, DocumentNode::child_count);
        (start + cc).min(self.len().saturating_sub(1))
    }

    fn slots(&self, from: usize, to: usize) -> impl Iterator<Item = NodeId> + '_ {
        (from..=to).filter_map(move |i| self.entry_at(i))
    }

    /// Fold the subtree at `start` into a single terminated slot.
    pub fn coalesce_children(&mut self, state: &dyn ConverterState, start: usize) {
        if start >= self.len() {
            return;
        }
        self.pre_coalesce_children(start, false);
        let end = self.subtree_end(start);
        for index in (start..=end).rev() {
            self.fold_at(index, state);
        }
        self.assert_tree_invariants();
    }

    /// Fold the children of `start` and append their output to its content.
    ///
    /// The node at `start` is neither wrapped nor terminated.
    pub fn coalesce_only_children(&mut self, state: &dyn ConverterState, start: usize) {
        if start >= self.len() {
            return;
        }
        self.pre_coalesce_children(start, true);
        let end = self.subtree_end(start);
        for index in ((start + 1)..=end).rev() {
            self.fold_at(index, state);
        }

        let Some(top) = self.entry_at(start) else {
            return;
        };
        let count = self.node(top).child_count();
        if count > 0 {
            let content = self.take_child_xaml(start, count);
            self.node_mut(top).append_xaml(&content);
            self.excise_range(start + 1, count);
        }
        self.assert_tree_invariants();
    }

    /// Fold every top-level subtree.
    ///
    /// Nodes still pending are closed first; each subtree then shrinks to one
    /// slot, so the array ends up holding only the top-level nodes.
    pub fn coalesce_all(&mut self, state: &dyn ConverterState) {
        let first_pending =
            (0..self.len()).find(|&i| self.node_at(i).is_some_and(DocumentNode::is_pending));
        if let Some(first) = first_pending {
            log::debug!(target: LOG_TARGET, "closing unfinished nodes from slot {first}");
            self.close_at(first);
        }
        let mut index = 0;
        while index < self.len() {
            self.coalesce_children(state, index);
            index += 1;
        }
    }

    /// Move the output of the `count` folded slots after `index` into one
    /// string. The slots are about to be excised and keep no content.
    fn take_child_xaml(&mut self, index: usize, count: usize) -> String {
        let children: Vec<NodeId> = self.slots(index + 1, index + count).collect();
        let mut out = String::new();
        for child in children {
            out.push_str(&std::mem::take(&mut self.node_mut(child).xaml));
        }
        out
    }

    /// Fold the node at `index`, whose descendants are all single slots.
    fn fold_at(&mut self, index: usize, state: &dyn ConverterState) {
        let Some(id) = self.entry_at(index) else {
            return;
        };
        let child_count = self.node(id).child_count();
        if child_count == 0 {
            self.terminate(id, state);
            return;
        }

        let mut xaml = self.xaml_prefix(id, state);
        xaml.push_str(self.node(id).xaml());
        xaml.push_str(&self.take_child_xaml(index, child_count));
        xaml.push_str(&self.xaml_postfix(id, state));

        let n = self.node_mut(id);
        n.xaml = xaml;
        n.terminated = true;
        self.excise_range(index + 1, child_count);
        self.finish_terminated(id);
    }

    // ------------------------------------------------------------------
    // Repair pass
    // ------------------------------------------------------------------

    /// Reshape the subtree at `start` before folding.
    ///
    /// With `child_only` the node at `start` itself is left alone. Each node is
    /// reshaped at most once, so repeating the pass over a subtree changes
    /// nothing.
    pub fn pre_coalesce_children(&mut self, start: usize, child_only: bool) {
        if start >= self.len() {
            return;
        }
        let mut end = self.subtree_end(start);
        let mut tables = Vec::new();
        let mut vmerged = false;

        let mut index = if child_only { start + 1 } else { start };
        while index <= end {
            let Some(id) = self.entry_at(index) else {
                break;
            };
            if self.node(id).repaired {
                index += 1;
                continue;
            }
            self.node_mut(id).repaired = true;
            let n = self.node(id);
            match n.node_type() {
                _ if n.is_inline() && !n.is_hidden() => {
                    if self.wrap_direction_run(index) {
                        end += 1;
                    }
                },
                DocumentNodeType::ListItem => self.normalize_list_item_margins(id),
                DocumentNodeType::List => self.unify_list_direction(id),
                DocumentNodeType::Table => {
                    if self.prepare_table(id) {
                        end += 2;
                    }
                    tables.push(id);
                },
                DocumentNodeType::Row => vmerged |= self.resolve_horizontal_merges(id),
                _ => {},
            }
            index += 1;
        }

        if vmerged {
            for table in tables {
                self.process_table_row_span(table);
            }
        }
        self.report_semantic_invariants();
    }

    /// Wrap the run of inline siblings starting at `index` that share a
    /// direction differing from their context. Returns whether a wrapper was
    /// inserted.
    fn wrap_direction_run(&mut self, index: usize) -> bool {
        let Some(id) = self.entry_at(index) else {
            return false;
        };
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if !self.requires_xaml_dir(id) {
            return false;
        }
        let dir = self.node(id).format.dir_char;
        let Some(parent_end) = self.node(parent).last_child_index() else {
            return false;
        };

        let mut at = index;
        let mut siblings = 0;
        while at <= parent_end {
            let Some(s) = self.node_at(at) else {
                break;
            };
            if !s.is_inline()
                || s.node_type() == DocumentNodeType::Hyperlink
                || s.format.dir_char != dir
                || s.closed_parent() != Some(parent)
            {
                break;
            }
            siblings += 1;
            at += s.child_count() + 1;
        }
        if siblings < 2 {
            return false;
        }

        let mut wrapper =
            DocumentNode::with_format(DocumentNodeType::Inline, self.node(parent).format.clone());
        wrapper.format.dir_char = dir;
        wrapper.repaired = true;
        self.insert_child_at(Some(parent), wrapper, index, at - index);
        log::debug!(
            target: LOG_TARGET,
            "wrapped {siblings} {dir:?} runs at slot {index}"
        );
        true
    }

    /// Move the smallest paragraph indent of a list item onto the item and
    /// make its paragraphs' indents relative to it.
    fn normalize_list_item_margins(&mut self, item: NodeId) {
        let Some(index) = self.node(item).index() else {
            return;
        };
        let end = index + self.node(item).child_count();
        let paragraphs: Vec<NodeId> = self
            .slots(index + 1, end)
            .filter(|&p| {
                let n = self.node(p);
                n.node_type() == DocumentNodeType::Paragraph && n.is_non_empty()
            })
            .collect();
        let Some(min) = paragraphs.iter().map(|&p| self.near_margin(p)).min() else {
            return;
        };

        self.set_near_margin(item, min);
        for p in paragraphs {
            let margin = self.near_margin(p);
            self.set_near_margin(p, margin - min);
        }
    }

    /// Give a list, and its items, the direction all of its paragraphs agree
    /// on.
    fn unify_list_direction(&mut self, list: NodeId) {
        let Some(index) = self.node(list).index() else {
            return;
        };
        let end = index + self.node(list).child_count();

        let mut shared: Option<DirState> = None;
        for p in self.slots(index + 1, end) {
            let n = self.node(p);
            if n.node_type() != DocumentNodeType::Paragraph
                || !n.is_non_empty()
                || self.parent_of_type(p, DocumentNodeType::List) != Some(list)
            {
                continue;
            }
            let dir = n.format.dir_para;
            match shared {
                None => shared = Some(dir),
                Some(d) if d == dir => {},
                Some(_) => return,
            }
        }
        let Some(dir) = shared.filter(|&d| d != DirState::Default) else {
            return;
        };

        self.node_mut(list).format.dir_para = dir;
        for slot in self.child_slots(index) {
            if let Some(item) = self.entry_at(slot)
                && self.node(item).node_type() == DocumentNodeType::ListItem
            {
                self.node_mut(item).format.dir_para = dir;
            }
        }
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// Rows belonging to `table` itself, in order.
    fn table_rows(&self, table: NodeId) -> Vec<NodeId> {
        let Some(index) = self.node(table).index() else {
            return Vec::new();
        };
        let end = index + self.node(table).child_count();
        self.slots(index + 1, end)
            .filter(|&r| {
                self.node(r).node_type() == DocumentNodeType::Row
                    && self.parent_of_type(r, DocumentNodeType::Table) == Some(table)
            })
            .collect()
    }

    /// Cells of a row, in order.
    fn row_cells(&self, row: NodeId) -> Vec<NodeId> {
        let Some(index) = self.node(row).index() else {
            return Vec::new();
        };
        self.child_slots(index)
            .into_iter()
            .filter_map(|s| self.entry_at(s))
            .filter(|&c| self.node(c).node_type() == DocumentNodeType::Cell)
            .collect()
    }

    /// Merge the cell boundaries of every row of `table` into one grid.
    ///
    /// A column is filled when some row has a cell ending on it whose start
    /// also lies on the grid.
    pub fn compute_columns(&self, table: NodeId) -> ColumnStateArray {
        let mut columns = ColumnStateArray::new();
        for (ordinal, row) in self.table_rows(table).into_iter().enumerate() {
            let Some(rf) = self.node(row).format.row_format.as_ref() else {
                continue;
            };
            let mut prev_x = rf.left;
            for cell_x in rf.cells.iter().filter_map(|cf| cf.cell_x) {
                let pos = columns.iter().take_while(|cs| cs.cell_x < cell_x).count();
                let prev_column_x = match pos {
                    0 => rf.left,
                    _ => columns.entry_at(pos - 1).map_or(rf.left, |cs| cs.cell_x),
                };
                let aligned = prev_column_x == prev_x;

                match columns.entry_at_mut(pos) {
                    Some(cs) if cs.cell_x == cell_x => {
                        if aligned {
                            cs.is_filled = true;
                        }
                    },
                    _ => columns.insert(
                        pos,
                        ColumnState {
                            cell_x,
                            row: ordinal,
                            row_node: row,
                            is_filled: aligned,
                        },
                    ),
                }
                prev_x = cell_x;
            }
        }
        columns
    }

    /// Resolve the grid of `table`, splitting it when a later row does not
    /// fit. Returns whether a split happened.
    fn prepare_table(&mut self, table: NodeId) -> bool {
        // Rows are folded before their table, so keep the first row's
        // definition on the table itself
        if !self.node(table).format.has_row_format() {
            let rf = self.table_row_format(table).cloned();
            self.node_mut(table).format.row_format = rf;
        }

        let columns = self.compute_columns(table);
        let split_row = columns
            .min_unfilled_row_index()
            .and_then(|ordinal| self.table_rows(table).get(ordinal).copied());
        self.node_mut(table).columns = Some(columns);

        let Some(row) = split_row else {
            return false;
        };
        if !self.split_table(table, row) {
            return false;
        }
        let columns = self.compute_columns(table);
        self.node_mut(table).columns = Some(columns);
        true
    }

    /// Move `row` and everything after it in `table` into a new table
    /// inserted right after the shortened one.
    fn split_table(&mut self, table: NodeId, row: NodeId) -> bool {
        let Some(body) = self
            .parent(row)
            .filter(|&b| self.node(b).node_type() == DocumentNodeType::TableBody)
        else {
            return false;
        };
        let (Some(t), Some(b), Some(r)) = (
            self.node(table).index(),
            self.node(body).index(),
            self.node(row).index(),
        ) else {
            return false;
        };
        let body_tail = b + self.node(body).child_count() + 1 - r;
        let table_tail = t + self.node(table).child_count() + 1 - r;

        self.node_mut(table).child_count = r - t - 1;
        self.node_mut(body).child_count = r - b - 1;

        let mut table_format = self.node(table).format.clone();
        table_format.row_format = None;
        let new_table = self.alloc(DocumentNode::with_format(DocumentNodeType::Table, table_format));
        let body_format = self.node(body).format.clone();
        let new_body =
            self.alloc(DocumentNode::with_format(DocumentNodeType::TableBody, body_format));
        self.insert_id(r, new_table);
        self.insert_id(r + 1, new_body);

        self.close_at_helper(r + 1, body_tail);
        self.close_at_helper(r, table_tail + 1);
        let outer = self.node(table).closed_parent();
        self.node_mut(new_table).parent = outer;
        self.grow_ancestors(outer, 2);

        log::debug!(
            target: LOG_TARGET,
            "split table at slot {t}: rows from slot {r} moved to a new table"
        );
        true
    }

    /// Set column spans of a row's cells from the table grid, folding
    /// horizontally merged cells into their merge head. Returns whether the
    /// row takes part in a vertical merge.
    fn resolve_horizontal_merges(&mut self, row: NodeId) -> bool {
        let Some(rf) = self.node(row).format.row_format.clone() else {
            return false;
        };
        let columns = self
            .parent_of_type(row, DocumentNodeType::Table)
            .and_then(|t| self.node(t).column_state_array().cloned());
        let span = |left: i64, right: i64| columns.as_ref().map_or(1, |c| c.span_between(left, right));

        let mut head: Option<(NodeId, i64)> = None;
        for (n, cell) in self.row_cells(row).into_iter().enumerate() {
            let Some(cf) = rf.nth_cell(n) else {
                break;
            };
            let left = rf.cell_left(n);
            let right = cf.cell_x.unwrap_or(left);
            match head {
                Some((first, first_left)) if cf.is_hmerge() => {
                    self.node_mut(first).set_col_span(span(first_left, right));
                    self.node_mut(cell).set_col_span(0);
                },
                _ => {
                    self.node_mut(cell).set_col_span(span(left, right));
                    head = Some((cell, left));
                },
            }
        }
        rf.is_vmerge()
    }

    /// Resolve vertical merges of `table`: each continuation cell extends the
    /// open merge head of its column and is absorbed.
    pub fn process_table_row_span(&mut self, table: NodeId) {
        let Some(columns) = self.node(table).column_state_array().cloned() else {
            return;
        };
        let mut open: Vec<Option<NodeId>> = vec![None; columns.len()];

        for row in self.table_rows(table) {
            let Some(rf) = self.node(row).format.row_format.clone() else {
                continue;
            };
            for (n, cell) in self.row_cells(row).into_iter().enumerate() {
                let Some(cf) = rf.nth_cell(n) else {
                    break;
                };
                if self.node(cell).col_span() == 0 {
                    continue;
                }
                let column = columns.column_index_after(rf.cell_left(n));
                let Some(slot) = open.get_mut(column) else {
                    continue;
                };

                if cf.is_vmerge()
                    && let Some(first) = *slot
                {
                    let span = self.node(first).row_span() + 1;
                    self.node_mut(first).set_row_span(span);
                    self.node_mut(cell).set_col_span(0);
                    continue;
                }
                *slot = if cf.is_vmerge_first() {
                    self.node_mut(cell).set_row_span(1);
                    Some(cell)
                } else {
                    None
                };
            }
        }
        log::debug!(target: LOG_TARGET, "resolved row spans of table {table:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::converter::DocumentTables;
    use crate::rtf::format::{CellMerge, FormatState, HAlign, RowFormat};
    use crate::rtf::list::MarkerStyle;
    use crate::rtf::options::XamlOptions;
    use DocumentNodeType as T;

    fn dna() -> DocumentNodeArray {
        DocumentNodeArray::with_options(XamlOptions::new().with_invariant_checks(true))
    }

    fn push(dna: &mut DocumentNodeArray, ty: T) -> NodeId {
        dna.push(DocumentNode::new(ty))
    }

    fn push_with(dna: &mut DocumentNodeArray, ty: T, f: impl FnOnce(&mut FormatState)) -> NodeId {
        let mut node = DocumentNode::new(ty);
        f(&mut node.format);
        dna.push(node)
    }

    fn push_text(dna: &mut DocumentNodeArray, text: &str) -> NodeId {
        let id = push(dna, T::Text);
        dna.node_mut(id).append_xaml_encoded(text);
        let index = dna.node(id).index().unwrap();
        dna.close_at(index);
        id
    }

    fn close(dna: &mut DocumentNodeArray, id: NodeId) {
        let index = dna.node(id).index().unwrap();
        dna.close_at(index);
    }

    #[test]
    fn test_paragraph_end_to_end() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push_with(&mut dna, T::Paragraph, |fs| fs.h_align = HAlign::Right);
        push_text(&mut dna, "Hello");
        dna.close_at(0);

        dna.coalesce_children(&state, 0);
        assert_eq!(dna.len(), 1);
        let para = dna.node_at(0).unwrap();
        assert!(para.is_terminated());
        assert_eq!(
            para.xaml(),
            "<Paragraph Margin=\"0,0,0,0\" TextAlignment=\"Right\">Hello</Paragraph>\r\n"
        );
    }

    #[test]
    fn test_coalesce_all_keeps_top_level_nodes() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let p1 = push(&mut dna, T::Paragraph);
        push_text(&mut dna, "one");
        close(&mut dna, p1);
        push(&mut dna, T::Paragraph);
        push_text(&mut dna, "two & three");
        push(&mut dna, T::LineBreak);
        // Second paragraph left open

        dna.coalesce_all(&state);
        assert_eq!(dna.len(), 2);
        assert_eq!(
            dna.top_level_xaml(),
            "<Paragraph Margin=\"0,0,0,0\">one</Paragraph>\r\n\
             <Paragraph Margin=\"0,0,0,0\">two &amp; three<LineBreak /></Paragraph>\r\n"
        );
    }

    #[test]
    fn test_coalesce_only_children_keeps_parent_open() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let section = push(&mut dna, T::Section);
        let para = push(&mut dna, T::Paragraph);
        push_text(&mut dna, "x");
        close(&mut dna, para);
        close(&mut dna, section);

        dna.coalesce_only_children(&state, 0);
        assert_eq!(dna.len(), 1);
        let n = dna.node(section);
        assert!(!n.is_terminated());
        assert_eq!(n.child_count(), 0);
        assert_eq!(n.xaml(), "<Paragraph Margin=\"0,0,0,0\">x</Paragraph>\r\n");

        dna.coalesce_children(&state, 0);
        assert_eq!(
            dna.node(section).xaml(),
            "<Section><Paragraph Margin=\"0,0,0,0\">x</Paragraph>\r\n</Section>\r\n"
        );
    }

    fn push_row(dna: &mut DocumentNodeArray, boundaries: &[i64]) -> NodeId {
        let row = push_with(dna, T::Row, |fs| {
            fs.row_format = Some(RowFormat::with_boundaries(boundaries));
        });
        for _ in boundaries {
            let cell = push(dna, T::Cell);
            close(dna, cell);
        }
        close(dna, row);
        row
    }

    #[test]
    fn test_compute_columns() {
        let mut dna = dna();
        let table = push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[100, 150, 200, 300]);
        dna.close_at(0);

        let columns = dna.compute_columns(table);
        let xs: Vec<i64> = columns.iter().map(|c| c.cell_x).collect();
        assert_eq!(xs, vec![100, 150, 200, 300]);
        assert!(columns.iter().all(|c| c.is_filled));
        assert_eq!(columns.min_unfilled_row_index(), None);
    }

    #[test]
    fn test_irregular_table_is_split() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let table = push(&mut dna, T::Table);
        let body = push(&mut dna, T::TableBody);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[100, 200]);
        let third = push_row(&mut dna, &[50, 150]);
        dna.close_at(0);
        assert_eq!(dna.node(table).child_count(), 10);

        let columns = dna.compute_columns(table);
        assert_eq!(columns.min_unfilled_row_index(), Some(2));

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.len(), 13);
        assert_eq!(dna.node(table).child_count(), 7);
        assert_eq!(dna.node(body).child_count(), 6);
        let new_table = dna.entry_at(8).unwrap();
        assert_eq!(dna.node(new_table).node_type(), T::Table);
        assert_eq!(dna.node(new_table).child_count(), 4);
        assert_eq!(dna.parent_of_type(third, T::Table), Some(new_table));
        assert_eq!(dna.top_level().len(), 2);
        assert!(dna.check_tree_invariants().is_ok());

        let xs: Vec<i64> = dna
            .node(table)
            .column_state_array()
            .unwrap()
            .iter()
            .map(|c| c.cell_x)
            .collect();
        assert_eq!(xs, vec![100, 200]);

        dna.coalesce_all(&state);
        let xaml = dna.top_level_xaml();
        assert_eq!(xaml.matches("<Table ").count(), 2, "{xaml}");
        assert!(xaml.contains(
            "<Table.Columns><TableColumn Width=\"3.33\" /><TableColumn Width=\"6.67\" /></Table.Columns>"
        ));
    }

    fn push_merged_row(dna: &mut DocumentNodeArray, merges: &[(i64, CellMerge, CellMerge)], texts: &[&str]) {
        let row = push_with(dna, T::Row, |fs| {
            let mut rf = RowFormat::new();
            for &(x, h, v) in merges {
                let mut cf = crate::rtf::format::CellFormat::at(x);
                cf.h_merge = h;
                cf.v_merge = v;
                rf.cells.push(cf);
            }
            fs.row_format = Some(rf);
        });
        for text in texts {
            let cell = push(dna, T::Cell);
            let para = push(dna, T::Paragraph);
            push_text(dna, text);
            close(dna, para);
            close(dna, cell);
        }
        close(dna, row);
    }

    #[test]
    fn test_vertical_merge_row_span() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        let none = CellMerge::None;
        push_merged_row(&mut dna, &[(1000, none, CellMerge::First), (2000, none, none)], &["a", "x"]);
        push_merged_row(&mut dna, &[(1000, none, CellMerge::Continue), (2000, none, none)], &["b", "y"]);
        push_merged_row(&mut dna, &[(1000, none, CellMerge::Continue), (2000, none, none)], &["c", "z"]);
        dna.close_at(0);

        dna.pre_coalesce_children(0, false);
        let cells: Vec<NodeId> = dna
            .iter()
            .filter(|(_, n)| n.node_type() == T::Cell)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(dna.node(cells[0]).row_span(), 3);
        assert_eq!(dna.node(cells[2]).col_span(), 0);
        assert_eq!(dna.node(cells[4]).col_span(), 0);
        assert_eq!(dna.node(cells[1]).row_span(), 1);
        assert_eq!(dna.node(cells[3]).col_span(), 1);

        dna.coalesce_children(&state, 0);
        let xaml = dna.top_level_xaml();
        assert!(xaml.contains("<TableCell RowSpan=\"3\">"), "{xaml}");
        assert!(xaml.contains(">a<") && xaml.contains(">y<"));
        assert!(!xaml.contains(">b<") && !xaml.contains(">c<"));
        assert_eq!(xaml.matches("<TableCell").count(), 4);
        assert_eq!(dna.node(cells[2]).xaml(), "");
        assert_eq!(dna.node(cells[4]).xaml(), "");
    }

    #[test]
    fn test_horizontal_merge_column_span() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        let none = CellMerge::None;
        push_merged_row(
            &mut dna,
            &[(100, CellMerge::First, none), (200, CellMerge::Continue, none), (300, none, none)],
            &["a", "b", "c"],
        );
        push_merged_row(&mut dna, &[(100, none, none), (200, none, none), (300, none, none)], &["d", "e", "f"]);
        dna.close_at(0);

        dna.coalesce_children(&state, 0);
        let xaml = dna.top_level_xaml();
        assert_eq!(xaml.matches("ColumnSpan=\"2\"").count(), 1, "{xaml}");
        assert!(!xaml.contains(">b<"));
        assert_eq!(xaml.matches("<TableCell").count(), 5);
    }

    #[test]
    fn test_direction_run_is_wrapped_once() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        for (text, dir) in [("a", DirState::Rtl), ("b", DirState::Rtl), ("c", DirState::Ltr)] {
            let id = push_with(&mut dna, T::Text, |fs| fs.dir_char = dir);
            dna.node_mut(id).append_xaml_encoded(text);
            close(&mut dna, id);
        }
        dna.close_at(0);
        assert_eq!(dna.child_slots(0), vec![1, 2, 3]);

        dna.pre_coalesce_children(0, false);
        let wrapper = dna.entry_at(1).unwrap();
        assert_eq!(dna.node(wrapper).node_type(), T::Inline);
        assert_eq!(dna.node(wrapper).child_count(), 2);
        assert_eq!(dna.node_at(0).unwrap().child_count(), 4);

        dna.coalesce_children(&state, 0);
        assert_eq!(
            dna.node_at(0).unwrap().xaml(),
            "<Paragraph Margin=\"0,0,0,0\"><Span FlowDirection=\"RightToLeft\">ab</Span>c</Paragraph>\r\n"
        );
    }

    #[test]
    fn test_single_foreign_run_is_not_wrapped() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push(&mut dna, T::Paragraph);
        let id = push_with(&mut dna, T::Text, |fs| fs.dir_char = DirState::Rtl);
        dna.node_mut(id).append_xaml_encoded("a");
        dna.close_at(0);

        dna.coalesce_children(&state, 0);
        assert_eq!(
            dna.node_at(0).unwrap().xaml(),
            "<Paragraph Margin=\"0,0,0,0\"><Span FlowDirection=\"RightToLeft\">a</Span></Paragraph>\r\n"
        );
    }

    #[test]
    fn test_list_item_margins_become_relative() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push_with(&mut dna, T::List, |fs| fs.marker = MarkerStyle::Arabic);
        let item = push(&mut dna, T::ListItem);
        let p1 = push_with(&mut dna, T::Paragraph, |fs| fs.li = 720);
        push_text(&mut dna, "one");
        close(&mut dna, p1);
        let p2 = push_with(&mut dna, T::Paragraph, |fs| fs.li = 1080);
        push_text(&mut dna, "two");
        close(&mut dna, p2);
        // Empty paragraphs do not take part
        let p3 = push(&mut dna, T::Paragraph);
        close(&mut dna, p3);
        dna.close_at(0);

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(item).format.li, 720);
        assert_eq!(dna.node(p1).format.li, 0);
        assert_eq!(dna.node(p2).format.li, 360);
        assert_eq!(dna.node(p3).format.li, 0);

        // Repeating the pass leaves the indents alone
        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(item).format.li, 720);
        assert_eq!(dna.node(p2).format.li, 360);

        dna.coalesce_children(&state, 0);
        let xaml = dna.top_level_xaml();
        assert!(xaml.starts_with(
            "<List Margin=\"0,0,0,0\" Padding=\"0,0,0,0\" MarkerStyle=\"Decimal\">\
             <ListItem Margin=\"48,0,0,0\"><Paragraph Margin=\"0,0,0,0\">one</Paragraph>\r\n\
             <Paragraph Margin=\"24,0,0,0\">two</Paragraph>\r\n"
        ), "{xaml}");
        assert!(xaml.ends_with("</ListItem>\r\n</List>\r\n"));
    }

    #[test]
    fn test_list_direction_unification() {
        let mut dna = dna();
        let list = push(&mut dna, T::List);
        let mut items = Vec::new();
        for text in ["a", "b"] {
            items.push(push(&mut dna, T::ListItem));
            push_with(&mut dna, T::Paragraph, |fs| fs.dir_para = DirState::Rtl);
            push_text(&mut dna, text);
            close(&mut dna, *items.last().unwrap());
        }
        dna.close_at(0);

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(list).format.dir_para, DirState::Rtl);
        for item in items {
            assert_eq!(dna.node(item).format.dir_para, DirState::Rtl);
        }
        assert!(dna.requires_xaml_dir(list));
    }

    #[test]
    fn test_mixed_list_direction_is_kept() {
        let mut dna = dna();
        let list = push(&mut dna, T::List);
        for dir in [DirState::Rtl, DirState::Ltr] {
            let item = push(&mut dna, T::ListItem);
            push_with(&mut dna, T::Paragraph, |fs| fs.dir_para = dir);
            push_text(&mut dna, "x");
            close(&mut dna, item);
        }
        dna.close_at(0);

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(list).format.dir_para, DirState::Default);
    }

    #[test]
    fn test_list_text_is_dropped() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push_with(&mut dna, T::List, |fs| fs.marker = MarkerStyle::Bullet);
        let item = push(&mut dna, T::ListItem);
        push(&mut dna, T::Paragraph);
        let label = push(&mut dna, T::ListText);
        push_text(&mut dna, "\u{2022}");
        close(&mut dna, label);
        push_text(&mut dna, "entry");
        dna.close_at(0);

        dna.coalesce_all(&state);
        let xaml = dna.top_level_xaml();
        assert!(dna.node(item).has_marker_content());
        assert!(!xaml.contains('\u{2022}'));
        assert!(xaml.contains("MarkerStyle=\"Disc\""));
        assert!(xaml.contains(">entry</Paragraph>"));
    }

    #[test]
    fn test_nested_table_in_list_cell() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_with(&mut dna, T::Row, |fs| {
            fs.row_format = Some(RowFormat::with_boundaries(&[2880]));
        });
        push(&mut dna, T::Cell);
        push(&mut dna, T::List);
        push(&mut dna, T::ListItem);
        push(&mut dna, T::List);
        let item = push(&mut dna, T::ListItem);
        push(&mut dna, T::Paragraph);
        push_text(&mut dna, "deep");
        assert_eq!(dna.list_depth(item), 2);
        dna.close_at(0);

        dna.coalesce_all(&state);
        let xaml = dna.top_level_xaml();
        assert_eq!(xaml.matches("<List ").count(), 2);
        assert!(xaml.contains("<TableColumn Width=\"192\" />"));
        assert!(xaml.contains(">deep</Paragraph>"));
    }
    #[test]
    fn test_list_item_takes_zero_indent_of_its_paragraph() {
        let state = DocumentTables::default();
        let mut dna = dna();
        push_with(&mut dna, T::List, |fs| fs.marker = MarkerStyle::Arabic);
        let item = push_with(&mut dna, T::ListItem, |fs| fs.li = 1440);
        let para = push(&mut dna, T::Paragraph);
        push_text(&mut dna, "flush");
        close(&mut dna, para);
        dna.close_at(0);

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(item).format.li, 0);
        assert_eq!(dna.node(para).format.li, 0);

        dna.coalesce_children(&state, 0);
        let xaml = dna.top_level_xaml();
        assert!(xaml.contains("<ListItem Margin=\"24,0,0,0\">"), "{xaml}");
    }

    #[test]
    fn test_indented_row_spans_one_column() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let table = push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_row(&mut dna, &[500, 1000]);
        let row = push_with(&mut dna, T::Row, |fs| {
            let mut rf = RowFormat::with_boundaries(&[1000]);
            rf.left = 500;
            fs.row_format = Some(rf);
        });
        let cell = push(&mut dna, T::Cell);
        close(&mut dna, cell);
        close(&mut dna, row);
        dna.close_at(0);

        let columns = dna.compute_columns(table);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.min_unfilled_row_index(), None);

        dna.pre_coalesce_children(0, false);
        assert_eq!(dna.node(cell).col_span(), 1);

        dna.coalesce_children(&state, 0);
        assert!(!dna.top_level_xaml().contains("ColumnSpan"));
    }

    #[test]
    fn test_folded_children_release_their_output() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let mut sections = Vec::new();
        for _ in 0..5 {
            sections.push(push(&mut dna, T::Section));
        }
        let para = push(&mut dna, T::Paragraph);
        let text = push_text(&mut dna, "payload");
        dna.close_at(0);

        dna.coalesce_children(&state, 0);
        assert_eq!(dna.len(), 1);
        assert!(dna.top_level_xaml().contains(">payload</Paragraph>"));
        for id in sections[1..].iter().copied().chain([para, text]) {
            assert_eq!(dna.node(id).index(), None);
            assert!(dna.node(id).xaml().is_empty());
        }
    }

    #[test]
    fn test_split_table_inside_section() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let section = push(&mut dna, T::Section);
        let table = push(&mut dna, T::Table);
        let body = push(&mut dna, T::TableBody);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[100, 200]);
        let third = push_row(&mut dna, &[50, 150]);
        dna.close_at(0);
        assert_eq!(dna.node(section).child_count(), 11);

        dna.pre_coalesce_children(0, false);
        assert!(dna.check_tree_invariants().is_ok());
        assert_eq!(dna.len(), 14);
        assert_eq!(dna.node(section).child_count(), 13);
        assert_eq!(dna.node(table).child_count(), 7);
        assert_eq!(dna.node(body).child_count(), 6);
        assert_eq!(dna.child_slots(0), vec![1, 9]);

        let new_table = dna.entry_at(9).unwrap();
        assert_eq!(dna.node(new_table).node_type(), T::Table);
        assert_eq!(dna.node(new_table).child_count(), 4);
        assert_eq!(dna.parent(new_table), Some(section));
        assert_eq!(dna.parent_of_type(third, T::Table), Some(new_table));

        dna.coalesce_children(&state, 0);
        let xaml = dna.top_level_xaml();
        assert!(xaml.starts_with("<Section>"));
        assert_eq!(xaml.matches("<Table ").count(), 2, "{xaml}");
    }

    #[test]
    fn test_split_table_inside_cell() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let outer = push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        let outer_row = push_with(&mut dna, T::Row, |fs| {
            fs.row_format = Some(RowFormat::with_boundaries(&[5000]));
        });
        let cell = push(&mut dna, T::Cell);
        let inner = push(&mut dna, T::Table);
        push(&mut dna, T::TableBody);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[50, 150]);
        dna.close_at(0);
        assert_eq!(dna.node(cell).child_count(), 11);

        dna.pre_coalesce_children(0, false);
        assert!(dna.check_tree_invariants().is_ok());
        assert_eq!(dna.len(), 17);
        assert_eq!(dna.node(outer).child_count(), 16);
        assert_eq!(dna.node(outer_row).child_count(), 14);
        assert_eq!(dna.node(cell).child_count(), 13);
        assert_eq!(dna.node(inner).child_count(), 7);
        assert_eq!(dna.child_slots(3), vec![4, 12]);

        let new_table = dna.entry_at(12).unwrap();
        assert_eq!(dna.node(new_table).node_type(), T::Table);
        assert_eq!(dna.parent(new_table), Some(cell));
        assert_eq!(dna.table_depth(new_table), 2);

        dna.coalesce_children(&state, 0);
        assert_eq!(dna.len(), 1);
        assert_eq!(dna.top_level_xaml().matches("<Table ").count(), 3);
    }

    #[test]
    fn test_split_table_moves_later_bodies() {
        let state = DocumentTables::default();
        let mut dna = dna();
        let table = push(&mut dna, T::Table);
        let first_body = push(&mut dna, T::TableBody);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[100, 200]);
        push_row(&mut dna, &[50, 150]);
        close(&mut dna, first_body);
        let second_body = push(&mut dna, T::TableBody);
        let last = push_row(&mut dna, &[50, 150]);
        dna.close_at(0);
        assert_eq!(dna.node(table).child_count(), 14);

        dna.pre_coalesce_children(0, false);
        assert!(dna.check_tree_invariants().is_ok());
        assert_eq!(dna.len(), 17);
        assert_eq!(dna.top_level().len(), 2);
        assert_eq!(dna.node(table).child_count(), 7);
        assert_eq!(dna.node(first_body).child_count(), 6);

        let new_table = dna.entry_at(8).unwrap();
        assert_eq!(dna.node(new_table).child_count(), 8);
        assert_eq!(dna.child_slots(8), vec![9, 13]);
        assert_eq!(dna.parent(second_body), Some(new_table));
        assert_eq!(dna.parent_of_type(last, T::Table), Some(new_table));

        dna.coalesce_all(&state);
        let xaml = dna.top_level_xaml();
        assert_eq!(xaml.matches("<Table ").count(), 2, "{xaml}");
        assert_eq!(xaml.matches("<TableRowGroup").count(), 3);
    }
}
