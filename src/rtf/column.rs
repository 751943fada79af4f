//! Resolved column grid of a table.
//!
//! Rows in RTF carry their own cell boundaries; the grid is the union of all
//! boundaries seen across a table's rows, each column remembering the row that
//! introduced it and whether that row supplied a cell ending exactly there.

use super::node::NodeId;
use smallvec::SmallVec;

/// One column of a table grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnState {
    /// Right boundary of the column (twips)
    pub cell_x: i64,
    /// Ordinal of the row that introduced the column within its table
    pub row: usize,
    /// Row node that introduced the column
    pub row_node: NodeId,
    /// Whether a row supplied a cell ending exactly at this boundary with its
    /// preceding boundary also on the grid
    pub is_filled: bool,
}

/// Table column grid ordered by `cell_x`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnStateArray {
    columns: SmallVec<[ColumnState; 8]>,
}

impl ColumnStateArray {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn entry_at(&self, index: usize) -> Option<&ColumnState> {
        self.columns.get(index)
    }

    #[inline]
    pub(crate) fn entry_at_mut(&mut self, index: usize) -> Option<&mut ColumnState> {
        self.columns.get_mut(index)
    }

    #[inline]
    pub fn push(&mut self, column: ColumnState) {
        self.columns.push(column);
    }

    #[inline]
    pub fn insert(&mut self, index: usize, column: ColumnState) {
        self.columns.insert(index, column);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnState> {
        self.columns.iter()
    }

    /// Smallest ordinal of a row owning an unfilled column.
    ///
    /// Ordinal 0 is never reported: the first row defines the grid.
    pub fn min_unfilled_row_index(&self) -> Option<usize> {
        self.columns
            .iter()
            .filter(|cs| !cs.is_filled)
            .map(|cs| cs.row)
            .min()
            .filter(|&row| row > 0)
    }

    /// Index of the first column whose right boundary lies beyond `left`.
    pub fn column_index_after(&self, left: i64) -> usize {
        self.columns.iter().take_while(|cs| cs.cell_x <= left).count()
    }

    /// Number of grid columns a cell spanning `left..right` covers, at least 1.
    pub fn span_between(&self, left: i64, right: i64) -> u32 {
        let n = self
            .columns
            .iter()
            .filter(|cs| cs.cell_x > left && cs.cell_x <= right)
            .count();
        (n as u32).max(1)
    }

    /// Column widths in twips, each the delta from the preceding boundary.
    ///
    /// Non-positive widths are clamped to 1.
    pub fn widths(&self, origin: i64) -> SmallVec<[i64; 8]> {
        let mut prev = origin;
        self.columns
            .iter()
            .map(|cs| {
                let width = cs.cell_x - prev;
                prev = cs.cell_x;
                if width <= 0 { 1 } else { width }
            })
            .collect()
    }
}
