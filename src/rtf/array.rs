//! Flattened document tree and parse-time open-node tracking.
//!
//! [`DocumentNodeArray`] stores every node it has ever received in an arena
//! and keeps the live ones in document (pre-)order. The descendants of the
//! node at slot `i` occupy slots `i + 1 ..= i + child_count`; structural edits
//! renumber the slots that follow and adjust the `child_count` of every
//! closed ancestor, so each edit costs O(n).
//!
//! While a document is being parsed, nodes whose extent is not yet known are
//! *pending*. A secondary list of node ids, the open set, holds every node that
//! may still be pending (or an unmatched field start) in ascending slot order.
//! It is pruned lazily by re-evaluating
//! [`DocumentNode::is_tracked_as_open`] rather than by bookkeeping on every
//! edit.
//!
//! The array is single-writer: it is not meant to be shared across threads
//! while being mutated.

use super::error::{FlowError, FlowResult};
use super::format::DirState;
use super::list::{MarkerList, MarkerListEntry};
use super::node::{DocumentNode, DocumentNodeType, NodeId};
use super::options::XamlOptions;

const LOG_TARGET: &str = "rtfflow.array";

/// Flat, index-addressed document tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentNodeArray {
    /// Every node ever added, addressed by `NodeId`
    arena: Vec<DocumentNode>,
    /// Live nodes in document order
    order: Vec<NodeId>,
    /// Nodes that may still be open, ascending by slot
    open: Vec<NodeId>,
    options: XamlOptions,
}

impl DocumentNodeArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: XamlOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    #[inline]
    pub fn options(&self) -> &XamlOptions {
        &self.options
    }

    /// Number of live slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Node id at slot `index`.
    #[inline]
    pub fn entry_at(&self, index: usize) -> Option<NodeId> {
        self.order.get(index).copied()
    }

    /// Node at slot `index`.
    #[inline]
    pub fn node_at(&self, index: usize) -> Option<&DocumentNode> {
        self.entry_at(index).map(|id| self.node(id))
    }

    /// Node by id. Excised nodes stay addressable.
    #[inline]
    pub fn node(&self, id: NodeId) -> &DocumentNode {
        &self.arena[id.raw()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut DocumentNode {
        &mut self.arena[id.raw()]
    }

    /// Live nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DocumentNode)> + '_ {
        self.order.iter().map(move |&id| (id, self.node(id)))
    }

    // ------------------------------------------------------------------
    // Stack-like operations
    // ------------------------------------------------------------------

    /// Last slot.
    #[inline]
    pub fn top(&self) -> Option<NodeId> {
        self.order.last().copied()
    }

    /// Whether the last slot holds a node of type `ty`.
    #[inline]
    pub fn test_top(&self, ty: DocumentNodeType) -> bool {
        self.top().is_some_and(|id| self.node(id).node_type() == ty)
    }

    /// Last pending node.
    pub fn top_pending(&self) -> Option<NodeId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.node(id).is_pending())
    }

    /// Append `node` at the end of the array.
    pub fn push(&mut self, node: DocumentNode) -> NodeId {
        let at = self.len();
        self.insert_node(at, node)
    }

    /// Remove the last slot and return its (now detached) node.
    pub fn pop(&mut self) -> Option<NodeId> {
        let top = self.top()?;
        self.excise(self.len() - 1, 1);
        Some(top)
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Insert `node` at slot `index`, renumbering the slots that follow.
    ///
    /// Ancestor child counts are not touched; see [`Self::insert_child_at`].
    pub fn insert_node(&mut self, index: usize, node: DocumentNode) -> NodeId {
        let id = self.alloc(node);
        self.insert_id(index, id);
        self.assert_tree_invariants();
        id
    }

    pub(crate) fn alloc(&mut self, mut node: DocumentNode) -> NodeId {
        node.index = None;
        let id = NodeId::new(self.arena.len());
        self.arena.push(node);
        id
    }

    pub(crate) fn insert_id(&mut self, index: usize, id: NodeId) {
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        self.renumber_from(index);
        log::trace!(
            target: LOG_TARGET,
            "insert {} at {}",
            self.node(id).node_type().name(),
            index
        );
        if self.node(id).is_tracked_as_open() {
            self.insert_open_node(id);
        }
    }

    fn renumber_from(&mut self, from: usize) {
        for (i, &id) in self.order.iter().enumerate().skip(from) {
            self.arena[id.raw()].index = Some(i);
        }
    }

    /// Insert `node` at `insert_at` as a child of `parent`, closing it over the
    /// `child_count` slots that follow.
    ///
    /// Every closed ancestor grows by one slot.
    pub fn insert_child_at(
        &mut self,
        parent: Option<NodeId>,
        mut node: DocumentNode,
        insert_at: usize,
        child_count: usize,
    ) -> NodeId {
        node.pending = true;
        let id = self.alloc(node);
        self.insert_id(insert_at, id);
        self.close_at_helper(insert_at, child_count);
        self.node_mut(id).parent = parent;
        self.grow_ancestors(parent, 1);
        self.assert_tree_invariants();
        id
    }

    pub(crate) fn grow_ancestors(&mut self, from: Option<NodeId>, count: usize) {
        let mut pa = from;
        while let Some(p) = pa {
            let n = self.node_mut(p);
            n.child_count += count;
            pa = n.parent;
        }
    }

    /// Close every pending node after `index`, then the node at `index` itself
    /// over all remaining slots.
    pub fn close_at(&mut self, index: usize) {
        let Some(id) = self.entry_at(index) else {
            return;
        };
        if !self.node(id).is_pending() {
            return;
        }
        let mut i = self.len() - 1;
        while i > index {
            if self.node_at(i).is_some_and(DocumentNode::is_pending) {
                self.close_at(i);
            }
            i -= 1;
        }
        self.close_at_helper(index, self.len() - index - 1);
        self.assert_tree_invariants();
    }

    /// Fix the extent of the pending node at `index` and wire its immediate
    /// children to it.
    pub(crate) fn close_at_helper(&mut self, index: usize, child_count: usize) {
        let Some(id) = self.entry_at(index) else {
            return;
        };
        if !self.node(id).is_pending() {
            return;
        }
        {
            let n = self.node_mut(id);
            n.pending = false;
            n.child_count = child_count;
        }
        log::trace!(
            target: LOG_TARGET,
            "close {} at {} over {} slots",
            self.node(id).node_type().name(),
            index,
            child_count
        );

        let end = (index + child_count).min(self.len().saturating_sub(1));
        let mut at = index + 1;
        while at <= end {
            let child = self.order[at];
            let c = self.node_mut(child);
            c.parent = Some(id);
            at += c.child_count + 1;
        }
    }

    /// Remove `count` slots starting at `index`.
    ///
    /// Removed nodes become detached. Every closed ancestor of the first
    /// removed node shrinks by `count`; pending ancestors are skipped because
    /// their extent is not fixed yet.
    pub fn excise(&mut self, index: usize, count: usize) {
        self.excise_range(index, count);
        self.assert_tree_invariants();
    }

    pub(crate) fn excise_range(&mut self, index: usize, count: usize) {
        if count == 0 || index >= self.len() {
            return;
        }
        let count = count.min(self.len() - index);
        let first = self.order[index];
        for &id in &self.order[index..index + count] {
            self.arena[id.raw()].index = None;
        }
        self.order.drain(index..index + count);
        log::trace!(target: LOG_TARGET, "excise {count} slots at {index}");

        let mut pa = self.node(first).parent;
        while let Some(p) = pa {
            let n = self.node_mut(p);
            if n.is_pending() {
                // Extent not fixed yet
            } else {
                n.child_count = n.child_count.saturating_sub(count);
            }
            pa = n.parent;
        }
        self.renumber_from(index);
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Parent wired by closing.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Parent, falling back to the nearest open ancestor while the node has
    /// not been wired by a close yet.
    pub fn parent_during_parse(&self, id: NodeId) -> Option<NodeId> {
        let n = self.node(id);
        match n.parent {
            Some(p) => Some(p),
            None if n.is_live() => self.open_parent_while_parsing(id),
            None => None,
        }
    }

    /// Nearest pending node before `id` in the open set.
    pub fn open_parent_while_parsing(&self, id: NodeId) -> Option<NodeId> {
        let index = self.node(id).index?;
        self.open.iter().rev().copied().find(|&o| {
            let n = self.node(o);
            n.is_pending() && n.index.is_some_and(|i| i < index)
        })
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent_during_parse(id), move |&p| {
            self.parent_during_parse(p)
        })
    }

    /// Nearest ancestor of type `ty`.
    pub fn parent_of_type(&self, id: NodeId, ty: DocumentNodeType) -> Option<NodeId> {
        self.ancestors(id).find(|&p| self.node(p).node_type() == ty)
    }

    #[inline]
    pub fn has_parent(&self, id: NodeId, ty: DocumentNodeType) -> bool {
        self.parent_of_type(id, ty).is_some()
    }

    /// Whether `ancestor` contains `id`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|p| p == ancestor)
    }

    /// Number of tables enclosing the node, counting itself.
    pub fn table_depth(&self, id: NodeId) -> usize {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|&n| self.node(n).node_type() == DocumentNodeType::Table)
            .count()
    }

    /// Number of lists enclosing the node, counting itself.
    ///
    /// Counting stops at the nearest cell: list nesting restarts inside a table
    /// cell.
    pub fn list_depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        for n in std::iter::once(id).chain(self.ancestors(id)) {
            match self.node(n).node_type() {
                DocumentNodeType::List => depth += 1,
                DocumentNodeType::Cell => break,
                _ => {},
            }
        }
        depth
    }

    /// Ids of the immediate children of the node at `index`.
    pub(crate) fn child_slots(&self, index: usize) -> Vec<usize> {
        let Some(n) = self.node_at(index) else {
            return Vec::new();
        };
        let end = index + n.child_count;
        let mut out = Vec::new();
        let mut at = index + 1;
        while at <= end && at < self.len() {
            out.push(at);
            at += self.node(self.order[at]).child_count + 1;
        }
        out
    }

    /// Position of `id` among its parent's immediate children.
    pub fn child_ordinal(&self, id: NodeId) -> Option<usize> {
        let parent = self.node(id).parent?;
        let parent_index = self.node(parent).index?;
        let index = self.node(id).index?;
        self.child_slots(parent_index).iter().position(|&s| s == index)
    }

    // ------------------------------------------------------------------
    // Open-node set
    // ------------------------------------------------------------------

    /// Drop the trailing run of open-set entries that are no longer open.
    pub fn cull_open(&mut self) {
        let keep = self
            .open
            .iter()
            .rposition(|&o| self.node(o).is_tracked_as_open())
            .map_or(0, |p| p + 1);
        self.open.truncate(keep);
    }

    /// Add `id` to the open set, keeping it ordered by slot.
    pub(crate) fn insert_open_node(&mut self, id: NodeId) {
        self.cull_open();
        let index = self.node(id).index;
        let pos = self
            .open
            .iter()
            .rposition(|&o| self.node(o).index < index)
            .map_or(0, |p| p + 1);
        self.open.insert(pos, id);
    }

    /// Pending entries of the open set, innermost first.
    fn pending_open(&self) -> impl Iterator<Item = (NodeId, &DocumentNode)> + '_ {
        self.open
            .iter()
            .rev()
            .map(move |&o| (o, self.node(o)))
            .filter(|(_, n)| n.is_pending())
    }

    /// Count pending nodes of type `ty`, not looking past an open shape.
    pub fn count_open_nodes(&self, ty: DocumentNodeType) -> usize {
        let mut count = 0;
        for (_, n) in self.pending_open() {
            if n.node_type() == ty {
                count += 1;
            } else if n.node_type() == DocumentNodeType::Shape {
                break;
            }
        }
        count
    }

    #[inline]
    pub fn count_open_cells(&self) -> usize {
        self.count_open_nodes(DocumentNodeType::Cell)
    }

    /// Innermost open table structure.
    ///
    /// Returns `Paragraph` when no table structure is open, or when an open
    /// shape is reached first.
    pub fn table_scope(&self) -> DocumentNodeType {
        for (_, n) in self.pending_open() {
            match n.node_type() {
                ty @ (DocumentNodeType::Table
                | DocumentNodeType::TableBody
                | DocumentNodeType::Row
                | DocumentNodeType::Cell) => return ty,
                DocumentNodeType::Shape => return DocumentNodeType::Paragraph,
                _ => {},
            }
        }
        DocumentNodeType::Paragraph
    }

    /// Slot of the innermost pending node of type `ty` above `low`.
    pub fn find_pending(&self, ty: DocumentNodeType, low: Option<usize>) -> Option<usize> {
        let start = self.len().checked_sub(1)?;
        self.find_pending_from(ty, start, low)
    }

    /// Slot of the innermost pending node of type `ty` within `(low, start]`.
    ///
    /// The search does not cross an open shape.
    pub fn find_pending_from(
        &self,
        ty: DocumentNodeType,
        start: usize,
        low: Option<usize>,
    ) -> Option<usize> {
        for (_, n) in self.pending_open() {
            let Some(index) = n.index else {
                continue;
            };
            if index > start {
                continue;
            }
            if low.is_some_and(|low| index <= low) {
                break;
            }
            if n.node_type() == ty {
                return Some(index);
            }
            if n.node_type() == DocumentNodeType::Shape {
                break;
            }
        }
        None
    }

    /// Slot of the innermost unmatched node of type `ty`.
    pub fn find_unmatched(&self, ty: DocumentNodeType) -> Option<usize> {
        self.open.iter().rev().find_map(|&o| {
            let n = self.node(o);
            (n.node_type() == ty && !n.is_matched()).then_some(n.index).flatten()
        })
    }

    // ------------------------------------------------------------------
    // List markers
    // ------------------------------------------------------------------

    fn marker_entry(&self, list: NodeId) -> MarkerListEntry {
        let n = self.node(list);
        MarkerListEntry {
            marker: n.format.marker,
            ils: n.format.ils,
            start_index_override: n.format.start_index,
            start_index_default: n.format.start_index_default,
            virtual_list_level: n.virtual_list_level(),
        }
    }

    /// Markers of the currently open lists, outermost first, not looking
    /// outside the innermost open shape.
    pub fn open_marker_styles(&self) -> MarkerList {
        let from = self
            .open
            .iter()
            .rposition(|&o| {
                let n = self.node(o);
                n.is_pending() && n.node_type() == DocumentNodeType::Shape
            })
            .map_or(0, |p| p + 1);

        let mut markers = MarkerList::new();
        for &o in &self.open[from..] {
            let n = self.node(o);
            if n.is_pending() && n.node_type() == DocumentNodeType::List {
                markers.push(self.marker_entry(o));
            }
        }
        markers
    }

    /// Marker chain of the most recent closed list item, for reopening.
    ///
    /// Returns nothing when lists are already open (`have`), none are wanted,
    /// or a table lies between the end of the document and that item. A chain
    /// made of a single bullet list is reported as empty.
    pub fn last_marker_styles(&self, have: &MarkerList, want: &MarkerList) -> MarkerList {
        let mut markers = MarkerList::new();
        if !have.is_empty() || want.is_empty() {
            return markers;
        }

        let mut all_bullet = true;
        for &id in self.order.iter().rev() {
            match self.node(id).node_type() {
                DocumentNodeType::Cell | DocumentNodeType::Table => break,
                DocumentNodeType::ListItem => {
                    let closed_scope = |ty| {
                        self.parent_of_type(id, ty)
                            .is_some_and(|p| !self.node(p).is_pending())
                    };
                    if closed_scope(DocumentNodeType::Cell) || closed_scope(DocumentNodeType::Shape)
                    {
                        break;
                    }
                    for p in self.ancestors(id) {
                        let n = self.node(p);
                        if n.is_pending() {
                            break;
                        }
                        if n.node_type() == DocumentNodeType::List {
                            let entry = self.marker_entry(p);
                            if !entry.marker.is_bullet() {
                                all_bullet = false;
                            }
                            markers.insert(0, entry);
                        }
                    }
                    break;
                },
                _ => {},
            }
        }

        if markers.len() == 1 && all_bullet {
            markers.clear();
        }
        markers
    }

    fn reopen(&mut self, id: NodeId) {
        // Drop stale entries while the node still reads as closed
        self.cull_open();
        self.node_mut(id).pending = true;
        if !self.open.contains(&id) {
            self.insert_open_node(id);
        }
        log::trace!(
            target: LOG_TARGET,
            "reopen {} at {:?}",
            self.node(id).node_type().name(),
            self.node(id).index
        );
    }

    /// Reopen the last list item together with every list and list item on its
    /// closed parent chain.
    pub fn open_last_list(&mut self) {
        let Some(item) = self
            .order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.node(id).node_type() == DocumentNodeType::ListItem)
        else {
            return;
        };

        let mut pa = Some(item);
        while let Some(p) = pa {
            let n = self.node(p);
            let next = n.parent;
            if matches!(n.node_type(), DocumentNodeType::List | DocumentNodeType::ListItem)
                && !n.is_pending()
            {
                self.reopen(p);
            }
            pa = next;
        }
    }

    /// Reopen the last cell of the innermost open table structure.
    ///
    /// Does nothing when a cell is already open.
    pub fn open_last_cell(&mut self) {
        let scope = self.pending_open().find_map(|(id, n)| match n.node_type() {
            DocumentNodeType::Cell => Some(None),
            DocumentNodeType::Table | DocumentNodeType::TableBody | DocumentNodeType::Row => {
                Some(Some(id))
            },
            _ => None,
        });
        let Some(Some(scope)) = scope else {
            return;
        };
        let Some(scope_index) = self.node(scope).index else {
            return;
        };

        let scope_type = self.node(scope).node_type();
        // A cell of a nested table belongs to that table's own structure
        let cell = self.order[scope_index + 1..]
            .iter()
            .rev()
            .copied()
            .find(|&id| {
                self.node(id).node_type() == DocumentNodeType::Cell
                    && self.parent_of_type(id, scope_type) == Some(scope)
            });
        let Some(cell) = cell else {
            return;
        };

        // The cell and any closed structure between it and the scope
        let mut pa = Some(cell);
        while let Some(p) = pa {
            if p == scope {
                break;
            }
            let next = self.node(p).parent;
            if !self.node(p).is_pending() {
                self.reopen(p);
            }
            pa = next;
        }
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Ids of the top-level nodes.
    pub fn top_level(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut at = 0;
        while at < self.len() {
            let id = self.order[at];
            out.push(id);
            at += self.node(id).child_count + 1;
        }
        out
    }

    /// Concatenated output of the top-level nodes.
    pub fn top_level_xaml(&self) -> String {
        self.top_level()
            .into_iter()
            .map(|id| self.node(id).xaml())
            .collect()
    }

    /// Direction recorded for a list or paragraph, used by list unification.
    #[inline]
    pub(crate) fn dir_para(&self, id: NodeId) -> DirState {
        self.node(id).format.dir_para
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Verify slot numbering, descendant ranges and parent links.
    pub fn check_tree_invariants(&self) -> FlowResult<()> {
        let len = self.len();
        for (slot, &id) in self.order.iter().enumerate() {
            let n = self.node(id);
            if n.index != Some(slot) {
                return Err(FlowError::BrokenIndex {
                    slot,
                    recorded: n.index,
                });
            }

            if !n.is_pending() {
                if slot + n.child_count >= len {
                    return Err(FlowError::ChildRangeOverflow {
                        slot,
                        child_count: n.child_count,
                        available: len - slot - 1,
                    });
                }
                let end = slot + n.child_count;
                let mut at = slot + 1;
                while at <= end {
                    let child = self.node(self.order[at]);
                    if child.parent != Some(id) {
                        return Err(FlowError::ParentMismatch {
                            slot: at,
                            parent: Some(slot),
                        });
                    }
                    at += child.child_count + 1;
                }
                if at != end + 1 {
                    return Err(FlowError::ChildRangeOverflow {
                        slot,
                        child_count: n.child_count,
                        available: end - slot,
                    });
                }
            }

            if let Some(p) = n.parent {
                let pn = self.node(p);
                let contained = pn.index.is_some_and(|pi| {
                    pi < slot && (pn.is_pending() || slot <= pi + pn.child_count)
                });
                if !contained {
                    return Err(FlowError::ParentMismatch {
                        slot,
                        parent: pn.index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Verify that table and list structure nests as expected.
    pub fn check_semantic_invariants(&self) -> FlowResult<()> {
        use DocumentNodeType as T;
        for (slot, &id) in self.order.iter().enumerate() {
            let n = self.node(id);
            let Some(parent) = n.parent else {
                continue;
            };
            let pt = self.node(parent).node_type();
            let ok = match n.node_type() {
                T::TableBody => pt == T::Table,
                T::Row => pt == T::TableBody,
                T::Cell => pt == T::Row,
                T::ListItem => pt == T::List,
                T::Table | T::List | T::Paragraph => {
                    !matches!(pt, T::Table | T::TableBody | T::Row | T::List)
                },
                _ => true,
            };
            if !ok {
                return Err(FlowError::UnexpectedParent {
                    slot,
                    child: n.node_type().name(),
                    parent: pt.name(),
                });
            }
        }
        Ok(())
    }

    /// Run the structural checks when enabled; failures are bugs.
    pub(crate) fn assert_tree_invariants(&self) {
        if !self.options.check_invariants {
            return;
        }
        let result = self.check_tree_invariants();
        if let Err(err) = &result {
            log::error!(target: LOG_TARGET, "tree invariant violated: {err}");
        }
        debug_assert!(result.is_ok(), "tree invariant violated: {result:?}");
    }

    /// Run the nesting checks when enabled; malformed input can trip these.
    pub(crate) fn report_semantic_invariants(&self) {
        if !self.options.check_invariants {
            return;
        }
        if let Err(err) = self.check_semantic_invariants() {
            log::warn!(target: LOG_TARGET, "unexpected nesting: {err}");
        }
    }
}
