//! A headless [`TableHost`] that records what it is told.
//!
//! `RecordingTable` stands in for a real widget in tests and examples. It
//! records every structural call as a [`TableOp`], keeps the cells handed
//! to [`display`](RecordingTable::display) as the visible cells, and
//! recycles them into reuse pools whenever the table reloads or a batch
//! closes, the way a widget recycles cells that scroll away.
//!
//! ```
//! use braid::prelude::*;
//!
//! #[derive(Default)]
//! struct Plain;
//! impl TableCell for Plain {}
//!
//! let mut setup = BinderSetup::new(SectionUniverse::fixed([0_u8]));
//! setup.on_section(0).bind_cell::<Plain>().number_of_cells(3_usize);
//! let mut binder = setup.finish(RecordingTable::new());
//!
//! binder.render_all();
//! assert_eq!(binder.host().visible_count(), 3);
//! assert_eq!(binder.host().ops(), &[TableOp::ReloadData]);
//! ```

use std::collections::{BTreeMap, HashMap};

use braid_core::{IndexPath, Section};

use crate::binder::TableBinder;
use crate::cell::{HeaderFooterView, TableCell, cell_cast, cell_cast_mut};
use crate::table::{RowAnimation, TableHost};

/// One recorded host call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOp {
    ReloadData,
    BeginUpdates,
    EndUpdates,
    InsertSections(Vec<usize>, RowAnimation),
    DeleteSections(Vec<usize>, RowAnimation),
    ReloadSections(Vec<usize>, RowAnimation),
    MoveSection(usize, usize),
    InsertRows(Vec<IndexPath>, RowAnimation),
    DeleteRows(Vec<IndexPath>, RowAnimation),
    ReloadRows(Vec<IndexPath>, RowAnimation),
    MoveRow(IndexPath, IndexPath),
    SetEditing(bool),
}

impl TableOp {
    /// Returns `true` for calls that change rows or sections.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            Self::ReloadData | Self::BeginUpdates | Self::EndUpdates | Self::SetEditing(_)
        )
    }
}

struct VisibleCell {
    reuse_identifier: String,
    cell: Box<dyn TableCell>,
}

/// A table widget without a screen.
#[derive(Default)]
pub struct RecordingTable {
    ops: Vec<TableOp>,
    visible: BTreeMap<IndexPath, VisibleCell>,
    requested: HashMap<IndexPath, String>,
    cell_pool: HashMap<String, Vec<Box<dyn TableCell>>>,
    view_pool: HashMap<String, Vec<Box<dyn HeaderFooterView>>>,
    batch_depth: usize,
    editing: bool,
    reused: usize,
}

impl RecordingTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far.
    pub fn ops(&self) -> &[TableOp] {
        &self.ops
    }

    /// Returns and clears the recorded calls.
    pub fn take_ops(&mut self) -> Vec<TableOp> {
        std::mem::take(&mut self.ops)
    }

    /// Clears the recorded calls.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Puts a cell on screen at `index_path`, recycling whatever was there.
    pub fn display(&mut self, index_path: IndexPath, cell: Box<dyn TableCell>) {
        let reuse_identifier = self.requested.remove(&index_path).unwrap_or_default();
        let replaced = self.visible.insert(
            index_path,
            VisibleCell {
                reuse_identifier,
                cell,
            },
        );
        if let Some(replaced) = replaced {
            self.recycle(replaced);
        }
    }

    /// The visible cell at `index_path`, if it has type `C`.
    pub fn visible_cell<C: TableCell>(&self, index_path: IndexPath) -> Option<&C> {
        self.visible
            .get(&index_path)
            .and_then(|visible| cell_cast::<C>(visible.cell.as_ref()))
    }

    /// The visible cell at `index_path`, if it has type `C`.
    pub fn visible_cell_mut<C: TableCell>(&mut self, index_path: IndexPath) -> Option<&mut C> {
        self.visible
            .get_mut(&index_path)
            .and_then(|visible| cell_cast_mut::<C>(visible.cell.as_mut()))
    }

    /// How many cells are on screen.
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// How many dequeues were served from a reuse pool.
    pub fn reused_count(&self) -> usize {
        self.reused
    }

    /// Returns a header or footer view to its reuse pool.
    pub fn enqueue_header_footer(
        &mut self,
        reuse_identifier: &str,
        view: Box<dyn HeaderFooterView>,
    ) {
        self.view_pool
            .entry(reuse_identifier.to_owned())
            .or_default()
            .push(view);
    }

    /// Whether editing controls are on.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Moves every visible cell into the reuse pools.
    pub fn recycle_all(&mut self) {
        let visible = std::mem::take(&mut self.visible);
        for cell in visible.into_values() {
            self.recycle(cell);
        }
    }

    fn recycle(&mut self, visible: VisibleCell) {
        self.cell_pool
            .entry(visible.reuse_identifier)
            .or_default()
            .push(visible.cell);
    }

    fn record(&mut self, op: TableOp) {
        self.ops.push(op);
    }
}

impl TableHost for RecordingTable {
    fn reload_data(&mut self) {
        self.record(TableOp::ReloadData);
        self.recycle_all();
    }

    fn begin_updates(&mut self) {
        self.record(TableOp::BeginUpdates);
        self.batch_depth += 1;
    }

    fn end_updates(&mut self) {
        self.record(TableOp::EndUpdates);
        self.batch_depth = self.batch_depth.saturating_sub(1);
        if self.batch_depth == 0 {
            self.recycle_all();
        }
    }

    fn insert_sections(&mut self, sections: &[usize], animation: RowAnimation) {
        self.record(TableOp::InsertSections(sections.to_vec(), animation));
    }

    fn delete_sections(&mut self, sections: &[usize], animation: RowAnimation) {
        self.record(TableOp::DeleteSections(sections.to_vec(), animation));
    }

    fn reload_sections(&mut self, sections: &[usize], animation: RowAnimation) {
        self.record(TableOp::ReloadSections(sections.to_vec(), animation));
    }

    fn move_section(&mut self, from: usize, to: usize) {
        self.record(TableOp::MoveSection(from, to));
    }

    fn insert_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.record(TableOp::InsertRows(rows.to_vec(), animation));
    }

    fn delete_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.record(TableOp::DeleteRows(rows.to_vec(), animation));
    }

    fn reload_rows(&mut self, rows: &[IndexPath], animation: RowAnimation) {
        self.record(TableOp::ReloadRows(rows.to_vec(), animation));
    }

    fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.record(TableOp::MoveRow(from, to));
    }

    fn dequeue_cell(
        &mut self,
        reuse_identifier: &str,
        index_path: IndexPath,
    ) -> Option<Box<dyn TableCell>> {
        self.requested
            .insert(index_path, reuse_identifier.to_owned());
        let mut cell = self.cell_pool.get_mut(reuse_identifier)?.pop()?;
        cell.prepare_for_reuse();
        self.reused += 1;
        Some(cell)
    }

    fn dequeue_header_footer(
        &mut self,
        reuse_identifier: &str,
    ) -> Option<Box<dyn HeaderFooterView>> {
        let mut view = self.view_pool.get_mut(reuse_identifier)?.pop()?;
        view.prepare_for_reuse();
        self.reused += 1;
        Some(view)
    }

    fn cell_mut(&mut self, index_path: IndexPath) -> Option<&mut (dyn TableCell + 'static)> {
        self.visible
            .get_mut(&index_path)
            .map(|visible| visible.cell.as_mut())
    }

    fn set_editing(&mut self, editing: bool) {
        self.record(TableOp::SetEditing(editing));
        self.editing = editing;
    }
}

impl<S: Section> TableBinder<S, RecordingTable> {
    /// Asks for the cell of every displayed row and puts it on screen, like
    /// a layout pass.
    pub fn render_all(&mut self) {
        for section in 0..self.number_of_sections() {
            for row in 0..self.number_of_rows(section) {
                let index_path = IndexPath::new(section, row);
                let cell = self.cell_for_row(index_path);
                self.host_mut().display(index_path, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        resets: usize,
    }

    impl TableCell for Counter {
        fn prepare_for_reuse(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn test_cells_are_recycled_after_a_batch() {
        let mut table = RecordingTable::new();
        let at = IndexPath::new(0, 0);
        assert!(table.dequeue_cell("counter", at).is_none());
        table.display(at, Box::new(Counter::default()));
        assert!(table.visible_cell::<Counter>(at).is_some());

        table.begin_updates();
        table.insert_rows(&[IndexPath::new(0, 1)], RowAnimation::Fade);
        assert_eq!(table.visible_count(), 1);
        table.end_updates();
        assert_eq!(table.visible_count(), 0);

        let mut reused = table.dequeue_cell("counter", at).unwrap();
        assert_eq!(cell_cast_mut::<Counter>(reused.as_mut()).unwrap().resets, 1);
        assert_eq!(table.reused_count(), 1);
        assert!(table.ops()[1].is_structural());
    }

    #[test]
    fn test_cell_mut_sees_visible_cells_only() {
        let mut table = RecordingTable::new();
        let at = IndexPath::new(1, 2);
        table.display(at, Box::new(Counter::default()));
        assert!(table.cell_mut(at).is_some());
        assert!(table.cell_mut(IndexPath::new(0, 0)).is_none());

        table.reload_data();
        assert!(table.cell_mut(at).is_none());
        assert_eq!(table.take_ops(), vec![TableOp::ReloadData]);
        assert!(table.ops().is_empty());
    }

    #[test]
    fn test_editing_flag() {
        let mut table = RecordingTable::new();
        table.set_editing(true);
        assert!(table.is_editing());
        assert_eq!(table.ops(), &[TableOp::SetEditing(true)]);
    }
}
