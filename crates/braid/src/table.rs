//! The host widget contract.
//!
//! A binder drives a sectioned table widget through [`TableHost`]. The
//! widget keeps ownership of its views and its layout; the binder only
//! dequeues views from it and issues batched structural updates.
//!
//! Batch updates follow the usual contract of such widgets: between
//! [`begin_updates`](TableHost::begin_updates) and
//! [`end_updates`](TableHost::end_updates), deletions and reloads are given
//! in the coordinates from before the batch and insertions in the
//! coordinates from after it.

use braid_core::IndexPath;

use crate::cell::{HeaderFooterView, TableCell};

/// How an inserted, deleted or reloaded row or section is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowAnimation {
    /// No animation.
    None,
    /// Let the widget choose.
    #[default]
    Automatic,
    /// Cross-fade.
    Fade,
    /// Slide from or to the left.
    Left,
    /// Slide from or to the right.
    Right,
    /// Slide from or to the top.
    Top,
    /// Slide from or to the bottom.
    Bottom,
    /// Keep the row centered while it appears or disappears.
    Middle,
}

/// A sectioned table widget.
pub trait TableHost {
    /// Discards everything and re-queries the data source.
    fn reload_data(&mut self);

    /// Opens a batch of structural updates.
    fn begin_updates(&mut self);

    /// Closes the batch and animates it.
    fn end_updates(&mut self);

    /// Inserts sections at new indices.
    fn insert_sections(&mut self, sections: &[usize], animation: RowAnimation);

    /// Deletes sections at old indices.
    fn delete_sections(&mut self, sections: &[usize], animation: RowAnimation);

    /// Reloads sections, re-querying their headers, footers and rows.
    fn reload_sections(&mut self, sections: &[usize], animation: RowAnimation);

    /// Moves a section.
    fn move_section(&mut self, from: usize, to: usize);

    /// Inserts rows at new coordinates.
    fn insert_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Deletes rows at old coordinates.
    fn delete_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Reloads rows at old coordinates.
    fn reload_rows(&mut self, rows: &[IndexPath], animation: RowAnimation);

    /// Moves a row, possibly across sections.
    fn move_row(&mut self, from: IndexPath, to: IndexPath);

    /// Hands out a recycled cell for the identifier, if the widget has one.
    fn dequeue_cell(
        &mut self,
        reuse_identifier: &str,
        index_path: IndexPath,
    ) -> Option<Box<dyn TableCell>>;

    /// Hands out a recycled header or footer view, if the widget has one.
    fn dequeue_header_footer(&mut self, reuse_identifier: &str)
    -> Option<Box<dyn HeaderFooterView>>;

    /// The cell currently displayed at a row, if it is on screen.
    fn cell_mut(&mut self, index_path: IndexPath) -> Option<&mut (dyn TableCell + 'static)>;

    /// Turns the native edit and reorder controls on or off.
    fn set_editing(&mut self, _editing: bool) {}
}
