//! The queries a host widget makes while laying out and interacting with
//! the table. Everything here reads the current generation.

use braid_core::{
    BindingError, Changeset, IndexPath, Result, Section, braid_trace, braid_warn, fatal,
};

use super::{Edge, TableBinder};
use crate::cell::{HeaderFooterView, TableCell};
use crate::editing::{ChangeReason, EditingStyle, MovePolicy};
use crate::item::{RowItem, Supplementary};
use crate::registry::{
    CellHeight, Cells, Deleted, Dequeue, Editing, EstimatedCellHeight, EstimatedFooterHeight,
    EstimatedHeaderHeight, Events, FooterHeight, Footers, HeaderHeight, Headers, Inserted,
    Moving, RowChange, RowKind, RowMappings, Tapped,
};
use crate::table::TableHost;

impl<S: Section, H: TableHost> TableBinder<S, H> {
    /// How many sections are displayed.
    pub fn number_of_sections(&self) -> usize {
        self.current.displayed().len()
    }

    /// How many rows the displayed section at `section` has.
    pub fn number_of_rows(&self, section: usize) -> usize {
        self.section_at(section)
            .map_or(0, |section| self.current.rows(section).len())
    }

    /// The displayed section at an index.
    pub fn section_at(&self, index: usize) -> Option<&S> {
        self.current.section_at(index)
    }

    fn displayed_section(&self, index: usize) -> &S {
        self.current.section_at(index).unwrap_or_else(|| {
            fatal(BindingError::SectionOutOfRange {
                index,
                count: self.current.displayed().len(),
            })
        })
    }

    /// The row stored at an index path.
    pub fn item_at(&self, index_path: IndexPath) -> Option<&RowItem> {
        let section = self.section_at(index_path.section())?;
        self.current.row(section, index_path.row())
    }

    /// The model of a row, if it has type `M`.
    pub fn model_at<M: 'static>(&self, index_path: IndexPath) -> Option<&M> {
        self.try_model_at(index_path).ok()
    }

    /// The model of a row, with the reason when it cannot be read as `M`.
    pub fn try_model_at<M: 'static>(&self, index_path: IndexPath) -> Result<&M> {
        let section =
            self.section_at(index_path.section())
                .ok_or(BindingError::SectionOutOfRange {
                    index: index_path.section(),
                    count: self.number_of_sections(),
                })?;
        let item = self
            .current
            .row(section, index_path.row())
            .ok_or_else(|| BindingError::missing("row", section, index_path.row()))?;
        if item.is_counted() {
            return Err(BindingError::missing("model", section, index_path.row()));
        }
        item.model::<M>().ok_or(BindingError::TypeMismatch {
            expected: std::any::type_name::<M>(),
            found: item.model_type_name(),
            context: "model_at",
        })
    }

    /// Dequeues and configures the cell for a row.
    ///
    /// The view model, if the section has one, is assigned first. Then the
    /// event sink is installed and the dequeue callback runs.
    ///
    /// # Panics
    ///
    /// Panics if the index path is outside the displayed content or the
    /// section has no cell type bound.
    pub fn cell_for_row(&mut self, index_path: IndexPath) -> Box<dyn TableCell> {
        self.affinity.debug_assert_same_thread();
        let section = self.displayed_section(index_path.section()).clone();
        let row = index_path.row();
        let Some(item) = self.current.row(&section, row).cloned() else {
            fatal(BindingError::missing("row", &section, row));
        };
        let Some(binding) = self.registry.resolve::<Cells>(&section).cloned() else {
            fatal(BindingError::NoCellBinding {
                section: format!("{section:?}"),
            });
        };

        let mut cell = self
            .host
            .dequeue_cell(binding.reuse_identifier, index_path)
            .unwrap_or_else(|| (binding.make)());

        if self.current.row_kind(&section) != Some(RowKind::Count)
            && let Some(mapping) = self.registry.resolve::<RowMappings>(&section)
            && let Some(configure) = &mapping.configure
            && !configure(cell.as_mut(), &item)
        {
            fatal(BindingError::TypeMismatch {
                expected: binding.type_name,
                found: item.model_type_name(),
                context: "cell view model",
            });
        }
        if let Some(hookup) = self.registry.resolve::<Events>(&section) {
            hookup(&section, row, cell.as_mut(), &item);
        }
        if let Some(callback) = self.registry.resolve::<Dequeue>(&section) {
            callback(&section, row, cell.as_mut(), &item);
        }
        cell
    }

    /// Dequeues and configures the header view of a section, if one is
    /// bound.
    pub fn header_view(&mut self, section: usize) -> Option<Box<dyn HeaderFooterView>> {
        self.supplementary_view(section, Edge::Header)
    }

    /// Dequeues and configures the footer view of a section, if one is
    /// bound.
    pub fn footer_view(&mut self, section: usize) -> Option<Box<dyn HeaderFooterView>> {
        self.supplementary_view(section, Edge::Footer)
    }

    fn supplementary_view(&mut self, index: usize, edge: Edge) -> Option<Box<dyn HeaderFooterView>> {
        self.affinity.debug_assert_same_thread();
        let section = self.displayed_section(index).clone();
        let binding = match edge {
            Edge::Header => self.registry.resolve::<Headers>(&section),
            Edge::Footer => self.registry.resolve::<Footers>(&section),
        }
        .cloned()?;

        let mut view = self
            .host
            .dequeue_header_footer(binding.reuse_identifier)
            .unwrap_or_else(|| (binding.make)());
        if let Some(expected) = &binding.view_model {
            let what = match edge {
                Edge::Header => "header view model",
                Edge::Footer => "footer view model",
            };
            let Some(value) = self
                .current
                .supplementary(&section, edge)
                .and_then(Supplementary::view_model)
            else {
                fatal(BindingError::MissingSectionContent {
                    what,
                    section: format!("{section:?}"),
                });
            };
            if !(expected.configure)(view.as_mut(), value) {
                fatal(BindingError::TypeMismatch {
                    expected: expected.type_name,
                    found: value.type_name(),
                    context: what,
                });
            }
        }
        Some(view)
    }

    /// The plain header title of a section.
    pub fn header_title(&self, section: usize) -> Option<&str> {
        let section = self.section_at(section)?;
        self.current
            .supplementary(section, Edge::Header)
            .and_then(Supplementary::title)
    }

    /// The plain footer title of a section.
    pub fn footer_title(&self, section: usize) -> Option<&str> {
        let section = self.section_at(section)?;
        self.current
            .supplementary(section, Edge::Footer)
            .and_then(Supplementary::title)
    }

    /// The height of a row, or `None` to let the host decide.
    pub fn height_for_row(&self, index_path: IndexPath) -> Option<f64> {
        let (section, item) = self.row_context(index_path)?;
        let query = self.registry.resolve::<CellHeight>(section)?;
        Some(query(section, index_path.row(), item))
    }

    /// The estimated height of a row.
    pub fn estimated_height_for_row(&self, index_path: IndexPath) -> Option<f64> {
        let (section, item) = self.row_context(index_path)?;
        let query = self.registry.resolve::<EstimatedCellHeight>(section)?;
        Some(query(section, index_path.row(), item))
    }

    /// The header height of a section.
    pub fn height_for_header(&self, section: usize) -> Option<f64> {
        let section = self.section_at(section)?;
        self.registry
            .resolve::<HeaderHeight>(section)
            .map(|query| query(section))
    }

    /// The estimated header height of a section.
    pub fn estimated_height_for_header(&self, section: usize) -> Option<f64> {
        let section = self.section_at(section)?;
        self.registry
            .resolve::<EstimatedHeaderHeight>(section)
            .map(|query| query(section))
    }

    /// The footer height of a section.
    pub fn height_for_footer(&self, section: usize) -> Option<f64> {
        let section = self.section_at(section)?;
        self.registry
            .resolve::<FooterHeight>(section)
            .map(|query| query(section))
    }

    /// The estimated footer height of a section.
    pub fn estimated_height_for_footer(&self, section: usize) -> Option<f64> {
        let section = self.section_at(section)?;
        self.registry
            .resolve::<EstimatedFooterHeight>(section)
            .map(|query| query(section))
    }

    fn row_context(&self, index_path: IndexPath) -> Option<(&S, &RowItem)> {
        let section = self.section_at(index_path.section())?;
        let item = self.current.row(section, index_path.row())?;
        Some((section, item))
    }

    /// Delivers a row selection to the tap handler.
    ///
    /// Taps on rows that are gone or no longer on screen are dropped.
    pub fn did_select_row(&mut self, index_path: IndexPath) {
        self.affinity.debug_assert_same_thread();
        let Some((section, item)) = self
            .row_context(index_path)
            .map(|(section, item)| (section.clone(), item.clone()))
        else {
            braid_warn!(%index_path, "selected row is not displayed");
            return;
        };
        let Some(handler) = self.registry.resolve::<Tapped>(&section).cloned() else {
            return;
        };
        let Some(cell) = self.host.cell_mut(index_path) else {
            braid_trace!(%index_path, "selected row has no visible cell");
            return;
        };
        handler(&section, index_path.row(), cell, &item);
    }

    /// The edit control for a row.
    pub fn editing_style(&self, index_path: IndexPath) -> EditingStyle {
        self.row_context(index_path)
            .and_then(|(section, item)| {
                let query = self.registry.resolve::<Editing>(section)?;
                Some(query(section, index_path.row(), item))
            })
            .unwrap_or_default()
    }

    /// Whether a row shows any edit or reorder control.
    pub fn can_edit_row(&self, index_path: IndexPath) -> bool {
        self.editing_style(index_path) != EditingStyle::None || self.can_move_row(index_path)
    }

    /// Whether a row may be reordered.
    pub fn can_move_row(&self, index_path: IndexPath) -> bool {
        let Some((section, item)) = self.row_context(index_path) else {
            return false;
        };
        let Some(rule) = self.registry.resolve::<Moving>(section) else {
            return false;
        };
        rule.can_move
            .as_ref()
            .is_none_or(|can_move| can_move(section, index_path.row(), item))
    }

    /// Where a row being dragged from `from` may land when the user points
    /// at `proposed`.
    ///
    /// A row limited to its own section is pinned to that section's first
    /// or last row. Any other disallowed target keeps the row where it was.
    pub fn target_index_for_move(&self, from: IndexPath, proposed: IndexPath) -> IndexPath {
        let (Some(source), Some(target)) = (
            self.section_at(from.section()),
            self.section_at(proposed.section()),
        ) else {
            return from;
        };
        let Some(rule) = self.registry.resolve::<Moving>(source) else {
            return from;
        };
        if rule.policy.allows(source, target) {
            return proposed;
        }
        match rule.policy {
            MovePolicy::ToSameSection if proposed.section() < from.section() => from.with_row(0),
            MovePolicy::ToSameSection => {
                from.with_row(self.number_of_rows(from.section()).saturating_sub(1))
            }
            _ => from,
        }
    }

    /// Turns the host's editing controls on or off.
    pub fn set_editing(&mut self, editing: bool) {
        self.host.set_editing(editing);
    }

    /// Applies a delete or insert the user confirmed on a row.
    ///
    /// A delete removes the row from both generations and from the host
    /// before the delete handler runs. An insert only notifies: the handler
    /// is expected to push the new content through an update call.
    pub fn commit_editing(&mut self, style: EditingStyle, index_path: IndexPath) {
        self.affinity.debug_assert_same_thread();
        match style {
            EditingStyle::None => {}
            EditingStyle::Delete => self.delete_row(index_path),
            EditingStyle::Insert => {
                let Some((section, item)) = self
                    .row_context(index_path)
                    .map(|(section, item)| (section.clone(), item.clone()))
                else {
                    return;
                };
                self.notify::<Inserted>(
                    &section,
                    index_path.row(),
                    &item,
                    &ChangeReason::UserInitiatedInsert,
                );
            }
        }
    }

    fn delete_row(&mut self, index_path: IndexPath) {
        let section = self.displayed_section(index_path.section()).clone();
        let row = index_path.row();
        let item = match self.current.rows_mut(&section) {
            Some(rows) if row < rows.len() => rows.remove(row),
            _ => fatal(BindingError::missing("row", &section, row)),
        };
        self.current.renumber_counted(&section);
        self.remove_pending(&section, &item);

        self.current.update_displayed(
            &self.universe,
            self.config.section_display_behavior(),
            self.section_order.as_ref(),
        );
        let mut changes = Changeset::default();
        if self.current.displayed_index(&section).is_some() {
            changes.deleted_rows.push(index_path);
        } else {
            changes.deleted_sections.push(index_path.section());
        }
        self.apply(&changes, false);

        self.notify::<Deleted>(&section, row, &item, &ChangeReason::UserInitiatedDelete);
    }

    /// Removes a row from the pending generation, matching by identity.
    fn remove_pending(&mut self, section: &S, item: &RowItem) {
        if let Some(rows) = self.next.rows_mut(section)
            && let Some(position) = rows.iter().position(|row| row.id() == item.id())
        {
            rows.remove(position);
        }
        self.next.renumber_counted(section);
    }

    /// Records a row the user already dragged from `from` to `to`.
    ///
    /// The host has moved the row on screen, so nothing is sent back to it.
    /// The delete handler of the source fires first with
    /// [`ChangeReason::MovedTo`], then the insert handler of the destination
    /// with [`ChangeReason::MovedFrom`].
    pub fn move_row(&mut self, from: IndexPath, to: IndexPath) {
        self.affinity.debug_assert_same_thread();
        if from == to {
            return;
        }
        let source = self.displayed_section(from.section()).clone();
        let target = self.displayed_section(to.section()).clone();
        let kind = self.current.row_kind(&source).unwrap_or(RowKind::Models);

        let item = match self.current.rows_mut(&source) {
            Some(rows) if from.row() < rows.len() => rows.remove(from.row()),
            _ => fatal(BindingError::missing("row", &source, from.row())),
        };
        let rows = self.current.rows_entry(target.clone(), kind);
        rows.insert(to.row().min(rows.len()), item.clone());
        self.current.renumber_counted(&source);
        self.current.renumber_counted(&target);

        self.remove_pending(&source, &item);
        let rows = self.next.rows_entry(target.clone(), kind);
        rows.insert(to.row().min(rows.len()), item.clone());
        self.next.renumber_counted(&target);

        braid_trace!(%from, %to, "row moved by user");
        self.notify::<Deleted>(
            &source,
            from.row(),
            &item,
            &ChangeReason::MovedTo {
                section: target.clone(),
                row: to.row(),
            },
        );
        self.notify::<Inserted>(
            &target,
            to.row(),
            &item,
            &ChangeReason::MovedFrom {
                section: source,
                row: from.row(),
            },
        );
    }

    fn notify<K>(&self, section: &S, row: usize, item: &RowItem, reason: &ChangeReason<S>)
    where
        K: crate::registry::HandlerKind<S, Handler = RowChange<S>>,
    {
        if let Some(handler) = self.registry.resolve::<K>(section) {
            handler(section, row, item, reason);
        }
    }
}
