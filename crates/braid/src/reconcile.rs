//! Applying a [`Changeset`] to a host widget.
//!
//! The main batch carries every structural operation in the order the
//! widget's batch contract expects. Rows that moved and changed, and
//! sections whose header or footer changed, cannot be reloaded in that same
//! batch; they get a second one.

use braid_core::Changeset;
use braid_core::logging::targets;

use crate::config::BinderConfig;
use crate::table::TableHost;

/// Applies `changes` to `host`.
///
/// With `forced`, the main batch is opened even when empty so the host
/// re-queries heights. With animations disabled the host just reloads.
pub(crate) fn apply<H: TableHost>(
    host: &mut H,
    changes: &Changeset,
    config: &BinderConfig,
    forced: bool,
) {
    if !config.animate_updates() {
        tracing::trace!(target: targets::RECONCILE, "animations disabled, reloading");
        host.reload_data();
        return;
    }

    let animations = config.animations();
    if changes.has_batch_operations() || forced {
        host.begin_updates();
        if !changes.reloaded_rows.is_empty() {
            let rows: Vec<_> = changes.reloaded_rows.iter().map(|reload| reload.old).collect();
            host.reload_rows(&rows, animations.reload_rows);
        }
        if !changes.deleted_rows.is_empty() {
            host.delete_rows(&changes.deleted_rows, animations.delete_rows);
        }
        if !changes.deleted_sections.is_empty() {
            host.delete_sections(&changes.deleted_sections, animations.delete_sections);
        }
        if !changes.inserted_sections.is_empty() {
            host.insert_sections(&changes.inserted_sections, animations.insert_sections);
        }
        for section_move in &changes.moved_sections {
            host.move_section(section_move.from, section_move.to);
        }
        if !changes.inserted_rows.is_empty() {
            host.insert_rows(&changes.inserted_rows, animations.insert_rows);
        }
        for row_move in &changes.moved_rows {
            host.move_row(row_move.from, row_move.to);
        }
        host.end_updates();
    }

    let deferred_rows: Vec<_> = changes
        .deferred_row_reloads
        .iter()
        .filter(|row| !changes.deferred_section_reloads.contains(&row.section()))
        .copied()
        .collect();
    if !changes.deferred_section_reloads.is_empty() || !deferred_rows.is_empty() {
        host.begin_updates();
        if !changes.deferred_section_reloads.is_empty() {
            host.reload_sections(&changes.deferred_section_reloads, animations.reload_sections);
        }
        if !deferred_rows.is_empty() {
            host.reload_rows(&deferred_rows, animations.reload_rows);
        }
        host.end_updates();
    }

    tracing::trace!(
        target: targets::RECONCILE,
        operations = changes.operation_count(),
        "changeset applied"
    );
}

#[cfg(test)]
mod tests {
    use braid_core::{IndexPath, RowMove, RowReload};

    use super::*;
    use crate::recording::{RecordingTable, TableOp};
    use crate::table::RowAnimation;

    fn ip(section: usize, row: usize) -> IndexPath {
        IndexPath::new(section, row)
    }

    #[test]
    fn test_main_batch_order() {
        let changes = Changeset {
            deleted_sections: vec![2],
            inserted_sections: vec![0],
            deleted_rows: vec![ip(1, 3)],
            inserted_rows: vec![ip(1, 0)],
            moved_rows: vec![RowMove {
                from: ip(0, 0),
                to: ip(1, 1),
            }],
            reloaded_rows: vec![RowReload {
                old: ip(0, 1),
                new: ip(1, 2),
            }],
            ..Changeset::default()
        };
        let mut host = RecordingTable::new();
        apply(&mut host, &changes, &BinderConfig::default(), false);

        let auto = RowAnimation::Automatic;
        assert_eq!(
            host.ops(),
            &[
                TableOp::BeginUpdates,
                TableOp::ReloadRows(vec![ip(0, 1)], auto),
                TableOp::DeleteRows(vec![ip(1, 3)], auto),
                TableOp::DeleteSections(vec![2], auto),
                TableOp::InsertSections(vec![0], auto),
                TableOp::InsertRows(vec![ip(1, 0)], auto),
                TableOp::MoveRow(ip(0, 0), ip(1, 1)),
                TableOp::EndUpdates,
            ]
        );
    }

    #[test]
    fn test_deferred_reloads_get_their_own_batch() {
        let changes = Changeset {
            moved_rows: vec![RowMove {
                from: ip(0, 0),
                to: ip(0, 2),
            }],
            deferred_row_reloads: vec![ip(0, 2), ip(1, 0)],
            deferred_section_reloads: vec![1],
            ..Changeset::default()
        };
        let mut host = RecordingTable::new();
        apply(&mut host, &changes, &BinderConfig::default(), false);

        let auto = RowAnimation::Automatic;
        assert_eq!(
            host.ops(),
            &[
                TableOp::BeginUpdates,
                TableOp::MoveRow(ip(0, 0), ip(0, 2)),
                TableOp::EndUpdates,
                TableOp::BeginUpdates,
                TableOp::ReloadSections(vec![1], auto),
                TableOp::ReloadRows(vec![ip(0, 2)], auto),
                TableOp::EndUpdates,
            ]
        );
    }

    #[test]
    fn test_forced_empty_batch() {
        let mut host = RecordingTable::new();
        apply(&mut host, &Changeset::default(), &BinderConfig::default(), true);
        assert_eq!(host.ops(), &[TableOp::BeginUpdates, TableOp::EndUpdates]);
    }

    #[test]
    fn test_without_animations_reloads() {
        let changes = Changeset {
            inserted_rows: vec![ip(0, 0)],
            ..Changeset::default()
        };
        let mut host = RecordingTable::new();
        let config = BinderConfig::new().with_animate_updates(false);
        apply(&mut host, &changes, &config, false);
        assert_eq!(host.ops(), &[TableOp::ReloadData]);
    }
}
