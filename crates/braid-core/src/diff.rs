//! Identity-based diffing of sectioned lists.
//!
//! [`diff`] compares two generations of sectioned rows and produces a
//! [`Changeset`]: the section and row operations a table widget must run,
//! inside one batch update, to turn what it displays now into what it should
//! display next.
//!
//! # Algorithm
//!
//! 1. Sections are matched by key. Unmatched old sections are deleted,
//!    unmatched new ones inserted. Among matched sections, those outside the
//!    longest run that kept its relative order are moved.
//! 2. Within each matched section, rows are matched by [`ItemId`]. Matched
//!    rows outside the longest order-preserving run are moved. Matched rows
//!    that did not move but compare unequal are reloaded in place.
//! 3. Rows removed from one section and inserted into another with the same
//!    identity are collapsed into a single cross-section move.
//! 4. Whatever remains unmatched is deleted or inserted.
//!
//! # Index conventions
//!
//! These follow the batch-update contract of UIKit-style table widgets:
//! deletions, move sources and in-place reloads use *old* coordinates;
//! insertions and move destinations use *new* coordinates. Deletions are
//! sorted by descending index and insertions by ascending index so that
//! applying them one at a time never invalidates a later index.
//!
//! A row that both moves and changes cannot be reloaded in the same batch,
//! so it is reported in [`Changeset::deferred_row_reloads`] (new
//! coordinates) for a follow-up batch.

use std::collections::{HashMap, HashSet, VecDeque};

use lis::LisExt;

use crate::identity::{Identifiable, ItemId};
use crate::index::IndexPath;
use crate::logging::{PerfSpan, span_names, targets};
use crate::section::Section;

/// The rows of one section, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionItems<S, T> {
    /// The section key.
    pub section: S,
    /// The rows, in display order.
    pub items: Vec<T>,
}

impl<S, T> SectionItems<S, T> {
    /// Creates a section snapshot.
    pub fn new(section: S, items: Vec<T>) -> Self {
        Self { section, items }
    }
}

/// A row moving from an old position to a new one.
///
/// A cross-section move is the matched pair of a delete at `from` and an
/// insert at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowMove {
    /// Old coordinates.
    pub from: IndexPath,
    /// New coordinates.
    pub to: IndexPath,
}

impl RowMove {
    /// Returns `true` if the row changes section.
    pub fn is_cross_section(&self) -> bool {
        self.from.section() != self.to.section()
    }
}

/// A section moving from an old index to a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionMove {
    /// Old section index.
    pub from: usize,
    /// New section index.
    pub to: usize,
}

/// A row whose content changed without moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowReload {
    /// Old coordinates, as the widget's reload call expects.
    pub old: IndexPath,
    /// Where the row ends up, for fetching its new content.
    pub new: IndexPath,
}

/// The operations that transform one generation into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    /// Old section indices, descending.
    pub deleted_sections: Vec<usize>,
    /// New section indices, ascending.
    pub inserted_sections: Vec<usize>,
    /// Section moves, ordered by source.
    pub moved_sections: Vec<SectionMove>,
    /// Old row coordinates, descending.
    pub deleted_rows: Vec<IndexPath>,
    /// New row coordinates, ascending.
    pub inserted_rows: Vec<IndexPath>,
    /// Row moves, ordered by source.
    pub moved_rows: Vec<RowMove>,
    /// In-place reloads, ordered by old coordinates.
    pub reloaded_rows: Vec<RowReload>,
    /// Rows to reload after the batch (new coordinates, ascending).
    pub deferred_row_reloads: Vec<IndexPath>,
    /// Sections to reload after the batch (new indices, ascending).
    ///
    /// The diff engine never fills this; binders add sections whose header
    /// or footer content changed.
    pub deferred_section_reloads: Vec<usize>,
}

impl Changeset {
    /// Returns `true` if nothing needs to happen.
    pub fn is_empty(&self) -> bool {
        !self.has_batch_operations()
            && self.deferred_row_reloads.is_empty()
            && self.deferred_section_reloads.is_empty()
    }

    /// Returns `true` if the main batch has any operation.
    pub fn has_batch_operations(&self) -> bool {
        !(self.deleted_sections.is_empty()
            && self.inserted_sections.is_empty()
            && self.moved_sections.is_empty()
            && self.deleted_rows.is_empty()
            && self.inserted_rows.is_empty()
            && self.moved_rows.is_empty()
            && self.reloaded_rows.is_empty())
    }

    /// Total number of operations, counting each move once.
    pub fn operation_count(&self) -> usize {
        self.deleted_sections.len()
            + self.inserted_sections.len()
            + self.moved_sections.len()
            + self.deleted_rows.len()
            + self.inserted_rows.len()
            + self.moved_rows.len()
            + self.reloaded_rows.len()
            + self.deferred_row_reloads.len()
            + self.deferred_section_reloads.len()
    }

    /// Sorts every list into the order the widget must see it in.
    pub fn normalize(&mut self) {
        self.deleted_sections.sort_unstable_by(|a, b| b.cmp(a));
        self.deleted_sections.dedup();
        self.inserted_sections.sort_unstable();
        self.inserted_sections.dedup();
        self.moved_sections.sort_unstable();
        self.deleted_rows.sort_unstable_by(|a, b| b.cmp(a));
        self.deleted_rows.dedup();
        self.inserted_rows.sort_unstable();
        self.inserted_rows.dedup();
        self.moved_rows.sort_unstable();
        self.reloaded_rows.sort_unstable();
        self.deferred_row_reloads.sort_unstable();
        self.deferred_row_reloads.dedup();
        self.deferred_section_reloads.sort_unstable();
        self.deferred_section_reloads.dedup();
    }

    /// Replays the changeset the way a table widget would.
    ///
    /// `old` is what the widget displays; `new` is the data source it
    /// re-queries for inserted and reloaded rows. The result is what the
    /// widget displays afterwards, which for a correct changeset matches
    /// `new` row for row.
    pub fn apply<S, T>(
        &self,
        old: &[SectionItems<S, T>],
        new: &[SectionItems<S, T>],
    ) -> Vec<SectionItems<S, T>>
    where
        S: Clone,
        T: Clone,
    {
        let mut working: Vec<Vec<T>> = old.iter().map(|s| s.items.clone()).collect();

        for reload in &self.reloaded_rows {
            working[reload.old.section()][reload.old.row()] =
                new[reload.new.section()].items[reload.new.row()].clone();
        }

        // Remove deletions and move sources, highest index first.
        let mut removals: Vec<IndexPath> = self
            .deleted_rows
            .iter()
            .copied()
            .chain(self.moved_rows.iter().map(|m| m.from))
            .collect();
        removals.sort_unstable_by(|a, b| b.cmp(a));
        let mut in_flight: HashMap<IndexPath, T> = HashMap::new();
        for path in removals {
            let item = working[path.section()].remove(path.row());
            in_flight.insert(path, item);
        }

        // Rebuild the section list: inserted sections come from the data
        // source, moved sections land at their destination, the rest keep
        // their relative order.
        let deleted: HashSet<usize> = self.deleted_sections.iter().copied().collect();
        let inserted: HashSet<usize> = self.inserted_sections.iter().copied().collect();
        let move_targets: HashMap<usize, usize> =
            self.moved_sections.iter().map(|m| (m.to, m.from)).collect();
        let moved_sources: HashSet<usize> = self.moved_sections.iter().map(|m| m.from).collect();
        let mut staying = (0..old.len())
            .filter(|i| !deleted.contains(i) && !moved_sources.contains(i))
            .collect::<VecDeque<_>>();

        let mut result: Vec<SectionItems<S, T>> = Vec::with_capacity(new.len());
        for (index, target) in new.iter().enumerate() {
            if inserted.contains(&index) {
                result.push(SectionItems::new(target.section.clone(), target.items.clone()));
                continue;
            }
            let source = match move_targets.get(&index) {
                Some(&from) => from,
                None => match staying.pop_front() {
                    Some(from) => from,
                    None => break,
                },
            };
            result.push(SectionItems::new(
                old[source].section.clone(),
                std::mem::take(&mut working[source]),
            ));
        }

        // Insert new rows and move destinations, lowest index first.
        let sources: HashMap<IndexPath, IndexPath> =
            self.moved_rows.iter().map(|m| (m.to, m.from)).collect();
        let mut insertions: Vec<IndexPath> = self
            .inserted_rows
            .iter()
            .copied()
            .chain(self.moved_rows.iter().map(|m| m.to))
            .collect();
        insertions.sort_unstable();
        for path in insertions {
            let item = match sources.get(&path) {
                Some(from) => match in_flight.remove(from) {
                    Some(item) => item,
                    None => continue,
                },
                None => new[path.section()].items[path.row()].clone(),
            };
            result[path.section()].items.insert(path.row(), item);
        }

        for path in &self.deferred_row_reloads {
            result[path.section()].items[path.row()] =
                new[path.section()].items[path.row()].clone();
        }
        for &section in &self.deferred_section_reloads {
            result[section].items = new[section].items.clone();
        }

        result
    }
}

/// A row that lost or gained its match inside its own section.
struct Unmatched<'a, T> {
    path: IndexPath,
    id: ItemId,
    item: &'a T,
}

/// Computes the operations turning `old` into `new`.
///
/// Pure and infallible. Identity keys must be unique within a section;
/// when they are not, the first occurrence is matched and later duplicates
/// are treated as unmatched rows.
pub fn diff<S, T>(old: &[SectionItems<S, T>], new: &[SectionItems<S, T>]) -> Changeset
where
    S: Section,
    T: Identifiable + PartialEq,
{
    let _span = PerfSpan::new(span_names::DIFF);
    let mut changes = Changeset::default();

    let old_positions = first_positions(old.iter().map(|s| &s.section));
    let new_positions = first_positions(new.iter().map(|s| &s.section));

    for (index, section) in old.iter().enumerate() {
        if old_positions.get(&section.section) != Some(&index)
            || !new_positions.contains_key(&section.section)
        {
            changes.deleted_sections.push(index);
        }
    }

    // Matched sections in new order, as (old index, new index).
    let mut matched_sections: Vec<(usize, usize)> = Vec::new();
    for (index, section) in new.iter().enumerate() {
        let first = new_positions.get(&section.section) == Some(&index);
        match old_positions.get(&section.section) {
            Some(&old_index) if first => matched_sections.push((old_index, index)),
            _ => changes.inserted_sections.push(index),
        }
    }

    let stable = stable_positions(&matched_sections.iter().map(|m| m.0).collect::<Vec<_>>());
    for (k, &(from, to)) in matched_sections.iter().enumerate() {
        if !stable[k] {
            changes.moved_sections.push(SectionMove { from, to });
        }
    }

    let mut removed: Vec<Unmatched<'_, T>> = Vec::new();
    let mut added: Vec<Unmatched<'_, T>> = Vec::new();

    for &(old_section, new_section) in &matched_sections {
        let before = &old[old_section].items;
        let after = &new[new_section].items;
        let before_ids: Vec<ItemId> = before.iter().map(Identifiable::identity).collect();
        let after_ids: Vec<ItemId> = after.iter().map(Identifiable::identity).collect();
        let before_index = first_positions(before_ids.iter());
        let after_index = first_positions(after_ids.iter());

        if before_index.len() != before.len() || after_index.len() != after.len() {
            tracing::warn!(
                target: targets::DIFF,
                section = ?new[new_section].section,
                "duplicate identity keys in one section; duplicates are diffed as unmatched rows"
            );
        }

        for (row, id) in before_ids.iter().enumerate() {
            let first = before_index.get(id) == Some(&row);
            if !first || !after_index.contains_key(id) {
                removed.push(Unmatched {
                    path: IndexPath::new(old_section, row),
                    id: id.clone(),
                    item: &before[row],
                });
            }
        }

        let mut matched_rows: Vec<(usize, usize)> = Vec::new();
        for (row, id) in after_ids.iter().enumerate() {
            let first = after_index.get(id) == Some(&row);
            match before_index.get(id) {
                Some(&old_row) if first => matched_rows.push((old_row, row)),
                _ => added.push(Unmatched {
                    path: IndexPath::new(new_section, row),
                    id: id.clone(),
                    item: &after[row],
                }),
            }
        }

        let stable = stable_positions(&matched_rows.iter().map(|m| m.0).collect::<Vec<_>>());
        for (k, &(old_row, new_row)) in matched_rows.iter().enumerate() {
            let from = IndexPath::new(old_section, old_row);
            let to = IndexPath::new(new_section, new_row);
            let changed = before[old_row] != after[new_row];
            if stable[k] {
                if changed {
                    changes.reloaded_rows.push(RowReload { old: from, new: to });
                }
            } else {
                changes.moved_rows.push(RowMove { from, to });
                if changed {
                    changes.deferred_row_reloads.push(to);
                }
            }
        }
    }

    // Pair removals with insertions of the same identity elsewhere.
    let mut removed_by_id: HashMap<&ItemId, VecDeque<usize>> = HashMap::new();
    for (k, entry) in removed.iter().enumerate() {
        removed_by_id.entry(&entry.id).or_default().push_back(k);
    }
    let mut paired = vec![false; removed.len()];
    for entry in &added {
        let source = removed_by_id
            .get_mut(&entry.id)
            .and_then(|queue| queue.pop_front());
        match source {
            Some(k) => {
                paired[k] = true;
                let from = removed[k].path;
                changes.moved_rows.push(RowMove {
                    from,
                    to: entry.path,
                });
                if removed[k].item != entry.item {
                    changes.deferred_row_reloads.push(entry.path);
                }
            }
            None => changes.inserted_rows.push(entry.path),
        }
    }
    for (k, entry) in removed.iter().enumerate() {
        if !paired[k] {
            changes.deleted_rows.push(entry.path);
        }
    }

    changes.normalize();
    tracing::trace!(
        target: targets::DIFF,
        operations = changes.operation_count(),
        sections_before = old.len(),
        sections_after = new.len(),
        "diff computed"
    );
    changes
}

/// Maps each key to the index of its first occurrence.
fn first_positions<'a, K>(keys: impl Iterator<Item = &'a K>) -> HashMap<&'a K, usize>
where
    K: std::hash::Hash + Eq + 'a,
{
    let mut positions = HashMap::new();
    for (index, key) in keys.enumerate() {
        positions.entry(key).or_insert(index);
    }
    positions
}

/// Marks the positions of `sequence` that belong to a longest strictly
/// increasing subsequence. Those entries keep their relative order and do
/// not need to move.
fn stable_positions(sequence: &[usize]) -> Vec<bool> {
    let mut stable = vec![false; sequence.len()];
    for position in sequence.longest_increasing_subsequence() {
        stable[position] = true;
    }
    stable
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        label: &'static str,
    }

    impl Identifiable for Row {
        fn identity(&self) -> ItemId {
            ItemId::from_static(self.id)
        }
    }

    fn row(id: &'static str) -> Row {
        Row { id, label: "" }
    }

    fn section(key: char, ids: &[&'static str]) -> SectionItems<char, Row> {
        SectionItems::new(key, ids.iter().map(|id| row(id)).collect())
    }

    fn ids(sections: &[SectionItems<char, Row>]) -> Vec<(char, Vec<&'static str>)> {
        sections
            .iter()
            .map(|s| (s.section, s.items.iter().map(|r| r.id).collect()))
            .collect()
    }

    #[test]
    fn test_identical_lists_produce_nothing() {
        let old = vec![section('A', &["1", "2", "3"]), section('B', &["4"])];
        let changes = diff(&old, &old);
        assert!(changes.is_empty());
        assert_eq!(changes.operation_count(), 0);
    }

    #[test]
    fn test_swap_is_a_single_move() {
        let old = vec![section('A', &["1", "2"]), section('B', &[])];
        let new = vec![section('A', &["2", "1"]), section('B', &[])];
        let changes = diff(&old, &new);

        assert_eq!(changes.moved_rows.len(), 1);
        assert!(changes.inserted_rows.is_empty());
        assert!(changes.deleted_rows.is_empty());
        assert!(!changes.moved_rows[0].is_cross_section());
        assert_eq!(ids(&changes.apply(&old, &new)), ids(&new));
    }

    #[test]
    fn test_cross_section_move_is_paired() {
        let old = vec![section('A', &["x", "y", "k"]), section('B', &["z"])];
        let new = vec![section('A', &["x", "y"]), section('B', &["k", "z"])];
        let changes = diff(&old, &new);

        assert!(changes.deleted_rows.is_empty());
        assert!(changes.inserted_rows.is_empty());
        assert_eq!(
            changes.moved_rows,
            vec![RowMove {
                from: IndexPath::new(0, 2),
                to: IndexPath::new(1, 0),
            }]
        );
        assert!(changes.moved_rows[0].is_cross_section());
        assert_eq!(ids(&changes.apply(&old, &new)), ids(&new));
    }

    #[test]
    fn test_changed_row_in_place_is_reloaded() {
        let old = vec![section('A', &["1", "2"])];
        let mut new = old.clone();
        new[0].items[1].label = "edited";

        let changes = diff(&old, &new);
        assert_eq!(
            changes.reloaded_rows,
            vec![RowReload {
                old: IndexPath::new(0, 1),
                new: IndexPath::new(0, 1),
            }]
        );
        assert!(changes.moved_rows.is_empty());
        assert_eq!(changes.apply(&old, &new)[0].items[1].label, "edited");
    }

    #[test]
    fn test_moved_and_changed_row_is_reloaded_after_the_batch() {
        let old = vec![section('A', &["1", "2", "3"])];
        let mut new = vec![section('A', &["3", "1", "2"])];
        new[0].items[0].label = "edited";

        let changes = diff(&old, &new);
        assert_eq!(changes.moved_rows.len(), 1);
        assert_eq!(changes.moved_rows[0].from, IndexPath::new(0, 2));
        assert_eq!(changes.moved_rows[0].to, IndexPath::new(0, 0));
        assert!(changes.reloaded_rows.is_empty());
        assert_eq!(changes.deferred_row_reloads, vec![IndexPath::new(0, 0)]);

        let result = changes.apply(&old, &new);
        assert_eq!(result[0].items[0].label, "edited");
    }

    #[test]
    fn test_inserts_and_deletes_are_ordered() {
        let old = vec![section('A', &["1", "2", "3", "4"])];
        let new = vec![section('A', &["2", "5", "4", "6"])];
        let changes = diff(&old, &new);

        assert_eq!(
            changes.deleted_rows,
            vec![IndexPath::new(0, 2), IndexPath::new(0, 0)]
        );
        assert_eq!(
            changes.inserted_rows,
            vec![IndexPath::new(0, 1), IndexPath::new(0, 3)]
        );
        assert!(changes.moved_rows.is_empty());
        assert_eq!(ids(&changes.apply(&old, &new)), ids(&new));
    }

    #[test]
    fn test_section_insert_delete_and_move() {
        let old = vec![
            section('A', &["1"]),
            section('B', &["2"]),
            section('C', &["3"]),
        ];
        let new = vec![
            section('C', &["3"]),
            section('A', &["1"]),
            section('D', &["4"]),
        ];
        let changes = diff(&old, &new);

        assert_eq!(changes.deleted_sections, vec![1]);
        assert_eq!(changes.inserted_sections, vec![2]);
        assert_eq!(changes.moved_sections.len(), 1);
        assert!(changes.deleted_rows.is_empty());
        assert!(changes.inserted_rows.is_empty());
        assert_eq!(ids(&changes.apply(&old, &new)), ids(&new));
    }

    #[test]
    fn test_removed_section_is_not_row_deletes() {
        let old = vec![section('A', &["1"]), section('B', &["2"])];
        let new = vec![section('B', &["2"])];
        let changes = diff(&old, &new);

        assert_eq!(changes.deleted_sections, vec![0]);
        assert!(changes.deleted_rows.is_empty());
        assert!(changes.moved_sections.is_empty());
    }

    #[test]
    fn test_duplicate_identities_do_not_panic() {
        let old = vec![section('A', &["1", "1"])];
        let new = vec![section('A', &["1"])];
        let changes = diff(&old, &new);
        assert_eq!(changes.deleted_rows, vec![IndexPath::new(0, 1)]);
    }

    #[test]
    fn test_normalize_sorts_for_the_widget() {
        let mut changes = Changeset {
            deleted_rows: vec![IndexPath::new(0, 1), IndexPath::new(1, 0), IndexPath::new(0, 3)],
            inserted_rows: vec![IndexPath::new(1, 2), IndexPath::new(0, 0)],
            deleted_sections: vec![0, 4, 2],
            ..Default::default()
        };
        changes.normalize();
        assert_eq!(
            changes.deleted_rows,
            vec![IndexPath::new(1, 0), IndexPath::new(0, 3), IndexPath::new(0, 1)]
        );
        assert_eq!(
            changes.inserted_rows,
            vec![IndexPath::new(0, 0), IndexPath::new(1, 2)]
        );
        assert_eq!(changes.deleted_sections, vec![4, 2, 0]);
    }
}
