//! Property tests for the diff engine.

use std::collections::HashSet;

use braid_core::{Identifiable, ItemId, SectionItems, diff};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: u32,
    version: u8,
}

impl Identifiable for Item {
    fn identity(&self) -> ItemId {
        ItemId::from(self.id)
    }
}

type Snapshot = Vec<SectionItems<u8, Item>>;

const SECTIONS: usize = 4;
const ITEMS: usize = 16;

/// Random sectioned lists with globally unique item ids, so rows can move
/// between sections.
fn snapshot() -> impl Strategy<Value = Snapshot> {
    (
        proptest::collection::vec((any::<bool>(), any::<u16>()), SECTIONS),
        proptest::collection::vec(
            (0..SECTIONS as u8, any::<bool>(), any::<u16>(), 0..3_u8),
            ITEMS,
        ),
    )
        .prop_map(|(sections, items)| {
            let mut keys: Vec<(u16, u8)> = sections
                .iter()
                .enumerate()
                .filter(|(_, (present, _))| *present)
                .map(|(key, (_, order))| (*order, key as u8))
                .collect();
            keys.sort();

            keys.into_iter()
                .map(|(_, key)| {
                    let mut rows: Vec<(u16, Item)> = items
                        .iter()
                        .enumerate()
                        .filter(|(_, (section, present, _, _))| *present && *section == key)
                        .map(|(id, (_, _, order, version))| {
                            (
                                *order,
                                Item {
                                    id: id as u32,
                                    version: *version,
                                },
                            )
                        })
                        .collect();
                    rows.sort_by_key(|(order, item)| (*order, item.id));
                    SectionItems::new(key, rows.into_iter().map(|(_, item)| item).collect())
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn diff_against_itself_is_empty(list in snapshot()) {
        let changes = diff(&list, &list);
        prop_assert!(changes.is_empty());
    }

    #[test]
    fn applying_the_diff_reproduces_the_new_list(old in snapshot(), new in snapshot()) {
        let changes = diff(&old, &new);
        prop_assert_eq!(changes.apply(&old, &new), new);
    }

    #[test]
    fn deletions_descend_and_insertions_ascend(old in snapshot(), new in snapshot()) {
        let changes = diff(&old, &new);
        prop_assert!(changes.deleted_rows.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(changes.inserted_rows.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(changes.deleted_sections.windows(2).all(|w| w[0] > w[1]));
        prop_assert!(changes.inserted_sections.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rows_of_added_or_removed_sections_are_not_listed(old in snapshot(), new in snapshot()) {
        let changes = diff(&old, &new);
        let deleted: HashSet<usize> = changes.deleted_sections.iter().copied().collect();
        let inserted: HashSet<usize> = changes.inserted_sections.iter().copied().collect();

        for path in &changes.deleted_rows {
            prop_assert!(!deleted.contains(&path.section()));
        }
        for path in &changes.inserted_rows {
            prop_assert!(!inserted.contains(&path.section()));
        }
        for row_move in &changes.moved_rows {
            prop_assert!(!deleted.contains(&row_move.from.section()));
            prop_assert!(!inserted.contains(&row_move.to.section()));
        }
    }

    #[test]
    fn each_row_is_touched_at_most_once(old in snapshot(), new in snapshot()) {
        let changes = diff(&old, &new);
        let mut sources = HashSet::new();
        for path in changes
            .deleted_rows
            .iter()
            .chain(changes.moved_rows.iter().map(|m| &m.from))
            .chain(changes.reloaded_rows.iter().map(|r| &r.old))
        {
            prop_assert!(sources.insert(*path), "old row {} listed twice", path);
        }
        let mut targets = HashSet::new();
        for path in changes
            .inserted_rows
            .iter()
            .chain(changes.moved_rows.iter().map(|m| &m.to))
        {
            prop_assert!(targets.insert(*path), "new row {} listed twice", path);
        }
    }
}
