//! User editing: delete and insert controls, and row reordering.

use std::rc::Rc;

use braid_core::Section;

use crate::registry::RowQuery;

/// The edit control shown on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditingStyle {
    /// No control.
    #[default]
    None,
    /// A delete control.
    Delete,
    /// An insert control.
    Insert,
}

/// Where a row may be dropped when the user reorders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePolicy<S> {
    /// Any displayed section.
    ToAnySection,
    /// Only the section the row started in.
    ToSameSection,
    /// Only the listed sections.
    ToSections(Vec<S>),
}

impl<S: Section> MovePolicy<S> {
    /// Returns `true` if a row from `source` may land in `target`.
    pub fn allows(&self, source: &S, target: &S) -> bool {
        match self {
            Self::ToAnySection => true,
            Self::ToSameSection => source == target,
            Self::ToSections(sections) => sections.contains(target),
        }
    }
}

/// Why a row left or joined a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeReason<S> {
    /// The user deleted the row.
    UserInitiatedDelete,
    /// The user dragged the row to another position.
    MovedTo {
        /// Destination section.
        section: S,
        /// Destination row, after removal from the source.
        row: usize,
    },
    /// The user tapped an insert control.
    UserInitiatedInsert,
    /// The user dragged the row here from another position.
    MovedFrom {
        /// Source section.
        section: S,
        /// Source row.
        row: usize,
    },
}

impl<S> ChangeReason<S> {
    /// Returns `true` for the two halves of a user move.
    pub fn is_move(&self) -> bool {
        matches!(self, Self::MovedTo { .. } | Self::MovedFrom { .. })
    }
}

/// A registered reorder rule.
pub(crate) struct MoveRule<S> {
    pub(crate) policy: MovePolicy<S>,
    pub(crate) can_move: Option<RowQuery<S, bool>>,
}

impl<S> MoveRule<S> {
    pub(crate) fn new(policy: MovePolicy<S>, can_move: Option<RowQuery<S, bool>>) -> Rc<Self> {
        Rc::new(Self { policy, can_move })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_policy() {
        assert!(MovePolicy::ToAnySection.allows(&1, &2));
        assert!(MovePolicy::ToSameSection.allows(&1, &1));
        assert!(!MovePolicy::ToSameSection.allows(&1, &2));

        let policy = MovePolicy::ToSections(vec!["done", "archived"]);
        assert!(policy.allows(&"todo", &"done"));
        assert!(!policy.allows(&"done", &"todo"));
    }

    #[test]
    fn test_change_reason_is_move() {
        assert!(ChangeReason::MovedTo { section: 'a', row: 0 }.is_move());
        assert!(!ChangeReason::<char>::UserInitiatedDelete.is_move());
    }
}
