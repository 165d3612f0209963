//! Integration tests for #[derive(Identifiable)] and #[derive(Sections)].

use braid_core::{DeclaredSections, Identifiable, ItemId, SectionUniverse, diff, SectionItems};
use braid_macros::{Identifiable, Sections};

#[derive(Identifiable, Debug, Clone, PartialEq)]
struct Message {
    #[identity]
    id: u64,
    subject: String,
    unread: bool,
}

#[derive(Identifiable, Debug, Clone, PartialEq)]
struct Tag(String);

#[derive(Identifiable, Debug, Clone, PartialEq)]
struct Keyed<T> {
    value: T,
    #[identity]
    key: &'static str,
}

#[derive(Sections, Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Settings {
    Account,
    Privacy,
    #[sections(skip)]
    Debug,
    About,
}

#[test]
fn test_identity_from_marked_field() {
    let message = Message {
        id: 42,
        subject: "Hello".into(),
        unread: true,
    };
    assert_eq!(message.identity(), ItemId::from(42_u64));
}

#[test]
fn test_identity_ignores_other_fields() {
    let before = Message {
        id: 1,
        subject: "Draft".into(),
        unread: true,
    };
    let after = Message {
        subject: "Final".into(),
        unread: false,
        ..before.clone()
    };
    assert_eq!(before.identity(), after.identity());
    assert_ne!(before, after);
}

#[test]
fn test_newtype_needs_no_attribute() {
    assert_eq!(Tag("rust".into()).identity(), ItemId::from("rust"));
}

#[test]
fn test_generic_struct() {
    let keyed = Keyed {
        value: vec![1, 2, 3],
        key: "abc",
    };
    assert_eq!(keyed.identity().as_str(), "abc");
}

#[test]
fn test_sections_in_declaration_order() {
    assert_eq!(
        Settings::declared_sections(),
        vec![Settings::Account, Settings::Privacy, Settings::About]
    );
    let universe = SectionUniverse::<Settings>::declared();
    assert!(!universe.contains(&Settings::Debug));
}

#[test]
fn test_derived_types_diff_by_identity() {
    let first = Message {
        id: 1,
        subject: "a".into(),
        unread: true,
    };
    let second = Message {
        id: 2,
        subject: "b".into(),
        unread: true,
    };
    let read = Message {
        unread: false,
        ..first.clone()
    };

    let old = vec![SectionItems::new(Settings::Account, vec![first, second.clone()])];
    let new = vec![SectionItems::new(Settings::Account, vec![second, read])];

    let changes = diff(&old, &new);
    assert_eq!(changes.moved_rows.len(), 1);
    assert!(changes.inserted_rows.is_empty());
    assert!(changes.deleted_rows.is_empty());
    assert_eq!(changes.apply(&old, &new), new);
}
