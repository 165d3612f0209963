//! Braid - declarative, diff-driven data binding for sectioned tables.
//!
//! Instead of implementing a table's data source by hand, describe per
//! section which cell type shows which content and what happens when rows
//! are tapped, edited or resized. Braid keeps the table in step with every
//! content update by diffing it against what is displayed and issuing the
//! minimal batch of inserts, deletes, moves and reloads.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use braid::prelude::*;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sections)]
//! enum Mailbox {
//!     Pinned,
//!     Inbox,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Identifiable)]
//! struct Message {
//!     #[identity]
//!     id: u64,
//!     subject: String,
//! }
//!
//! #[derive(Default)]
//! struct MessageCell {
//!     subject: String,
//! }
//! impl TableCell for MessageCell {}
//!
//! let inbox = vec![
//!     Message { id: 1, subject: "Hello".into() },
//!     Message { id: 2, subject: "Lunch?".into() },
//! ];
//!
//! let mut setup = BinderSetup::<Mailbox>::declared()
//!     .with_config(BinderConfig::new().with_section_display_behavior(
//!         SectionDisplayBehavior::HidesSectionsWithNoCellData,
//!     ));
//! setup
//!     .on_sections([Mailbox::Pinned, Mailbox::Inbox])
//!     .bind_cell::<MessageCell>()
//!     .models(HashMap::from([(Mailbox::Inbox, inbox)]))
//!     .on_dequeue(|_, _, cell, message| cell.subject = message.subject.clone());
//!
//! let mut binder = setup.finish(RecordingTable::new());
//! assert_eq!(binder.displayed_sections(), &[Mailbox::Inbox]);
//!
//! binder.update_cell_models(
//!     Mailbox::Pinned,
//!     vec![Message { id: 2, subject: "Lunch?".into() }],
//! );
//! assert_eq!(binder.displayed_sections(), &[Mailbox::Pinned, Mailbox::Inbox]);
//! assert_eq!(
//!     binder.model_at::<Message>(IndexPath::new(0, 0)).map(|m| m.id),
//!     Some(2)
//! );
//! ```

mod binder;
pub mod binding;
pub mod cell;
pub mod config;
pub mod content;
pub mod dimensions;
pub mod editing;
pub mod item;
pub mod prelude;
mod reconcile;
pub mod recording;
mod registry;
pub mod table;

pub use binder::{BinderSetup, TableBinder};
pub use braid_core::{
    BindingError, Changeset, DeclaredSections, Identifiable, IndexPath, ItemId, Result, RowMove,
    RowReload, Scope, ScopeKind, Section, SectionMove, SectionUniverse, diff, logging,
};
pub use braid_macros::{Identifiable, Sections};
