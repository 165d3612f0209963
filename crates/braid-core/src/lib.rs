//! Core types for Braid.
//!
//! This crate holds the widget-independent half of Braid:
//!
//! - **Sections**: opaque keys for groups of rows, either declared up front
//!   or discovered from content
//! - **Scopes**: which sections a binding applies to (named, all others, any)
//!   and the Named > Dynamic > Any resolution rule
//! - **Identity**: stable row keys that let the diff engine tell a move from a
//!   delete and insert
//! - **Diff engine**: turns two generations of sectioned rows into a minimal
//!   batch of widget operations
//!
//! # Diff Example
//!
//! ```
//! use braid_core::{diff, IndexPath, SectionItems};
//!
//! let old = vec![SectionItems::new("inbox", vec!["a", "b", "c"])];
//! let new = vec![SectionItems::new("inbox", vec!["c", "a", "b", "d"])];
//!
//! let changes = diff(&old, &new);
//! assert_eq!(changes.moved_rows.len(), 1);
//! assert_eq!(changes.inserted_rows, vec![IndexPath::new(0, 3)]);
//!
//! let displayed = changes.apply(&old, &new);
//! assert_eq!(displayed, new);
//! ```

extern crate self as braid_core;

pub mod diff;
mod error;
mod identity;
mod index;
pub mod logging;
mod scope;
mod section;
pub mod thread_check;

pub use diff::{Changeset, RowMove, RowReload, SectionItems, SectionMove, diff};
pub use error::{BindingError, Result, fatal};
pub use identity::{Identifiable, ItemId};
pub use index::IndexPath;
pub use logging::PerfSpan;
pub use scope::{BindingCategory, Scope, ScopeKind, ScopeRequest, UniqueBindings};
pub use section::{DeclaredSections, Section, SectionUniverse};
pub use thread_check::ThreadAffinity;

#[doc(hidden)]
pub use tracing;
