//! Error types for Braid.
//!
//! Almost every error in this crate family is a configuration mistake made by
//! the integrating developer: binding a section that was never declared,
//! registering a header type twice, asking a row for a model type it was
//! never bound with. Those are reported through [`fatal`], which logs the
//! error and stops. The [`Result`] alias exists for the handful of query
//! APIs that let callers check without panicking.

use thiserror::Error;

/// Errors raised while configuring or querying a binder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A section outside the binder's declared universe was referenced.
    #[error("section {section} is not one of the binder's declared sections")]
    UndeclaredSection {
        /// Debug rendering of the offending section.
        section: String,
    },

    /// A named scope was requested with an empty section list.
    #[error("a named binding scope needs at least one section")]
    EmptySectionList,

    /// Something that may only be bound once per section was bound again.
    #[error("{what} is already bound for section {section}")]
    AlreadyBound {
        /// What was bound twice (e.g. "header view").
        what: &'static str,
        /// Debug rendering of the section.
        section: String,
    },

    /// A row or section the binder claims to own has no content.
    #[error("section {section} has no {what} for row {row}")]
    MissingContent {
        /// What was missing (e.g. "model").
        what: &'static str,
        /// Debug rendering of the section.
        section: String,
        /// The row that was queried.
        row: usize,
    },

    /// The widget asked for a cell in a section with no cell binding.
    #[error("no cell type is bound for section {section}")]
    NoCellBinding {
        /// Debug rendering of the section.
        section: String,
    },

    /// Content was pushed to a section with nothing bound to receive it.
    #[error("no {what} is bound for section {section}")]
    NotBound {
        /// What is missing (e.g. "model type").
        what: &'static str,
        /// Debug rendering of the section.
        section: String,
    },

    /// A section the binder displays lacks content its bindings require.
    #[error("section {section} has no {what}")]
    MissingSectionContent {
        /// What was missing (e.g. "header view model").
        what: &'static str,
        /// Debug rendering of the section.
        section: String,
    },

    /// A stored value could not be downcast to the type a handler expects.
    #[error("expected {expected} but found {found} ({context})")]
    TypeMismatch {
        /// The type the handler was registered with.
        expected: &'static str,
        /// The type actually stored.
        found: &'static str,
        /// Where the mismatch happened.
        context: &'static str,
    },

    /// Single-section content was given to a scope spanning other sections.
    #[error("content for a single section was given to a scope covering {scope}")]
    AmbiguousContent {
        /// Debug rendering of the scope.
        scope: String,
    },

    /// A section index is outside the displayed sections.
    #[error("section index {index} is out of range ({count} sections displayed)")]
    SectionOutOfRange {
        /// The requested index.
        index: usize,
        /// How many sections are displayed.
        count: usize,
    },

    /// A binder was called from a thread other than the one that owns it.
    #[error("{owner} was called from thread {current}, but belongs to thread {expected}")]
    WrongThread {
        /// What was called, such as "binder".
        owner: &'static str,
        /// Debug rendering of the owning thread.
        expected: String,
        /// Name or id of the calling thread.
        current: String,
    },
}

impl BindingError {
    /// Builds a [`BindingError::UndeclaredSection`] from any debuggable section.
    pub fn undeclared(section: &impl std::fmt::Debug) -> Self {
        Self::UndeclaredSection {
            section: format!("{section:?}"),
        }
    }

    /// Builds a [`BindingError::MissingContent`] for a row.
    pub fn missing(what: &'static str, section: &impl std::fmt::Debug, row: usize) -> Self {
        Self::MissingContent {
            what,
            section: format!("{section:?}"),
            row,
        }
    }

    /// Builds a [`BindingError::NotBound`] for a section.
    pub fn not_bound(what: &'static str, section: &impl std::fmt::Debug) -> Self {
        Self::NotBound {
            what,
            section: format!("{section:?}"),
        }
    }

    /// Returns `true` for errors caused by a stored value of the wrong type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// A specialized Result type for Braid operations.
pub type Result<T> = std::result::Result<T, BindingError>;

/// Reports a configuration or type-mismatch error and stops.
///
/// These errors indicate a bug in how the binder was set up, not a runtime
/// condition, so there is nothing to recover.
#[cold]
#[inline(never)]
#[track_caller]
pub fn fatal(err: BindingError) -> ! {
    crate::braid_error!(error = %err, "fatal binding error");
    panic!("braid: {err}")
}
