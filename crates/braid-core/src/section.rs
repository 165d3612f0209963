//! Section identity and the section universe.
//!
//! A section is an opaque, hashable key for a logical group of rows. Binders
//! work with two kinds of section sets:
//!
//! - **Fixed**: a closed set declared up front (usually a fieldless enum).
//!   Declaration order is the default display order, and binding a section
//!   outside the set is a programming error.
//! - **Dynamic**: sections are discovered from the content handed to the
//!   binder at runtime (for example, one section per date bucket).

use std::fmt;
use std::hash::Hash;

use crate::error::{BindingError, fatal};

/// A key identifying one logical section.
///
/// Implemented automatically for every cloneable, hashable, debuggable type.
pub trait Section: Clone + Eq + Hash + fmt::Debug + 'static {}

impl<T> Section for T where T: Clone + Eq + Hash + fmt::Debug + 'static {}

/// A section type whose full set of values is known at compile time.
///
/// Usually derived with `#[derive(Sections)]` on a fieldless enum, which
/// lists the variants in declaration order.
pub trait DeclaredSections: Section {
    /// All sections, in display order.
    fn declared_sections() -> Vec<Self>;
}

/// The set of sections a binder may reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionUniverse<S> {
    /// A closed set, in declaration order.
    Fixed(Vec<S>),
    /// Sections are discovered from content.
    Dynamic,
}

impl<S: Section> SectionUniverse<S> {
    /// A fixed universe, deduplicated, keeping first occurrences in order.
    pub fn fixed(sections: impl IntoIterator<Item = S>) -> Self {
        let mut declared: Vec<S> = Vec::new();
        for section in sections {
            if !declared.contains(&section) {
                declared.push(section);
            }
        }
        Self::Fixed(declared)
    }

    /// The universe of a [`DeclaredSections`] type.
    pub fn declared() -> Self
    where
        S: DeclaredSections,
    {
        Self::fixed(S::declared_sections())
    }

    /// Returns `true` if the section may be referenced.
    pub fn contains(&self, section: &S) -> bool {
        match self {
            Self::Fixed(sections) => sections.contains(section),
            Self::Dynamic => true,
        }
    }

    /// Returns `true` for a dynamic universe.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// The declared sections; empty for a dynamic universe.
    pub fn sections(&self) -> &[S] {
        match self {
            Self::Fixed(sections) => sections,
            Self::Dynamic => &[],
        }
    }

    /// Position of a section in declaration order.
    pub fn position(&self, section: &S) -> Option<usize> {
        self.sections().iter().position(|s| s == section)
    }

    /// Checks that a section belongs to this universe.
    pub fn validate(&self, section: &S) -> Result<(), BindingError> {
        if self.contains(section) {
            Ok(())
        } else {
            Err(BindingError::undeclared(section))
        }
    }

    /// Like [`validate`](Self::validate) but stops on failure.
    ///
    /// Referencing an undeclared section is a coding mistake, not runtime
    /// data, so there is no error to hand back.
    #[track_caller]
    pub fn require(&self, section: &S) {
        if let Err(err) = self.validate(section) {
            fatal(err);
        }
    }
}
