//! Binding scopes.
//!
//! Every configuration call applies to a scope:
//!
//! - **Named**: an explicit, ordered list of sections.
//! - **Dynamic**: every section not named anywhere else ("all other
//!   sections").
//! - **Any**: a wildcard fallback for every section.
//!
//! Lookups resolve Named before Dynamic before Any. Naming a section marks
//! it as *uniquely bound* for that binding category, which removes it from
//! every Dynamic sweep of the same category. Cells, headers and footers are
//! tracked separately, so a section with its own header can still take its
//! cells from an "all other sections" binding.

use std::collections::{HashMap, HashSet};

use crate::error::BindingError;
use crate::section::{Section, SectionUniverse};

/// What a call site asked for, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeRequest<S> {
    /// Explicit sections.
    Sections(Vec<S>),
    /// Every section not explicitly named elsewhere.
    AllOthers,
    /// Every section.
    Any,
}

/// A validated binding scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope<S> {
    /// Explicit, non-empty, order-preserving, duplicate-free sections.
    Named(Vec<S>),
    /// Sections not uniquely bound elsewhere.
    Dynamic,
    /// Wildcard fallback.
    Any,
}

/// The kind of a scope, without its sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKind {
    /// Explicit sections.
    Named,
    /// All other sections.
    Dynamic,
    /// Any section.
    Any,
}

impl<S: Section> Scope<S> {
    /// Classifies and validates a request against a section universe.
    ///
    /// Named sections are deduplicated keeping their first position.
    pub fn resolve(
        request: ScopeRequest<S>,
        universe: &SectionUniverse<S>,
    ) -> Result<Self, BindingError> {
        match request {
            ScopeRequest::Sections(sections) => {
                if sections.is_empty() {
                    return Err(BindingError::EmptySectionList);
                }
                let mut named: Vec<S> = Vec::with_capacity(sections.len());
                for section in sections {
                    universe.validate(&section)?;
                    if !named.contains(&section) {
                        named.push(section);
                    }
                }
                Ok(Self::Named(named))
            }
            ScopeRequest::AllOthers => Ok(Self::Dynamic),
            ScopeRequest::Any => Ok(Self::Any),
        }
    }

    /// The kind of this scope.
    pub fn kind(&self) -> ScopeKind {
        match self {
            Self::Named(_) => ScopeKind::Named,
            Self::Dynamic => ScopeKind::Dynamic,
            Self::Any => ScopeKind::Any,
        }
    }

    /// The named sections; empty for Dynamic and Any.
    pub fn sections(&self) -> &[S] {
        match self {
            Self::Named(sections) => sections,
            Self::Dynamic | Self::Any => &[],
        }
    }

    /// The single named section, if this scope names exactly one.
    pub fn single_section(&self) -> Option<&S> {
        match self {
            Self::Named(sections) if sections.len() == 1 => sections.first(),
            _ => None,
        }
    }

    /// Returns `true` if this scope covers `section`.
    ///
    /// `uniquely_bound` says whether the section is named elsewhere for the
    /// category in question; it only matters for Dynamic scopes.
    pub fn covers(&self, section: &S, uniquely_bound: bool) -> bool {
        match self {
            Self::Named(sections) => sections.contains(section),
            Self::Dynamic => !uniquely_bound,
            Self::Any => true,
        }
    }
}

/// The independent families of bindings tracked for uniqueness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BindingCategory {
    /// Cell types, row content and every per-row handler.
    Cells,
    /// Header views, titles and heights.
    Headers,
    /// Footer views, titles and heights.
    Footers,
}

impl BindingCategory {
    /// All categories.
    pub const ALL: [BindingCategory; 3] = [Self::Cells, Self::Headers, Self::Footers];
}

/// Tracks which sections were explicitly named, per category.
#[derive(Debug, Clone)]
pub struct UniqueBindings<S> {
    named: HashMap<BindingCategory, HashSet<S>>,
}

impl<S> Default for UniqueBindings<S> {
    fn default() -> Self {
        Self {
            named: HashMap::new(),
        }
    }
}

impl<S: Section> UniqueBindings<S> {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a registration. Only Named scopes mark sections.
    pub fn record(&mut self, scope: &Scope<S>, category: BindingCategory) {
        if let Scope::Named(sections) = scope {
            self.named
                .entry(category)
                .or_default()
                .extend(sections.iter().cloned());
        }
    }

    /// Returns `true` if the section was named for this category.
    pub fn is_unique(&self, section: &S, category: BindingCategory) -> bool {
        self.named
            .get(&category)
            .is_some_and(|sections| sections.contains(section))
    }

    /// Returns `true` if `scope` applies to `section` for this category.
    pub fn scope_covers(&self, scope: &Scope<S>, section: &S, category: BindingCategory) -> bool {
        scope.covers(section, self.is_unique(section, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_named_dedups_in_order() {
        let universe = SectionUniverse::fixed(["a", "b", "c"]);
        let scope =
            Scope::resolve(ScopeRequest::Sections(vec!["c", "a", "c"]), &universe).unwrap();
        assert_eq!(scope, Scope::Named(vec!["c", "a"]));
        assert_eq!(scope.kind(), ScopeKind::Named);
        assert_eq!(scope.single_section(), None);
    }

    #[test]
    fn test_resolve_rejects_empty_and_undeclared() {
        let universe = SectionUniverse::fixed(["a"]);
        assert_eq!(
            Scope::resolve(ScopeRequest::Sections(vec![]), &universe),
            Err(BindingError::EmptySectionList)
        );
        assert!(matches!(
            Scope::resolve(ScopeRequest::Sections(vec!["z"]), &universe),
            Err(BindingError::UndeclaredSection { .. })
        ));
    }

    #[test]
    fn test_resolve_wildcards() {
        let universe = SectionUniverse::<u8>::Dynamic;
        assert_eq!(
            Scope::resolve(ScopeRequest::AllOthers, &universe),
            Ok(Scope::Dynamic)
        );
        assert_eq!(Scope::resolve(ScopeRequest::Any, &universe), Ok(Scope::Any));
    }

    #[test]
    fn test_dynamic_scope_skips_uniquely_bound() {
        let mut unique = UniqueBindings::new();
        unique.record(&Scope::Named(vec![1]), BindingCategory::Cells);

        assert!(!unique.scope_covers(&Scope::Dynamic, &1, BindingCategory::Cells));
        assert!(unique.scope_covers(&Scope::Dynamic, &2, BindingCategory::Cells));
        assert!(unique.scope_covers(&Scope::Any, &1, BindingCategory::Cells));
    }

    #[test]
    fn test_categories_are_independent() {
        let mut unique = UniqueBindings::new();
        unique.record(&Scope::Named(vec!["header-only"]), BindingCategory::Headers);

        assert!(unique.is_unique(&"header-only", BindingCategory::Headers));
        assert!(!unique.is_unique(&"header-only", BindingCategory::Cells));
        assert!(unique.scope_covers(&Scope::Dynamic, &"header-only", BindingCategory::Cells));
    }

    #[test]
    fn test_wildcard_scopes_do_not_mark() {
        let mut unique = UniqueBindings::new();
        unique.record(&Scope::Dynamic, BindingCategory::Cells);
        unique.record(&Scope::Any, BindingCategory::Cells);
        assert!(!unique.is_unique(&0_u8, BindingCategory::Cells));
    }
}
