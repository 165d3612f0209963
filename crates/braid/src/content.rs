//! Where section content comes from.
//!
//! Every content-taking builder call accepts a [`ContentSource`], one tagged
//! parameter in place of separate entry points for static values, providers
//! and externally pushed updates. Plain values convert into it:
//!
//! ```
//! use std::collections::HashMap;
//! use braid::content::ContentSource;
//!
//! let single: ContentSource<&str, Vec<u32>> = vec![1, 2, 3].into();
//! let per_section: ContentSource<&str, Vec<u32>> =
//!     HashMap::from([("a", vec![1]), ("b", vec![2])]).into();
//! let provider = ContentSource::<&str, Vec<u32>>::provider(|| vec![4, 5]);
//! # let _ = (single, per_section, provider);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use braid_core::{
    BindingCategory, BindingError, Scope, ScopeKind, Section, SectionUniverse, UniqueBindings,
    fatal,
};

use crate::binder::DataModel;

/// Content for the sections of a binding scope.
pub enum ContentSource<S, V> {
    /// One value, for a scope naming a single section.
    Value(V),
    /// One value per section.
    PerSection(HashMap<S, V>),
    /// Called at setup and on every refresh, for a scope naming a single
    /// section.
    Provider(Rc<dyn Fn() -> V>),
    /// Called at setup and on every refresh, one value per section.
    SectionedProvider(Rc<dyn Fn() -> HashMap<S, V>>),
    /// Nothing now; content arrives later through the binder's update calls.
    External,
}

impl<S, V> ContentSource<S, V> {
    /// A provider for a single section.
    pub fn provider(provider: impl Fn() -> V + 'static) -> Self {
        Self::Provider(Rc::new(provider))
    }

    /// A provider returning content per section.
    pub fn sectioned_provider(provider: impl Fn() -> HashMap<S, V> + 'static) -> Self {
        Self::SectionedProvider(Rc::new(provider))
    }

    /// Returns `true` for the provider variants.
    pub fn is_refreshable(&self) -> bool {
        matches!(self, Self::Provider(_) | Self::SectionedProvider(_))
    }

    fn needs_single_section(&self) -> bool {
        matches!(self, Self::Value(_) | Self::Provider(_))
    }
}

impl<S, V> fmt::Debug for ContentSource<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Value(_) => "Value",
            Self::PerSection(_) => "PerSection",
            Self::Provider(_) => "Provider",
            Self::SectionedProvider(_) => "SectionedProvider",
            Self::External => "External",
        };
        f.write_str(kind)
    }
}

impl<S, T> From<Vec<T>> for ContentSource<S, Vec<T>> {
    fn from(value: Vec<T>) -> Self {
        Self::Value(value)
    }
}

impl<S, V> From<HashMap<S, V>> for ContentSource<S, V> {
    fn from(value: HashMap<S, V>) -> Self {
        Self::PerSection(value)
    }
}

impl<S> From<String> for ContentSource<S, String> {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl<S> From<&str> for ContentSource<S, String> {
    fn from(value: &str) -> Self {
        Self::Value(value.to_owned())
    }
}

impl<S> From<usize> for ContentSource<S, usize> {
    fn from(value: usize) -> Self {
        Self::Value(value)
    }
}

/// Produces `(section, value)` pairs; static sources yield once.
type Fetch<S, V> = Box<dyn Fn() -> Vec<(S, V)>>;

impl<S: Section, V: 'static> ContentSource<S, V> {
    /// Turns the source into a fetch function for a scope.
    ///
    /// Single-section sources bound to any other scope are a configuration
    /// error. External sources fetch nothing.
    fn into_fetch(self, scope: &Scope<S>) -> Option<Fetch<S, V>> {
        if self.needs_single_section() && scope.single_section().is_none() {
            fatal(BindingError::AmbiguousContent {
                scope: format!("{scope:?}"),
            });
        }
        let target = scope.single_section().cloned();

        match self {
            Self::Value(value) => {
                let slot = RefCell::new(Some(value));
                Some(Box::new(move || {
                    match (target.clone(), slot.borrow_mut().take()) {
                        (Some(section), Some(value)) => vec![(section, value)],
                        _ => Vec::new(),
                    }
                }))
            }
            Self::PerSection(values) => {
                let slot = RefCell::new(Some(values));
                Some(Box::new(move || {
                    slot.borrow_mut()
                        .take()
                        .map(|values| values.into_iter().collect())
                        .unwrap_or_default()
                }))
            }
            Self::Provider(provider) => Some(Box::new(move || match &target {
                Some(section) => vec![(section.clone(), provider())],
                None => Vec::new(),
            })),
            Self::SectionedProvider(provider) => {
                Some(Box::new(move || provider().into_iter().collect()))
            }
            Self::External => None,
        }
    }
}

/// Which scopes declared content for each category, external sources
/// included.
///
/// Content for a section comes only from the highest-precedence scope that
/// declared content for it, so a wildcard source never overwrites rows or
/// titles owned by a Named or Dynamic chain.
#[derive(Debug, Clone)]
pub(crate) struct ContentClaims<S> {
    named: HashMap<BindingCategory, HashSet<S>>,
    dynamic: HashSet<BindingCategory>,
}

impl<S> Default for ContentClaims<S> {
    fn default() -> Self {
        Self {
            named: HashMap::new(),
            dynamic: HashSet::new(),
        }
    }
}

impl<S: Section> ContentClaims<S> {
    pub(crate) fn record(&mut self, scope: &Scope<S>, category: BindingCategory) {
        match scope {
            Scope::Named(sections) => self
                .named
                .entry(category)
                .or_default()
                .extend(sections.iter().cloned()),
            Scope::Dynamic => {
                self.dynamic.insert(category);
            }
            Scope::Any => {}
        }
    }

    /// The scope kind whose content wins for `section`.
    fn owner(
        &self,
        section: &S,
        category: BindingCategory,
        unique: &UniqueBindings<S>,
    ) -> ScopeKind {
        if self
            .named
            .get(&category)
            .is_some_and(|sections| sections.contains(section))
        {
            ScopeKind::Named
        } else if self.dynamic.contains(&category)
            && unique.scope_covers(&Scope::Dynamic, section, category)
        {
            ScopeKind::Dynamic
        } else {
            ScopeKind::Any
        }
    }
}

/// Which sections a load may write to.
pub(crate) struct LoadFilter<'a, S> {
    pub(crate) universe: &'a SectionUniverse<S>,
    pub(crate) unique: &'a UniqueBindings<S>,
    pub(crate) claims: &'a ContentClaims<S>,
    /// Restricts a refresh to these sections.
    pub(crate) only: Option<&'a [S]>,
}

impl<S: Section> LoadFilter<'_, S> {
    fn accepts(&self, scope: &Scope<S>, category: BindingCategory, section: &S) -> bool {
        self.universe.require(section);
        if self.only.is_some_and(|only| !only.contains(section)) {
            return false;
        }
        self.unique.scope_covers(scope, section, category)
            && self.claims.owner(section, category, self.unique) == scope.kind()
    }
}

/// Loads one typed source into the data model.
trait Load<S> {
    fn load(&self, model: &mut DataModel<S>, filter: &LoadFilter<'_, S>) -> usize;
}

struct TypedLoad<S, V, F> {
    scope: Scope<S>,
    category: BindingCategory,
    fetch: Fetch<S, V>,
    store: F,
}

impl<S, V, F> Load<S> for TypedLoad<S, V, F>
where
    S: Section,
    F: Fn(&mut DataModel<S>, S, V),
{
    fn load(&self, model: &mut DataModel<S>, filter: &LoadFilter<'_, S>) -> usize {
        let mut stored = 0;
        for (section, value) in (self.fetch)() {
            if filter.accepts(&self.scope, self.category, &section) {
                (self.store)(model, section, value);
                stored += 1;
            }
        }
        stored
    }
}

/// A registered content source, kept for setup and refresh.
pub(crate) struct ContentLoader<S> {
    scope: Scope<S>,
    category: BindingCategory,
    refreshable: bool,
    load: Box<dyn Load<S>>,
}

impl<S: Section> ContentLoader<S> {
    /// Wraps a source with the function that stores one value into the data
    /// model. Returns `None` for external sources.
    pub(crate) fn new<V: 'static>(
        source: ContentSource<S, V>,
        scope: &Scope<S>,
        category: BindingCategory,
        store: impl Fn(&mut DataModel<S>, S, V) + 'static,
    ) -> Option<Self> {
        let refreshable = source.is_refreshable();
        let fetch = source.into_fetch(scope)?;
        Some(Self {
            scope: scope.clone(),
            category,
            refreshable,
            load: Box::new(TypedLoad {
                scope: scope.clone(),
                category,
                fetch,
                store,
            }),
        })
    }

    /// Runs the loader. Returns how many sections were written.
    pub(crate) fn load(&self, model: &mut DataModel<S>, filter: &LoadFilter<'_, S>) -> usize {
        self.load.load(model, filter)
    }

    /// Returns `true` if loading again can produce new content.
    pub(crate) fn is_refreshable(&self) -> bool {
        self.refreshable
    }

    /// Returns `true` if the loader may write to any of `sections`.
    pub(crate) fn may_cover(&self, sections: &[S], unique: &UniqueBindings<S>) -> bool {
        sections
            .iter()
            .any(|section| unique.scope_covers(&self.scope, section, self.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let source: ContentSource<u8, Vec<u8>> = vec![1].into();
        assert!(matches!(source, ContentSource::Value(_)));
        let source: ContentSource<u8, String> = "title".into();
        assert!(matches!(source, ContentSource::Value(ref title) if title == "title"));
        let source: ContentSource<u8, usize> = 3_usize.into();
        assert!(!source.is_refreshable());
        assert!(ContentSource::<u8, usize>::provider(|| 1).is_refreshable());
    }

    #[test]
    fn test_static_value_yields_once() {
        let fetch = ContentSource::<u8, usize>::Value(4)
            .into_fetch(&Scope::Named(vec![1]))
            .unwrap();
        assert_eq!(fetch(), vec![(1, 4)]);
        assert!(fetch().is_empty());
    }

    #[test]
    fn test_provider_yields_every_time() {
        let fetch = ContentSource::<u8, usize>::provider(|| 7)
            .into_fetch(&Scope::Named(vec![2]))
            .unwrap();
        assert_eq!(fetch(), vec![(2, 7)]);
        assert_eq!(fetch(), vec![(2, 7)]);
    }

    #[test]
    fn test_external_fetches_nothing() {
        assert!(
            ContentSource::<u8, usize>::External
                .into_fetch(&Scope::Dynamic)
                .is_none()
        );
    }

    #[test]
    fn test_claims_rank_named_over_dynamic_over_any() {
        let mut unique = UniqueBindings::new();
        unique.record(&Scope::Named(vec![1]), BindingCategory::Cells);
        let mut claims = ContentClaims::default();
        claims.record(&Scope::Named(vec![1]), BindingCategory::Cells);
        claims.record(&Scope::Any, BindingCategory::Cells);

        let cells = BindingCategory::Cells;
        assert_eq!(claims.owner(&1, cells, &unique), ScopeKind::Named);
        assert_eq!(claims.owner(&2, cells, &unique), ScopeKind::Any);

        claims.record(&Scope::Dynamic, cells);
        assert_eq!(claims.owner(&1, cells, &unique), ScopeKind::Named);
        assert_eq!(claims.owner(&2, cells, &unique), ScopeKind::Dynamic);
        assert_eq!(
            claims.owner(&2, BindingCategory::Headers, &unique),
            ScopeKind::Any
        );
    }

    #[test]
    fn test_any_scope_load_skips_claimed_sections() {
        let universe = SectionUniverse::fixed([1_u8, 2]);
        let mut unique = UniqueBindings::new();
        unique.record(&Scope::Named(vec![1]), BindingCategory::Headers);
        let mut claims = ContentClaims::default();
        claims.record(&Scope::Named(vec![1]), BindingCategory::Headers);
        claims.record(&Scope::Any, BindingCategory::Headers);
        let filter = LoadFilter {
            universe: &universe,
            unique: &unique,
            claims: &claims,
            only: None,
        };

        assert!(!filter.accepts(&Scope::Any, BindingCategory::Headers, &1));
        assert!(filter.accepts(&Scope::Any, BindingCategory::Headers, &2));
        assert!(filter.accepts(&Scope::Named(vec![1]), BindingCategory::Headers, &1));
        assert!(filter.accepts(&Scope::Any, BindingCategory::Footers, &1));
    }

    #[test]
    #[should_panic(expected = "content for a single section")]
    fn test_single_value_for_many_sections_is_fatal() {
        let _ = ContentSource::<u8, usize>::Value(1).into_fetch(&Scope::Named(vec![1, 2]));
    }
}
