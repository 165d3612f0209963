//! Binder configuration.

use std::cmp::Ordering;
use std::rc::Rc;

use braid_core::{
    DeclaredSections, Scope, ScopeRequest, Section, SectionUniverse, ThreadAffinity, braid_debug,
    fatal,
};

use super::{DataModel, SectionOrder, TableBinder};
use crate::binding::Binding;
use crate::config::BinderConfig;
use crate::content::{ContentClaims, ContentLoader, LoadFilter};
use crate::registry::RegistryBuilder;
use crate::table::TableHost;

/// Collects bindings, then becomes a [`TableBinder`] with
/// [`finish`](Self::finish).
///
/// Every `on_*` call resolves a scope and returns a [`Binding`] chain for
/// it. Registrations are final as soon as they are made; content given to
/// the chains is loaded once, at `finish`, when it is known which sections
/// were named by other chains.
pub struct BinderSetup<S: Section> {
    pub(crate) universe: SectionUniverse<S>,
    pub(crate) registry: RegistryBuilder<S>,
    pub(crate) loaders: Vec<ContentLoader<S>>,
    pub(crate) claims: ContentClaims<S>,
    config: BinderConfig,
    section_order: Option<SectionOrder<S>>,
    affinity: ThreadAffinity,
}

impl<S: Section> BinderSetup<S> {
    /// Starts configuring a binder over `universe`.
    pub fn new(universe: SectionUniverse<S>) -> Self {
        Self {
            universe,
            registry: RegistryBuilder::new(),
            loaders: Vec::new(),
            claims: ContentClaims::default(),
            config: BinderConfig::default(),
            section_order: None,
            affinity: ThreadAffinity::current("binder"),
        }
    }

    /// A binder over every declared section of `S`.
    pub fn declared() -> Self
    where
        S: DeclaredSections,
    {
        Self::new(SectionUniverse::declared())
    }

    /// A binder whose sections are discovered from content.
    pub fn dynamic() -> Self {
        Self::new(SectionUniverse::Dynamic)
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.config = config;
        self
    }

    /// Orders displayed sections with `order` instead of declaration or
    /// discovery order.
    pub fn with_section_order(mut self, order: impl Fn(&S, &S) -> Ordering + 'static) -> Self {
        self.section_order = Some(Rc::new(order));
        self
    }

    /// The configuration.
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// The sections the binder may reference.
    pub fn universe(&self) -> &SectionUniverse<S> {
        &self.universe
    }

    /// Configures one section.
    ///
    /// # Panics
    ///
    /// Panics if `section` is not part of the universe.
    pub fn on_section(&mut self, section: S) -> Binding<'_, S> {
        self.on_sections([section])
    }

    /// Configures several sections with one chain.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty or names a section outside the universe.
    pub fn on_sections(&mut self, sections: impl IntoIterator<Item = S>) -> Binding<'_, S> {
        let request = ScopeRequest::Sections(sections.into_iter().collect());
        self.scoped(request)
    }

    /// Configures every section not named by another chain of the same
    /// kind (cells, headers or footers).
    pub fn on_all_other_sections(&mut self) -> Binding<'_, S> {
        self.scoped(ScopeRequest::AllOthers)
    }

    /// Configures a fallback for every section.
    pub fn on_any_section(&mut self) -> Binding<'_, S> {
        self.scoped(ScopeRequest::Any)
    }

    fn scoped(&mut self, request: ScopeRequest<S>) -> Binding<'_, S> {
        self.affinity.debug_assert_same_thread();
        let scope = Scope::resolve(request, &self.universe).unwrap_or_else(|err| fatal(err));
        Binding::new(self, scope)
    }

    /// Loads all content and hands the binder to `host`.
    ///
    /// The host receives one `reload_data` call.
    pub fn finish<H: TableHost>(self, mut host: H) -> TableBinder<S, H> {
        self.affinity.debug_assert_same_thread();
        let registry = self.registry.build();

        let mut next = DataModel::new();
        let filter = LoadFilter {
            universe: &self.universe,
            unique: registry.unique_bindings(),
            claims: &self.claims,
            only: None,
        };
        let loaded: usize = self
            .loaders
            .iter()
            .map(|loader| loader.load(&mut next, &filter))
            .sum();
        next.update_displayed(
            &self.universe,
            self.config.section_display_behavior(),
            self.section_order.as_ref(),
        );

        braid_debug!(
            loaders = self.loaders.len(),
            loaded,
            sections = next.displayed().len(),
            "binder finished"
        );

        host.reload_data();
        TableBinder {
            host,
            universe: self.universe,
            registry,
            loaders: self.loaders,
            claims: self.claims,
            config: self.config,
            section_order: self.section_order,
            current: next.clone(),
            next,
            observers: Vec::new(),
            batch_depth: 0,
            pending: None,
            affinity: self.affinity,
        }
    }
}
