//! Pushing new content into a running binder.
//!
//! Each update writes into the pending generation and commits, unless it
//! runs inside [`TableBinder::batch`], in which case the batch commits once
//! at the end.

use std::any::{TypeId, type_name};
use std::rc::Rc;

use braid_core::logging::{PerfSpan, span_names};
use braid_core::{BindingCategory, BindingError, Section, braid_debug, braid_trace, fatal};

use super::{Edge, Flush, TableBinder};
use crate::content::LoadFilter;
use crate::item::Supplementary;
use crate::registry::{Footers, Headers, RowMappings};
use crate::table::TableHost;

impl<S: Section, H: TableHost> TableBinder<S, H> {
    /// Replaces the models of a section.
    ///
    /// # Panics
    ///
    /// Panics if the section has no model binding or was bound with a model
    /// type other than `M`.
    pub fn update_cell_models<M: 'static>(&mut self, section: S, models: Vec<M>) {
        self.replace_rows(section, models, "update_cell_models");
    }

    /// Replaces the view models of a section bound with `view_models`.
    pub fn update_cell_view_models<V: 'static>(&mut self, section: S, view_models: Vec<V>) {
        self.replace_rows(section, view_models, "update_cell_view_models");
    }

    /// Replaces the models of several sections in one commit, skipping
    /// sections that were named for cells by their own binding.
    ///
    /// This is the update counterpart of `on_all_other_sections`: it never
    /// overwrites a section that has its own binding.
    pub fn update_dynamic_cell_models<M: 'static>(
        &mut self,
        content: impl IntoIterator<Item = (S, Vec<M>)>,
    ) {
        self.batch(|binder| {
            for (section, models) in content {
                if binder
                    .registry
                    .is_uniquely_bound(&section, BindingCategory::Cells)
                {
                    braid_trace!(section = ?section, "skipping uniquely bound section");
                    continue;
                }
                binder.update_cell_models(section, models);
            }
        });
    }

    fn replace_rows<T: 'static>(&mut self, section: S, values: Vec<T>, context: &'static str) {
        self.affinity.debug_assert_same_thread();
        self.universe.require(&section);
        let Some(mapping) = self.registry.resolve::<RowMappings>(&section) else {
            fatal(BindingError::not_bound("model type", &section));
        };
        let kind = mapping.kind;
        let Some(rows) = mapping.convert(values) else {
            fatal(BindingError::TypeMismatch {
                expected: mapping.value_type_name,
                found: type_name::<T>(),
                context,
            });
        };
        self.next.set_rows(section, kind, rows);
        self.commit();
    }

    /// Makes a section count-only with `count` rows.
    pub fn update_number_of_cells(&mut self, section: S, count: usize) {
        self.affinity.debug_assert_same_thread();
        self.universe.require(&section);
        self.next.set_count(section, count);
        self.commit();
    }

    /// Sets the plain header title of a section.
    pub fn update_header_title(&mut self, section: S, title: impl Into<String>) {
        self.update_header_titles([(section, title.into())]);
    }

    /// Sets the plain header titles of several sections in one commit.
    pub fn update_header_titles(&mut self, titles: impl IntoIterator<Item = (S, String)>) {
        self.set_titles(Edge::Header, titles);
    }

    /// Sets the plain footer title of a section.
    pub fn update_footer_title(&mut self, section: S, title: impl Into<String>) {
        self.update_footer_titles([(section, title.into())]);
    }

    /// Sets the plain footer titles of several sections in one commit.
    pub fn update_footer_titles(&mut self, titles: impl IntoIterator<Item = (S, String)>) {
        self.set_titles(Edge::Footer, titles);
    }

    fn set_titles(&mut self, edge: Edge, titles: impl IntoIterator<Item = (S, String)>) {
        self.affinity.debug_assert_same_thread();
        for (section, title) in titles {
            self.universe.require(&section);
            self.next
                .set_supplementary(section, edge, Supplementary::Title(title));
        }
        self.commit();
    }

    /// Replaces the view model of a section's header view.
    ///
    /// # Panics
    ///
    /// Panics if the section's header view does not take a `V`.
    pub fn update_header_view_model<V: PartialEq + 'static>(&mut self, section: S, view_model: V) {
        self.set_supplementary_view_model(Edge::Header, section, view_model);
    }

    /// Replaces the view model of a section's footer view.
    ///
    /// # Panics
    ///
    /// Panics if the section's footer view does not take a `V`.
    pub fn update_footer_view_model<V: PartialEq + 'static>(&mut self, section: S, view_model: V) {
        self.set_supplementary_view_model(Edge::Footer, section, view_model);
    }

    fn set_supplementary_view_model<V: PartialEq + 'static>(
        &mut self,
        edge: Edge,
        section: S,
        view_model: V,
    ) {
        self.affinity.debug_assert_same_thread();
        self.universe.require(&section);
        let what = match edge {
            Edge::Header => "header view model",
            Edge::Footer => "footer view model",
        };
        let binding = match edge {
            Edge::Header => self.registry.resolve::<Headers>(&section),
            Edge::Footer => self.registry.resolve::<Footers>(&section),
        };
        let Some(expected) = binding.and_then(|binding| binding.view_model.as_ref()) else {
            fatal(BindingError::not_bound(what, &section));
        };
        if expected.type_id != TypeId::of::<V>() {
            fatal(BindingError::TypeMismatch {
                expected: expected.type_name,
                found: type_name::<V>(),
                context: what,
            });
        }
        self.next
            .set_supplementary(section, edge, Supplementary::ViewModel(Rc::new(view_model)));
        self.commit();
    }

    /// Displays exactly `sections`, in this order, or returns to the
    /// universe's own order with `None`. Display behavior still hides empty
    /// sections. A repeated section is displayed once, at its first position.
    pub fn set_displayed_sections(&mut self, sections: Option<Vec<S>>) {
        self.affinity.debug_assert_same_thread();
        let sections = sections.map(|sections| {
            let mut displayed: Vec<S> = Vec::with_capacity(sections.len());
            for section in sections {
                self.universe.require(&section);
                if !displayed.contains(&section) {
                    displayed.push(section);
                }
            }
            displayed
        });
        self.next.set_displayed_override(sections);
        self.commit();
    }

    /// Calls every provider again and commits.
    ///
    /// The host gets a batch even when no content changed, so it queries
    /// heights again.
    pub fn refresh(&mut self) {
        self.reload_providers(None);
    }

    /// Calls the providers that can write to `sections` again and commits.
    pub fn refresh_sections(&mut self, sections: &[S]) {
        for section in sections {
            self.universe.require(section);
        }
        self.reload_providers(Some(sections));
    }

    fn reload_providers(&mut self, only: Option<&[S]>) {
        self.affinity.debug_assert_same_thread();
        let _span = PerfSpan::new(span_names::REFRESH);
        let unique = self.registry.unique_bindings();
        let filter = LoadFilter {
            universe: &self.universe,
            unique,
            claims: &self.claims,
            only,
        };
        let mut loaded = 0;
        for loader in &self.loaders {
            if !loader.is_refreshable() {
                continue;
            }
            if only.is_some_and(|sections| !loader.may_cover(sections, unique)) {
                continue;
            }
            loaded += loader.load(&mut self.next, &filter);
        }
        braid_debug!(loaded, "providers refreshed");
        self.request(Flush::Forced);
    }
}
