//! The binder: owns the data model and keeps the host widget in step
//! with it.
//!
//! A [`TableBinder`] holds two generations of content. `current` is what the
//! host displays and what every data-source query reads. `next` collects
//! updates until a commit, which diffs the two, applies the changeset to the
//! host in batches and promotes `next`.

mod data_model;
mod data_source;
mod setup;
mod updates;

use std::rc::Rc;

use braid_core::logging::{PerfSpan, span_names};
use braid_core::{
    Changeset, Section, SectionUniverse, ThreadAffinity, braid_debug, braid_trace, diff,
};

pub(crate) use data_model::{DataModel, Edge, SectionOrder};
pub use setup::BinderSetup;

use crate::config::BinderConfig;
use crate::content::{ContentClaims, ContentLoader};
use crate::reconcile;
use crate::registry::Registry;
use crate::table::TableHost;

/// What a commit must do once the outermost batch closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Flush {
    /// Apply the diff if it is non-empty.
    Changes,
    /// Always open a batch on the host, so heights are queried again.
    Forced,
}

/// Binds declared content to a host table widget.
///
/// Created by [`BinderSetup::finish`]. All methods must be called on the
/// thread that created the setup.
pub struct TableBinder<S: Section, H: TableHost> {
    host: H,
    universe: SectionUniverse<S>,
    registry: Registry<S>,
    loaders: Vec<ContentLoader<S>>,
    claims: ContentClaims<S>,
    config: BinderConfig,
    section_order: Option<SectionOrder<S>>,
    current: DataModel<S>,
    next: DataModel<S>,
    observers: Vec<Rc<dyn Fn(&Changeset)>>,
    batch_depth: usize,
    pending: Option<Flush>,
    affinity: ThreadAffinity,
}

static_assertions::assert_not_impl_any!(
    TableBinder<u8, crate::recording::RecordingTable>: Send, Sync
);

impl<S: Section, H: TableHost> TableBinder<S, H> {
    /// The host widget.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host widget, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The configuration the binder was finished with.
    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    /// The sections the binder may reference.
    pub fn universe(&self) -> &SectionUniverse<S> {
        &self.universe
    }

    /// The displayed sections, in display order.
    pub fn displayed_sections(&self) -> &[S] {
        self.current.displayed()
    }

    /// Registers a callback invoked with every changeset applied to the
    /// host.
    pub fn on_update(&mut self, observer: impl Fn(&Changeset) + 'static) {
        self.observers.push(Rc::new(observer));
    }

    /// Runs `updates` as one commit: nothing reaches the host until the
    /// closure returns. Batches nest.
    pub fn batch<R>(&mut self, updates: impl FnOnce(&mut Self) -> R) -> R {
        self.affinity.debug_assert_same_thread();
        self.batch_depth += 1;
        let result = updates(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0
            && let Some(flush) = self.pending.take()
        {
            self.flush(flush);
        }
        result
    }

    /// Diffs pending updates against the displayed content and applies them
    /// to the host.
    ///
    /// Update methods commit on their own; call this after
    /// [`set_displayed_sections`](Self::set_displayed_sections) changes or
    /// to force pending work through inside a batch's closure.
    pub fn commit(&mut self) {
        self.request(Flush::Changes);
    }

    fn request(&mut self, flush: Flush) {
        self.affinity.debug_assert_same_thread();
        if self.batch_depth > 0 {
            self.pending = self.pending.max(Some(flush));
        } else {
            self.flush(flush);
        }
    }

    fn flush(&mut self, flush: Flush) {
        let _span = PerfSpan::new(span_names::COMMIT);
        self.pending = None;
        self.next.update_displayed(
            &self.universe,
            self.config.section_display_behavior(),
            self.section_order.as_ref(),
        );

        let mut changes = diff(&self.current.snapshot(), &self.next.snapshot());
        for (index, section) in self.next.displayed().iter().enumerate() {
            if self.current.displayed_index(section).is_none() {
                continue;
            }
            let changed = [Edge::Header, Edge::Footer].into_iter().any(|edge| {
                self.current.supplementary(section, edge) != self.next.supplementary(section, edge)
            });
            if changed {
                changes.deferred_section_reloads.push(index);
            }
        }
        changes.normalize();

        self.current = self.next.clone();
        if changes.is_empty() && flush != Flush::Forced {
            braid_trace!("commit produced no changes");
            return;
        }

        braid_debug!(
            operations = changes.operation_count(),
            forced = flush == Flush::Forced,
            "applying commit"
        );
        self.apply(&changes, flush == Flush::Forced);
    }

    /// Sends a changeset to the host and tells the observers.
    fn apply(&mut self, changes: &Changeset, forced: bool) {
        reconcile::apply(&mut self.host, changes, &self.config, forced);
        for observer in &self.observers {
            observer(changes);
        }
    }
}
