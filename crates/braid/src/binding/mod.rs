//! Typed binding chains.
//!
//! A [`Binding`] is returned by the scope entry points on
//! [`BinderSetup`](crate::BinderSetup) and configures every section in its
//! scope. Each call registers immediately, so a chain can be dropped at any
//! point; nothing is buffered in the builder itself.
//!
//! The two type parameters track what the chain knows. `bind_cell` fixes the
//! cell type `C`, and `models`/`view_models` fix the model type. Callbacks
//! registered afterwards receive `&mut C` and `&M` directly:
//!
//! ```
//! use braid::prelude::*;
//!
//! #[derive(Default)]
//! struct TitleCell {
//!     title: String,
//! }
//! impl TableCell for TitleCell {}
//!
//! #[derive(Debug, Clone, PartialEq, Identifiable)]
//! struct Song {
//!     #[identity]
//!     id: u32,
//!     title: String,
//! }
//!
//! let mut setup = BinderSetup::new(SectionUniverse::fixed(["songs"]));
//! setup
//!     .on_section("songs")
//!     .bind_cell::<TitleCell>()
//!     .models(vec![Song { id: 1, title: "Intro".into() }])
//!     .on_dequeue(|_section, _row, cell, song| cell.title = song.title.clone())
//!     .cell_height(|_, _, _| 44.0);
//! ```

mod slots;

use std::any::{TypeId, type_name};
use std::marker::PhantomData;
use std::rc::Rc;

use braid_core::{BindingCategory, BindingError, Identifiable, Scope, Section, braid_warn, fatal};

pub use slots::{CellSlot, Model, ModelSlot, NoCell, NoModel};

use crate::binder::{BinderSetup, DataModel, Edge};
use crate::cell::{
    EventEmitting, EventSink, HeaderFooterView, TableCell, ViewModelBindable, cell_cast_mut,
    view_cast_mut,
};
use crate::content::{ContentLoader, ContentSource};
use crate::dimensions::Dimensions;
use crate::editing::{ChangeReason, EditingStyle, MovePolicy, MoveRule};
use crate::item::{ErasedValue, RowItem, Supplementary};
use crate::registry::{
    CellBinding, CellHeight, Cells, Deleted, Dequeue, Editing, EstimatedCellHeight,
    EstimatedFooterHeight, EstimatedHeaderHeight, Events, FooterHeight, Footers, HandlerKind,
    HeaderHeight, Headers, Inserted, Moving, RowCallback, RowChange, RowKind, RowMapping,
    RowMappings, RowQuery, SectionQuery, SupplementaryBinding, SupplementaryViewModel, Tapped,
};

/// Configures the sections of one scope.
pub struct Binding<'a, S: Section, C = NoCell, M = NoModel> {
    setup: &'a mut BinderSetup<S>,
    scope: Scope<S>,
    types: PhantomData<fn() -> (C, M)>,
}

impl<'a, S: Section> Binding<'a, S> {
    pub(crate) fn new(setup: &'a mut BinderSetup<S>, scope: Scope<S>) -> Self {
        Self {
            setup,
            scope,
            types: PhantomData,
        }
    }

    /// Binds the cell type for the scope.
    ///
    /// Cells are dequeued by [`TableCell::reuse_identifier`] and created
    /// with `Default` when the host has none to recycle.
    pub fn bind_cell<C: TableCell + Default>(mut self) -> Binding<'a, S, C> {
        let binding = CellBinding {
            reuse_identifier: C::reuse_identifier(),
            type_name: type_name::<C>(),
            make: Rc::new(|| -> Box<dyn TableCell> { Box::new(C::default()) }),
        };
        self.register::<Cells>(Rc::new(binding));
        self.retype()
    }
}

impl<'a, S: Section, C, M> Binding<'a, S, C, M> {
    /// The scope this chain configures.
    pub fn scope(&self) -> &Scope<S> {
        &self.scope
    }

    fn retype<C2, M2>(self) -> Binding<'a, S, C2, M2> {
        Binding {
            setup: self.setup,
            scope: self.scope,
            types: PhantomData,
        }
    }

    fn register<K: HandlerKind<S>>(&mut self, handler: K::Handler) {
        self.setup.registry.register::<K>(&self.scope, handler);
    }

    fn load<V: 'static>(
        &mut self,
        content: ContentSource<S, V>,
        category: BindingCategory,
        store: impl Fn(&mut DataModel<S>, S, V) + 'static,
    ) {
        self.setup.claims.record(&self.scope, category);
        if let Some(loader) = ContentLoader::new(content, &self.scope, category, store) {
            self.setup.loaders.push(loader);
        }
    }

    fn bind_rows<T: 'static, M2>(
        mut self,
        mapping: RowMapping,
        content: ContentSource<S, Vec<T>>,
    ) -> Binding<'a, S, C, M2> {
        let mapping = Rc::new(mapping);
        self.register::<RowMappings>(Rc::clone(&mapping));
        self.load(
            content,
            BindingCategory::Cells,
            move |model: &mut DataModel<S>, section: S, values: Vec<T>| {
                let rows = mapping.convert(values).unwrap_or_default();
                model.set_rows(section, mapping.kind, rows);
            },
        );
        self.retype()
    }

    fn bind_supplementary(&mut self, edge: Edge, binding: SupplementaryBinding) {
        for section in self.scope.sections() {
            let already = match edge {
                Edge::Header => self.setup.registry.is_named::<Headers>(section),
                Edge::Footer => self.setup.registry.is_named::<Footers>(section),
            };
            if already {
                fatal(BindingError::AlreadyBound {
                    what: edge.view_name(),
                    section: format!("{section:?}"),
                });
            }
        }
        let binding = Rc::new(binding);
        match edge {
            Edge::Header => self.register::<Headers>(binding),
            Edge::Footer => self.register::<Footers>(binding),
        }
    }

    fn bind_supplementary_view_model<H>(&mut self, edge: Edge, content: ContentSource<S, H::ViewModel>)
    where
        H: HeaderFooterView + ViewModelBindable + Default,
    {
        self.bind_supplementary(edge, supplementary_binding::<H>(Some(supplementary_view_model::<H>())));
        self.load(
            content,
            edge.category(),
            move |model: &mut DataModel<S>, section: S, view_model: H::ViewModel| {
                model.set_supplementary(section, edge, Supplementary::ViewModel(Rc::new(view_model)));
            },
        );
    }

    fn titles(&mut self, edge: Edge, content: ContentSource<S, String>) {
        self.setup.registry.mark(&self.scope, edge.category());
        self.load(
            content,
            edge.category(),
            move |model: &mut DataModel<S>, section: S, title: String| {
                model.set_supplementary(section, edge, Supplementary::Title(title));
            },
        );
    }

    fn section_query<K>(&mut self, query: SectionQuery<S, f64>)
    where
        K: HandlerKind<S, Handler = SectionQuery<S, f64>>,
    {
        self.register::<K>(query);
    }
}

impl<'a, S: Section, C: TableCell> Binding<'a, S, C, NoModel> {
    /// Binds the scope's rows to models.
    pub fn models<M>(self, content: impl Into<ContentSource<S, Vec<M>>>) -> Binding<'a, S, C, Model<M>>
    where
        M: Identifiable + PartialEq + 'static,
    {
        let mapping = RowMapping::new::<M>(
            RowKind::Models,
            |models: Vec<M>| models.into_iter().map(RowItem::from_model).collect(),
            None,
        );
        self.bind_rows(mapping, content.into())
    }

    /// Binds the scope's rows to models, deriving each cell's view model
    /// with `mapper`. Callbacks still receive the model.
    pub fn models_mapped<M, F>(
        self,
        content: impl Into<ContentSource<S, Vec<M>>>,
        mapper: F,
    ) -> Binding<'a, S, C, Model<M>>
    where
        C: ViewModelBindable,
        M: Identifiable + PartialEq + 'static,
        F: Fn(&M) -> C::ViewModel + 'static,
    {
        let mapping = RowMapping::new::<M>(
            RowKind::Models,
            move |models: Vec<M>| {
                models
                    .into_iter()
                    .map(|model| {
                        let view_model = mapper(&model);
                        RowItem::from_mapped(model, view_model)
                    })
                    .collect()
            },
            Some(view_model_configurator::<C>()),
        );
        self.bind_rows(mapping, content.into())
    }

    /// Binds the scope's rows directly to the cell's view models.
    pub fn view_models(
        self,
        content: impl Into<ContentSource<S, Vec<C::ViewModel>>>,
    ) -> Binding<'a, S, C, Model<C::ViewModel>>
    where
        C: ViewModelBindable,
        C::ViewModel: Identifiable,
    {
        let mapping = RowMapping::new::<C::ViewModel>(
            RowKind::ViewModels,
            |view_models: Vec<C::ViewModel>| {
                view_models.into_iter().map(RowItem::from_view_model).collect()
            },
            Some(view_model_configurator::<C>()),
        );
        self.bind_rows(mapping, content.into())
    }
}

impl<S: Section, C: CellSlot> Binding<'_, S, C, NoModel> {
    /// Makes the scope's sections count-only: rows carry no model and are
    /// identified by position.
    pub fn number_of_cells(mut self, content: impl Into<ContentSource<S, usize>>) -> Self {
        self.setup.registry.mark(&self.scope, BindingCategory::Cells);
        self.load(
            content.into(),
            BindingCategory::Cells,
            |model: &mut DataModel<S>, section: S, count: usize| model.set_count(section, count),
        );
        self
    }
}

impl<S: Section, C: CellSlot, M: ModelSlot> Binding<'_, S, C, M> {
    /// Binds a header view type. A named section takes one header view.
    pub fn bind_header<H: HeaderFooterView + Default>(mut self) -> Self {
        self.bind_supplementary(Edge::Header, supplementary_binding::<H>(None));
        self
    }

    /// Binds a header view type configured from a view model.
    pub fn bind_header_view_model<H>(mut self, content: impl Into<ContentSource<S, H::ViewModel>>) -> Self
    where
        H: HeaderFooterView + ViewModelBindable + Default,
    {
        self.bind_supplementary_view_model::<H>(Edge::Header, content.into());
        self
    }

    /// Binds a footer view type. A named section takes one footer view.
    pub fn bind_footer<F: HeaderFooterView + Default>(mut self) -> Self {
        self.bind_supplementary(Edge::Footer, supplementary_binding::<F>(None));
        self
    }

    /// Binds a footer view type configured from a view model.
    pub fn bind_footer_view_model<F>(mut self, content: impl Into<ContentSource<S, F::ViewModel>>) -> Self
    where
        F: HeaderFooterView + ViewModelBindable + Default,
    {
        self.bind_supplementary_view_model::<F>(Edge::Footer, content.into());
        self
    }

    /// Sets plain header titles.
    pub fn header_title(mut self, content: impl Into<ContentSource<S, String>>) -> Self {
        self.titles(Edge::Header, content.into());
        self
    }

    /// Sets plain footer titles.
    pub fn footer_title(mut self, content: impl Into<ContentSource<S, String>>) -> Self {
        self.titles(Edge::Footer, content.into());
        self
    }

    /// Called every time a cell is bound to a row, after its view model is
    /// assigned.
    ///
    /// # Panics
    ///
    /// Panics if the dequeued cell or the row's model has another type than
    /// this chain was bound with.
    pub fn on_dequeue<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, usize, &mut C::Target, &M::Target) + 'static,
    {
        self.register::<Dequeue>(row_callback::<S, C, M, F>(handler, "on_dequeue", true));
        self
    }

    /// Called when the user selects a row.
    ///
    /// The visible cell may have been recycled to another type by the time
    /// the tap arrives; the handler is skipped with a warning in that case.
    pub fn on_tapped<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, usize, &mut C::Target, &M::Target) + 'static,
    {
        self.register::<Tapped>(row_callback::<S, C, M, F>(handler, "on_tapped", false));
        self
    }

    /// Row height.
    pub fn cell_height<F>(mut self, height: F) -> Self
    where
        F: Fn(&S, usize, &M::Target) -> f64 + 'static,
    {
        self.register::<CellHeight>(row_query::<S, M, f64, F>(height, "cell_height"));
        self
    }

    /// Estimated row height.
    pub fn estimated_cell_height<F>(mut self, height: F) -> Self
    where
        F: Fn(&S, usize, &M::Target) -> f64 + 'static,
    {
        self.register::<EstimatedCellHeight>(row_query::<S, M, f64, F>(height, "estimated_cell_height"));
        self
    }

    /// Header height.
    pub fn header_height(mut self, height: impl Fn(&S) -> f64 + 'static) -> Self {
        self.section_query::<HeaderHeight>(Rc::new(height));
        self
    }

    /// Estimated header height.
    pub fn estimated_header_height(mut self, height: impl Fn(&S) -> f64 + 'static) -> Self {
        self.section_query::<EstimatedHeaderHeight>(Rc::new(height));
        self
    }

    /// Footer height.
    pub fn footer_height(mut self, height: impl Fn(&S) -> f64 + 'static) -> Self {
        self.section_query::<FooterHeight>(Rc::new(height));
        self
    }

    /// Estimated footer height.
    pub fn estimated_footer_height(mut self, height: impl Fn(&S) -> f64 + 'static) -> Self {
        self.section_query::<EstimatedFooterHeight>(Rc::new(height));
        self
    }

    /// Registers every height set in `dimensions` as a constant.
    pub fn dimensions(self, dimensions: Dimensions) -> Self {
        let mut binding = self;
        if let Some(height) = dimensions.cell_height {
            binding = binding.cell_height(move |_, _, _| height);
        }
        if let Some(height) = dimensions.estimated_cell_height {
            binding = binding.estimated_cell_height(move |_, _, _| height);
        }
        if let Some(height) = dimensions.header_height {
            binding = binding.header_height(move |_| height);
        }
        if let Some(height) = dimensions.estimated_header_height {
            binding = binding.estimated_header_height(move |_| height);
        }
        if let Some(height) = dimensions.footer_height {
            binding = binding.footer_height(move |_| height);
        }
        if let Some(height) = dimensions.estimated_footer_height {
            binding = binding.estimated_footer_height(move |_| height);
        }
        binding
    }

    /// Shows the same edit control on every row.
    pub fn allow_editing(self, style: EditingStyle) -> Self {
        self.allow_editing_with(move |_, _, _| style)
    }

    /// Chooses the edit control per row.
    pub fn allow_editing_with<F>(mut self, style: F) -> Self
    where
        F: Fn(&S, usize, &M::Target) -> EditingStyle + 'static,
    {
        self.register::<Editing>(row_query::<S, M, EditingStyle, F>(style, "allow_editing"));
        self
    }

    /// Lets the user reorder rows within the limits of `policy`.
    pub fn allow_moving(mut self, policy: MovePolicy<S>) -> Self {
        self.register::<Moving>(MoveRule::new(policy, None));
        self
    }

    /// Like [`allow_moving`](Self::allow_moving), for rows where `can_move`
    /// returns `true`.
    pub fn allow_moving_if<F>(mut self, policy: MovePolicy<S>, can_move: F) -> Self
    where
        F: Fn(&S, usize, &M::Target) -> bool + 'static,
    {
        let can_move = row_query::<S, M, bool, F>(can_move, "allow_moving");
        self.register::<Moving>(MoveRule::new(policy, Some(can_move)));
        self
    }

    /// Called after a row leaves the scope through user editing.
    ///
    /// For a move, this fires before the matching
    /// [`on_insert`](Self::on_insert), with the destination already adjusted
    /// for the removal.
    pub fn on_delete<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, usize, &M::Target, &ChangeReason<S>) + 'static,
    {
        self.register::<Deleted>(row_change::<S, M, F>(handler, "on_delete"));
        self
    }

    /// Called after a row joins the scope through user editing.
    pub fn on_insert<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, usize, &M::Target, &ChangeReason<S>) + 'static,
    {
        self.register::<Inserted>(row_change::<S, M, F>(handler, "on_insert"));
        self
    }
}

impl<S: Section, C: EventEmitting, M: ModelSlot> Binding<'_, S, C, M> {
    /// Receives the events cells emit, with the row they are bound to.
    ///
    /// A fresh sink is installed each time a cell is bound, so a recycled
    /// cell reports its new row.
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&S, usize, C::Event, &M::Target) + 'static,
    {
        let handler = Rc::new(handler);
        let hookup: RowCallback<S> = Rc::new(
            move |section: &S, row: usize, cell: &mut (dyn TableCell + 'static), item: &RowItem| {
                let Some(cell) = cell_cast_mut::<C>(cell) else {
                    fatal(BindingError::TypeMismatch {
                        expected: type_name::<C>(),
                        found: "a different cell type",
                        context: "on_event",
                    });
                };
                let handler = Rc::clone(&handler);
                let section = section.clone();
                let item = item.clone();
                cell.set_event_sink(EventSink::new(move |event: C::Event| {
                    handler(&section, row, event, model_of::<M>(&item, "on_event"));
                }));
            },
        );
        self.register::<Events>(hookup);
        self
    }
}

fn model_of<'a, M: ModelSlot>(item: &'a RowItem, context: &'static str) -> &'a M::Target {
    M::resolve(item).unwrap_or_else(|| {
        fatal(BindingError::TypeMismatch {
            expected: type_name::<M::Target>(),
            found: item.model_type_name(),
            context,
        })
    })
}

fn row_callback<S, C, M, F>(handler: F, context: &'static str, strict: bool) -> RowCallback<S>
where
    S: Section,
    C: CellSlot,
    M: ModelSlot,
    F: Fn(&S, usize, &mut C::Target, &M::Target) + 'static,
{
    Rc::new(
        move |section: &S, row: usize, cell: &mut (dyn TableCell + 'static), item: &RowItem| {
            let model = model_of::<M>(item, context);
            match C::cast(cell) {
                Some(cell) => handler(section, row, cell, model),
                None if strict => fatal(BindingError::TypeMismatch {
                    expected: type_name::<C>(),
                    found: "a different cell type",
                    context,
                }),
                None => braid_warn!(
                    section = ?section,
                    row,
                    expected = type_name::<C>(),
                    "{context}: cell was recycled to another type, skipping"
                ),
            }
        },
    )
}

fn row_query<S, M, R, F>(query: F, context: &'static str) -> RowQuery<S, R>
where
    S: Section,
    M: ModelSlot,
    R: 'static,
    F: Fn(&S, usize, &M::Target) -> R + 'static,
{
    Rc::new(move |section: &S, row: usize, item: &RowItem| {
        query(section, row, model_of::<M>(item, context))
    })
}

fn row_change<S, M, F>(handler: F, context: &'static str) -> RowChange<S>
where
    S: Section,
    M: ModelSlot,
    F: Fn(&S, usize, &M::Target, &ChangeReason<S>) + 'static,
{
    Rc::new(
        move |section: &S, row: usize, item: &RowItem, reason: &ChangeReason<S>| {
            handler(section, row, model_of::<M>(item, context), reason)
        },
    )
}

fn view_model_configurator<C>() -> Rc<dyn Fn(&mut (dyn TableCell + 'static), &RowItem) -> bool>
where
    C: TableCell + ViewModelBindable,
{
    Rc::new(|cell: &mut (dyn TableCell + 'static), row: &RowItem| {
        match (cell_cast_mut::<C>(cell), row.view_model::<C::ViewModel>()) {
            (Some(cell), Some(view_model)) => {
                cell.set_view_model(view_model.clone());
                true
            }
            _ => false,
        }
    })
}

fn supplementary_binding<H: HeaderFooterView + Default>(
    view_model: Option<SupplementaryViewModel>,
) -> SupplementaryBinding {
    SupplementaryBinding {
        reuse_identifier: H::reuse_identifier(),
        make: Rc::new(|| -> Box<dyn HeaderFooterView> { Box::new(H::default()) }),
        view_model,
    }
}

fn supplementary_view_model<H>() -> SupplementaryViewModel
where
    H: HeaderFooterView + ViewModelBindable,
{
    SupplementaryViewModel {
        type_id: TypeId::of::<H::ViewModel>(),
        type_name: type_name::<H::ViewModel>(),
        configure: Rc::new(
            |view: &mut (dyn HeaderFooterView + 'static), value: &dyn ErasedValue| {
                match (
                    view_cast_mut::<H>(view),
                    value.as_any().downcast_ref::<H::ViewModel>(),
                ) {
                    (Some(view), Some(view_model)) => {
                        view.set_view_model(view_model.clone());
                        true
                    }
                    _ => false,
                }
            },
        ),
    }
}
