//! The handler registry.
//!
//! Every builder call registers a handler of some kind for a scope. Handlers
//! are collected by a [`RegistryBuilder`] during configuration and frozen
//! into a [`Registry`] when the binder is finished.
//!
//! Lookups resolve in precedence order: a handler registered for the section
//! by name, then the "all other sections" handler (skipped when the section
//! was named for the kind's [`BindingCategory`]), then the "any section"
//! handler. Within one scope the last registration wins.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use braid_core::logging::targets;
use braid_core::{BindingCategory, Scope, Section, UniqueBindings};

use crate::cell::{HeaderFooterView, TableCell};
use crate::editing::{ChangeReason, EditingStyle, MoveRule};
use crate::item::{ErasedValue, RowItem};

/// A per-row callback that receives the bound cell.
pub(crate) type RowCallback<S> = Rc<dyn Fn(&S, usize, &mut (dyn TableCell + 'static), &RowItem)>;

/// A per-row query.
pub(crate) type RowQuery<S, R> = Rc<dyn Fn(&S, usize, &RowItem) -> R>;

/// A per-section query.
pub(crate) type SectionQuery<S, R> = Rc<dyn Fn(&S) -> R>;

/// A per-row mutation notification.
pub(crate) type RowChange<S> = Rc<dyn Fn(&S, usize, &RowItem, &ChangeReason<S>)>;

/// How to create the cells of a section.
pub(crate) struct CellBinding {
    pub(crate) reuse_identifier: &'static str,
    pub(crate) type_name: &'static str,
    pub(crate) make: Rc<dyn Fn() -> Box<dyn TableCell>>,
}

/// The row kind a section's content is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowKind {
    Models,
    ViewModels,
    Count,
}

/// How update calls turn a list of values into rows, and how the rows are
/// pushed into a dequeued cell.
pub(crate) struct RowMapping {
    pub(crate) kind: RowKind,
    pub(crate) value_type: TypeId,
    pub(crate) value_type_name: &'static str,
    pub(crate) convert_any: Rc<dyn Fn(Box<dyn Any>) -> Option<Vec<RowItem>>>,
    /// Assigns the row's view model; `false` when the cell or view model has
    /// an unexpected type.
    pub(crate) configure: Option<Rc<dyn Fn(&mut (dyn TableCell + 'static), &RowItem) -> bool>>,
}

impl RowMapping {
    pub(crate) fn new<T: 'static>(
        kind: RowKind,
        to_rows: impl Fn(Vec<T>) -> Vec<RowItem> + 'static,
        configure: Option<Rc<dyn Fn(&mut (dyn TableCell + 'static), &RowItem) -> bool>>,
    ) -> Self {
        Self {
            kind,
            value_type: TypeId::of::<T>(),
            value_type_name: std::any::type_name::<T>(),
            convert_any: Rc::new(move |values: Box<dyn Any>| {
                values
                    .downcast::<Vec<T>>()
                    .ok()
                    .map(|values| to_rows(*values))
            }),
            configure,
        }
    }

    /// Converts a `Vec<T>` into rows, or `None` if `T` is not the bound type.
    pub(crate) fn convert<T: 'static>(&self, values: Vec<T>) -> Option<Vec<RowItem>> {
        if TypeId::of::<T>() != self.value_type {
            return None;
        }
        (self.convert_any)(Box::new(values))
    }
}

/// How to create and configure a header or footer view.
pub(crate) struct SupplementaryBinding {
    pub(crate) reuse_identifier: &'static str,
    pub(crate) make: Rc<dyn Fn() -> Box<dyn HeaderFooterView>>,
    /// The view-model type, when the view takes one.
    pub(crate) view_model: Option<SupplementaryViewModel>,
}

pub(crate) struct SupplementaryViewModel {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) configure: Rc<dyn Fn(&mut (dyn HeaderFooterView + 'static), &dyn ErasedValue) -> bool>,
}

/// Handlers of one kind, by scope.
pub(crate) struct ScopedHandlers<S, H> {
    named: HashMap<S, H>,
    dynamic: Option<H>,
    any: Option<H>,
}

impl<S, H> Default for ScopedHandlers<S, H> {
    fn default() -> Self {
        Self {
            named: HashMap::new(),
            dynamic: None,
            any: None,
        }
    }
}

impl<S: Section, H: Clone> ScopedHandlers<S, H> {
    fn insert(&mut self, scope: &Scope<S>, handler: H) {
        match scope {
            Scope::Named(sections) => {
                for section in sections {
                    self.named.insert(section.clone(), handler.clone());
                }
            }
            Scope::Dynamic => self.dynamic = Some(handler),
            Scope::Any => self.any = Some(handler),
        }
    }

    fn resolve(&self, section: &S, uniquely_bound: bool) -> Option<&H> {
        self.named
            .get(section)
            .or_else(|| {
                if uniquely_bound {
                    None
                } else {
                    self.dynamic.as_ref()
                }
            })
            .or(self.any.as_ref())
    }

    fn is_named(&self, section: &S) -> bool {
        self.named.contains_key(section)
    }
}

/// A kind of handler: the type stored and the category it counts towards.
pub(crate) trait HandlerKind<S: Section> {
    type Handler: Clone;
    const CATEGORY: BindingCategory;
    const NAME: &'static str;

    fn table(tables: &HandlerTables<S>) -> &ScopedHandlers<S, Self::Handler>;
    fn table_mut(tables: &mut HandlerTables<S>) -> &mut ScopedHandlers<S, Self::Handler>;
}

macro_rules! handler_kinds {
    ($( $kind:ident => $field:ident: $handler:ty, $category:ident; )*) => {
        pub(crate) struct HandlerTables<S> {
            $( $field: ScopedHandlers<S, $handler>, )*
        }

        impl<S> Default for HandlerTables<S> {
            fn default() -> Self {
                Self {
                    $( $field: ScopedHandlers::default(), )*
                }
            }
        }

        $(
            pub(crate) enum $kind {}

            impl<S: Section> HandlerKind<S> for $kind {
                type Handler = $handler;
                const CATEGORY: BindingCategory = BindingCategory::$category;
                const NAME: &'static str = stringify!($field);

                fn table(tables: &HandlerTables<S>) -> &ScopedHandlers<S, $handler> {
                    &tables.$field
                }

                fn table_mut(tables: &mut HandlerTables<S>) -> &mut ScopedHandlers<S, $handler> {
                    &mut tables.$field
                }
            }
        )*
    };
}

handler_kinds! {
    Cells => cells: Rc<CellBinding>, Cells;
    RowMappings => row_mappings: Rc<RowMapping>, Cells;
    Dequeue => dequeue: RowCallback<S>, Cells;
    Tapped => tapped: RowCallback<S>, Cells;
    Events => events: RowCallback<S>, Cells;
    CellHeight => cell_height: RowQuery<S, f64>, Cells;
    EstimatedCellHeight => estimated_cell_height: RowQuery<S, f64>, Cells;
    Editing => editing: RowQuery<S, EditingStyle>, Cells;
    Moving => moving: Rc<MoveRule<S>>, Cells;
    Deleted => deleted: RowChange<S>, Cells;
    Inserted => inserted: RowChange<S>, Cells;
    Headers => headers: Rc<SupplementaryBinding>, Headers;
    HeaderHeight => header_height: SectionQuery<S, f64>, Headers;
    EstimatedHeaderHeight => estimated_header_height: SectionQuery<S, f64>, Headers;
    Footers => footers: Rc<SupplementaryBinding>, Footers;
    FooterHeight => footer_height: SectionQuery<S, f64>, Footers;
    EstimatedFooterHeight => estimated_footer_height: SectionQuery<S, f64>, Footers;
}

/// Collects handlers during configuration.
pub(crate) struct RegistryBuilder<S> {
    tables: HandlerTables<S>,
    unique: UniqueBindings<S>,
}

impl<S: Section> RegistryBuilder<S> {
    pub(crate) fn new() -> Self {
        Self {
            tables: HandlerTables::default(),
            unique: UniqueBindings::new(),
        }
    }

    /// Registers a handler. A Named scope marks its sections as uniquely
    /// bound for the kind's category.
    pub(crate) fn register<K: HandlerKind<S>>(&mut self, scope: &Scope<S>, handler: K::Handler) {
        tracing::trace!(
            target: targets::REGISTRY,
            kind = K::NAME,
            scope = ?scope,
            "registered handler"
        );
        self.unique.record(scope, K::CATEGORY);
        K::table_mut(&mut self.tables).insert(scope, handler);
    }

    /// Marks a scope's sections as uniquely bound without registering a
    /// handler, for content-only calls.
    pub(crate) fn mark(&mut self, scope: &Scope<S>, category: BindingCategory) {
        self.unique.record(scope, category);
    }

    /// Returns `true` if a handler of this kind was registered for the
    /// section by name.
    pub(crate) fn is_named<K: HandlerKind<S>>(&self, section: &S) -> bool {
        K::table(&self.tables).is_named(section)
    }

    /// Freezes the registry.
    pub(crate) fn build(self) -> Registry<S> {
        Registry {
            tables: self.tables,
            unique: self.unique,
        }
    }
}

/// The frozen lookup table.
pub(crate) struct Registry<S> {
    tables: HandlerTables<S>,
    unique: UniqueBindings<S>,
}

impl<S: Section> Registry<S> {
    /// Resolves the handler of a kind for a section.
    pub(crate) fn resolve<K: HandlerKind<S>>(&self, section: &S) -> Option<&K::Handler> {
        K::table(&self.tables).resolve(section, self.unique.is_unique(section, K::CATEGORY))
    }

    /// Returns `true` if the section was named for the category.
    pub(crate) fn is_uniquely_bound(&self, section: &S, category: BindingCategory) -> bool {
        self.unique.is_unique(section, category)
    }

    pub(crate) fn unique_bindings(&self) -> &UniqueBindings<S> {
        &self.unique
    }
}
