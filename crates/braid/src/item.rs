//! Type-erased row and section content.
//!
//! Sections of one binder can hold rows of different model types, so rows
//! are stored erased. Each row keeps its identity key next to the erased
//! value, and values compare through their concrete `PartialEq`.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use braid_core::{Identifiable, ItemId};

/// A `'static` value compared through its concrete `PartialEq`.
pub trait ErasedValue: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Compares with another erased value of possibly different type.
    fn eq_erased(&self, other: &dyn ErasedValue) -> bool;

    /// The concrete type name, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: PartialEq + 'static> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A shared erased value.
pub(crate) type SharedValue = Rc<dyn ErasedValue>;

pub(crate) fn shared_eq(a: &SharedValue, b: &SharedValue) -> bool {
    Rc::ptr_eq(a, b) || (**a).eq_erased(&**b)
}

/// One row as the binder stores it.
#[derive(Clone)]
pub struct RowItem {
    id: ItemId,
    model: Option<SharedValue>,
    view_model: Option<SharedValue>,
}

impl RowItem {
    /// A row bound from a model.
    pub(crate) fn from_model<M: Identifiable + PartialEq + 'static>(model: M) -> Self {
        Self {
            id: model.identity(),
            model: Some(Rc::new(model)),
            view_model: None,
        }
    }

    /// A row bound from a model and the view model derived from it.
    pub(crate) fn from_mapped<M, V>(model: M, view_model: V) -> Self
    where
        M: Identifiable + PartialEq + 'static,
        V: PartialEq + 'static,
    {
        Self {
            id: model.identity(),
            model: Some(Rc::new(model)),
            view_model: Some(Rc::new(view_model)),
        }
    }

    /// A row bound directly from a view model, which is also its model.
    pub(crate) fn from_view_model<V: Identifiable + PartialEq + 'static>(view_model: V) -> Self {
        let id = view_model.identity();
        let value: SharedValue = Rc::new(view_model);
        Self {
            id,
            model: Some(Rc::clone(&value)),
            view_model: Some(value),
        }
    }

    /// A row of a count-only section; its identity is its position.
    pub(crate) fn counted(row: usize) -> Self {
        Self {
            id: ItemId::from(row),
            model: None,
            view_model: None,
        }
    }

    /// The identity key.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// The model, if it has type `M`.
    pub fn model<M: 'static>(&self) -> Option<&M> {
        self.model
            .as_ref()
            .and_then(|model| (**model).as_any().downcast_ref::<M>())
    }

    /// The view model, if it has type `V`.
    pub fn view_model<V: 'static>(&self) -> Option<&V> {
        self.view_model
            .as_ref()
            .and_then(|view_model| (**view_model).as_any().downcast_ref::<V>())
    }

    /// The stored model type, for diagnostics.
    pub fn model_type_name(&self) -> &'static str {
        self.model
            .as_ref()
            .map_or("no model", |model| (**model).type_name())
    }

    /// Returns `true` if the row has no model (a count-only row).
    pub fn is_counted(&self) -> bool {
        self.model.is_none()
    }
}

impl Identifiable for RowItem {
    fn identity(&self) -> ItemId {
        self.id.clone()
    }
}

impl PartialEq for RowItem {
    fn eq(&self, other: &Self) -> bool {
        fn eq_opt(a: &Option<SharedValue>, b: &Option<SharedValue>) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => shared_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        }
        self.id == other.id
            && eq_opt(&self.model, &other.model)
            && eq_opt(&self.view_model, &other.view_model)
    }
}

impl fmt::Debug for RowItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowItem")
            .field("id", &self.id)
            .field("model", &self.model_type_name())
            .finish_non_exhaustive()
    }
}

/// Header or footer content.
#[derive(Clone)]
pub(crate) enum Supplementary {
    Title(String),
    ViewModel(SharedValue),
}

impl Supplementary {
    pub(crate) fn title(&self) -> Option<&str> {
        match self {
            Self::Title(title) => Some(title),
            Self::ViewModel(_) => None,
        }
    }

    pub(crate) fn view_model(&self) -> Option<&dyn ErasedValue> {
        match self {
            Self::Title(_) => None,
            Self::ViewModel(value) => Some(&**value),
        }
    }
}

impl PartialEq for Supplementary {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Title(a), Self::Title(b)) => a == b,
            (Self::ViewModel(a), Self::ViewModel(b)) => shared_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Supplementary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => f.debug_tuple("Title").field(title).finish(),
            Self::ViewModel(value) => f
                .debug_tuple("ViewModel")
                .field(&(**value).type_name())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Song {
        id: u32,
        title: &'static str,
    }

    impl Identifiable for Song {
        fn identity(&self) -> ItemId {
            ItemId::from(self.id)
        }
    }

    #[test]
    fn test_rows_compare_by_value() {
        let a = RowItem::from_model(Song { id: 1, title: "A" });
        let same = RowItem::from_model(Song { id: 1, title: "A" });
        let edited = RowItem::from_model(Song { id: 1, title: "B" });

        assert_eq!(a, same);
        assert_ne!(a, edited);
        assert_eq!(a.identity(), edited.identity());
    }

    #[test]
    fn test_rows_of_different_types_differ() {
        let song = RowItem::from_model(Song { id: 1, title: "A" });
        let number = RowItem::from_model(1_u32);
        assert_eq!(song.identity(), number.identity());
        assert_ne!(song, number);
    }

    #[test]
    fn test_typed_access() {
        let row = RowItem::from_mapped(Song { id: 2, title: "B" }, String::from("B!"));
        assert_eq!(row.model::<Song>().map(|s| s.title), Some("B"));
        assert_eq!(row.view_model::<String>().map(String::as_str), Some("B!"));
        assert!(row.model::<u32>().is_none());
        assert!(row.model_type_name().ends_with("Song"));
    }

    #[test]
    fn test_view_model_row_is_its_own_model() {
        let row = RowItem::from_view_model(String::from("x"));
        assert_eq!(row.model::<String>(), row.view_model::<String>());
    }

    #[test]
    fn test_counted_rows() {
        let row = RowItem::counted(3);
        assert!(row.is_counted());
        assert_eq!(row.id().as_str(), "3");
        assert_eq!(row, RowItem::counted(3));
    }

    #[test]
    fn test_supplementary_equality() {
        let a = Supplementary::Title("Inbox".into());
        assert_eq!(a, Supplementary::Title("Inbox".into()));
        assert_ne!(a, Supplementary::ViewModel(Rc::new(String::from("Inbox"))));
        assert_eq!(a.title(), Some("Inbox"));
    }
}
