//! The cell and model type parameters of a [`Binding`](super::Binding).
//!
//! A binding chain starts with neither a cell type nor a model type bound.
//! Callbacks receive whatever the slots resolve to: `&mut dyn TableCell` and
//! [`NoModel`] until `bind_cell` and `models` narrow them.

use std::marker::PhantomData;

use crate::cell::{TableCell, cell_cast_mut};
use crate::item::RowItem;

/// Resolves the cell a callback receives.
pub trait CellSlot: 'static {
    /// What callbacks see.
    type Target: ?Sized;

    /// Narrows a dequeued cell; `None` if it has another type.
    fn cast<'a>(cell: &'a mut (dyn TableCell + 'static)) -> Option<&'a mut Self::Target>;
}

/// No cell type bound yet.
#[derive(Debug)]
pub enum NoCell {}

impl CellSlot for NoCell {
    type Target = dyn TableCell;

    fn cast<'a>(cell: &'a mut (dyn TableCell + 'static)) -> Option<&'a mut Self::Target> {
        Some(cell)
    }
}

impl<C: TableCell> CellSlot for C {
    type Target = C;

    fn cast<'a>(cell: &'a mut (dyn TableCell + 'static)) -> Option<&'a mut C> {
        cell_cast_mut::<C>(cell)
    }
}

/// Resolves the model a callback receives.
pub trait ModelSlot: 'static {
    /// What callbacks see.
    type Target: ?Sized;

    /// Reads the row's model; `None` if it has another type.
    fn resolve(row: &RowItem) -> Option<&Self::Target>;
}

/// Passed to callbacks of a chain with no model type bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoModel;

impl ModelSlot for NoModel {
    type Target = NoModel;

    fn resolve(_row: &RowItem) -> Option<&NoModel> {
        Some(&NoModel)
    }
}

/// A chain whose rows are models of type `M`.
pub struct Model<M>(PhantomData<fn() -> M>);

impl<M: 'static> ModelSlot for Model<M> {
    type Target = M;

    fn resolve(row: &RowItem) -> Option<&M> {
        row.model::<M>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Label;
    impl TableCell for Label {}

    #[derive(Default)]
    struct Switch;
    impl TableCell for Switch {}

    #[test]
    fn test_cell_slots() {
        let mut cell: Box<dyn TableCell> = Box::new(Label);
        assert!(<NoCell as CellSlot>::cast(cell.as_mut()).is_some());
        assert!(<Label as CellSlot>::cast(cell.as_mut()).is_some());
        assert!(<Switch as CellSlot>::cast(cell.as_mut()).is_none());
    }

    #[test]
    fn test_model_slots() {
        let row = RowItem::from_model(String::from("a"));
        assert_eq!(NoModel::resolve(&row), Some(&NoModel));
        assert_eq!(Model::<String>::resolve(&row).map(String::as_str), Some("a"));
        assert!(Model::<u32>::resolve(&row).is_none());
        assert!(Model::<u32>::resolve(&RowItem::counted(0)).is_none());
    }
}
