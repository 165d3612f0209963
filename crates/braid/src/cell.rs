//! Contracts for the views a binder fills in.
//!
//! Cells, headers and footers are owned by the host widget. A binder only
//! needs three things from them: a reuse identifier to dequeue them by, a
//! single-assignment view-model slot, and optionally a channel to send
//! events back up.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Upcasting to [`Any`], implemented for every `'static` type.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A row view.
///
/// # Example
///
/// ```
/// use braid::cell::TableCell;
///
/// #[derive(Default)]
/// struct SubtitleCell {
///     title: String,
///     subtitle: String,
/// }
///
/// impl TableCell for SubtitleCell {
///     fn prepare_for_reuse(&mut self) {
///         self.title.clear();
///         self.subtitle.clear();
///     }
/// }
/// ```
pub trait TableCell: AsAny {
    /// The identifier the host dequeues this cell type by.
    fn reuse_identifier() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Called by the host before a recycled cell is handed out again.
    fn prepare_for_reuse(&mut self) {}
}

/// A section header or footer view.
pub trait HeaderFooterView: AsAny {
    /// The identifier the host dequeues this view type by.
    fn reuse_identifier() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Called by the host before a recycled view is handed out again.
    fn prepare_for_reuse(&mut self) {}
}

/// A view configured from a single view model.
///
/// The binder calls [`set_view_model`](Self::set_view_model) every time the
/// view is bound to a row or section, after dequeueing and before any
/// dequeue callback runs.
pub trait ViewModelBindable {
    /// The view model type.
    type ViewModel: Clone + PartialEq + 'static;

    /// Assigns the view model.
    fn set_view_model(&mut self, view_model: Self::ViewModel);
}

/// A cell that reports events of a closed set upward.
///
/// The binder installs a fresh sink each time the cell is bound, so events
/// are always delivered with the section, row and model the cell was last
/// bound to.
pub trait EventEmitting: TableCell {
    /// The events this cell can emit.
    type Event: 'static;

    /// Installs the sink the cell emits through.
    fn set_event_sink(&mut self, sink: EventSink<Self::Event>);
}

/// The channel a cell emits events through.
pub struct EventSink<E> {
    emit: Rc<dyn Fn(E)>,
}

impl<E> EventSink<E> {
    /// Creates a sink from a callback.
    pub fn new(emit: impl Fn(E) + 'static) -> Self {
        Self {
            emit: Rc::new(emit),
        }
    }

    /// Emits an event.
    pub fn emit(&self, event: E) {
        (self.emit)(event)
    }
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self {
            emit: Rc::clone(&self.emit),
        }
    }
}

impl<E> fmt::Debug for EventSink<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Downcasts a cell to its concrete type.
///
/// Always call this on the trait object, never on a `Box<dyn TableCell>`:
/// the box is itself `Any` and would downcast as the box.
pub fn cell_cast_mut<'a, C: TableCell>(
    cell: &'a mut (dyn TableCell + 'static),
) -> Option<&'a mut C> {
    cell.as_any_mut().downcast_mut::<C>()
}

/// Downcasts a cell to its concrete type.
pub fn cell_cast<'a, C: TableCell>(cell: &'a (dyn TableCell + 'static)) -> Option<&'a C> {
    cell.as_any().downcast_ref::<C>()
}

/// Downcasts a header or footer view to its concrete type.
pub fn view_cast_mut<'a, V: HeaderFooterView>(
    view: &'a mut (dyn HeaderFooterView + 'static),
) -> Option<&'a mut V> {
    view.as_any_mut().downcast_mut::<V>()
}

/// Downcasts a header or footer view to its concrete type.
pub fn view_cast<'a, V: HeaderFooterView>(
    view: &'a (dyn HeaderFooterView + 'static),
) -> Option<&'a V> {
    view.as_any().downcast_ref::<V>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Plain;
    impl TableCell for Plain {}

    #[derive(Default)]
    struct Other;
    impl TableCell for Other {
        fn reuse_identifier() -> &'static str {
            "other"
        }
    }

    #[test]
    fn test_reuse_identifier_defaults_to_type_name() {
        assert!(Plain::reuse_identifier().ends_with("Plain"));
        assert_eq!(Other::reuse_identifier(), "other");
    }

    #[test]
    fn test_cast_through_trait_object() {
        let mut boxed: Box<dyn TableCell> = Box::new(Plain);
        assert!(cell_cast_mut::<Plain>(boxed.as_mut()).is_some());
        assert!(cell_cast_mut::<Other>(boxed.as_mut()).is_none());
        assert!(cell_cast::<Plain>(boxed.as_ref()).is_some());
    }

    #[test]
    fn test_event_sink_clones_share_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = Rc::clone(&seen);
            EventSink::new(move |event: u8| seen.borrow_mut().push(event))
        };
        sink.clone().emit(1);
        sink.emit(2);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }
}
