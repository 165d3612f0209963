//! Stable item identity.
//!
//! Diffing needs two independent notions of sameness. *Identity* says "this
//! is the same logical row" and survives edits to the row's content; it is
//! what lets the diff engine report a move instead of a delete and an
//! insert. *Equality* (`PartialEq`) says "nothing visible changed"; an item
//! whose identity matches but whose value differs is reloaded in place.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// The identity key of a row, unique within its section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Cow<'static, str>);

impl ItemId {
    /// Creates an identity from anything displayable.
    pub fn new<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self(Cow::Owned(value.to_string()))
    }

    /// Creates an identity from a static string without allocating.
    pub const fn from_static(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_owned()))
    }
}

impl From<&String> for ItemId {
    fn from(value: &String) -> Self {
        Self(Cow::Owned(value.clone()))
    }
}

macro_rules! item_id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ItemId {
                fn from(value: $ty) -> Self {
                    Self(Cow::Owned(value.to_string()))
                }
            }
        )*
    };
}

item_id_from_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Types that carry a stable identity key.
///
/// The key must stay the same for the lifetime of the logical item, even
/// when other fields change, and must be unique within one section.
///
/// ```
/// use braid_core::{Identifiable, ItemId};
///
/// #[derive(PartialEq)]
/// struct Contact {
///     id: u64,
///     name: String,
/// }
///
/// impl Identifiable for Contact {
///     fn identity(&self) -> ItemId {
///         ItemId::from(self.id)
///     }
/// }
///
/// let before = Contact { id: 7, name: "Ada".into() };
/// let after = Contact { id: 7, name: "Ada L.".into() };
/// assert_eq!(before.identity(), after.identity());
/// assert!(before != after);
/// ```
pub trait Identifiable {
    /// Returns the identity key of this item.
    fn identity(&self) -> ItemId;
}

impl Identifiable for String {
    fn identity(&self) -> ItemId {
        ItemId::from(self)
    }
}

impl Identifiable for &str {
    fn identity(&self) -> ItemId {
        ItemId::from(*self)
    }
}

impl Identifiable for ItemId {
    fn identity(&self) -> ItemId {
        self.clone()
    }
}

macro_rules! identifiable_integer {
    ($($ty:ty),*) => {
        $(
            impl Identifiable for $ty {
                fn identity(&self) -> ItemId {
                    ItemId::from(*self)
                }
            }
        )*
    };
}

identifiable_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl<T: Identifiable + ?Sized> Identifiable for Rc<T> {
    fn identity(&self) -> ItemId {
        (**self).identity()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Arc<T> {
    fn identity(&self) -> ItemId {
        (**self).identity()
    }
}

impl<T: Identifiable + ?Sized> Identifiable for Box<T> {
    fn identity(&self) -> ItemId {
        (**self).identity()
    }
}
