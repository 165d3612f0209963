//! Everything needed to configure and drive a binder.
//!
//! ```
//! use braid::prelude::*;
//! ```

pub use braid_core::{DeclaredSections, Identifiable, IndexPath, ItemId, Section, SectionUniverse};
pub use braid_macros::{Identifiable, Sections};

pub use crate::binder::{BinderSetup, TableBinder};
pub use crate::binding::{Binding, Model, NoModel};
pub use crate::cell::{
    EventEmitting, EventSink, HeaderFooterView, TableCell, ViewModelBindable, cell_cast,
    cell_cast_mut, view_cast, view_cast_mut,
};
pub use crate::config::{BinderConfig, SectionDisplayBehavior, UpdateAnimations};
pub use crate::content::ContentSource;
pub use crate::dimensions::Dimensions;
pub use crate::editing::{ChangeReason, EditingStyle, MovePolicy};
pub use crate::item::RowItem;
pub use crate::recording::{RecordingTable, TableOp};
pub use crate::table::{RowAnimation, TableHost};
