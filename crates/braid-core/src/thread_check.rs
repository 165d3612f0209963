//! Owner-thread checks for binders.
//!
//! A binder, its handler registry and the host widget it drives all live on
//! the thread that owns the widget. Nothing inside Braid locks, so calling
//! into a binder from another thread is a usage error. The binder types are
//! already `!Send`; [`ThreadAffinity`] catches the remaining cases, such as
//! handlers smuggled out through raw pointers, in debug builds.
//!
//! ```
//! use braid_core::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current("binder");
//! assert!(affinity.check().is_ok());
//! ```

use std::thread::{self, ThreadId};

use crate::error::{BindingError, fatal};

/// Remembers which thread created a binder.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    owner: &'static str,
    thread_id: ThreadId,
}

impl ThreadAffinity {
    /// Binds `owner` to the calling thread.
    pub fn current(owner: &'static str) -> Self {
        Self {
            owner,
            thread_id: thread::current().id(),
        }
    }

    /// The owning thread.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns an error when called from any thread but the owner.
    pub fn check(&self) -> Result<(), BindingError> {
        let current = thread::current();
        if current.id() == self.thread_id {
            return Ok(());
        }
        Err(BindingError::WrongThread {
            owner: self.owner,
            expected: format!("{:?}", self.thread_id),
            current: current
                .name()
                .map_or_else(|| format!("{:?}", current.id()), str::to_owned),
        })
    }

    /// Stops when called off the owning thread. Compiled out of release
    /// builds.
    #[inline]
    #[track_caller]
    pub fn debug_assert_same_thread(&self) {
        #[cfg(debug_assertions)]
        if let Err(err) = self.check() {
            fatal(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_thread_passes() {
        let affinity = ThreadAffinity::current("binder");
        assert_eq!(affinity.thread_id(), thread::current().id());
        assert!(affinity.check().is_ok());
        affinity.debug_assert_same_thread();
    }

    #[test]
    fn test_other_thread_is_reported_by_name() {
        let affinity = ThreadAffinity::current("binder");
        let err = thread::Builder::new()
            .name("loader".into())
            .spawn(move || affinity.check())
            .unwrap()
            .join()
            .unwrap()
            .unwrap_err();

        assert!(matches!(
            &err,
            BindingError::WrongThread { owner: "binder", current, .. } if current == "loader"
        ));
        assert!(err.to_string().starts_with("binder was called from thread loader"));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_debug_assert_stops_other_threads() {
        let affinity = ThreadAffinity::current("binder setup");
        let result = thread::spawn(move || affinity.debug_assert_same_thread()).join();
        assert!(result.is_err());
    }
}
