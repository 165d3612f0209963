//! Logging facilities for Braid.
//!
//! Braid uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```
//! tracing_subscriber::fmt()
//!     .with_env_filter("braid::diff=debug,braid::reconcile=debug")
//!     .init();
//!
//! braid_core::braid_debug!(sections = 3, "binder ready");
//! ```
//!
//! Registration is logged at `trace`, every applied commit at `debug` with
//! its operation counts, and soft cast failures (a recycled cell no longer
//! matching the bound type) at `warn`.

/// Span names used throughout Braid for tracing.
pub mod span_names {
    /// Diff computation span.
    pub const DIFF: &str = "braid::diff";
    /// Commit (diff + reconcile) span.
    pub const COMMIT: &str = "braid::commit";
    /// Provider refresh span.
    pub const REFRESH: &str = "braid::refresh";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Binder lifecycle, updates and dispatch.
    pub const BINDER: &str = "braid::binder";
    /// Handler registration and resolution.
    pub const REGISTRY: &str = "braid::registry";
    /// Diff engine.
    pub const DIFF: &str = "braid::diff";
    /// Applying changesets to the host widget.
    pub const RECONCILE: &str = "braid::reconcile";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time diffs and commits.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "braid::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! braid_trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: $crate::logging::targets::BINDER, $($arg)*)
    };
}

#[macro_export]
macro_rules! braid_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: $crate::logging::targets::BINDER, $($arg)*)
    };
}

#[macro_export]
macro_rules! braid_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: $crate::logging::targets::BINDER, $($arg)*)
    };
}

#[macro_export]
macro_rules! braid_error {
    ($($arg:tt)*) => {
        $crate::tracing::error!(target: $crate::logging::targets::BINDER, $($arg)*)
    };
}
