//! Logging facilities for Boden.
//!
//! Boden uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. Applications pick one, for example:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("boden::coordinator=trace")
//!     .init();
//! ```

use std::time::Instant;

/// Span names used throughout Boden.
pub mod span_names {
    /// One coordinator flush (sizing, auto-size, layout, centering).
    pub const LAYOUT_FLUSH: &str = "boden::layout_flush";
    /// One dispatcher idle pass.
    pub const DISPATCH: &str = "boden::dispatch";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "boden_core";
    /// UI dispatcher target.
    pub const DISPATCHER: &str = "boden_core::dispatcher";
    /// Layout coordinator target.
    pub const COORDINATOR: &str = "boden::coordinator";
    /// View tree and view properties target.
    pub const VIEW: &str = "boden::view";
    /// Layout algorithms target.
    pub const LAYOUT: &str = "boden::layout";
    /// Backend (core and provider) target.
    pub const BACKEND: &str = "boden::backend";
    /// Performance measurements target.
    pub const PERF: &str = "boden::perf";
}

/// A guard that measures an operation.
///
/// The operation runs inside an info span; the elapsed time is logged at
/// debug level when the guard is dropped.
///
/// ```
/// use boden_core::PerfSpan;
///
/// {
///     let _span = PerfSpan::new("layout");
///     // ... measured work ...
/// }
/// ```
pub struct PerfSpan {
    operation: &'static str,
    started: Instant,
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation);
        Self {
            operation,
            started: Instant::now(),
            _span: span.entered(),
        }
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::debug!(
            target: targets::PERF,
            operation = self.operation,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}
