//! Core systems for Boden.
//!
//! This crate provides the foundation the view layout protocol is built on:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] and [`Margin`] in
//!   device-independent pixels, with an "unconstrained" sentinel
//! - **DIP rounding**: tolerant comparison and physical pixel alignment
//!   with `nearest`, `up` and `down` policies
//! - **UI lengths**: unit-tagged lengths resolved by the backend
//! - **Properties**: thread-safe observable values
//! - **Dispatcher**: the UI-affine execution context with an unhandled
//!   problem channel
//! - **Thread affinity**: checks for UI-thread-only operations
//!
//! # Example
//!
//! ```
//! use boden_core::{Dip, Rect, RoundType, Size};
//!
//! // At 2 physical pixels per DIP, 10.3 rounds to a half-DIP boundary.
//! assert_eq!(Dip::pixel_align(10.3, 2.0, RoundType::Nearest), 10.5);
//! assert_eq!(Dip::pixel_align(10.3, 2.0, RoundType::Down), 10.0);
//!
//! let mut preferred = Size::new(300.0, 40.0);
//! preferred.apply_maximum(Size::new(250.0, Size::NONE.height));
//! assert_eq!(preferred, Size::new(250.0, 40.0));
//!
//! let aligned = Dip::pixel_align_rect(
//!     Rect::new(0.2, 0.2, 9.9, 9.9),
//!     1.0,
//!     RoundType::Up,
//!     RoundType::Up,
//! );
//! assert_eq!(aligned, Rect::new(1.0, 1.0, 10.0, 10.0));
//! ```

pub mod dip;
mod dispatcher;
mod error;
pub mod geometry;
pub mod logging;
pub mod property;
pub mod thread_check;
pub mod ui_length;

pub use dip::{Dip, RoundType, SIGNIFICANCE_BOUNDARY};
pub use dispatcher::{
    DelayedTaskId, DispatchHandle, Dispatcher, LogAndResume, ProblemResponse, TaskId,
    UnhandledProblem, UnhandledProblemHandler,
};
pub use error::{BodenError, Result};
pub use geometry::{COMPONENT_NONE, Margin, Point, Rect, Size};
pub use logging::PerfSpan;
pub use property::{ListenerId, Property, ReadOnlyProperty};
pub use thread_check::ThreadAffinity;
pub use ui_length::{UiLength, UiMargin, UiUnit};
