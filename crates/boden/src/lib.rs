//! Boden: view sizing and layout coordination.
//!
//! Views negotiate their preferred sizes, propagate invalidation through
//! the view tree and receive pixel aligned bounds, independent of the
//! backend that realizes them:
//!
//! - **Views**: [`View`] nodes with layout relevant properties, each change
//!   firing the invalidations its [`Influence`](view::influence::Influence)
//!   names
//! - **Backend contract**: [`ViewCore`] and [`UiProvider`], implemented once
//!   per backend
//! - **Coordinator**: [`LayoutCoordinator`] batches sizing and layout
//!   requests and flushes them on the UI thread
//! - **Layout algorithms**: linear (stack) layout, scroll view layout and the
//!   default window algorithms
//! - **Headless backend**: realizes views without a platform
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use boden::backend::HeadlessUiProvider;
//! use boden::widgets::{Button, LinearLayoutView, Window};
//! use boden::{Rect, UiContext};
//!
//! # fn main() -> boden::Result<()> {
//! let context = UiContext::new();
//! let provider = HeadlessUiProvider::for_context(&context);
//! let window = Window::with_provider(&context, provider)?;
//!
//! let column = LinearLayoutView::new(&context);
//! column.add_child(&Button::with_label(&context, "OK"))?;
//! window.set_content_view(Some(column.view()))?;
//!
//! window.adjust_and_set_bounds(Rect::new(0.0, 0.0, 400.0, 300.0))?;
//! context.run_until_idle()?;
//!
//! assert!(column.size().width > 0.0);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
mod context;
pub mod coordinator;
pub mod layout;
pub mod view;
pub mod widgets;

pub use boden_core::{
    BodenError, COMPONENT_NONE, Dip, Margin, Point, Rect, Result, RoundType, Size, UiLength,
    UiMargin, UiUnit,
};
pub use config::UiConfig;
pub use context::UiContext;
pub use coordinator::LayoutCoordinator;
pub use view::View;
pub use view::alignment::{HorizontalAlignment, VerticalAlignment};
pub use view::core::{InvalidateReason, UiProvider, ViewCore, WindowCore};
pub use view::sizing::SizingInfo;
pub use view::tree::ViewId;
