//! Backends realizing views.
//!
//! Platform backends live outside this crate. The headless backend performs
//! no rendering; it measures text with fixed font metrics and applies
//! bounds to nothing but its own bookkeeping, which makes the whole layout
//! protocol observable without a platform.

pub mod headless;

pub use headless::{CoreOperation, CoreRole, CoreStats, HeadlessUiProvider, HeadlessViewCore};
