//! Typed handles for each view kind.
//!
//! A widget is a cheap clone of the `Arc<View>` it wraps and dereferences to
//! it, so every generic view operation is available on it directly.

/// Implements the handle boilerplate shared by every widget type.
macro_rules! view_handle {
    ($name:ident, $($pattern:tt)+) => {
        impl $name {
            /// Wrap an existing view. Returns `None` if it has another kind.
            pub fn from_view(view: std::sync::Arc<$crate::view::View>) -> Option<Self> {
                matches!(view.kind(), $($pattern)+).then(|| Self(view))
            }

            #[inline]
            pub fn view(&self) -> &std::sync::Arc<$crate::view::View> {
                &self.0
            }

            pub fn into_view(self) -> std::sync::Arc<$crate::view::View> {
                self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = std::sync::Arc<$crate::view::View>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<$name> for std::sync::Arc<$crate::view::View> {
            fn from(widget: $name) -> Self {
                widget.0
            }
        }
    };
}

mod linear_layout;
mod scroll_view;
mod text_view;
mod window;

pub use linear_layout::LinearLayoutView;
pub use scroll_view::{ScrollLayout, ScrollView, ScrollViewLayoutHelper};
pub use text_view::{Button, TextView};
pub use window::{
    Window, default_window_auto_size, default_window_calc_preferred_size, default_window_center,
    default_window_layout,
};
