use std::sync::Arc;

use boden_core::{Margin, Point, Rect, Result, Size};

use crate::context::UiContext;
use crate::view::View;
use crate::view::core::{InvalidateReason, UiProvider};
use crate::view::kind::{ViewKind, WindowState};

/// A top-level window holding one content view.
///
/// A window is the root of realization: once it has a [`UiProvider`], it
/// and everything attached below it get cores.
#[derive(Debug, Clone)]
pub struct Window(Arc<View>);

view_handle!(Window, ViewKind::Window(_));

impl Window {
    /// Create a hidden window without a provider.
    pub fn new(context: &Arc<UiContext>) -> Self {
        Self(View::new(context, ViewKind::Window(WindowState::default())))
    }

    pub fn with_provider(context: &Arc<UiContext>, provider: Arc<dyn UiProvider>) -> Result<Self> {
        let window = Self::new(context);
        window.set_ui_provider(Some(provider))?;
        Ok(window)
    }

    pub fn ui_provider(&self) -> Option<Arc<dyn UiProvider>> {
        self.state().and_then(WindowState::provider)
    }

    /// Replace the provider and realize the window tree again.
    pub fn set_ui_provider(&self, provider: Option<Arc<dyn UiProvider>>) -> Result<()> {
        if let Some(state) = self.state() {
            state.set_provider(provider);
        }
        self.0.reinit_core()
    }

    pub fn content_view(&self) -> Option<Arc<View>> {
        self.0.child_views().into_iter().next()
    }

    pub fn set_content_view(&self, content: Option<&Arc<View>>) -> Result<()> {
        self.0.set_content(content)
    }

    pub fn title(&self) -> String {
        self.state().map(|s| s.title.get()).unwrap_or_default()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        if let Some(state) = self.state() {
            self.0.update_property(
                &state.title,
                title.into(),
                |_, _| {},
                InvalidateReason::CustomDataChanged,
            );
        }
    }

    /// Size the window to its content in the next layout flush.
    pub fn request_auto_size(&self) {
        self.0.context().coordinator().request_window_auto_size(&self.0);
    }

    /// Center the window on its screen in the next layout flush.
    pub fn request_center(&self) {
        self.0.context().coordinator().request_window_center(&self.0);
    }

    fn state(&self) -> Option<&WindowState> {
        self.0.kind().as_window()
    }
}

fn content_of(window: &View) -> Option<Arc<View>> {
    window.child_views().into_iter().next()
}

/// Preferred window size: the content's preferred size plus the content
/// margin, the window padding and the window `border`, at least
/// `min_size`.
pub fn default_window_calc_preferred_size(
    window: &Arc<View>,
    available_space: Size,
    border: Margin,
    min_size: Size,
) -> Result<Size> {
    let padding = window.padding_dips()?;
    let mut preferred = match content_of(window) {
        Some(content) => {
            let margin = content.margin_dips()?;
            let insets = border + padding + margin;
            let mut space = available_space;
            if space.width.is_finite() {
                space.width = (space.width - insets.horizontal()).max(0.0);
            }
            if space.height.is_finite() {
                space.height = (space.height - insets.vertical()).max(0.0);
            }
            content.calc_preferred_size(space)? + margin
        }
        None => Size::ZERO,
    };
    preferred += padding + border;

    preferred.apply_minimum(min_size);
    preferred.apply_minimum(window.preferred_size_minimum());
    preferred.apply_maximum(window.preferred_size_maximum());
    Ok(preferred)
}

/// Place the content view inside `content_area`, the window area without
/// its border.
pub fn default_window_layout(window: &Arc<View>, content_area: Rect) -> Result<()> {
    let Some(content) = content_of(window) else {
        return Ok(());
    };
    let bounds = content_area - window.padding_dips()? - content.margin_dips()?;
    content.adjust_and_set_bounds(bounds)?;
    Ok(())
}

/// Resize the window to its preferred size, at most `screen_size`. The
/// position is kept.
pub fn default_window_auto_size(window: &Arc<View>, screen_size: Size) -> Result<()> {
    let size = window
        .calc_preferred_size(screen_size)?
        .with_maximum(screen_size);
    window.adjust_and_set_bounds(Rect::from_position_size(window.position(), size))?;
    Ok(())
}

/// Move the window to the center of `screen_area`, keeping its size.
pub fn default_window_center(window: &Arc<View>, screen_area: Rect) -> Result<()> {
    let size = window.size();
    let position = Point::new(
        screen_area.x + (screen_area.width - size.width) / 2.0,
        screen_area.y + (screen_area.height - size.height) / 2.0,
    );
    window.adjust_and_set_bounds(Rect::from_position_size(position, size))?;
    Ok(())
}
