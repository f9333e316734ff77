use std::sync::Arc;

use boden_core::{Dip, Margin, Point, Rect, Result, RoundType, Size};

use crate::context::UiContext;
use crate::view::View;
use crate::view::core::InvalidateReason;
use crate::view::kind::{ScrollViewState, ViewKind};

/// A view showing a scrollable part of a single content view.
#[derive(Debug, Clone)]
pub struct ScrollView(Arc<View>);

view_handle!(ScrollView, ViewKind::ScrollView(_));

impl ScrollView {
    pub fn new(context: &Arc<UiContext>) -> Self {
        Self(View::new(context, ViewKind::ScrollView(ScrollViewState::default())))
    }

    pub fn content_view(&self) -> Option<Arc<View>> {
        self.0.child_views().into_iter().next()
    }

    /// Replace the content view; `None` removes it.
    pub fn set_content_view(&self, content: Option<&Arc<View>>) -> Result<()> {
        self.0.set_content(content)
    }

    pub fn horizontal_scrolling_enabled(&self) -> bool {
        self.state().is_some_and(|s| s.horizontal_scrolling_enabled.get())
    }

    pub fn set_horizontal_scrolling_enabled(&self, enabled: bool) {
        if let Some(state) = self.state() {
            self.0.update_property(
                &state.horizontal_scrolling_enabled,
                enabled,
                |_, _| {},
                InvalidateReason::StandardPropertyChanged,
            );
        }
    }

    pub fn vertical_scrolling_enabled(&self) -> bool {
        self.state().is_some_and(|s| s.vertical_scrolling_enabled.get())
    }

    pub fn set_vertical_scrolling_enabled(&self, enabled: bool) {
        if let Some(state) = self.state() {
            self.0.update_property(
                &state.vertical_scrolling_enabled,
                enabled,
                |_, _| {},
                InvalidateReason::StandardPropertyChanged,
            );
        }
    }

    fn state(&self) -> Option<&ScrollViewState> {
        self.0.kind().as_scroll_view()
    }
}

/// Result of [`ScrollViewLayoutHelper::calc_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollLayout {
    pub horizontal_scrollbar_visible: bool,
    pub vertical_scrollbar_visible: bool,
    /// Bounds of the content view within the scrolled area, whose origin is
    /// (0, 0).
    pub content_view_bounds: Rect,
    /// Content view plus its margin plus the scroll view's padding.
    pub scrolled_area_size: Size,
    /// The part of the scrolled area visible at once. Scroll bars are not
    /// part of it.
    pub viewport_size: Size,
}

/// Scroll view sizing and layout for backends that draw scroll bars of a
/// fixed thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewLayoutHelper {
    pub vert_bar_width: f64,
    pub horz_bar_height: f64,
}

struct ScrollInputs {
    content: Option<Arc<View>>,
    horizontal_enabled: bool,
    vertical_enabled: bool,
    padding: Margin,
    content_margin: Margin,
}

impl ScrollInputs {
    fn of(scroll_view: &Arc<View>) -> Result<Self> {
        let state = scroll_view.kind().as_scroll_view();
        let content = scroll_view.child_views().into_iter().next();
        let content_margin = match &content {
            Some(content) => scroll_view.ui_margin_to_dip_margin(content.margin())?,
            None => Margin::ZERO,
        };
        Ok(Self {
            horizontal_enabled: state.is_some_and(|s| s.horizontal_scrolling_enabled.get()),
            vertical_enabled: state.is_some_and(|s| s.vertical_scrolling_enabled.get()),
            padding: scroll_view.padding_dips()?,
            content,
            content_margin,
        })
    }
}

impl ScrollViewLayoutHelper {
    pub fn new(vert_bar_width: f64, horz_bar_height: f64) -> Self {
        Self {
            vert_bar_width,
            horz_bar_height,
        }
    }

    /// Lay out `scroll_view` for a viewport of
    /// `viewport_size_without_bars` when no scroll bars are shown.
    ///
    /// Does not modify any view.
    pub fn calc_layout(
        &self,
        scroll_view: &Arc<View>,
        viewport_size_without_bars: Size,
    ) -> Result<ScrollLayout> {
        let inputs = ScrollInputs::of(scroll_view)?;
        let mut result = ScrollLayout {
            viewport_size: viewport_size_without_bars,
            ..ScrollLayout::default()
        };

        for pass in 0..2 {
            let mut content_size = Size::ZERO;
            if let Some(content) = &inputs.content {
                content_size = content.calc_preferred_size(Size::NONE)?;

                // The viewport of the previous pass, reduced by the bars it
                // showed.
                let mut space = result.viewport_size - inputs.padding - inputs.content_margin;
                let mut fits = true;
                if inputs.horizontal_enabled {
                    space.width = Size::NONE.width;
                } else {
                    fits &= Dip(content_size.width) <= space.width;
                }
                if inputs.vertical_enabled {
                    space.height = Size::NONE.height;
                } else {
                    fits &= Dip(content_size.height) <= space.height;
                }
                if !fits {
                    content_size = content.calc_preferred_size(space)?;
                }

                content_size = content
                    .adjust_bounds(
                        Rect::from_position_size(Point::ZERO, content_size),
                        RoundType::Nearest,
                        RoundType::Up,
                    )
                    .size();
            }

            let mut viewport = viewport_size_without_bars;
            let mut area = content_size + inputs.content_margin + inputs.padding;

            let mut show_horizontal = inputs.horizontal_enabled && Dip(area.width) > viewport.width;
            if show_horizontal {
                viewport.height -= self.horz_bar_height;
            }
            let show_vertical = inputs.vertical_enabled && Dip(area.height) > viewport.height;
            if show_vertical {
                viewport.width -= self.vert_bar_width;
                // The vertical bar narrowed the viewport.
                if !show_horizontal {
                    show_horizontal = inputs.horizontal_enabled && Dip(area.width) > viewport.width;
                    if show_horizontal {
                        viewport.height -= self.horz_bar_height;
                    }
                }
            }

            area.width = area.width.max(viewport.width);
            area.height = area.height.max(viewport.height);

            let mut width_clipped = false;
            let mut height_clipped = false;
            if !inputs.horizontal_enabled && Dip(area.width) > viewport.width {
                width_clipped = true;
                area.width = viewport.width;
            }
            if !inputs.vertical_enabled && Dip(area.height) > viewport.height {
                height_clipped = true;
                area.height = viewport.height;
            }

            result = ScrollLayout {
                horizontal_scrollbar_visible: show_horizontal,
                vertical_scrollbar_visible: show_vertical,
                content_view_bounds: Rect::from_position_size(Point::ZERO, area)
                    - inputs.padding
                    - inputs.content_margin,
                scrolled_area_size: area,
                viewport_size: viewport,
            };

            // A bar shown on a clipped axis changed the content's space; the
            // content gets one chance to adapt.
            let rerun = pass == 0
                && inputs.content.is_some()
                && ((width_clipped && show_vertical) || (height_clipped && show_horizontal));
            if !rerun {
                break;
            }
        }
        Ok(result)
    }

    /// Preferred size of `scroll_view` for `available_space`.
    pub fn calc_preferred_size(&self, scroll_view: &Arc<View>, available_space: Size) -> Result<Size> {
        let inputs = ScrollInputs::of(scroll_view)?;
        let max_size = scroll_view
            .preferred_size_maximum()
            .with_maximum(available_space);
        let width_constrained = max_size.width.is_finite();
        let height_constrained = max_size.height.is_finite();
        let insets = inputs.padding + inputs.content_margin;

        let mut show_horizontal = false;
        let mut show_vertical = false;
        let mut preferred = Size::ZERO;

        for pass in 0..2 {
            let content_size = match &inputs.content {
                Some(content) => {
                    let mut space = Size::NONE;
                    if !inputs.horizontal_enabled && width_constrained {
                        space.width = max_size.width - insets.horizontal();
                        if show_vertical {
                            space.width -= self.vert_bar_width;
                        }
                        space.width = space.width.max(0.0);
                    }
                    if !inputs.vertical_enabled && height_constrained {
                        space.height = max_size.height - insets.vertical();
                        if show_horizontal {
                            space.height -= self.horz_bar_height;
                        }
                        space.height = space.height.max(0.0);
                    }
                    content.calc_preferred_size(space)?
                }
                None => Size::ZERO,
            };

            preferred = content_size + insets;
            show_horizontal = false;
            show_vertical = false;

            // Without scrolling an oversized content is reported as is.
            if inputs.horizontal_enabled && width_constrained && Dip(preferred.width) > max_size.width {
                preferred.width = max_size.width;
                preferred.height += self.horz_bar_height;
                show_horizontal = true;
            }
            if inputs.vertical_enabled && height_constrained && Dip(preferred.height) > max_size.height {
                preferred.height = max_size.height;
                preferred.width += self.vert_bar_width;
                show_vertical = true;

                if inputs.horizontal_enabled && width_constrained && Dip(preferred.width) > max_size.width {
                    preferred.width = max_size.width;
                    show_horizontal = true;
                }
            }

            preferred.apply_minimum(scroll_view.preferred_size_minimum());
            preferred.apply_maximum(scroll_view.preferred_size_maximum());

            let content_space = preferred - insets;
            let width_clipped = !show_horizontal && Dip(content_space.width) < content_size.width;
            let height_clipped = !show_vertical && Dip(content_space.height) < content_size.height;

            let rerun = pass == 0
                && inputs.content.is_some()
                && ((width_clipped && show_vertical) || (height_clipped && show_horizontal));
            if !rerun {
                break;
            }
        }
        Ok(preferred)
    }
}
