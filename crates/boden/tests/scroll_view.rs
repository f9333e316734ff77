//! Scroll view sizing and the scroll bar fixed point.

mod common;

use boden::widgets::{ScrollView, ScrollViewLayoutHelper};
use boden::{Dip, Rect, Size, UiLength, UiMargin};
use common::Fixture;
use proptest::prelude::*;

/// A realized scroll view whose content prefers `content` DIPs.
fn scroll_with_content(fx: &Fixture, content: Size) -> ScrollView {
    let scroll = ScrollView::new(&fx.context);
    let inner = fx.fixed(content.width, content.height);
    scroll.set_content_view(Some(inner.view())).unwrap();
    fx.show(scroll.view(), Size::new(500.0, 500.0));
    scroll
}

#[test]
fn both_scroll_bars_fixed_point() {
    let fx = Fixture::new();
    let scroll = scroll_with_content(&fx, Size::new(220.0, 220.0));
    scroll.set_horizontal_scrolling_enabled(true);
    scroll.set_vertical_scrolling_enabled(true);

    let helper = ScrollViewLayoutHelper::new(15.0, 15.0);
    let layout = helper.calc_layout(&scroll, Size::new(210.0, 210.0)).unwrap();

    assert!(layout.horizontal_scrollbar_visible);
    assert!(layout.vertical_scrollbar_visible);
    assert_eq!(layout.viewport_size, Size::new(195.0, 195.0));
    assert_eq!(layout.scrolled_area_size, Size::new(220.0, 220.0));
    assert_eq!(layout.content_view_bounds, Rect::new(0.0, 0.0, 220.0, 220.0));
}

#[test]
fn vertical_bar_triggers_horizontal_bar() {
    let fx = Fixture::new();
    // Fits horizontally until the vertical bar takes 15 DIPs.
    let scroll = scroll_with_content(&fx, Size::new(200.0, 400.0));
    scroll.set_horizontal_scrolling_enabled(true);

    let helper = ScrollViewLayoutHelper::new(15.0, 15.0);
    let layout = helper.calc_layout(&scroll, Size::new(210.0, 210.0)).unwrap();

    assert!(layout.vertical_scrollbar_visible);
    assert!(layout.horizontal_scrollbar_visible);
    assert_eq!(layout.viewport_size, Size::new(195.0, 195.0));
}

#[test]
fn content_smaller_than_viewport_is_enlarged() {
    let fx = Fixture::new();
    let scroll = scroll_with_content(&fx, Size::new(50.0, 60.0));
    scroll.set_padding(Some(UiMargin::uniform(UiLength::dip(5.0))));

    let helper = ScrollViewLayoutHelper::new(15.0, 15.0);
    let layout = helper.calc_layout(&scroll, Size::new(210.0, 210.0)).unwrap();

    assert!(!layout.horizontal_scrollbar_visible);
    assert!(!layout.vertical_scrollbar_visible);
    assert_eq!(layout.scrolled_area_size, Size::new(210.0, 210.0));
    assert_eq!(layout.content_view_bounds, Rect::new(5.0, 5.0, 200.0, 200.0));
}

#[test]
fn disabled_axis_clips_instead_of_scrolling() {
    let fx = Fixture::new();
    let scroll = scroll_with_content(&fx, Size::new(400.0, 100.0));
    assert!(!scroll.horizontal_scrolling_enabled());
    assert!(scroll.vertical_scrolling_enabled());

    let helper = ScrollViewLayoutHelper::new(15.0, 15.0);
    let layout = helper.calc_layout(&scroll, Size::new(210.0, 210.0)).unwrap();

    assert!(!layout.horizontal_scrollbar_visible);
    assert!(!layout.vertical_scrollbar_visible);
    assert_eq!(layout.scrolled_area_size, Size::new(210.0, 210.0));
}

#[test]
fn preferred_size_adds_shown_bars() {
    let fx = Fixture::new();
    let scroll = scroll_with_content(&fx, Size::new(100.0, 400.0));
    let helper = ScrollViewLayoutHelper::new(15.0, 15.0);

    // Unconstrained: the content as is.
    assert_eq!(
        helper.calc_preferred_size(&scroll, Size::NONE).unwrap(),
        Size::new(100.0, 400.0)
    );

    // Too short: the vertical bar appears and widens the view.
    assert_eq!(
        helper
            .calc_preferred_size(&scroll, Size::new(300.0, 200.0))
            .unwrap(),
        Size::new(115.0, 200.0)
    );
}

#[test]
fn realized_scroll_view_lays_out_its_content() {
    let fx = Fixture::new();
    let scroll = ScrollView::new(&fx.context);
    let inner = fx.fixed(100.0, 900.0);
    scroll.set_content_view(Some(inner.view())).unwrap();
    fx.show(scroll.view(), Size::new(300.0, 300.0));

    let layout = fx.core(&scroll).stats().scroll_layout.unwrap();
    assert!(layout.vertical_scrollbar_visible);
    assert!(!layout.horizontal_scrollbar_visible);
    assert_eq!(layout.viewport_size, Size::new(285.0, 300.0));
    // Enlarged to the viewport width, scrolled vertically.
    assert_eq!(inner.bounds(), Rect::new(0.0, 0.0, 285.0, 900.0));
}

#[test]
fn replacing_the_content_view() {
    let fx = Fixture::new();
    let scroll = scroll_with_content(&fx, Size::new(10.0, 10.0));
    let first = scroll.content_view().unwrap();

    let second = fx.fixed(20.0, 20.0);
    scroll.set_content_view(Some(second.view())).unwrap();
    assert!(first.parent_view().is_none());
    assert!(std::sync::Arc::ptr_eq(&scroll.content_view().unwrap(), second.view()));
    assert_eq!(scroll.child_views().len(), 1);

    scroll.set_content_view(None).unwrap();
    assert!(scroll.content_view().is_none());
}

fn thickness() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), 1.0f64..40.0, 100.0f64..400.0]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// After at most two passes the bar visibility agrees with the rule
    /// "a bar is shown iff scrolling is enabled and the content overflows
    /// the final viewport", even for bars thicker than the viewport.
    #[test]
    fn scroll_bars_settle_in_two_passes(
        content_w in 0u32..600,
        content_h in 0u32..600,
        viewport_w in 1u32..500,
        viewport_h in 1u32..500,
        padding in 0u32..20,
        vert_bar_width in thickness(),
        horz_bar_height in thickness(),
        horizontal in any::<bool>(),
        vertical in any::<bool>(),
    ) {
        let fx = Fixture::new();
        let scroll = scroll_with_content(&fx, Size::new(content_w as f64, content_h as f64));
        scroll.set_padding(Some(UiMargin::uniform(UiLength::dip(padding as f64))));
        scroll.set_horizontal_scrolling_enabled(horizontal);
        scroll.set_vertical_scrolling_enabled(vertical);

        let viewport = Size::new(viewport_w as f64, viewport_h as f64);
        let helper = ScrollViewLayoutHelper::new(vert_bar_width, horz_bar_height);
        let layout = helper.calc_layout(&scroll, viewport).unwrap();

        let needed = Size::new(
            (content_w + 2 * padding) as f64,
            (content_h + 2 * padding) as f64,
        );
        let final_viewport = layout.viewport_size;

        prop_assert_eq!(
            layout.horizontal_scrollbar_visible,
            horizontal && Dip(needed.width) > final_viewport.width
        );
        prop_assert_eq!(
            layout.vertical_scrollbar_visible,
            vertical && Dip(needed.height) > final_viewport.height
        );

        let mut expected = viewport;
        if layout.horizontal_scrollbar_visible {
            expected.height -= horz_bar_height;
        }
        if layout.vertical_scrollbar_visible {
            expected.width -= vert_bar_width;
        }
        prop_assert_eq!(final_viewport, expected);
    }
}
