//! The view side of the layout protocol: preferred size caching, size
//! constraints, invalidation fan-out and bounds.

mod common;

use std::sync::Arc;

use boden::backend::{CoreStats, HeadlessUiProvider};
use boden::widgets::{LinearLayoutView, TextView, Window};
use boden::{
    BodenError, COMPONENT_NONE, HorizontalAlignment, InvalidateReason, Rect, RoundType, Size,
    UiContext, UiLength, UiMargin, UiProvider, VerticalAlignment, View, ViewCore, ViewId,
};
use common::Fixture;
use parking_lot::Mutex;
use proptest::prelude::*;

/// A realized column holding one text view.
fn column_with_text(fx: &Fixture, text: &str) -> (LinearLayoutView, TextView) {
    let column = LinearLayoutView::new(&fx.context);
    let label = TextView::with_text(&fx.context, text);
    column.add_child(&label).unwrap();
    fx.show(column.view(), Size::new(400.0, 300.0));
    (column, label)
}

fn calc_calls(fx: &Fixture, view: &View) -> usize {
    fx.core(view).stats().calc_preferred_size_calls
}

#[test]
fn calc_preferred_size_is_cached() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "hello");
    label.invalidate_sizing_info(InvalidateReason::CustomDataChanged);
    fx.core(&label).reset_stats();

    let first = label.calc_preferred_size(Size::NONE).unwrap();
    let second = label.calc_preferred_size(Size::NONE).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.width, 5.0 * 9.75);
    assert_eq!(calc_calls(&fx, &label), 1);
}

#[test]
fn cache_serves_larger_requests_only() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "hello");
    label.invalidate_sizing_info(InvalidateReason::CustomDataChanged);
    fx.core(&label).reset_stats();

    let preferred = label.calc_preferred_size(Size::NONE).unwrap();
    assert_eq!(calc_calls(&fx, &label), 1);

    // No smaller than the cached result on any axis: served from the cache.
    assert_eq!(
        label.calc_preferred_size(Size::new(100.0, 100.0)).unwrap(),
        preferred
    );
    assert_eq!(
        label
            .calc_preferred_size(Size::new(preferred.width, COMPONENT_NONE))
            .unwrap(),
        preferred
    );
    assert_eq!(calc_calls(&fx, &label), 1);

    // Narrower than the cached width: recomputed.
    label
        .calc_preferred_size(Size::new(40.0, COMPONENT_NONE))
        .unwrap();
    assert_eq!(calc_calls(&fx, &label), 2);
}

#[test]
fn cache_invalidation_round_trip() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "hello");
    label.set_padding(Some(UiMargin::uniform(UiLength::dip(2.0))));
    fx.settle();
    fx.core(&label).reset_stats();

    let before = label.calc_preferred_size(Size::NONE).unwrap();
    assert_eq!(calc_calls(&fx, &label), 0, "the flush left a cached value");

    label.set_padding(Some(UiMargin::uniform(UiLength::dip(10.0))));
    let after = label.calc_preferred_size(Size::NONE).unwrap();

    assert_ne!(before, after);
    assert_eq!(after.width, before.width + 16.0);
    assert_eq!(calc_calls(&fx, &label), 1);
}

#[test]
fn maximum_beats_minimum_beats_hint() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "hello world");

    label.set_preferred_size_hint(Size::new(60.0, COMPONENT_NONE));
    let hinted = label.calc_preferred_size(Size::NONE).unwrap();
    // The hint only made the text wrap.
    assert_eq!(hinted.width, 5.0 * 9.75);

    label.set_preferred_size_minimum(Size::new(500.0, 500.0));
    assert_eq!(
        label.calc_preferred_size(Size::NONE).unwrap(),
        Size::new(500.0, 500.0)
    );

    label.set_preferred_size_maximum(Size::new(100.0, 10.0));
    assert_eq!(
        label.calc_preferred_size(Size::NONE).unwrap(),
        Size::new(100.0, 10.0)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn maximum_always_wins(
        min_w in 0.0f64..800.0,
        min_h in 0.0f64..800.0,
        max_w in 0.0f64..800.0,
        max_h in 0.0f64..800.0,
        hint_w in 1.0f64..800.0,
        text in "[a-z ]{0,40}",
    ) {
        let fx = Fixture::new();
        let (_column, label) = column_with_text(&fx, &text);
        label.set_preferred_size_hint(Size::new(hint_w, COMPONENT_NONE));
        label.set_preferred_size_minimum(Size::new(min_w, min_h));
        label.set_preferred_size_maximum(Size::new(max_w, max_h));

        let preferred = label.calc_preferred_size(Size::NONE).unwrap();
        prop_assert!(!preferred.has_nan());
        prop_assert!(preferred.width <= max_w);
        prop_assert!(preferred.height <= max_h);
        if min_w <= max_w {
            prop_assert!(preferred.width >= min_w);
        }
    }
}

// ============================================================================
// Influence table
// ============================================================================

struct Counts {
    own: CoreStats,
    parent: CoreStats,
}

/// Change one property of a realized child and report the invalidation
/// calls its core and its parent's core received.
fn influence_of(change: impl FnOnce(&Arc<View>)) -> Counts {
    let fx = Fixture::new();
    let column = LinearLayoutView::new(&fx.context);
    let child = LinearLayoutView::new(&fx.context);
    column.add_child(&child).unwrap();
    fx.show(column.view(), Size::new(300.0, 300.0));
    fx.reset_stats(&[column.view(), child.view()]);

    change(child.view());

    Counts {
        own: fx.core(&child).stats(),
        parent: fx.core(&column).stats(),
    }
}

const OWN: InvalidateReason = InvalidateReason::StandardPropertyChanged;
const CHILD: InvalidateReason = InvalidateReason::StandardChildPropertyChanged;

fn assert_influence(
    counts: &Counts,
    own_size: bool,
    own_layout: bool,
    parent_size: bool,
    parent_layout: bool,
) {
    let expect = |on: bool, reason| if on { vec![reason] } else { vec![] };
    assert_eq!(counts.own.invalidate_reasons, expect(own_size, OWN));
    assert_eq!(counts.own.need_layout_reasons, expect(own_layout, OWN));
    assert_eq!(counts.parent.invalidate_reasons, expect(parent_size, CHILD));
    assert_eq!(counts.parent.need_layout_reasons, expect(parent_layout, CHILD));
}

#[test]
fn influence_of_visible() {
    let counts = influence_of(|v| v.set_visible(false));
    assert_influence(&counts, false, false, false, false);
    assert_eq!(counts.own.mirror_calls, 1);
}

#[test]
fn influence_of_margin() {
    let counts = influence_of(|v| v.set_margin(UiMargin::uniform(UiLength::dip(3.0))));
    assert_influence(&counts, false, false, true, false);
}

#[test]
fn influence_of_padding() {
    let counts = influence_of(|v| v.set_padding(Some(UiMargin::uniform(UiLength::em(1.0)))));
    assert_influence(&counts, true, true, true, false);
}

#[test]
fn influence_of_alignment() {
    let counts = influence_of(|v| v.set_horizontal_alignment(HorizontalAlignment::Right));
    assert_influence(&counts, false, false, false, true);

    let counts = influence_of(|v| v.set_vertical_alignment(VerticalAlignment::Expand));
    assert_influence(&counts, false, false, false, true);
}

#[test]
fn influence_of_size_constraints() {
    let size = Size::new(10.0, 10.0);
    let counts = influence_of(|v| v.set_preferred_size_minimum(size));
    assert_influence(&counts, true, false, true, false);

    let counts = influence_of(|v| v.set_preferred_size_maximum(size));
    assert_influence(&counts, true, false, true, false);

    let counts = influence_of(|v| v.set_preferred_size_hint(size));
    assert_influence(&counts, true, false, true, false);
}

#[test]
fn influence_of_bounds() {
    let counts = influence_of(|v| {
        v.adjust_and_set_bounds(Rect::new(1.0, 2.0, 30.0, 40.0)).unwrap();
    });
    assert_influence(&counts, false, true, false, false);
}

#[test]
fn unchanged_value_fires_nothing() {
    let counts = influence_of(|v| v.set_margin(UiMargin::NONE));
    assert_influence(&counts, false, false, false, false);
    assert_eq!(counts.own.mirror_calls, 0);
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn adjust_bounds_rounds_to_physical_pixels() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "x");
    // Three pixels per DIP.
    let requested = Rect::new(1.1, 1.2, 10.1, 10.2);

    let down = label.adjust_bounds(requested, RoundType::Down, RoundType::Down);
    let nearest = label.adjust_bounds(requested, RoundType::Nearest, RoundType::Nearest);
    let up = label.adjust_bounds(requested, RoundType::Up, RoundType::Up);

    assert_eq!(down, Rect::new(1.0, 1.0, 10.0, 10.0));
    assert_eq!(up, Rect::new(4.0 / 3.0, 4.0 / 3.0, 31.0 / 3.0, 31.0 / 3.0));
    assert!(down.x <= nearest.x && nearest.x <= up.x);
    assert!(down.width <= nearest.width && nearest.width <= up.width);

    // Pure: nothing was committed.
    assert_ne!(label.position().x, down.x);
}

#[test]
fn adjust_and_set_bounds_commits_nearest() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "x");

    let applied = label
        .adjust_and_set_bounds(Rect::new(1.1, 1.2, 10.1, 10.2))
        .unwrap();
    assert_eq!(applied, Rect::new(1.0, 4.0 / 3.0, 10.0, 31.0 / 3.0));
    assert_eq!(label.bounds(), applied);
    assert_eq!(fx.core(&label).stats().bounds, Some(applied));
}

#[test]
fn adjust_and_set_bounds_is_ui_thread_only() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "x");

    let view = label.view().clone();
    let result = std::thread::spawn(move || view.adjust_and_set_bounds(Rect::ZERO))
        .join()
        .unwrap();
    assert!(result.unwrap_err().is_programming_error());
}

#[test]
fn unrealized_views_measure_zero() {
    let fx = Fixture::new();
    let label = TextView::with_text(&fx.context, "not shown");

    assert!(label.view_core().is_none());
    assert_eq!(label.calc_preferred_size(Size::NONE).unwrap(), Size::ZERO);
    assert_eq!(
        label.adjust_bounds(Rect::new(0.5, 0.5, 1.5, 1.5), RoundType::Up, RoundType::Up),
        Rect::new(0.5, 0.5, 1.5, 1.5)
    );
}

// ============================================================================
// Lengths
// ============================================================================

#[test]
fn ui_lengths_resolve_through_the_core() {
    let fx = Fixture::new();
    let (_column, label) = column_with_text(&fx, "x");

    assert_eq!(label.ui_length_to_dips(UiLength::em(2.0)).unwrap(), 46.0);
    assert_eq!(label.ui_length_to_dips(UiLength::sem(1.0)).unwrap(), 20.0);
    assert_eq!(label.ui_length_to_dips("4dip".parse().unwrap()).unwrap(), 4.0);

    let margin = label
        .ui_margin_to_dip_margin(UiMargin::symmetric(UiLength::em(1.0), UiLength::NONE))
        .unwrap();
    assert_eq!(margin, boden::Margin::new(0.0, 23.0, 0.0, 23.0));

    let err = "3px".parse::<UiLength>().unwrap_err();
    assert!(matches!(err, BodenError::InvalidArgument(_)));
}

#[test]
fn em_lengths_need_a_core() {
    let fx = Fixture::new();
    let label = TextView::new(&fx.context);
    assert_eq!(label.ui_length_to_dips(UiLength::em(2.0)).unwrap(), 0.0);
    assert_eq!(label.ui_length_to_dips(UiLength::dip(2.0)).unwrap(), 2.0);
}

// ============================================================================
// Broken cores
// ============================================================================

/// Forwards to a headless core but answers every measurement with `answer`.
struct FixedAnswerCore {
    inner: Arc<dyn ViewCore>,
    answer: Arc<Mutex<Size>>,
}

impl ViewCore for FixedAnswerCore {
    fn calc_preferred_size(&self, _available_space: Size) -> boden::Result<Size> {
        Ok(*self.answer.lock())
    }

    fn adjust_bounds(&self, requested: Rect, position_round: RoundType, size_round: RoundType) -> Rect {
        self.inner.adjust_bounds(requested, position_round, size_round)
    }

    fn adjust_and_set_bounds(&self, requested: Rect) -> Rect {
        self.inner.adjust_and_set_bounds(requested)
    }

    fn invalidate_sizing_info(&self, reason: InvalidateReason) {
        self.inner.invalidate_sizing_info(reason);
    }

    fn need_layout(&self, reason: InvalidateReason) {
        self.inner.need_layout(reason);
    }

    fn child_sizing_info_invalidated(&self, child: &Arc<View>) {
        self.inner.child_sizing_info_invalidated(child);
    }

    fn ui_length_to_dips(&self, length: UiLength) -> boden::Result<f64> {
        self.inner.ui_length_to_dips(length)
    }
}

/// Realizes `target` with a [`FixedAnswerCore`], everything else headless.
struct FixedAnswerProvider {
    inner: Arc<HeadlessUiProvider>,
    target: ViewId,
    answer: Arc<Mutex<Size>>,
}

impl UiProvider for FixedAnswerProvider {
    fn name(&self) -> &str {
        "fixed-answer"
    }

    fn create_view_core(&self, view: &Arc<View>) -> boden::Result<Arc<dyn ViewCore>> {
        let inner = self.inner.create_view_core(view)?;
        if view.id() != self.target {
            return Ok(inner);
        }
        Ok(Arc::new(FixedAnswerCore {
            inner,
            answer: Arc::clone(&self.answer),
        }))
    }
}

#[test]
fn non_finite_core_answers_are_programming_errors() {
    let context = UiContext::new();
    let label = TextView::new(&context);
    let answer = Arc::new(Mutex::new(Size::new(f64::INFINITY, 10.0)));
    let provider = Arc::new(FixedAnswerProvider {
        inner: HeadlessUiProvider::for_context(&context),
        target: label.id(),
        answer: Arc::clone(&answer),
    });
    let window = Window::with_provider(&context, provider).unwrap();
    window.set_content_view(Some(label.view())).unwrap();

    // A finite maximum would hide the infinite width after clamping.
    label.set_preferred_size_maximum(Size::new(50.0, 50.0));
    let err = label.calc_preferred_size(Size::NONE).unwrap_err();
    assert!(matches!(err, BodenError::Programming(_)));

    *answer.lock() = Size::new(10.0, f64::NAN);
    let err = label.calc_preferred_size(Size::NONE).unwrap_err();
    assert!(matches!(err, BodenError::Programming(_)));

    *answer.lock() = Size::new(10.0, 10.0);
    assert_eq!(
        label.calc_preferred_size(Size::NONE).unwrap(),
        Size::new(10.0, 10.0)
    );
}
