//! A backend without a platform.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use boden_core::logging::targets;
use boden_core::{
    BodenError, Dip, Rect, Result, RoundType, Size, UiLength, UiMargin, UiUnit,
};
use parking_lot::Mutex;

use crate::config::HeadlessConfig;
use crate::context::UiContext;
use crate::layout::linear;
use crate::view::View;
use crate::view::alignment::{HorizontalAlignment, VerticalAlignment};
use crate::view::core::{InvalidateReason, UiProvider, ViewCore, WindowCore};
use crate::view::kind::ViewKind;
use crate::view::tree::ViewId;
use crate::widgets::{
    ScrollLayout, ScrollViewLayoutHelper, default_window_auto_size,
    default_window_calc_preferred_size, default_window_center, default_window_layout,
};

/// What a headless core realizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreRole {
    Control,
    Container,
    Scroll,
    Window,
}

impl CoreRole {
    fn of(kind: &ViewKind) -> Self {
        match kind {
            ViewKind::Control(_) => Self::Control,
            ViewKind::LinearLayout(_) => Self::Container,
            ViewKind::ScrollView(_) => Self::Scroll,
            ViewKind::Window(_) => Self::Window,
        }
    }

    fn holds_children(self) -> bool {
        self != Self::Control
    }
}

/// Operations a failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreOperation {
    CalcPreferredSize,
    Layout,
    AutoSize,
    Center,
}

/// Calls a headless core has received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreStats {
    pub calc_preferred_size_calls: usize,
    pub layout_calls: usize,
    pub invalidate_reasons: Vec<InvalidateReason>,
    pub need_layout_reasons: Vec<InvalidateReason>,
    pub child_invalidations: usize,
    pub mirror_calls: usize,
    pub added_children: usize,
    pub moves: usize,
    pub auto_size_calls: usize,
    pub center_calls: usize,
    /// Bounds applied by the last `adjust_and_set_bounds`.
    pub bounds: Option<Rect>,
    /// Result of the last scroll view layout.
    pub scroll_layout: Option<ScrollLayout>,
}

/// Creates [`HeadlessViewCore`]s and keeps track of them.
pub struct HeadlessUiProvider {
    config: HeadlessConfig,
    cores: Mutex<HashMap<ViewId, Weak<HeadlessViewCore>>>,
}

impl HeadlessUiProvider {
    pub fn new(config: HeadlessConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            cores: Mutex::new(HashMap::new()),
        })
    }

    /// A provider with the metrics configured for `context`.
    pub fn for_context(context: &UiContext) -> Arc<Self> {
        Self::new(context.config().headless.clone())
    }

    pub fn config(&self) -> &HeadlessConfig {
        &self.config
    }

    /// The live core this provider created for `view`.
    pub fn core_of(&self, view: &View) -> Option<Arc<HeadlessViewCore>> {
        self.cores.lock().get(&view.id())?.upgrade()
    }

    /// Number of cores created and not yet dropped.
    pub fn live_cores(&self) -> usize {
        let mut cores = self.cores.lock();
        cores.retain(|_, core| core.strong_count() > 0);
        cores.len()
    }
}

impl UiProvider for HeadlessUiProvider {
    fn name(&self) -> &str {
        "headless"
    }

    fn create_view_core(&self, view: &Arc<View>) -> Result<Arc<dyn ViewCore>> {
        let role = CoreRole::of(view.kind());
        let core = Arc::new(HeadlessViewCore {
            view: Arc::downgrade(view),
            id: view.id(),
            role,
            config: self.config.clone(),
            stats: Mutex::new(CoreStats::default()),
            failures: Mutex::new(HashSet::new()),
            disposed: AtomicBool::new(false),
        });
        self.cores.lock().insert(view.id(), Arc::downgrade(&core));
        tracing::trace!(target: targets::BACKEND, id = ?view.id(), ?role, "headless core created");
        Ok(core)
    }
}

impl std::fmt::Debug for HeadlessUiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessUiProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// The core of one view in the headless backend.
pub struct HeadlessViewCore {
    view: Weak<View>,
    id: ViewId,
    role: CoreRole,
    config: HeadlessConfig,
    stats: Mutex<CoreStats>,
    failures: Mutex<HashSet<CoreOperation>>,
    disposed: AtomicBool,
}

impl HeadlessViewCore {
    pub fn role(&self) -> CoreRole {
        self.role
    }

    pub fn stats(&self) -> CoreStats {
        self.stats.lock().clone()
    }

    pub fn reset_stats(&self) {
        *self.stats.lock() = CoreStats::default();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Make `operation` fail with a programming error until cleared.
    pub fn inject_failure(&self, operation: CoreOperation, enabled: bool) {
        let mut failures = self.failures.lock();
        if enabled {
            failures.insert(operation);
        } else {
            failures.remove(&operation);
        }
    }

    fn check_failure(&self, operation: CoreOperation) -> Result<()> {
        if self.failures.lock().contains(&operation) {
            return Err(BodenError::programming(format!(
                "injected {operation:?} failure in view {:?}",
                self.id
            )));
        }
        Ok(())
    }

    fn scroll_helper(&self) -> ScrollViewLayoutHelper {
        ScrollViewLayoutHelper::new(
            self.config.vertical_scrollbar_width,
            self.config.horizontal_scrollbar_height,
        )
    }

    fn window_content_area(&self, window: &View) -> Rect {
        let inner = window.size() - self.config.window_border;
        Rect::new(0.0, 0.0, inner.width.max(0.0), inner.height.max(0.0))
    }

    /// Text extent with the fixed metrics: every character is
    /// `char_width` wide, lines wrap greedily at word boundaries.
    fn measure_text(&self, view: &View, available_space: Size) -> Result<Size> {
        let text = view
            .kind()
            .as_control()
            .map(|state| state.text.get())
            .unwrap_or_default();
        let padding = view.padding_dips()?;

        let mut wrap_width = view.preferred_size_hint().width;
        if available_space.width.is_finite() {
            wrap_width = wrap_width.min(available_space.width);
        }
        let max_chars = wrap_width
            .is_finite()
            .then(|| (((wrap_width - padding.horizontal()) / self.config.char_width).floor().max(1.0)) as usize);

        let lines = wrap_lines(&text, max_chars);
        let widest = lines.iter().copied().max().unwrap_or(0);
        let content = Size::new(
            widest as f64 * self.config.char_width,
            lines.len() as f64 * self.config.line_height,
        );
        Ok(content + padding)
    }

    fn with_view<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Arc<View>) -> R,
    {
        self.view.upgrade().map(|view| f(&view))
    }
}

/// Line lengths in characters after greedy wrapping at `max_chars`. Words
/// longer than a line overflow it.
fn wrap_lines(text: &str, max_chars: Option<usize>) -> Vec<usize> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(max) = max_chars else {
            lines.push(paragraph.chars().count());
            continue;
        };
        let mut current: Option<usize> = None;
        for word in paragraph.split(' ') {
            let len = word.chars().count();
            current = match current {
                None => Some(len),
                Some(used) if used + 1 + len <= max => Some(used + 1 + len),
                Some(used) => {
                    lines.push(used);
                    Some(len)
                }
            };
        }
        lines.push(current.unwrap_or(0));
    }
    lines
}

impl ViewCore for HeadlessViewCore {
    fn set_visible(&self, _visible: bool) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_margin(&self, _margin: UiMargin) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_padding(&self, _padding: Option<UiMargin>) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_horizontal_alignment(&self, _alignment: HorizontalAlignment) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_vertical_alignment(&self, _alignment: VerticalAlignment) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_preferred_size_hint(&self, _hint: Size) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_preferred_size_minimum(&self, _minimum: Size) {
        self.stats.lock().mirror_calls += 1;
    }

    fn set_preferred_size_maximum(&self, _maximum: Size) {
        self.stats.lock().mirror_calls += 1;
    }

    fn calc_preferred_size(&self, available_space: Size) -> Result<Size> {
        self.stats.lock().calc_preferred_size_calls += 1;
        self.check_failure(CoreOperation::CalcPreferredSize)?;
        let Some(view) = self.view.upgrade() else {
            return Ok(Size::ZERO);
        };
        match self.role {
            CoreRole::Control => self.measure_text(&view, available_space),
            CoreRole::Container => linear::calc_container_preferred_size(&view, available_space),
            CoreRole::Scroll => self.scroll_helper().calc_preferred_size(&view, available_space),
            CoreRole::Window => default_window_calc_preferred_size(
                &view,
                available_space,
                self.config.window_border,
                self.config.min_window_size,
            ),
        }
    }

    fn adjust_bounds(&self, requested: Rect, position_round: RoundType, size_round: RoundType) -> Rect {
        Dip::pixel_align_rect(requested, self.config.pixels_per_dip, position_round, size_round)
    }

    fn adjust_and_set_bounds(&self, requested: Rect) -> Rect {
        let bounds = self.adjust_bounds(requested, RoundType::Nearest, RoundType::Nearest);
        self.stats.lock().bounds = Some(bounds);
        bounds
    }

    fn invalidate_sizing_info(&self, reason: InvalidateReason) {
        self.stats.lock().invalidate_reasons.push(reason);
        let holds_children = self.role.holds_children();
        self.with_view(|view| {
            let coordinator = view.context().coordinator();
            coordinator.request_sizing_update(view);
            // Child placement depends on the same inputs as the size.
            if holds_children {
                coordinator.request_layout(view);
            }
        });
    }

    fn need_layout(&self, reason: InvalidateReason) {
        self.stats.lock().need_layout_reasons.push(reason);
        self.with_view(|view| view.context().coordinator().request_layout(view));
    }

    fn child_sizing_info_invalidated(&self, _child: &Arc<View>) {
        self.stats.lock().child_invalidations += 1;
        if self.role.holds_children() {
            self.with_view(|view| {
                view.invalidate_sizing_info(InvalidateReason::ChildSizingInfoInvalidated);
                view.need_layout(InvalidateReason::ChildSizingInfoInvalidated);
            });
        }
    }

    fn ui_length_to_dips(&self, length: UiLength) -> Result<f64> {
        match length.unit {
            UiUnit::None => Ok(0.0),
            UiUnit::Dip => Ok(length.value),
            UiUnit::Em => Ok(length.value * self.config.em_dips),
            UiUnit::Sem => Ok(length.value * self.config.sem_dips),
            // `UiUnit` is non-exhaustive.
            other => Err(BodenError::invalid_argument(format!(
                "unsupported length unit {other:?}"
            ))),
        }
    }

    fn layout(&self) -> Result<()> {
        self.stats.lock().layout_calls += 1;
        self.check_failure(CoreOperation::Layout)?;
        let Some(view) = self.view.upgrade() else {
            return Ok(());
        };
        match self.role {
            CoreRole::Control => Ok(()),
            CoreRole::Container => linear::layout_children(&view),
            CoreRole::Scroll => {
                let layout = self.scroll_helper().calc_layout(&view, view.size())?;
                self.stats.lock().scroll_layout = Some(layout);
                match view.child_views().into_iter().next() {
                    Some(content) => content
                        .adjust_and_set_bounds(layout.content_view_bounds)
                        .map(|_| ()),
                    None => Ok(()),
                }
            }
            CoreRole::Window => default_window_layout(&view, self.window_content_area(&view)),
        }
    }

    fn add_child_ui_element(&self, _child: &Arc<dyn ViewCore>) -> Result<()> {
        if !self.role.holds_children() {
            return Err(BodenError::programming(format!(
                "headless control {:?} cannot contain child elements",
                self.id
            )));
        }
        self.stats.lock().added_children += 1;
        Ok(())
    }

    /// Headless cores have no native parent; they can join any realized
    /// parent.
    fn can_move_to_parent_view(&self, parent: &Arc<View>) -> bool {
        parent.view_core().is_some()
    }

    fn move_to_parent_view(&self, _parent: &Arc<View>) -> Result<()> {
        self.stats.lock().moves += 1;
        Ok(())
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        tracing::trace!(target: targets::BACKEND, id = ?self.id, "headless core disposed");
    }

    fn as_window_core(&self) -> Option<&dyn WindowCore> {
        (self.role == CoreRole::Window).then_some(self as &dyn WindowCore)
    }
}

impl WindowCore for HeadlessViewCore {
    fn auto_size(&self) -> Result<()> {
        self.stats.lock().auto_size_calls += 1;
        self.check_failure(CoreOperation::AutoSize)?;
        match self.view.upgrade() {
            Some(view) => default_window_auto_size(&view, self.config.screen_area.size()),
            None => Ok(()),
        }
    }

    fn center(&self) -> Result<()> {
        self.stats.lock().center_calls += 1;
        self.check_failure(CoreOperation::Center)?;
        match self.view.upgrade() {
            Some(view) => default_window_center(&view, self.config.screen_area),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for HeadlessViewCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessViewCore")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_lines() {
        assert_eq!(wrap_lines("hello world", None), vec![11]);
        assert_eq!(wrap_lines("hello world", Some(8)), vec![5, 5]);
        assert_eq!(wrap_lines("hello world", Some(11)), vec![11]);
        assert_eq!(wrap_lines("a\nbb", None), vec![1, 2]);
        assert_eq!(wrap_lines("", Some(4)), vec![0]);
        // Overlong words overflow.
        assert_eq!(wrap_lines("abcdefgh ij", Some(4)), vec![8, 2]);
    }

    #[test]
    fn test_em_resolution() {
        let context = UiContext::new();
        let provider = HeadlessUiProvider::for_context(&context);
        let view = crate::widgets::TextView::new(&context);
        let core = provider.create_view_core(view.view()).unwrap();

        assert_eq!(core.ui_length_to_dips(UiLength::em(2.0)).unwrap(), 46.0);
        assert_eq!(core.ui_length_to_dips(UiLength::sem(0.5)).unwrap(), 10.0);
        assert_eq!(core.ui_length_to_dips(UiLength::dip(7.0)).unwrap(), 7.0);
        assert_eq!(core.ui_length_to_dips(UiLength::NONE).unwrap(), 0.0);
    }
}
