//! Views and the view hierarchy.
//!
//! A [`View`] is a tree node holding the layout relevant properties of one
//! element and, while it is realized, a reference to its backend
//! [`ViewCore`]. Views are always handled through `Arc<View>`; parents own
//! their children and everything else refers to a view weakly.
//!
//! # Property changes
//!
//! Every layout relevant setter stores the value, mirrors it into the core
//! and applies the property's [`Influence`]. On a thread other than the UI
//! thread the value is stored immediately while mirroring and invalidation
//! are posted to the UI dispatcher.
//!
//! # Realization
//!
//! A view has a core exactly while it is attached, directly or through its
//! ancestors, to a window that has a [`UiProvider`]. Attaching a subtree to
//! a realized parent creates cores top-down; detaching disposes them.

pub mod alignment;
pub mod core;
pub mod influence;
pub mod kind;
pub mod property;
pub mod sizing;
pub mod tree;

use std::sync::{Arc, Weak};

use boden_core::logging::targets;
use boden_core::{
    BodenError, Margin, Point, Property, ReadOnlyProperty, Rect, Result, RoundType, Size,
    UiLength, UiMargin, UiUnit,
};
use parking_lot::Mutex;

use crate::context::UiContext;

use self::alignment::{HorizontalAlignment, VerticalAlignment};
use self::core::{InvalidateReason, UiProvider, ViewCore};
use self::influence::Influence;
use self::kind::ViewKind;
use self::property::ViewProperty;
use self::sizing::{PreferredSizeCache, SizingInfo};
use self::tree::ViewId;

#[derive(Default)]
struct SizingState {
    cache: PreferredSizeCache,
    info: Option<SizingInfo>,
}

/// A node of the view tree.
pub struct View {
    id: ViewId,
    context: Arc<UiContext>,
    kind: ViewKind,

    visible: ViewProperty<bool>,
    margin: ViewProperty<UiMargin>,
    padding: ViewProperty<Option<UiMargin>>,
    horizontal_alignment: ViewProperty<HorizontalAlignment>,
    vertical_alignment: ViewProperty<VerticalAlignment>,
    preferred_size_hint: ViewProperty<Size>,
    preferred_size_minimum: ViewProperty<Size>,
    preferred_size_maximum: ViewProperty<Size>,

    position: Property<Point>,
    size: Property<Size>,

    sizing: Mutex<SizingState>,
}

static_assertions::assert_impl_all!(View: Send, Sync);

impl View {
    /// Create a detached view of the given kind.
    pub fn new(context: &Arc<UiContext>, kind: ViewKind) -> Arc<Self> {
        let visible = !kind.is_window();
        let view = Arc::new_cyclic(|weak: &Weak<View>| View {
            id: context.tree().register(weak.clone()),
            context: Arc::clone(context),
            kind,
            visible: ViewProperty::new(visible, influence::VISIBLE),
            margin: ViewProperty::new(UiMargin::NONE, influence::MARGIN),
            padding: ViewProperty::new(None, influence::PADDING),
            horizontal_alignment: ViewProperty::new(
                HorizontalAlignment::default(),
                influence::ALIGNMENT,
            ),
            vertical_alignment: ViewProperty::new(
                VerticalAlignment::default(),
                influence::ALIGNMENT,
            ),
            preferred_size_hint: ViewProperty::new(Size::NONE, influence::PREFERRED_SIZE_CONSTRAINT),
            preferred_size_minimum: ViewProperty::new(
                Size::NONE,
                influence::PREFERRED_SIZE_CONSTRAINT,
            ),
            preferred_size_maximum: ViewProperty::new(
                Size::NONE,
                influence::PREFERRED_SIZE_CONSTRAINT,
            ),
            position: Property::new(Point::ZERO),
            size: Property::new(Size::ZERO),
            sizing: Mutex::new(SizingState::default()),
        });
        tracing::trace!(target: targets::VIEW, id = ?view.id, kind = view.kind.name(), "view created");
        view
    }

    #[inline]
    pub fn id(&self) -> ViewId {
        self.id
    }

    #[inline]
    pub fn context(&self) -> &Arc<UiContext> {
        &self.context
    }

    #[inline]
    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    // =========================================================================
    // Properties
    // =========================================================================

    pub fn visible(&self) -> bool {
        self.visible.get()
    }

    pub fn set_visible(self: &Arc<Self>, visible: bool) {
        self.update_property(
            &self.visible,
            visible,
            |core, v| core.set_visible(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    pub fn margin(&self) -> UiMargin {
        self.margin.get()
    }

    pub fn set_margin(self: &Arc<Self>, margin: UiMargin) {
        self.update_property(
            &self.margin,
            margin,
            |core, v| core.set_margin(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    /// The padding, or `None` for the backend default.
    pub fn padding(&self) -> Option<UiMargin> {
        self.padding.get()
    }

    pub fn set_padding(self: &Arc<Self>, padding: Option<UiMargin>) {
        self.update_property(
            &self.padding,
            padding,
            |core, v| core.set_padding(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment.get()
    }

    pub fn set_horizontal_alignment(self: &Arc<Self>, alignment: HorizontalAlignment) {
        self.update_property(
            &self.horizontal_alignment,
            alignment,
            |core, v| core.set_horizontal_alignment(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment.get()
    }

    pub fn set_vertical_alignment(self: &Arc<Self>, alignment: VerticalAlignment) {
        self.update_property(
            &self.vertical_alignment,
            alignment,
            |core, v| core.set_vertical_alignment(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    /// Advisory size handed to the core, for example a wrap width.
    pub fn preferred_size_hint(&self) -> Size {
        self.preferred_size_hint.get()
    }

    pub fn set_preferred_size_hint(self: &Arc<Self>, hint: Size) {
        self.update_property(
            &self.preferred_size_hint,
            hint,
            |core, v| core.set_preferred_size_hint(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    pub fn preferred_size_minimum(&self) -> Size {
        self.preferred_size_minimum.get()
    }

    pub fn set_preferred_size_minimum(self: &Arc<Self>, minimum: Size) {
        self.update_property(
            &self.preferred_size_minimum,
            minimum,
            |core, v| core.set_preferred_size_minimum(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    pub fn preferred_size_maximum(&self) -> Size {
        self.preferred_size_maximum.get()
    }

    pub fn set_preferred_size_maximum(self: &Arc<Self>, maximum: Size) {
        self.update_property(
            &self.preferred_size_maximum,
            maximum,
            |core, v| core.set_preferred_size_maximum(*v),
            InvalidateReason::StandardPropertyChanged,
        );
    }

    /// Position within the parent, set by layout.
    pub fn position(&self) -> Point {
        self.position.get()
    }

    /// Size, set by layout.
    pub fn size(&self) -> Size {
        self.size.get()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_position_size(self.position(), self.size())
    }

    pub fn position_property(&self) -> ReadOnlyProperty<'_, Point> {
        ReadOnlyProperty::new(&self.position)
    }

    pub fn size_property(&self) -> ReadOnlyProperty<'_, Size> {
        ReadOnlyProperty::new(&self.size)
    }

    /// The sizing result of the last coordinator pass, if one ran since the
    /// view was realized.
    pub fn sizing_info(&self) -> Option<SizingInfo> {
        self.sizing.lock().info
    }

    /// Store `value` and carry the change to the core and the hierarchy.
    pub(crate) fn update_property<T>(
        self: &Arc<Self>,
        property: &ViewProperty<T>,
        value: T,
        mirror: fn(&dyn ViewCore, &T),
        reason: InvalidateReason,
    ) where
        T: Clone + PartialEq + Send + 'static,
    {
        if !property.set(value.clone()) {
            return;
        }
        let influence = property.influence();
        self.run_on_ui_thread(move |view| {
            if let Some(core) = view.view_core() {
                mirror(core.as_ref(), &value);
            }
            view.apply_influence(influence, reason);
            Ok(())
        });
    }

    fn apply_influence(self: &Arc<Self>, influence: Influence, reason: InvalidateReason) {
        if influence.own_preferred_size {
            self.invalidate_sizing_info(reason);
        }
        if influence.own_layout {
            self.need_layout(reason);
        }
        if influence.touches_parent() {
            if let Some(parent) = self.parent_view() {
                if influence.parent_preferred_size {
                    parent.invalidate_sizing_info(InvalidateReason::StandardChildPropertyChanged);
                }
                if influence.parent_layout {
                    parent.need_layout(InvalidateReason::StandardChildPropertyChanged);
                }
            }
        }
    }

    /// Run `work` now when on the UI thread, otherwise post it. Posted work
    /// is dropped if the view dies first.
    fn run_on_ui_thread<F>(self: &Arc<Self>, work: F)
    where
        F: FnOnce(&Arc<View>) -> Result<()> + Send + 'static,
    {
        let dispatcher = self.context.dispatcher();
        if dispatcher.is_ui_thread() {
            if let Err(err) = work(self) {
                dispatcher.report_problem(err, format!("view {:?}", self.id));
            }
        } else {
            let weak = Arc::downgrade(self);
            dispatcher.post(move || match weak.upgrade() {
                Some(view) => work(&view),
                None => Ok(()),
            });
        }
    }

    // =========================================================================
    // Sizing and layout
    // =========================================================================

    /// The preferred size for `available_space`; pass [`Size::NONE`] for
    /// unconstrained space.
    ///
    /// The hint is passed to the core as advisory input; the minimum and
    /// then the maximum are applied to the core's answer, so the maximum
    /// wins any conflict. Results are cached until the next
    /// [`View::invalidate_sizing_info`].
    pub fn calc_preferred_size(&self, available_space: Size) -> Result<Size> {
        if let Some(hit) = self.sizing.lock().cache.get(available_space) {
            return Ok(hit);
        }
        let Some(core) = self.view_core() else {
            return Ok(Size::ZERO);
        };

        let mut preferred = core.calc_preferred_size(available_space)?;
        // Checked before clamping; a finite maximum would mask an infinite
        // answer.
        if !preferred.is_finite() {
            return Err(BodenError::programming(format!(
                "{} {:?} computed the non-finite preferred size {preferred} for {available_space}",
                self.kind.name(),
                self.id
            )));
        }
        preferred.apply_minimum(self.preferred_size_minimum());
        preferred.apply_maximum(self.preferred_size_maximum());

        self.sizing.lock().cache.store(available_space, preferred);
        Ok(preferred)
    }

    /// Map `requested` to bounds the backend can represent, without applying
    /// them.
    pub fn adjust_bounds(
        &self,
        requested: Rect,
        position_round: RoundType,
        size_round: RoundType,
    ) -> Rect {
        match self.view_core() {
            Some(core) => core.adjust_bounds(requested, position_round, size_round),
            None => requested,
        }
    }

    /// Apply bounds and return the bounds actually committed to
    /// [`View::position`] and [`View::size`].
    pub fn adjust_and_set_bounds(self: &Arc<Self>, requested: Rect) -> Result<Rect> {
        self.context
            .dispatcher()
            .affinity()
            .check("View::adjust_and_set_bounds")?;

        let bounds = match self.view_core() {
            Some(core) => core.adjust_and_set_bounds(requested),
            None => self.adjust_bounds(requested, RoundType::Nearest, RoundType::Nearest),
        };
        if !bounds.is_finite() {
            return Err(BodenError::programming(format!(
                "bounds of {} {:?} must be finite, got {bounds}",
                self.kind.name(),
                self.id
            )));
        }

        let moved = self.position.set(bounds.position());
        let resized = self.size.set(bounds.size());
        if moved || resized {
            tracing::trace!(target: targets::VIEW, id = ?self.id, %bounds, "bounds committed");
            self.apply_influence(influence::BOUNDS, InvalidateReason::StandardPropertyChanged);
        }
        Ok(bounds)
    }

    pub fn invalidate_sizing_info(&self, reason: InvalidateReason) {
        self.sizing.lock().cache.clear();
        if let Some(core) = self.view_core() {
            core.invalidate_sizing_info(reason);
        }
    }

    pub fn need_layout(&self, reason: InvalidateReason) {
        if let Some(core) = self.view_core() {
            core.need_layout(reason);
        }
    }

    /// Called by a child whose sizing info changed.
    pub fn child_sizing_info_invalidated(&self, child: &Arc<View>) {
        if let Some(core) = self.view_core() {
            core.child_sizing_info_invalidated(child);
        }
    }

    /// Recompute the unconstrained preferred size. When it changed, store
    /// it and tell the parent.
    pub fn update_sizing_info(self: &Arc<Self>) -> Result<()> {
        let info = SizingInfo {
            preferred_size: self.calc_preferred_size(Size::NONE)?,
        };
        let changed = {
            let mut sizing = self.sizing.lock();
            let changed = sizing.info != Some(info);
            sizing.info = Some(info);
            changed
        };
        if changed {
            tracing::trace!(
                target: targets::VIEW,
                id = ?self.id,
                preferred = %info.preferred_size,
                "sizing info changed"
            );
            if let Some(parent) = self.parent_view() {
                parent.child_sizing_info_invalidated(self);
            }
        }
        Ok(())
    }

    /// Lay out the children. Called by the coordinator.
    pub fn layout(&self) -> Result<()> {
        self.context.dispatcher().affinity().check("View::layout")?;
        match self.view_core() {
            Some(core) => core.layout(),
            None => Ok(()),
        }
    }

    /// Resolve a length in DIPs.
    pub fn ui_length_to_dips(&self, length: UiLength) -> Result<f64> {
        match length.unit {
            UiUnit::None => Ok(0.0),
            UiUnit::Dip => Ok(length.value),
            _ => match self.view_core() {
                Some(core) => core.ui_length_to_dips(length),
                None => Ok(0.0),
            },
        }
    }

    pub fn ui_margin_to_dip_margin(&self, margin: UiMargin) -> Result<Margin> {
        Ok(Margin::new(
            self.ui_length_to_dips(margin.left)?,
            self.ui_length_to_dips(margin.top)?,
            self.ui_length_to_dips(margin.right)?,
            self.ui_length_to_dips(margin.bottom)?,
        ))
    }

    /// The padding in DIPs; the backend default counts as zero.
    pub fn padding_dips(&self) -> Result<Margin> {
        match self.padding() {
            Some(padding) => self.ui_margin_to_dip_margin(padding),
            None => Ok(Margin::ZERO),
        }
    }

    pub fn margin_dips(&self) -> Result<Margin> {
        self.ui_margin_to_dip_margin(self.margin())
    }

    // =========================================================================
    // Hierarchy
    // =========================================================================

    pub fn view_core(&self) -> Option<Arc<dyn ViewCore>> {
        self.context.tree().core(self.id)
    }

    pub fn parent_view(&self) -> Option<Arc<View>> {
        self.context.tree().parent(self.id)
    }

    pub fn child_views(&self) -> Vec<Arc<View>> {
        self.context.tree().children(self.id)
    }

    /// Distance from the root of the view's tree.
    pub fn depth(&self) -> usize {
        self.context.tree().depth(self.id)
    }

    /// Append a child. Only container views accept children.
    pub fn add_child(self: &Arc<Self>, child: &Arc<View>) -> Result<()> {
        self.require_container("add_child")?;
        self.attach_child(child, None)
    }

    /// Insert a child at `index`, clamped to the number of children.
    pub fn insert_child(self: &Arc<Self>, index: usize, child: &Arc<View>) -> Result<()> {
        self.require_container("insert_child")?;
        self.attach_child(child, Some(index))
    }

    /// Detach `child`. Does nothing if it is not a child of this view.
    pub fn remove_child(self: &Arc<Self>, child: &Arc<View>) -> Result<()> {
        if child.parent_view().is_none_or(|p| !Arc::ptr_eq(&p, self)) {
            return Ok(());
        }
        let old_parent = self.context.tree().set_parent(child, None, None)?;
        child.parent_changed(old_parent, None)
    }

    pub fn remove_all_children(self: &Arc<Self>) -> Result<()> {
        for child in self.child_views() {
            self.remove_child(&child)?;
        }
        Ok(())
    }

    /// Replace the content of a scroll view or window.
    pub(crate) fn set_content(self: &Arc<Self>, content: Option<&Arc<View>>) -> Result<()> {
        let current = self.child_views();
        if let (Some(new), [old]) = (content, current.as_slice()) {
            if Arc::ptr_eq(new, old) {
                return Ok(());
            }
        }
        self.remove_all_children()?;
        match content {
            Some(content) => self.attach_child(content, None),
            None => Ok(()),
        }
    }

    fn require_container(&self, operation: &str) -> Result<()> {
        if self.kind.accepts_children() {
            Ok(())
        } else {
            Err(BodenError::programming(format!(
                "{operation}: {} does not accept child views",
                self.kind.name()
            )))
        }
    }

    fn attach_child(self: &Arc<Self>, child: &Arc<View>, index: Option<usize>) -> Result<()> {
        if !Arc::ptr_eq(&self.context, &child.context) {
            return Err(BodenError::invalid_argument(
                "parent and child belong to different UI contexts",
            ));
        }
        if child.kind.is_window() {
            return Err(BodenError::invalid_argument(
                "a window cannot be a child view",
            ));
        }
        let old_parent = self.context.tree().set_parent(child, Some(self), index)?;
        child.parent_changed(old_parent, Some(self))
    }

    fn parent_changed(
        self: &Arc<Self>,
        old_parent: Option<Arc<View>>,
        new_parent: Option<&Arc<View>>,
    ) -> Result<()> {
        let movable = match (self.view_core(), new_parent) {
            (Some(core), Some(parent)) if self.context.dispatcher().is_ui_thread() => {
                core.can_move_to_parent_view(parent).then_some((core, parent))
            }
            _ => None,
        };
        match movable {
            Some((core, parent)) => core.move_to_parent_view(parent)?,
            None => self.reinit_core()?,
        }

        let parents: Vec<Weak<View>> = old_parent
            .iter()
            .chain(new_parent)
            .map(Arc::downgrade)
            .collect();
        self.run_on_ui_thread(move |_| {
            for parent in parents.iter().filter_map(Weak::upgrade) {
                parent.invalidate_sizing_info(InvalidateReason::ChildAddedOrRemoved);
                parent.need_layout(InvalidateReason::ChildAddedOrRemoved);
            }
            Ok(())
        });
        Ok(())
    }

    // =========================================================================
    // Core lifecycle
    // =========================================================================

    /// The provider realizing this view: a window's own provider, or the
    /// provider of the nearest window ancestor.
    pub fn ui_provider(&self) -> Option<Arc<dyn UiProvider>> {
        match self.kind.as_window() {
            Some(window) => window.provider(),
            None => self.parent_view().and_then(|p| p.ui_provider()),
        }
    }

    /// Dispose the cores of this subtree and realize them again from the
    /// current provider.
    ///
    /// Off the UI thread the cores are detached immediately and creation is
    /// posted to the UI dispatcher.
    pub fn reinit_core(self: &Arc<Self>) -> Result<()> {
        self.deinit_core();
        if self.context.dispatcher().is_ui_thread() {
            self.init_core()
        } else {
            tracing::debug!(target: targets::VIEW, id = ?self.id, "core creation deferred to UI thread");
            let weak = Arc::downgrade(self);
            self.context.dispatcher().post(move || match weak.upgrade() {
                Some(view) => view.init_core(),
                None => Ok(()),
            });
            Ok(())
        }
    }

    fn deinit_core(&self) {
        {
            let mut sizing = self.sizing.lock();
            sizing.cache.clear();
            sizing.info = None;
        }
        if let Some(core) = self.context.tree().replace_core(self.id, None) {
            core.dispose();
        }
        for child in self.child_views() {
            child.deinit_core();
        }
    }

    fn init_core(self: &Arc<Self>) -> Result<()> {
        if self.view_core().is_some() {
            return Ok(());
        }
        let parent = self.parent_view();
        let parent_core = parent.as_ref().and_then(|p| p.view_core());
        let provider = match self.kind.as_window() {
            Some(window) => window.provider(),
            // Realized only below a realized parent.
            None if parent_core.is_some() => self.ui_provider(),
            None => None,
        };
        let Some(provider) = provider else {
            return Ok(());
        };

        let core = provider.create_view_core(self)?;
        if let Some(parent_core) = &parent_core {
            parent_core.add_child_ui_element(&core)?;
        }
        if let Some(stale) = self.context.tree().replace_core(self.id, Some(Arc::clone(&core))) {
            stale.dispose();
        }
        tracing::debug!(
            target: targets::VIEW,
            id = ?self.id,
            kind = self.kind.name(),
            provider = provider.name(),
            "core created"
        );

        self.mirror_properties(core.as_ref());
        for child in self.child_views() {
            child.init_core()?;
        }

        self.invalidate_sizing_info(InvalidateReason::ChildAddedOrRemoved);
        self.need_layout(InvalidateReason::ChildAddedOrRemoved);
        Ok(())
    }

    fn mirror_properties(&self, core: &dyn ViewCore) {
        core.set_visible(self.visible());
        core.set_margin(self.margin());
        core.set_padding(self.padding());
        core.set_horizontal_alignment(self.horizontal_alignment());
        core.set_vertical_alignment(self.vertical_alignment());
        core.set_preferred_size_hint(self.preferred_size_hint());
        core.set_preferred_size_minimum(self.preferred_size_minimum());
        core.set_preferred_size_maximum(self.preferred_size_maximum());
    }
}

impl Drop for View {
    fn drop(&mut self) {
        let released = self.context.tree().unregister(self.id);
        if let Some(core) = released.core {
            core.dispose();
        }
        for child in &released.children {
            child.deinit_core();
        }
        tracing::trace!(target: targets::VIEW, id = ?self.id, "view dropped");
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("bounds", &self.bounds())
            .finish_non_exhaustive()
    }
}
