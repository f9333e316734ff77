//! The backend adapter contract.
//!
//! A backend realizes views by implementing [`ViewCore`] once per kind of
//! native element and [`UiProvider`] to create them. Cores hold only a weak
//! reference to their outer view. Shared algorithms (linear layout, scroll
//! view layout, window defaults) are free functions and helper types the
//! cores call with the view as a parameter.

use std::sync::Arc;

use boden_core::{BodenError, Margin, Rect, Result, RoundType, Size, UiLength, UiMargin, UiUnit};

use super::View;
use super::alignment::{HorizontalAlignment, VerticalAlignment};

/// Why sizing or layout was invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidateReason {
    /// A standard property of the view changed. The core has already seen
    /// the change through its property mirror.
    StandardPropertyChanged,
    /// A standard property of a child changed. The core has already seen
    /// the change through the child's property mirror.
    StandardChildPropertyChanged,
    ChildAddedOrRemoved,
    ChildSizingInfoInvalidated,
    /// View-specific data (for example a label's text) changed.
    CustomDataChanged,
}

impl InvalidateReason {
    /// Whether this is one of the two reasons a core with its own native
    /// layout pass may ignore to avoid feedback loops.
    pub fn is_standard(self) -> bool {
        matches!(
            self,
            Self::StandardPropertyChanged | Self::StandardChildPropertyChanged
        )
    }
}

/// Backend adapter of one view.
///
/// The property mirrors default to doing nothing; backends without native
/// state to update do not have to implement them.
pub trait ViewCore: Send + Sync {
    fn set_visible(&self, _visible: bool) {}
    fn set_margin(&self, _margin: UiMargin) {}
    fn set_padding(&self, _padding: Option<UiMargin>) {}
    fn set_horizontal_alignment(&self, _alignment: HorizontalAlignment) {}
    fn set_vertical_alignment(&self, _alignment: VerticalAlignment) {}
    fn set_preferred_size_hint(&self, _hint: Size) {}
    fn set_preferred_size_minimum(&self, _minimum: Size) {}
    fn set_preferred_size_maximum(&self, _maximum: Size) {}

    /// The natural size of the element for the given space. Unconstrained
    /// axes are [`boden_core::COMPONENT_NONE`].
    fn calc_preferred_size(&self, available_space: Size) -> Result<Size>;

    /// Map DIP bounds to bounds the backend can represent. Must not change
    /// any state.
    fn adjust_bounds(&self, requested: Rect, position_round: RoundType, size_round: RoundType)
    -> Rect;

    /// Apply bounds and return the bounds actually applied. Backends whose
    /// platform controls the bounds may ignore the request.
    fn adjust_and_set_bounds(&self, requested: Rect) -> Rect;

    fn invalidate_sizing_info(&self, reason: InvalidateReason);
    fn need_layout(&self, reason: InvalidateReason);

    /// A child's sizing changed. Container capable cores report this to
    /// their own view so the invalidation continues upward.
    fn child_sizing_info_invalidated(&self, child: &Arc<View>);

    /// Resolve a length in DIPs. Fails for units the backend does not know.
    fn ui_length_to_dips(&self, length: UiLength) -> Result<f64>;

    fn ui_margin_to_dip_margin(&self, margin: UiMargin) -> Result<Margin> {
        Ok(Margin::new(
            self.ui_length_to_dips(margin.left)?,
            self.ui_length_to_dips(margin.top)?,
            self.ui_length_to_dips(margin.right)?,
            self.ui_length_to_dips(margin.bottom)?,
        ))
    }

    /// Lay out the children of the view. Called by the coordinator.
    fn layout(&self) -> Result<()> {
        Ok(())
    }

    /// Attach the core of a new child element.
    fn add_child_ui_element(&self, _child: &Arc<dyn ViewCore>) -> Result<()> {
        Err(BodenError::programming(
            "this core cannot contain child elements",
        ))
    }

    /// Whether the core can stay attached when its view moves to `parent`.
    fn can_move_to_parent_view(&self, _parent: &Arc<View>) -> bool {
        false
    }

    fn move_to_parent_view(&self, _parent: &Arc<View>) -> Result<()> {
        Ok(())
    }

    /// Release native resources. The core is detached afterwards.
    fn dispose(&self) {}

    /// Window capabilities, for cores realizing top-level windows.
    fn as_window_core(&self) -> Option<&dyn WindowCore> {
        None
    }
}

/// Extra operations of a top-level window core.
pub trait WindowCore {
    /// Resize the window to its preferred size within the screen.
    fn auto_size(&self) -> Result<()>;
    /// Center the window on its screen.
    fn center(&self) -> Result<()>;
}

/// Resolve the units every backend handles the same way. Returns `None` for
/// font dependent units.
pub fn resolve_fixed_length(length: UiLength) -> Option<f64> {
    match length.unit {
        UiUnit::None => Some(0.0),
        UiUnit::Dip => Some(length.value),
        _ => None,
    }
}

/// Creates cores for views.
pub trait UiProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Create the core for `view`. Fails with an invalid argument error for
    /// view kinds the provider cannot realize.
    fn create_view_core(&self, view: &Arc<View>) -> Result<Arc<dyn ViewCore>>;
}
