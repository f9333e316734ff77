use std::sync::Arc;

use boden_core::{Result, Size};

use crate::context::UiContext;
use crate::layout::ViewLayout;
use crate::layout::linear;
use crate::view::View;
use crate::view::core::InvalidateReason;
use crate::view::kind::{LinearLayoutState, ViewKind};

/// A container stacking its children vertically, or horizontally when
/// [`LinearLayoutView::set_horizontal`] is set.
#[derive(Debug, Clone)]
pub struct LinearLayoutView(Arc<View>);

view_handle!(LinearLayoutView, ViewKind::LinearLayout(_));

impl LinearLayoutView {
    pub fn new(context: &Arc<UiContext>) -> Self {
        Self(View::new(
            context,
            ViewKind::LinearLayout(LinearLayoutState::default()),
        ))
    }

    pub fn horizontal(context: &Arc<UiContext>) -> Self {
        let view = Self::new(context);
        view.set_horizontal(true);
        view
    }

    pub fn is_horizontal(&self) -> bool {
        self.state().is_some_and(|s| s.horizontal.get())
    }

    pub fn set_horizontal(&self, horizontal: bool) {
        if let Some(state) = self.state() {
            self.0.update_property(
                &state.horizontal,
                horizontal,
                |_, _| {},
                InvalidateReason::StandardPropertyChanged,
            );
        }
    }

    pub fn calc_container_preferred_size(&self, available_space: Size) -> Result<Size> {
        linear::calc_container_preferred_size(&self.0, available_space)
    }

    pub fn calc_container_layout(&self, container_size: Size) -> Result<ViewLayout> {
        linear::calc_container_layout(&self.0, container_size)
    }

    fn state(&self) -> Option<&LinearLayoutState> {
        self.0.kind().as_linear_layout()
    }
}
