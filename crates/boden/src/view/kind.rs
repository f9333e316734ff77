//! Per-kind view state.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::core::UiProvider;
use super::influence;
use super::property::ViewProperty;

/// What a view is, together with the state only that kind carries.
pub enum ViewKind {
    Control(ControlState),
    LinearLayout(LinearLayoutState),
    ScrollView(ScrollViewState),
    Window(WindowState),
}

impl ViewKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Control(state) => match state.role {
                ControlRole::Text => "TextView",
                ControlRole::Button => "Button",
            },
            Self::LinearLayout(_) => "LinearLayoutView",
            Self::ScrollView(_) => "ScrollView",
            Self::Window(_) => "Window",
        }
    }

    /// Whether arbitrary children may be added.
    pub fn accepts_children(&self) -> bool {
        matches!(self, Self::LinearLayout(_))
    }

    /// Whether the view holds at most one content view.
    pub fn has_content_slot(&self) -> bool {
        matches!(self, Self::ScrollView(_) | Self::Window(_))
    }

    pub fn is_window(&self) -> bool {
        matches!(self, Self::Window(_))
    }

    pub fn as_control(&self) -> Option<&ControlState> {
        match self {
            Self::Control(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_linear_layout(&self) -> Option<&LinearLayoutState> {
        match self {
            Self::LinearLayout(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_scroll_view(&self) -> Option<&ScrollViewState> {
        match self {
            Self::ScrollView(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_window(&self) -> Option<&WindowState> {
        match self {
            Self::Window(state) => Some(state),
            _ => None,
        }
    }
}

impl fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    Text,
    Button,
}

/// A leaf control showing a text.
pub struct ControlState {
    pub role: ControlRole,
    pub text: ViewProperty<String>,
}

impl ControlState {
    pub fn new(role: ControlRole) -> Self {
        Self {
            role,
            text: ViewProperty::new(String::new(), influence::CONTENT),
        }
    }
}

pub struct LinearLayoutState {
    /// Children are arranged left to right when set, top to bottom
    /// otherwise.
    pub horizontal: ViewProperty<bool>,
}

impl Default for LinearLayoutState {
    fn default() -> Self {
        Self {
            horizontal: ViewProperty::new(false, influence::ORIENTATION),
        }
    }
}

pub struct ScrollViewState {
    pub horizontal_scrolling_enabled: ViewProperty<bool>,
    pub vertical_scrolling_enabled: ViewProperty<bool>,
}

impl Default for ScrollViewState {
    fn default() -> Self {
        Self {
            horizontal_scrolling_enabled: ViewProperty::new(false, influence::SCROLLING),
            vertical_scrolling_enabled: ViewProperty::new(true, influence::SCROLLING),
        }
    }
}

/// A top-level window. A window with a provider is a realization root.
pub struct WindowState {
    provider: RwLock<Option<Arc<dyn UiProvider>>>,
    pub title: ViewProperty<String>,
}

impl WindowState {
    pub fn provider(&self) -> Option<Arc<dyn UiProvider>> {
        self.provider.read().clone()
    }

    pub(crate) fn set_provider(&self, provider: Option<Arc<dyn UiProvider>>) {
        *self.provider.write() = provider;
    }
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            provider: RwLock::new(None),
            title: ViewProperty::new(String::new(), influence::COSMETIC),
        }
    }
}
