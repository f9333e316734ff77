use std::sync::Arc;

use crate::context::UiContext;
use crate::view::View;
use crate::view::core::InvalidateReason;
use crate::view::kind::{ControlRole, ControlState, ViewKind};

/// A view showing a text.
#[derive(Debug, Clone)]
pub struct TextView(Arc<View>);

view_handle!(TextView, ViewKind::Control(ControlState { role: ControlRole::Text, .. }));

impl TextView {
    pub fn new(context: &Arc<UiContext>) -> Self {
        Self(View::new(context, ViewKind::Control(ControlState::new(ControlRole::Text))))
    }

    pub fn with_text(context: &Arc<UiContext>, text: impl Into<String>) -> Self {
        let view = Self::new(context);
        view.set_text(text);
        view
    }

    pub fn text(&self) -> String {
        control_text(&self.0)
    }

    pub fn set_text(&self, text: impl Into<String>) {
        set_control_text(&self.0, text.into());
    }
}

/// A push button with a label.
#[derive(Debug, Clone)]
pub struct Button(Arc<View>);

view_handle!(Button, ViewKind::Control(ControlState { role: ControlRole::Button, .. }));

impl Button {
    pub fn new(context: &Arc<UiContext>) -> Self {
        Self(View::new(context, ViewKind::Control(ControlState::new(ControlRole::Button))))
    }

    pub fn with_label(context: &Arc<UiContext>, label: impl Into<String>) -> Self {
        let button = Self::new(context);
        button.set_label(label);
        button
    }

    pub fn label(&self) -> String {
        control_text(&self.0)
    }

    pub fn set_label(&self, label: impl Into<String>) {
        set_control_text(&self.0, label.into());
    }
}

fn control_text(view: &View) -> String {
    view.kind()
        .as_control()
        .map(|state| state.text.get())
        .unwrap_or_default()
}

fn set_control_text(view: &Arc<View>, text: String) {
    if let Some(state) = view.kind().as_control() {
        view.update_property(&state.text, text, |_, _| {}, InvalidateReason::CustomDataChanged);
    }
}
