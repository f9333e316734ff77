//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use boden::backend::{HeadlessUiProvider, HeadlessViewCore};
use boden::widgets::{TextView, Window};
use boden::{Rect, Size, UiContext, View};

/// A realized window with the default headless metrics.
pub struct Fixture {
    pub context: Arc<UiContext>,
    pub provider: Arc<HeadlessUiProvider>,
    pub window: Window,
}

impl Fixture {
    pub fn new() -> Self {
        let context = UiContext::new();
        let provider = HeadlessUiProvider::for_context(&context);
        let window = Window::with_provider(&context, provider.clone()).unwrap();
        Self {
            context,
            provider,
            window,
        }
    }

    /// Realize `content` as the window content and give the window a
    /// content area of `content_area` (the headless border is added).
    pub fn show(&self, content: &Arc<View>, content_area: Size) {
        self.window.set_content_view(Some(content)).unwrap();
        let border = self.provider.config().window_border;
        self.window
            .adjust_and_set_bounds(Rect::new(
                0.0,
                0.0,
                content_area.width + border.horizontal(),
                content_area.height + border.vertical(),
            ))
            .unwrap();
        self.settle();
    }

    /// Run every pending flush.
    pub fn settle(&self) {
        self.context.run_until_idle().unwrap();
    }

    pub fn core(&self, view: &View) -> Arc<HeadlessViewCore> {
        self.provider.core_of(view).expect("view is not realized")
    }

    /// Text view whose preferred size is pinned to `width` x `height`.
    pub fn fixed(&self, width: f64, height: f64) -> TextView {
        let view = TextView::new(&self.context);
        view.set_preferred_size_minimum(Size::new(width, height));
        view.set_preferred_size_maximum(Size::new(width, height));
        view
    }

    /// Forget the calls every realized core has seen so far.
    pub fn reset_stats(&self, views: &[&Arc<View>]) {
        for view in views {
            self.core(view).reset_stats();
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
