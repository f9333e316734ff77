//! The UI context: the services one view hierarchy shares.

use std::sync::Arc;

use boden_core::{Dispatcher, Result};

use crate::config::UiConfig;
use crate::coordinator::LayoutCoordinator;
use crate::view::tree::ViewTree;

/// Owns the UI dispatcher, the view tree lock and the layout coordinator.
///
/// A context is bound to the thread that created it; that thread is the UI
/// thread of every view created in it.
pub struct UiContext {
    config: UiConfig,
    dispatcher: Arc<Dispatcher>,
    tree: ViewTree,
    coordinator: Arc<LayoutCoordinator>,
}

/// Upper bound of idle passes in [`UiContext::run_until_idle`].
const MAX_IDLE_PASSES: usize = 64;

impl UiContext {
    /// Create a context with the default configuration, bound to the
    /// calling thread.
    pub fn new() -> Arc<Self> {
        Self::with_config(UiConfig::default())
    }

    pub fn with_config(config: UiConfig) -> Arc<Self> {
        let dispatcher = Arc::new(Dispatcher::new());
        let coordinator = LayoutCoordinator::new(Arc::clone(&dispatcher));
        Arc::new(Self {
            config,
            dispatcher,
            tree: ViewTree::new(),
            coordinator,
        })
    }

    #[inline]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Differences below this are layout rounding noise.
    #[inline]
    pub fn layout_epsilon(&self) -> f64 {
        self.config.layout.epsilon
    }

    #[inline]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    #[inline]
    pub fn tree(&self) -> &ViewTree {
        &self.tree
    }

    #[inline]
    pub fn coordinator(&self) -> &Arc<LayoutCoordinator> {
        &self.coordinator
    }

    /// Run posted work, including layout flushes, until nothing is left.
    /// Returns the number of tasks run.
    pub fn run_until_idle(&self) -> Result<usize> {
        self.dispatcher.run_until_idle(MAX_IDLE_PASSES)
    }
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("dispatcher", &self.dispatcher)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}
