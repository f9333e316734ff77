//! Layout algorithms shared by every backend.
//!
//! Cores of container views call into these from their own
//! `calc_preferred_size` and `layout`. The algorithms only talk to views, so
//! the same code serves any backend.

pub mod linear;
pub mod virtual_axis;

use std::sync::Arc;

use boden_core::logging::targets;
use boden_core::{Rect, Result};

use crate::view::View;

/// Bounds computed for a set of child views, applied in one step.
#[derive(Debug, Default)]
pub struct ViewLayout {
    entries: Vec<(Arc<View>, Rect)>,
}

impl ViewLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bounds of `view`, replacing earlier bounds.
    pub fn set_bounds(&mut self, view: &Arc<View>, bounds: Rect) {
        match self.entries.iter_mut().find(|(v, _)| Arc::ptr_eq(v, view)) {
            Some(entry) => entry.1 = bounds,
            None => self.entries.push((Arc::clone(view), bounds)),
        }
    }

    pub fn bounds_of(&self, view: &Arc<View>) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(v, _)| Arc::ptr_eq(v, view))
            .map(|(_, bounds)| *bounds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Arc<View>, Rect)> {
        self.entries.iter().map(|(v, bounds)| (v, *bounds))
    }

    pub(crate) fn entries_mut(&mut self) -> impl Iterator<Item = (&Arc<View>, &mut Rect)> {
        self.entries.iter_mut().map(|(v, bounds)| (&*v, bounds))
    }

    /// Commit every recorded bounds through
    /// [`View::adjust_and_set_bounds`].
    pub fn apply(&self) -> Result<()> {
        for (view, bounds) in &self.entries {
            let applied = view.adjust_and_set_bounds(*bounds)?;
            tracing::trace!(target: targets::LAYOUT, id = ?view.id(), %applied, "child placed");
        }
        Ok(())
    }
}
