//! Cached sizing results.

use boden_core::Size;

/// The result of the last sizing recomputation run by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingInfo {
    pub preferred_size: Size,
}

const MAX_ENTRIES: usize = 4;

/// Preferred sizes computed since the last invalidation.
///
/// A request hits when it equals a request that produced an entry, or when
/// it is no smaller on any axis than an entry's preferred size (an
/// unconstrained axis is larger than anything). Exact matches win.
#[derive(Debug, Default)]
pub(crate) struct PreferredSizeCache {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    available: Size,
    preferred: Size,
}

impl PreferredSizeCache {
    pub fn get(&self, available: Size) -> Option<Size> {
        self.entries
            .iter()
            .find(|e| e.available == available)
            .or_else(|| self.entries.iter().find(|e| e.preferred.fits_into(available)))
            .map(|e| e.preferred)
    }

    pub fn store(&mut self, available: Size, preferred: Size) {
        self.entries.retain(|e| e.available != available);
        if self.entries.len() == MAX_ENTRIES {
            self.entries.remove(0);
        }
        self.entries.push(Entry {
            available,
            preferred,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
