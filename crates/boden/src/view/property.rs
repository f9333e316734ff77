//! Properties that take part in layout.

use boden_core::{ListenerId, Property};

use super::influence::Influence;

/// An observable value paired with the invalidations its changes fire.
///
/// The value is stored and synchronized by [`Property`]; the owning view
/// reads [`ViewProperty::influence`] after a successful `set` to decide
/// what to invalidate.
pub struct ViewProperty<T> {
    value: Property<T>,
    influence: Influence,
}

impl<T: Clone + PartialEq> ViewProperty<T> {
    pub fn new(value: T, influence: Influence) -> Self {
        Self {
            value: Property::new(value),
            influence,
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.value.with(f)
    }

    /// Store a new value. Returns `true` if it changed.
    pub(crate) fn set(&self, value: T) -> bool {
        self.value.set(value)
    }

    #[inline]
    pub fn influence(&self) -> Influence {
        self.influence
    }

    /// Listen for changes.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.value.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.value.unsubscribe(id)
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug> std::fmt::Debug for ViewProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewProperty")
            .field("value", &self.get())
            .field("influence", &self.influence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::influence;

    #[test]
    fn test_view_property_keeps_descriptor() {
        let margin = ViewProperty::new(0.0, influence::MARGIN);
        assert!(margin.set(4.0));
        assert!(!margin.set(4.0));
        assert_eq!(margin.get(), 4.0);
        assert_eq!(margin.influence(), influence::MARGIN);
    }
}
