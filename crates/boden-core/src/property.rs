//! Observable properties.
//!
//! [`Property<T>`] stores a value behind its own lock, detects changes on
//! `set`, and notifies subscribed listeners after the value was committed.
//! Views pair each layout-relevant property with an influence descriptor
//! that says which invalidations a change triggers.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use boden_core::Property;
//!
//! let visible = Property::new(true);
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = changes.clone();
//! visible.subscribe(move |_| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert!(!visible.set(true)); // unchanged, no notification
//! assert!(visible.set(false));
//! assert_eq!(changes.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle of a property change listener.
    pub struct ListenerId;
}

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A thread-safe value with change detection and change listeners.
pub struct Property<T> {
    value: RwLock<T>,
    listeners: Mutex<SlotMap<ListenerId, Listener<T>>>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
            listeners: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without notifying listeners.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }

    /// Register a listener called with the new value after every change.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.listeners.lock().insert(Arc::new(listener))
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(id).is_some()
    }

    fn notify(&self, value: &T) {
        // Listeners run without any property lock held so they can read or
        // write this property.
        let listeners: Vec<Listener<T>> = self.listeners.lock().values().cloned().collect();
        for listener in listeners {
            listener(value);
        }
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it changed.
    ///
    /// Listeners are notified only when the value changed.
    pub fn set(&self, value: T) -> bool {
        self.replace(value).is_some()
    }

    /// Set the value, returning the previous value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let old = {
            let mut current = self.value.write();
            if *current == value {
                return None;
            }
            std::mem::replace(&mut *current, value.clone())
        };
        self.notify(&value);
        Some(old)
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A read-only view of a property.
///
/// Used to expose values applications may read but only the framework may
/// write, such as a view's position and size.
pub struct ReadOnlyProperty<'a, T> {
    inner: &'a Property<T>,
}

impl<'a, T: Clone> ReadOnlyProperty<'a, T> {
    pub fn new(property: &'a Property<T>) -> Self {
        Self { inner: property }
    }

    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }

    /// Listen for changes made by the framework.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener)
    }
}

static_assertions::assert_impl_all!(Property<f64>: Send, Sync);
