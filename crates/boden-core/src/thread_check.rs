//! Thread affinity verification.
//!
//! Boden performs every mutation of the view tree, every layout computation
//! and every core creation on one UI-affine thread. [`ThreadAffinity`]
//! records that thread; the dispatcher owns one and views consult it before
//! running UI-only operations.
//!
//! ```
//! use boden_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//! assert!(affinity.check("layout").is_ok());
//!
//! let other = std::thread::spawn(move || affinity.check("layout"))
//!     .join()
//!     .unwrap();
//! assert!(other.unwrap_err().is_programming_error());
//! ```

use std::thread::ThreadId;

use crate::error::{BodenError, Result};

/// The thread an object is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the calling thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Return a programming error naming `operation` when called from
    /// another thread.
    pub fn check(&self, operation: &str) -> Result<()> {
        if self.is_same_thread() {
            Ok(())
        } else {
            Err(self.wrong_thread(operation))
        }
    }

    /// Panic in debug builds when called from another thread.
    #[inline]
    pub fn debug_assert_same_thread(&self, operation: &str) {
        #[cfg(debug_assertions)]
        if !self.is_same_thread() {
            panic_wrong_thread(&self.wrong_thread(operation));
        }
        #[cfg(not(debug_assertions))]
        let _ = operation;
    }

    #[cold]
    fn wrong_thread(&self, operation: &str) -> BodenError {
        let current = std::thread::current();
        BodenError::programming(format!(
            "{operation} must run on the UI thread ({:?}), called from \"{}\" ({:?})",
            self.thread_id,
            current.name().unwrap_or("<unnamed>"),
            current.id(),
        ))
    }
}

#[cold]
#[inline(never)]
fn panic_wrong_thread(err: &BodenError) -> ! {
    panic!("THREAD AFFINITY VIOLATION: {err}")
}
