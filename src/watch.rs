//! Cancellable subscription tokens.
//!
//! A [`WatchHandle`] is what a stream hands back when an observer is
//! registered. Releasing it unregisters the observer exactly once, no matter
//! how many times `release()` is called or whether the handle is simply
//! dropped.

use parking_lot::Mutex;
use std::fmt;

type ReleaseFn = Box<dyn FnOnce() + Send + 'static>;

/// Active subscription with idempotent release.
///
/// Releasing stops future callback delivery. Callbacks that were already
/// running on another thread when the handle was released are not retracted.
pub struct WatchHandle {
    release: Mutex<Option<ReleaseFn>>,
}

impl WatchHandle {
    /// Wrap the function that unregisters the observer.
    pub fn new<F: FnOnce() + Send + 'static>(release: F) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A handle with nothing to release (e.g. for streams that never emit).
    pub fn noop() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Unregister the observer. Calling this again is a no-op.
    pub fn release(&self) {
        // Take under the lock, run outside it: the release fn may lock the
        // stream's observer list.
        let release = self.release.lock().take();
        if let Some(release) = release {
            release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.lock().is_none()
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("released", &self.is_released())
            .finish()
    }
}
