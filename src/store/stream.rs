//! The subscribable capability a store exposes for each of its streams.

use crate::error::SubscribeError;
use crate::watch::WatchHandle;

/// Callback invoked for every emission, possibly on a producer thread.
pub type Observer<T> = Box<dyn Fn(T) + Send + Sync + 'static>;

/// A push-based stream that observers can be registered on.
///
/// Implementations guarantee that no callback starts after the returned
/// handle has been released.
pub trait Subscribable<T>: Send + Sync {
    fn watch(&self, observer: Observer<T>) -> Result<WatchHandle, SubscribeError>;
}
