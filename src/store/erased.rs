//! Boundary adapter for stores that only expose untyped streams.
//!
//! Some cores publish every stream as "any value". [`Typed`] wraps such a
//! stream once, at the edge, so everything past it is statically typed. A
//! payload of the wrong type is a wiring bug: it is logged at error level,
//! trips a debug assertion, and is never forwarded.

use std::any::{type_name, Any};
use std::marker::PhantomData;

use super::stream::{Observer, Subscribable};
use crate::error::SubscribeError;
use crate::watch::WatchHandle;

/// Payload of an untyped stream.
pub type AnyPayload = Box<dyn Any + Send>;

/// Typed view over an untyped stream.
pub struct Typed<S, T> {
    source: S,
    _payload: PhantomData<fn() -> T>,
}

impl<S, T> Typed<S, T>
where
    S: Subscribable<AnyPayload>,
    T: Send + 'static,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            _payload: PhantomData,
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S, T> Subscribable<T> for Typed<S, T>
where
    S: Subscribable<AnyPayload>,
    T: Send + 'static,
{
    fn watch(&self, observer: Observer<T>) -> Result<WatchHandle, SubscribeError> {
        self.source.watch(Box::new(move |payload: AnyPayload| {
            match payload.downcast::<T>() {
                Ok(value) => observer(*value),
                Err(_) => {
                    tracing::error!(
                        expected = type_name::<T>(),
                        "untyped stream emitted a payload of the wrong type"
                    );
                    debug_assert!(
                        false,
                        "payload type mismatch: expected {}",
                        type_name::<T>()
                    );
                }
            }
        }))
    }
}
