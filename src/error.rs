//! Bridge-level errors.
//!
//! Every error here is a construction-time or wiring failure. Once a
//! publisher is built and a connector has a publisher to read from, render
//! passes cannot fail for bridge-internal reasons.

use std::fmt;
use thiserror::Error;

/// Which of the store's two streams an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    State,
    SideEffect,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::State => write!(f, "state"),
            StreamKind::SideEffect => write!(f, "side-effect"),
        }
    }
}

/// A stream refused to register an observer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    #[error("stream is closed")]
    Closed,

    #[error("subscription rejected: {reason}")]
    Rejected { reason: String },
}

/// Errors raised while wiring the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Registering an observer on one of the store's streams failed.
    /// Nothing stays subscribed when this is returned.
    #[error("failed to watch the store's {stream} stream: {source}")]
    Subscribe {
        stream: StreamKind,
        #[source]
        source: SubscribeError,
    },

    /// A connector was rendered in a view context without a publisher.
    /// This is a wiring bug, not a runtime condition.
    #[error("no state publisher in the view context of `{view}`")]
    MissingPublisher { view: &'static str },
}
