//! Boundary with the feed store.
//!
//! The store owns business logic; the bridge only needs its two streams and
//! its dispatch entry point. [`MemoryFeedStore`] is an in-process store that
//! satisfies the same contract.

pub mod erased;
pub mod memory;
mod model;
pub mod reducer;
pub mod source;
mod stream;
mod subject;

pub use memory::MemoryFeedStore;
pub use model::{Feed, FeedAction, FeedSideEffect, FeedState, Post};
pub use stream::{Observer, Subscribable};
pub use subject::{Replay, Subject};

/// The external store as seen by the bridge.
///
/// Implementations fan out to any number of observers thread-safely and
/// accept dispatches from any thread.
pub trait FeedStore: Send + Sync {
    /// Replay-one stream of global state.
    fn state_stream(&self) -> &dyn Subscribable<FeedState>;

    /// Stream of one-off notifications, no replay.
    fn side_effect_stream(&self) -> &dyn Subscribable<FeedSideEffect>;

    /// Fire-and-forget. Processing failures surface on the side-effect stream.
    fn dispatch(&self, action: FeedAction);
}
