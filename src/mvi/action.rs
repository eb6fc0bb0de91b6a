//! Base trait for actions dispatched to a store.

/// Marker trait for action values.
///
/// Actions represent:
/// - User intents (refresh, select, delete)
/// - Completions of work the store scheduled (loaded data, failures)
///
/// Actions cross threads: the UI dispatches, a store worker reduces.
pub trait Action: Send + 'static {}
