//! Base trait for store state.

/// Marker trait for state snapshots.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Comparable (PartialEq so unchanged states are not republished)
/// - Defaultable (the explicit "nothing loaded yet" value)
pub trait StoreState: Clone + PartialEq + Default + Send + 'static {}
