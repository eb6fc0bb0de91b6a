//! Reducer trait for MVI architecture.

use super::action::Action;
use super::state::StoreState;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function: `(State, Action) -> (State, Effects)`. Effects describe
/// work for the caller (loading, emitting a side effect); the reducer never
/// performs them itself.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: StoreState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Work requested by a transition.
    type Effect;

    /// Process an action and return the new state and its effects.
    fn reduce(state: Self::State, action: Self::Action) -> (Self::State, Vec<Self::Effect>);
}
