//! The view-binding protocol.

use crate::publisher::Dispatcher;
use crate::store::FeedState;

use super::connector::StoreConnector;

/// A view that declares which slice of state it needs and how user input
/// becomes actions, without touching subscriptions.
///
/// `map` must be pure: it reads state and may capture the dispatcher in the
/// props (e.g. inside event handlers), but it never dispatches. Handlers in
/// the rendered output dispatch later, in response to user input.
pub trait ConnectedView {
    /// View-specific values for one render pass.
    type Props;

    /// What a render pass produces.
    type Output;

    fn map(&self, state: &FeedState, dispatch: &Dispatcher) -> Self::Props;

    fn render(&self, props: Self::Props) -> Self::Output;

    /// One render pass: `render(map(state, dispatch))`.
    fn compose(&self, state: &FeedState, dispatch: &Dispatcher) -> Self::Output {
        let props = self.map(state, dispatch);
        self.render(props)
    }

    /// Wrap the view in a connector that supplies state and dispatch.
    fn connect(self) -> StoreConnector<Self>
    where
        Self: Sized,
    {
        StoreConnector::new(self)
    }
}
