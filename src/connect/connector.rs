//! Generic glue between a [`StatePublisher`] and a [`ConnectedView`].

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::BridgeError;
use crate::publisher::{Dispatcher, StatePublisher};
use crate::reactive::Subscription;
use crate::store::FeedState;

use super::view::ConnectedView;

/// What a view subtree can see. Passed down explicitly; a subtree built
/// without a publisher can still be rendered, but connectors inside it
/// report [`BridgeError::MissingPublisher`].
#[derive(Clone, Copy, Default)]
pub struct ViewContext<'a> {
    publisher: Option<&'a StatePublisher>,
}

impl<'a> ViewContext<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_publisher(publisher: &'a StatePublisher) -> Self {
        Self {
            publisher: Some(publisher),
        }
    }

    pub fn publisher(&self) -> Option<&'a StatePublisher> {
        self.publisher
    }
}

/// Reads the publisher's current state and dispatcher and drives a view's
/// `map`/`render` pair.
pub struct StoreConnector<V> {
    view: V,
}

impl<V: ConnectedView> StoreConnector<V> {
    pub fn new(view: V) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Render against the publisher's current state.
    pub fn render(&self, publisher: &StatePublisher) -> V::Output {
        let dispatch = publisher.dispatcher();
        publisher
            .state()
            .with(|state| render_pass(&self.view, state, &dispatch))
    }

    /// Render inside a view context. Fails loudly when the context carries
    /// no publisher instead of producing an empty view.
    pub fn render_in(&self, ctx: &ViewContext<'_>) -> Result<V::Output, BridgeError> {
        let Some(publisher) = ctx.publisher() else {
            let view = type_name::<V>();
            tracing::error!(view, "connector rendered without a state publisher in context");
            return Err(BridgeError::MissingPublisher { view });
        };
        Ok(self.render(publisher))
    }

    /// Render now, then re-render every time the publisher's state changes.
    pub fn mount(self, publisher: &StatePublisher) -> Mounted<V>
    where
        V: 'static,
        V::Output: 'static,
    {
        let dispatch = publisher.dispatcher();
        let first = publisher
            .state()
            .with(|state| render_pass(&self.view, state, &dispatch));
        let shared = Rc::new(MountedInner {
            view: self.view,
            dispatch,
            output: RefCell::new(Rc::new(first)),
            renders: Cell::new(1),
        });

        let weak = Rc::downgrade(&shared);
        let subscription = publisher.state().subscribe(move |state| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let output = render_pass(&inner.view, state, &inner.dispatch);
            // Readers hold their own `Rc`, so this borrow is never contended.
            inner.output.replace(Rc::new(output));
            inner.renders.set(inner.renders.get() + 1);
        });

        Mounted {
            shared,
            _subscription: subscription,
        }
    }
}

fn render_pass<V: ConnectedView>(
    view: &V,
    state: &FeedState,
    dispatch: &Dispatcher,
) -> V::Output {
    let _pass = dispatch.begin_render();
    view.compose(state, dispatch)
}

/// A connector that follows the publisher's state.
///
/// Dropping it unsubscribes; the publisher keeps no reference to it. An
/// output obtained from [`Mounted::output`] stays valid across re-renders;
/// it is simply no longer the latest one.
pub struct Mounted<V: ConnectedView> {
    shared: Rc<MountedInner<V>>,
    _subscription: Subscription,
}

struct MountedInner<V: ConnectedView> {
    view: V,
    dispatch: Dispatcher,
    output: RefCell<Rc<V::Output>>,
    renders: Cell<u64>,
}

impl<V: ConnectedView> Mounted<V> {
    /// Output of the most recent render pass.
    pub fn output(&self) -> Rc<V::Output> {
        Rc::clone(&self.shared.output.borrow())
    }

    pub fn render_count(&self) -> u64 {
        self.shared.renders.get()
    }

    pub fn view(&self) -> &V {
        &self.shared.view
    }
}
