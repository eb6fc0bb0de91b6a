//! Binding views to the publisher.
//!
//! A view implements [`ConnectedView`]; wrapping it in a [`StoreConnector`]
//! gives it the publisher's state and dispatcher on every render pass.

mod connector;
mod view;

pub use connector::{Mounted, StoreConnector, ViewContext};
pub use view::ConnectedView;
