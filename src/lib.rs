//! Bridge between a feed store's push streams and a terminal UI.
//!
//! - [`store`]: the store boundary and an in-process reference store
//! - [`publisher`]: republishes the store's streams as UI-thread fields
//! - [`connect`]: binds views to the publisher's state and dispatch
//! - [`ui`]: ratatui front end and a headless mode

pub mod config;
pub mod connect;
pub mod error;
pub mod logging;
pub mod mvi;
pub mod publisher;
pub mod reactive;
pub mod store;
pub mod ui;
pub mod watch;

pub use connect::{ConnectedView, Mounted, StoreConnector, ViewContext};
pub use error::{BridgeError, StreamKind, SubscribeError};
pub use publisher::{Dispatcher, PublisherBuilder, SideEffectEvent, StatePublisher};
pub use watch::WatchHandle;
