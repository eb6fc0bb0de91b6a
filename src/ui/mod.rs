//! Terminal front end built on connected views.

pub mod events;
pub mod feed_list;
pub mod footer;
pub mod header;
pub mod headless;
pub mod layout;
pub mod runtime;
pub mod summary;
pub mod terminal_guard;
pub mod theme;

pub use headless::run_headless;
pub use runtime::run;
