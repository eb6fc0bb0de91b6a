//! Configuration: TOML file with serde defaults for every field.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{BridgeSettings, Config, FeedSeed, StoreSettings, UiSettings};
