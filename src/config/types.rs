use serde::{Deserialize, Serialize};

use crate::store::Feed;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Tuning of the state publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Upper bound on emissions applied per `pump` (default: 256).
    #[serde(default = "default_max_drain_per_pump")]
    pub max_drain_per_pump: usize,
    /// Side effects kept for polling consumers before the oldest is dropped
    /// (default: 32).
    #[serde(default = "default_side_effect_backlog")]
    pub side_effect_backlog: usize,
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Event loop tick in milliseconds (default: 250).
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

/// Settings of the in-process reference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Dispatch a refresh as soon as the app starts (default: true).
    #[serde(default = "default_refresh_on_start")]
    pub refresh_on_start: bool,
    /// Artificial delay before each load, in milliseconds (default: 0).
    #[serde(default)]
    pub latency_ms: u64,
    /// Feeds the store knows about.
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedSeed>,
}

/// A feed the reference store can serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSeed {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Default feeds are loaded without being added and cannot be deleted.
    #[serde(default)]
    pub is_default: bool,
}

impl FeedSeed {
    pub fn to_feed(&self) -> Feed {
        Feed {
            title: self.title.clone(),
            link: self.url.clone(),
            description: self.description.clone(),
            image_url: None,
            posts: Vec::new(),
            source_url: self.url.clone(),
            is_default: self.is_default,
        }
    }
}

fn default_max_drain_per_pump() -> usize {
    256
}

fn default_side_effect_backlog() -> usize {
    32
}

fn default_tick_rate_ms() -> u64 {
    250
}

fn default_refresh_on_start() -> bool {
    true
}

fn default_feeds() -> Vec<FeedSeed> {
    vec![
        FeedSeed {
            url: "https://blog.jetbrains.com/kotlin/feed/".to_string(),
            title: "Kotlin Blog".to_string(),
            description: "News from the Kotlin team".to_string(),
            is_default: true,
        },
        FeedSeed {
            url: "https://blog.rust-lang.org/feed.xml".to_string(),
            title: "Rust Blog".to_string(),
            description: "Empowering everyone to build reliable and efficient software."
                .to_string(),
            is_default: false,
        },
    ]
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            max_drain_per_pump: default_max_drain_per_pump(),
            side_effect_backlog: default_side_effect_backlog(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            refresh_on_start: default_refresh_on_start(),
            latency_ms: 0,
            feeds: default_feeds(),
        }
    }
}
