//! Values produced and consumed by the feed store.

use crate::mvi::{Action, StoreState};

/// A single entry of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Post {
    pub title: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Publication time, milliseconds since the Unix epoch.
    pub date: Option<i64>,
}

/// A subscribed feed and its posts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub image_url: Option<String>,
    pub posts: Vec<Post>,
    /// URL the feed was added from; identifies the feed.
    pub source_url: String,
    /// Default feeds ship with the app and are not user-added.
    pub is_default: bool,
}

/// Global state published by the store.
///
/// The bridge never mutates it; it only republishes the latest value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    pub in_progress: bool,
    pub feeds: Vec<Feed>,
    pub selected_feed: Option<Feed>,
}

impl FeedState {
    pub fn new(in_progress: bool, feeds: Vec<Feed>, selected_feed: Option<Feed>) -> Self {
        Self {
            in_progress,
            feeds,
            selected_feed,
        }
    }

    pub fn contains(&self, feed: &Feed) -> bool {
        self.feeds.contains(feed)
    }
}

impl StoreState for FeedState {}

/// One-off notification, distinct from state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSideEffect {
    Error(String),
}

impl FeedSideEffect {
    pub fn message(&self) -> &str {
        match self {
            FeedSideEffect::Error(message) => message,
        }
    }
}

/// Intent to change state. Opaque to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    Refresh { force_load: bool },
    Add { url: String },
    Delete { url: String },
    SelectFeed { feed: Option<Feed> },
    Data { feeds: Vec<Feed> },
    Error { message: String },
}

impl Action for FeedAction {}
