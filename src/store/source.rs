//! Where the reference store gets feeds from.
//!
//! Fetching and parsing live outside this crate; the store only needs
//! something that turns a URL into a [`Feed`].

use parking_lot::RwLock;
use thiserror::Error;

use super::model::Feed;
use crate::config::FeedSeed;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedSourceError {
    #[error("no feed is available at '{url}'")]
    NotFound { url: String },

    #[error("feed '{url}' is already added")]
    AlreadyAdded { url: String },

    #[error("default feed '{url}' cannot be deleted")]
    DefaultFeed { url: String },
}

/// Provider of feeds for the reference store.
pub trait FeedSource: Send + Sync {
    /// All feeds currently added. `force_load` bypasses any cache.
    fn load_all(&self, force_load: bool) -> Result<Vec<Feed>, FeedSourceError>;

    fn add(&self, url: &str) -> Result<(), FeedSourceError>;

    fn delete(&self, url: &str) -> Result<(), FeedSourceError>;
}

/// In-memory source: a catalog of known feeds, some of them added.
pub struct StaticFeedSource {
    catalog: Vec<Feed>,
    added: RwLock<Vec<String>>,
}

impl StaticFeedSource {
    /// Every feed in `catalog` is known; only the default ones start added.
    pub fn new(catalog: Vec<Feed>) -> Self {
        let added = catalog
            .iter()
            .filter(|feed| feed.is_default)
            .map(|feed| feed.source_url.clone())
            .collect();
        Self {
            catalog,
            added: RwLock::new(added),
        }
    }

    pub fn from_seeds(seeds: &[FeedSeed]) -> Self {
        Self::new(seeds.iter().map(FeedSeed::to_feed).collect())
    }

    fn known(&self, url: &str) -> Option<&Feed> {
        self.catalog.iter().find(|feed| feed.source_url == url)
    }
}

impl FeedSource for StaticFeedSource {
    fn load_all(&self, _force_load: bool) -> Result<Vec<Feed>, FeedSourceError> {
        let added = self.added.read();
        Ok(added
            .iter()
            .filter_map(|url| self.known(url).cloned())
            .collect())
    }

    fn add(&self, url: &str) -> Result<(), FeedSourceError> {
        if self.known(url).is_none() {
            return Err(FeedSourceError::NotFound {
                url: url.to_string(),
            });
        }
        let mut added = self.added.write();
        if added.iter().any(|existing| existing == url) {
            return Err(FeedSourceError::AlreadyAdded {
                url: url.to_string(),
            });
        }
        added.push(url.to_string());
        Ok(())
    }

    fn delete(&self, url: &str) -> Result<(), FeedSourceError> {
        if self.known(url).is_some_and(|feed| feed.is_default) {
            return Err(FeedSourceError::DefaultFeed {
                url: url.to_string(),
            });
        }
        self.added.write().retain(|existing| existing != url);
        Ok(())
    }
}
