//! Shared test utilities: a hand-driven store and state builders.

#![allow(dead_code, unused_imports)]

use feedbridge::error::SubscribeError;
use feedbridge::publisher::StatePublisher;
use feedbridge::store::{
    Feed, FeedAction, FeedSideEffect, FeedState, FeedStore, Observer, Post, Replay, Subject,
    Subscribable,
};
use feedbridge::watch::WatchHandle;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Stream wrapper that counts live subscriptions and releases, and can be
/// told to refuse new observers.
pub struct TrackedStream<T> {
    subject: Subject<T>,
    refuse: AtomicBool,
    live: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl<T: Clone + Send + 'static> TrackedStream<T> {
    fn new(subject: Subject<T>) -> Self {
        Self {
            subject,
            refuse: AtomicBool::new(false),
            live: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn emit(&self, value: T) {
        self.subject.emit(value);
    }

    pub fn refuse(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn observer_count(&self) -> usize {
        self.subject.observer_count()
    }
}

impl<T: Clone + Send + 'static> Subscribable<T> for TrackedStream<T> {
    fn watch(&self, observer: Observer<T>) -> Result<WatchHandle, SubscribeError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(SubscribeError::Rejected {
                reason: "refused by test".into(),
            });
        }
        let inner = self.subject.watch(observer)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        let live = Arc::clone(&self.live);
        let released = Arc::clone(&self.released);
        Ok(WatchHandle::new(move || {
            inner.release();
            live.fetch_sub(1, Ordering::SeqCst);
            released.fetch_add(1, Ordering::SeqCst);
        }))
    }
}

/// Store driven by the test: emissions are pushed by hand and dispatches
/// are only recorded.
pub struct ManualStore {
    pub states: TrackedStream<FeedState>,
    pub side_effects: TrackedStream<FeedSideEffect>,
    dispatched: Mutex<Vec<FeedAction>>,
}

impl ManualStore {
    /// Replay-one state stream seeded with `FeedState::default()`.
    pub fn new() -> Arc<Self> {
        Self::with_initial(FeedState::default())
    }

    pub fn with_initial(initial: FeedState) -> Arc<Self> {
        Arc::new(Self {
            states: TrackedStream::new(Subject::with_latest(initial)),
            side_effects: TrackedStream::new(Subject::new(Replay::None)),
            dispatched: Mutex::new(Vec::new()),
        })
    }

    pub fn dispatched(&self) -> Vec<FeedAction> {
        self.dispatched.lock().clone()
    }

    pub fn live_subscriptions(&self) -> usize {
        self.states.live() + self.side_effects.live()
    }

    pub fn releases(&self) -> usize {
        self.states.released() + self.side_effects.released()
    }
}

impl FeedStore for ManualStore {
    fn state_stream(&self) -> &dyn Subscribable<FeedState> {
        &self.states
    }

    fn side_effect_stream(&self) -> &dyn Subscribable<FeedSideEffect> {
        &self.side_effects
    }

    fn dispatch(&self, action: FeedAction) {
        self.dispatched.lock().push(action);
    }
}

pub fn as_store(store: &Arc<ManualStore>) -> Arc<dyn FeedStore> {
    Arc::clone(store) as Arc<dyn FeedStore>
}

pub fn feed(title: &str) -> Feed {
    Feed {
        title: title.to_string(),
        link: format!("https://{}.example", title.to_lowercase()),
        source_url: format!("https://{}.example/feed", title.to_lowercase()),
        posts: vec![Post {
            title: format!("{} post", title),
            ..Post::default()
        }],
        ..Feed::default()
    }
}

pub fn loaded(titles: &[&str]) -> FeedState {
    FeedState::new(false, titles.iter().map(|t| feed(t)).collect(), None)
}

/// Pump until `done` holds or the timeout expires.
pub fn pump_until(
    publisher: &StatePublisher,
    timeout: Duration,
    mut done: impl FnMut(&StatePublisher) -> bool,
) -> bool {
    let deadline = std::time::Instant::now() + timeout;
    while std::time::Instant::now() < deadline {
        if done(publisher) {
            return true;
        }
        publisher.wait_and_pump(Duration::from_millis(20));
    }
    done(publisher)
}
