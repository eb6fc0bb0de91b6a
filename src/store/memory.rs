//! Reference feed store running on its own worker thread.
//!
//! Emissions come from the worker, never from the thread that dispatched,
//! so anything observing this store sees the same threading it would see
//! with a real core.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::model::{FeedAction, FeedSideEffect, FeedState};
use super::reducer::{FeedReducer, StoreEffect};
use super::source::{FeedSource, StaticFeedSource};
use super::stream::Subscribable;
use super::subject::{Replay, Subject};
use super::FeedStore;
use crate::config::StoreSettings;
use crate::mvi::Reducer;

enum Command {
    Dispatch(FeedAction),
    Shutdown,
}

pub struct MemoryFeedStore {
    states: Arc<Subject<FeedState>>,
    side_effects: Arc<Subject<FeedSideEffect>>,
    commands: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl MemoryFeedStore {
    /// Start the worker. `latency` is applied before every load to mimic a
    /// slow backend.
    pub fn spawn(source: Arc<dyn FeedSource>, latency: Duration) -> Arc<Self> {
        let states = Arc::new(Subject::with_latest(FeedState::default()));
        let side_effects = Arc::new(Subject::new(Replay::None));
        let (commands, rx) = mpsc::channel();

        let worker = Worker {
            state: FeedState::default(),
            source,
            latency,
            states: Arc::clone(&states),
            side_effects: Arc::clone(&side_effects),
            loopback: commands.clone(),
        };
        let handle = thread::Builder::new()
            .name("feed-store".to_string())
            .spawn(move || worker.run(rx))
            .ok();
        if handle.is_none() {
            tracing::error!("failed to spawn feed store worker; dispatches will be dropped");
        }

        Arc::new(Self {
            states,
            side_effects,
            commands,
            worker: Mutex::new(handle),
        })
    }

    pub fn from_settings(settings: &StoreSettings) -> Arc<Self> {
        let source = Arc::new(StaticFeedSource::from_seeds(&settings.feeds));
        Self::spawn(source, Duration::from_millis(settings.latency_ms))
    }

    /// Latest state the worker published.
    pub fn current_state(&self) -> FeedState {
        self.states.latest().unwrap_or_default()
    }

    /// Stop the worker and close both streams. Idempotent.
    pub fn shutdown(&self) {
        let Some(handle) = self.worker.lock().take() else {
            return;
        };
        let _ = self.commands.send(Command::Shutdown);
        if handle.join().is_err() {
            tracing::error!("feed store worker panicked");
        }
        self.states.close();
        self.side_effects.close();
        tracing::info!("feed store stopped");
    }
}

impl FeedStore for MemoryFeedStore {
    fn state_stream(&self) -> &dyn Subscribable<FeedState> {
        self.states.as_ref()
    }

    fn side_effect_stream(&self) -> &dyn Subscribable<FeedSideEffect> {
        self.side_effects.as_ref()
    }

    fn dispatch(&self, action: FeedAction) {
        if self.commands.send(Command::Dispatch(action)).is_err() {
            tracing::warn!("feed store is stopped; dropping action");
        }
    }
}

impl Drop for MemoryFeedStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct Worker {
    state: FeedState,
    source: Arc<dyn FeedSource>,
    latency: Duration,
    states: Arc<Subject<FeedState>>,
    side_effects: Arc<Subject<FeedSideEffect>>,
    loopback: Sender<Command>,
}

impl Worker {
    fn run(mut self, rx: Receiver<Command>) {
        while let Ok(command) = rx.recv() {
            match command {
                Command::Dispatch(action) => self.handle(action),
                Command::Shutdown => break,
            }
        }
    }

    fn handle(&mut self, action: FeedAction) {
        tracing::debug!(?action, "reducing action");
        let previous = std::mem::take(&mut self.state);
        let (next, effects) = FeedReducer::reduce(previous.clone(), action);
        self.state = next;
        if self.state != previous {
            self.states.emit(self.state.clone());
        }
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&self, effect: StoreEffect) {
        match effect {
            StoreEffect::Emit(side_effect) => {
                tracing::debug!(message = side_effect.message(), "emitting side effect");
                self.side_effects.emit(side_effect);
            }
            StoreEffect::LoadAll { force_load } => self.load(force_load),
            StoreEffect::AddFeed { url } => match self.source.add(&url) {
                Ok(()) => self.load(false),
                Err(err) => self.fail(err.to_string()),
            },
            StoreEffect::DeleteFeed { url } => match self.source.delete(&url) {
                Ok(()) => self.load(false),
                Err(err) => self.fail(err.to_string()),
            },
        }
    }

    fn load(&self, force_load: bool) {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        match self.source.load_all(force_load) {
            Ok(feeds) => self.loop_back(FeedAction::Data { feeds }),
            Err(err) => self.fail(err.to_string()),
        }
    }

    fn fail(&self, message: String) {
        self.loop_back(FeedAction::Error { message });
    }

    // Completions go through the queue like any other action so they are
    // reduced in order with user intents.
    fn loop_back(&self, action: FeedAction) {
        let _ = self.loopback.send(Command::Dispatch(action));
    }
}
