//! State publisher: the store's push streams, republished as UI fields.
//!
//! ```text
//! store thread                      UI thread
//! ────────────                      ─────────
//! state emission ──┐
//!                  ├─→ inbox (mpsc) ─→ pump() ─→ Observable fields ─→ views
//! side effect ─────┘        │
//!                           └─→ waker() (tell the UI loop to pump)
//! ```
//!
//! Observers registered on the store never touch the fields directly. They
//! stamp each emission with a sequence number and hand it to the inbox; the
//! UI thread applies emissions in order when it pumps.

mod dispatch;

pub use dispatch::Dispatcher;

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::BridgeSettings;
use crate::error::{BridgeError, StreamKind, SubscribeError};
use crate::reactive::Observable;
use crate::store::{FeedAction, FeedSideEffect, FeedState, FeedStore};
use crate::watch::WatchHandle;

/// Called from the producer thread after an emission reaches the inbox.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// A side effect as stored in the publisher's `side_effect` field.
///
/// The sequence number keeps two identical effects distinct, so each one
/// notifies subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideEffectEvent {
    pub seq: u64,
    pub effect: FeedSideEffect,
}

enum Emission {
    State { seq: u64, state: FeedState },
    SideEffect { seq: u64, effect: FeedSideEffect },
}

/// Shared between the publisher and its store observers.
struct Gate {
    open: AtomicBool,
    seq: AtomicU64,
    waker: Option<Waker>,
}

impl Gate {
    fn forward(&self, inbox: &Sender<Emission>, emission: impl FnOnce(u64) -> Emission) {
        if !self.open.load(Ordering::SeqCst) {
            return;
        }
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        if inbox.send(emission(seq)).is_ok() {
            if let Some(waker) = &self.waker {
                waker();
            }
        }
    }
}

pub struct PublisherBuilder {
    store: Arc<dyn FeedStore>,
    initial_state: FeedState,
    settings: BridgeSettings,
    waker: Option<Waker>,
}

impl PublisherBuilder {
    /// Value of `state` until the first emission is pumped.
    pub fn initial_state(mut self, state: FeedState) -> Self {
        self.initial_state = state;
        self
    }

    /// Zero limits are raised to 1 at `build`.
    pub fn settings(mut self, settings: BridgeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn waker<F: Fn() + Send + Sync + 'static>(mut self, waker: F) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    /// Subscribe to both streams. Either both subscriptions exist afterwards
    /// or neither does.
    pub fn build(self) -> Result<StatePublisher, BridgeError> {
        let (tx, inbox) = mpsc::channel();
        let gate = Arc::new(Gate {
            open: AtomicBool::new(true),
            seq: AtomicU64::new(0),
            waker: self.waker,
        });

        let state_handle = {
            let observer_gate = Arc::clone(&gate);
            let tx = tx.clone();
            self.store
                .state_stream()
                .watch(Box::new(move |state: FeedState| {
                    observer_gate.forward(&tx, |seq| Emission::State { seq, state });
                }))
                .map_err(|source| subscribe_failed(&gate, StreamKind::State, source))?
        };

        // On failure `state_handle` drops here, releasing the state observer.
        let side_effect_handle = {
            let observer_gate = Arc::clone(&gate);
            self.store
                .side_effect_stream()
                .watch(Box::new(move |effect: FeedSideEffect| {
                    observer_gate.forward(&tx, |seq| Emission::SideEffect { seq, effect });
                }))
                .map_err(|source| subscribe_failed(&gate, StreamKind::SideEffect, source))?
        };

        let dispatcher = {
            let store = Arc::clone(&self.store);
            Dispatcher::from_fn(move |action| store.dispatch(action))
        };

        tracing::info!("state publisher subscribed to store");
        Ok(StatePublisher {
            state: Observable::new(self.initial_state),
            side_effect: Observable::new(None),
            backlog: RefCell::new(VecDeque::new()),
            inbox,
            gate,
            handles: RefCell::new(vec![state_handle, side_effect_handle]),
            dispatcher,
            last_state_seq: Cell::new(0),
            settings: usable(self.settings),
        })
    }
}

fn usable(mut settings: BridgeSettings) -> BridgeSettings {
    if settings.max_drain_per_pump == 0 {
        tracing::warn!("bridge.max_drain_per_pump is 0; using 1");
        settings.max_drain_per_pump = 1;
    }
    if settings.side_effect_backlog == 0 {
        tracing::warn!("bridge.side_effect_backlog is 0; using 1");
        settings.side_effect_backlog = 1;
    }
    settings
}

fn subscribe_failed(
    gate: &Gate,
    stream: StreamKind,
    source: SubscribeError,
) -> BridgeError {
    gate.open.store(false, Ordering::SeqCst);
    tracing::error!(%stream, error = %source, "state publisher setup failed");
    BridgeError::Subscribe { stream, source }
}

/// Observable view of a feed store for the UI thread.
///
/// Owns the two store subscriptions and releases them in [`close`], which
/// also runs on drop.
///
/// [`close`]: StatePublisher::close
pub struct StatePublisher {
    state: Observable<FeedState>,
    side_effect: Observable<Option<SideEffectEvent>>,
    backlog: RefCell<VecDeque<FeedSideEffect>>,
    inbox: Receiver<Emission>,
    gate: Arc<Gate>,
    handles: RefCell<Vec<WatchHandle>>,
    dispatcher: Dispatcher,
    last_state_seq: Cell<u64>,
    settings: BridgeSettings,
}

impl StatePublisher {
    pub fn builder(store: Arc<dyn FeedStore>) -> PublisherBuilder {
        PublisherBuilder {
            store,
            initial_state: FeedState::default(),
            settings: BridgeSettings::default(),
            waker: None,
        }
    }

    /// Build with defaults: empty initial state, default settings, no waker.
    pub fn new(store: Arc<dyn FeedStore>) -> Result<Self, BridgeError> {
        Self::builder(store).build()
    }

    pub fn state(&self) -> &Observable<FeedState> {
        &self.state
    }

    /// Latest side effect; `None` until the first one arrives.
    pub fn side_effect(&self) -> &Observable<Option<SideEffectEvent>> {
        &self.side_effect
    }

    /// Forward an action to the store.
    pub fn dispatch(&self, action: FeedAction) {
        self.dispatcher.dispatch(action);
    }

    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Side effects received since the last drain, oldest first.
    pub fn drain_side_effects(&self) -> Vec<FeedSideEffect> {
        self.backlog.borrow_mut().drain(..).collect()
    }

    /// Apply pending emissions on the calling (UI) thread. Returns how many
    /// changed a field.
    pub fn pump(&self) -> usize {
        if self.is_closed() {
            return 0;
        }
        self.dispatcher.flush_deferred();
        self.drain_inbox(0)
    }

    /// Block up to `timeout` for the next emission, then pump.
    ///
    /// Once the store has dropped every observer nothing can arrive; the call
    /// still waits out `timeout` so polling loops do not spin.
    pub fn wait_and_pump(&self, timeout: Duration) -> usize {
        if self.is_closed() {
            return 0;
        }
        self.dispatcher.flush_deferred();
        match self.inbox.recv_timeout(timeout) {
            Ok(emission) => {
                let applied = usize::from(self.apply(emission));
                applied + self.drain_inbox(1)
            }
            Err(RecvTimeoutError::Timeout) => 0,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("store streams closed; nothing left to pump");
                thread::sleep(timeout);
                0
            }
        }
    }

    /// Forward actions parked by the last render pass, release both
    /// subscriptions and discard undelivered emissions. Idempotent; fields
    /// keep their last values.
    pub fn close(&self) {
        if self.is_closed() {
            return;
        }
        let flushed = self.dispatcher.flush_deferred();
        // Closing from inside a render pass leaves the parked actions unsent.
        let dropped = self.dispatcher.discard_deferred();
        if dropped > 0 {
            tracing::warn!(
                dropped,
                "state publisher closed during render; dropping deferred dispatches"
            );
        }
        if !self.gate.open.swap(false, Ordering::SeqCst) {
            return;
        }
        if flushed > 0 {
            tracing::debug!(flushed, "forwarded deferred dispatches before close");
        }
        for handle in self.handles.borrow_mut().drain(..) {
            handle.release();
        }
        let discarded = self.inbox.try_iter().count();
        tracing::info!(discarded, "state publisher closed");
    }

    pub fn is_closed(&self) -> bool {
        !self.gate.open.load(Ordering::SeqCst)
    }

    fn drain_inbox(&self, already_processed: usize) -> usize {
        let mut processed = already_processed;
        let mut applied = 0;
        while processed < self.settings.max_drain_per_pump {
            let Ok(emission) = self.inbox.try_recv() else {
                break;
            };
            processed += 1;
            if self.apply(emission) {
                applied += 1;
            }
        }
        applied
    }

    fn apply(&self, emission: Emission) -> bool {
        match emission {
            Emission::State { seq, state } => {
                if seq <= self.last_state_seq.get() {
                    tracing::debug!(seq, last = self.last_state_seq.get(), "dropping stale state");
                    return false;
                }
                self.last_state_seq.set(seq);
                tracing::debug!(
                    seq,
                    in_progress = state.in_progress,
                    feeds = state.feeds.len(),
                    "applying state"
                );
                self.state.set(state)
            }
            Emission::SideEffect { seq, effect } => {
                tracing::debug!(seq, message = effect.message(), "applying side effect");
                self.push_backlog(effect.clone());
                self.side_effect.set(Some(SideEffectEvent { seq, effect }))
            }
        }
    }

    fn push_backlog(&self, effect: FeedSideEffect) {
        let mut backlog = self.backlog.borrow_mut();
        if backlog.len() >= self.settings.side_effect_backlog {
            backlog.pop_front();
            tracing::warn!(
                capacity = self.settings.side_effect_backlog,
                "side-effect backlog full; dropping oldest"
            );
        }
        backlog.push_back(effect);
    }
}

impl Drop for StatePublisher {
    fn drop(&mut self) {
        self.close();
    }
}
