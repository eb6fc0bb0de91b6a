//! The dispatch channel handed to views.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;
use scopeguard::ScopeGuard;

use crate::store::FeedAction;

type Sink = Arc<dyn Fn(FeedAction) + Send + Sync>;

/// Forwards actions to the store.
///
/// Cheap to clone and pass by value to any number of views. While a render
/// pass is open on a thread, dispatches from that same thread do not reach
/// the store: the action is parked and forwarded on the next event-loop turn
/// instead. Other threads are never held back by someone else's render.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatchInner>,
}

struct DispatchInner {
    sink: Sink,
    // One entry per open render pass; nested passes repeat the thread.
    rendering: Mutex<Vec<ThreadId>>,
    deferred: Mutex<VecDeque<FeedAction>>,
}

impl Dispatcher {
    pub fn from_fn<F>(sink: F) -> Self
    where
        F: Fn(FeedAction) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DispatchInner {
                sink: Arc::new(sink),
                rendering: Mutex::new(Vec::new()),
                deferred: Mutex::new(VecDeque::new()),
            }),
        }
    }

    pub fn dispatch(&self, action: FeedAction) {
        if self.is_rendering() {
            tracing::warn!(?action, "dispatch during render pass; deferring to next turn");
            self.inner.deferred.lock().push_back(action);
            return;
        }
        (self.inner.sink)(action);
    }

    /// Forward every action parked during render passes, oldest first.
    pub fn flush_deferred(&self) -> usize {
        if self.is_rendering() {
            return 0;
        }
        let pending: Vec<FeedAction> = self.inner.deferred.lock().drain(..).collect();
        let count = pending.len();
        for action in pending {
            (self.inner.sink)(action);
        }
        count
    }

    pub fn deferred_len(&self) -> usize {
        self.inner.deferred.lock().len()
    }

    /// Whether the calling thread is inside a render pass on this channel.
    pub fn is_rendering(&self) -> bool {
        let current = thread::current().id();
        self.inner.rendering.lock().contains(&current)
    }

    /// Drop every parked action without forwarding it. Returns how many.
    pub fn discard_deferred(&self) -> usize {
        let mut deferred = self.inner.deferred.lock();
        let count = deferred.len();
        deferred.clear();
        count
    }

    /// Open a render pass on the calling thread; it closes when the returned
    /// guard drops, on every exit path including unwinding.
    pub(crate) fn begin_render(&self) -> ScopeGuard<Dispatcher, impl FnOnce(Dispatcher)> {
        let current = thread::current().id();
        self.inner.rendering.lock().push(current);
        scopeguard::guard(self.clone(), move |dispatcher| {
            let mut rendering = dispatcher.inner.rendering.lock();
            if let Some(index) = rendering.iter().rposition(|id| *id == current) {
                rendering.remove(index);
            }
        })
    }

    /// Whether both values forward to the same channel.
    pub fn same_channel(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("rendering", &self.is_rendering())
            .field("deferred", &self.deferred_len())
            .finish()
    }
}
