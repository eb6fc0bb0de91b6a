//! Thread-safe fan-out stream used by store implementations.

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use super::stream::{Observer, Subscribable};
use crate::error::SubscribeError;
use crate::watch::WatchHandle;

/// Whether late subscribers receive the most recent value on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Replay-one: a new observer immediately receives the latest value.
    Latest,
    /// Only emissions after registration are delivered.
    None,
}

/// Multi-subscriber stream with optional replay of the latest value.
///
/// Emissions are serialized: observers see values in the order `emit` was
/// called, and a replayed value is never delivered after a newer emission.
pub struct Subject<T> {
    inner: Arc<SubjectInner<T>>,
}

struct SubjectInner<T> {
    replay: Replay,
    // Held for the whole of an emission or a replaying registration.
    // Reentrant so an observer may release its own handle mid-emission.
    emit_lock: ReentrantMutex<()>,
    state: Mutex<SubjectState<T>>,
}

struct SubjectState<T> {
    observers: Vec<(u64, Arc<dyn Fn(T) + Send + Sync>)>,
    latest: Option<T>,
    next_id: u64,
    closed: bool,
}

impl<T: Clone + Send + 'static> Subject<T> {
    pub fn new(replay: Replay) -> Self {
        Self {
            inner: Arc::new(SubjectInner {
                replay,
                emit_lock: ReentrantMutex::new(()),
                state: Mutex::new(SubjectState {
                    observers: Vec::new(),
                    latest: None,
                    next_id: 0,
                    closed: false,
                }),
            }),
        }
    }

    /// Replay-one subject seeded with an initial value.
    pub fn with_latest(value: T) -> Self {
        let subject = Self::new(Replay::Latest);
        subject.inner.state.lock().latest = Some(value);
        subject
    }

    /// Deliver `value` to every registered observer.
    pub fn emit(&self, value: T) {
        let _serial = self.inner.emit_lock.lock();
        let observers: Vec<_> = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return;
            }
            if self.inner.replay == Replay::Latest {
                state.latest = Some(value.clone());
            }
            state
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };
        for observer in observers {
            observer(value.clone());
        }
    }

    /// Stop delivering and refuse new observers.
    pub fn close(&self) {
        let _serial = self.inner.emit_lock.lock();
        let mut state = self.inner.state.lock();
        state.closed = true;
        state.observers.clear();
    }

    pub fn latest(&self) -> Option<T> {
        self.inner.state.lock().latest.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.inner.state.lock().observers.len()
    }
}

impl<T: Clone + Send + 'static> Subscribable<T> for Subject<T> {
    fn watch(&self, observer: Observer<T>) -> Result<WatchHandle, SubscribeError> {
        let observer: Arc<dyn Fn(T) + Send + Sync> = Arc::from(observer);
        let _serial = self.inner.emit_lock.lock();
        let (id, replayed) = {
            let mut state = self.inner.state.lock();
            if state.closed {
                return Err(SubscribeError::Closed);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.observers.push((id, Arc::clone(&observer)));
            let replayed = match self.inner.replay {
                Replay::Latest => state.latest.clone(),
                Replay::None => None,
            };
            (id, replayed)
        };
        if let Some(value) = replayed {
            observer(value);
        }

        let weak: Weak<SubjectInner<T>> = Arc::downgrade(&self.inner);
        Ok(WatchHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                // Wait for a running emission so no callback starts after release returns.
                let _serial = inner.emit_lock.lock();
                inner.state.lock().observers.retain(|(other, _)| *other != id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Send + 'static>() -> (Observer<T>, Arc<Mutex<Vec<T>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (Box::new(move |value| sink.lock().push(value)), seen)
    }

    #[test]
    fn replay_latest_delivers_current_value_on_watch() {
        let subject = Subject::with_latest(1);
        let (observer, seen) = recorder();
        let _handle = subject.watch(observer).unwrap();
        subject.emit(2);
        assert_eq!(*seen.lock(), vec![1, 2]);
    }

    #[test]
    fn no_replay_only_delivers_later_emissions() {
        let subject = Subject::new(Replay::None);
        subject.emit(1);
        let (observer, seen) = recorder();
        let _handle = subject.watch(observer).unwrap();
        subject.emit(2);
        assert_eq!(*seen.lock(), vec![2]);
        assert_eq!(subject.latest(), None);
    }

    #[test]
    fn released_observer_stops_receiving() {
        let subject = Subject::new(Replay::None);
        let (observer, seen) = recorder();
        let handle = subject.watch(observer).unwrap();
        subject.emit(1);
        handle.release();
        subject.emit(2);
        assert_eq!(*seen.lock(), vec![1]);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn closed_subject_refuses_watch() {
        let subject: Subject<u8> = Subject::new(Replay::None);
        subject.close();
        let (observer, _) = recorder();
        assert_eq!(subject.watch(observer).unwrap_err(), SubscribeError::Closed);
    }

    #[test]
    fn handle_outliving_subject_releases_quietly() {
        let subject: Subject<u8> = Subject::new(Replay::None);
        let (observer, _) = recorder();
        let handle = subject.watch(observer).unwrap();
        drop(subject);
        handle.release();
        assert!(handle.is_released());
    }
}
