//! WatchHandle semantics against a real Subject.

use feedbridge::store::{Replay, Subject, Subscribable};
use feedbridge::watch::WatchHandle;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn counting(subject: &Subject<u32>) -> (WatchHandle, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let handle = subject
        .watch(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
    (handle, calls)
}

#[test]
fn release_from_another_thread_stops_delivery() {
    let subject = Subject::new(Replay::None);
    let (handle, calls) = counting(&subject);
    subject.emit(1);

    thread::spawn(move || handle.release()).join().unwrap();
    subject.emit(2);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(subject.observer_count(), 0);
}

#[test]
fn observer_may_release_its_own_handle() {
    let subject = Subject::new(Replay::None);
    let slot: Arc<Mutex<Option<WatchHandle>>> = Arc::new(Mutex::new(None));
    let calls = Arc::new(AtomicUsize::new(0));

    let handle = {
        let slot = Arc::clone(&slot);
        let calls = Arc::clone(&calls);
        subject
            .watch(Box::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                let own = slot.lock().take();
                if let Some(own) = own {
                    own.release();
                }
            }))
            .unwrap()
    };
    *slot.lock() = Some(handle);

    subject.emit(1);
    subject.emit(2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn release_outliving_the_stream_is_harmless() {
    let subject = Subject::new(Replay::None);
    let (handle, _) = counting(&subject);
    drop(subject);

    handle.release();
    assert!(handle.is_released());
}

#[test]
fn replay_one_delivers_latest_to_late_observer() {
    let subject = Subject::with_latest(7u32);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _handle = subject
        .watch(Box::new(move |value| sink.lock().push(value)))
        .unwrap();
    subject.emit(8);

    assert_eq!(*seen.lock(), vec![7, 8]);
}
