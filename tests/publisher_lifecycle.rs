//! StatePublisher: subscription lifecycle, ordering and teardown.

mod common;

use common::*;
use feedbridge::config::BridgeSettings;
use feedbridge::error::{BridgeError, StreamKind, SubscribeError};
use feedbridge::publisher::{SideEffectEvent, StatePublisher};
use feedbridge::store::{FeedAction, FeedSideEffect, FeedState};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// -- Construction ------------------------------------------------------------

#[test]
fn fields_hold_defaults_before_first_pump() {
    let store = ManualStore::with_initial(loaded(&["A"]));
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    assert_eq!(publisher.state().get(), FeedState::default());
    assert_eq!(publisher.side_effect().get(), None);
    assert_eq!(store.live_subscriptions(), 2);
}

#[test]
fn replayed_state_arrives_on_first_pump() {
    let store = ManualStore::with_initial(loaded(&["A"]));
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    assert_eq!(publisher.pump(), 1);
    assert_eq!(publisher.state().get(), loaded(&["A"]));
}

#[test]
fn builder_initial_state_is_used_until_emission() {
    let store = ManualStore::new();
    let seeded = FeedState::new(true, Vec::new(), None);
    let publisher = StatePublisher::builder(as_store(&store))
        .initial_state(seeded.clone())
        .build()
        .unwrap();
    assert_eq!(publisher.state().get(), seeded);

    publisher.pump();
    assert_eq!(publisher.state().get(), FeedState::default());
}

#[test]
fn refused_side_effect_stream_releases_state_subscription() {
    let store = ManualStore::new();
    store.side_effects.refuse();

    let err = StatePublisher::new(as_store(&store)).err().unwrap();
    assert!(matches!(
        err,
        BridgeError::Subscribe {
            stream: StreamKind::SideEffect,
            source: SubscribeError::Rejected { .. },
        }
    ));
    assert_eq!(store.live_subscriptions(), 0);
    assert_eq!(store.states.released(), 1);
}

#[test]
fn refused_state_stream_never_touches_side_effects() {
    let store = ManualStore::new();
    store.states.refuse();

    let err = StatePublisher::new(as_store(&store)).err().unwrap();
    assert!(matches!(
        err,
        BridgeError::Subscribe {
            stream: StreamKind::State,
            ..
        }
    ));
    assert_eq!(store.live_subscriptions(), 0);
    assert_eq!(store.side_effects.released(), 0);
}

// -- Emissions ---------------------------------------------------------------

#[test]
fn states_apply_in_emission_order() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();
    publisher.pump();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = publisher
        .state()
        .subscribe(move |state: &FeedState| sink.borrow_mut().push(state.feeds.len()));

    store.states.emit(loaded(&["A"]));
    store.states.emit(loaded(&["A", "B"]));
    store.states.emit(loaded(&["A", "B", "C"]));
    assert_eq!(publisher.pump(), 3);

    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert_eq!(publisher.state().get(), loaded(&["A", "B", "C"]));
}

#[test]
fn equal_state_does_not_notify() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();
    publisher.pump();

    store.states.emit(loaded(&["A"]));
    publisher.pump();
    let version = publisher.state().version();

    store.states.emit(loaded(&["A"]));
    assert_eq!(publisher.pump(), 0);
    assert_eq!(publisher.state().version(), version);
}

#[test]
fn identical_side_effects_each_notify() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = publisher
        .side_effect()
        .subscribe(move |event: &Option<SideEffectEvent>| {
            if let Some(event) = event {
                sink.borrow_mut().push(event.effect.clone());
            }
        });

    let effect = FeedSideEffect::Error("In progress".into());
    store.side_effects.emit(effect.clone());
    store.side_effects.emit(effect.clone());
    publisher.pump();

    assert_eq!(*seen.borrow(), vec![effect.clone(), effect.clone()]);
    assert_eq!(publisher.drain_side_effects(), vec![effect.clone(), effect]);
    assert!(publisher.drain_side_effects().is_empty());
}

#[test]
fn side_effect_backlog_drops_oldest() {
    let store = ManualStore::new();
    let publisher = StatePublisher::builder(as_store(&store))
        .settings(BridgeSettings {
            side_effect_backlog: 2,
            ..BridgeSettings::default()
        })
        .build()
        .unwrap();

    for message in ["one", "two", "three"] {
        store.side_effects.emit(FeedSideEffect::Error(message.into()));
    }
    publisher.pump();

    assert_eq!(
        publisher.drain_side_effects(),
        vec![
            FeedSideEffect::Error("two".into()),
            FeedSideEffect::Error("three".into()),
        ]
    );
}

#[test]
fn pump_respects_drain_budget() {
    let store = ManualStore::new();
    let publisher = StatePublisher::builder(as_store(&store))
        .settings(BridgeSettings {
            max_drain_per_pump: 2,
            ..BridgeSettings::default()
        })
        .build()
        .unwrap();
    publisher.pump();

    for count in 1..=5 {
        let titles: Vec<String> = (0..count).map(|i| format!("F{}", i)).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        store.states.emit(loaded(&refs));
    }

    assert_eq!(publisher.pump(), 2);
    assert_eq!(publisher.state().get().feeds.len(), 2);
    assert_eq!(publisher.pump(), 2);
    assert_eq!(publisher.pump(), 1);
    assert_eq!(publisher.state().get().feeds.len(), 5);
}

#[test]
fn zero_drain_budget_still_applies_emissions() {
    let store = ManualStore::new();
    let publisher = StatePublisher::builder(as_store(&store))
        .settings(BridgeSettings {
            max_drain_per_pump: 0,
            side_effect_backlog: 0,
        })
        .build()
        .unwrap();

    store.states.emit(loaded(&["A"]));
    store.side_effects.emit(FeedSideEffect::Error("one".into()));
    store.side_effects.emit(FeedSideEffect::Error("two".into()));
    for _ in 0..5 {
        publisher.pump();
    }

    assert_eq!(publisher.state().get(), loaded(&["A"]));
    assert_eq!(
        publisher.drain_side_effects(),
        vec![FeedSideEffect::Error("two".into())]
    );
}

#[test]
fn waker_fires_once_per_emission() {
    let store = ManualStore::new();
    let wakes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&wakes);
    let _publisher = StatePublisher::builder(as_store(&store))
        .waker(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    // Replay on registration counts as an emission.
    assert_eq!(wakes.load(Ordering::SeqCst), 1);

    store.states.emit(loaded(&["A"]));
    store.side_effects.emit(FeedSideEffect::Error("x".into()));
    assert_eq!(wakes.load(Ordering::SeqCst), 3);
}

#[test]
fn emissions_from_producer_thread_arrive_in_order() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = publisher
        .state()
        .subscribe(move |state: &FeedState| sink.borrow_mut().push(state.feeds.len()));

    let producer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for count in 1..=50 {
                let titles: Vec<String> = (0..count).map(|i| format!("F{}", i)).collect();
                let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
                store.states.emit(loaded(&refs));
            }
        })
    };
    producer.join().unwrap();

    assert!(pump_until(&publisher, Duration::from_secs(2), |p| {
        p.state().get().feeds.len() == 50
    }));
    let seen = seen.borrow();
    assert!(seen.windows(2).all(|pair| pair[0] < pair[1]));
}

// -- Dispatch ----------------------------------------------------------------

#[test]
fn dispatch_reaches_store_unchanged() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    publisher.dispatch(FeedAction::Refresh { force_load: true });
    publisher.dispatcher().dispatch(FeedAction::Add {
        url: "https://a.example/feed".into(),
    });

    assert_eq!(
        store.dispatched(),
        vec![
            FeedAction::Refresh { force_load: true },
            FeedAction::Add {
                url: "https://a.example/feed".into()
            },
        ]
    );
    assert!(publisher.dispatcher().same_channel(&publisher.dispatcher()));
}

// -- Teardown ----------------------------------------------------------------

#[test]
fn close_releases_both_subscriptions() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    publisher.close();
    assert!(publisher.is_closed());
    assert_eq!(store.live_subscriptions(), 0);
    assert_eq!(store.releases(), 2);
    assert_eq!(store.states.observer_count(), 0);
}

#[test]
fn close_twice_releases_once() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();

    publisher.close();
    publisher.close();
    drop(publisher);
    assert_eq!(store.releases(), 2);
}

#[test]
fn no_change_after_close() {
    let store = ManualStore::new();
    let publisher = StatePublisher::new(as_store(&store)).unwrap();
    store.states.emit(loaded(&["A"]));
    publisher.pump();

    // Undelivered emissions are discarded too.
    store.states.emit(loaded(&["A", "B"]));
    publisher.close();
    store.states.emit(loaded(&["A", "B", "C"]));

    assert_eq!(publisher.pump(), 0);
    assert_eq!(publisher.wait_and_pump(Duration::from_millis(10)), 0);
    assert_eq!(publisher.state().get(), loaded(&["A"]));
}

#[test]
fn drop_releases_subscriptions() {
    let store = ManualStore::new();
    {
        let _publisher = StatePublisher::new(as_store(&store)).unwrap();
        assert_eq!(store.live_subscriptions(), 2);
    }
    assert_eq!(store.live_subscriptions(), 0);
}

#[test]
fn two_publishers_share_one_store() {
    let store = ManualStore::new();
    let first = StatePublisher::new(as_store(&store)).unwrap();
    let second = StatePublisher::new(as_store(&store)).unwrap();
    assert_eq!(store.live_subscriptions(), 4);

    store.states.emit(loaded(&["A"]));
    first.pump();
    second.pump();
    assert_eq!(first.state().get(), second.state().get());

    first.close();
    store.states.emit(loaded(&["A", "B"]));
    second.pump();
    assert_eq!(second.state().get(), loaded(&["A", "B"]));
    assert_eq!(first.state().get(), loaded(&["A"]));
    assert_eq!(store.live_subscriptions(), 2);
}
