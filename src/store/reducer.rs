//! Pure transition rules of the reference feed store.

use crate::mvi::Reducer;

use super::model::{FeedAction, FeedSideEffect, FeedState};

pub const IN_PROGRESS: &str = "In progress";
pub const UNKNOWN_FEED: &str = "Unknown feed";
pub const UNEXPECTED_ACTION: &str = "Unexpected action";

/// Work requested by a transition, performed by the store worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    Emit(FeedSideEffect),
    LoadAll { force_load: bool },
    AddFeed { url: String },
    DeleteFeed { url: String },
}

/// Reducer for the feed store.
///
/// Only one load may run at a time: while `in_progress` is set, every
/// request that would start another one is refused with a side effect.
pub struct FeedReducer;

impl Reducer for FeedReducer {
    type State = FeedState;
    type Action = FeedAction;
    type Effect = StoreEffect;

    fn reduce(state: FeedState, action: FeedAction) -> (FeedState, Vec<StoreEffect>) {
        match action {
            FeedAction::Refresh { force_load } => {
                start_load(state, StoreEffect::LoadAll { force_load })
            }
            FeedAction::Add { url } => start_load(state, StoreEffect::AddFeed { url }),
            FeedAction::Delete { url } => start_load(state, StoreEffect::DeleteFeed { url }),

            FeedAction::SelectFeed { feed } => match feed {
                Some(feed) if !state.contains(&feed) => (state, vec![error(UNKNOWN_FEED)]),
                selected => (
                    FeedState {
                        selected_feed: selected,
                        ..state
                    },
                    Vec::new(),
                ),
            },

            FeedAction::Data { feeds } => {
                if !state.in_progress {
                    return (state, vec![error(UNEXPECTED_ACTION)]);
                }
                // Keep the selection only if the feed survived the reload.
                let selected_feed = state.selected_feed.filter(|feed| feeds.contains(feed));
                (FeedState::new(false, feeds, selected_feed), Vec::new())
            }

            FeedAction::Error { message } => {
                if !state.in_progress {
                    return (state, vec![error(UNEXPECTED_ACTION)]);
                }
                (
                    FeedState::new(false, state.feeds, None),
                    vec![StoreEffect::Emit(FeedSideEffect::Error(message))],
                )
            }
        }
    }
}

fn start_load(state: FeedState, effect: StoreEffect) -> (FeedState, Vec<StoreEffect>) {
    if state.in_progress {
        return (state, vec![error(IN_PROGRESS)]);
    }
    (
        FeedState {
            in_progress: true,
            ..state
        },
        vec![effect],
    )
}

fn error(message: &str) -> StoreEffect {
    StoreEffect::Emit(FeedSideEffect::Error(message.to_string()))
}
