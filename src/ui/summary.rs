use std::fmt::Write;

use crate::connect::ConnectedView;
use crate::publisher::Dispatcher;
use crate::store::FeedState;

/// Plain-text rendering of the state, used in headless mode.
#[derive(Default)]
pub struct SummaryView;

pub struct SummaryProps {
    pub in_progress: bool,
    pub selected: Option<String>,
    pub feeds: Vec<(String, usize)>,
}

impl ConnectedView for SummaryView {
    type Props = SummaryProps;
    type Output = String;

    fn map(&self, state: &FeedState, _dispatch: &Dispatcher) -> SummaryProps {
        SummaryProps {
            in_progress: state.in_progress,
            selected: state.selected_feed.as_ref().map(|feed| feed.title.clone()),
            feeds: state
                .feeds
                .iter()
                .map(|feed| (feed.title.clone(), feed.posts.len()))
                .collect(),
        }
    }

    fn render(&self, props: SummaryProps) -> String {
        let mut out = String::new();
        let status = if props.in_progress { "loading" } else { "idle" };
        let _ = write!(out, "[{}] {} feeds", status, props.feeds.len());
        if let Some(selected) = &props.selected {
            let _ = write!(out, ", selected: {}", selected);
        }
        for (title, posts) in &props.feeds {
            let _ = write!(out, "\n  - {} ({} posts)", title, posts);
        }
        out
    }
}
