//! The feed list screen: feeds on the left, posts of the selection on the right.

use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::connect::ConnectedView;
use crate::publisher::Dispatcher;
use crate::store::{Feed, FeedAction, FeedState};
use crate::ui::theme::{ACCENT, ACTIVE_HIGHLIGHT, GLOBAL_BORDER, HEADER_TEXT, STATUS_BUSY};

type Handler = Box<dyn Fn()>;

/// One line of the feed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub title: String,
    pub url: String,
    pub posts: usize,
    pub is_default: bool,
}

pub struct FeedListProps {
    pub rows: Vec<FeedRow>,
    pub selected: Option<usize>,
    pub loading: bool,
    /// Titles of the posts shown in the detail pane.
    pub post_titles: Vec<String>,
    pub on_refresh: Handler,
    pub on_select_next: Handler,
    pub on_select_prev: Handler,
    pub on_clear_selection: Handler,
    /// `None` when nothing is selected or the selection is a default feed.
    pub on_delete_selected: Option<Handler>,
}

#[derive(Default)]
pub struct FeedListView;

impl ConnectedView for FeedListView {
    type Props = FeedListProps;
    type Output = FeedListScreen;

    fn map(&self, state: &FeedState, dispatch: &Dispatcher) -> FeedListProps {
        let rows = state
            .feeds
            .iter()
            .map(|feed| FeedRow {
                title: feed.title.clone(),
                url: feed.source_url.clone(),
                posts: feed.posts.len(),
                is_default: feed.is_default,
            })
            .collect();
        let selected = state
            .selected_feed
            .as_ref()
            .and_then(|selected| state.feeds.iter().position(|feed| feed == selected));

        let post_titles = match &state.selected_feed {
            Some(feed) => feed.posts.iter().map(|post| post.title.clone()).collect(),
            None => state
                .feeds
                .iter()
                .flat_map(|feed| feed.posts.iter().map(|post| post.title.clone()))
                .collect(),
        };

        let on_refresh = {
            let dispatch = dispatch.clone();
            Box::new(move || dispatch.dispatch(FeedAction::Refresh { force_load: true })) as Handler
        };
        let on_select_next = select_handler(dispatch, neighbour(&state.feeds, selected, Step::Next));
        let on_select_prev = select_handler(dispatch, neighbour(&state.feeds, selected, Step::Prev));
        let on_clear_selection = select_handler(dispatch, None);
        let on_delete_selected = state
            .selected_feed
            .as_ref()
            .filter(|feed| !feed.is_default)
            .map(|feed| {
                let dispatch = dispatch.clone();
                let url = feed.source_url.clone();
                Box::new(move || dispatch.dispatch(FeedAction::Delete { url: url.clone() }))
                    as Handler
            });

        FeedListProps {
            rows,
            selected,
            loading: state.in_progress,
            post_titles,
            on_refresh,
            on_select_next,
            on_select_prev,
            on_clear_selection,
            on_delete_selected,
        }
    }

    fn render(&self, props: FeedListProps) -> FeedListScreen {
        FeedListScreen { props }
    }
}

enum Step {
    Next,
    Prev,
}

fn neighbour(feeds: &[Feed], selected: Option<usize>, step: Step) -> Option<Feed> {
    if feeds.is_empty() {
        return None;
    }
    let last = feeds.len() - 1;
    let index = match (selected, step) {
        (None, Step::Next) => 0,
        (None, Step::Prev) => last,
        (Some(i), Step::Next) => (i + 1).min(last),
        (Some(i), Step::Prev) => i.saturating_sub(1),
    };
    feeds.get(index).cloned()
}

fn select_handler(dispatch: &Dispatcher, feed: Option<Feed>) -> Handler {
    let dispatch = dispatch.clone();
    Box::new(move || dispatch.dispatch(FeedAction::SelectFeed { feed: feed.clone() }))
}

/// Rendered output of [`FeedListView`]: drawable, and owns the key handlers
/// bound to the state it was rendered from.
pub struct FeedListScreen {
    props: FeedListProps,
}

impl FeedListScreen {
    pub fn rows(&self) -> &[FeedRow] {
        &self.props.rows
    }

    pub fn selected(&self) -> Option<usize> {
        self.props.selected
    }

    pub fn is_loading(&self) -> bool {
        self.props.loading
    }

    pub fn post_titles(&self) -> &[String] {
        &self.props.post_titles
    }

    pub fn can_delete(&self) -> bool {
        self.props.on_delete_selected.is_some()
    }

    /// Run the handler bound to `key`. Returns whether the key was handled.
    pub fn handle_key(&self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('r') => (self.props.on_refresh)(),
            KeyCode::Char('j') | KeyCode::Down => (self.props.on_select_next)(),
            KeyCode::Char('k') | KeyCode::Up => (self.props.on_select_prev)(),
            KeyCode::Esc => (self.props.on_clear_selection)(),
            KeyCode::Char('d') => match &self.props.on_delete_selected {
                Some(delete) => delete(),
                None => return false,
            },
            _ => return false,
        }
        true
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let [feeds_area, posts_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(area);

        let items: Vec<ListItem> = self
            .props
            .rows
            .iter()
            .map(|row| {
                let marker = if row.is_default { "★ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(ACCENT)),
                    Span::styled(row.title.clone(), Style::default().fg(HEADER_TEXT)),
                    Span::styled(
                        format!("  ({})", row.posts),
                        Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM),
                    ),
                ]))
            })
            .collect();

        let title = if self.props.loading {
            Span::styled(" Feeds (loading…) ", Style::default().fg(STATUS_BUSY))
        } else {
            Span::styled(" Feeds ", Style::default().fg(ACCENT))
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GLOBAL_BORDER)),
            )
            .highlight_style(
                Style::default()
                    .bg(ACTIVE_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            );
        let mut list_state = ListState::default().with_selected(self.props.selected);
        frame.render_stateful_widget(list, feeds_area, &mut list_state);

        let posts: Vec<ListItem> = self
            .props
            .post_titles
            .iter()
            .map(|title| ListItem::new(Line::from(format!(" • {}", title))))
            .collect();
        let posts = List::new(posts).block(
            Block::default()
                .title(Span::styled(" Posts ", Style::default().fg(ACCENT)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        );
        frame.render_widget(posts, posts_area);
    }
}
