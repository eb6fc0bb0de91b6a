use crate::connect::ConnectedView;
use crate::publisher::Dispatcher;
use crate::store::FeedState;
use crate::ui::theme::{GLOBAL_BORDER, HEADER_SEPARATOR, HEADER_TEXT, STATUS_BUSY, STATUS_OK};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Top bar: loading indicator, feed count, current selection.
#[derive(Default)]
pub struct HeaderView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderProps {
    pub loading: bool,
    pub feed_count: usize,
    pub selected: Option<String>,
}

impl ConnectedView for HeaderView {
    type Props = HeaderProps;
    type Output = Paragraph<'static>;

    fn map(&self, state: &FeedState, _dispatch: &Dispatcher) -> HeaderProps {
        HeaderProps {
            loading: state.in_progress,
            feed_count: state.feeds.len(),
            selected: state.selected_feed.as_ref().map(|feed| feed.title.clone()),
        }
    }

    fn render(&self, props: HeaderProps) -> Paragraph<'static> {
        let text_style = Style::default().fg(HEADER_TEXT);
        let separator_style = Style::default().fg(HEADER_SEPARATOR);
        let (indicator, indicator_style) = if props.loading {
            ("● loading", Style::default().fg(STATUS_BUSY))
        } else {
            ("● ready", Style::default().fg(STATUS_OK))
        };
        let line = Line::from(vec![
            Span::styled("  ", text_style),
            Span::styled(indicator, indicator_style),
            Span::styled("  │  ", separator_style),
            Span::styled(format!("{} feeds", props.feed_count), text_style),
            Span::styled("  │  ", separator_style),
            Span::styled(
                props.selected.unwrap_or_else(|| "all feeds".to_string()),
                text_style,
            ),
        ]);

        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::TOP | Borders::BOTTOM)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}
