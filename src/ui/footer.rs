use crate::ui::theme::{GLOBAL_BORDER, HEADER_TEXT, STATUS_ERROR};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const HINTS: &str = " r: Refresh │ j/k: Select │ Esc: All feeds │ d: Delete │ q: Quit";

/// Bottom bar: key hints, or the latest store error while one is shown.
#[derive(Default)]
pub struct Footer {
    status: Option<String>,
}

impl Footer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Go back to key hints. Returns whether an error was showing.
    pub fn clear(&mut self) -> bool {
        self.status.take().is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn widget(&self, area: Rect) -> Paragraph<'static> {
        let (left, left_style) = match &self.status {
            Some(message) => (
                format!(" ✗ {}", message),
                Style::default().fg(STATUS_ERROR),
            ),
            None => (
                HINTS.to_string(),
                Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM),
            ),
        };
        let version = format!("v{} ", VERSION);

        // Char count, not byte count: the hints contain box-drawing glyphs.
        let content_width = area.width.saturating_sub(2) as usize;
        let padding = content_width
            .saturating_sub(left.chars().count())
            .saturating_sub(version.chars().count());

        let dim = Style::default().fg(HEADER_TEXT).add_modifier(Modifier::DIM);
        let line = Line::from(vec![
            Span::styled(left, left_style),
            Span::styled(" ".repeat(padding), dim),
            Span::styled(version, dim),
        ]);

        Paragraph::new(line).alignment(Alignment::Left).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOBAL_BORDER)),
        )
    }
}
