//! UI rendering
//!
//! Layout, top to bottom: messages, live preview of the draft (only while
//! there is one), input box, status bar.

use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mathchat_core::{segment, ChatRole, MessageContent};

use crate::tui::app::{App, Status};
use crate::tui::markdown::{render_spans, ProjectedSpan};
use crate::tui::utils::text::truncate_ellipsis;

const MAX_INPUT_LINES: usize = 6;
const MAX_PREVIEW_LINES: usize = 4;

impl App {
    pub fn ui(&mut self, f: &mut Frame) {
        let bg = Block::default().style(Style::default().bg(self.theme.bg_color));
        f.render_widget(bg, f.area());

        let input_lines = self.input.content().split('\n').count().clamp(1, MAX_INPUT_LINES);
        let preview = if self.input.is_empty() {
            Vec::new()
        } else {
            self.preview_lines(f.area().width.saturating_sub(2) as usize)
        };
        let preview_height = if preview.is_empty() {
            0
        } else {
            preview.len().min(MAX_PREVIEW_LINES) as u16 + 2
        };

        let chunks = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(preview_height),
            Constraint::Length(input_lines as u16 + 2),
            Constraint::Length(1),
        ])
        .split(f.area());

        self.render_messages(f, chunks[0]);
        if preview_height > 0 {
            self.render_preview(f, chunks[1], preview);
        }
        self.render_input(f, chunks[2], input_lines);
        self.render_status_bar(f, chunks[3]);
    }

    /// All message lines wrapped to `width`
    pub fn message_lines(&self, width: usize) -> Vec<Line<'static>> {
        let theme = &self.theme;
        let base = Style::default().fg(theme.text_color);
        let conversation = self.turns.conversation();
        let mut lines = Vec::new();

        if conversation.is_empty() {
            lines.push(Line::from(Span::styled(
                "Ask anything. Math like $x^2$ or $$\\int_0^1 x\\,dx$$ renders as it streams.",
                Style::default().fg(theme.dim_color),
            )));
            return lines;
        }

        let count = conversation.len();
        for (i, message) in conversation.messages().iter().enumerate() {
            let (label, color) = match message.role {
                ChatRole::User => ("You", theme.user_msg_color),
                ChatRole::Assistant => ("Assistant", theme.assistant_msg_color),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));

            match &message.content {
                MessageContent::Raw(text) => {
                    let spans = segment(text);
                    lines.extend(render_spans(
                        spans.iter().map(ProjectedSpan::from),
                        width,
                        base,
                        theme,
                    ));
                }
                MessageContent::Rendered { spans, .. } if spans.is_empty() => {
                    let waiting = conversation.is_active() && i + 1 == count;
                    let (text, color) = if waiting {
                        ("…", theme.processing_color)
                    } else {
                        ("(no reply)", theme.dim_color)
                    };
                    lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
                }
                MessageContent::Rendered { spans, .. } => {
                    lines.extend(render_spans(
                        spans.iter().map(ProjectedSpan::from),
                        width,
                        base,
                        theme,
                    ));
                }
            }

            if i + 1 < count {
                lines.push(Line::default());
            }
        }
        lines
    }

    fn preview_lines(&self, width: usize) -> Vec<Line<'static>> {
        let spans = segment(self.input.content());
        render_spans(
            spans.iter().map(ProjectedSpan::from),
            width,
            Style::default().fg(self.theme.dim_color),
            &self.theme,
        )
    }

    fn render_messages(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_color))
            .title(Span::styled(
                format!(" mathchat · {} ", self.client.config().model),
                Style::default()
                    .fg(self.theme.title_color)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);

        let lines = self.message_lines(inner.width as usize);
        self.scroll
            .update_bounds(lines.len(), inner.height as usize);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((self.scroll.offset.min(u16::MAX as usize) as u16, 0));
        f.render_widget(paragraph, area);
    }

    fn render_preview(&self, f: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        // Show the end of a long draft
        let skip = lines.len().saturating_sub(MAX_PREVIEW_LINES);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_color))
            .title(Span::styled(
                " Preview ",
                Style::default().fg(self.theme.dim_color),
            ));
        let paragraph = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>()).block(block);
        f.render_widget(paragraph, area);
    }

    fn render_input(&self, f: &mut Frame, area: Rect, visible_lines: usize) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.input_border_color))
            .title(Span::styled(
                " Message ",
                Style::default().fg(self.theme.accent_color),
            ));
        let inner = block.inner(area);

        let (cursor_line, cursor_col) = self.input.cursor_line_col();
        let first_line = cursor_line.saturating_sub(visible_lines.saturating_sub(1));

        let paragraph = if self.input.is_empty() {
            Paragraph::new(Span::styled(
                "Type a message (Enter to send, Alt+Enter for a new line, /export <file>, /clear)",
                Style::default().fg(self.theme.input_placeholder_color),
            ))
        } else {
            let lines: Vec<Line> = self
                .input
                .content()
                .split('\n')
                .skip(first_line)
                .take(visible_lines)
                .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.text_color))))
                .collect();
            Paragraph::new(lines)
        };
        f.render_widget(paragraph.block(block), area);

        if inner.width > 0 && inner.height > 0 {
            let x = inner.x + (cursor_col as u16).min(inner.width - 1);
            let y = inner.y + ((cursor_line - first_line) as u16).min(inner.height - 1);
            f.set_cursor_position(Position::new(x, y));
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let (text, color) = match &self.status {
            Status::Idle => (
                "Ready · Esc to quit · PgUp/PgDn to scroll".to_string(),
                theme.dim_color,
            ),
            Status::Waiting => (
                format!("Waiting for reply (turn {})…", self.turns.tracker().current_turn),
                theme.processing_color,
            ),
            Status::Streaming => {
                let elapsed = self
                    .turns
                    .tracker()
                    .turn_duration()
                    .map(|d| format!(" {:.1}s", d.as_secs_f32()))
                    .unwrap_or_default();
                (
                    format!("Streaming reply (turn {}){}", self.turns.tracker().current_turn, elapsed),
                    theme.processing_color,
                )
            }
            Status::Info(message) => (message.clone(), theme.accent_color),
            Status::Error(message) => (format!("Error: {}", message), theme.error_color),
        };

        let text = truncate_ellipsis(&text, area.width.saturating_sub(2) as usize).into_owned();
        let bar = Paragraph::new(Line::from(Span::styled(
            format!(" {}", text),
            Style::default().fg(color),
        )))
        .style(Style::default().bg(theme.status_bar_bg_color));
        f.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathchat_core::{AiClient, Config, DecoderState, Renderer};
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(AiClient::new(Config::default()).unwrap())
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_waiting_reply_shows_placeholder() {
        let mut app = app();
        app.turns.begin("What is $x^2$?").unwrap();
        let lines = plain(&app.message_lines(40));
        assert_eq!(lines, vec!["You", "What is x²?", "", "Assistant", "…"]);
    }

    #[test]
    fn test_rendered_reply_projected() {
        let mut app = app();
        app.turns.begin("Energy?").unwrap();
        app.turns
            .apply(Renderer::default().render_text("Energy equals $$E=mc^2$$"));
        app.turns.complete(24, DecoderState::Done);
        let lines = plain(&app.message_lines(40));
        assert_eq!(&lines[3..], &["Assistant", "Energy equals", "    E=mc²"]);
    }

    #[test]
    fn test_full_frame_draws() {
        let mut app = app();
        app.turns.begin("hello").unwrap();
        app.status = Status::Error("Network error: refused".to_string());

        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|f| app.ui(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("hello"));
        assert!(text.contains("Error: Network error: refused"));
    }
}
