//! Inline content rendering to Ratatui Spans

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use super::elements::InlineContent;
use crate::tui::themes::Theme;

/// Convert inline content to styled spans
pub fn render_inline(content: &[InlineContent], base: Style, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for item in content {
        render_inline_item(item, theme, base, &mut spans);
    }
    spans
}

fn render_inline_item(
    item: &InlineContent,
    theme: &Theme,
    base_style: Style,
    spans: &mut Vec<Span<'static>>,
) {
    match item {
        InlineContent::Text(text) => {
            spans.push(Span::styled(text.clone(), base_style));
        }
        InlineContent::Bold(content) => {
            let style = base_style.add_modifier(Modifier::BOLD);
            for inner in content {
                render_inline_item(inner, theme, style, spans);
            }
        }
        InlineContent::Italic(content) => {
            let style = base_style.add_modifier(Modifier::ITALIC);
            for inner in content {
                render_inline_item(inner, theme, style, spans);
            }
        }
        InlineContent::Code(code) => {
            let style = Style::default()
                .fg(theme.accent_color)
                .bg(theme.code_bg_color);
            spans.push(Span::styled(format!(" {} ", code), style));
        }
        InlineContent::Link { text } => {
            let style = base_style
                .fg(theme.link_color)
                .add_modifier(Modifier::UNDERLINED);
            for inner in text {
                render_inline_item(inner, theme, style, spans);
            }
        }
        InlineContent::Strikethrough(content) => {
            let style = base_style.add_modifier(Modifier::CROSSED_OUT);
            for inner in content {
                render_inline_item(inner, theme, style, spans);
            }
        }
        InlineContent::Math {
            text,
            failed,
            block,
        } => {
            let color = if *failed {
                theme.error_color
            } else {
                theme.math_color
            };
            let mut style = base_style.fg(color);
            if *block {
                style = style.bg(theme.math_block_bg_color);
            }
            spans.push(Span::styled(text.clone(), style));
        }
        // Hard breaks split lines before rendering; both read as a space here
        InlineContent::SoftBreak | InlineContent::HardBreak => {
            spans.push(Span::raw(" "));
        }
    }
}
