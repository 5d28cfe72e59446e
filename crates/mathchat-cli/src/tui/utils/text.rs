//! Text Utilities - wrapping and truncation
//!
//! IMPORTANT: All width calculations use unicode display width, not byte length.
//! This correctly handles multi-byte UTF-8 characters and wide characters (CJK, emoji).

use std::borrow::Cow;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Get display width of a string (handles unicode properly)
#[inline]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// A run of one style that is either all whitespace or contains none
struct Token {
    text: String,
    style: Style,
    is_space: bool,
}

fn tokenize(spans: Vec<Span<'static>>) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for span in spans {
        let style = span.style;
        let mut current = String::new();
        let mut current_space = false;
        for c in span.content.chars() {
            let is_space = c.is_whitespace();
            if !current.is_empty() && is_space != current_space {
                tokens.push(Token {
                    text: std::mem::take(&mut current),
                    style,
                    is_space: current_space,
                });
            }
            current_space = is_space;
            current.push(c);
        }
        if !current.is_empty() {
            tokens.push(Token {
                text: current,
                style,
                is_space: current_space,
            });
        }
    }
    tokens
}

/// Wrap one logical line of styled spans at word boundaries to fit `max_width`
///
/// Words longer than max_width are force-broken by character. Whitespace
/// at the start of a continuation line is dropped; leading whitespace of
/// the first line is kept so indentation survives.
pub fn wrap_spans(spans: Vec<Span<'static>>, max_width: usize) -> Vec<Line<'static>> {
    if max_width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for token in tokenize(spans) {
        let width = display_width(&token.text);

        if token.is_space {
            if current_width + width <= max_width && (!current.is_empty() || lines.is_empty()) {
                current.push(Span::styled(token.text, token.style));
                current_width += width;
            }
            continue;
        }

        if current_width + width > max_width && current_width > 0 {
            lines.push(Line::from(std::mem::take(&mut current)));
            current_width = 0;
        }

        if width <= max_width {
            current.push(Span::styled(token.text, token.style));
            current_width += width;
            continue;
        }

        // Break by characters, respecting display width
        let mut chunk = String::new();
        for c in token.text.chars() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width && current_width > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), token.style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            chunk.push(c);
            current_width += char_width;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, token.style));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

/// Truncate a string to fit within max display width, adding ellipsis if needed.
///
/// Returns `Cow::Borrowed` if no truncation needed (zero allocation).
pub fn truncate_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let current_width = display_width(s);
    if current_width <= max_width {
        return Cow::Borrowed(s);
    }

    // Need at least 4 chars for "X..." pattern
    if max_width < 4 {
        return Cow::Owned(s.chars().take(max_width).collect());
    }

    let target_width = max_width - 3;
    let mut width = 0;
    let truncated: String = s
        .chars()
        .take_while(|c| {
            let char_width = UnicodeWidthChar::width(*c).unwrap_or(0);
            if width + char_width <= target_width {
                width += char_width;
                true
            } else {
                false
            }
        })
        .collect();

    Cow::Owned(format!("{}...", truncated))
}
