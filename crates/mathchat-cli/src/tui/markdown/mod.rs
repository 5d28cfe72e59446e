//! Terminal projection of rendered messages
//!
//! The HTML/MathML markup is for export; in the terminal each span is
//! re-projected from its source text. Plain spans get Markdown styling,
//! math spans a Unicode approximation. Block math sits on its own
//! indented line.

mod elements;
mod inline;
mod math;
mod parser;

use ratatui::style::Style;
use ratatui::text::Line;

use mathchat_core::{RenderedSpan, Span, SpanKind};

use self::elements::InlineContent;
use self::math::latex_to_unicode;
use super::themes::Theme;
use super::utils::text::wrap_spans;

const BLOCK_MATH_INDENT: &str = "    ";

/// The parts of a span the terminal needs
#[derive(Debug, Clone, Copy)]
pub struct ProjectedSpan<'a> {
    pub kind: SpanKind,
    pub raw: &'a str,
    /// The LaTeX engine rejected this formula
    pub failed: bool,
}

impl<'a> From<&'a RenderedSpan> for ProjectedSpan<'a> {
    fn from(span: &'a RenderedSpan) -> Self {
        Self {
            kind: span.kind,
            raw: &span.raw,
            failed: span.kind.is_math() && span.markup.starts_with("<span class=\"math-error\""),
        }
    }
}

impl<'a> From<&'a Span> for ProjectedSpan<'a> {
    fn from(span: &'a Span) -> Self {
        Self {
            kind: span.kind,
            raw: &span.raw,
            failed: false,
        }
    }
}

/// Project spans to wrapped, styled lines
pub fn render_spans<'a, I>(
    spans: I,
    width: usize,
    base: Style,
    theme: &Theme,
) -> Vec<Line<'static>>
where
    I: IntoIterator<Item = ProjectedSpan<'a>>,
{
    let mut logical: Vec<Vec<InlineContent>> = Vec::new();
    let mut current: Vec<InlineContent> = Vec::new();

    for span in spans {
        match span.kind {
            SpanKind::PlainText => {
                for item in parser::parse_inline(span.raw) {
                    push_item(&mut logical, &mut current, item);
                }
            }
            SpanKind::InlineMath => {
                let item = InlineContent::Math {
                    text: latex_to_unicode(span.raw),
                    failed: span.failed,
                    block: false,
                };
                push_item(&mut logical, &mut current, item);
            }
            SpanKind::BlockMath => {
                end_line(&mut logical, &mut current);
                logical.push(vec![
                    InlineContent::Text(BLOCK_MATH_INDENT.to_string()),
                    InlineContent::Math {
                        text: latex_to_unicode(span.raw),
                        failed: span.failed,
                        block: true,
                    },
                ]);
            }
        }
    }
    end_line(&mut logical, &mut current);

    logical
        .iter()
        .flat_map(|line| wrap_spans(inline::render_inline(line, base, theme), width))
        .collect()
}

fn push_item(
    logical: &mut Vec<Vec<InlineContent>>,
    current: &mut Vec<InlineContent>,
    item: InlineContent,
) {
    match item {
        InlineContent::HardBreak => end_line(logical, current),
        // Whitespace carried over from before a line break
        InlineContent::Text(ref text) if current.is_empty() && text.trim().is_empty() => {}
        item => current.push(item),
    }
}

fn end_line(logical: &mut Vec<Vec<InlineContent>>, current: &mut Vec<InlineContent>) {
    while matches!(current.last(), Some(InlineContent::Text(t)) if t.trim().is_empty()) {
        current.pop();
    }
    if !current.is_empty() {
        logical.push(std::mem::take(current));
    }
}
