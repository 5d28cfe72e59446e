//! Splitting reply text into Markdown and LaTeX runs
//!
//! Recognized math delimiters, in priority order at a given position:
//! `$$..$$` (block), `$..$` (inline), `\[..\]` (block), `\(..\)` (inline).
//! Anything that is not a complete, well-formed pair stays plain text, which
//! is what keeps half-streamed replies (a lone `$` waiting for its partner)
//! rendering sensibly.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Leftmost-first alternation: at equal start positions `$$` beats `$`.
/// Block forms may span lines, inline forms may not.
static MATH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\$\$(?s:(?P<dollar_block>.+?))\$\$",
        r"|\$(?P<dollar_inline>[^\s$](?:[^$\n]*?[^\s$])?)\$",
        r"|\\\[(?s:(?P<latex_block>.+?))\\\]",
        r"|\\\((?P<latex_inline>[^\n]+?)\\\)",
    ))
    .unwrap()
});

/// How a run of text is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// Markdown / prose
    PlainText,
    InlineMath,
    /// Display-mode math
    BlockMath,
}

impl SpanKind {
    pub fn is_math(self) -> bool {
        !matches!(self, SpanKind::PlainText)
    }
}

/// Delimiter family that enclosed a math span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `$..$` and `$$..$$`
    Dollar,
    /// `\(..\)` and `\[..\]`
    Latex,
}

/// A classified run of the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    /// Text of the run with math delimiters stripped
    pub raw: String,
    /// `None` for plain text
    pub delimiter: Option<Delimiter>,
}

impl Span {
    pub fn plain(raw: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::PlainText,
            raw: raw.into(),
            delimiter: None,
        }
    }

    pub fn inline_math(raw: impl Into<String>, delimiter: Delimiter) -> Self {
        Self {
            kind: SpanKind::InlineMath,
            raw: raw.into(),
            delimiter: Some(delimiter),
        }
    }

    pub fn block_math(raw: impl Into<String>, delimiter: Delimiter) -> Self {
        Self {
            kind: SpanKind::BlockMath,
            raw: raw.into(),
            delimiter: Some(delimiter),
        }
    }

    /// Opening and closing delimiters that were stripped from `raw`
    pub fn delimiters(&self) -> (&'static str, &'static str) {
        match (self.kind, self.delimiter) {
            (SpanKind::BlockMath, Some(Delimiter::Dollar)) => ("$$", "$$"),
            (SpanKind::InlineMath, Some(Delimiter::Dollar)) => ("$", "$"),
            (SpanKind::BlockMath, Some(Delimiter::Latex)) => ("\\[", "\\]"),
            (SpanKind::InlineMath, Some(Delimiter::Latex)) => ("\\(", "\\)"),
            _ => ("", ""),
        }
    }

    /// The exact input text this span was cut from
    pub fn source(&self) -> String {
        let (open, close) = self.delimiters();
        format!("{}{}{}", open, self.raw, close)
    }
}

/// Split `text` into an ordered, lossless sequence of spans
pub fn segment(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut search_from = 0;
    let mut last_math_end = None;

    while let Some(caps) = MATH_REGEX.captures_at(text, search_from) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        let Some(span) = classify(&caps) else {
            break;
        };

        if span.kind == SpanKind::InlineMath && span.delimiter == Some(Delimiter::Dollar) {
            let follows_math = last_math_end == Some(whole.start());
            match dollar_pairing(text, whole.start(), whole.end(), follows_math) {
                DollarPairing::Valid => {}
                // The opener belongs to an unmatched `$$`; a later `$` may still open
                DollarPairing::BadOpener => {
                    search_from = whole.start() + 1;
                    continue;
                }
                // The closer is spent: it never opens a new pair
                DollarPairing::BadCloser => {
                    search_from = whole.end();
                    continue;
                }
            }
        }

        if whole.start() > plain_start {
            spans.push(Span::plain(&text[plain_start..whole.start()]));
        }
        spans.push(span);
        plain_start = whole.end();
        search_from = whole.end();
        last_math_end = Some(whole.end());
    }

    if plain_start < text.len() {
        spans.push(Span::plain(&text[plain_start..]));
    }

    spans
}

fn classify(caps: &Captures<'_>) -> Option<Span> {
    if let Some(m) = caps.name("dollar_block") {
        Some(Span::block_math(m.as_str(), Delimiter::Dollar))
    } else if let Some(m) = caps.name("dollar_inline") {
        Some(Span::inline_math(m.as_str(), Delimiter::Dollar))
    } else if let Some(m) = caps.name("latex_block") {
        Some(Span::block_math(m.as_str(), Delimiter::Latex))
    } else {
        caps.name("latex_inline")
            .map(|m| Span::inline_math(m.as_str(), Delimiter::Latex))
    }
}

enum DollarPairing {
    Valid,
    BadOpener,
    BadCloser,
}

/// Pandoc-style pairing for single dollars: the opener may not be the tail
/// of a stray `$$`, and the closing `$` may not be followed by another `$`
/// or a digit (`$5 and $10`). A `$` that closed the previous math span
/// does not count as stray.
fn dollar_pairing(text: &str, start: usize, end: usize, follows_math: bool) -> DollarPairing {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    if before == Some('$') && !follows_math {
        DollarPairing::BadOpener
    } else if matches!(after, Some(c) if c == '$' || c.is_ascii_digit()) {
        DollarPairing::BadCloser
    } else {
        DollarPairing::Valid
    }
}
