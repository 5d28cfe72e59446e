//! Rendering of reply text
//!
//! Text is split by the segmenter into plain and math spans; plain spans go
//! through the Markdown engine, math spans through the LaTeX engine. Both
//! engines are built once and shared, so rendering the whole reply on every
//! streamed increment needs no per-call setup.

mod markdown;
mod math;
mod segment;

pub use markdown::MarkdownEngine;
pub use math::{error_markup, MathEngine};
pub use segment::{segment, Delimiter, Span, SpanKind};

/// Options fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pass raw HTML found in Markdown through unescaped
    pub trust_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { trust_html: true }
    }
}

/// A span together with its display-ready markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpan {
    pub kind: SpanKind,
    /// Source text of the span, delimiters stripped
    pub raw: String,
    pub delimiter: Option<Delimiter>,
    /// HTML for plain spans, MathML (or fallback error markup) for math
    pub markup: String,
}

impl RenderedSpan {
    /// The input text this span was rendered from, delimiters included
    pub fn source(&self) -> String {
        Span {
            kind: self.kind,
            raw: self.raw.clone(),
            delimiter: self.delimiter,
        }
        .source()
    }

    /// CSS class the span is wrapped in when embedded in a page
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            SpanKind::PlainText => "markdown",
            SpanKind::InlineMath => "latex-inline",
            SpanKind::BlockMath => "latex-block",
        }
    }
}

/// Span renderer holding the shared Markdown and math engines
#[derive(Debug, Clone)]
pub struct Renderer {
    markdown: MarkdownEngine,
    math: MathEngine,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            markdown: MarkdownEngine::new(options.trust_html),
            math: MathEngine::new(),
        }
    }

    /// Render one span. Never fails; bad LaTeX yields error markup.
    pub fn render(&self, span: &Span) -> RenderedSpan {
        let markup = match span.kind {
            SpanKind::PlainText => self.markdown.render_inline(&span.raw),
            SpanKind::InlineMath => self.math.render(&span.raw, false),
            SpanKind::BlockMath => self.math.render(&span.raw, true),
        };

        RenderedSpan {
            kind: span.kind,
            raw: span.raw.clone(),
            delimiter: span.delimiter,
            markup,
        }
    }

    pub fn render_all(&self, spans: &[Span]) -> Vec<RenderedSpan> {
        spans.iter().map(|span| self.render(span)).collect()
    }

    /// Segment and render `text` in one pass
    pub fn render_text(&self, text: &str) -> Vec<RenderedSpan> {
        self.render_all(&segment(text))
    }
}

/// Reassemble the text a span sequence was rendered from
pub fn source_text(spans: &[RenderedSpan]) -> String {
    spans.iter().map(RenderedSpan::source).collect()
}

/// Join rendered spans into one HTML fragment, each in a classed `<span>`
pub fn to_html(spans: &[RenderedSpan]) -> String {
    spans
        .iter()
        .map(|span| format!("<span class=\"{}\">{}</span>", span.css_class(), span.markup))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_routed_to_matching_engine() {
        let rendered = Renderer::default().render_text("Energy equals $$E=mc^2$$.");

        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0].kind, SpanKind::PlainText);
        assert_eq!(rendered[0].markup, "Energy equals ");
        assert_eq!(rendered[1].kind, SpanKind::BlockMath);
        assert_eq!(rendered[1].raw, "E=mc^2");
        assert!(rendered[1].markup.contains("display=\"block\""));
        assert_eq!(rendered[2].markup, ".");
    }

    #[test]
    fn test_inline_math_not_display_mode() {
        let rendered = Renderer::default().render_text("Solve $x^2=4$ now");
        assert_eq!(rendered[1].kind, SpanKind::InlineMath);
        assert!(rendered[1].markup.contains("<math"));
        assert!(!rendered[1].markup.contains("display=\"block\""));
    }

    #[test]
    fn test_render_all_is_total() {
        let renderer = Renderer::default();
        let inputs = [
            r"$\frac{1$",
            r"$$\begin{matrix}$$",
            r"\(\left( x\)",
            "$}{$ and $$^_^$$",
            "**unclosed *markdown [link](",
            "<script>alert(1)</script> $x$",
            "$$$$$$$$$",
            "\\",
            "",
        ];
        for input in inputs {
            let spans = segment(input);
            let rendered = renderer.render_all(&spans);
            assert_eq!(rendered.len(), spans.len(), "input: {:?}", input);
            for (span, out) in spans.iter().zip(&rendered) {
                assert_eq!(span.kind, out.kind);
                assert_eq!(span.raw, out.raw);
                if span.kind.is_math() {
                    assert!(!out.markup.is_empty(), "empty markup for {:?}", input);
                }
            }
        }
    }

    #[test]
    fn test_untrusted_html_is_escaped() {
        let renderer = Renderer::new(RenderOptions { trust_html: false });
        let rendered = renderer.render_text("<img src=x onerror=alert(1)>");
        assert!(!rendered[0].markup.contains("<img"));
    }

    #[test]
    fn test_source_text_restores_input() {
        let text = r"Area \(\pi r^2\) and $$\int_0^1 x\,dx$$ cost $5";
        let rendered = Renderer::default().render_text(text);
        assert_eq!(source_text(&rendered), text);
    }

    #[test]
    fn test_to_html_wraps_with_classes() {
        let rendered = Renderer::default().render_text("a $b$");
        let html = to_html(&rendered);
        assert!(html.starts_with("<span class=\"markdown\">a </span>"));
        assert!(html.contains("<span class=\"latex-inline\"><span class=\"katex\"><math"));
    }
}
