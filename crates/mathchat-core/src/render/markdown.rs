//! Inline Markdown rendering using pulldown-cmark
//!
//! Plain spans sit between math spans on the same line, so the output must
//! never be wrapped in block containers (`<p>`, `<li>`, `<h1>` ...). Block
//! structure is flattened: container tags are dropped, their source markers
//! (`# `, `- `, `> `) are kept as text and consecutive blocks are separated
//! by a line break.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Markdown-to-HTML engine for plain text spans
#[derive(Debug, Clone)]
pub struct MarkdownEngine {
    options: Options,
    trust_html: bool,
}

impl MarkdownEngine {
    pub fn new(trust_html: bool) -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
            trust_html,
        }
    }

    /// Render `text` to inline HTML, keeping its outer whitespace intact
    pub fn render_inline(&self, text: &str) -> String {
        let body = text.trim();
        if body.is_empty() {
            return text.to_string();
        }
        let lead = &text[..text.len() - text.trim_start().len()];
        let trail = &text[text.trim_end().len()..];

        let events = flatten_blocks(Parser::new_ext(body, self.options), self.trust_html);

        let mut out = String::with_capacity(text.len() + text.len() / 2);
        out.push_str(lead);
        html::push_html(&mut out, events.into_iter());
        // push_html ends a trailing soft break with a newline we did not ask for
        while out.ends_with('\n') {
            out.pop();
        }
        out.push_str(trail);
        out
    }
}

fn is_inline_tag(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. } | Tag::Image { .. }
    )
}

fn is_inline_end(tag: &TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link | TagEnd::Image
    )
}

/// Rewrite a block-structured event stream into inline-only events
fn flatten_blocks<'a>(parser: Parser<'a>, trust_html: bool) -> Vec<Event<'a>> {
    let mut out: Vec<Event<'a>> = Vec::new();
    // One entry per open list: next ordinal for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut pending_break = false;

    for event in parser {
        match event {
            Event::Start(tag) if is_inline_tag(&tag) => {
                push(&mut out, &mut pending_break, Event::Start(tag));
            }
            Event::End(tag) if is_inline_end(&tag) => out.push(Event::End(tag)),
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } => {
                    let marker = format!("{} ", "#".repeat(level as usize));
                    push(&mut out, &mut pending_break, Event::Text(marker.into()));
                }
                Tag::BlockQuote(_) => {
                    push(&mut out, &mut pending_break, Event::Text("> ".into()));
                }
                Tag::List(start) => lists.push(start),
                Tag::Item => {
                    let marker = match lists.last_mut() {
                        Some(Some(n)) => {
                            let marker = format!("{}. ", n);
                            *n += 1;
                            marker
                        }
                        _ => "- ".to_string(),
                    };
                    pending_break = true;
                    push(&mut out, &mut pending_break, Event::Text(marker.into()));
                }
                Tag::CodeBlock(_) => in_code_block = true,
                _ => {}
            },
            Event::End(tag) => {
                match tag {
                    TagEnd::List(_) => {
                        lists.pop();
                    }
                    TagEnd::CodeBlock => in_code_block = false,
                    _ => {}
                }
                pending_break = true;
            }
            Event::Text(text) if in_code_block => {
                let code = text.trim_end_matches('\n').to_string();
                push(&mut out, &mut pending_break, Event::Code(CowStr::from(code)));
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                let event = if trust_html {
                    Event::InlineHtml(raw)
                } else {
                    Event::Text(raw)
                };
                push(&mut out, &mut pending_break, event);
            }
            Event::Rule => push(&mut out, &mut pending_break, Event::Text("---".into())),
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                push(&mut out, &mut pending_break, Event::Text(marker.into()));
            }
            other => push(&mut out, &mut pending_break, other),
        }
    }

    out
}

/// Push a content event, inserting the line break owed to a closed block
fn push<'a>(out: &mut Vec<Event<'a>>, pending: &mut bool, event: Event<'a>) {
    if *pending && !out.is_empty() {
        out.push(Event::SoftBreak);
    }
    *pending = false;
    out.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        MarkdownEngine::new(true).render_inline(text)
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(render("some **bold** and *em*"), "some <strong>bold</strong> and <em>em</em>");
        assert_eq!(render("use `cargo`"), "use <code>cargo</code>");
        assert_eq!(
            render("[docs](https://example.com)"),
            "<a href=\"https://example.com\">docs</a>"
        );
    }

    #[test]
    fn test_no_block_wrapping() {
        let html = render("# Title\n\nparagraph one\n\n- item");
        assert!(!html.contains("<p>"), "got {}", html);
        assert!(!html.contains("<h1>"), "got {}", html);
        assert!(!html.contains("<li>"), "got {}", html);
        assert!(html.contains("# Title"));
        assert!(html.contains("- item"));
    }

    #[test]
    fn test_outer_whitespace_preserved() {
        assert_eq!(render("Solve "), "Solve ");
        assert_eq!(render(" now"), " now");
        assert_eq!(render("   "), "   ");
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_raw_html_trust() {
        assert_eq!(render("hi <b>there</b>"), "hi <b>there</b>");

        let escaped = MarkdownEngine::new(false).render_inline("hi <b>there</b>");
        assert_eq!(escaped, "hi &lt;b&gt;there&lt;/b&gt;");
    }

    #[test]
    fn test_ordered_list_markers() {
        let html = render("1. one\n2. two");
        assert!(html.contains("1. one"), "got {}", html);
        assert!(html.contains("2. two"), "got {}", html);
    }

    #[test]
    fn test_code_block_becomes_code_span() {
        let html = render("```\nlet x = 1;\n```");
        assert_eq!(html, "<code>let x = 1;</code>");
    }
}
