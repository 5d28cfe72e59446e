//! Markdown parsing using pulldown-cmark
//!
//! A plain span is a fragment between formulas, so block structure is
//! flattened into one inline run: block boundaries become hard breaks and
//! list, heading and quote markers are kept as text.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::Regex;

use super::elements::InlineContent;

/// Regex for detecting bare URLs in text
static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s<>\[\]()]+").unwrap());

#[derive(Clone, Copy)]
enum InlineStyle {
    Bold,
    Italic,
    Strikethrough,
    Link,
}

/// Parse one plain span into inline content, keeping its outer whitespace
pub fn parse_inline(text: &str) -> Vec<InlineContent> {
    let body = text.trim();
    if body.is_empty() {
        return whitespace(text).into_iter().collect();
    }
    let lead = &text[..text.len() - text.trim_start().len()];
    let trail = &text[text.trim_end().len()..];

    let mut content: Vec<InlineContent> = whitespace(lead).into_iter().collect();
    content.extend(parse_body(body));
    content.extend(whitespace(trail));
    content
}

/// Outer whitespace is a line break if it spans lines, else one space
fn whitespace(ws: &str) -> Option<InlineContent> {
    if ws.is_empty() {
        None
    } else if ws.contains('\n') {
        Some(InlineContent::HardBreak)
    } else {
        Some(InlineContent::Text(" ".to_string()))
    }
}

fn parse_body(body: &str) -> Vec<InlineContent> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut content = Vec::new();
    let mut style_stack: Vec<InlineStyle> = Vec::new();
    // One entry per open list: next ordinal for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code_block = false;
    let mut pending_break = false;

    for event in Parser::new_ext(body, options) {
        match event {
            Event::Start(Tag::Strong) => style_stack.push(InlineStyle::Bold),
            Event::Start(Tag::Emphasis) => style_stack.push(InlineStyle::Italic),
            Event::Start(Tag::Strikethrough) => style_stack.push(InlineStyle::Strikethrough),
            Event::Start(Tag::Link { .. }) => style_stack.push(InlineStyle::Link),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough | TagEnd::Link) => {
                style_stack.pop();
            }
            Event::Start(Tag::Heading { level, .. }) => {
                let marker = format!("{} ", "#".repeat(level as usize));
                push_block(&mut content, &mut pending_break, InlineContent::Text(marker));
                style_stack.push(InlineStyle::Bold);
            }
            Event::End(TagEnd::Heading(_)) => {
                style_stack.pop();
                pending_break = true;
            }
            Event::Start(Tag::BlockQuote(_)) => {
                push_block(&mut content, &mut pending_break, InlineContent::Text("> ".into()));
            }
            Event::Start(Tag::List(start)) => lists.push(start),
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                pending_break = true;
            }
            Event::Start(Tag::Item) => {
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                pending_break = true;
                push_block(&mut content, &mut pending_break, InlineContent::Text(marker));
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                pending_break = true;
            }
            Event::End(_) => pending_break = true,
            Event::Text(text) if in_code_block => {
                for line in text.split_inclusive('\n') {
                    let code = line.trim_end_matches('\n').to_string();
                    push_block(&mut content, &mut pending_break, InlineContent::Code(code));
                    pending_break = line.ends_with('\n');
                }
            }
            Event::Text(text) => {
                for inline in autolink_text(&text) {
                    push_block(
                        &mut content,
                        &mut pending_break,
                        with_styles(inline, &style_stack),
                    );
                }
            }
            Event::Code(code) => {
                let inline = with_styles(InlineContent::Code(code.to_string()), &style_stack);
                push_block(&mut content, &mut pending_break, inline);
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                push_block(&mut content, &mut pending_break, InlineContent::Text(raw.to_string()));
            }
            Event::SoftBreak => content.push(InlineContent::SoftBreak),
            Event::HardBreak => content.push(InlineContent::HardBreak),
            Event::Rule => {
                push_block(&mut content, &mut pending_break, InlineContent::Text("───".into()));
                pending_break = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                push_block(&mut content, &mut pending_break, InlineContent::Text(marker.into()));
            }
            _ => {}
        }
    }

    content
}

/// Push content, first inserting the line break owed to a closed block
fn push_block(content: &mut Vec<InlineContent>, pending: &mut bool, item: InlineContent) {
    if *pending && !content.is_empty() {
        content.push(InlineContent::HardBreak);
    }
    *pending = false;
    content.push(item);
}

fn with_styles(item: InlineContent, styles: &[InlineStyle]) -> InlineContent {
    let mut result = item;
    for style in styles.iter().rev() {
        result = match style {
            InlineStyle::Bold => InlineContent::Bold(vec![result]),
            InlineStyle::Italic => InlineContent::Italic(vec![result]),
            InlineStyle::Strikethrough => InlineContent::Strikethrough(vec![result]),
            InlineStyle::Link => InlineContent::Link { text: vec![result] },
        };
    }
    result
}

/// Convert text containing bare URLs into a mix of Text and Link nodes
fn autolink_text(text: &str) -> Vec<InlineContent> {
    let mut result = Vec::new();
    let mut last_end = 0;

    for mat in URL_REGEX.find_iter(text) {
        if mat.start() > last_end {
            result.push(InlineContent::Text(text[last_end..mat.start()].to_string()));
        }
        result.push(InlineContent::Link {
            text: vec![InlineContent::Text(mat.as_str().to_string())],
        });
        last_end = mat.end();
    }

    if last_end < text.len() {
        result.push(InlineContent::Text(text[last_end..].to_string()));
    }
    if result.is_empty() {
        result.push(InlineContent::Text(text.to_string()));
    }
    result
}
