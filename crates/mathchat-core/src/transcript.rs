//! Standalone HTML export of a conversation

use crate::chat::{ChatRole, Conversation, MessageContent};
use crate::render::{to_html, Renderer};

const STYLE: &str = "body { font-family: sans-serif; max-width: 48em; margin: 2em auto; }
.message { padding: 0.5em 1em; margin: 0.5em 0; border-radius: 6px; }
.message.user { background: #e8f0fe; }
.message.assistant { background: #f3f3f3; }
.latex-block { display: block; margin: 0.5em 0; }
.markdown { white-space: pre-wrap; }";

/// Render `conversation` as a complete HTML page.
///
/// Assistant messages reuse their stored render; user messages are
/// segmented and rendered with `renderer` so their math displays too.
pub fn to_html_document_with(conversation: &Conversation, renderer: &Renderer) -> String {
    let mut body = String::new();
    for message in conversation.messages() {
        let inner = match &message.content {
            MessageContent::Rendered { spans, .. } => to_html(spans),
            MessageContent::Raw(text) => to_html(&renderer.render_text(text)),
        };
        let class = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        body.push_str(&format!(
            "<div class=\"message {}\">{}</div>\n",
            class, inner
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>mathchat transcript</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        STYLE, body
    )
}

/// `to_html_document_with` using the default renderer
pub fn to_html_document(conversation: &Conversation) -> String {
    to_html_document_with(conversation, &Renderer::default())
}
