//! Wire types for the chat completions API

use serde::{Deserialize, Serialize};

/// One entry of the request's `messages` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: String,
    pub content: String,
}

impl RequestMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<RequestMessage>,
    pub model: String,
    pub stream: bool,
    pub temperature: f32,
}

/// One `data:` payload of a streamed response
#[derive(Debug, Default, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
pub struct Delta {
    pub content: Option<String>,
}

impl StreamChunk {
    /// Text fragment carried by the first choice, if any
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
    }
}

/// Body of a non-streaming response
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            messages: vec![RequestMessage::new("user", "hi")],
            model: "grok-beta".to_string(),
            stream: true,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [{"role": "user", "content": "hi"}],
                "model": "grok-beta",
                "stream": true,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_stream_chunk_content() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"id":"x","choices":[{"index":0,"delta":{"content":"Hi"}}]}"#)
                .unwrap();
        assert_eq!(chunk.into_content().as_deref(), Some("Hi"));

        let role_only: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(role_only.into_content(), None);

        let empty: StreamChunk = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.into_content(), None);
    }
}
