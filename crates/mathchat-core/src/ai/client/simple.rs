//! Simple (non-streaming) completions
//!
//! Used when streaming is disabled in the config or with `--no-stream`.

use tracing::{debug, info};

use super::core::AiClient;
use crate::ai::types::CompletionResponse;
use crate::chat::ChatRole;
use crate::error::{ChatError, Result};
use crate::render::RenderedSpan;

/// A whole reply, rendered once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub spans: Vec<RenderedSpan>,
}

impl AiClient {
    /// Request a complete reply to `history` in one response
    pub async fn complete(&self, history: &[(ChatRole, String)]) -> Result<Completion> {
        let body = self.request_body(history, false);
        let response = self.send(&body).await?;
        let raw = response.text().await?;
        debug!("Completion response: {} bytes", raw.len());

        let parsed: CompletionResponse = serde_json::from_str(&raw)
            .map_err(|e| ChatError::InvalidResponse(format!("{}: {}", e, raw)))?;
        if parsed.choices.is_empty() {
            return Err(ChatError::InvalidResponse(
                "response contained no choices".to_string(),
            ));
        }
        let text = parsed.into_content().unwrap_or_default();
        info!("Completion received: {} chars", text.len());

        let spans = self.renderer().render_text(&text);
        Ok(Completion { text, spans })
    }
}
