//! Core AI client
//!
//! Holds the HTTP client, configuration, and the shared renderer.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error};

use crate::ai::types::{ChatRequest, RequestMessage};
use crate::chat::ChatRole;
use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::render::Renderer;

/// Client for the chat completions endpoint
#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    config: Arc<Config>,
    renderer: Arc<Renderer>,
}

impl AiClient {
    /// Create a client with a renderer built from the config's options
    pub fn new(config: Config) -> Result<Self> {
        let renderer = Arc::new(Renderer::new(config.render_options()));
        Self::with_renderer(config, renderer)
    }

    /// Create a client sharing an existing renderer
    pub fn with_renderer(config: Config, renderer: Arc<Renderer>) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            renderer,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    /// Request body for `history`, with the system prompt prepended
    pub(crate) fn request_body(&self, history: &[(ChatRole, String)], stream: bool) -> ChatRequest {
        let mut messages = Vec::with_capacity(history.len() + 1);
        if !self.config.system_prompt.is_empty() {
            messages.push(RequestMessage::new("system", &self.config.system_prompt));
        }
        messages.extend(
            history
                .iter()
                .map(|(role, text)| RequestMessage::new(role.as_str(), text)),
        );

        ChatRequest {
            messages,
            model: self.config.model.clone(),
            stream,
            temperature: self.config.temperature,
        }
    }

    /// POST builder with auth and content-type headers
    pub(crate) fn build_request(&self) -> RequestBuilder {
        self.http
            .post(&self.config.api_url)
            .header(AUTHORIZATION, self.config.authorization())
            .header(CONTENT_TYPE, "application/json")
    }

    /// Send `body`, mapping a non-success status to `ChatError::Status`
    pub(crate) async fn send(&self, body: &ChatRequest) -> Result<Response> {
        debug!(
            "Sending completion request: model={}, messages={}, stream={}",
            body.model,
            body.messages.len(),
            body.stream
        );
        let response = self.build_request().json(body).send().await?;
        self.handle_error_response(response).await
    }

    /// Pass successful responses through; turn failures into errors
    pub(crate) async fn handle_error_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("API error {}: {}", status, body);
        Err(ChatError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(config: Config) -> AiClient {
        AiClient::new(config).unwrap()
    }

    #[test]
    fn test_request_body_prepends_system_prompt() {
        let client = client_with(Config::default());
        let history = vec![
            (ChatRole::User, "What is $E=mc^2$?".to_string()),
            (ChatRole::Assistant, "Energy.".to_string()),
            (ChatRole::User, "And $p$?".to_string()),
        ];

        let body = client.request_body(&history, true);
        let roles: Vec<&str> = body.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(body.messages[1].content, "What is $E=mc^2$?");
        assert_eq!(body.model, "grok-beta");
        assert!(body.stream);
    }

    #[test]
    fn test_empty_system_prompt_omitted() {
        let client = client_with(Config {
            system_prompt: String::new(),
            ..Config::default()
        });
        let body = client.request_body(&[(ChatRole::User, "hi".to_string())], false);
        assert_eq!(body.messages.len(), 1);
        assert!(!body.stream);
    }
}
