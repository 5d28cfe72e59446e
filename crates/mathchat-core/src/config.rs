//! Configuration loading
//!
//! Settings live in `<config_dir>/mathchat/config.toml`. Every field has a
//! default, so a missing file is not an error. The API key can also come
//! from the `XAI_API_KEY` environment variable, which wins over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ChatError, Result};
use crate::render::RenderOptions;

/// Environment variable holding the bearer credential
pub const API_KEY_ENV: &str = "XAI_API_KEY";

pub const DEFAULT_API_URL: &str = "https://api.x.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "grok-beta";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful chatbot capable of rendering LaTeX and \
answering questions based on previous messages. To render inline LaTeX encapsulate it in $, \
to render block LaTeX encapsulate it in $$";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Completion endpoint
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    /// Stream the reply token by token instead of waiting for the whole response
    pub stream: bool,
    pub system_prompt: String,
    /// Credential from the config file; `XAI_API_KEY` overrides it
    pub api_key: Option<String>,
    pub connect_timeout_secs: u64,
    /// Longest wait for the next chunk of a streamed reply
    pub stream_idle_timeout_secs: u64,
    /// Pass raw HTML inside Markdown through to the rendered markup
    pub trust_html: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            stream: true,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key: None,
            connect_timeout_secs: 10,
            stream_idle_timeout_secs: 60,
            trust_html: true,
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| ChatError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `XAI_API_KEY` if it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
    }

    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ChatError::NoConfigDir)?;
        Ok(config_dir.join("mathchat").join("config.toml"))
    }

    /// Value for the `Authorization` header.
    ///
    /// A bare key gets the `Bearer` scheme; a value that already carries a
    /// scheme is sent as-is. A missing key yields an empty header and the
    /// upstream service rejects the request.
    pub fn authorization(&self) -> String {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => String::new(),
            Some(key) if key.contains(' ') => key.to_string(),
            Some(key) => format!("Bearer {}", key),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn stream_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_idle_timeout_secs)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            trust_html: self.trust_html,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model, "grok-beta");
        assert!(config.stream);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"grok-2\"\ntemperature = 0.2\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "grok-2");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.stream_idle_timeout_secs, 60);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [unclosed").unwrap();

        match Config::load_from(&path) {
            Err(ChatError::Config { path: p, .. }) => assert_eq!(p, path),
            other => panic!("Expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_authorization_header() {
        let mut config = Config::default();
        assert_eq!(config.authorization(), "");

        config.api_key = Some("xai-123".to_string());
        assert_eq!(config.authorization(), "Bearer xai-123");

        config.api_key = Some("Bearer xai-456".to_string());
        assert_eq!(config.authorization(), "Bearer xai-456");

        config.api_key = Some("   ".to_string());
        assert_eq!(config.authorization(), "");
    }
}
