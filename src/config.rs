//! Configuration types for llm-inside.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Narrowest frame the visualizer will draw.
pub const MIN_WIDTH: usize = 40;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Insight fetch coordination.
    pub insight: InsightConfig,
    /// Remote explanation service.
    pub service: ServiceConfig,
    /// Terminal output.
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the app unusable.
    pub fn validate(&self) -> Result<()> {
        if self.service.model.trim().is_empty() {
            return Err(Error::Config("service.model must not be empty".into()));
        }
        if self.service.base_url.trim().is_empty() {
            return Err(Error::Config("service.base_url must not be empty".into()));
        }
        if self.display.width < MIN_WIDTH {
            return Err(Error::Config(format!(
                "display.width must be at least {MIN_WIDTH}, got {}",
                self.display.width
            )));
        }
        Ok(())
    }

    /// Set the debounce window in milliseconds.
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.insight.debounce_ms = ms;
        self
    }

    /// Set the explanation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.service.model = model.into();
        self
    }

    /// Set the language explanations are requested in.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.service.language = language.into();
        self
    }

    /// Enable or disable ANSI output.
    pub fn with_color(mut self, enable: bool) -> Self {
        self.display.color = enable;
        self
    }
}

/// Insight fetch coordination settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Quiescence delay after a stage change before a request is issued.
    pub debounce_ms: u64,
    /// Text committed when the explanation service fails for any reason.
    pub fallback_text: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            fallback_text: "AI 服务暂时不可用，请检查 API Key。".to_string(),
        }
    }
}

impl InsightConfig {
    /// Debounce window as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Remote explanation service settings (Gemini `generateContent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API root, without trailing `/models`.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Language the explanation is requested in.
    pub language: String,
    /// Sentence limit included in the prompt.
    pub max_sentences: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Environment variables checked, in order, for the API key.
    pub api_key_env: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            language: "Chinese".to_string(),
            max_sentences: 2,
            timeout_secs: 30,
            api_key_env: vec!["GEMINI_API_KEY".to_string(), "API_KEY".to_string()],
        }
    }
}

impl ServiceConfig {
    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// First non-empty API key found in the configured environment variables.
    pub fn api_key_from_env(&self) -> Option<String> {
        self.api_key_env
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Emit ANSI clear-screen and styling sequences.
    pub color: bool,
    /// Frame width in columns.
    pub width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            width: 72,
        }
    }
}
