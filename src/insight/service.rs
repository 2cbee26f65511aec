//! Explanation service seam and the Gemini `generateContent` client.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};

/// Produces a short natural-language explanation for a concept.
///
/// Implementations report every failure as an `Err`; mapping failures to
/// user-facing copy is the coordinator's job.
pub trait ExplanationService: Send + Sync + 'static {
    /// Explain `concept` in a couple of plain-text sentences.
    fn explain(&self, concept: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Build the explanation prompt for a concept.
pub fn explanation_prompt(concept: &str, language: &str, max_sentences: usize) -> String {
    format!(
        "Explain the concept of \"{concept}\" in the context of Large Language Models (LLMs) \
         and Transformers clearly and concisely in {language}. Limit to {max_sentences} \
         sentences. strictly plain text, no markdown."
    )
}

/// Build the next-word prediction prompt for a sentence.
pub fn prediction_prompt(context: &str) -> String {
    format!(
        "Given the sentence: \"{context}\", what is the most likely next word? \
         Just return the word and a fake probability percentage in this format: \"word (95%)\"."
    )
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

/// Subset of the `generateContent` response body we read.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, trimmed. `None` when empty.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

/// HTTP client for Gemini `models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ServiceConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create a client with an explicit (possibly absent) API key.
    pub fn new(config: ServiceConfig, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            api_key,
        })
    }

    /// Create a client reading the API key from the configured env vars.
    ///
    /// A missing key is not an error here; requests fail instead.
    pub fn from_env(config: ServiceConfig) -> Result<Self> {
        let api_key = config.api_key_from_env();
        if api_key.is_none() {
            tracing::warn!(
                vars = %config.api_key_env.join(", "),
                "no API key found; explanations will fall back"
            );
        }
        Self::new(config, api_key)
    }

    /// Whether a credential is available.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt and return the response text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::MissingCredential {
                vars: self.config.api_key_env.join(", "),
            })?;

        tracing::debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.text().ok_or(Error::EmptyResponse)
    }

    /// Ask for the most likely next word of `context`, as `"word (NN%)"`.
    pub async fn predict_next_word(&self, context: &str) -> Result<String> {
        self.generate(&prediction_prompt(context)).await
    }
}

impl ExplanationService for GeminiClient {
    async fn explain(&self, concept: &str) -> Result<String> {
        let prompt = explanation_prompt(
            concept,
            &self.config.language,
            self.config.max_sentences,
        );
        self.generate(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explanation_prompt_mentions_concept_and_language() {
        let prompt = explanation_prompt("Transformer 模块", "Chinese", 2);
        assert!(prompt.contains("\"Transformer 模块\""));
        assert!(prompt.contains("in Chinese"));
        assert!(prompt.contains("Limit to 2 sentences"));
        assert!(prompt.contains("no markdown"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hi")).unwrap();
        assert_eq!(body, serde_json::json!({"contents": [{"parts": [{"text": "hi"}]}]}));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": " Attention "}, {"text": "is all. "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("Attention is all."));
    }

    #[test]
    fn test_response_without_text() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);

        let blank: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(blank.text(), None);

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = ServiceConfig {
            base_url: "http://localhost:8080/v1beta/".to_string(),
            model: "m".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(config, None).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:8080/v1beta/models/m:generateContent"
        );
    }
}
