//! Ollama chat client.
//!
//! Talks to the Ollama `/generate` endpoint via `reqwest`. The endpoint
//! expects a single prompt string, so the client uses the content of the
//! last user-role message in the conversation; system messages are carried
//! by the caller's prompt construction instead.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config;

use super::base_llm::{ChatMessage, ChatModel, LlmError};

/// Per-request timeout. A slow model counts as a failed call, not a
/// separate error class.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

// ---------------------------------------------------------------------------
// OllamaClient
// ---------------------------------------------------------------------------

/// Client for a text model served by a local Ollama instance.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    model: String,
    generate_url: String,
    /// Optional generation parameters (temperature, top_p, ...), passed
    /// through as the Ollama `options` field.
    options: Option<Value>,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a client for `model` against the given API base URL.
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            model: model.into(),
            generate_url: format!("{}/generate", base_url.trim_end_matches('/')),
            options: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from the crate configuration (env overrides apply).
    pub fn from_config() -> Self {
        Self::new(config::text_model(), config::ollama_base_url())
    }

    /// Set generation options (e.g. `{"temperature": 0.7}`).
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// The URL chat requests are sent to.
    pub fn generate_url(&self) -> &str {
        &self.generate_url
    }
}

/// Content of the last user-role message, used as the generate prompt.
fn last_user_prompt(messages: &[ChatMessage]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let prompt = last_user_prompt(messages).ok_or(LlmError::EmptyPrompt)?;
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.options.as_ref(),
        };

        let response = self
            .client
            .post(&self.generate_url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_user_prompt_picks_last_user_message() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("first"),
            ChatMessage::user("second"),
        ];
        assert_eq!(last_user_prompt(&messages), Some("second"));
    }

    #[test]
    fn test_last_user_prompt_ignores_non_user_roles() {
        let messages = vec![ChatMessage::system("only system")];
        assert_eq!(last_user_prompt(&messages), None);
        assert_eq!(last_user_prompt(&[]), None);
    }

    #[test]
    fn test_generate_url_normalization() {
        let client = OllamaClient::new("m", "http://localhost:11434/api/");
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
    }

    #[test]
    fn test_request_serialization_shape() {
        let options = json!({"temperature": 0.2});
        let body = GenerateRequest {
            model: "deepseek-coder:6.7b",
            prompt: "hello",
            stream: false,
            options: Some(&options),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "deepseek-coder:6.7b");
        assert_eq!(value["prompt"], "hello");
        assert_eq!(value["stream"], false);
        assert_eq!(value["options"]["temperature"], 0.2);
    }

    #[test]
    fn test_request_omits_absent_options() {
        let body = GenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
            options: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("options").is_none());
    }
}
