//! Base chat model abstraction.
//!
//! Defines the interface every language model client must follow. The
//! controller only ever sees this trait; tool selection and direct answers
//! go through the same `chat` call.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role: `"system"`, `"user"`, or `"assistant"`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors from a chat model backend.
///
/// Timeouts are deliberately not a distinct variant; they surface through
/// [`LlmError::Transport`] and are handled like any other backend failure.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The HTTP request failed (connection refused, timeout, bad status).
    #[error("request to model backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered but the body was not in the expected shape.
    #[error("malformed response from model backend: {0}")]
    MalformedResponse(String),

    /// No user-role message was available to use as the prompt.
    #[error("no user message found to use as a prompt")]
    EmptyPrompt,
}

// ---------------------------------------------------------------------------
// ChatModel trait
// ---------------------------------------------------------------------------

/// Abstract chat model interface.
///
/// Implementations should handle backend error cases gracefully, including
/// timeouts, connection failures, and malformed responses, and report them
/// all through [`LlmError`].
#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    /// The model identifier this client speaks to.
    fn model(&self) -> &str;

    /// Send a conversation and return the model's text reply.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
