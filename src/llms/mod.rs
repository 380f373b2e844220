//! Language model clients.
//!
//! The agent consumes a language model through the narrow [`ChatModel`]
//! trait: an ordered list of role/content messages in, plain text out. The
//! shipped implementation talks to a local Ollama server; anything else that
//! can answer a chat request can be plugged in behind the same trait.

pub mod base_llm;
pub mod ollama;

// Re-exports
pub use base_llm::{ChatMessage, ChatModel, LlmError};
pub use ollama::OllamaClient;
