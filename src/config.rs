//! Configuration constants for the agent.
//!
//! Centralizes model names, service endpoints, and default paths. All values
//! can be overridden through environment variables so deployments don't need
//! code changes.

use std::env;

/// Default Ollama model used for tool selection and direct answers.
pub const DEFAULT_TEXT_MODEL: &str = "deepseek-coder:6.7b";

/// Base URL of the Ollama HTTP API.
pub const DEFAULT_OLLAMA_API_BASE_URL: &str = "http://localhost:11434/api";

/// Default directory scanned for tool modules, relative to the working
/// directory.
pub const DEFAULT_MODULES_DIR: &str = "modules";

/// Default path of the SQLite store backing the RAG query tool.
pub const DEFAULT_RAG_DB: &str = "data/knowledge.db";

/// Model used for text reasoning (`AGENT_TEXT_MODEL` override).
pub fn text_model() -> String {
    env::var("AGENT_TEXT_MODEL").unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string())
}

/// Ollama API base URL (`OLLAMA_API_BASE_URL` override).
pub fn ollama_base_url() -> String {
    env::var("OLLAMA_API_BASE_URL").unwrap_or_else(|_| DEFAULT_OLLAMA_API_BASE_URL.to_string())
}

/// Modules directory (`AGENT_MODULES_DIR` override).
pub fn modules_dir() -> String {
    env::var("AGENT_MODULES_DIR").unwrap_or_else(|_| DEFAULT_MODULES_DIR.to_string())
}

/// RAG SQLite path (`AGENT_RAG_DB` override).
pub fn rag_db_path() -> String {
    env::var("AGENT_RAG_DB").unwrap_or_else(|_| DEFAULT_RAG_DB.to_string())
}
