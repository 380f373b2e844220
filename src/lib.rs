//! # localagent
//!
//! A local LLM agent that discovers pluggable tool modules at startup, uses
//! a language model to select an ordered tool sequence per request, and runs
//! that sequence through a fallback-aware execution pipeline.
//!
//! # Architecture
//!
//! ```text
//! modules/ directory (AGENT.md + module.yaml per tool)
//!   ↓  ModuleLoader::load_modules()
//! ModuleRegistry (name → ToolDescriptor, immutable after discovery)
//!   ↓  AgentController::handle_query()
//! ChatModel (tool selection)  →  Pipeline::execute()  →  AgentResponse
//! ```

pub mod config;
pub mod controller;
pub mod llms;
pub mod modules;
pub mod pipeline;
pub mod tools;
pub mod types;

// Re-exports
pub use controller::{AgentController, AgentResponse, FallbackRule};
pub use llms::{ChatMessage, ChatModel, OllamaClient};
pub use modules::{ModuleLoader, ModuleRegistry, ToolDescriptor};
pub use pipeline::{Pipeline, PipelineResult, StepConfig, StepRecord};
pub use tools::{Tool, ToolError, ToolHandle, ToolSet};
pub use types::Payload;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
