//! Agent tools.
//!
//! Every tool implements the single payload-in/payload-out contract defined
//! by [`Tool`]. The built-in tools are compiled into the binary and looked
//! up by name through a [`ToolSet`]; module manifests on disk decide which
//! of them become discoverable capabilities.

pub mod base_tool;
pub mod energy_kb;
pub mod file_search;
pub mod rag;
pub mod toolset;
pub mod websearch;

// Re-exports
pub use base_tool::{FnTool, Tool, ToolError, ToolHandle};
pub use energy_kb::EnergyKbTool;
pub use file_search::FileSearchTool;
pub use rag::{KnowledgeStore, RagQueryTool};
pub use toolset::ToolSet;
pub use websearch::WebSearchTool;
