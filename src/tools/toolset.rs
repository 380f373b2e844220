//! Compiled-in tool set.
//!
//! The lookup target for module manifests: discovery reads an `entry` name
//! from each manifest and resolves it here, so no code is ever loaded from
//! the modules directory itself.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config;

use super::base_tool::ToolHandle;
use super::energy_kb::EnergyKbTool;
use super::file_search::FileSearchTool;
use super::rag::RagQueryTool;
use super::websearch::WebSearchTool;

/// Explicit name → implementation table for all linkable tools.
#[derive(Debug, Default)]
pub struct ToolSet {
    tools: HashMap<String, ToolHandle>,
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool set containing all built-in tools.
    pub fn with_builtins() -> Self {
        let mut set = Self::new();
        set.register(Arc::new(FileSearchTool::new()));
        set.register(Arc::new(WebSearchTool::new()));
        set.register(Arc::new(EnergyKbTool::new()));
        set.register(Arc::new(RagQueryTool::new(config::rag_db_path())));
        set
    }

    /// Register a tool under its own name. Last write wins.
    pub fn register(&mut self, tool: ToolHandle) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by entry-point name.
    pub fn get(&self, name: &str) -> Option<ToolHandle> {
        self.tools.get(name).cloned()
    }

    /// Names of all registered tools, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
