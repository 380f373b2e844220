//! File search tool (simulated).
//!
//! Answers queries that suggest a need to find local documents. The current
//! implementation returns mock file paths matched by keyword instead of
//! walking a real filesystem; the contract and output shape are what a real
//! implementation would keep.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::Payload;

use super::base_tool::{Tool, ToolError};

/// Directory reported when the caller does not provide one.
const DEFAULT_DIRECTORY: &str = "./documents_test";

/// Simulated local file search.
#[derive(Debug, Clone, Default)]
pub struct FileSearchTool;

impl FileSearchTool {
    /// Create the tool.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for FileSearchTool {
    fn name(&self) -> &str {
        "file_search"
    }

    async fn run(&self, input: Payload) -> Result<Payload, ToolError> {
        let query = match input.get("query").and_then(Value::as_str) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => {
                let mut output = Payload::new();
                output.insert("error".into(), json!("No query provided for file search."));
                output.insert("files_found".into(), json!([]));
                output.insert("status".into(), json!("Error - No query"));
                return Ok(output);
            }
        };

        let directory = input
            .get("directory")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_DIRECTORY)
            .to_string();

        let query_lower = query.to_lowercase();
        let mut files_found: Vec<String> = Vec::new();
        if query_lower.contains("report") {
            files_found.push(format!("{}/annual_report_2023.pdf", directory));
        }
        if query_lower.contains("data") {
            files_found.push(format!("{}/project_data.xlsx", directory));
        }
        if query_lower.contains("presentation") {
            files_found.push(format!("{}/q4_strategy_presentation.pptx", directory));
        }

        let summary = if files_found.is_empty() {
            format!(
                "No files found matching '{}' in simulated search of '{}'.",
                query, directory
            )
        } else {
            format!(
                "Simulated search found {} files matching '{}' in '{}'.",
                files_found.len(),
                query,
                directory
            )
        };

        let mut output = Payload::new();
        output.insert("status".into(), json!("File search complete (simulated)."));
        output.insert("query_received".into(), json!(query));
        output.insert("directory_searched".into(), json!(directory));
        output.insert("files_found".into(), json!(files_found));
        output.insert("summary".into(), json!(summary));
        Ok(output)
    }
}
