//! Web search tool (simulated).
//!
//! Covers queries about current events or anything unlikely to live in
//! local files. Returns mock result records (title, link, snippet) keyed to
//! a few known query patterns; no real HTTP requests are made.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::types::Payload;

use super::base_tool::{Tool, ToolError};

/// Simulated public web search.
#[derive(Debug, Clone, Default)]
pub struct WebSearchTool;

impl WebSearchTool {
    /// Create the tool.
    pub fn new() -> Self {
        Self
    }
}

fn mock_result(title: String, link: String, snippet: String) -> Value {
    json!({ "title": title, "link": link, "snippet": snippet })
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "websearch"
    }

    async fn run(&self, input: Payload) -> Result<Payload, ToolError> {
        let query = match input.get("query").and_then(Value::as_str) {
            Some(q) if !q.is_empty() => q.to_string(),
            _ => {
                let mut output = Payload::new();
                output.insert("error".into(), json!("No query provided for web search."));
                output.insert("search_results".into(), json!([]));
                output.insert("status".into(), json!("Error - No query"));
                return Ok(output);
            }
        };

        let query_lower = query.to_lowercase();
        let mut search_results: Vec<Value> = Vec::new();

        if query_lower.contains("local llm agent") {
            search_results.push(mock_result(
                "Building a Local LLM Agent with Ollama - Example Guide".into(),
                "https://example.com/local-llm-agent-guide".into(),
                "Step-by-step guide to create a local agent using Ollama models...".into(),
            ));
            search_results.push(mock_result(
                "GitHub - ollama-agent-toolkit".into(),
                "https://github.com/example/ollama-agent-toolkit".into(),
                "A toolkit for interacting with Ollama models, including agent examples...".into(),
            ));
        } else if query_lower.contains("weather") {
            let location = query_lower
                .split_once("in ")
                .map(|(_, rest)| rest.trim().to_string())
                .unwrap_or_else(|| "your current area".to_string());
            search_results.push(mock_result(
                format!("Weather forecast for {}", location),
                format!("https://example.com/weather/{}", location.replace(' ', "_")),
                format!(
                    "The weather in {} is expected to be sunny with a high of 25°C. (Simulated)",
                    location
                ),
            ));
        } else if query_lower.contains("ai safety") {
            search_results.push(mock_result(
                "Recent Developments in AI Safety Research".into(),
                "https://example.com/ai-safety-news".into(),
                "A summary of key advancements and discussions in AI safety... (Simulated)".into(),
            ));
        }

        let summary = if search_results.is_empty() {
            format!("No relevant web results found for '{}' in simulated search.", query)
        } else {
            format!(
                "Simulated web search found {} results for '{}'.",
                search_results.len(),
                query
            )
        };

        let mut output = Payload::new();
        output.insert("status".into(), json!("Web search complete (simulated)."));
        output.insert("query_received".into(), json!(query));
        output.insert("search_results".into(), json!(search_results));
        output.insert("summary".into(), json!(summary));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_input(query: &str) -> Payload {
        let mut input = Payload::new();
        input.insert("query".into(), json!(query));
        input
    }

    #[tokio::test]
    async fn test_known_topic_returns_results() {
        let output = WebSearchTool::new()
            .run(query_input("local llm agent examples"))
            .await
            .unwrap();
        let results = output["search_results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0]["link"].as_str().unwrap().starts_with("https://"));
    }

    #[tokio::test]
    async fn test_weather_query_extracts_location() {
        let output = WebSearchTool::new()
            .run(query_input("weather in berlin"))
            .await
            .unwrap();
        let results = output["search_results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0]["title"].as_str().unwrap().contains("berlin"));
    }

    #[tokio::test]
    async fn test_unknown_topic_returns_no_results() {
        let output = WebSearchTool::new()
            .run(query_input("stock price of ExampleCorp"))
            .await
            .unwrap();
        assert!(output["search_results"].as_array().unwrap().is_empty());
        assert!(output["summary"]
            .as_str()
            .unwrap()
            .starts_with("No relevant web results"));
    }

    #[tokio::test]
    async fn test_missing_query_reports_error_payload() {
        let output = WebSearchTool::new().run(Payload::new()).await.unwrap();
        assert_eq!(output["status"], json!("Error - No query"));
    }
}
