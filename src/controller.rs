//! Agent controller — the orchestration facade.
//!
//! Composes the module registry, the intent resolver, and the execution
//! pipeline into the end-to-end "handle one request" operation:
//! 1. Short-circuit when no capabilities were discovered
//! 2. Ask the chat model which tools to run, in what order
//! 3. Apply the automatic fallback rules to the resolved sequence
//! 4. Answer directly when no tools apply
//! 5. Otherwise execute the sequence and map the pipeline result through
//!
//! The controller holds the registry by value and never mutates it; each
//! request gets its own [`Pipeline`] instance, so one controller can serve
//! concurrent requests behind an `Arc`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::llms::{ChatMessage, ChatModel};
use crate::modules::ModuleRegistry;
use crate::pipeline::{Pipeline, StepConfig, StepRecord};
use crate::types::Payload;

// ---------------------------------------------------------------------------
// Fallback rules
// ---------------------------------------------------------------------------

/// Automatic fallback policy applied to a resolved tool sequence.
///
/// When the sequence's last step is `trigger` and `fallback` is registered,
/// `fallback` is attached as that step's fallback. Rules are data so new
/// pairings don't require code changes.
#[derive(Debug, Clone)]
pub struct FallbackRule {
    /// Capability name that triggers the rule when it ends the sequence.
    pub trigger: String,
    /// Capability attached as the fallback.
    pub fallback: String,
}

impl FallbackRule {
    /// Create a rule.
    pub fn new(trigger: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            fallback: fallback.into(),
        }
    }
}

/// The default rule set: a trailing broad web search falls back to the
/// local file search.
pub fn default_fallback_rules() -> Vec<FallbackRule> {
    vec![FallbackRule::new("websearch", "file_search")]
}

// ---------------------------------------------------------------------------
// AgentResponse
// ---------------------------------------------------------------------------

/// Structured result returned for every request.
///
/// This is the contract a presentation layer consumes; the controller never
/// raises past it.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    /// Final payload of a pipeline run, or plain text for direct answers.
    pub response: Value,
    /// Free-text status summary.
    pub status: String,
    /// One entry per pipeline step attempted (empty for direct answers).
    pub execution_history: Vec<StepRecord>,
}

impl AgentResponse {
    fn text(response: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            response: Value::String(response.into()),
            status: status.into(),
            execution_history: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// AgentController
// ---------------------------------------------------------------------------

/// Orchestrates a request from intake to response.
#[derive(Debug)]
pub struct AgentController {
    registry: ModuleRegistry,
    resolver: Arc<dyn ChatModel>,
    fallback_rules: Vec<FallbackRule>,
}

impl AgentController {
    /// Create a controller with the default fallback rules.
    pub fn new(registry: ModuleRegistry, resolver: Arc<dyn ChatModel>) -> Self {
        Self {
            registry,
            resolver,
            fallback_rules: default_fallback_rules(),
        }
    }

    /// Replace the fallback rule table.
    pub fn with_fallback_rules(mut self, rules: Vec<FallbackRule>) -> Self {
        self.fallback_rules = rules;
        self
    }

    /// The capability registry this controller serves from.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Handle one request end to end.
    pub async fn handle_query(&self, user_prompt: &str, image_path: Option<&str>) -> AgentResponse {
        if self.registry.is_empty() {
            log::warn!("no tools available to handle the query");
            return AgentResponse::text(
                "I have no tools loaded and cannot process your request.",
                "Error - No tools loaded",
            );
        }

        let steps = self.select_tools(user_prompt, image_path).await;
        if steps.is_empty() {
            return self.direct_answer(user_prompt).await;
        }

        let mut initial = Payload::new();
        initial.insert("user_prompt".into(), json!(user_prompt));
        initial.insert("query".into(), json!(user_prompt));
        if let Some(path) = image_path {
            initial.insert("image_path".into(), json!(path));
        }

        let mut pipeline = Pipeline::new();
        let result = pipeline.execute(&steps, initial).await;
        AgentResponse {
            response: Value::Object(result.final_output.into_iter().collect()),
            status: result.status,
            execution_history: result.history,
        }
    }

    // -----------------------------------------------------------------------
    // Tool selection
    // -----------------------------------------------------------------------

    /// Ask the resolver for an ordered tool list; resolver failure degrades
    /// to no tools selected.
    async fn select_tools(&self, user_prompt: &str, image_path: Option<&str>) -> Vec<StepConfig> {
        let prompt = self.selection_prompt(user_prompt, image_path);
        let reply = match self.resolver.chat(&[ChatMessage::user(prompt)]).await {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("intent resolver failed, selecting no tools: {}", e);
                return Vec::new();
            }
        };
        let mut steps = self.parse_selection(&reply);
        self.apply_fallback_rules(&mut steps);
        steps
    }

    /// Build the tool-selection prompt from the request and the capability
    /// table.
    fn selection_prompt(&self, user_prompt: &str, image_path: Option<&str>) -> String {
        let attachment_note = image_path
            .map(|p| format!("(Image provided: {})\n", p))
            .unwrap_or_default();
        format!(
            "User query: '{}'\n{}\n{}\n\
             Based on the user query and available tools, what tool(s) should be used, in what order? \
             Respond with a comma-separated list of tool names (e.g., 'tool1, tool2'). \
             Focus on selecting the correct sequence of tool names. Example: file_search, websearch\n\
             If no tools seem appropriate for the query, respond with the word 'None'.",
            user_prompt,
            attachment_note,
            self.registry.description_table()
        )
    }

    /// Parse the resolver's comma-separated reply into step configs.
    ///
    /// Names are matched case-sensitively against the registry; unknown
    /// names are dropped with a warning and `none`/empty replies map to an
    /// empty sequence.
    fn parse_selection(&self, reply: &str) -> Vec<StepConfig> {
        let trimmed = reply.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Vec::new();
        }

        let mut steps = Vec::new();
        for raw in trimmed.split(',') {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            match self.registry.get(name) {
                Some(descriptor) => {
                    steps.push(StepConfig::new(name, descriptor.handle.clone()));
                }
                None => {
                    log::warn!("resolver selected unknown tool '{}', dropping it", name);
                }
            }
        }
        steps
    }

    /// Attach automatic fallbacks per the rule table. Only the sequence's
    /// last step is considered, and the first matching rule wins.
    fn apply_fallback_rules(&self, steps: &mut [StepConfig]) {
        let Some(last) = steps.last_mut() else {
            return;
        };
        if last.fallback.is_some() {
            return;
        }
        for rule in &self.fallback_rules {
            if last.name != rule.trigger {
                continue;
            }
            if let Some(descriptor) = self.registry.get(&rule.fallback) {
                log::debug!(
                    "attaching '{}' as fallback for trailing '{}'",
                    rule.fallback,
                    rule.trigger
                );
                last.fallback = Some(Box::new(StepConfig::new(
                    format!("{}_as_fallback", rule.fallback),
                    descriptor.handle.clone(),
                )));
                return;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Direct answers
    // -----------------------------------------------------------------------

    /// Answer the request without tools.
    async fn direct_answer(&self, user_prompt: &str) -> AgentResponse {
        let messages = [
            ChatMessage::system(
                "You are a helpful assistant. Answer the user's query directly and concisely.",
            ),
            ChatMessage::user(user_prompt),
        ];
        match self.resolver.chat(&messages).await {
            Ok(text) => AgentResponse::text(
                text,
                "Completed - Direct LLM response (no tools used)",
            ),
            Err(e) => {
                log::error!("direct answer failed: {}", e);
                AgentResponse::text(
                    format!("I could not reach the language model: {}", e),
                    "Error - Direct LLM response failed",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::LlmError;
    use crate::modules::ToolDescriptor;
    use crate::tools::{FnTool, ToolError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Chat model returning a canned reply and recording the prompts it saw.
    #[derive(Debug)]
    struct ScriptedResolver {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedResolver {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn seen_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedResolver {
        fn model(&self) -> &str {
            "scripted"
        }

        async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
            let prompt = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            self.prompts.lock().unwrap().push(prompt);
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(LlmError::MalformedResponse("scripted failure".into())),
            }
        }
    }

    fn descriptor(name: &str, description: &str) -> ToolDescriptor {
        let tool_name = name.to_string();
        ToolDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            handle: FnTool::handle(name, move |mut input: crate::types::Payload| {
                input.insert("ran".into(), json!(tool_name.clone()));
                Ok(input)
            }),
        }
    }

    fn registry_with(names: &[&str]) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for name in names {
            registry.register(descriptor(name, &format!("The {} tool.", name)));
        }
        registry
    }

    #[tokio::test]
    async fn test_empty_registry_short_circuits_without_resolver_call() {
        let resolver = ScriptedResolver::replying("websearch");
        let controller = AgentController::new(ModuleRegistry::new(), resolver.clone());

        let response = controller.handle_query("anything", None).await;
        assert_eq!(response.status, "Error - No tools loaded");
        assert!(response.execution_history.is_empty());
        assert!(resolver.seen_prompts().is_empty());
    }

    #[tokio::test]
    async fn test_none_reply_takes_direct_answer_path() {
        let resolver = ScriptedResolver::replying("None");
        let controller =
            AgentController::new(registry_with(&["websearch"]), resolver.clone());

        let response = controller.handle_query("What is water?", None).await;
        assert_eq!(
            response.status,
            "Completed - Direct LLM response (no tools used)"
        );
        assert_eq!(response.response, json!("None"));
        assert!(response.execution_history.is_empty());
        // Selection prompt plus direct-answer prompt.
        assert_eq!(resolver.seen_prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_selection_runs_pipeline_and_maps_result() {
        let resolver = ScriptedResolver::replying("file_search");
        let controller = AgentController::new(registry_with(&["file_search"]), resolver);

        let response = controller.handle_query("find my report", None).await;
        assert_eq!(response.execution_history.len(), 1);
        assert_eq!(response.execution_history[0].tool_name, "file_search");
        assert_eq!(response.response["ran"], json!("file_search"));
        assert_eq!(response.response["user_prompt"], json!("find my report"));
        assert_eq!(response.response["query"], json!("find my report"));
    }

    #[tokio::test]
    async fn test_attachment_reaches_initial_payload() {
        let resolver = ScriptedResolver::replying("file_search");
        let controller = AgentController::new(registry_with(&["file_search"]), resolver);

        let response = controller
            .handle_query("describe this", Some("/tmp/shot.png"))
            .await;
        assert_eq!(response.response["image_path"], json!("/tmp/shot.png"));
    }

    #[tokio::test]
    async fn test_unknown_names_are_dropped() {
        let resolver = ScriptedResolver::replying("made_up, file_search, also_fake");
        let controller = AgentController::new(registry_with(&["file_search"]), resolver);

        let response = controller.handle_query("find things", None).await;
        assert_eq!(response.execution_history.len(), 1);
        assert_eq!(response.execution_history[0].tool_name, "file_search");
    }

    #[tokio::test]
    async fn test_selection_is_case_sensitive() {
        let resolver = ScriptedResolver::replying("File_Search");
        let controller =
            AgentController::new(registry_with(&["file_search"]), resolver.clone());

        // Wrong casing drops the name, leaving no tools → direct answer.
        let response = controller.handle_query("find things", None).await;
        assert_eq!(
            response.status,
            "Completed - Direct LLM response (no tools used)"
        );
    }

    #[tokio::test]
    async fn test_trailing_websearch_gains_file_search_fallback() {
        let resolver = ScriptedResolver::replying("websearch");
        let registry = registry_with(&["websearch", "file_search"]);
        let controller = AgentController::new(registry, resolver);

        let mut steps = controller.parse_selection("websearch");
        controller.apply_fallback_rules(&mut steps);
        let fallback = steps[0].fallback.as_ref().unwrap();
        assert_eq!(fallback.name, "file_search_as_fallback");
    }

    #[tokio::test]
    async fn test_no_fallback_rule_without_registered_target() {
        let resolver = ScriptedResolver::replying("websearch");
        let controller = AgentController::new(registry_with(&["websearch"]), resolver);

        let mut steps = controller.parse_selection("websearch");
        controller.apply_fallback_rules(&mut steps);
        assert!(steps[0].fallback.is_none());
    }

    #[tokio::test]
    async fn test_rule_only_applies_to_last_step() {
        let resolver = ScriptedResolver::replying("websearch, file_search");
        let registry = registry_with(&["websearch", "file_search"]);
        let controller = AgentController::new(registry, resolver);

        let mut steps = controller.parse_selection("websearch, file_search");
        controller.apply_fallback_rules(&mut steps);
        assert!(steps[0].fallback.is_none());
        assert!(steps[1].fallback.is_none());
    }

    #[tokio::test]
    async fn test_custom_rule_table() {
        let resolver = ScriptedResolver::replying("alpha");
        let registry = registry_with(&["alpha", "beta"]);
        let controller = AgentController::new(registry, resolver)
            .with_fallback_rules(vec![FallbackRule::new("alpha", "beta")]);

        let mut steps = controller.parse_selection("alpha");
        controller.apply_fallback_rules(&mut steps);
        assert_eq!(
            steps[0].fallback.as_ref().unwrap().name,
            "beta_as_fallback"
        );
    }

    #[tokio::test]
    async fn test_resolver_failure_degrades_to_direct_answer_error() {
        let resolver = ScriptedResolver::failing();
        let controller = AgentController::new(registry_with(&["websearch"]), resolver);

        let response = controller.handle_query("anything", None).await;
        // Selection failed → no tools → direct answer also fails, but the
        // facade still returns a structured result.
        assert_eq!(response.status, "Error - Direct LLM response failed");
        assert!(response.execution_history.is_empty());
    }

    #[tokio::test]
    async fn test_selection_prompt_includes_capability_table() {
        let resolver = ScriptedResolver::replying("None");
        let controller =
            AgentController::new(registry_with(&["websearch"]), resolver.clone());

        let _ = controller.handle_query("hello", Some("/a.png")).await;
        let prompts = resolver.seen_prompts();
        assert!(prompts[0].contains("Available Tools:"));
        assert!(prompts[0].contains("- Tool Name: websearch"));
        assert!(prompts[0].contains("(Image provided: /a.png)"));
    }

    #[tokio::test]
    async fn test_pipeline_failure_status_propagates() {
        let mut registry = ModuleRegistry::new();
        registry.register(ToolDescriptor {
            name: "broken".into(),
            description: "Always fails.".into(),
            handle: FnTool::handle("broken", |_| {
                Err(ToolError::new("RuntimeError", "nope"))
            }),
        });
        let resolver = ScriptedResolver::replying("broken");
        let controller = AgentController::new(registry, resolver);

        let response = controller.handle_query("do it", None).await;
        assert!(response.status.starts_with("Error: Error executing tool 'broken'"));
        assert_eq!(response.execution_history.len(), 1);
        // final_output pinned to the initial payload.
        assert_eq!(response.response["user_prompt"], json!("do it"));
    }
}
