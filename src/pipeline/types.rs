//! Pipeline data model: step configuration, history records, results.

use std::fmt;

use serde::Serialize;

use crate::tools::{ToolError, ToolHandle};
use crate::types::Payload;

// ---------------------------------------------------------------------------
// StepConfig
// ---------------------------------------------------------------------------

/// Configuration for one pipeline step.
///
/// References a tool handle from the registry (never a copy), carries
/// optional static parameters merged over the threaded payload, and an
/// optional fallback attempted once if the primary invocation fails. A
/// fallback may itself carry a fallback field, but the executor only ever
/// attempts one fallback per failed primary step.
#[derive(Debug, Clone)]
pub struct StepConfig {
    /// Display label for this step (usually the capability name).
    pub name: String,
    /// Handle to the tool to invoke; `None` marks a structurally invalid
    /// configuration the executor will refuse to run.
    pub tool: Option<ToolHandle>,
    /// Static parameters merged over the threaded payload (params win).
    pub params: Payload,
    /// Alternate configuration attempted once after a primary failure.
    pub fallback: Option<Box<StepConfig>>,
}

impl StepConfig {
    /// Create a step bound to a tool handle.
    pub fn new(name: impl Into<String>, tool: ToolHandle) -> Self {
        Self {
            name: name.into(),
            tool: Some(tool),
            params: Payload::new(),
            fallback: None,
        }
    }

    /// Create a step with no usable invocation handle.
    pub fn without_tool(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool: None,
            params: Payload::new(),
            fallback: None,
        }
    }

    /// Attach static parameters.
    pub fn with_params(mut self, params: Payload) -> Self {
        self.params = params;
        self
    }

    /// Attach a fallback configuration.
    pub fn with_fallback(mut self, fallback: StepConfig) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }
}

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Outcome classification of a primary step invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepStatus {
    /// The tool ran and produced a payload.
    #[serde(rename = "Success")]
    Success,
    /// The tool ran and signaled an error.
    #[serde(rename = "Failed - Primary")]
    FailedPrimary,
    /// The step had no usable invocation handle; nothing ran.
    #[serde(rename = "Skipped - Invalid Tool")]
    SkippedInvalidTool,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::FailedPrimary => write!(f, "Failed - Primary"),
            Self::SkippedInvalidTool => write!(f, "Skipped - Invalid Tool"),
        }
    }
}

/// Outcome classification of a fallback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FallbackStatus {
    /// The fallback ran and produced a payload.
    #[serde(rename = "Success")]
    Success,
    /// The fallback ran and signaled an error.
    #[serde(rename = "Failed")]
    Failed,
    /// The fallback had no usable invocation handle; nothing ran.
    #[serde(rename = "Skipped - Invalid Fallback Tool")]
    SkippedInvalidFallback,
}

impl fmt::Display for FallbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
            Self::SkippedInvalidFallback => write!(f, "Skipped - Invalid Fallback Tool"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Error record captured in history when an invocation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Human-readable error message.
    pub error: String,
    /// Error classification.
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&ToolError> for ErrorRecord {
    fn from(err: &ToolError) -> Self {
        Self {
            error: err.message.clone(),
            kind: err.kind.clone(),
        }
    }
}

/// What an invocation produced: a payload or an error record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepOutcome {
    /// The produced payload.
    Output(Payload),
    /// The captured error.
    Error(ErrorRecord),
}

impl StepOutcome {
    /// The payload, if this outcome is a success.
    pub fn output(&self) -> Option<&Payload> {
        match self {
            Self::Output(payload) => Some(payload),
            Self::Error(_) => None,
        }
    }

    /// The error record, if this outcome is a failure.
    pub fn error(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Output(_) => None,
            Self::Error(record) => Some(record),
        }
    }
}

// ---------------------------------------------------------------------------
// StepRecord
// ---------------------------------------------------------------------------

/// One history entry per primary step.
///
/// Fallback activity nests into the same entry rather than appending a
/// second one, so `history.len()` always equals the number of primary steps
/// attempted.
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    /// 1-based step ordinal.
    pub step: usize,
    /// Display label of the step.
    pub tool_name: String,
    /// The merged input the primary invocation received (or would have).
    pub input_provided: Payload,
    /// What the primary invocation produced.
    pub output: StepOutcome,
    /// Primary outcome classification.
    pub status: StepStatus,
    /// Whether a fallback invocation was attempted.
    pub fallback_attempted: bool,
    /// Display label of the fallback, when one was configured and reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_tool_name: Option<String>,
    /// The merged input the fallback invocation received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_input_provided: Option<Payload>,
    /// What the fallback invocation produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_output: Option<StepOutcome>,
    /// Fallback outcome classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_status: Option<FallbackStatus>,
}

impl StepRecord {
    /// Create a record with no fallback fields set.
    pub(crate) fn new(
        step: usize,
        tool_name: impl Into<String>,
        input_provided: Payload,
        output: StepOutcome,
        status: StepStatus,
    ) -> Self {
        Self {
            step,
            tool_name: tool_name.into(),
            input_provided,
            output,
            status,
            fallback_attempted: false,
            fallback_tool_name: None,
            fallback_input_provided: None,
            fallback_output: None,
            fallback_status: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineResult
// ---------------------------------------------------------------------------

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// The last successfully produced payload (the initial payload if no
    /// step succeeded). Never an error record.
    pub final_output: Payload,
    /// Free-text summary of how the run ended.
    pub status: String,
    /// One entry per primary step attempted.
    pub history: Vec<StepRecord>,
}
