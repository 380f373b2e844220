//! Base tool definitions.
//!
//! Provides the core abstractions: the [`ToolError`] signaled by a failing
//! invocation, the [`Tool`] trait every capability implements, and the
//! concrete [`FnTool`] that wraps a plain function.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Payload;

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// Error signaled by a tool invocation.
///
/// Carries a machine-readable kind plus a human-readable message; the
/// pipeline records both in the execution history instead of letting the
/// error unwind past the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error classification, e.g. `"MissingInput"` or `"StorageError"`.
    pub kind: String,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl ToolError {
    /// Create a new tool error.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

// ---------------------------------------------------------------------------
// Tool trait
// ---------------------------------------------------------------------------

/// The contract every agent tool implements.
///
/// One entry point taking a single payload mapping and returning a single
/// payload mapping, or signaling a [`ToolError`]. No other lifecycle hooks
/// exist; anything a tool needs beyond its input it must own itself.
#[async_trait]
pub trait Tool: Send + Sync + fmt::Debug {
    /// Unique name of the tool.
    fn name(&self) -> &str;

    /// Execute the tool against the merged step input.
    async fn run(&self, input: Payload) -> Result<Payload, ToolError>;
}

/// Shared handle to a tool implementation.
///
/// Step configurations reference the same underlying tool the registry owns;
/// nothing is copied per step.
pub type ToolHandle = Arc<dyn Tool>;

// ---------------------------------------------------------------------------
// FnTool
// ---------------------------------------------------------------------------

type ToolFn = dyn Fn(Payload) -> Result<Payload, ToolError> + Send + Sync;

/// Tool backed by a plain function or closure.
///
/// Useful for tests and for embedding callers that want to register ad-hoc
/// capabilities without a struct per tool.
pub struct FnTool {
    name: String,
    func: Arc<ToolFn>,
}

impl FnTool {
    /// Wrap a function as a tool.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Payload) -> Result<Payload, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Wrap a function and return it as a shared [`ToolHandle`].
    pub fn handle<F>(name: impl Into<String>, func: F) -> ToolHandle
    where
        F: Fn(Payload) -> Result<Payload, ToolError> + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, func))
    }
}

impl fmt::Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool").field("name", &self.name).finish()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: Payload) -> Result<Payload, ToolError> {
        (self.func)(input)
    }
}
