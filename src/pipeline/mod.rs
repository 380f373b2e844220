//! Execution pipeline — ordered tool invocation with fallback recovery.
//!
//! A pipeline run takes an ordered list of [`StepConfig`]s and an initial
//! payload, executes each step in order, threads every successful output
//! into the next step's input, attempts a single configured fallback when a
//! primary step fails, and records each attempt in an append-only history.
//!
//! The executor never raises: tool errors become history data and the run
//! terminates cleanly at the first unrecovered failure, so a later step can
//! always assume its input came from a real prior success.

pub mod executor;
pub mod types;

// Re-exports
pub use executor::Pipeline;
pub use types::{
    ErrorRecord, FallbackStatus, PipelineResult, StepConfig, StepOutcome, StepRecord, StepStatus,
};
