//! The pipeline executor.

use crate::types::{merge_payloads, Payload};

use super::types::{
    ErrorRecord, FallbackStatus, PipelineResult, StepConfig, StepOutcome, StepRecord, StepStatus,
};

/// Executes step sequences, threading payloads and recovering failures.
///
/// The history buffer is mutable per-run state: it is cleared at the start
/// of every [`Pipeline::execute`] call, so concurrent requests must each use
/// their own instance. `execute` itself never fails — every tool error is
/// recorded in history and reflected in the result status.
#[derive(Debug, Default)]
pub struct Pipeline {
    history: Vec<StepRecord>,
}

impl Pipeline {
    /// Create a new pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// History of the most recent run.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Run `steps` in order against `initial_input`.
    ///
    /// Per step: merge the threaded payload with the step's static params
    /// (params win), invoke the tool, and on failure attempt the configured
    /// fallback exactly once. The run terminates at the first unrecovered
    /// failure; `final_output` always holds the last successfully produced
    /// payload, or `initial_input` if nothing succeeded.
    pub async fn execute(&mut self, steps: &[StepConfig], initial_input: Payload) -> PipelineResult {
        self.history.clear();
        let mut current_input = initial_input.clone();
        let mut final_output = initial_input;
        let mut final_status = String::from("Pipeline execution started.");

        for (index, step) in steps.iter().enumerate() {
            let step_num = index + 1;
            let step_input = merge_payloads(&current_input, &step.params);

            // Structural check before any invocation.
            let Some(handle) = step.tool.as_ref() else {
                let error_msg = format!(
                    "Tool '{}' (Step {}) has no usable invocation handle. Skipping.",
                    step.name, step_num
                );
                log::warn!("{}", error_msg);
                self.history.push(StepRecord::new(
                    step_num,
                    &step.name,
                    step_input,
                    StepOutcome::Error(ErrorRecord {
                        error: error_msg.clone(),
                        kind: "InvalidToolConfiguration".to_string(),
                    }),
                    StepStatus::SkippedInvalidTool,
                ));
                final_status = format!("Error: {}", error_msg);
                return self.finish(final_output, final_status);
            };

            match handle.run(step_input.clone()).await {
                Ok(output) => {
                    self.history.push(StepRecord::new(
                        step_num,
                        &step.name,
                        step_input,
                        StepOutcome::Output(output.clone()),
                        StepStatus::Success,
                    ));
                    final_status = format!(
                        "Tool '{}' (Step {}) completed successfully.",
                        step.name, step_num
                    );
                    current_input = output.clone();
                    final_output = output;
                }
                Err(err) => {
                    log::warn!("tool '{}' (step {}) failed: {}", step.name, step_num, err);
                    let mut record = StepRecord::new(
                        step_num,
                        &step.name,
                        step_input.clone(),
                        StepOutcome::Error(ErrorRecord::from(&err)),
                        StepStatus::FailedPrimary,
                    );
                    final_status = format!(
                        "Error: Error executing tool '{}' (Step {}): {} - {}",
                        step.name, step_num, err.kind, err.message
                    );

                    // No fallback configured: terminate.
                    let Some(fallback) = step.fallback.as_deref() else {
                        self.history.push(record);
                        return self.finish(final_output, final_status);
                    };

                    record.fallback_attempted = true;
                    record.fallback_tool_name = Some(fallback.name.clone());

                    // Structurally invalid fallback: terminate with the
                    // primary failure as the result status.
                    let Some(fallback_handle) = fallback.tool.as_ref() else {
                        log::warn!(
                            "fallback '{}' for '{}' (step {}) has no usable invocation handle",
                            fallback.name,
                            step.name,
                            step_num
                        );
                        record.fallback_status = Some(FallbackStatus::SkippedInvalidFallback);
                        self.history.push(record);
                        return self.finish(final_output, final_status);
                    };

                    // The fallback sees the primary's input, with its own
                    // params merged on top.
                    let fallback_input = merge_payloads(&step_input, &fallback.params);
                    record.fallback_input_provided = Some(fallback_input.clone());

                    match fallback_handle.run(fallback_input).await {
                        Ok(output) => {
                            record.fallback_output = Some(StepOutcome::Output(output.clone()));
                            record.fallback_status = Some(FallbackStatus::Success);
                            final_status = format!(
                                "Fallback tool '{}' (Step {}) for '{}' completed successfully.",
                                fallback.name, step_num, step.name
                            );
                            self.history.push(record);
                            current_input = output.clone();
                            final_output = output;
                        }
                        Err(fallback_err) => {
                            record.fallback_output =
                                Some(StepOutcome::Error(ErrorRecord::from(&fallback_err)));
                            record.fallback_status = Some(FallbackStatus::Failed);
                            final_status = format!(
                                "Error: Both primary tool '{}' and its fallback '{}' (Step {}) failed.",
                                step.name, fallback.name, step_num
                            );
                            self.history.push(record);
                            return self.finish(final_output, final_status);
                        }
                    }
                }
            }
        }

        self.finish(final_output, final_status)
    }

    fn finish(&self, final_output: Payload, status: String) -> PipelineResult {
        PipelineResult {
            final_output,
            status,
            history: self.history.clone(),
        }
    }
}
