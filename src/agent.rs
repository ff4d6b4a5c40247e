//! Goal-to-plan orchestration.

use std::future::Future;

use tracing::{debug, info};

use crate::error::{ExtractError, OllamaError};
use crate::extract::{ExtractMode, ExtractionResult, extract_json};
use crate::ollama::ModelExecutor;
use crate::plan::validate_plan;
use crate::prompt::build_prompt;

/// How the model reply is turned into a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub mode: ExtractMode,
    /// Reject decoded values that do not match the to-do shape.
    pub strict: bool,
}

/// Ask the model to break `goal` into a to-do list and extract the JSON.
///
/// Invocation failures are returned as `Err`. Extraction and validation
/// failures are returned as `Ok(ExtractionResult::Failed { .. })` with the
/// model's raw output attached.
pub async fn create_todo_plan<E: ModelExecutor + ?Sized>(
    goal: &str,
    executor: &E,
    options: ExtractOptions,
) -> Result<ExtractionResult, OllamaError> {
    let prompt = build_prompt(goal);
    let raw_output = executor.run(&prompt).await?;
    debug!("Model output length: {} chars", raw_output.len());

    Ok(interpret_output(&raw_output, options))
}

/// Like [`create_todo_plan`], but gives up with `OllamaError::Cancelled` as
/// soon as `cancel` completes. The in-flight invocation is dropped, which
/// kills the model process.
pub async fn create_todo_plan_until<E, C>(
    goal: &str,
    executor: &E,
    options: ExtractOptions,
    cancel: C,
) -> Result<ExtractionResult, OllamaError>
where
    E: ModelExecutor + ?Sized,
    C: Future<Output = ()>,
{
    tokio::select! {
        result = create_todo_plan(goal, executor, options) => result,
        () = cancel => {
            info!("Cancellation requested, stopping model process");
            Err(OllamaError::Cancelled)
        }
    }
}

/// Extract, then optionally validate, a raw model reply.
pub fn interpret_output(raw_output: &str, options: ExtractOptions) -> ExtractionResult {
    let result = extract_json(raw_output, options.mode);

    if !options.strict {
        return result;
    }

    match result {
        ExtractionResult::Parsed(value) => match validate_plan(&value) {
            Ok(plan) => {
                debug!(
                    "Plan has {} tasks and {} steps",
                    plan.tasks.len(),
                    plan.step_count()
                );
                ExtractionResult::Parsed(value)
            }
            Err(msg) => ExtractionResult::failed(ExtractError::Schema(msg), raw_output),
        },
        failed => failed,
    }
}
