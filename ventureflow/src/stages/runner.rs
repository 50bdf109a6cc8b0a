//! Bounded, panic-safe execution of a single stage.

use super::StageExecutor;
use crate::core::{RunningStage, StageOutcome};
use crate::errors::StageError;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of running one stage: the outcome to record plus the typed output
/// on success.
#[derive(Debug)]
pub struct StageRun<T> {
    /// Terminal outcome (Completed or Failed).
    pub outcome: StageOutcome,
    /// The output, present only when the stage completed.
    pub output: Option<T>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `executor` on `input` within `deadline`.
///
/// Never fails and never panics: errors, timeouts and panics inside the
/// stage all become a failed outcome attributed to the executor's stage.
pub async fn run_stage<S>(
    executor: &S,
    running: RunningStage,
    input: S::Input,
    deadline: Duration,
) -> StageRun<S::Output>
where
    S: StageExecutor + ?Sized,
{
    let stage = running.stage();
    let attempt = AssertUnwindSafe(executor.execute(input)).catch_unwind();

    let result = match tokio::time::timeout(deadline, attempt).await {
        Ok(Ok(result)) => result,
        Ok(Err(payload)) => {
            let message = panic_message(payload.as_ref());
            warn!(stage = %stage, panic = %message, "Stage panicked");
            Err(StageError::for_stage(stage, format!("stage panicked: {message}")))
        }
        Err(_) => {
            warn!(stage = %stage, deadline_ms = deadline.as_millis(), "Stage timed out");
            Err(StageError::for_stage(
                stage,
                format!("timed out after {}ms", deadline.as_millis()),
            ))
        }
    };

    match result {
        Ok(output) => {
            let outcome = running.complete(output.clone());
            debug!(stage = %stage, duration_ms = outcome.duration_ms, "Stage completed");
            StageRun {
                outcome,
                output: Some(output),
            }
        }
        Err(error) => {
            let error = if error.stage() == stage {
                error
            } else {
                StageError::for_stage(stage, error.message())
            };
            let outcome = running.fail(error);
            debug!(stage = %stage, duration_ms = outcome.duration_ms, "Stage failed");
            StageRun {
                outcome,
                output: None,
            }
        }
    }
}
