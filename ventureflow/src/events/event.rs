//! Lifecycle events emitted by the coordinator.

use crate::core::{StageName, StageOutcome, StageState};
use serde_json::{json, Value};
use uuid::Uuid;

/// One workflow or stage transition.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// A run began.
    WorkflowStarted {
        /// Run identifier.
        run_id: Uuid,
        /// Uploaded filename.
        filename: String,
    },
    /// A stage began.
    StageStarted {
        /// Run identifier.
        run_id: Uuid,
        /// The stage.
        stage: StageName,
    },
    /// A stage produced its output.
    StageCompleted {
        /// Run identifier.
        run_id: Uuid,
        /// The stage.
        stage: StageName,
        /// Elapsed time in milliseconds.
        duration_ms: f64,
    },
    /// A stage failed, timed out or panicked.
    StageFailed {
        /// Run identifier.
        run_id: Uuid,
        /// The stage.
        stage: StageName,
        /// Elapsed time in milliseconds.
        duration_ms: f64,
        /// Error message.
        error: String,
    },
    /// Every stage completed.
    WorkflowCompleted {
        /// Run identifier.
        run_id: Uuid,
        /// Elapsed time in milliseconds.
        duration_ms: f64,
    },
    /// A stage failure ended the run.
    WorkflowFailed {
        /// Run identifier.
        run_id: Uuid,
        /// Elapsed time in milliseconds.
        duration_ms: f64,
        /// The stage that failed first, if any.
        stage: Option<StageName>,
        /// Error message.
        error: String,
    },
}

impl WorkflowEvent {
    /// Builds the terminal stage event for a finished outcome.
    ///
    /// Returns `None` for pending or running outcomes.
    #[must_use]
    pub fn for_outcome(run_id: Uuid, outcome: &StageOutcome) -> Option<Self> {
        match &outcome.state {
            StageState::Completed { .. } => Some(Self::StageCompleted {
                run_id,
                stage: outcome.stage,
                duration_ms: outcome.duration_ms,
            }),
            StageState::Failed { error } => Some(Self::StageFailed {
                run_id,
                stage: outcome.stage,
                duration_ms: outcome.duration_ms,
                error: error.to_string(),
            }),
            StageState::Pending | StageState::Running => None,
        }
    }

    /// Dotted event type, e.g. `stage.completed`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::WorkflowStarted { .. } => "workflow.started",
            Self::StageStarted { .. } => "stage.started",
            Self::StageCompleted { .. } => "stage.completed",
            Self::StageFailed { .. } => "stage.failed",
            Self::WorkflowCompleted { .. } => "workflow.completed",
            Self::WorkflowFailed { .. } => "workflow.failed",
        }
    }

    /// Run the event belongs to.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        match self {
            Self::WorkflowStarted { run_id, .. }
            | Self::StageStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::StageFailed { run_id, .. }
            | Self::WorkflowCompleted { run_id, .. }
            | Self::WorkflowFailed { run_id, .. } => *run_id,
        }
    }

    /// Stage the event concerns, for stage events.
    #[must_use]
    pub const fn stage(&self) -> Option<StageName> {
        match self {
            Self::StageStarted { stage, .. }
            | Self::StageCompleted { stage, .. }
            | Self::StageFailed { stage, .. } => Some(*stage),
            Self::WorkflowFailed { stage, .. } => *stage,
            Self::WorkflowStarted { .. } | Self::WorkflowCompleted { .. } => None,
        }
    }

    /// Returns true for failure events.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::StageFailed { .. } | Self::WorkflowFailed { .. })
    }

    /// Flat JSON payload for sinks that ship events elsewhere.
    #[must_use]
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "event_type": self.event_type(),
            "run_id": self.run_id().to_string(),
        });

        let fields = match self {
            Self::WorkflowStarted { filename, .. } => json!({ "filename": filename }),
            Self::StageStarted { stage, .. } => json!({ "stage": stage.as_str() }),
            Self::StageCompleted {
                stage, duration_ms, ..
            } => json!({ "stage": stage.as_str(), "duration_ms": duration_ms }),
            Self::StageFailed {
                stage,
                duration_ms,
                error,
                ..
            } => json!({
                "stage": stage.as_str(),
                "duration_ms": duration_ms,
                "error": error,
            }),
            Self::WorkflowCompleted { duration_ms, .. } => json!({ "duration_ms": duration_ms }),
            Self::WorkflowFailed {
                duration_ms,
                stage,
                error,
                ..
            } => json!({
                "duration_ms": duration_ms,
                "stage": stage.map(|s| s.as_str()),
                "error": error,
            }),
        };

        if let (Value::Object(target), Value::Object(extra)) = (&mut payload, fields) {
            target.extend(extra);
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunningStage;
    use crate::errors::StageError;
    use crate::testing::sample_facts;

    #[test]
    fn test_for_outcome_skips_non_terminal() {
        let running = RunningStage::begin(StageName::Extraction);
        assert!(WorkflowEvent::for_outcome(Uuid::nil(), &running.snapshot()).is_none());

        let done = running.complete(sample_facts());
        let event = WorkflowEvent::for_outcome(Uuid::nil(), &done).unwrap();
        assert_eq!(event.event_type(), "stage.completed");
        assert_eq!(event.stage(), Some(StageName::Extraction));
    }

    #[test]
    fn test_failed_payload_carries_error() {
        let outcome =
            RunningStage::begin(StageName::RiskAssessment).fail(StageError::risk("bad input"));
        let event = WorkflowEvent::for_outcome(Uuid::nil(), &outcome).unwrap();

        assert!(event.is_failure());
        let payload = event.payload();
        assert_eq!(payload["event_type"], "stage.failed");
        assert_eq!(payload["stage"], "risk_assessment");
        assert_eq!(payload["error"], "Risk assessment failed: bad input");
        assert_eq!(payload["run_id"], Uuid::nil().to_string());
    }

    #[test]
    fn test_workflow_failed_without_stage() {
        let event = WorkflowEvent::WorkflowFailed {
            run_id: Uuid::nil(),
            duration_ms: 1.5,
            stage: None,
            error: "stage map rejected an outcome".into(),
        };
        assert_eq!(event.payload()["stage"], Value::Null);
        assert_eq!(event.stage(), None);
    }
}
