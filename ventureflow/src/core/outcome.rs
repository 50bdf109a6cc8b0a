//! Per-stage outcomes and the ordered status map.

use super::{StageName, StageStatus};
use crate::errors::{StageError, TransitionError};
use crate::model::{ExtractedFacts, FinancialAnalysis, MarketAnalysis, Recommendation, RiskProfile};
use crate::observability::SpanTimer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The typed output of a completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StagePayload {
    /// Output of extraction.
    Extraction(ExtractedFacts),
    /// Output of market analysis.
    MarketAnalysis(MarketAnalysis),
    /// Output of financial analysis.
    FinancialAnalysis(FinancialAnalysis),
    /// Output of risk assessment.
    RiskAssessment(RiskProfile),
    /// Output of the recommendation stage.
    Recommendation(Box<Recommendation>),
}

impl StagePayload {
    /// Returns the stage that produces this payload.
    #[must_use]
    pub fn stage(&self) -> StageName {
        match self {
            Self::Extraction(_) => StageName::Extraction,
            Self::MarketAnalysis(_) => StageName::MarketAnalysis,
            Self::FinancialAnalysis(_) => StageName::FinancialAnalysis,
            Self::RiskAssessment(_) => StageName::RiskAssessment,
            Self::Recommendation(_) => StageName::Recommendation,
        }
    }
}

impl From<ExtractedFacts> for StagePayload {
    fn from(value: ExtractedFacts) -> Self {
        Self::Extraction(value)
    }
}

impl From<MarketAnalysis> for StagePayload {
    fn from(value: MarketAnalysis) -> Self {
        Self::MarketAnalysis(value)
    }
}

impl From<FinancialAnalysis> for StagePayload {
    fn from(value: FinancialAnalysis) -> Self {
        Self::FinancialAnalysis(value)
    }
}

impl From<RiskProfile> for StagePayload {
    fn from(value: RiskProfile) -> Self {
        Self::RiskAssessment(value)
    }
}

impl From<Recommendation> for StagePayload {
    fn from(value: Recommendation) -> Self {
        Self::Recommendation(Box::new(value))
    }
}

/// Lifecycle state of one stage, carrying its payload or error once terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageState {
    /// Not started.
    Pending,
    /// In flight.
    Running,
    /// Finished with a payload.
    Completed {
        /// The stage output.
        output: StagePayload,
    },
    /// Finished with an error.
    Failed {
        /// Why the stage failed.
        error: StageError,
    },
}

impl StageState {
    /// Returns the bare status of this state.
    #[must_use]
    pub fn status(&self) -> StageStatus {
        match self {
            Self::Pending => StageStatus::Pending,
            Self::Running => StageStatus::Running,
            Self::Completed { .. } => StageStatus::Completed,
            Self::Failed { .. } => StageStatus::Failed,
        }
    }
}

/// The recorded outcome of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutcome {
    /// The stage.
    pub stage: StageName,
    /// Its lifecycle state.
    pub state: StageState,
    /// When the stage started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Elapsed time in milliseconds.
    #[serde(default)]
    pub duration_ms: f64,
}

impl StageOutcome {
    /// Creates a pending outcome.
    #[must_use]
    pub fn pending(stage: StageName) -> Self {
        Self {
            stage,
            state: StageState::Pending,
            started_at: None,
            duration_ms: 0.0,
        }
    }

    /// Returns the bare status.
    #[must_use]
    pub fn status(&self) -> StageStatus {
        self.state.status()
    }

    /// Returns true if the stage completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.state, StageState::Completed { .. })
    }

    /// Returns true if the stage failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, StageState::Failed { .. })
    }

    /// Returns the payload of a completed stage.
    #[must_use]
    pub fn payload(&self) -> Option<&StagePayload> {
        match &self.state {
            StageState::Completed { output } => Some(output),
            _ => None,
        }
    }

    /// Returns the error of a failed stage.
    #[must_use]
    pub fn error(&self) -> Option<&StageError> {
        match &self.state {
            StageState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// A stage that has started and must end in exactly one terminal outcome.
///
/// `complete` and `fail` consume the handle, so a started stage cannot be
/// finished twice or moved back to pending.
#[derive(Debug, Clone)]
pub struct RunningStage {
    started_at: DateTime<Utc>,
    timer: SpanTimer,
}

impl RunningStage {
    /// Marks `stage` as started now.
    #[must_use]
    pub fn begin(stage: StageName) -> Self {
        Self {
            started_at: Utc::now(),
            timer: SpanTimer::start(stage),
        }
    }

    /// Returns the stage.
    #[must_use]
    pub fn stage(&self) -> StageName {
        self.timer.stage()
    }

    /// Returns the start timestamp.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns a `Running` outcome for recording while the stage is in flight.
    #[must_use]
    pub fn snapshot(&self) -> StageOutcome {
        self.finish(StageState::Running)
    }

    /// Ends the stage with a payload.
    #[must_use]
    pub fn complete(self, output: impl Into<StagePayload>) -> StageOutcome {
        self.finish(StageState::Completed {
            output: output.into(),
        })
    }

    /// Ends the stage with an error.
    #[must_use]
    pub fn fail(self, error: StageError) -> StageOutcome {
        self.finish(StageState::Failed { error })
    }

    fn finish(&self, state: StageState) -> StageOutcome {
        StageOutcome {
            stage: self.stage(),
            state,
            started_at: Some(self.started_at),
            duration_ms: self.timer.elapsed_ms(),
        }
    }
}

/// Stage outcomes keyed and ordered by execution order.
///
/// Stages that never ran have no entry. Recording enforces the forward-only
/// lifecycle: a terminal entry is never overwritten and a status never moves
/// back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMap {
    outcomes: BTreeMap<StageName, StageOutcome>,
}

impl StatusMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the stage is already terminal or the new
    /// status precedes the recorded one.
    pub fn record(&mut self, outcome: StageOutcome) -> Result<(), TransitionError> {
        if let Some(existing) = self.outcomes.get(&outcome.stage) {
            let current = existing.status();
            let attempted = outcome.status();
            if current.is_terminal() {
                return Err(TransitionError::AlreadyTerminal {
                    stage: outcome.stage,
                    current,
                    attempted,
                });
            }
            if attempted.rank() < current.rank() {
                return Err(TransitionError::Backward {
                    stage: outcome.stage,
                    current,
                    attempted,
                });
            }
        }
        self.outcomes.insert(outcome.stage, outcome);
        Ok(())
    }

    /// Returns the outcome for `stage`, if it ran.
    #[must_use]
    pub fn get(&self, stage: StageName) -> Option<&StageOutcome> {
        self.outcomes.get(&stage)
    }

    /// Returns the status for `stage`, if it ran.
    #[must_use]
    pub fn status(&self, stage: StageName) -> Option<StageStatus> {
        self.get(stage).map(StageOutcome::status)
    }

    /// Returns true if `stage` has an entry.
    #[must_use]
    pub fn contains(&self, stage: StageName) -> bool {
        self.outcomes.contains_key(&stage)
    }

    /// Iterates outcomes in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &StageOutcome> {
        self.outcomes.values()
    }

    /// Number of recorded stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of completed stages.
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.iter().filter(|o| o.is_completed()).count()
    }

    /// Number of failed stages.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.iter().filter(|o| o.is_failed()).count()
    }

    /// Returns true if every stage in [`StageName::ALL`] is present and completed.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        StageName::ALL
            .iter()
            .all(|stage| self.get(*stage).is_some_and(StageOutcome::is_completed))
    }

    /// Returns the first failed outcome in execution order.
    #[must_use]
    pub fn first_failure(&self) -> Option<&StageOutcome> {
        self.iter().find(|o| o.is_failed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExtractedFacts;

    #[test]
    fn test_running_stage_completes() {
        let running = RunningStage::begin(StageName::Extraction);
        let snapshot = running.snapshot();
        assert_eq!(snapshot.status(), StageStatus::Running);
        assert_eq!(snapshot.started_at, Some(running.started_at()));

        let outcome = running.complete(ExtractedFacts::new("Acme"));
        assert!(outcome.is_completed());
        assert_eq!(
            outcome.payload().map(StagePayload::stage),
            Some(StageName::Extraction)
        );
        assert!(outcome.error().is_none());
    }

    #[test]
    fn test_running_stage_fails() {
        let outcome = RunningStage::begin(StageName::RiskAssessment)
            .fail(StageError::risk("inconsistent inputs"));
        assert!(outcome.is_failed());
        assert_eq!(outcome.error().map(StageError::message), Some("inconsistent inputs"));
    }

    #[test]
    fn test_record_forward_transitions() {
        let mut map = StatusMap::new();
        map.record(StageOutcome::pending(StageName::Extraction)).unwrap();
        let running = RunningStage::begin(StageName::Extraction);
        map.record(running.snapshot()).unwrap();
        map.record(running.complete(ExtractedFacts::default())).unwrap();
        assert_eq!(map.status(StageName::Extraction), Some(StageStatus::Completed));
        assert_eq!(map.succeeded_count(), 1);
    }

    #[test]
    fn test_record_rejects_overwriting_terminal() {
        let mut map = StatusMap::new();
        let running = RunningStage::begin(StageName::MarketAnalysis);
        map.record(running.clone().fail(StageError::market("boom")))
            .unwrap();

        let err = map.record(running.snapshot()).unwrap_err();
        assert!(matches!(err, TransitionError::AlreadyTerminal { .. }));

        let err = map
            .record(running.complete(ExtractedFacts::default()))
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionError::AlreadyTerminal {
                current: StageStatus::Failed,
                attempted: StageStatus::Completed,
                ..
            }
        ));
        assert_eq!(map.failed_count(), 1);
    }

    #[test]
    fn test_record_rejects_backward() {
        let mut map = StatusMap::new();
        map.record(RunningStage::begin(StageName::Recommendation).snapshot())
            .unwrap();
        let err = map
            .record(StageOutcome::pending(StageName::Recommendation))
            .unwrap_err();
        assert!(matches!(err, TransitionError::Backward { .. }));
    }

    #[test]
    fn test_iteration_follows_execution_order() {
        let mut map = StatusMap::new();
        for stage in StageName::ALL.iter().rev() {
            map.record(StageOutcome::pending(*stage)).unwrap();
        }
        let order: Vec<_> = map.iter().map(|o| o.stage).collect();
        assert_eq!(order, StageName::ALL.to_vec());
        assert!(!map.all_completed());
    }

    #[test]
    fn test_all_completed_requires_every_stage() {
        let mut map = StatusMap::new();
        map.record(RunningStage::begin(StageName::Extraction).complete(ExtractedFacts::default()))
            .unwrap();
        assert_eq!(map.succeeded_count(), 1);
        assert!(!map.all_completed());
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let outcome = RunningStage::begin(StageName::FinancialAnalysis)
            .fail(StageError::financial("negative ARR"));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["stage"], "financial_analysis");
        assert_eq!(json["state"]["status"], "failed");
        assert_eq!(json["state"]["error"]["kind"], "analysis");

        let back: StageOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back.status(), StageStatus::Failed);
    }
}
