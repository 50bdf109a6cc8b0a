//! Final result assembly.

use crate::collaborators::PeerComparison;
use crate::core::{StageName, StagePayload, StageStatus, StatusMap, WorkflowStatus};
use crate::model::{ExtractedFacts, FinancialAnalysis, MarketAnalysis, Recommendation, RiskProfile};
use crate::utils::iso_timestamp;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Stage counts for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Stages in the pipeline, whether or not they ran.
    pub total_stages: usize,
    /// Stages that completed.
    pub succeeded: usize,
    /// Stages that failed.
    pub failed: usize,
    /// True only when every stage ran and completed.
    pub all_succeeded: bool,
}

impl WorkflowSummary {
    /// Counts the outcomes present in `stages`.
    #[must_use]
    pub fn from_stages(stages: &StatusMap) -> Self {
        Self {
            total_stages: StageName::ALL.len(),
            succeeded: stages.succeeded_count(),
            failed: stages.failed_count(),
            all_succeeded: stages.all_completed(),
        }
    }
}

/// The response for one evaluation, on both the success and failure paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Run identifier.
    pub run_id: Uuid,
    /// Uploaded filename.
    pub filename: String,
    /// Completed or Failed.
    pub status: WorkflowStatus,
    /// Every stage that ran, in execution order.
    pub stages: StatusMap,
    /// Wall-clock time of the run in milliseconds.
    pub duration_ms: f64,
    /// RFC 3339 completion time.
    pub finished_at: String,
    /// Why the run failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stage counts.
    pub summary: WorkflowSummary,
    /// Sector comparison, attached after a completed run when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_comparison: Option<PeerComparison>,
}

impl WorkflowResult {
    /// Returns true if every stage completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == WorkflowStatus::Completed
    }

    fn payload(&self, stage: StageName) -> Option<&StagePayload> {
        self.stages.get(stage).and_then(|outcome| outcome.payload())
    }

    /// Facts produced by extraction.
    #[must_use]
    pub fn facts(&self) -> Option<&ExtractedFacts> {
        match self.payload(StageName::Extraction)? {
            StagePayload::Extraction(facts) => Some(facts),
            _ => None,
        }
    }

    /// Market analysis output.
    #[must_use]
    pub fn market(&self) -> Option<&MarketAnalysis> {
        match self.payload(StageName::MarketAnalysis)? {
            StagePayload::MarketAnalysis(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Financial analysis output.
    #[must_use]
    pub fn financial(&self) -> Option<&FinancialAnalysis> {
        match self.payload(StageName::FinancialAnalysis)? {
            StagePayload::FinancialAnalysis(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// Risk profile.
    #[must_use]
    pub fn risk(&self) -> Option<&RiskProfile> {
        match self.payload(StageName::RiskAssessment)? {
            StagePayload::RiskAssessment(profile) => Some(profile),
            _ => None,
        }
    }

    /// Final recommendation.
    #[must_use]
    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self.payload(StageName::Recommendation)? {
            StagePayload::Recommendation(recommendation) => Some(recommendation),
            _ => None,
        }
    }
}

/// Builds a [`WorkflowResult`] from whatever the status map holds.
#[derive(Debug, Clone)]
pub struct ResultAggregator {
    run_id: Uuid,
    filename: String,
    started: Instant,
}

impl ResultAggregator {
    /// Starts the clock for a run.
    #[must_use]
    pub fn begin(run_id: Uuid, filename: impl Into<String>) -> Self {
        Self {
            run_id,
            filename: filename.into(),
            started: Instant::now(),
        }
    }

    /// Run identifier.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Milliseconds since [`begin`](Self::begin).
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Assembles the result.
    ///
    /// The run is Completed only if all five stages completed. Otherwise the
    /// error is `error` if given, else the first failed stage's error, else a
    /// list of the stages that never ran.
    #[must_use]
    pub fn finish(&self, stages: StatusMap, error: Option<String>) -> WorkflowResult {
        let summary = WorkflowSummary::from_stages(&stages);
        let (status, error) = if summary.all_succeeded && error.is_none() {
            (WorkflowStatus::Completed, None)
        } else {
            let error = error
                .or_else(|| {
                    stages
                        .first_failure()
                        .and_then(|outcome| outcome.error())
                        .map(ToString::to_string)
                })
                .unwrap_or_else(|| missing_stages_message(&stages));
            (WorkflowStatus::Failed, Some(error))
        };

        WorkflowResult {
            run_id: self.run_id,
            filename: self.filename.clone(),
            status,
            stages,
            duration_ms: self.elapsed_ms(),
            finished_at: iso_timestamp(),
            error,
            summary,
            peer_comparison: None,
        }
    }
}

fn missing_stages_message(stages: &StatusMap) -> String {
    let missing: Vec<&str> = StageName::ALL
        .iter()
        .filter(|stage| stages.status(**stage) != Some(StageStatus::Completed))
        .map(|stage| stage.as_str())
        .collect();
    format!("stages did not complete: {}", missing.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunningStage;
    use crate::errors::StageError;
    use crate::testing::{
        sample_facts, sample_financial, sample_market, sample_recommendation, sample_risk,
    };
    use pretty_assertions::assert_eq;

    fn completed_map() -> StatusMap {
        let mut stages = StatusMap::new();
        stages
            .record(RunningStage::begin(StageName::Extraction).complete(sample_facts()))
            .unwrap();
        stages
            .record(RunningStage::begin(StageName::MarketAnalysis).complete(sample_market()))
            .unwrap();
        stages
            .record(RunningStage::begin(StageName::FinancialAnalysis).complete(sample_financial()))
            .unwrap();
        stages
            .record(RunningStage::begin(StageName::RiskAssessment).complete(sample_risk()))
            .unwrap();
        stages
            .record(
                RunningStage::begin(StageName::Recommendation).complete(sample_recommendation()),
            )
            .unwrap();
        stages
    }

    #[test]
    fn test_completed_result() {
        let result = ResultAggregator::begin(Uuid::nil(), "acme.txt").finish(completed_map(), None);

        assert!(result.is_completed());
        assert_eq!(result.error, None);
        assert_eq!(
            result.summary,
            WorkflowSummary {
                total_stages: 5,
                succeeded: 5,
                failed: 0,
                all_succeeded: true,
            }
        );
        assert_eq!(result.facts().map(|f| f.company_name.as_str()), Some("Acme Analytics"));
        assert_eq!(result.recommendation(), Some(&sample_recommendation()));
        assert!(result.market().is_some());
        assert!(result.financial().is_some());
        assert!(result.risk().is_some());
    }

    #[test]
    fn test_failed_extraction_result() {
        let mut stages = StatusMap::new();
        stages
            .record(
                RunningStage::begin(StageName::Extraction)
                    .fail(StageError::extraction("unreadable")),
            )
            .unwrap();

        let result = ResultAggregator::begin(Uuid::nil(), "bad.pdf").finish(stages, None);
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(result.error.as_deref(), Some("Extraction failed: unreadable"));
        assert_eq!(result.summary.succeeded, 0);
        assert_eq!(result.summary.failed, 1);
        assert!(!result.summary.all_succeeded);
        assert!(result.facts().is_none());
        assert!(result.recommendation().is_none());
    }

    #[test]
    fn test_missing_stages_without_failure() {
        let mut stages = StatusMap::new();
        stages
            .record(RunningStage::begin(StageName::Extraction).complete(sample_facts()))
            .unwrap();

        let result = ResultAggregator::begin(Uuid::nil(), "acme.txt").finish(stages, None);
        assert_eq!(result.status, WorkflowStatus::Failed);
        assert_eq!(
            result.error.as_deref(),
            Some(
                "stages did not complete: market_analysis, financial_analysis, \
                 risk_assessment, recommendation"
            )
        );
    }

    #[test]
    fn test_serializes_stages_in_execution_order() {
        let result = ResultAggregator::begin(Uuid::nil(), "acme.txt").finish(completed_map(), None);
        let text = serde_json::to_string(&result).unwrap();

        let positions: Vec<usize> = StageName::ALL
            .iter()
            .map(|stage| text.find(&format!("\"{stage}\":{{")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["status"], "completed");
        assert!(json.get("error").is_none());
        assert!(json.get("peer_comparison").is_none());
    }
}
