//! Stage identity and status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five stages of the evaluation pipeline.
///
/// Variants are declared in execution order, so the derived `Ord` sorts a
/// status map the way the coordinator runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Turns the raw document into extracted facts.
    Extraction,
    /// Sizes the sector and scores the market opportunity.
    MarketAnalysis,
    /// Projects financials and scores financial health.
    FinancialAnalysis,
    /// Builds the risk profile.
    RiskAssessment,
    /// Produces the final recommendation.
    Recommendation,
}

impl StageName {
    /// All stages in execution order.
    pub const ALL: [Self; 5] = [
        Self::Extraction,
        Self::MarketAnalysis,
        Self::FinancialAnalysis,
        Self::RiskAssessment,
        Self::Recommendation,
    ];

    /// Returns the snake_case identifier used in logs, events and JSON.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::MarketAnalysis => "market_analysis",
            Self::FinancialAnalysis => "financial_analysis",
            Self::RiskAssessment => "risk_assessment",
            Self::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The execution status of a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage is waiting for its dependencies.
    Pending,
    /// Stage is currently running.
    Running,
    /// Stage completed successfully.
    Completed,
    /// Stage failed.
    Failed,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Position along the forward-only lifecycle.
    #[must_use]
    pub(crate) const fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed => 2,
        }
    }
}

/// The overall status of one evaluation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// No stage has started yet.
    NotStarted,
    /// At least one stage has started and none has failed.
    Running,
    /// Every stage completed.
    Completed,
    /// A stage failed and the chain was aborted.
    Failed,
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_name_order_matches_execution() {
        let mut names = StageName::ALL.to_vec();
        names.reverse();
        names.sort();
        assert_eq!(names, StageName::ALL.to_vec());
    }

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::Extraction.to_string(), "extraction");
        assert_eq!(StageName::MarketAnalysis.to_string(), "market_analysis");
        assert_eq!(StageName::Recommendation.to_string(), "recommendation");
    }

    #[test]
    fn test_stage_status_is_terminal() {
        assert!(StageStatus::Completed.is_terminal());
        assert!(StageStatus::Failed.is_terminal());
        assert!(!StageStatus::Pending.is_terminal());
        assert!(!StageStatus::Running.is_terminal());
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Completed).unwrap();
        assert_eq!(json, r#""completed""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::Completed);
    }

    #[test]
    fn test_workflow_status_default() {
        assert_eq!(WorkflowStatus::default(), WorkflowStatus::NotStarted);
        assert_eq!(WorkflowStatus::Failed.to_string(), "failed");
    }
}
