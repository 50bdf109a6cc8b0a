//! Error types for the ventureflow pipeline.
//!
//! Stage failures are values, not panics: every executor reports a
//! [`StageError`] which the coordinator folds into a failed workflow result.
//! The remaining types cover collaborator calls, illegal status transitions,
//! and configuration loading.

use crate::core::{StageName, StageStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for ventureflow operations outside the stage boundary.
#[derive(Debug, Error)]
pub enum VentureflowError {
    /// A stage failed.
    #[error("{0}")]
    Stage(#[from] StageError),

    /// An external collaborator failed.
    #[error("{0}")]
    Collaborator(#[from] CollaboratorError),

    /// A stage outcome was recorded out of order.
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Configuration could not be loaded or is invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a single pipeline stage.
///
/// Each variant carries a human-readable message; the originating stage is
/// either implied by the variant or stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageError {
    /// Document extraction failed.
    #[error("Extraction failed: {message}")]
    Extraction {
        /// The error message.
        message: String,
    },

    /// Market or financial analysis failed.
    #[error("{stage} failed: {message}")]
    Analysis {
        /// Either `MarketAnalysis` or `FinancialAnalysis`.
        stage: StageName,
        /// The error message.
        message: String,
    },

    /// Risk assessment failed.
    #[error("Risk assessment failed: {message}")]
    Risk {
        /// The error message.
        message: String,
    },

    /// Recommendation generation failed.
    #[error("Recommendation failed: {message}")]
    Recommendation {
        /// The error message.
        message: String,
    },
}

impl StageError {
    /// Creates the error variant that belongs to `stage`.
    #[must_use]
    pub fn for_stage(stage: StageName, message: impl Into<String>) -> Self {
        let message = message.into();
        match stage {
            StageName::Extraction => Self::Extraction { message },
            StageName::MarketAnalysis | StageName::FinancialAnalysis => {
                Self::Analysis { stage, message }
            }
            StageName::RiskAssessment => Self::Risk { message },
            StageName::Recommendation => Self::Recommendation { message },
        }
    }

    /// Creates an extraction error.
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::for_stage(StageName::Extraction, message)
    }

    /// Creates a market analysis error.
    #[must_use]
    pub fn market(message: impl Into<String>) -> Self {
        Self::for_stage(StageName::MarketAnalysis, message)
    }

    /// Creates a financial analysis error.
    #[must_use]
    pub fn financial(message: impl Into<String>) -> Self {
        Self::for_stage(StageName::FinancialAnalysis, message)
    }

    /// Creates a risk assessment error.
    #[must_use]
    pub fn risk(message: impl Into<String>) -> Self {
        Self::for_stage(StageName::RiskAssessment, message)
    }

    /// Creates a recommendation error.
    #[must_use]
    pub fn recommendation(message: impl Into<String>) -> Self {
        Self::for_stage(StageName::Recommendation, message)
    }

    /// Returns the stage that produced this error.
    #[must_use]
    pub fn stage(&self) -> StageName {
        match self {
            Self::Extraction { .. } => StageName::Extraction,
            Self::Analysis { stage, .. } => *stage,
            Self::Risk { .. } => StageName::RiskAssessment,
            Self::Recommendation { .. } => StageName::Recommendation,
        }
    }

    /// Returns the bare error message without the stage prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Extraction { message }
            | Self::Analysis { message, .. }
            | Self::Risk { message }
            | Self::Recommendation { message } => message,
        }
    }
}

/// Errors reported by external collaborators (document backend, analytics store).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    /// The collaborator could not be reached or is not configured.
    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),

    /// The document could not be interpreted.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The collaborator refused the request.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Error raised when a stage outcome would move backward or overwrite a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The stage already reached Completed or Failed.
    #[error("Stage '{stage}' is already {current} and cannot become {attempted}")]
    AlreadyTerminal {
        /// The stage.
        stage: StageName,
        /// Its recorded status.
        current: StageStatus,
        /// The status that was rejected.
        attempted: StageStatus,
    },

    /// The new status precedes the recorded one.
    #[error("Stage '{stage}' cannot move backward from {current} to {attempted}")]
    Backward {
        /// The stage.
        stage: StageName,
        /// Its recorded status.
        current: StageStatus,
        /// The status that was rejected.
        attempted: StageStatus,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Read {
        /// The path that was read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv {
        /// The variable name.
        var: String,
        /// The offending value.
        value: String,
    },

    /// A field holds a value outside its allowed range.
    #[error("Invalid config field '{field}': {reason}")]
    InvalidField {
        /// The field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_stage_picks_variant() {
        assert!(matches!(
            StageError::for_stage(StageName::Extraction, "x"),
            StageError::Extraction { .. }
        ));
        assert!(matches!(
            StageError::for_stage(StageName::FinancialAnalysis, "x"),
            StageError::Analysis {
                stage: StageName::FinancialAnalysis,
                ..
            }
        ));
        assert!(matches!(
            StageError::for_stage(StageName::RiskAssessment, "x"),
            StageError::Risk { .. }
        ));
        assert!(matches!(
            StageError::for_stage(StageName::Recommendation, "x"),
            StageError::Recommendation { .. }
        ));
    }

    #[test]
    fn test_stage_round_trips_through_constructor() {
        for stage in StageName::ALL {
            assert_eq!(StageError::for_stage(stage, "boom").stage(), stage);
        }
    }

    #[test]
    fn test_display_includes_stage_and_message() {
        let err = StageError::market("peer data missing");
        assert_eq!(err.to_string(), "market_analysis failed: peer data missing");
        assert_eq!(err.message(), "peer data missing");

        let err = StageError::extraction("empty document");
        assert_eq!(err.to_string(), "Extraction failed: empty document");
    }

    #[test]
    fn test_stage_error_serialization() {
        let err = StageError::financial("negative ARR");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "analysis");
        assert_eq!(json["stage"], "financial_analysis");

        let back: StageError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_transition_error_display() {
        let err = TransitionError::AlreadyTerminal {
            stage: StageName::RiskAssessment,
            current: StageStatus::Completed,
            attempted: StageStatus::Running,
        };
        assert_eq!(
            err.to_string(),
            "Stage 'risk_assessment' is already completed and cannot become running"
        );
    }

    #[test]
    fn test_wraps_into_top_level_error() {
        let err: VentureflowError = CollaboratorError::Unavailable("offline".into()).into();
        assert!(err.to_string().contains("offline"));
    }
}
