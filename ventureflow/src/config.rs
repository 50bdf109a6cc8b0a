//! Evaluator configuration.
//!
//! Configuration is read from an optional JSON file, overlaid with
//! environment variables and validated before the evaluator is built.

use crate::core::StageName;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Overrides every stage timeout, in seconds.
pub const ENV_STAGE_TIMEOUT: &str = "VENTUREFLOW_STAGE_TIMEOUT_SECS";

/// Enables or disables post-run evaluation recording.
pub const ENV_RECORD_EVALUATIONS: &str = "VENTUREFLOW_RECORD_EVALUATIONS";

/// Per-stage deadlines in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTimeouts {
    /// Extraction deadline.
    #[serde(default = "default_extraction_timeout")]
    pub extraction: f64,
    /// Market analysis deadline.
    #[serde(default = "default_analysis_timeout")]
    pub market_analysis: f64,
    /// Financial analysis deadline.
    #[serde(default = "default_analysis_timeout")]
    pub financial_analysis: f64,
    /// Risk assessment deadline.
    #[serde(default = "default_risk_timeout")]
    pub risk_assessment: f64,
    /// Recommendation deadline.
    #[serde(default = "default_recommendation_timeout")]
    pub recommendation: f64,
}

fn default_extraction_timeout() -> f64 {
    30.0
}

fn default_analysis_timeout() -> f64 {
    20.0
}

fn default_risk_timeout() -> f64 {
    15.0
}

fn default_recommendation_timeout() -> f64 {
    10.0
}

impl Default for StageTimeouts {
    fn default() -> Self {
        Self {
            extraction: default_extraction_timeout(),
            market_analysis: default_analysis_timeout(),
            financial_analysis: default_analysis_timeout(),
            risk_assessment: default_risk_timeout(),
            recommendation: default_recommendation_timeout(),
        }
    }
}

impl StageTimeouts {
    /// Uses the same deadline for every stage.
    #[must_use]
    pub fn uniform(seconds: f64) -> Self {
        Self {
            extraction: seconds,
            market_analysis: seconds,
            financial_analysis: seconds,
            risk_assessment: seconds,
            recommendation: seconds,
        }
    }

    /// Returns the configured seconds for `stage`.
    #[must_use]
    pub fn seconds(&self, stage: StageName) -> f64 {
        match stage {
            StageName::Extraction => self.extraction,
            StageName::MarketAnalysis => self.market_analysis,
            StageName::FinancialAnalysis => self.financial_analysis,
            StageName::RiskAssessment => self.risk_assessment,
            StageName::Recommendation => self.recommendation,
        }
    }

    /// Returns the deadline for `stage`.
    ///
    /// Values that cannot be represented fall back to the stage default;
    /// [`EvaluatorConfig::validate`] rejects them before that can happen.
    #[must_use]
    pub fn for_stage(&self, stage: StageName) -> Duration {
        Duration::try_from_secs_f64(self.seconds(stage))
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or_else(|| Duration::from_secs_f64(Self::default().seconds(stage)))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for stage in StageName::ALL {
            let seconds = self.seconds(stage);
            let representable = Duration::try_from_secs_f64(seconds).is_ok_and(|d| !d.is_zero());
            if !seconds.is_finite() || seconds <= 0.0 || !representable {
                return Err(ConfigError::InvalidField {
                    field: format!("timeouts.{stage}"),
                    reason: format!("must be a positive number of seconds, got {seconds}"),
                });
            }
        }
        Ok(())
    }
}

/// Post-run analytics toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Attach a peer comparison to completed results.
    #[serde(default = "default_true")]
    pub peer_comparison: bool,
    /// Record completed evaluations for future comparisons.
    #[serde(default = "default_true")]
    pub record_evaluations: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            peer_comparison: true,
            record_evaluations: true,
        }
    }
}

/// Top-level evaluator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Name reported in logs.
    #[serde(default = "default_pipeline_name")]
    pub pipeline_name: String,
    /// Per-stage deadlines.
    #[serde(default)]
    pub timeouts: StageTimeouts,
    /// Post-run analytics toggles.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_pipeline_name() -> String {
    "startup_evaluation".to_string()
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            pipeline_name: default_pipeline_name(),
            timeouts: StageTimeouts::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl EvaluatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-stage deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the analytics toggles.
    #[must_use]
    pub fn with_analytics(mut self, analytics: AnalyticsConfig) -> Self {
        self.analytics = analytics;
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads the file (or defaults), applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns the first read, parse, environment or validation error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        debug!(pipeline = %config.pipeline_name, "Loaded evaluator config");
        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for unparseable values.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|var| std::env::var(var).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for unparseable values.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_STAGE_TIMEOUT) {
            let seconds = value
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid_env(ENV_STAGE_TIMEOUT, &value))?;
            self.timeouts = StageTimeouts::uniform(seconds);
        }
        if let Some(value) = lookup(ENV_RECORD_EVALUATIONS) {
            self.analytics.record_evaluations = parse_flag(&value)
                .ok_or_else(|| invalid_env(ENV_RECORD_EVALUATIONS, &value))?;
        }
        Ok(())
    }

    /// Rejects empty names and non-positive timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline_name.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "pipeline_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        self.timeouts.validate()
    }
}

fn invalid_env(var: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnv {
        var: var.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.pipeline_name, "startup_evaluation");
        assert_eq!(
            config.timeouts.for_stage(StageName::Extraction),
            Duration::from_secs(30)
        );
        assert_eq!(
            config.timeouts.for_stage(StageName::Recommendation),
            Duration::from_secs(10)
        );
        assert!(config.analytics.record_evaluations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            EvaluatorConfig::from_json(r#"{"timeouts": {"risk_assessment": 2.5}}"#).unwrap();
        assert!((config.timeouts.risk_assessment - 2.5).abs() < f64::EPSILON);
        assert!((config.timeouts.market_analysis - 20.0).abs() < f64::EPSILON);
        assert!(config.analytics.peer_comparison);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pipeline_name": "diligence", "analytics": {{"record_evaluations": false}}}}"#
        )
        .unwrap();

        let config = EvaluatorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.pipeline_name, "diligence");
        assert!(!config.analytics.record_evaluations);
        assert!(config.analytics.peer_comparison);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EvaluatorConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = EvaluatorConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EvaluatorConfig::default();
        config
            .apply_env_from(env(&[
                (ENV_STAGE_TIMEOUT, "5"),
                (ENV_RECORD_EVALUATIONS, "off"),
            ]))
            .unwrap();
        for stage in StageName::ALL {
            assert_eq!(config.timeouts.for_stage(stage), Duration::from_secs(5));
        }
        assert!(!config.analytics.record_evaluations);
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = EvaluatorConfig::default();
        let err = config
            .apply_env_from(env(&[(ENV_RECORD_EVALUATIONS, "maybe")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for VENTUREFLOW_RECORD_EVALUATIONS: 'maybe'"
        );
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let config = EvaluatorConfig::default().with_timeouts(StageTimeouts {
            financial_analysis: 0.0,
            ..StageTimeouts::default()
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeouts.financial_analysis"));
    }

    #[test]
    fn test_unrepresentable_timeout_rejected() {
        for seconds in [1e20, 1e-12, f64::INFINITY] {
            let config = EvaluatorConfig::default().with_timeouts(StageTimeouts {
                risk_assessment: seconds,
                ..StageTimeouts::default()
            });
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains("timeouts.risk_assessment"),
                "{seconds}: {err}"
            );
        }
    }

    #[test]
    fn test_unrepresentable_timeout_rejected_from_json() {
        let config = EvaluatorConfig::from_json(r#"{"timeouts": {"extraction": 1e20}}"#).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeouts.extraction"));
    }
}
