//! Risk assessment stage.

use super::StageExecutor;
use crate::core::StageName;
use crate::errors::StageError;
use crate::model::{CompetitionIntensity, RiskInput, RiskProfile};
use crate::scoring::{overall_level, ScoringEngine};
use async_trait::async_trait;
use tracing::{info, warn};

/// Valuation multiples above this raise a red flag.
pub const MAX_VALUATION_MULTIPLE: f64 = 50.0;

/// Churn rates above this raise a red flag.
pub const MAX_CHURN_RATE: f64 = 15.0;

/// Builds the risk profile from facts and both analyses.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAssessmentStage {
    engine: ScoringEngine,
}

impl RiskAssessmentStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deal-level warnings derived from the analyses.
    #[must_use]
    pub fn red_flags(input: &RiskInput) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(multiple) = input.financial.unit_metrics.valuation_multiple {
            if multiple > MAX_VALUATION_MULTIPLE {
                flags.push(format!("Valuation is {multiple:.1}x ARR"));
            }
        }
        if input.market.sector_profile.competition == CompetitionIntensity::High
            && input.facts.arr_crore <= 0.0
        {
            flags.push("Crowded market with no revenue".to_string());
        }
        let churn = input.facts.key_metrics.churn_rate;
        if churn > MAX_CHURN_RATE {
            flags.push(format!("Churn rate of {churn:.1}% exceeds {MAX_CHURN_RATE:.0}%"));
        }
        flags
    }

    /// Runs the assessment without consistency checks.
    #[must_use]
    pub fn assess(&self, input: &RiskInput) -> RiskProfile {
        let categories = self.engine.assess_risk(&input.facts);
        let overall = ScoringEngine::summarize_risk(&categories);
        RiskProfile {
            overall_score: overall.score,
            risk_level: overall_level(overall.score),
            categories,
            red_flags: Self::red_flags(input),
        }
    }
}

#[async_trait]
impl StageExecutor for RiskAssessmentStage {
    type Input = RiskInput;
    type Output = RiskProfile;

    fn name(&self) -> StageName {
        StageName::RiskAssessment
    }

    async fn execute(&self, input: RiskInput) -> Result<RiskProfile, StageError> {
        let company = &input.facts.company_name;
        if &input.market.company_name != company || &input.financial.company_name != company {
            return Err(StageError::risk(format!(
                "analyses do not describe '{company}'"
            )));
        }

        let profile = self.assess(&input);
        if !profile.red_flags.is_empty() {
            warn!(
                company = %company,
                red_flags = ?profile.red_flags,
                "Red flags raised"
            );
        }
        info!(
            company = %company,
            risk_score = profile.overall_score,
            risk_level = %profile.risk_level,
            "Risk assessment complete"
        );
        Ok(profile)
    }
}
