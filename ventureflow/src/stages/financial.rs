//! Financial analysis stage.

use super::StageExecutor;
use crate::core::StageName;
use crate::errors::StageError;
use crate::model::{
    CurrentFinancials, ExtractedFacts, FinancialAnalysis, FinancialProjections, UnitMetrics,
};
use crate::scoring::ScoringEngine;
use async_trait::async_trait;
use tracing::info;

/// ARR multiplier for the next-year projection.
pub const NEXT_YEAR_MULTIPLIER: f64 = 1.5;

/// ARR multiplier for the three-year projection.
pub const THREE_YEAR_MULTIPLIER: f64 = 3.2;

/// Lakh per crore.
const LAKH_PER_CRORE: f64 = 100.0;

/// Projects financials and scores financial health.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialAnalysisStage {
    engine: ScoringEngine,
}

impl FinancialAnalysisStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the analysis without input validation.
    #[must_use]
    pub fn analyze(&self, facts: &ExtractedFacts) -> FinancialAnalysis {
        let arr = facts.arr_crore;
        let valuation = facts.valuation_pre_money_crore;
        let mrr = facts.key_metrics.mrr_lakh;

        let unit_metrics = UnitMetrics {
            arr_per_employee_lakh: (facts.team_size > 0)
                .then(|| arr * LAKH_PER_CRORE / f64::from(facts.team_size)),
            valuation_multiple: (arr > 0.0).then(|| valuation / arr),
        };

        FinancialAnalysis {
            company_name: facts.company_name.clone(),
            current: CurrentFinancials {
                arr_crore: arr,
                valuation_crore: valuation,
                mrr_lakh: mrr,
                annualized_mrr_crore: mrr * 12.0 / LAKH_PER_CRORE,
            },
            projections: FinancialProjections {
                next_year_arr_crore: arr * NEXT_YEAR_MULTIPLIER,
                three_year_arr_crore: arr * THREE_YEAR_MULTIPLIER,
            },
            unit_metrics,
            financial_health: self.engine.financial_health(facts),
        }
    }
}

#[async_trait]
impl StageExecutor for FinancialAnalysisStage {
    type Input = ExtractedFacts;
    type Output = FinancialAnalysis;

    fn name(&self) -> StageName {
        StageName::FinancialAnalysis
    }

    async fn execute(&self, input: ExtractedFacts) -> Result<FinancialAnalysis, StageError> {
        input
            .validate()
            .map_err(|e| StageError::financial(e.to_string()))?;
        let analysis = self.analyze(&input);
        info!(
            company = %analysis.company_name,
            score = analysis.financial_health.score,
            next_year_arr = analysis.projections.next_year_arr_crore,
            "Financial analysis complete"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_facts;

    #[tokio::test]
    async fn test_sample_financial_analysis() {
        let analysis = FinancialAnalysisStage::new()
            .execute(sample_facts())
            .await
            .unwrap();

        assert!((analysis.projections.next_year_arr_crore - 3.75).abs() < 1e-9);
        assert!((analysis.projections.three_year_arr_crore - 8.0).abs() < 1e-9);
        assert!((analysis.current.annualized_mrr_crore - 2.4).abs() < 1e-9);
        let per_employee = analysis.unit_metrics.arr_per_employee_lakh.unwrap();
        assert!((per_employee - 250.0 / 12.0).abs() < 1e-9);
        assert!((analysis.unit_metrics.valuation_multiple.unwrap() - 10.0).abs() < 1e-9);
        assert!((analysis.financial_health.score - 74.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_divisors_yield_none() {
        let facts = ExtractedFacts::new("Empty");
        let analysis = FinancialAnalysisStage::new().analyze(&facts);
        assert!(analysis.unit_metrics.arr_per_employee_lakh.is_none());
        assert!(analysis.unit_metrics.valuation_multiple.is_none());
        assert!(analysis.projections.next_year_arr_crore.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_negative_arr_fails_as_financial_error() {
        let mut facts = sample_facts();
        facts.arr_crore = -1.0;
        let err = FinancialAnalysisStage::new()
            .execute(facts)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StageError::financial("arr_crore must not be negative")
        );
    }
}
