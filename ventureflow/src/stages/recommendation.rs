//! Recommendation stage.

use super::StageExecutor;
use crate::core::StageName;
use crate::errors::StageError;
use crate::model::{
    Band, CategoryScore, Confidence, Recommendation, RecommendationInput, ScoreBreakdown,
    Scorecard,
};
use crate::scoring::ScoringEngine;
use async_trait::async_trait;
use tracing::info;

const STRONG_SCORE: f64 = 75.0;
const WEAK_SCORE: f64 = 40.0;

/// Combines every prior output into the final banded recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationStage {
    engine: ScoringEngine,
}

impl RecommendationStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the recommendation without input validation.
    ///
    /// Financial, market and risk scores come from the upstream stages; team
    /// quality and product traction are scored here from the facts.
    #[must_use]
    pub fn recommend(&self, input: &RecommendationInput) -> Recommendation {
        let facts = &input.facts;
        let financial_health = input.financial.financial_health.clone();
        let market_opportunity = input.market.market_opportunity.clone();
        let risk = CategoryScore::new(
            input.risk.overall_score,
            input
                .risk
                .all_factors()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        );
        let team_quality = self.engine.team_quality(facts);
        let product_traction = self.engine.product_traction(facts);

        let overall_score = self.engine.overall(
            financial_health.score,
            team_quality.score,
            market_opportunity.score,
            product_traction.score,
            risk.score,
        );
        let scorecard = Scorecard {
            band: Band::from_scores(overall_score, risk.score),
            confidence: Confidence::from_facts(facts),
            overall_score,
            financial_health,
            team_quality,
            market_opportunity,
            product_traction,
            risk,
        };

        Recommendation {
            band: scorecard.band,
            confidence: scorecard.confidence,
            overall_score,
            breakdown: ScoreBreakdown {
                financial_score: scorecard.financial_health.score,
                market_score: scorecard.market_opportunity.score,
                risk_score: scorecard.risk.score,
            },
            rationale: rationale(&scorecard, input.risk.red_flags.len()),
            weights: self.engine.weights(),
            scorecard,
        }
    }
}

fn rationale(scorecard: &Scorecard, red_flags: usize) -> Vec<String> {
    let categories = [
        ("financial health", &scorecard.financial_health),
        ("team", &scorecard.team_quality),
        ("market opportunity", &scorecard.market_opportunity),
        ("product traction", &scorecard.product_traction),
    ];

    let mut lines = Vec::new();
    for (label, category) in categories {
        if category.score >= STRONG_SCORE {
            lines.push(format!("Strong {label} ({:.0}/100)", category.score));
        } else if category.score <= WEAK_SCORE {
            lines.push(format!("Weak {label} ({:.0}/100)", category.score));
        }
    }

    let risk = scorecard.risk.score;
    if risk <= 20.0 {
        lines.push(format!("Low risk profile ({risk:.0}/100)"));
    } else if risk >= 60.0 {
        lines.push(format!("High risk profile ({risk:.0}/100)"));
    }
    match red_flags {
        0 => {}
        1 => lines.push("1 red flag raised".to_string()),
        n => lines.push(format!("{n} red flags raised")),
    }
    lines
}

#[async_trait]
impl StageExecutor for RecommendationStage {
    type Input = RecommendationInput;
    type Output = Recommendation;

    fn name(&self) -> StageName {
        StageName::Recommendation
    }

    async fn execute(&self, input: RecommendationInput) -> Result<Recommendation, StageError> {
        let upstream = [
            ("financial health", input.financial.financial_health.score),
            ("market opportunity", input.market.market_opportunity.score),
            ("risk", input.risk.overall_score),
        ];
        for (label, score) in upstream {
            if !(0.0..=100.0).contains(&score) {
                return Err(StageError::recommendation(format!(
                    "{label} score {score} is outside 0-100"
                )));
            }
        }

        let recommendation = self.recommend(&input);
        info!(
            company = %input.facts.company_name,
            band = %recommendation.band,
            confidence = %recommendation.confidence,
            overall_score = recommendation.overall_score,
            "Recommendation ready"
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_facts, sample_financial, sample_market, sample_risk};
    use pretty_assertions::assert_eq;

    fn sample_input() -> RecommendationInput {
        RecommendationInput {
            facts: sample_facts(),
            market: sample_market(),
            financial: sample_financial(),
            risk: sample_risk(),
        }
    }

    #[tokio::test]
    async fn test_sample_recommendation() {
        let rec = RecommendationStage::new()
            .execute(sample_input())
            .await
            .unwrap();

        assert_eq!(rec.band, Band::StrongBuy);
        assert_eq!(rec.confidence, Confidence::High);
        assert!((rec.overall_score - 83.25).abs() < 1e-9);
        assert!((rec.breakdown.financial_score - 74.0).abs() < f64::EPSILON);
        assert!((rec.breakdown.market_score - 90.0).abs() < f64::EPSILON);
        assert!((rec.breakdown.risk_score - 15.0).abs() < f64::EPSILON);
        assert_eq!(
            rec.rationale,
            vec![
                "Strong team (90/100)".to_string(),
                "Strong market opportunity (90/100)".to_string(),
                "Strong product traction (80/100)".to_string(),
                "Low risk profile (15/100)".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_matches_direct_scoring() {
        let rec = RecommendationStage::new()
            .execute(sample_input())
            .await
            .unwrap();
        let direct = ScoringEngine::new().score(&sample_facts());
        assert_eq!(rec.scorecard, direct);
    }

    #[tokio::test]
    async fn test_out_of_range_upstream_score_fails() {
        let mut input = sample_input();
        input.risk.overall_score = 140.0;
        let err = RecommendationStage::new()
            .execute(input)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), StageName::Recommendation);
        assert_eq!(err.message(), "risk score 140 is outside 0-100");
    }
}
