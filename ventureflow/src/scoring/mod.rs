//! Deterministic investment scoring.
//!
//! The [`ScoringEngine`] turns [`ExtractedFacts`] into four category scores,
//! a risk score, a weighted overall score, a [`Band`] and a [`Confidence`].
//! It performs no I/O and identical facts always produce identical scores.

mod band;
mod risk;
mod rules;
#[cfg(test)]
mod scoring_tests;
pub mod sectors;

pub use risk::{category_level, overall_level};
pub use sectors::SectorBenchmark;

use crate::model::{
    Band, CategoryScore, Confidence, ExtractedFacts, RiskAssessment, RiskCategory, Scorecard,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Denominator for weights expressed in basis points.
pub const BASIS_POINTS: u32 = 10_000;

/// Category weights in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTable {
    /// Financial health weight.
    pub financial_health: u32,
    /// Team quality weight.
    pub team_quality: u32,
    /// Market opportunity weight.
    pub market_opportunity: u32,
    /// Product traction weight.
    pub product_traction: u32,
    /// Weight applied to `100 - risk`.
    pub risk_inverse: u32,
}

/// The production weights: 25% / 20% / 20% / 20% / 15%.
pub const WEIGHTS: WeightTable = WeightTable {
    financial_health: 2_500,
    team_quality: 2_000,
    market_opportunity: 2_000,
    product_traction: 2_000,
    risk_inverse: 1_500,
};

const _: () = assert!(WEIGHTS.total() == BASIS_POINTS);

impl WeightTable {
    /// Sum of all weights.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.financial_health
            + self.team_quality
            + self.market_opportunity
            + self.product_traction
            + self.risk_inverse
    }

    /// Weighted overall score, clamped to `[0, 100]`.
    #[must_use]
    pub fn overall(
        &self,
        financial: f64,
        team: f64,
        market: f64,
        traction: f64,
        risk: f64,
    ) -> f64 {
        let weighted = f64::from(self.financial_health) * financial
            + f64::from(self.team_quality) * team
            + f64::from(self.market_opportunity) * market
            + f64::from(self.product_traction) * traction
            + f64::from(self.risk_inverse) * (100.0 - risk);
        (weighted / f64::from(BASIS_POINTS)).clamp(0.0, 100.0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        WEIGHTS
    }
}

/// Pure scoring functions over extracted facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine {
    weights: WeightTable,
}

impl ScoringEngine {
    /// Creates an engine with the production weights.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the weights in use.
    #[must_use]
    pub fn weights(&self) -> WeightTable {
        self.weights
    }

    /// Scores revenue, revenue model, valuation and key metrics.
    #[must_use]
    pub fn financial_health(&self, facts: &ExtractedFacts) -> CategoryScore {
        rules::financial_health(facts)
    }

    /// Scores team size, founders and funding stage.
    #[must_use]
    pub fn team_quality(&self, facts: &ExtractedFacts) -> CategoryScore {
        rules::team_quality(facts)
    }

    /// Scores sector, market size and competition.
    #[must_use]
    pub fn market_opportunity(&self, facts: &ExtractedFacts) -> CategoryScore {
        rules::market_opportunity(facts)
    }

    /// Scores customers, revenue traction and product-market fit.
    #[must_use]
    pub fn product_traction(&self, facts: &ExtractedFacts) -> CategoryScore {
        rules::product_traction(facts)
    }

    /// Per-category risk penalties with levels and mitigations.
    #[must_use]
    pub fn assess_risk(&self, facts: &ExtractedFacts) -> BTreeMap<RiskCategory, RiskAssessment> {
        risk::assess(facts)
    }

    /// Overall risk score (higher is riskier) with every fired factor.
    #[must_use]
    pub fn risk(&self, facts: &ExtractedFacts) -> CategoryScore {
        Self::summarize_risk(&self.assess_risk(facts))
    }

    /// Folds a category breakdown into one clamped risk score.
    #[must_use]
    pub fn summarize_risk(categories: &BTreeMap<RiskCategory, RiskAssessment>) -> CategoryScore {
        let score = categories.values().map(|a| a.score).sum::<f64>();
        let factors = categories
            .values()
            .flat_map(|a| a.factors.iter().cloned())
            .collect();
        CategoryScore::new(score.min(100.0), factors)
    }

    /// Weighted overall score.
    #[must_use]
    pub fn overall(
        &self,
        financial: f64,
        team: f64,
        market: f64,
        traction: f64,
        risk: f64,
    ) -> f64 {
        self.weights.overall(financial, team, market, traction, risk)
    }

    /// Scores every category and classifies the result.
    #[must_use]
    pub fn score(&self, facts: &ExtractedFacts) -> Scorecard {
        let financial_health = self.financial_health(facts);
        let team_quality = self.team_quality(facts);
        let market_opportunity = self.market_opportunity(facts);
        let product_traction = self.product_traction(facts);
        let risk = self.risk(facts);

        let overall_score = self.overall(
            financial_health.score,
            team_quality.score,
            market_opportunity.score,
            product_traction.score,
            risk.score,
        );
        let band = Band::from_scores(overall_score, risk.score);
        let confidence = Confidence::from_facts(facts);

        tracing::debug!(
            company = %facts.company_name,
            overall_score,
            risk_score = risk.score,
            band = %band,
            "Scored startup"
        );

        Scorecard {
            financial_health,
            team_quality,
            market_opportunity,
            product_traction,
            risk,
            overall_score,
            band,
            confidence,
        }
    }
}
