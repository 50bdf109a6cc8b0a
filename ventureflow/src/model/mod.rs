//! Domain payloads exchanged between stages.

mod analysis;
mod document;
mod facts;
mod recommendation;
mod risk;
mod score;

pub use analysis::{
    CompetitionIntensity, CurrentFinancials, FinancialAnalysis, FinancialProjections,
    MarketAnalysis, MarketMaturity, SectorProfile, UnitMetrics,
};
pub use document::Document;
pub use facts::{ExtractedFacts, InvalidFactError, KeyMetrics, COMPLETENESS_FIELDS};
pub use recommendation::{Recommendation, ScoreBreakdown};
pub use risk::{RiskAssessment, RiskCategory, RiskLevel, RiskProfile};
pub use score::{Band, CategoryScore, Confidence, Scorecard};

/// Input of the risk assessment stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskInput {
    /// Extracted facts.
    pub facts: ExtractedFacts,
    /// Market analysis output.
    pub market: MarketAnalysis,
    /// Financial analysis output.
    pub financial: FinancialAnalysis,
}

/// Input of the recommendation stage.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationInput {
    /// Extracted facts.
    pub facts: ExtractedFacts,
    /// Market analysis output.
    pub market: MarketAnalysis,
    /// Financial analysis output.
    pub financial: FinancialAnalysis,
    /// Risk profile.
    pub risk: RiskProfile,
}
