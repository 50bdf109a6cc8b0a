//! Sample payloads for a well-documented Series A startup.
//!
//! Each fixture is produced by the real stage logic from [`sample_facts`], so
//! the payloads stay consistent with one another and with the scoring rules.

use crate::model::{
    Document, ExtractedFacts, FinancialAnalysis, KeyMetrics, MarketAnalysis, Recommendation,
    RecommendationInput, RiskInput, RiskProfile,
};
use crate::stages::{
    FinancialAnalysisStage, MarketAnalysisStage, RecommendationStage, RiskAssessmentStage,
};

/// A plain-text pitch summary that the text backend extracts into
/// [`sample_facts`].
pub const SAMPLE_DOCUMENT: &str = "\
Company: Acme Analytics
Sector: AI/ML
ARR: 2.5 crore
Team size: 12
Stage: Series A
Valuation: 25 crore
Revenue model: SaaS subscription
Founders: Asha Rao, Vikram Shah
MRR: 20 lakh
Customers: 150
Churn: 5.2%
";

/// Facts for "Acme Analytics", an AI/ML Series A company.
#[must_use]
pub fn sample_facts() -> ExtractedFacts {
    ExtractedFacts {
        company_name: "Acme Analytics".to_string(),
        sector: "AI/ML".to_string(),
        arr_crore: 2.5,
        team_size: 12,
        stage: "Series A".to_string(),
        valuation_pre_money_crore: 25.0,
        revenue_model: "SaaS subscription".to_string(),
        founders: vec!["Asha Rao".to_string(), "Vikram Shah".to_string()],
        key_metrics: KeyMetrics {
            mrr_lakh: 20.0,
            customer_count: 150,
            churn_rate: 5.2,
        },
        document_quality: None,
        extraction_confidence: None,
    }
}

/// The sample pitch as an uploaded document.
#[must_use]
pub fn sample_document() -> Document {
    Document::new("acme.txt", SAMPLE_DOCUMENT)
}

/// Market analysis of [`sample_facts`].
#[must_use]
pub fn sample_market() -> MarketAnalysis {
    MarketAnalysisStage::new().analyze(&sample_facts())
}

/// Financial analysis of [`sample_facts`].
#[must_use]
pub fn sample_financial() -> FinancialAnalysis {
    FinancialAnalysisStage::new().analyze(&sample_facts())
}

/// Input of the risk stage built from the sample analyses.
#[must_use]
pub fn sample_risk_input() -> RiskInput {
    RiskInput {
        facts: sample_facts(),
        market: sample_market(),
        financial: sample_financial(),
    }
}

/// Risk profile of the sample company.
#[must_use]
pub fn sample_risk() -> RiskProfile {
    RiskAssessmentStage::new().assess(&sample_risk_input())
}

/// Input of the recommendation stage built from every sample payload.
#[must_use]
pub fn sample_recommendation_input() -> RecommendationInput {
    RecommendationInput {
        facts: sample_facts(),
        market: sample_market(),
        financial: sample_financial(),
        risk: sample_risk(),
    }
}

/// Final recommendation for the sample company.
#[must_use]
pub fn sample_recommendation() -> Recommendation {
    RecommendationStage::new().recommend(&sample_recommendation_input())
}
