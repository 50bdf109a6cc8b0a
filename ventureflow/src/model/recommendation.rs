//! The final recommendation payload.

use super::score::{Band, Confidence, Scorecard};
use crate::scoring::WeightTable;
use serde::{Deserialize, Serialize};

/// The three inputs the recommendation was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Financial-health score.
    pub financial_score: f64,
    /// Market-opportunity score.
    pub market_score: f64,
    /// Overall risk score.
    pub risk_score: f64,
}

/// Output of the recommendation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Investment band.
    pub band: Band,
    /// Data-completeness confidence.
    pub confidence: Confidence,
    /// Weighted overall score.
    pub overall_score: f64,
    /// Scores the band was derived from.
    pub breakdown: ScoreBreakdown,
    /// Every category score with its factors.
    pub scorecard: Scorecard,
    /// Category weights used for the overall score.
    pub weights: WeightTable,
    /// Short reasons supporting the band.
    pub rationale: Vec<String>,
}
