//! Score types shared by the scoring engine and the stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 0–100 score with the human-readable factors that produced it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Contributing factors in rule order.
    #[serde(default)]
    pub factors: Vec<String>,
}

impl CategoryScore {
    /// Creates a score, clamping it into `[0, 100]`.
    #[must_use]
    pub fn new(score: f64, factors: Vec<String>) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            factors,
        }
    }
}

/// Discrete investment recommendation, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Band {
    /// Overall ≥ 80 with risk ≤ 20.
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    /// Overall ≥ 70 with risk ≤ 30.
    #[serde(rename = "Buy")]
    Buy,
    /// Overall ≥ 60 with risk ≤ 40.
    #[serde(rename = "Hold")]
    Hold,
    /// Overall ≥ 50.
    #[serde(rename = "Weak Hold")]
    WeakHold,
    /// Everything else.
    #[serde(rename = "Sell")]
    Sell,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "Strong Buy"),
            Self::Buy => write!(f, "Buy"),
            Self::Hold => write!(f, "Hold"),
            Self::WeakHold => write!(f, "Weak Hold"),
            Self::Sell => write!(f, "Sell"),
        }
    }
}

/// How much of the designated input data was available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    /// At least 80% of designated fields present.
    High,
    /// At least 60%.
    Medium,
    /// Less than 60%.
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "High"),
            Self::Medium => write!(f, "Medium"),
            Self::Low => write!(f, "Low"),
        }
    }
}

/// Every score the engine produces for one set of facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Financial health.
    pub financial_health: CategoryScore,
    /// Team quality.
    pub team_quality: CategoryScore,
    /// Market opportunity.
    pub market_opportunity: CategoryScore,
    /// Product traction.
    pub product_traction: CategoryScore,
    /// Risk (higher is worse).
    pub risk: CategoryScore,
    /// Weighted overall score in `[0, 100]`.
    pub overall_score: f64,
    /// Recommendation band.
    pub band: Band,
    /// Data-completeness confidence.
    pub confidence: Confidence,
}
