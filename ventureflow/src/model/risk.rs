//! Risk profile payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Coarse risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// The four penalty categories of the risk rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Revenue-related risk.
    Financial,
    /// Team-size risk.
    Team,
    /// Sector risk.
    Market,
    /// Funding-stage risk.
    Stage,
}

impl RiskCategory {
    /// All categories in rule order.
    pub const ALL: [Self; 4] = [Self::Financial, Self::Team, Self::Market, Self::Stage];
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Financial => write!(f, "financial"),
            Self::Team => write!(f, "team"),
            Self::Market => write!(f, "market"),
            Self::Stage => write!(f, "stage"),
        }
    }
}

/// Penalty breakdown for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Penalty points contributed to the overall score.
    pub score: f64,
    /// Level relative to the category's maximum penalty.
    pub level: RiskLevel,
    /// Rules that fired.
    pub factors: Vec<String>,
    /// Suggested mitigations for the fired rules.
    pub mitigations: Vec<String>,
}

/// Output of the risk assessment stage. Higher scores are riskier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Overall risk score in `[0, 100]`.
    pub overall_score: f64,
    /// Overall level.
    pub risk_level: RiskLevel,
    /// Per-category breakdown.
    pub categories: BTreeMap<RiskCategory, RiskAssessment>,
    /// Deal-level warnings.
    pub red_flags: Vec<String>,
}

impl RiskProfile {
    /// Returns every fired factor across all categories, in category order.
    #[must_use]
    pub fn all_factors(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|assessment| assessment.factors.iter().map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_serialize_as_names() {
        let mut categories = BTreeMap::new();
        categories.insert(
            RiskCategory::Team,
            RiskAssessment {
                score: 25.0,
                level: RiskLevel::High,
                factors: vec!["Very small team".into()],
                mitigations: vec![],
            },
        );
        let profile = RiskProfile {
            overall_score: 25.0,
            risk_level: RiskLevel::Low,
            categories,
            red_flags: vec![],
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["categories"]["team"]["level"], "High");
        assert_eq!(json["risk_level"], "Low");
        assert_eq!(profile.all_factors(), vec!["Very small team"]);
    }
}
