//! Risk penalty rules.

use super::rules::StageBucket;
use super::sectors::{contains_any, HIGH_RISK_KEYWORDS};
use crate::model::{ExtractedFacts, RiskAssessment, RiskCategory, RiskLevel};
use std::collections::BTreeMap;

impl RiskCategory {
    /// Largest penalty the category can contribute.
    #[must_use]
    pub const fn max_penalty(self) -> f64 {
        match self {
            Self::Financial => 30.0,
            Self::Team | Self::Stage => 25.0,
            Self::Market => 20.0,
        }
    }
}

/// Level of a category penalty relative to its maximum.
#[must_use]
pub fn category_level(category: RiskCategory, penalty: f64) -> RiskLevel {
    let fraction = penalty / category.max_penalty();
    if fraction >= 0.6 {
        RiskLevel::High
    } else if fraction >= 0.3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Level of an overall risk score.
#[must_use]
pub fn overall_level(score: f64) -> RiskLevel {
    if score >= 60.0 {
        RiskLevel::High
    } else if score >= 30.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

struct Penalty {
    points: f64,
    factor: &'static str,
    mitigations: &'static [&'static str],
}

fn financial(facts: &ExtractedFacts) -> Option<Penalty> {
    let arr = facts.arr_crore;
    if arr <= 0.0 {
        Some(Penalty {
            points: 30.0,
            factor: "No revenue yet",
            mitigations: &["Validate willingness to pay with paid pilots"],
        })
    } else if arr < 1.0 {
        Some(Penalty {
            points: 20.0,
            factor: "Very low revenue",
            mitigations: &["Track ARR growth monthly", "Diversify customer base"],
        })
    } else if arr < 5.0 {
        Some(Penalty {
            points: 10.0,
            factor: "Low revenue",
            mitigations: &["Track ARR growth monthly"],
        })
    } else {
        None
    }
}

fn team(facts: &ExtractedFacts) -> Option<Penalty> {
    let size = facts.team_size;
    if size < 3 {
        Some(Penalty {
            points: 25.0,
            factor: "Very small team",
            mitigations: &["Hire key personnel", "Document processes"],
        })
    } else if size < 5 {
        Some(Penalty {
            points: 15.0,
            factor: "Small team",
            mitigations: &["Hire key personnel"],
        })
    } else if size < 10 {
        Some(Penalty {
            points: 10.0,
            factor: "Moderate team size",
            mitigations: &["Plan senior hires for the next round"],
        })
    } else {
        None
    }
}

fn market(facts: &ExtractedFacts) -> Option<Penalty> {
    let sector = facts.sector_key();
    if sector.is_empty() || sector == "unknown" {
        Some(Penalty {
            points: 20.0,
            factor: "Unclear market focus",
            mitigations: &["Define the target segment"],
        })
    } else if contains_any(&sector, &HIGH_RISK_KEYWORDS) {
        Some(Penalty {
            points: 15.0,
            factor: "High-risk sector",
            mitigations: &["Monitor regulatory changes"],
        })
    } else {
        None
    }
}

fn stage(facts: &ExtractedFacts) -> Option<Penalty> {
    match StageBucket::classify_for_risk(&facts.stage_key()) {
        StageBucket::VeryEarly => Some(Penalty {
            points: 25.0,
            factor: "Very early stage",
            mitigations: &["Tranche funding against milestones"],
        }),
        StageBucket::Early => Some(Penalty {
            points: 15.0,
            factor: "Early stage",
            mitigations: &["Set milestones for the next round"],
        }),
        StageBucket::Advanced => Some(Penalty {
            points: 5.0,
            factor: "Proven stage",
            mitigations: &["Review burn rate against runway"],
        }),
        StageBucket::Other => None,
    }
}

/// Evaluates every risk category. All four categories are always present.
pub(crate) fn assess(facts: &ExtractedFacts) -> BTreeMap<RiskCategory, RiskAssessment> {
    RiskCategory::ALL
        .into_iter()
        .map(|category| {
            let penalty = match category {
                RiskCategory::Financial => financial(facts),
                RiskCategory::Team => team(facts),
                RiskCategory::Market => market(facts),
                RiskCategory::Stage => stage(facts),
            };
            let assessment = match penalty {
                Some(p) => RiskAssessment {
                    score: p.points,
                    level: category_level(category, p.points),
                    factors: vec![p.factor.to_string()],
                    mitigations: p.mitigations.iter().map(ToString::to_string).collect(),
                },
                None => RiskAssessment {
                    score: 0.0,
                    level: RiskLevel::Low,
                    factors: Vec::new(),
                    mitigations: Vec::new(),
                },
            };
            (category, assessment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_level_thresholds() {
        assert_eq!(category_level(RiskCategory::Financial, 30.0), RiskLevel::High);
        assert_eq!(category_level(RiskCategory::Financial, 10.0), RiskLevel::Medium);
        assert_eq!(category_level(RiskCategory::Stage, 5.0), RiskLevel::Low);
        assert_eq!(category_level(RiskCategory::Team, 15.0), RiskLevel::High);
        assert_eq!(category_level(RiskCategory::Market, 0.0), RiskLevel::Low);
    }

    #[test]
    fn test_overall_level_thresholds() {
        assert_eq!(overall_level(15.0), RiskLevel::Low);
        assert_eq!(overall_level(30.0), RiskLevel::Medium);
        assert_eq!(overall_level(60.0), RiskLevel::High);
    }

    #[test]
    fn test_assess_empty_facts() {
        let categories = assess(&ExtractedFacts::default());
        assert_eq!(categories.len(), 4);
        assert!((categories[&RiskCategory::Financial].score - 30.0).abs() < f64::EPSILON);
        assert!((categories[&RiskCategory::Team].score - 25.0).abs() < f64::EPSILON);
        assert!((categories[&RiskCategory::Market].score - 20.0).abs() < f64::EPSILON);
        assert!((categories[&RiskCategory::Stage].score).abs() < f64::EPSILON);
        assert!(categories[&RiskCategory::Stage].factors.is_empty());
    }

    #[test]
    fn test_stage_risk_prefers_earliest_matching_label() {
        let mut facts = ExtractedFacts::new("Acme");
        for label in ["Series A (pre-revenue)", "Seed (idea stage)"] {
            facts.stage = label.into();
            let stage = &assess(&facts)[&RiskCategory::Stage];
            assert!((stage.score - 25.0).abs() < f64::EPSILON, "{label}: {}", stage.score);
            assert_eq!(stage.factors, vec!["Very early stage".to_string()]);
        }

        facts.stage = "Seed to Series A".into();
        assert!((assess(&facts)[&RiskCategory::Stage].score - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_high_risk_sector() {
        let mut facts = ExtractedFacts::new("Acme");
        facts.sector = "Crypto Exchange".into();
        let categories = assess(&facts);
        assert_eq!(
            categories[&RiskCategory::Market].factors,
            vec!["High-risk sector".to_string()]
        );
        assert_eq!(categories[&RiskCategory::Market].level, RiskLevel::High);
    }
}
