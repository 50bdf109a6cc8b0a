//! Facts extracted from a startup document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fields that count toward extraction completeness.
pub const COMPLETENESS_FIELDS: usize = 8;

/// Operating metrics reported alongside the headline figures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyMetrics {
    /// Monthly recurring revenue in lakh.
    pub mrr_lakh: f64,
    /// Number of paying customers.
    pub customer_count: u64,
    /// Monthly churn rate as a percentage.
    pub churn_rate: f64,
}

/// Structured facts about one startup.
///
/// Produced once by the extraction stage and then only ever cloned; no
/// downstream stage mutates it. Monetary figures use the Indian units the
/// source documents report (crore for annual amounts, lakh for monthly).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFacts {
    /// Company name.
    pub company_name: String,
    /// Business sector (e.g. "AI/ML", "FinTech").
    pub sector: String,
    /// Annual recurring revenue in crore.
    #[serde(alias = "arr")]
    pub arr_crore: f64,
    /// Headcount.
    pub team_size: u32,
    /// Funding stage label (e.g. "Seed", "Series A").
    pub stage: String,
    /// Pre-money valuation in crore.
    #[serde(alias = "valuation_crore")]
    pub valuation_pre_money_crore: f64,
    /// Revenue model label (e.g. "SaaS", "Marketplace").
    pub revenue_model: String,
    /// Founder names.
    pub founders: Vec<String>,
    /// Secondary operating metrics.
    pub key_metrics: KeyMetrics,
    /// Quality label reported by the document backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_quality: Option<String>,
    /// Backend confidence in the extraction, between 0 and 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_confidence: Option<f64>,
}

/// A numeric fact that cannot be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct InvalidFactError {
    /// The offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub reason: &'static str,
}

impl ExtractedFacts {
    /// Creates facts for a named company with every other field empty.
    #[must_use]
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Self::default()
        }
    }

    /// Checks that every numeric figure is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns the first field that is negative, NaN or infinite, or a churn
    /// rate above 100%.
    pub fn validate(&self) -> Result<(), InvalidFactError> {
        let figures = [
            ("arr_crore", self.arr_crore),
            ("valuation_pre_money_crore", self.valuation_pre_money_crore),
            ("key_metrics.mrr_lakh", self.key_metrics.mrr_lakh),
            ("key_metrics.churn_rate", self.key_metrics.churn_rate),
        ];
        for (field, value) in figures {
            if !value.is_finite() {
                return Err(InvalidFactError {
                    field,
                    reason: "must be a finite number",
                });
            }
            if value < 0.0 {
                return Err(InvalidFactError {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        if self.key_metrics.churn_rate > 100.0 {
            return Err(InvalidFactError {
                field: "key_metrics.churn_rate",
                reason: "must not exceed 100%",
            });
        }
        if let Some(confidence) = self.extraction_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(InvalidFactError {
                    field: "extraction_confidence",
                    reason: "must be between 0 and 1",
                });
            }
        }
        Ok(())
    }

    /// Counts how many of the [`COMPLETENESS_FIELDS`] designated fields are present.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        [
            !self.company_name.trim().is_empty(),
            !self.sector.trim().is_empty(),
            self.arr_crore > 0.0,
            self.team_size > 0,
            !self.stage.trim().is_empty(),
            self.valuation_pre_money_crore > 0.0,
            !self.revenue_model.trim().is_empty(),
            !self.founders.is_empty(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Lowercased sector label.
    #[must_use]
    pub fn sector_key(&self) -> String {
        self.sector.trim().to_lowercase()
    }

    /// Lowercased funding stage label.
    #[must_use]
    pub fn stage_key(&self) -> String {
        self.stage.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let facts: ExtractedFacts =
            serde_json::from_str(r#"{"company_name": "Acme", "arr": 1.5}"#).unwrap();
        assert_eq!(facts.company_name, "Acme");
        assert!((facts.arr_crore - 1.5).abs() < f64::EPSILON);
        assert_eq!(facts.team_size, 0);
        assert!(facts.founders.is_empty());
    }

    #[test]
    fn test_populated_fields_counts_designated_fields() {
        let mut facts = ExtractedFacts::new("Acme");
        assert_eq!(facts.populated_fields(), 1);

        facts.sector = "SaaS".into();
        facts.arr_crore = 2.0;
        facts.team_size = 4;
        facts.stage = "Seed".into();
        facts.valuation_pre_money_crore = 10.0;
        facts.revenue_model = "Subscription".into();
        facts.founders = vec!["A".into()];
        assert_eq!(facts.populated_fields(), COMPLETENESS_FIELDS);

        // Key metrics do not count toward completeness.
        facts.key_metrics.mrr_lakh = 5.0;
        assert_eq!(facts.populated_fields(), COMPLETENESS_FIELDS);
    }

    #[test]
    fn test_blank_strings_do_not_count() {
        let mut facts = ExtractedFacts::new("   ");
        facts.sector = "\t".into();
        assert_eq!(facts.populated_fields(), 0);
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let mut facts = ExtractedFacts::new("Acme");
        assert!(facts.validate().is_ok());

        facts.arr_crore = -1.0;
        assert_eq!(facts.validate().unwrap_err().field, "arr_crore");

        facts.arr_crore = f64::NAN;
        assert_eq!(
            facts.validate().unwrap_err().reason,
            "must be a finite number"
        );
    }

    #[test]
    fn test_validate_rejects_churn_above_hundred() {
        let mut facts = ExtractedFacts::new("Acme");
        facts.key_metrics.churn_rate = 120.0;
        assert_eq!(
            facts.validate().unwrap_err().field,
            "key_metrics.churn_rate"
        );
    }
}
