//! Plain-text and JSON document backend.

use super::DocumentIntelligence;
use crate::errors::CollaboratorError;
use crate::model::ExtractedFacts;
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

/// Number of fields the text parser can recognise.
const RECOGNISED_FIELDS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Company,
    Sector,
    Arr,
    TeamSize,
    Stage,
    Valuation,
    RevenueModel,
    Founders,
    Mrr,
    Customers,
    Churn,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        let field = match key {
            "company" | "company name" | "name" | "startup" | "startup name" => Self::Company,
            "sector" | "industry" | "domain" => Self::Sector,
            "arr" | "annual recurring revenue" => Self::Arr,
            "team size" | "team" | "employees" | "headcount" => Self::TeamSize,
            "stage" | "funding stage" | "round" => Self::Stage,
            "valuation" | "pre-money valuation" | "pre money valuation" => Self::Valuation,
            "revenue model" | "business model" => Self::RevenueModel,
            "founders" | "founder" | "co-founders" | "cofounders" => Self::Founders,
            "mrr" | "monthly recurring revenue" => Self::Mrr,
            "customers" | "customer count" | "clients" => Self::Customers,
            "churn" | "churn rate" | "monthly churn" => Self::Churn,
            _ => return None,
        };
        Some(field)
    }
}

/// Document backend for JSON fact sheets and `Key: value` text.
///
/// A document whose first non-blank character is `{` is parsed as
/// [`ExtractedFacts`] JSON. Anything else is decoded as lossy UTF-8 and
/// scanned line by line. Annual figures are read in crore and monthly ones in
/// lakh; a value that names the other unit is converted.
#[derive(Debug, Clone)]
pub struct TextDocumentIntelligence {
    line: Regex,
    parenthetical: Regex,
    number: Regex,
    list_separator: Regex,
}

impl TextDocumentIntelligence {
    /// Creates the backend.
    pub fn new() -> Result<Self, CollaboratorError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| CollaboratorError::Unavailable(e.to_string()))
        };
        Ok(Self {
            line: compile(r"^\s*(?:[-*•]\s*)?([A-Za-z][A-Za-z0-9 /()&.'-]*?)\s*[:=]\s*(.+?)\s*$")?,
            parenthetical: compile(r"\([^)]*\)")?,
            number: compile(r"\d[\d,]*(?:\.\d+)?")?,
            list_separator: compile(r"\s*(?:,|;|&|\band\b)\s*")?,
        })
    }

    fn normalize_key(&self, raw: &str) -> String {
        let stripped = self.parenthetical.replace_all(raw, " ");
        stripped
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    fn parse_number(&self, value: &str) -> Option<f64> {
        let found = self.number.find(value)?;
        found.as_str().replace(',', "").parse().ok()
    }

    fn parse_text(&self, text: &str) -> (ExtractedFacts, usize) {
        let mut facts = ExtractedFacts::default();
        let mut seen: Vec<Field> = Vec::new();

        for line in text.lines() {
            let Some(caps) = self.line.captures(line) else {
                continue;
            };
            let key = self.normalize_key(&caps[1]);
            let Some(field) = Field::from_key(&key) else {
                continue;
            };
            if seen.contains(&field) {
                continue;
            }
            let value = caps[2].trim();
            let lower = value.to_lowercase();
            let number = self.parse_number(value);
            let to_crore = |n: f64| if lower.contains("lakh") { n / 100.0 } else { n };
            let to_lakh = |n: f64| if lower.contains("crore") { n * 100.0 } else { n };
            let applied = match field {
                Field::Company => set_text(&mut facts.company_name, value),
                Field::Sector => set_text(&mut facts.sector, value),
                Field::Stage => set_text(&mut facts.stage, value),
                Field::RevenueModel => set_text(&mut facts.revenue_model, value),
                Field::Founders => {
                    facts.founders = self
                        .list_separator
                        .split(value)
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(ToString::to_string)
                        .collect();
                    !facts.founders.is_empty()
                }
                Field::Arr => set_number(&mut facts.arr_crore, number.map(to_crore)),
                Field::Valuation => {
                    set_number(&mut facts.valuation_pre_money_crore, number.map(to_crore))
                }
                Field::Mrr => set_number(&mut facts.key_metrics.mrr_lakh, number.map(to_lakh)),
                Field::TeamSize => set_number(
                    &mut facts.team_size,
                    number.map(|n| to_count(n).try_into().unwrap_or(u32::MAX)),
                ),
                Field::Customers => {
                    set_number(&mut facts.key_metrics.customer_count, number.map(to_count))
                }
                Field::Churn => set_number(&mut facts.key_metrics.churn_rate, number),
            };
            if applied {
                seen.push(field);
            }
        }

        (facts, seen.len())
    }
}

fn set_text(slot: &mut String, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    *slot = value.to_string();
    true
}

fn set_number<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> u64 {
    value.round().max(0.0) as u64
}

#[async_trait]
impl DocumentIntelligence for TextDocumentIntelligence {
    async fn extract(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ExtractedFacts, CollaboratorError> {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Err(CollaboratorError::InvalidDocument(format!(
                "'{filename}' contains no text"
            )));
        }

        if trimmed.starts_with('{') {
            let mut facts: ExtractedFacts = serde_json::from_str(trimmed).map_err(|e| {
                CollaboratorError::InvalidDocument(format!("'{filename}' is not a valid fact sheet: {e}"))
            })?;
            facts.document_quality.get_or_insert_with(|| "structured".to_string());
            facts.extraction_confidence.get_or_insert(1.0);
            debug!(filename, "Parsed structured fact sheet");
            return Ok(facts);
        }

        let (mut facts, recognised) = self.parse_text(&text);
        if recognised == 0 {
            return Err(CollaboratorError::InvalidDocument(format!(
                "no recognised fields in '{filename}'"
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let confidence = recognised as f64 / RECOGNISED_FIELDS as f64;
        facts.document_quality = Some("text".to_string());
        facts.extraction_confidence = Some(confidence);
        debug!(filename, recognised, "Parsed key-value document");
        Ok(facts)
    }
}
