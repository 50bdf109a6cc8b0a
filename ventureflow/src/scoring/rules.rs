//! Category scoring rules.
//!
//! Each rule group adds points for the first threshold a fact meets and
//! records one factor string per group that fired. Totals are clamped to 100.

use super::sectors::{self, contains_any, STABLE_KEYWORDS, TECH_KEYWORDS};
use crate::model::{CategoryScore, ExtractedFacts};
use crate::utils::group_thousands;

/// Accumulates points and factors for one category.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    score: f64,
    factors: Vec<String>,
}

impl Tally {
    pub(crate) fn add(&mut self, points: f64, factor: impl Into<String>) {
        self.score += points;
        self.factors.push(factor.into());
    }

    pub(crate) fn finish(self) -> CategoryScore {
        CategoryScore::new(self.score.min(100.0), self.factors)
    }
}

/// Stage label buckets shared by the team and risk rules.
///
/// Both classifiers take the lowercased key from [`ExtractedFacts::stage_key`].
/// A label can match more than one bucket, so each rule group keeps its own
/// precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StageBucket {
    Advanced,
    Early,
    VeryEarly,
    Other,
}

impl StageBucket {
    fn is_advanced(key: &str) -> bool {
        key.contains("series a") || key.contains("series b")
    }

    fn is_early(key: &str) -> bool {
        key.contains("seed")
    }

    fn is_very_early(key: &str) -> bool {
        key.contains("pre-revenue") || key.contains("idea")
    }

    /// Team precedence: the most advanced matching bucket wins.
    pub(crate) fn classify(key: &str) -> Self {
        if Self::is_advanced(key) {
            Self::Advanced
        } else if Self::is_early(key) {
            Self::Early
        } else if Self::is_very_early(key) {
            Self::VeryEarly
        } else {
            Self::Other
        }
    }

    /// Risk precedence: the earliest matching bucket wins.
    pub(crate) fn classify_for_risk(key: &str) -> Self {
        if Self::is_very_early(key) {
            Self::VeryEarly
        } else if Self::is_early(key) {
            Self::Early
        } else if Self::is_advanced(key) {
            Self::Advanced
        } else {
            Self::Other
        }
    }
}

pub(crate) fn financial_health(facts: &ExtractedFacts) -> CategoryScore {
    let mut tally = Tally::default();

    let arr = facts.arr_crore;
    if arr >= 10.0 {
        tally.add(30.0, format!("Strong ARR: ₹{arr:.1} crores"));
    } else if arr >= 5.0 {
        tally.add(25.0, format!("Good ARR: ₹{arr:.1} crores"));
    } else if arr >= 1.0 {
        tally.add(20.0, format!("Moderate ARR: ₹{arr:.1} crores"));
    } else if arr > 0.0 {
        tally.add(10.0, format!("Early stage ARR: ₹{arr:.1} crores"));
    }

    let model = facts.revenue_model.to_lowercase();
    if model.contains("saas") || model.contains("subscription") {
        tally.add(25.0, "Recurring revenue model");
    } else if model.contains("marketplace") || model.contains("commission") {
        tally.add(20.0, "Marketplace/commission model");
    } else if model.contains("one-time") || model.contains("license") {
        tally.add(15.0, "One-time/license model");
    } else {
        tally.add(10.0, "Other revenue model");
    }

    let valuation = facts.valuation_pre_money_crore;
    if valuation >= 100.0 {
        tally.add(25.0, format!("High valuation: ₹{valuation:.1} crores"));
    } else if valuation >= 50.0 {
        tally.add(20.0, format!("Good valuation: ₹{valuation:.1} crores"));
    } else if valuation >= 20.0 {
        tally.add(15.0, format!("Moderate valuation: ₹{valuation:.1} crores"));
    } else if valuation > 0.0 {
        tally.add(10.0, format!("Early stage valuation: ₹{valuation:.1} crores"));
    }

    let metrics = &facts.key_metrics;
    let mrr = metrics.mrr_lakh;
    if mrr >= 50.0 {
        tally.add(10.0, format!("Strong MRR: ₹{mrr:.1} lakhs"));
    } else if mrr >= 20.0 {
        tally.add(8.0, format!("Good MRR: ₹{mrr:.1} lakhs"));
    } else if mrr > 0.0 {
        tally.add(5.0, format!("Early MRR: ₹{mrr:.1} lakhs"));
    }

    let churn = metrics.churn_rate;
    if churn > 0.0 {
        if churn <= 5.0 {
            tally.add(5.0, format!("Low churn: {churn:.1}%"));
        } else if churn <= 10.0 {
            tally.add(3.0, format!("Moderate churn: {churn:.1}%"));
        } else {
            tally.add(1.0, format!("High churn: {churn:.1}%"));
        }
    }

    let customers = metrics.customer_count;
    if customers >= 1000 {
        tally.add(5.0, format!("Large customer base: {}", group_thousands(customers)));
    } else if customers >= 100 {
        tally.add(3.0, format!("Good customer base: {}", group_thousands(customers)));
    } else if customers > 0 {
        tally.add(1.0, format!("Small customer base: {}", group_thousands(customers)));
    }

    tally.finish()
}

pub(crate) fn team_quality(facts: &ExtractedFacts) -> CategoryScore {
    let mut tally = Tally::default();

    let team = facts.team_size;
    if team >= 20 {
        tally.add(30.0, format!("Large team: {team} members"));
    } else if team >= 10 {
        tally.add(25.0, format!("Good team size: {team} members"));
    } else if team >= 5 {
        tally.add(20.0, format!("Moderate team: {team} members"));
    } else if team > 0 {
        tally.add(15.0, format!("Small team: {team} members"));
    }

    match facts.founders.len() {
        0 => tally.add(10.0, "Founder information not available"),
        1 => tally.add(25.0, "Solo founder: 1 person"),
        2 => tally.add(35.0, "Co-founder team: 2 people"),
        n => tally.add(40.0, format!("Multiple founders: {n} people")),
    }

    let stage = facts.stage.trim();
    match StageBucket::classify(&facts.stage_key()) {
        StageBucket::Advanced => tally.add(30.0, format!("Advanced stage: {stage}")),
        StageBucket::Early => tally.add(25.0, format!("Early stage: {stage}")),
        StageBucket::VeryEarly => tally.add(15.0, format!("Very early stage: {stage}")),
        StageBucket::Other => tally.add(20.0, format!("Stage: {stage}")),
    }

    tally.finish()
}

pub(crate) fn market_opportunity(facts: &ExtractedFacts) -> CategoryScore {
    let mut tally = Tally::default();
    let sector = facts.sector_key();
    let benchmark = sectors::lookup(&sector);

    match benchmark {
        Some(benchmark) => tally.add(40.0, format!("High-growth sector: {}", benchmark.name)),
        None if contains_any(&sector, &TECH_KEYWORDS) => {
            tally.add(35.0, format!("Tech sector: {}", facts.sector.trim()));
        }
        None if contains_any(&sector, &STABLE_KEYWORDS) => {
            tally.add(30.0, format!("Stable sector: {}", facts.sector.trim()));
        }
        None => tally.add(20.0, format!("Other sector: {}", facts.sector.trim())),
    }

    match benchmark.map(|b| b.market_size_usd) {
        Some(size) if size >= 5_000_000_000 => tally.add(30.0, "Large market opportunity"),
        Some(size) if size >= 1_000_000_000 => tally.add(25.0, "Good market opportunity"),
        Some(_) => tally.add(20.0, "Moderate market opportunity"),
        None => tally.add(15.0, "Market size unknown"),
    }

    match benchmark.map(|b| b.competition_index) {
        Some(index) if index <= 0.5 => tally.add(30.0, "Low competition market"),
        Some(index) if index <= 0.7 => tally.add(25.0, "Moderate competition"),
        Some(_) => tally.add(20.0, "High competition market"),
        None => tally.add(20.0, "Competition level unknown"),
    }

    tally.finish()
}

pub(crate) fn product_traction(facts: &ExtractedFacts) -> CategoryScore {
    let mut tally = Tally::default();

    let customers = facts.key_metrics.customer_count;
    let shown = group_thousands(customers);
    if customers >= 10_000 {
        tally.add(40.0, format!("High customer traction: {shown}"));
    } else if customers >= 1000 {
        tally.add(35.0, format!("Good customer traction: {shown}"));
    } else if customers >= 100 {
        tally.add(30.0, format!("Moderate customer traction: {shown}"));
    } else if customers > 0 {
        tally.add(20.0, format!("Early customer traction: {shown}"));
    } else {
        tally.add(10.0, "Customer data not available");
    }

    let arr = facts.arr_crore;
    if arr >= 5.0 {
        tally.add(35.0, "Strong revenue traction");
    } else if arr >= 1.0 {
        tally.add(30.0, "Good revenue traction");
    } else if arr > 0.0 {
        tally.add(25.0, "Early revenue traction");
    } else {
        tally.add(15.0, "Revenue data not available");
    }

    let churn = facts.key_metrics.churn_rate;
    if churn <= 0.0 {
        tally.add(15.0, "PMF data not available");
    } else if churn <= 5.0 {
        tally.add(25.0, "Strong product-market fit");
    } else if churn <= 10.0 {
        tally.add(20.0, "Good product-market fit");
    } else {
        tally.add(15.0, "Developing product-market fit");
    }

    tally.finish()
}
