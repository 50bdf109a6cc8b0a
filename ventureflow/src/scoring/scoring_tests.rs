//! Cross-category tests for the scoring engine.

use super::*;
use crate::testing::sample_facts;
use pretty_assertions::assert_eq;

fn in_bounds(score: f64) -> bool {
    (0.0..=100.0).contains(&score)
}

fn edge_case_facts() -> Vec<ExtractedFacts> {
    let mut huge = sample_facts();
    huge.arr_crore = 10_000.0;
    huge.valuation_pre_money_crore = 1e9;
    huge.team_size = u32::MAX;
    huge.founders = (0..50).map(|i| format!("Founder {i}")).collect();
    huge.key_metrics.customer_count = u64::MAX;
    huge.key_metrics.mrr_lakh = 1e6;

    let mut idea = ExtractedFacts::new("Idea Co");
    idea.stage = "Idea".into();
    idea.sector = "Crypto".into();

    let mut churny = sample_facts();
    churny.key_metrics.churn_rate = 100.0;

    vec![ExtractedFacts::default(), sample_facts(), huge, idea, churny]
}

#[test]
fn test_sample_scorecard() {
    let card = ScoringEngine::new().score(&sample_facts());

    assert!((card.financial_health.score - 74.0).abs() < f64::EPSILON);
    assert!((card.team_quality.score - 90.0).abs() < f64::EPSILON);
    assert!((card.market_opportunity.score - 90.0).abs() < f64::EPSILON);
    assert!((card.product_traction.score - 80.0).abs() < f64::EPSILON);
    assert!((card.risk.score - 15.0).abs() < f64::EPSILON);
    assert!((card.overall_score - 83.25).abs() < 1e-9);
    assert_eq!(card.band, Band::StrongBuy);
    assert_eq!(card.confidence, Confidence::High);
}

#[test]
fn test_sample_factors() {
    let card = ScoringEngine::new().score(&sample_facts());
    assert_eq!(
        card.financial_health.factors,
        vec![
            "Moderate ARR: ₹2.5 crores",
            "Recurring revenue model",
            "Moderate valuation: ₹25.0 crores",
            "Good MRR: ₹20.0 lakhs",
            "Moderate churn: 5.2%",
            "Good customer base: 150",
        ]
    );
    assert_eq!(card.risk.factors, vec!["Low revenue", "Proven stage"]);
}

#[test]
fn test_scores_stay_in_bounds() {
    let engine = ScoringEngine::new();
    for facts in edge_case_facts() {
        let card = engine.score(&facts);
        for score in [
            card.financial_health.score,
            card.team_quality.score,
            card.market_opportunity.score,
            card.product_traction.score,
            card.risk.score,
            card.overall_score,
        ] {
            assert!(in_bounds(score), "{score} out of bounds for {facts:?}");
        }
    }
}

#[test]
fn test_identical_facts_serialize_identically() {
    let engine = ScoringEngine::new();
    let first = serde_json::to_string(&engine.score(&sample_facts())).unwrap();
    let second = serde_json::to_string(&engine.score(&sample_facts())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_more_revenue_never_lowers_financial_health() {
    let engine = ScoringEngine::new();
    let mut facts = sample_facts();
    let mut previous = 0.0;
    for arr in [0.0, 0.5, 1.0, 4.9, 5.0, 9.9, 10.0, 250.0] {
        facts.arr_crore = arr;
        let score = engine.financial_health(&facts).score;
        assert!(score >= previous, "ARR {arr} dropped score to {score}");
        previous = score;
    }
}

#[test]
fn test_more_customers_never_lowers_traction() {
    let engine = ScoringEngine::new();
    let mut facts = sample_facts();
    let mut previous = 0.0;
    for customers in [0, 1, 99, 100, 999, 1_000, 9_999, 10_000, 1_000_000] {
        facts.key_metrics.customer_count = customers;
        let score = engine.product_traction(&facts).score;
        assert!(score >= previous, "{customers} customers dropped score to {score}");
        previous = score;
    }
}

#[test]
fn test_larger_team_never_raises_risk() {
    let engine = ScoringEngine::new();
    let mut facts = sample_facts();
    let mut previous = f64::MAX;
    for team in [0, 1, 2, 3, 5, 9, 10, 50] {
        facts.team_size = team;
        let score = engine.risk(&facts).score;
        assert!(score <= previous, "team of {team} raised risk to {score}");
        previous = score;
    }
}

#[test]
fn test_weights_sum_to_one() {
    assert_eq!(WEIGHTS.total(), BASIS_POINTS);
    assert_eq!(ScoringEngine::new().weights(), WEIGHTS);
}

#[test]
fn test_perfect_and_empty_overall() {
    assert!((WEIGHTS.overall(100.0, 100.0, 100.0, 100.0, 0.0) - 100.0).abs() < 1e-9);
    assert!(WEIGHTS.overall(0.0, 0.0, 0.0, 0.0, 100.0).abs() < 1e-9);
}

#[test]
fn test_overall_moves_with_each_input() {
    let steps: Vec<f64> = (0..=20).map(|i| f64::from(i) * 5.0).collect();
    for base in [0.0, 35.0, 70.0, 100.0] {
        for input in 0..5 {
            let overall_at = |value: f64| {
                let mut args = [base; 5];
                args[input] = value;
                WEIGHTS.overall(args[0], args[1], args[2], args[3], args[4])
            };
            let scores: Vec<f64> = steps.iter().map(|&value| overall_at(value)).collect();
            for pair in scores.windows(2) {
                if input == 4 {
                    assert!(pair[1] <= pair[0], "risk input {input} raised overall: {pair:?}");
                } else {
                    assert!(pair[1] >= pair[0], "input {input} lowered overall: {pair:?}");
                }
            }
            assert!(
                (scores[0] - scores[scores.len() - 1]).abs() > 1.0,
                "input {input} had no effect at base {base}"
            );
        }
    }
}

#[test]
fn test_empty_facts_are_low_confidence_sell() {
    let card = ScoringEngine::new().score(&ExtractedFacts::default());
    assert_eq!(card.confidence, Confidence::Low);
    assert_eq!(card.band, Band::Sell);
}
