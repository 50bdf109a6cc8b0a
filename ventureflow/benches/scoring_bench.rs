//! Benchmarks for scoring and a full in-process evaluation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ventureflow::config::EvaluatorConfig;
use ventureflow::pipeline::Evaluator;
use ventureflow::scoring::ScoringEngine;
use ventureflow::testing::{sample_facts, SAMPLE_DOCUMENT};

fn scoring_benchmark(c: &mut Criterion) {
    let engine = ScoringEngine::new();
    let facts = sample_facts();
    c.bench_function("score_sample_facts", |b| {
        b.iter(|| engine.score(black_box(&facts)));
    });
}

fn evaluation_benchmark(c: &mut Criterion) {
    let Ok(evaluator) = Evaluator::from_config(&EvaluatorConfig::default()) else {
        return;
    };
    let evaluator = evaluator.with_analytics_config(ventureflow::config::AnalyticsConfig {
        peer_comparison: false,
        record_evaluations: false,
    });
    c.bench_function("evaluate_sample_document", |b| {
        b.iter(|| {
            tokio_test::block_on(evaluator.evaluate(black_box(SAMPLE_DOCUMENT), "acme.txt"))
        });
    });
}

criterion_group!(benches, scoring_benchmark, evaluation_benchmark);
criterion_main!(benches);
