//! Testing utilities for evaluation pipelines.
//!
//! This module provides:
//! - Mock stage executors (static, failing, slow, panicking)
//! - Sample payloads for one consistent startup
//! - Assertions over stage status maps

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_stage_completed, assert_stage_failed, assert_stage_status, assert_stages_absent,
};
pub use fixtures::{
    sample_document, sample_facts, sample_financial, sample_market, sample_recommendation,
    sample_recommendation_input, sample_risk, sample_risk_input, SAMPLE_DOCUMENT,
};
pub use mocks::{FailingStage, PanickingStage, SlowStage, StaticStage};
