//! Assertions over stage status maps.

use crate::core::{StageName, StageStatus, StatusMap};

/// Asserts that `stage` has the expected status.
pub fn assert_stage_status(stages: &StatusMap, stage: StageName, expected: StageStatus) {
    assert_eq!(
        stages.status(stage),
        Some(expected),
        "Expected {stage} to be {expected:?}, got {:?}",
        stages.status(stage)
    );
}

/// Asserts that `stage` completed with a payload of the same stage.
pub fn assert_stage_completed(stages: &StatusMap, stage: StageName) {
    assert_stage_status(stages, stage, StageStatus::Completed);
    let payload_stage = stages
        .get(stage)
        .and_then(|outcome| outcome.payload())
        .map(|payload| payload.stage());
    assert_eq!(
        payload_stage,
        Some(stage),
        "Expected {stage} to carry its own payload"
    );
}

/// Asserts that `stage` failed and its error message contains `needle`.
pub fn assert_stage_failed(stages: &StatusMap, stage: StageName, needle: &str) {
    assert_stage_status(stages, stage, StageStatus::Failed);
    let message = stages
        .get(stage)
        .and_then(|outcome| outcome.error())
        .map(ToString::to_string)
        .unwrap_or_default();
    assert!(
        message.contains(needle),
        "Expected {stage} error to contain '{needle}', got '{message}'"
    );
}

/// Asserts that none of `skipped` has an entry in the map.
pub fn assert_stages_absent(stages: &StatusMap, skipped: &[StageName]) {
    for stage in skipped {
        assert!(
            !stages.contains(*stage),
            "Expected {stage} to be absent, got {:?}",
            stages.status(*stage)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RunningStage;
    use crate::errors::StageError;
    use crate::testing::sample_facts;

    fn map_with_failed_market() -> StatusMap {
        let mut stages = StatusMap::new();
        stages
            .record(RunningStage::begin(StageName::Extraction).complete(sample_facts()))
            .unwrap();
        stages
            .record(
                RunningStage::begin(StageName::MarketAnalysis)
                    .fail(StageError::market("no data")),
            )
            .unwrap();
        stages
    }

    #[test]
    fn test_assert_stage_completed() {
        assert_stage_completed(&map_with_failed_market(), StageName::Extraction);
    }

    #[test]
    #[should_panic(expected = "Expected market_analysis to be Completed")]
    fn test_assert_stage_completed_fails() {
        assert_stage_completed(&map_with_failed_market(), StageName::MarketAnalysis);
    }

    #[test]
    fn test_assert_stage_failed() {
        assert_stage_failed(&map_with_failed_market(), StageName::MarketAnalysis, "no data");
    }

    #[test]
    fn test_assert_stages_absent() {
        assert_stages_absent(
            &map_with_failed_market(),
            &[StageName::RiskAssessment, StageName::Recommendation],
        );
    }
}
