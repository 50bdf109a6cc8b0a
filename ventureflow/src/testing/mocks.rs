//! Mock stage executors for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use super::fixtures;
use crate::core::{StageName, StagePayload};
use crate::errors::StageError;
use crate::model::{
    Document, ExtractedFacts, FinancialAnalysis, MarketAnalysis, Recommendation,
    RecommendationInput, RiskInput, RiskProfile,
};
use crate::stages::StageExecutor;

/// A stage that returns a fixed output and records every input it receives.
///
/// Clones share the recorded inputs, so a test can hand one clone to the
/// coordinator and inspect the other.
#[derive(Debug, Clone)]
pub struct StaticStage<I, O> {
    stage: StageName,
    output: O,
    received: Arc<Mutex<Vec<I>>>,
}

impl<I, O> StaticStage<I, O> {
    /// Creates a stage that always returns `output`.
    #[must_use]
    pub fn new(stage: StageName, output: O) -> Self {
        Self {
            stage,
            output,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.received.lock().len()
    }
}

impl<I: Clone, O> StaticStage<I, O> {
    /// Returns every input the stage received, in call order.
    #[must_use]
    pub fn inputs(&self) -> Vec<I> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl<I, O> StageExecutor for StaticStage<I, O>
where
    I: Debug + Send + 'static,
    O: Debug + Clone + Send + Sync + Into<StagePayload> + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> StageName {
        self.stage
    }

    async fn execute(&self, input: I) -> Result<O, StageError> {
        self.received.lock().push(input);
        Ok(self.output.clone())
    }
}

/// A stage that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingStage<I, O> {
    stage: StageName,
    message: String,
    calls: Arc<Mutex<usize>>,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> FailingStage<I, O> {
    /// Creates a stage that fails as `stage` with `message`.
    #[must_use]
    pub fn new(stage: StageName, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            calls: Arc::new(Mutex::new(0)),
            _types: PhantomData,
        }
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl<I, O> StageExecutor for FailingStage<I, O>
where
    I: Debug + Send + 'static,
    O: Debug + Clone + Send + Sync + Into<StagePayload> + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> StageName {
        self.stage
    }

    async fn execute(&self, _input: I) -> Result<O, StageError> {
        *self.calls.lock() += 1;
        Err(StageError::for_stage(self.stage, self.message.clone()))
    }
}

/// A stage that sleeps before returning a fixed output.
#[derive(Debug, Clone)]
pub struct SlowStage<I, O> {
    stage: StageName,
    delay: Duration,
    output: O,
    calls: Arc<Mutex<usize>>,
    _input: PhantomData<fn(I)>,
}

impl<I, O> SlowStage<I, O> {
    /// Creates a stage that returns `output` after `delay`.
    #[must_use]
    pub fn new(stage: StageName, delay: Duration, output: O) -> Self {
        Self {
            stage,
            delay,
            output,
            calls: Arc::new(Mutex::new(0)),
            _input: PhantomData,
        }
    }

    /// Returns the number of times the stage was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl<I, O> StageExecutor for SlowStage<I, O>
where
    I: Debug + Send + 'static,
    O: Debug + Clone + Send + Sync + Into<StagePayload> + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> StageName {
        self.stage
    }

    async fn execute(&self, _input: I) -> Result<O, StageError> {
        *self.calls.lock() += 1;
        tokio::time::sleep(self.delay).await;
        Ok(self.output.clone())
    }
}

/// A stage that panics when executed.
#[derive(Debug, Clone)]
pub struct PanickingStage<I, O> {
    stage: StageName,
    message: String,
    _types: PhantomData<fn(I) -> O>,
}

impl<I, O> PanickingStage<I, O> {
    /// Creates a stage that panics with `message`.
    #[must_use]
    pub fn new(stage: StageName, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
            _types: PhantomData,
        }
    }
}

#[async_trait]
impl<I, O> StageExecutor for PanickingStage<I, O>
where
    I: Debug + Send + 'static,
    O: Debug + Clone + Send + Sync + Into<StagePayload> + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> StageName {
        self.stage
    }

    async fn execute(&self, _input: I) -> Result<O, StageError> {
        panic!("{}", self.message);
    }
}

/// Per-stage constructors, so tests read `FailingStage::market("...")`.
macro_rules! stage_constructors {
    ($($ctor:ident => $stage:ident, $input:ty, $output:ty, $fixture:path;)*) => {
        $(
            impl StaticStage<$input, $output> {
                #[doc = concat!("A static `", stringify!($ctor), "` stage.")]
                #[must_use]
                pub fn $ctor(output: $output) -> Self {
                    Self::new(StageName::$stage, output)
                }
            }

            impl FailingStage<$input, $output> {
                #[doc = concat!("A failing `", stringify!($ctor), "` stage.")]
                #[must_use]
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::new(StageName::$stage, message)
                }
            }

            impl SlowStage<$input, $output> {
                #[doc = concat!("A slow `", stringify!($ctor), "` stage returning the sample output.")]
                #[must_use]
                pub fn $ctor(delay: Duration) -> Self {
                    Self::new(StageName::$stage, delay, $fixture())
                }
            }

            impl PanickingStage<$input, $output> {
                #[doc = concat!("A panicking `", stringify!($ctor), "` stage.")]
                #[must_use]
                pub fn $ctor(message: impl Into<String>) -> Self {
                    Self::new(StageName::$stage, message)
                }
            }
        )*
    };
}

stage_constructors! {
    extraction => Extraction, Document, ExtractedFacts, fixtures::sample_facts;
    market => MarketAnalysis, ExtractedFacts, MarketAnalysis, fixtures::sample_market;
    financial => FinancialAnalysis, ExtractedFacts, FinancialAnalysis, fixtures::sample_financial;
    risk => RiskAssessment, RiskInput, RiskProfile, fixtures::sample_risk;
    recommendation => Recommendation, RecommendationInput, Recommendation, fixtures::sample_recommendation;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_stage_records_inputs() {
        let stage = StaticStage::market(fixtures::sample_market());
        let shared = stage.clone();
        stage.execute(fixtures::sample_facts()).await.unwrap();

        assert_eq!(shared.calls(), 1);
        assert_eq!(shared.inputs()[0].company_name, "Acme Analytics");
    }

    #[tokio::test]
    async fn test_failing_stage_reports_its_stage() {
        let stage = FailingStage::risk("boom");
        let err = stage.execute(fixtures::sample_risk_input()).await.unwrap_err();
        assert_eq!(err, StageError::risk("boom"));
        assert_eq!(stage.calls(), 1);
    }
}
