//! The fixed five-stage evaluation pipeline.
//!
//! Extraction runs first. Market and financial analysis then run as two
//! independent tokio tasks and are joined; risk assessment and the
//! recommendation follow. The first failure ends the run, but a sibling that
//! is already running is allowed to finish so both outcomes are reported.

use super::aggregator::{ResultAggregator, WorkflowResult};
use crate::collaborators::DocumentIntelligence;
use crate::config::StageTimeouts;
use crate::core::{RunningStage, StageName, StageOutcome, StatusMap};
use crate::errors::StageError;
use crate::events::{EventSink, LoggingEventSink, WorkflowEvent};
use crate::model::{
    Document, ExtractedFacts, FinancialAnalysis, MarketAnalysis, Recommendation,
    RecommendationInput, RiskInput, RiskProfile,
};
use crate::stages::{
    run_stage, ExtractionStage, FinancialAnalysisStage, MarketAnalysisStage,
    RecommendationStage, RiskAssessmentStage, StageExecutor, StageRun,
};
use crate::utils::generate_run_id;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Drives one document through the five stages.
///
/// Generic over the executor of each stage; the defaults are the production
/// stages. A coordinator holds no per-run state, so one instance can serve
/// any number of concurrent runs.
pub struct Coordinator<
    E = ExtractionStage,
    M = MarketAnalysisStage,
    F = FinancialAnalysisStage,
    R = RiskAssessmentStage,
    C = RecommendationStage,
> {
    extraction: Arc<E>,
    market: Arc<M>,
    financial: Arc<F>,
    risk: Arc<R>,
    recommendation: Arc<C>,
    timeouts: StageTimeouts,
    events: Arc<dyn EventSink>,
}

impl Coordinator {
    /// Builds the production pipeline around a document backend.
    #[must_use]
    pub fn standard(backend: Arc<dyn DocumentIntelligence>) -> Self {
        Self::new(
            ExtractionStage::new(backend),
            MarketAnalysisStage::new(),
            FinancialAnalysisStage::new(),
            RiskAssessmentStage::new(),
            RecommendationStage::new(),
        )
    }
}

impl<E, M, F, R, C> Coordinator<E, M, F, R, C>
where
    E: StageExecutor<Input = Document, Output = ExtractedFacts>,
    M: StageExecutor<Input = ExtractedFacts, Output = MarketAnalysis> + 'static,
    F: StageExecutor<Input = ExtractedFacts, Output = FinancialAnalysis> + 'static,
    R: StageExecutor<Input = RiskInput, Output = RiskProfile>,
    C: StageExecutor<Input = RecommendationInput, Output = Recommendation>,
{
    /// Creates a coordinator from one executor per stage.
    #[must_use]
    pub fn new(extraction: E, market: M, financial: F, risk: R, recommendation: C) -> Self {
        Self {
            extraction: Arc::new(extraction),
            market: Arc::new(market),
            financial: Arc::new(financial),
            risk: Arc::new(risk),
            recommendation: Arc::new(recommendation),
            timeouts: StageTimeouts::default(),
            events: Arc::new(LoggingEventSink::default()),
        }
    }

    /// Sets the per-stage deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: StageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Sets the sink that receives lifecycle events.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Returns the per-stage deadlines.
    #[must_use]
    pub fn timeouts(&self) -> &StageTimeouts {
        &self.timeouts
    }

    /// Runs the pipeline on `document`.
    ///
    /// Never fails: every stage error, timeout or panic ends up in the
    /// returned result.
    pub async fn run(&self, document: Document) -> WorkflowResult {
        let run_id = generate_run_id();
        let aggregator = ResultAggregator::begin(run_id, document.filename.clone());
        let mut tracker = Tracker::new(run_id, Arc::clone(&self.events));

        info!(
            run_id = %run_id,
            filename = %document.filename,
            bytes = document.len(),
            "Workflow started"
        );
        tracker.emit(WorkflowEvent::WorkflowStarted {
            run_id,
            filename: document.filename.clone(),
        });

        self.drive(&mut tracker, document).await;
        tracker.conclude(&aggregator)
    }

    async fn drive(&self, tracker: &mut Tracker, document: Document) {
        let Some(facts) = self.step(tracker, self.extraction.as_ref(), document).await else {
            return;
        };

        let (Some(market), Some(financial)) = self.analyze(tracker, &facts).await else {
            return;
        };

        let risk_input = RiskInput {
            facts: facts.clone(),
            market: market.clone(),
            financial: financial.clone(),
        };
        let Some(risk) = self.step(tracker, self.risk.as_ref(), risk_input).await else {
            return;
        };

        let recommendation_input = RecommendationInput {
            facts,
            market,
            financial,
            risk,
        };
        self.step(tracker, self.recommendation.as_ref(), recommendation_input)
            .await;
    }

    /// Runs market and financial analysis concurrently and waits for both.
    async fn analyze(
        &self,
        tracker: &mut Tracker,
        facts: &ExtractedFacts,
    ) -> (Option<MarketAnalysis>, Option<FinancialAnalysis>) {
        let market_running = tracker.start(StageName::MarketAnalysis);
        let financial_running = tracker.start(StageName::FinancialAnalysis);

        let market_task = spawn_stage(
            Arc::clone(&self.market),
            market_running.clone(),
            facts.clone(),
            self.timeouts.for_stage(StageName::MarketAnalysis),
        );
        let financial_task = spawn_stage(
            Arc::clone(&self.financial),
            financial_running.clone(),
            facts.clone(),
            self.timeouts.for_stage(StageName::FinancialAnalysis),
        );

        let (market_joined, financial_joined) = tokio::join!(market_task, financial_task);
        let market = tracker.finish_joined(market_running, market_joined);
        let financial = tracker.finish_joined(financial_running, financial_joined);
        (market, financial)
    }

    async fn step<S>(&self, tracker: &mut Tracker, executor: &S, input: S::Input) -> Option<S::Output>
    where
        S: StageExecutor + ?Sized,
    {
        let stage = executor.name();
        let running = tracker.start(stage);
        let StageRun { outcome, output } =
            run_stage(executor, running, input, self.timeouts.for_stage(stage)).await;
        tracker.finish(outcome);
        output
    }
}

impl<E, M, F, R, C> fmt::Debug for Coordinator<E, M, F, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

fn spawn_stage<S>(
    executor: Arc<S>,
    running: RunningStage,
    input: S::Input,
    deadline: Duration,
) -> JoinHandle<StageRun<S::Output>>
where
    S: StageExecutor + 'static,
{
    tokio::spawn(async move { run_stage(executor.as_ref(), running, input, deadline).await })
}

/// Per-run bookkeeping: the status map plus event emission.
struct Tracker {
    run_id: Uuid,
    stages: StatusMap,
    events: Arc<dyn EventSink>,
    error: Option<String>,
}

impl Tracker {
    fn new(run_id: Uuid, events: Arc<dyn EventSink>) -> Self {
        Self {
            run_id,
            stages: StatusMap::new(),
            events,
            error: None,
        }
    }

    fn emit(&self, event: WorkflowEvent) {
        self.events.try_emit(&event);
    }

    fn record(&mut self, outcome: StageOutcome) {
        if let Err(e) = self.stages.record(outcome) {
            error!(run_id = %self.run_id, error = %e, "Rejected stage transition");
            self.error.get_or_insert_with(|| e.to_string());
        }
    }

    fn start(&mut self, stage: StageName) -> RunningStage {
        let running = RunningStage::begin(stage);
        self.record(running.snapshot());
        info!(run_id = %self.run_id, stage = %stage, "Stage started");
        self.emit(WorkflowEvent::StageStarted {
            run_id: self.run_id,
            stage,
        });
        running
    }

    fn finish(&mut self, outcome: StageOutcome) {
        if let Some(event) = WorkflowEvent::for_outcome(self.run_id, &outcome) {
            self.emit(event);
        }
        match outcome.error() {
            Some(e) => warn!(
                run_id = %self.run_id,
                stage = %outcome.stage,
                duration_ms = outcome.duration_ms,
                error = %e,
                "Stage failed"
            ),
            None => info!(
                run_id = %self.run_id,
                stage = %outcome.stage,
                duration_ms = outcome.duration_ms,
                "Stage completed"
            ),
        }
        self.record(outcome);
    }

    fn finish_joined<T>(
        &mut self,
        running: RunningStage,
        joined: Result<StageRun<T>, JoinError>,
    ) -> Option<T> {
        match joined {
            Ok(StageRun { outcome, output }) => {
                self.finish(outcome);
                output
            }
            Err(e) => {
                let stage = running.stage();
                self.finish(running.fail(StageError::for_stage(
                    stage,
                    format!("stage task aborted: {e}"),
                )));
                None
            }
        }
    }

    fn conclude(self, aggregator: &ResultAggregator) -> WorkflowResult {
        let result = aggregator.finish(self.stages, self.error);
        let event = match &result.error {
            None => {
                info!(
                    run_id = %result.run_id,
                    duration_ms = result.duration_ms,
                    "Workflow completed"
                );
                WorkflowEvent::WorkflowCompleted {
                    run_id: result.run_id,
                    duration_ms: result.duration_ms,
                }
            }
            Some(message) => {
                let stage = result.stages.first_failure().map(|outcome| outcome.stage);
                warn!(
                    run_id = %result.run_id,
                    duration_ms = result.duration_ms,
                    failed_stage = ?stage,
                    error = %message,
                    "Workflow failed"
                );
                WorkflowEvent::WorkflowFailed {
                    run_id: result.run_id,
                    duration_ms: result.duration_ms,
                    stage,
                    error: message.clone(),
                }
            }
        };
        self.events.try_emit(&event);
        result
    }
}
