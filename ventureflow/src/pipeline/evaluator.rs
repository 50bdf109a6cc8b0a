//! Request-level entry point: pipeline run plus post-completion analytics.

use super::aggregator::WorkflowResult;
use super::coordinator::Coordinator;
use crate::collaborators::{InMemoryPeerAnalytics, PeerAnalytics, TextDocumentIntelligence};
use crate::config::{AnalyticsConfig, EvaluatorConfig};
use crate::errors::VentureflowError;
use crate::events::EventSink;
use crate::model::{
    Document, ExtractedFacts, FinancialAnalysis, MarketAnalysis, Recommendation,
    RecommendationInput, RiskInput, RiskProfile,
};
use crate::stages::{
    ExtractionStage, FinancialAnalysisStage, MarketAnalysisStage, RecommendationStage,
    RiskAssessmentStage, StageExecutor,
};
use crate::utils::startup_id;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Evaluates uploaded documents.
///
/// Wraps a [`Coordinator`] and, after a completed run, attaches a peer
/// comparison and records the evaluation in the background. Analytics
/// failures are logged and never change the result.
pub struct Evaluator<
    E = ExtractionStage,
    M = MarketAnalysisStage,
    F = FinancialAnalysisStage,
    R = RiskAssessmentStage,
    C = RecommendationStage,
> {
    coordinator: Coordinator<E, M, F, R, C>,
    analytics: Option<Arc<dyn PeerAnalytics>>,
    analytics_config: AnalyticsConfig,
    recordings: Mutex<Vec<JoinHandle<()>>>,
}

impl Evaluator {
    /// Builds the production evaluator: text document backend, in-memory
    /// peer analytics, and the configured deadlines and toggles.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the document
    /// backend cannot be initialized.
    pub fn from_config(config: &EvaluatorConfig) -> Result<Self, VentureflowError> {
        config.validate()?;
        let backend = TextDocumentIntelligence::new()?;
        let coordinator =
            Coordinator::standard(Arc::new(backend)).with_timeouts(config.timeouts.clone());
        info!(pipeline = %config.pipeline_name, "Evaluator configured");
        Ok(Self::new(coordinator)
            .with_analytics(Arc::new(InMemoryPeerAnalytics::new()))
            .with_analytics_config(config.analytics.clone()))
    }
}

impl<E, M, F, R, C> Evaluator<E, M, F, R, C>
where
    E: StageExecutor<Input = Document, Output = ExtractedFacts>,
    M: StageExecutor<Input = ExtractedFacts, Output = MarketAnalysis> + 'static,
    F: StageExecutor<Input = ExtractedFacts, Output = FinancialAnalysis> + 'static,
    R: StageExecutor<Input = RiskInput, Output = RiskProfile>,
    C: StageExecutor<Input = RecommendationInput, Output = Recommendation>,
{
    /// Wraps a coordinator with analytics disabled.
    #[must_use]
    pub fn new(coordinator: Coordinator<E, M, F, R, C>) -> Self {
        Self {
            coordinator,
            analytics: None,
            analytics_config: AnalyticsConfig::default(),
            recordings: Mutex::new(Vec::new()),
        }
    }

    /// Sets the peer analytics collaborator.
    #[must_use]
    pub fn with_analytics(mut self, analytics: Arc<dyn PeerAnalytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Sets which analytics calls are made.
    #[must_use]
    pub fn with_analytics_config(mut self, config: AnalyticsConfig) -> Self {
        self.analytics_config = config;
        self
    }

    /// Replaces the coordinator's event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.coordinator = self.coordinator.with_events(events);
        self
    }

    /// Returns the wrapped coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator<E, M, F, R, C> {
        &self.coordinator
    }

    /// Evaluates one document. Never returns an error.
    pub async fn evaluate(
        &self,
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
    ) -> WorkflowResult {
        let mut result = self
            .coordinator
            .run(Document::new(filename, bytes))
            .await;
        if result.is_completed() {
            self.after_completion(&mut result).await;
        }
        result
    }

    /// Background recordings not yet reaped.
    pub(crate) fn pending_recordings(&self) -> usize {
        self.recordings.lock().len()
    }

    /// Waits for background evaluation recordings to finish.
    pub async fn wait_for_recordings(&self) {
        let handles: Vec<_> = self.recordings.lock().drain(..).collect();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "Evaluation recording task aborted");
            }
        }
    }

    async fn after_completion(&self, result: &mut WorkflowResult) {
        let Some(analytics) = &self.analytics else {
            return;
        };
        let (Some(facts), Some(recommendation)) = (result.facts(), result.recommendation())
        else {
            return;
        };
        let facts = facts.clone();
        let scorecard = recommendation.scorecard.clone();

        if self.analytics_config.peer_comparison {
            match analytics
                .peer_comparison(&facts.sector, facts.arr_crore)
                .await
            {
                Ok(comparison) => {
                    debug!(
                        run_id = %result.run_id,
                        percentile = comparison.arr_percentile,
                        tier = %comparison.performance_tier,
                        "Peer comparison attached"
                    );
                    result.peer_comparison = Some(comparison);
                }
                Err(e) => warn!(run_id = %result.run_id, error = %e, "Peer comparison failed"),
            }
        }

        if self.analytics_config.record_evaluations {
            let analytics = Arc::clone(analytics);
            let id = startup_id(&result.filename, &result.run_id);
            let handle = tokio::spawn(async move {
                match analytics.record_evaluation(&id, &facts, &scorecard).await {
                    Ok(()) => debug!(startup_id = %id, "Evaluation recorded"),
                    Err(e) => warn!(startup_id = %id, error = %e, "Evaluation recording failed"),
                }
            });
            let mut recordings = self.recordings.lock();
            recordings.retain(|handle| !handle.is_finished());
            recordings.push(handle);
        }
    }
}

impl<E, M, F, R, C> fmt::Debug for Evaluator<E, M, F, R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("coordinator", &self.coordinator)
            .field("analytics", &self.analytics.is_some())
            .field("analytics_config", &self.analytics_config)
            .finish_non_exhaustive()
    }
}
