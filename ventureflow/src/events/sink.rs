//! Event sink trait and implementations.

use super::WorkflowEvent;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info, warn, Level};

/// Receives coordinator lifecycle events.
///
/// Sinks are injected into the coordinator; there is no process-wide sink.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: &WorkflowEvent);

    /// Emits an event without blocking.
    ///
    /// Must never panic; delivery problems are logged and dropped.
    fn try_emit(&self, event: &WorkflowEvent);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &WorkflowEvent) {}

    fn try_emit(&self, _event: &WorkflowEvent) {}
}

/// A sink that writes events through `tracing`.
///
/// Failure events are always logged at WARN; the configured level applies to
/// the rest.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a logging sink with the given level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_event(&self, event: &WorkflowEvent) {
        let event_type = event.event_type();
        let run_id = event.run_id();
        let stage = event.stage().map(|s| s.as_str());
        if event.is_failure() {
            warn!(%event_type, %run_id, ?stage, payload = %event.payload(), "Event: {event_type}");
        } else if self.level == Level::DEBUG {
            debug!(%event_type, %run_id, ?stage, "Event: {event_type}");
        } else {
            info!(%event_type, %run_id, ?stage, "Event: {event_type}");
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &WorkflowEvent) {
        self.log_event(event);
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        self.log_event(event);
    }
}

/// A sink that keeps every event in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: RwLock<Vec<WorkflowEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.read().clone()
    }

    /// Returns the event types in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .read()
            .iter()
            .map(WorkflowEvent::event_type)
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns events whose type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<WorkflowEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type().starts_with(type_prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &WorkflowEvent) {
        self.events.write().push(event.clone());
    }

    fn try_emit(&self, event: &WorkflowEvent) {
        self.events.write().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageName;
    use uuid::Uuid;

    fn started(stage: StageName) -> WorkflowEvent {
        WorkflowEvent::StageStarted {
            run_id: Uuid::nil(),
            stage,
        }
    }

    #[tokio::test]
    async fn test_noop_and_logging_sinks_accept_events() {
        let failed = WorkflowEvent::WorkflowFailed {
            run_id: Uuid::nil(),
            duration_ms: 3.0,
            stage: Some(StageName::Extraction),
            error: "Extraction failed: empty".into(),
        };
        NoOpEventSink.emit(&failed).await;
        LoggingEventSink::default().emit(&failed).await;
        LoggingEventSink::debug().try_emit(&started(StageName::Extraction));
    }

    #[tokio::test]
    async fn test_collecting_sink_filters_by_prefix() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(&WorkflowEvent::WorkflowStarted {
            run_id: Uuid::nil(),
            filename: "deck.txt".into(),
        })
        .await;
        sink.try_emit(&started(StageName::Extraction));
        sink.try_emit(&started(StageName::MarketAnalysis));

        assert_eq!(sink.len(), 3);
        assert_eq!(
            sink.event_types(),
            vec!["workflow.started", "stage.started", "stage.started"]
        );
        assert_eq!(sink.events_of_type("stage.").len(), 2);
        assert_eq!(sink.events_of_type("workflow.").len(), 1);
    }
}
