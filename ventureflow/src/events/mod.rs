//! Workflow lifecycle events.
//!
//! The coordinator reports every workflow and stage transition as a
//! [`WorkflowEvent`] to the [`EventSink`] it was built with.

mod event;
mod sink;

pub use event::WorkflowEvent;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
