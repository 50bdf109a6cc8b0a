//! Pipeline coordination and result assembly.
//!
//! This module provides:
//! - The [`Coordinator`] that sequences the five stages
//! - The [`ResultAggregator`] that turns a status map into a [`WorkflowResult`]
//! - The [`Evaluator`] entry point with post-completion peer analytics

mod aggregator;
mod coordinator;
mod evaluator;

pub use aggregator::{ResultAggregator, WorkflowResult, WorkflowSummary};
pub use coordinator::Coordinator;
pub use evaluator::Evaluator;
