//! # Ventureflow
//!
//! A staged startup-evaluation pipeline with a deterministic investment
//! scoring engine.
//!
//! An uploaded pitch document flows through five stages:
//!
//! - **Extraction**: pull structured company facts out of the document
//! - **Market and financial analysis**: run concurrently on those facts
//! - **Risk assessment**: score risks across five categories
//! - **Recommendation**: weighted overall score, band and confidence
//!
//! Every stage's outcome is recorded in an ordered status map and the
//! [`pipeline::ResultAggregator`] turns it into a single result on both the
//! success and failure paths.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ventureflow::prelude::*;
//!
//! let evaluator = Evaluator::from_config(&EvaluatorConfig::default())?;
//! let result = evaluator.evaluate(bytes, "pitch.txt").await;
//! if let Some(recommendation) = result.recommendation() {
//!     println!("{} ({})", recommendation.band, recommendation.overall_score);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod collaborators;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod model;
pub mod observability;
pub mod pipeline;
pub mod scoring;
pub mod stages;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collaborators::{
        DocumentIntelligence, InMemoryPeerAnalytics, PeerAnalytics, PeerComparison,
        TextDocumentIntelligence,
    };
    pub use crate::config::{AnalyticsConfig, EvaluatorConfig, StageTimeouts};
    pub use crate::core::{StageName, StageOutcome, StageStatus, StatusMap, WorkflowStatus};
    pub use crate::errors::{CollaboratorError, ConfigError, StageError, VentureflowError};
    pub use crate::events::{
        CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, WorkflowEvent,
    };
    pub use crate::model::{
        Band, Confidence, Document, ExtractedFacts, FinancialAnalysis, MarketAnalysis,
        Recommendation, RiskLevel, RiskProfile, Scorecard,
    };
    pub use crate::pipeline::{Coordinator, Evaluator, ResultAggregator, WorkflowResult};
    pub use crate::scoring::ScoringEngine;
    pub use crate::stages::{
        ExtractionStage, FinancialAnalysisStage, MarketAnalysisStage, RecommendationStage,
        RiskAssessmentStage, StageExecutor,
    };
}
