//! Stage executor trait and the five pipeline stages.
//!
//! Stages are the units of work the coordinator sequences. Each one takes a
//! fully populated typed input and returns a typed output or a
//! [`StageError`]; [`run_stage`] adds the deadline, panic capture and timing
//! that turn that result into a [`StageOutcome`](crate::core::StageOutcome).

mod extraction;
mod financial;
mod market;
mod recommendation;
mod risk;
mod runner;

pub use extraction::ExtractionStage;
pub use financial::FinancialAnalysisStage;
pub use market::MarketAnalysisStage;
pub use recommendation::RecommendationStage;
pub use risk::RiskAssessmentStage;
pub use runner::{run_stage, StageRun};

use crate::core::{StageName, StagePayload};
use crate::errors::StageError;
use async_trait::async_trait;
use std::fmt::Debug;

/// Trait for pipeline stages.
///
/// Implementations must not touch coordinator state. They may call
/// collaborators, and they report every failure as a [`StageError`].
#[async_trait]
pub trait StageExecutor: Send + Sync + Debug {
    /// The typed input the stage consumes.
    type Input: Send + 'static;

    /// The typed output the stage produces.
    type Output: Clone + Send + Sync + Into<StagePayload> + 'static;

    /// Returns the stage this executor implements.
    fn name(&self) -> StageName;

    /// Executes the stage.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, StageError>;
}
