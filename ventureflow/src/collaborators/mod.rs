//! External collaborators the pipeline talks to.
//!
//! Document understanding and peer analytics sit behind traits so the
//! coordinator can be wired to real services or to the in-process
//! implementations shipped here.

mod document;
mod peers;

pub use document::TextDocumentIntelligence;
pub use peers::{InMemoryPeerAnalytics, PeerComparison, PerformanceTier};

use crate::errors::CollaboratorError;
use crate::model::{ExtractedFacts, Scorecard};
use async_trait::async_trait;

/// Turns a raw document into structured facts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentIntelligence: Send + Sync {
    /// Extracts facts from the raw bytes of `filename`.
    async fn extract(&self, bytes: &[u8], filename: &str)
        -> Result<ExtractedFacts, CollaboratorError>;
}

/// Sector-level analytics over past evaluations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerAnalytics: Send + Sync {
    /// Compares an ARR figure against recent evaluations in the same sector.
    async fn peer_comparison(
        &self,
        sector: &str,
        arr_crore: f64,
    ) -> Result<PeerComparison, CollaboratorError>;

    /// Stores one completed evaluation.
    async fn record_evaluation(
        &self,
        startup_id: &str,
        facts: &ExtractedFacts,
        scorecard: &Scorecard,
    ) -> Result<(), CollaboratorError>;
}
