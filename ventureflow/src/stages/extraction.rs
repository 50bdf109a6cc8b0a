//! Document extraction stage.

use super::StageExecutor;
use crate::collaborators::DocumentIntelligence;
use crate::core::StageName;
use crate::errors::StageError;
use crate::model::{Document, ExtractedFacts};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Turns an uploaded document into [`ExtractedFacts`] via a document backend.
#[derive(Clone)]
pub struct ExtractionStage {
    backend: Arc<dyn DocumentIntelligence>,
}

impl ExtractionStage {
    /// Creates the stage around a document backend.
    #[must_use]
    pub fn new(backend: Arc<dyn DocumentIntelligence>) -> Self {
        Self { backend }
    }
}

impl fmt::Debug for ExtractionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionStage").finish_non_exhaustive()
    }
}

#[async_trait]
impl StageExecutor for ExtractionStage {
    type Input = Document;
    type Output = ExtractedFacts;

    fn name(&self) -> StageName {
        StageName::Extraction
    }

    async fn execute(&self, input: Document) -> Result<ExtractedFacts, StageError> {
        if input.is_empty() {
            return Err(StageError::extraction(format!(
                "document '{}' is empty",
                input.filename
            )));
        }

        let facts = self
            .backend
            .extract(&input.bytes, &input.filename)
            .await
            .map_err(|e| StageError::extraction(e.to_string()))?;
        facts
            .validate()
            .map_err(|e| StageError::extraction(format!("invalid extracted facts: {e}")))?;

        info!(
            filename = %input.filename,
            company = %facts.company_name,
            sector = %facts.sector,
            "Extracted startup facts"
        );
        Ok(facts)
    }
}
