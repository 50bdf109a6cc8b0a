//! Core pipeline types.
//!
//! This module contains the types the coordinator tracks for every run:
//! - Stage identity and status enums
//! - Stage outcomes with typed payloads
//! - The ordered, forward-only status map

mod outcome;
mod status;

pub use outcome::{RunningStage, StageOutcome, StagePayload, StageState, StatusMap};
pub use status::{StageName, StageStatus, WorkflowStatus};
