//! Utility functions for identifiers, timestamps and display formatting.

mod format;
mod ids;

pub use format::{group_thousands, iso_timestamp, rfc3339};
pub use ids::{generate_run_id, startup_id, STARTUP_ID_LEN};
