//! Observability utilities.

mod subscriber;
mod timing;

pub use subscriber::{init_tracing, DEFAULT_FILTER};
pub use timing::SpanTimer;
