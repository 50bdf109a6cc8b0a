//! Stage timing.

use crate::core::StageName;
use std::time::Instant;

/// Measures how long one stage has been running.
#[derive(Debug, Clone, Copy)]
pub struct SpanTimer {
    start: Instant,
    stage: StageName,
}

impl SpanTimer {
    /// Starts a new timer for `stage`.
    #[must_use]
    pub fn start(stage: StageName) -> Self {
        Self {
            start: Instant::now(),
            stage,
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the stage being timed.
    #[must_use]
    pub fn stage(&self) -> StageName {
        self.stage
    }

    /// Stops the timer and returns the duration in milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_timer() {
        let timer = SpanTimer::start(StageName::RiskAssessment);
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert_eq!(timer.stage(), StageName::RiskAssessment);
        let duration = timer.finish();
        assert!(duration >= 10.0);
    }
}
