//! In-process peer analytics.

use super::PeerAnalytics;
use crate::errors::CollaboratorError;
use crate::model::{ExtractedFacts, Scorecard};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How far back peer comparisons look by default.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Coarse standing of a startup within its sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceTier {
    /// 90th percentile or above.
    #[serde(rename = "Top 10%")]
    Top10,
    /// 75th percentile or above.
    #[serde(rename = "Top 25%")]
    Top25,
    /// 50th percentile or above.
    #[serde(rename = "Above Average")]
    AboveAverage,
    /// Below the 50th percentile.
    #[serde(rename = "Below Average")]
    BelowAverage,
    /// No peer data to compare against.
    #[serde(rename = "Average")]
    Average,
}

impl PerformanceTier {
    /// Tier for an ARR percentile.
    #[must_use]
    pub fn from_percentile(percentile: u8) -> Self {
        match percentile {
            90.. => Self::Top10,
            75..=89 => Self::Top25,
            50..=74 => Self::AboveAverage,
            _ => Self::BelowAverage,
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top10 => write!(f, "Top 10%"),
            Self::Top25 => write!(f, "Top 25%"),
            Self::AboveAverage => write!(f, "Above Average"),
            Self::BelowAverage => write!(f, "Below Average"),
            Self::Average => write!(f, "Average"),
        }
    }
}

/// A startup's ARR standing against recent sector peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerComparison {
    /// Sector compared against.
    pub sector: String,
    /// Number of peer evaluations in the window.
    pub total_companies: usize,
    /// Bucketed ARR percentile (50, 75, 90 or 95).
    pub arr_percentile: u8,
    /// Tier derived from the percentile.
    pub performance_tier: PerformanceTier,
    /// Mean peer ARR in crore.
    pub sector_average_arr: f64,
    /// Median peer ARR in crore.
    pub sector_median_arr: f64,
    /// 75th percentile peer ARR in crore.
    pub sector_p75_arr: f64,
    /// 90th percentile peer ARR in crore.
    pub sector_p90_arr: f64,
    /// Mean peer overall score.
    pub sector_average_overall: f64,
}

impl Default for PeerComparison {
    fn default() -> Self {
        Self {
            sector: "Unknown".to_string(),
            total_companies: 0,
            arr_percentile: 50,
            performance_tier: PerformanceTier::Average,
            sector_average_arr: 0.0,
            sector_median_arr: 0.0,
            sector_p75_arr: 0.0,
            sector_p90_arr: 0.0,
            sector_average_overall: 50.0,
        }
    }
}

/// Buckets an ARR figure against sector statistics.
#[must_use]
pub fn arr_percentile(arr: f64, average: f64, p75: f64, p90: f64) -> u8 {
    if arr <= average {
        50
    } else if arr <= p75 {
        75
    } else if arr <= p90 {
        90
    } else {
        95
    }
}

/// Continuous percentile of sorted values using linear interpolation.
fn percentile_cont(sorted: &[f64], fraction: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            #[allow(clippy::cast_precision_loss)]
            let rank = fraction * (n - 1) as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lower = rank.floor() as usize;
            let upper = (lower + 1).min(n - 1);
            let weight = rank - rank.floor();
            sorted[lower] + (sorted[upper] - sorted[lower]) * weight
        }
    }
}

#[derive(Debug, Clone)]
struct StoredEvaluation {
    startup_id: String,
    arr_crore: f64,
    overall_score: f64,
    recorded_at: DateTime<Utc>,
}

/// Keeps evaluations in memory, grouped by case-folded sector.
#[derive(Debug)]
pub struct InMemoryPeerAnalytics {
    evaluations: DashMap<String, Vec<StoredEvaluation>>,
    lookback: Duration,
}

impl Default for InMemoryPeerAnalytics {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPeerAnalytics {
    /// Creates an empty store with the default lookback window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            evaluations: DashMap::new(),
            lookback: Duration::days(DEFAULT_LOOKBACK_DAYS),
        }
    }

    /// Sets the lookback window.
    #[must_use]
    pub fn with_lookback(mut self, lookback: Duration) -> Self {
        self.lookback = lookback;
        self
    }

    /// Total number of stored evaluations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluations.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `startup_id` has been recorded.
    #[must_use]
    pub fn contains(&self, startup_id: &str) -> bool {
        self.evaluations
            .iter()
            .any(|entry| entry.value().iter().any(|e| e.startup_id == startup_id))
    }

    fn sector_key(sector: &str) -> String {
        sector.trim().to_lowercase()
    }

    fn insert(&self, sector: &str, evaluation: StoredEvaluation) {
        self.evaluations
            .entry(Self::sector_key(sector))
            .or_default()
            .push(evaluation);
    }
}

#[async_trait]
impl PeerAnalytics for InMemoryPeerAnalytics {
    async fn peer_comparison(
        &self,
        sector: &str,
        arr_crore: f64,
    ) -> Result<PeerComparison, CollaboratorError> {
        let cutoff = Utc::now() - self.lookback;
        let Some(entries) = self.evaluations.get(&Self::sector_key(sector)) else {
            return Ok(PeerComparison::default());
        };
        let recent: Vec<&StoredEvaluation> =
            entries.iter().filter(|e| e.recorded_at >= cutoff).collect();
        if recent.is_empty() {
            return Ok(PeerComparison::default());
        }

        let mut arrs: Vec<f64> = recent.iter().map(|e| e.arr_crore).collect();
        arrs.sort_by(f64::total_cmp);
        #[allow(clippy::cast_precision_loss)]
        let count = recent.len() as f64;
        let average = arrs.iter().sum::<f64>() / count;
        let p75 = percentile_cont(&arrs, 0.75);
        let p90 = percentile_cont(&arrs, 0.9);
        let percentile = arr_percentile(arr_crore, average, p75, p90);

        Ok(PeerComparison {
            sector: sector.trim().to_string(),
            total_companies: recent.len(),
            arr_percentile: percentile,
            performance_tier: PerformanceTier::from_percentile(percentile),
            sector_average_arr: average,
            sector_median_arr: percentile_cont(&arrs, 0.5),
            sector_p75_arr: p75,
            sector_p90_arr: p90,
            sector_average_overall: recent.iter().map(|e| e.overall_score).sum::<f64>() / count,
        })
    }

    async fn record_evaluation(
        &self,
        startup_id: &str,
        facts: &ExtractedFacts,
        scorecard: &Scorecard,
    ) -> Result<(), CollaboratorError> {
        if startup_id.is_empty() {
            return Err(CollaboratorError::Rejected("startup id is empty".into()));
        }
        self.insert(
            &facts.sector,
            StoredEvaluation {
                startup_id: startup_id.to_string(),
                arr_crore: facts.arr_crore,
                overall_score: scorecard.overall_score,
                recorded_at: Utc::now(),
            },
        );
        Ok(())
    }
}
