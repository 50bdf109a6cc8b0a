//! Market and financial analysis payloads.

use super::score::CategoryScore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How crowded the sector is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionIntensity {
    /// Competition index ≤ 0.5.
    Low,
    /// Competition index ≤ 0.7.
    Moderate,
    /// Competition index above 0.7.
    High,
    /// Sector not in the benchmark table.
    Unknown,
}

impl CompetitionIntensity {
    /// Classifies a competition index in `[0, 1]`.
    #[must_use]
    pub fn from_index(index: Option<f64>) -> Self {
        match index {
            Some(value) if value <= 0.5 => Self::Low,
            Some(value) if value <= 0.7 => Self::Moderate,
            Some(_) => Self::High,
            None => Self::Unknown,
        }
    }
}

impl fmt::Display for CompetitionIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::High => write!(f, "high"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Where the sector sits on its growth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketMaturity {
    /// Benchmark ARR growth of at least 140%.
    Emerging,
    /// Benchmark ARR growth of at least 110%.
    Growing,
    /// Slower benchmark growth.
    Mature,
    /// Sector not in the benchmark table.
    Unknown,
}

impl MarketMaturity {
    /// Classifies a benchmark ARR growth percentage.
    #[must_use]
    pub fn from_growth(growth_percent: Option<f64>) -> Self {
        match growth_percent {
            Some(growth) if growth >= 140.0 => Self::Emerging,
            Some(growth) if growth >= 110.0 => Self::Growing,
            Some(_) => Self::Mature,
            None => Self::Unknown,
        }
    }
}

/// Benchmark figures for the startup's sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProfile {
    /// Sector label as extracted.
    pub sector: String,
    /// Canonical table key the sector matched, if any.
    pub benchmark: Option<String>,
    /// Total addressable market in USD.
    pub market_size_usd: Option<u64>,
    /// Benchmark year-on-year ARR growth percentage.
    pub arr_growth_percent: Option<f64>,
    /// Competition index in `[0, 1]`.
    pub competition_index: Option<f64>,
    /// Competition classification.
    pub competition: CompetitionIntensity,
    /// Maturity classification.
    pub maturity: MarketMaturity,
}

/// Output of the market analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    /// Company name carried from the facts.
    pub company_name: String,
    /// Sector sizing.
    pub sector_profile: SectorProfile,
    /// One-line competitive positioning summary.
    pub positioning: String,
    /// Market-level risks.
    pub market_risks: Vec<String>,
    /// Market-opportunity score.
    pub market_opportunity: CategoryScore,
}

/// Current headline financials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentFinancials {
    /// ARR in crore.
    pub arr_crore: f64,
    /// Pre-money valuation in crore.
    pub valuation_crore: f64,
    /// MRR in lakh.
    pub mrr_lakh: f64,
    /// MRR × 12, converted to crore.
    pub annualized_mrr_crore: f64,
}

/// Naive ARR projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjections {
    /// ARR × 1.5.
    pub next_year_arr_crore: f64,
    /// ARR × 3.2.
    pub three_year_arr_crore: f64,
}

/// Ratios that are undefined when their divisor is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitMetrics {
    /// ARR per employee in lakh.
    pub arr_per_employee_lakh: Option<f64>,
    /// Valuation divided by ARR.
    pub valuation_multiple: Option<f64>,
}

/// Output of the financial analysis stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    /// Company name carried from the facts.
    pub company_name: String,
    /// Current figures.
    pub current: CurrentFinancials,
    /// Forward projections.
    pub projections: FinancialProjections,
    /// Unit economics.
    pub unit_metrics: UnitMetrics,
    /// Financial-health score.
    pub financial_health: CategoryScore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_competition_intensity_thresholds() {
        assert_eq!(
            CompetitionIntensity::from_index(Some(0.5)),
            CompetitionIntensity::Low
        );
        assert_eq!(
            CompetitionIntensity::from_index(Some(0.7)),
            CompetitionIntensity::Moderate
        );
        assert_eq!(
            CompetitionIntensity::from_index(Some(0.8)),
            CompetitionIntensity::High
        );
        assert_eq!(
            CompetitionIntensity::from_index(None),
            CompetitionIntensity::Unknown
        );
    }

    #[test]
    fn test_maturity_thresholds() {
        assert_eq!(MarketMaturity::from_growth(Some(150.0)), MarketMaturity::Emerging);
        assert_eq!(MarketMaturity::from_growth(Some(120.0)), MarketMaturity::Growing);
        assert_eq!(MarketMaturity::from_growth(Some(100.0)), MarketMaturity::Mature);
        assert_eq!(MarketMaturity::from_growth(None), MarketMaturity::Unknown);
    }
}
