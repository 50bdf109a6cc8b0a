//! Market analysis stage.

use super::StageExecutor;
use crate::core::StageName;
use crate::errors::StageError;
use crate::model::{
    CompetitionIntensity, ExtractedFacts, MarketAnalysis, MarketMaturity, SectorProfile,
};
use crate::scoring::sectors::{self, contains_any, HIGH_RISK_KEYWORDS};
use crate::scoring::ScoringEngine;
use async_trait::async_trait;
use tracing::info;

/// Sizes the sector and scores the market opportunity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketAnalysisStage {
    engine: ScoringEngine,
}

impl MarketAnalysisStage {
    /// Creates the stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the sector profile from the benchmark table.
    #[must_use]
    pub fn sector_profile(facts: &ExtractedFacts) -> SectorProfile {
        let benchmark = sectors::lookup(&facts.sector);
        let competition_index = benchmark.map(|b| b.competition_index);
        let arr_growth_percent = benchmark.map(|b| b.arr_growth_percent);
        SectorProfile {
            sector: facts.sector.trim().to_string(),
            benchmark: benchmark.map(|b| b.name.to_string()),
            market_size_usd: benchmark.map(|b| b.market_size_usd),
            arr_growth_percent,
            competition_index,
            competition: CompetitionIntensity::from_index(competition_index),
            maturity: MarketMaturity::from_growth(arr_growth_percent),
        }
    }

    /// Runs the analysis without input validation.
    #[must_use]
    pub fn analyze(&self, facts: &ExtractedFacts) -> MarketAnalysis {
        let sector_profile = Self::sector_profile(facts);
        let market_opportunity = self.engine.market_opportunity(facts);

        let mut market_risks = Vec::new();
        if sector_profile.competition == CompetitionIntensity::High {
            market_risks.push("High competition".to_string());
        }
        if sector_profile.benchmark.is_none() {
            market_risks.push("No sector benchmark available".to_string());
        }
        if contains_any(&facts.sector_key(), &HIGH_RISK_KEYWORDS) {
            market_risks.push("Regulatory uncertainty".to_string());
        }
        if sector_profile.maturity == MarketMaturity::Emerging {
            market_risks.push("Market still forming".to_string());
        }

        let sector_label = sector_profile
            .benchmark
            .clone()
            .unwrap_or_else(|| sector_profile.sector.clone());
        let positioning = match sector_profile.competition {
            CompetitionIntensity::Unknown => format!(
                "{} operates in {} with no benchmark for competition",
                facts.company_name, sector_label
            ),
            intensity => format!(
                "{} competes in the {} {} market under {} competition",
                facts.company_name,
                maturity_label(sector_profile.maturity),
                sector_label,
                intensity
            ),
        };

        MarketAnalysis {
            company_name: facts.company_name.clone(),
            sector_profile,
            positioning,
            market_risks,
            market_opportunity,
        }
    }
}

fn maturity_label(maturity: MarketMaturity) -> &'static str {
    match maturity {
        MarketMaturity::Emerging => "emerging",
        MarketMaturity::Growing => "growing",
        MarketMaturity::Mature => "mature",
        MarketMaturity::Unknown => "unbenchmarked",
    }
}

#[async_trait]
impl StageExecutor for MarketAnalysisStage {
    type Input = ExtractedFacts;
    type Output = MarketAnalysis;

    fn name(&self) -> StageName {
        StageName::MarketAnalysis
    }

    async fn execute(&self, input: ExtractedFacts) -> Result<MarketAnalysis, StageError> {
        input
            .validate()
            .map_err(|e| StageError::market(e.to_string()))?;
        let analysis = self.analyze(&input);
        info!(
            company = %analysis.company_name,
            score = analysis.market_opportunity.score,
            competition = %analysis.sector_profile.competition,
            "Market analysis complete"
        );
        Ok(analysis)
    }
}
