//! Sector benchmark table and keyword lists.

/// Benchmark figures for one high-growth sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorBenchmark {
    /// Canonical sector label.
    pub name: &'static str,
    /// Average year-on-year ARR growth percentage.
    pub arr_growth_percent: f64,
    /// Average team efficiency index.
    pub team_efficiency: f64,
    /// Total addressable market in USD.
    pub market_size_usd: u64,
    /// Competition index in `[0, 1]`.
    pub competition_index: f64,
}

/// The high-growth sectors.
pub static SECTOR_BENCHMARKS: [SectorBenchmark; 4] = [
    SectorBenchmark {
        name: "AI/ML",
        arr_growth_percent: 150.0,
        team_efficiency: 85.0,
        market_size_usd: 1_000_000_000,
        competition_index: 0.7,
    },
    SectorBenchmark {
        name: "FinTech",
        arr_growth_percent: 120.0,
        team_efficiency: 80.0,
        market_size_usd: 5_000_000_000,
        competition_index: 0.8,
    },
    SectorBenchmark {
        name: "HealthTech",
        arr_growth_percent: 100.0,
        team_efficiency: 75.0,
        market_size_usd: 2_000_000_000,
        competition_index: 0.6,
    },
    SectorBenchmark {
        name: "SaaS",
        arr_growth_percent: 130.0,
        team_efficiency: 90.0,
        market_size_usd: 3_000_000_000,
        competition_index: 0.9,
    },
];

/// Substrings that mark a technology sector outside the table.
pub const TECH_KEYWORDS: [&str; 5] = ["tech", "ai", "ml", "saas", "fintech"];

/// Substrings that mark a stable, non-tech sector.
pub const STABLE_KEYWORDS: [&str; 3] = ["health", "education", "ecommerce"];

/// Substrings that mark a high-risk sector.
pub const HIGH_RISK_KEYWORDS: [&str; 3] = ["crypto", "blockchain", "nft"];

/// Looks up a sector benchmark, ignoring case and surrounding whitespace.
#[must_use]
pub fn lookup(sector: &str) -> Option<&'static SectorBenchmark> {
    let sector = sector.trim();
    SECTOR_BENCHMARKS
        .iter()
        .find(|benchmark| benchmark.name.eq_ignore_ascii_case(sector))
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
