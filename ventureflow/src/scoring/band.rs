//! Band and confidence classification.

use crate::model::{Band, Confidence, ExtractedFacts, COMPLETENESS_FIELDS};

impl Band {
    /// Classifies an overall score and risk score. First match wins.
    #[must_use]
    pub fn from_scores(overall: f64, risk: f64) -> Self {
        if overall >= 80.0 && risk <= 20.0 {
            Self::StrongBuy
        } else if overall >= 70.0 && risk <= 30.0 {
            Self::Buy
        } else if overall >= 60.0 && risk <= 40.0 {
            Self::Hold
        } else if overall >= 50.0 {
            Self::WeakHold
        } else {
            Self::Sell
        }
    }
}

impl Confidence {
    /// Classifies the fraction of designated fields present.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.8 {
            Self::High
        } else if ratio >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Classifies the completeness of `facts`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_facts(facts: &ExtractedFacts) -> Self {
        Self::from_ratio(facts.populated_fields() as f64 / COMPLETENESS_FIELDS as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_first_match_wins() {
        assert_eq!(Band::from_scores(85.0, 20.0), Band::StrongBuy);
        assert_eq!(Band::from_scores(85.0, 21.0), Band::Buy);
        assert_eq!(Band::from_scores(85.0, 35.0), Band::Hold);
        assert_eq!(Band::from_scores(85.0, 90.0), Band::WeakHold);
        assert_eq!(Band::from_scores(70.0, 30.0), Band::Buy);
        assert_eq!(Band::from_scores(60.0, 40.0), Band::Hold);
        assert_eq!(Band::from_scores(50.0, 0.0), Band::WeakHold);
        assert_eq!(Band::from_scores(49.99, 0.0), Band::Sell);
    }

    #[test]
    fn test_band_matches_first_table_row() {
        // (min overall, max risk, band), scanned in order.
        const TABLE: [(f64, f64, Band); 4] = [
            (80.0, 20.0, Band::StrongBuy),
            (70.0, 30.0, Band::Buy),
            (60.0, 40.0, Band::Hold),
            (50.0, f64::INFINITY, Band::WeakHold),
        ];
        let expected = |overall: f64, risk: f64| {
            TABLE
                .iter()
                .find(|(min_overall, max_risk, _)| overall >= *min_overall && risk <= *max_risk)
                .map_or(Band::Sell, |(_, _, band)| *band)
        };

        for overall in 0..=200 {
            let overall = f64::from(overall) / 2.0;
            for risk in 0..=100 {
                let risk = f64::from(risk);
                assert_eq!(
                    Band::from_scores(overall, risk),
                    expected(overall, risk),
                    "overall {overall}, risk {risk}"
                );
            }
        }
    }

    #[test]
    fn test_confidence_ratio() {
        assert_eq!(Confidence::from_ratio(1.0), Confidence::High);
        assert_eq!(Confidence::from_ratio(0.875), Confidence::High);
        assert_eq!(Confidence::from_ratio(0.75), Confidence::Medium);
        assert_eq!(Confidence::from_ratio(0.625), Confidence::Medium);
        assert_eq!(Confidence::from_ratio(0.5), Confidence::Low);
    }

    #[test]
    fn test_confidence_from_facts() {
        assert_eq!(
            Confidence::from_facts(&ExtractedFacts::default()),
            Confidence::Low
        );
    }
}
