//! Comparative sector impact from sentiment, volatility and volume

use serde::{Deserialize, Serialize};

use crate::error::{GeoRiskError, Result};
use crate::model::factor::WEIGHT_SUM_TOLERANCE;
use crate::model::{MarketObservation, Recommendation, Sector, SectorImpactProfile};
use crate::scoring::sentiment::SentimentSummary;

/// Weighting of the three impact components. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactWeights {
    /// Weight of sentiment distance from neutral
    pub sentiment: f64,
    pub volatility: f64,
    /// Weight of the volume percentile rank
    pub volume: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.5,
            volatility: 0.3,
            volume: 0.2,
        }
    }
}

impl ImpactWeights {
    pub fn validate(&self) -> Result<()> {
        let parts = [
            ("sentiment", self.sentiment),
            ("volatility", self.volatility),
            ("volume", self.volume),
        ];
        if let Some((name, value)) = parts.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(GeoRiskError::config(format!(
                "impact weight {name} must be a non-negative number, got {value}"
            )));
        }

        let sum = self.sentiment + self.volatility + self.volume;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GeoRiskError::config(format!(
                "impact weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Per-sector input to the impact scorer
#[derive(Debug, Clone, PartialEq)]
pub struct SectorInput {
    pub sector: Sector,
    pub sentiment: SentimentSummary,
    pub volatility: f64,
    pub volume: f64,
}

impl SectorInput {
    /// Mean volatility and total volume of the sector's observations.
    /// A sector with no observations has zero volatility and volume.
    pub fn from_observations(
        sector: Sector,
        observations: &[MarketObservation],
        sentiment: SentimentSummary,
    ) -> Self {
        let mut matching: Vec<&MarketObservation> =
            observations.iter().filter(|o| o.sector == sector).collect();
        matching.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.symbol.cmp(&b.symbol)));

        let volume = matching.iter().map(|o| o.volume).sum();
        let volatility = if matching.is_empty() {
            0.0
        } else {
            matching.iter().map(|o| o.volatility).sum::<f64>() / matching.len() as f64
        };

        Self {
            sector,
            sentiment,
            volatility,
            volume,
        }
    }
}

/// Scores sectors relative to each other
#[derive(Debug, Clone, Default)]
pub struct SectorImpactScorer {
    weights: ImpactWeights,
}

impl SectorImpactScorer {
    pub fn new(weights: ImpactWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ImpactWeights {
        &self.weights
    }

    /// Score each sector in input order; a repeated sector keeps its first
    /// input. Volume is ranked across the de-duplicated set, so a lone sector
    /// always sits at the 1.0 percentile.
    pub fn score_sectors(&self, inputs: &[SectorInput]) -> Result<Vec<SectorImpactProfile>> {
        let mut unique: Vec<&SectorInput> = Vec::with_capacity(inputs.len());
        for input in inputs {
            validate_input(input)?;
            if !unique.iter().any(|u| u.sector == input.sector) {
                unique.push(input);
            }
        }

        let volumes: Vec<f64> = unique.iter().map(|i| i.volume).collect();
        let percentiles = volume_percentiles(&volumes);

        let profiles = unique
            .into_iter()
            .zip(percentiles)
            .map(|(input, volume_rank)| {
                let volatility = input.volatility.clamp(0.0, 1.0);
                let weighted = self.weights.sentiment * input.sentiment.distance_from_neutral()
                    + self.weights.volatility * volatility
                    + self.weights.volume * volume_rank;
                let impact = weighted.clamp(0.0, 1.0);

                tracing::debug!(
                    sector = %input.sector,
                    impact,
                    volume_rank,
                    "scored sector impact"
                );

                SectorImpactProfile {
                    sector: input.sector,
                    impact,
                    volatility,
                    sentiment: input.sentiment.scaled(),
                    volume: input.volume,
                    recommendation: Recommendation::from_impact(impact),
                }
            })
            .collect();

        Ok(profiles)
    }
}

/// Percentile rank of each volume: the share of the set at or below it.
/// The largest volume ranks 1.0; equal volumes share a rank.
pub fn volume_percentiles(volumes: &[f64]) -> Vec<f64> {
    let n = volumes.len() as f64;
    volumes
        .iter()
        .map(|v| volumes.iter().filter(|other| *other <= v).count() as f64 / n)
        .collect()
}

fn validate_input(input: &SectorInput) -> Result<()> {
    for (name, value) in [("volatility", input.volatility), ("volume", input.volume)] {
        if !value.is_finite() || value < 0.0 {
            return Err(GeoRiskError::validation(format!(
                "{} {name} must be a non-negative number, got {value}",
                input.sector
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn input(sector: Sector, mean_sentiment: f64, volatility: f64, volume: f64) -> SectorInput {
        SectorInput {
            sector,
            sentiment: SentimentSummary {
                mean_sentiment,
                count: 1,
                ..Default::default()
            },
            volatility,
            volume,
        }
    }

    #[test]
    fn test_single_sector_volume_rank_is_one() {
        let scorer = SectorImpactScorer::default();
        for volume in [0.0, 10.0, 1e9] {
            let profiles = scorer
                .score_sectors(&[input(Sector::Energy, 0.0, 0.0, volume)])
                .unwrap();
            // Only the volume component contributes: 0.2 × 1.0
            assert!((profiles[0].impact - 0.2).abs() < 1e-12);
        }
        assert_eq!(volume_percentiles(&[42.0]), vec![1.0]);
    }

    #[test]
    fn test_volume_percentiles() {
        assert_eq!(volume_percentiles(&[10.0, 30.0, 20.0, 40.0]), vec![0.25, 0.75, 0.5, 1.0]);
        assert_eq!(volume_percentiles(&[5.0, 5.0]), vec![1.0, 1.0]);
        assert!(volume_percentiles(&[]).is_empty());
    }

    #[test]
    fn test_impact_weighting_and_recommendation() {
        let scorer = SectorImpactScorer::default();
        let profiles = scorer
            .score_sectors(&[
                input(Sector::Energy, -0.8, 0.9, 1_000.0),
                input(Sector::Healthcare, 0.1, 0.1, 100.0),
            ])
            .unwrap();

        // 0.5 × 0.8 + 0.3 × 0.9 + 0.2 × 1.0
        assert!((profiles[0].impact - 0.87).abs() < 1e-9);
        assert_eq!(profiles[0].recommendation, Recommendation::MonitorClosely);
        assert!((profiles[0].sentiment - 0.1).abs() < 1e-12);

        // 0.5 × 0.1 + 0.3 × 0.1 + 0.2 × 0.5
        assert!((profiles[1].impact - 0.18).abs() < 1e-9);
        assert_eq!(profiles[1].recommendation, Recommendation::Stable);
    }

    #[test]
    fn test_volatility_clamped() {
        let scorer = SectorImpactScorer::default();
        let profiles = scorer
            .score_sectors(&[input(Sector::Technology, 1.0, 3.5, 1.0)])
            .unwrap();
        assert_eq!(profiles[0].volatility, 1.0);
        assert!((profiles[0].impact - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicates_collapse() {
        let scorer = SectorImpactScorer::default();
        let profiles = scorer
            .score_sectors(&[
                input(Sector::Finance, 0.0, 0.2, 10.0),
                input(Sector::Energy, 0.0, 0.2, 20.0),
                input(Sector::Finance, 0.0, 0.9, 99.0),
            ])
            .unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].sector, Sector::Finance);
        assert_eq!(profiles[0].volatility, 0.2);
    }

    #[test]
    fn test_invalid_weights() {
        let weights = ImpactWeights {
            sentiment: 0.6,
            volatility: 0.3,
            volume: 0.2,
        };
        assert!(matches!(
            SectorImpactScorer::new(weights),
            Err(GeoRiskError::Configuration(_))
        ));
    }

    #[test]
    fn test_negative_volume_rejected() {
        let scorer = SectorImpactScorer::default();
        let err = scorer
            .score_sectors(&[input(Sector::Energy, 0.0, 0.1, -5.0)])
            .unwrap_err();
        assert!(matches!(err, GeoRiskError::Validation(_)));
    }

    #[test]
    fn test_input_from_observations() {
        let now = Utc::now();
        let obs = |symbol: &str, sector, volume, volatility| MarketObservation {
            symbol: symbol.to_string(),
            sector,
            timestamp: now,
            price: 100.0,
            volume,
            volatility,
        };
        let observations = vec![
            obs("XOM", Sector::Energy, 500.0, 0.2),
            obs("CVX", Sector::Energy, 300.0, 0.4),
            obs("AAPL", Sector::Technology, 900.0, 0.1),
        ];

        let energy = SectorInput::from_observations(Sector::Energy, &observations, SentimentSummary::default());
        assert_eq!(energy.volume, 800.0);
        assert!((energy.volatility - 0.3).abs() < 1e-12);

        let finance = SectorInput::from_observations(Sector::Finance, &observations, SentimentSummary::default());
        assert_eq!(finance.volume, 0.0);
        assert_eq!(finance.volatility, 0.0);
    }
}
