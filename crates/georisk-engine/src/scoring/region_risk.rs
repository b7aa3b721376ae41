//! Weighted multi-factor region risk

use std::collections::{BTreeMap, HashMap};

use crate::error::{GeoRiskError, Result};
use crate::model::{FactorScores, Region, RegionRiskProfile, RiskFactor, RiskFactorWeights, RiskLevel, Trend};
use crate::scoring::unique_in_order;

/// Combines raw factor scores into a region score and level
#[derive(Debug, Clone, Default)]
pub struct RegionRiskScorer {
    weights: RiskFactorWeights,
}

impl RegionRiskScorer {
    pub fn new(weights: RiskFactorWeights) -> Self {
        Self { weights }
    }

    /// Build from a raw weight map, failing with `Configuration` unless it
    /// sums to 1.0
    pub fn from_weights(weights: BTreeMap<RiskFactor, f64>) -> Result<Self> {
        Ok(Self::new(RiskFactorWeights::new(weights)?))
    }

    pub fn weights(&self) -> &RiskFactorWeights {
        &self.weights
    }

    /// Σ weight × raw over every weighted factor, clamped to [0, 1].
    /// A factor missing from `factors` counts as 0.
    pub fn score(&self, factors: &FactorScores) -> Result<f64> {
        validate_factors(factors)?;
        let total: f64 = self.contributions(factors).iter().map(|(_, c)| c).sum();
        Ok(total.clamp(0.0, 1.0))
    }

    /// Per-factor contribution (weight × raw), in factor order
    pub fn contributions(&self, factors: &FactorScores) -> Vec<(RiskFactor, f64)> {
        self.weights
            .iter()
            .map(|(factor, weight)| (factor, weight * factors.get(&factor).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Score one region
    pub fn profile(&self, region: Region, factors: &FactorScores, trend: Trend) -> Result<RegionRiskProfile> {
        let score = self.score(factors)?;
        Ok(RegionRiskProfile {
            region,
            score,
            level: RiskLevel::from_score(score),
            factors: factors.clone(),
            trend,
        })
    }

    /// Score each requested region in request order. Duplicate requests
    /// collapse to a single profile; a region absent from `inputs` is a
    /// validation error. Regions without a trend entry are `Stable`.
    pub fn score_regions(
        &self,
        requested: &[Region],
        inputs: &BTreeMap<Region, FactorScores>,
        trends: &HashMap<Region, Trend>,
    ) -> Result<Vec<RegionRiskProfile>> {
        unique_in_order(requested)
            .into_iter()
            .map(|region| {
                let factors = inputs.get(&region).ok_or_else(|| {
                    GeoRiskError::validation(format!("no factor inputs for region {region}"))
                })?;
                let trend = trends.get(&region).copied().unwrap_or(Trend::Stable);
                self.profile(region, factors, trend)
            })
            .collect()
    }
}

fn validate_factors(factors: &FactorScores) -> Result<()> {
    for (factor, raw) in factors {
        if !raw.is_finite() || !(0.0..=1.0).contains(raw) {
            return Err(GeoRiskError::validation(format!(
                "raw score for {factor} must be in [0, 1], got {raw}"
            )));
        }
    }
    Ok(())
}
