//! Risk factors, their weights, and the score-to-level mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{GeoRiskError, Result};

/// Tolerance for the weights-sum-to-one invariant
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Score at or above which a region is Medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Score at or above which a region is High risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Raw factor inputs, each in [0, 1]
pub type FactorScores = BTreeMap<RiskFactor, f64>;

/// The six weighted geopolitical risk factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    PoliticalStability,
    EconomicConditions,
    DiplomaticRelations,
    RegionalConflicts,
    TradeRelations,
    RegulatoryEnvironment,
}

impl RiskFactor {
    pub fn all() -> Vec<RiskFactor> {
        vec![
            RiskFactor::PoliticalStability,
            RiskFactor::EconomicConditions,
            RiskFactor::DiplomaticRelations,
            RiskFactor::RegionalConflicts,
            RiskFactor::TradeRelations,
            RiskFactor::RegulatoryEnvironment,
        ]
    }

    /// Human readable label, e.g. "regional conflicts"
    pub fn label(&self) -> &'static str {
        match self {
            RiskFactor::PoliticalStability => "political stability",
            RiskFactor::EconomicConditions => "economic conditions",
            RiskFactor::DiplomaticRelations => "diplomatic relations",
            RiskFactor::RegionalConflicts => "regional conflicts",
            RiskFactor::TradeRelations => "trade relations",
            RiskFactor::RegulatoryEnvironment => "regulatory environment",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Factor weights. Always sums to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<RiskFactor, f64>", into = "BTreeMap<RiskFactor, f64>")]
pub struct RiskFactorWeights {
    weights: BTreeMap<RiskFactor, f64>,
}

impl RiskFactorWeights {
    /// Build a weight set. Factors absent from `weights` get weight 0.
    pub fn new(weights: BTreeMap<RiskFactor, f64>) -> Result<Self> {
        for (factor, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(GeoRiskError::config(format!(
                    "weight for {factor} must be a non-negative number, got {weight}"
                )));
            }
        }

        let sum: f64 = weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GeoRiskError::config(format!(
                "risk factor weights must sum to 1.0, got {sum}"
            )));
        }

        let weights = RiskFactor::all()
            .into_iter()
            .map(|f| (f, weights.get(&f).copied().unwrap_or(0.0)))
            .collect();
        Ok(Self { weights })
    }

    pub fn get(&self, factor: RiskFactor) -> f64 {
        self.weights.get(&factor).copied().unwrap_or(0.0)
    }

    /// Iterate `(factor, weight)` in factor order
    pub fn iter(&self) -> impl Iterator<Item = (RiskFactor, f64)> + '_ {
        self.weights.iter().map(|(f, w)| (*f, *w))
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl Default for RiskFactorWeights {
    fn default() -> Self {
        Self {
            weights: BTreeMap::from([
                (RiskFactor::PoliticalStability, 0.25),
                (RiskFactor::EconomicConditions, 0.20),
                (RiskFactor::DiplomaticRelations, 0.20),
                (RiskFactor::RegionalConflicts, 0.15),
                (RiskFactor::TradeRelations, 0.10),
                (RiskFactor::RegulatoryEnvironment, 0.10),
            ]),
        }
    }
}

impl TryFrom<BTreeMap<RiskFactor, f64>> for RiskFactorWeights {
    type Error = GeoRiskError;

    fn try_from(weights: BTreeMap<RiskFactor, f64>) -> Result<Self> {
        Self::new(weights)
    }
}

impl From<RiskFactorWeights> for BTreeMap<RiskFactor, f64> {
    fn from(weights: RiskFactorWeights) -> Self {
        weights.weights
    }
}

/// Three-band risk classification, ordered Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a score to its level. Boundaries are inclusive on the upper band:
    /// 0.4 is Medium, 0.7 is High.
    pub fn from_score(score: f64) -> Self {
        if score < MEDIUM_RISK_THRESHOLD {
            RiskLevel::Low
        } else if score < HIGH_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Standing mitigation advice for a region at this level
    pub fn playbook(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::High => &[
                "reduce exposure",
                "apply strict risk limits",
                "diversify across regions",
            ],
            RiskLevel::Medium => &[
                "keep allocation balanced",
                "consider hedging",
                "monitor key risk indicators",
            ],
            RiskLevel::Low => &[
                "consider adding exposure",
                "look for growth opportunities",
                "watch for emerging risks",
            ],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = RiskFactorWeights::default();
        assert!((weights.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE);
        assert_eq!(weights.get(RiskFactor::PoliticalStability), 0.25);
        assert_eq!(weights.iter().count(), 6);
    }

    #[test]
    fn test_non_conforming_weights_rejected() {
        let mut raw: BTreeMap<_, _> = RiskFactorWeights::default().into();
        raw.insert(RiskFactor::TradeRelations, 0.2);

        let err = RiskFactorWeights::new(raw).unwrap_err();
        assert!(matches!(err, GeoRiskError::Configuration(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let raw = BTreeMap::from([
            (RiskFactor::PoliticalStability, 1.5),
            (RiskFactor::EconomicConditions, -0.5),
        ]);
        assert!(matches!(
            RiskFactorWeights::new(raw),
            Err(GeoRiskError::Configuration(_))
        ));
    }

    #[test]
    fn test_partial_weights_fill_zero() {
        let raw = BTreeMap::from([
            (RiskFactor::PoliticalStability, 0.5),
            (RiskFactor::RegionalConflicts, 0.5),
        ]);
        let weights = RiskFactorWeights::new(raw).unwrap();
        assert_eq!(weights.get(RiskFactor::TradeRelations), 0.0);
        assert_eq!(weights.iter().count(), 6);
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = r#"{"political_stability": 0.9, "trade_relations": 0.9}"#;
        assert!(serde_json::from_str::<RiskFactorWeights>(bad).is_err());

        let good = serde_json::to_string(&RiskFactorWeights::default()).unwrap();
        assert!(good.contains("political_stability"));
        let parsed: RiskFactorWeights = serde_json::from_str(&good).unwrap();
        assert_eq!(parsed, RiskFactorWeights::default());
    }

    #[test]
    fn test_playbook_differs_by_level() {
        assert_eq!(RiskLevel::High.playbook()[0], "reduce exposure");
        assert_ne!(RiskLevel::Low.playbook(), RiskLevel::Medium.playbook());
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.399_999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.4), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.699_999), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0), RiskLevel::High);
    }

    #[test]
    fn test_level_ordering() {
        let levels = [RiskLevel::Low, RiskLevel::High, RiskLevel::Medium];
        assert_eq!(levels.iter().max(), Some(&RiskLevel::High));
    }
}
