//! Derived risk and impact profiles

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::factor::{FactorScores, RiskLevel};
use crate::model::region::Region;
use crate::model::sector::Sector;

/// Direction a score moved between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
        })
    }
}

/// Suggested posture for a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    Stable,
    Watch,
    MonitorClosely,
}

impl Recommendation {
    /// impact > 0.7 monitor closely, 0.4 < impact <= 0.7 watch, else stable
    pub fn from_impact(impact: f64) -> Self {
        if impact > 0.7 {
            Recommendation::MonitorClosely
        } else if impact > 0.4 {
            Recommendation::Watch
        } else {
            Recommendation::Stable
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Recommendation::Stable => "Stable",
            Recommendation::Watch => "Watch",
            Recommendation::MonitorClosely => "Monitor Closely",
        })
    }
}

/// Weighted risk score for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRiskProfile {
    pub region: Region,
    /// In [0, 1]
    pub score: f64,
    pub level: RiskLevel,
    /// Raw factor inputs the score was computed from
    pub factors: FactorScores,
    pub trend: Trend,
}

/// Comparative market impact for one sector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorImpactProfile {
    pub sector: Sector,
    /// In [0, 1]
    pub impact: f64,
    /// In [0, 1]
    pub volatility: f64,
    /// Mean sentiment rescaled from [-1, 1] to [0, 1]
    pub sentiment: f64,
    pub volume: f64,
    pub recommendation: Recommendation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(Recommendation::from_impact(0.71), Recommendation::MonitorClosely);
        assert_eq!(Recommendation::from_impact(0.7), Recommendation::Watch);
        assert_eq!(Recommendation::from_impact(0.41), Recommendation::Watch);
        assert_eq!(Recommendation::from_impact(0.4), Recommendation::Stable);
        assert_eq!(Recommendation::from_impact(0.0), Recommendation::Stable);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Trend::Increasing).unwrap(), "\"increasing\"");
        assert_eq!(
            serde_json::to_string(&Recommendation::MonitorClosely).unwrap(),
            "\"MonitorClosely\""
        );
    }
}
