//! Geographic/political groupings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GeoRiskError;
use crate::model::factor::{FactorScores, RiskFactor};

/// Region definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    NorthAmerica,
    Europe,
    AsiaPacific,
    MiddleEast,
    Africa,
    LatinAmerica,
}

impl Region {
    /// Get region display name
    pub fn name(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::AsiaPacific => "Asia-Pacific",
            Region::MiddleEast => "Middle East",
            Region::Africa => "Africa",
            Region::LatinAmerica => "Latin America",
        }
    }

    /// Get all regions
    pub fn all() -> Vec<Region> {
        vec![
            Region::NorthAmerica,
            Region::Europe,
            Region::AsiaPacific,
            Region::MiddleEast,
            Region::Africa,
            Region::LatinAmerica,
        ]
    }

    /// Baseline raw factor scores used when a request carries no override.
    ///
    /// Every factor starts at 0.5; regions with known pressure points are
    /// shifted up on those factors.
    pub fn baseline_factors(&self) -> FactorScores {
        let mut factors: FactorScores = RiskFactor::all().into_iter().map(|f| (f, 0.5)).collect();

        let adjustments: &[(RiskFactor, f64)] = match self {
            Region::MiddleEast => &[
                (RiskFactor::RegionalConflicts, 0.8),
                (RiskFactor::PoliticalStability, 0.6),
                (RiskFactor::DiplomaticRelations, 0.7),
            ],
            Region::Europe => &[
                (RiskFactor::PoliticalStability, 0.7),
                (RiskFactor::EconomicConditions, 0.6),
                (RiskFactor::RegulatoryEnvironment, 0.8),
            ],
            Region::AsiaPacific => &[
                (RiskFactor::TradeRelations, 0.6),
                (RiskFactor::DiplomaticRelations, 0.7),
                (RiskFactor::EconomicConditions, 0.6),
            ],
            Region::NorthAmerica => &[
                (RiskFactor::PoliticalStability, 0.8),
                (RiskFactor::EconomicConditions, 0.7),
                (RiskFactor::RegulatoryEnvironment, 0.8),
            ],
            Region::Africa | Region::LatinAmerica => &[],
        };

        for (factor, value) in adjustments {
            factors.insert(*factor, *value);
        }
        factors
    }

    /// Indicators worth watching when the region is flagged
    pub fn key_indicators(&self) -> Vec<&'static str> {
        match self {
            Region::MiddleEast => vec![
                "Ongoing regional conflicts",
                "Oil price volatility",
                "Diplomatic tensions",
            ],
            Region::Europe => vec![
                "EU policy changes",
                "Economic sanctions",
                "Regulatory shifts",
            ],
            Region::AsiaPacific => vec![
                "US-China trade relations",
                "Territorial disputes",
                "Supply chain disruptions",
            ],
            Region::NorthAmerica => vec![
                "Policy uncertainty",
                "Trade agreements",
                "Regulatory changes",
            ],
            Region::Africa => vec!["Political transitions", "Commodity dependence"],
            Region::LatinAmerica => vec!["Currency fluctuations", "Election cycles"],
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = GeoRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "north america" | "northamerica" | "na" => Ok(Region::NorthAmerica),
            "europe" | "eu" => Ok(Region::Europe),
            "asia pacific" | "asiapacific" | "apac" => Ok(Region::AsiaPacific),
            "middle east" | "middleeast" | "mena" => Ok(Region::MiddleEast),
            "africa" => Ok(Region::Africa),
            "latin america" | "latinamerica" | "latam" => Ok(Region::LatinAmerica),
            _ => Err(GeoRiskError::validation(format!("unknown region: {s}"))),
        }
    }
}
