//! Market industry groupings

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GeoRiskError;
use crate::model::factor::RiskFactor;

/// Market sector definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Energy,
    Finance,
    Healthcare,
    Manufacturing,
    ConsumerGoods,
}

impl Sector {
    /// Get sector name
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Technology => "Technology",
            Sector::Energy => "Energy",
            Sector::Finance => "Finance",
            Sector::Healthcare => "Healthcare",
            Sector::Manufacturing => "Manufacturing",
            Sector::ConsumerGoods => "Consumer Goods",
        }
    }

    /// Get all sectors
    pub fn all() -> Vec<Sector> {
        vec![
            Sector::Technology,
            Sector::Energy,
            Sector::Finance,
            Sector::Healthcare,
            Sector::Manufacturing,
            Sector::ConsumerGoods,
        ]
    }

    /// How strongly each risk factor bleeds into this sector (0..1).
    ///
    /// Factors not listed have no sector-specific amplification.
    pub fn sensitivities(&self) -> &'static [(RiskFactor, f64)] {
        match self {
            Sector::Technology => &[
                (RiskFactor::PoliticalStability, 0.8),
                (RiskFactor::TradeRelations, 0.9),
                (RiskFactor::RegulatoryEnvironment, 0.7),
            ],
            Sector::Energy => &[
                (RiskFactor::PoliticalStability, 1.0),
                (RiskFactor::DiplomaticRelations, 0.9),
                (RiskFactor::RegionalConflicts, 0.8),
            ],
            Sector::Finance => &[
                (RiskFactor::PoliticalStability, 0.9),
                (RiskFactor::EconomicConditions, 0.8),
                (RiskFactor::RegulatoryEnvironment, 0.9),
            ],
            Sector::Healthcare => &[
                (RiskFactor::PoliticalStability, 0.6),
                (RiskFactor::RegulatoryEnvironment, 0.8),
                (RiskFactor::EconomicConditions, 0.7),
            ],
            Sector::Manufacturing => &[
                (RiskFactor::TradeRelations, 0.8),
                (RiskFactor::EconomicConditions, 0.7),
                (RiskFactor::PoliticalStability, 0.6),
            ],
            Sector::ConsumerGoods => &[
                (RiskFactor::EconomicConditions, 0.8),
                (RiskFactor::TradeRelations, 0.7),
                (RiskFactor::PoliticalStability, 0.5),
            ],
        }
    }

    /// Structural risks that apply regardless of current factor levels
    pub fn standing_risks(&self) -> Vec<&'static str> {
        match self {
            Sector::Energy => vec!["Oil price volatility", "Supply chain disruptions"],
            Sector::Technology => vec!["Regulatory changes", "Trade restrictions"],
            Sector::Finance => vec!["Interest rate changes", "Currency volatility"],
            Sector::Healthcare | Sector::Manufacturing | Sector::ConsumerGoods => Vec::new(),
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sector {
    type Err = GeoRiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "technology" | "tech" => Ok(Sector::Technology),
            "energy" => Ok(Sector::Energy),
            "finance" | "financials" | "financial" => Ok(Sector::Finance),
            "healthcare" | "health" => Ok(Sector::Healthcare),
            "manufacturing" | "industrials" => Ok(Sector::Manufacturing),
            "consumer goods" | "consumergoods" | "consumer" => Ok(Sector::ConsumerGoods),
            _ => Err(GeoRiskError::validation(format!("unknown sector: {s}"))),
        }
    }
}
