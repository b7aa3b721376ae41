//! Market observations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GeoRiskError, Result};
use crate::model::sector::Sector;

/// A point-in-time market snapshot for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketObservation {
    pub symbol: String,
    pub sector: Sector,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub volume: f64,
    /// Non-negative; profiles clamp it to [0, 1]
    pub volatility: f64,
}

impl MarketObservation {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("price", self.price),
            ("volume", self.volume),
            ("volatility", self.volatility),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(GeoRiskError::validation(format!(
                    "observation {} has invalid {name}: {value}",
                    self.symbol
                )));
            }
        }
        Ok(())
    }
}
