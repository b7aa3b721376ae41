//! Analysis request

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{GeoRiskError, Result};
use crate::model::{FactorScores, Region, Sector, TimeWindow};

/// What to analyse, over which window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub regions: Vec<Region>,
    #[serde(default)]
    pub sectors: Vec<Sector>,
    pub window: TimeWindow,
    /// Caller-supplied raw factor scores that replace the news-derived ones
    #[serde(default)]
    pub factor_overrides: BTreeMap<Region, FactorScores>,
}

impl AnalysisRequest {
    pub fn new(regions: Vec<Region>, sectors: Vec<Sector>, window: TimeWindow) -> Self {
        Self {
            regions,
            sectors,
            window,
            factor_overrides: BTreeMap::new(),
        }
    }

    /// Use fixed raw factor scores for `region`
    pub fn with_factors(mut self, region: Region, factors: FactorScores) -> Self {
        self.factor_overrides.insert(region, factors);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(GeoRiskError::validation("analysis request names no regions"));
        }
        if self.window.start > self.window.end {
            return Err(GeoRiskError::validation("analysis window start is after its end"));
        }
        if let Some(region) = self
            .factor_overrides
            .keys()
            .find(|region| !self.regions.contains(*region))
        {
            return Err(GeoRiskError::validation(format!(
                "factor override given for unrequested region {region}"
            )));
        }
        Ok(())
    }
}
