//! Analysis result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{RegionRiskProfile, RiskLevel, SectorImpactProfile, TimeWindow};

/// Headline analysis handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_insights: Vec<String>,
    pub recommendations: Vec<String>,
    /// Highest level across the analysed regions
    pub risk_level: RiskLevel,
    pub generated_at: DateTime<Utc>,
    /// True when a collaborator failed and its data was left out
    pub degraded: bool,
}

/// Outcome of one collaborator fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Available { items: usize },
    Unavailable { reason: String },
}

impl SourceStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceStatus::Available { .. })
    }
}

/// Status of both collaborators for one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub news: SourceStatus,
    pub market: SourceStatus,
}

impl SourceReport {
    /// Both sources answered; used when data is supplied directly
    pub fn supplied(news: usize, market: usize) -> Self {
        Self {
            news: SourceStatus::Available { items: news },
            market: SourceStatus::Available { items: market },
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.news.is_available() || !self.market.is_available()
    }

    /// One line per failed source
    pub fn failures(&self) -> Vec<String> {
        [("news", &self.news), ("market", &self.market)]
            .into_iter()
            .filter_map(|(name, status)| match status {
                SourceStatus::Unavailable { reason } => Some(format!("{name} source unavailable ({reason})")),
                SourceStatus::Available { .. } => None,
            })
            .collect()
    }
}

/// Full export: the headline result plus the profiles behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub regions: Vec<RegionRiskProfile>,
    pub sectors: Vec<SectorImpactProfile>,
    pub window: TimeWindow,
    pub sources: SourceReport,
}

impl AnalysisReport {
    pub fn is_degraded(&self) -> bool {
        self.result.degraded
    }
}
