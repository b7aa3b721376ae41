//! Pure scoring components
//!
//! Every function here is deterministic in its inputs and holds no state
//! between calls.

pub mod exposure;
pub mod region_risk;
pub mod sector_impact;
pub mod sentiment;
pub mod trend;

pub use exposure::{PortfolioPosition, PortfolioRisk, SectorRiskAssessment, portfolio_risk, sector_risk};
pub use region_risk::RegionRiskScorer;
pub use sector_impact::{ImpactWeights, SectorImpactScorer, SectorInput};
pub use sentiment::{DailySentiment, SentimentAggregator, SentimentSummary};
pub use trend::{DEFAULT_TREND_THRESHOLD, TrendClassifier};

use std::collections::HashSet;
use std::hash::Hash;

/// First occurrence of each item, in request order
pub(crate) fn unique_in_order<T: Copy + Eq + Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    items.iter().copied().filter(|item| seen.insert(*item)).collect()
}
