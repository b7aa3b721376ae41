//! Core data model
//!
//! Input snapshots ([`NewsItem`], [`MarketObservation`]) are immutable once
//! validated. Derived profiles are recomputed on every request.

pub mod factor;
pub mod market;
pub mod news;
pub mod profile;
pub mod region;
pub mod sector;

pub use factor::{FactorScores, RiskFactor, RiskFactorWeights, RiskLevel};
pub use market::MarketObservation;
pub use news::{NewsItem, TimeWindow};
pub use profile::{Recommendation, RegionRiskProfile, SectorImpactProfile, Trend};
pub use region::Region;
pub use sector::Sector;
