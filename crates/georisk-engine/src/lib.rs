//! Geopolitical risk and market-impact scoring
//!
//! Turns sentiment-scored news and market observations into:
//!
//! - weighted risk scores and Low/Medium/High levels per region
//! - comparative impact scores and recommendations per sector
//! - a synthesised analysis with key insights and a headline risk level
//!
//! # Architecture
//!
//! The scorers in [`scoring`] are pure functions over their inputs. The
//! [`engine::AnalysisOrchestrator`] fetches from the [`sources::NewsSource`]
//! and [`sources::MarketSource`] collaborators concurrently, each under a
//! deadline, and runs the [`engine::ScoringPipeline`] over what came back.
//! [`service::GeoRiskService`] adds configured defaults and TTL caching on
//! top for transport layers.
//!
//! # Example
//!
//! ```rust,ignore
//! use georisk_engine::{Dataset, EngineConfig, GeoRiskService, Region};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let dataset = Dataset::from_json(&std::fs::read_to_string("data.json")?)?;
//!     let service = GeoRiskService::from_dataset(EngineConfig::default(), dataset)?;
//!
//!     for profile in service.get_risk_assessment(&[Region::Europe]).await? {
//!         println!("{}: {:.2} ({})", profile.region, profile.score, profile.level);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod scoring;
pub mod service;
pub mod sources;

pub use cache::{ProfileCache, TtlCache};
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{
    AnalysisOrchestrator, AnalysisReport, AnalysisRequest, AnalysisResult, ScoringPipeline, SourceReport,
    SourceStatus,
};
pub use error::{GeoRiskError, Result, SourceError};
pub use export::JsonExport;
pub use model::{
    FactorScores, MarketObservation, NewsItem, Recommendation, Region, RegionRiskProfile, RiskFactor,
    RiskFactorWeights, RiskLevel, Sector, SectorImpactProfile, TimeWindow, Trend,
};
pub use scoring::{
    ImpactWeights, PortfolioPosition, PortfolioRisk, RegionRiskScorer, SectorImpactScorer, SectorRiskAssessment,
    SentimentAggregator, SentimentSummary, TrendClassifier, portfolio_risk, sector_risk,
};
pub use service::GeoRiskService;
pub use sources::{Dataset, MarketSource, NewsSource, StaticMarketSource, StaticNewsSource};
