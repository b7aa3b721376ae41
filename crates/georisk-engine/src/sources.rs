//! External collaborator contracts
//!
//! The engine consumes scored news and market snapshots through these
//! traits. Transport, scraping and retries belong to the implementations;
//! the orchestrator only bounds each call with a deadline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};
use crate::model::{MarketObservation, NewsItem, Region, Sector, TimeWindow};

/// Supplies news items already scored for sentiment
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Items for any of `regions` published inside `window`. Each call
    /// re-fetches from scratch.
    async fn fetch_news(
        &self,
        regions: &[Region],
        window: &TimeWindow,
    ) -> std::result::Result<Vec<NewsItem>, SourceError>;
}

/// Supplies market observations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Observations for any of `sectors` timestamped inside `window`
    async fn fetch_market(
        &self,
        sectors: &[Sector],
        window: &TimeWindow,
    ) -> std::result::Result<Vec<MarketObservation>, SourceError>;
}

/// A fixed set of news and market data, e.g. loaded from a JSON export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub market: Vec<MarketObservation>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Split into the two in-memory collaborators
    pub fn into_sources(self) -> (StaticNewsSource, StaticMarketSource) {
        (
            StaticNewsSource::new(self.news),
            StaticMarketSource::new(self.market),
        )
    }
}

/// In-memory news collaborator
#[derive(Debug, Clone, Default)]
pub struct StaticNewsSource {
    items: Vec<NewsItem>,
}

impl StaticNewsSource {
    pub fn new(items: Vec<NewsItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl NewsSource for StaticNewsSource {
    async fn fetch_news(
        &self,
        regions: &[Region],
        window: &TimeWindow,
    ) -> std::result::Result<Vec<NewsItem>, SourceError> {
        Ok(self
            .items
            .iter()
            .filter(|item| regions.contains(&item.region) && window.contains(item.published_at))
            .cloned()
            .collect())
    }
}

/// In-memory market collaborator
#[derive(Debug, Clone, Default)]
pub struct StaticMarketSource {
    observations: Vec<MarketObservation>,
}

impl StaticMarketSource {
    pub fn new(observations: Vec<MarketObservation>) -> Self {
        Self { observations }
    }
}

#[async_trait]
impl MarketSource for StaticMarketSource {
    async fn fetch_market(
        &self,
        sectors: &[Sector],
        window: &TimeWindow,
    ) -> std::result::Result<Vec<MarketObservation>, SourceError> {
        Ok(self
            .observations
            .iter()
            .filter(|obs| sectors.contains(&obs.sector) && window.contains(obs.timestamp))
            .cloned()
            .collect())
    }
}
