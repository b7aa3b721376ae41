//! Concurrent collaborator fan-out around the scoring pipeline
//!
//! Both collaborators are queried at once, each under its own deadline. A
//! failure or timeout on one side yields a degraded result built from the
//! other; only when both fail does the analysis itself fail.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineConfig;
use crate::engine::pipeline::ScoringPipeline;
use crate::engine::request::AnalysisRequest;
use crate::engine::result::{AnalysisReport, SourceReport, SourceStatus};
use crate::error::{GeoRiskError, Result, SourceError};
use crate::model::{
    MarketObservation, NewsItem, Region, RegionRiskProfile, Sector, SectorImpactProfile, TimeWindow,
};
use crate::sources::{Dataset, MarketSource, NewsSource};

const NEWS: &str = "news";
const MARKET: &str = "market";

type Fetched<T> = std::result::Result<Vec<T>, SourceError>;

/// Fetches from both collaborators and hands the data to a [`ScoringPipeline`]
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    news: Arc<dyn NewsSource>,
    market: Arc<dyn MarketSource>,
}

impl AnalysisOrchestrator {
    pub fn new(news: Arc<dyn NewsSource>, market: Arc<dyn MarketSource>) -> Self {
        Self { news, market }
    }

    /// Orchestrator over a fixed in-memory data set
    pub fn from_dataset(dataset: Dataset) -> Self {
        let (news, market) = dataset.into_sources();
        Self::new(Arc::new(news), Arc::new(market))
    }

    /// Run a full analysis.
    ///
    /// The request window is narrowed to the configured retention first. News
    /// and market data are fetched concurrently; if exactly one side fails
    /// the report is marked degraded, if both fail the call returns
    /// [`GeoRiskError::DataUnavailable`].
    pub async fn analyze(&self, config: &EngineConfig, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let pipeline = ScoringPipeline::new(config)?;
        request.validate()?;

        let window = request.window.clamp_retention(config.data_retention_days);
        tracing::info!(
            regions = request.regions.len(),
            sectors = request.sectors.len(),
            start = %window.start,
            end = %window.end,
            "Starting analysis"
        );

        let (news, market) = self
            .fetch_both(&request.regions, &request.sectors, &window, config.fetch_timeout())
            .await;

        let sources = SourceReport {
            news: status(&news),
            market: status(&market),
        };

        let (news, market) = match (news, market) {
            (Err(news_err), Err(market_err)) => {
                tracing::error!(%news_err, %market_err, "All collaborators failed");
                return Err(GeoRiskError::DataUnavailable {
                    reason: format!("{news_err}; {market_err}"),
                });
            }
            (news, market) => (news.unwrap_or_default(), market.unwrap_or_default()),
        };

        pipeline.analyze(request, &window, &news, &market, sources)
    }

    /// Region profiles only. News is the sole input here, so its failure is
    /// fatal to the call.
    pub async fn assess_regions(
        &self,
        config: &EngineConfig,
        regions: &[Region],
        window: &TimeWindow,
    ) -> Result<Vec<RegionRiskProfile>> {
        let pipeline = ScoringPipeline::new(config)?;
        if regions.is_empty() {
            return Err(GeoRiskError::validation("no regions requested"));
        }

        let window = window.clamp_retention(config.data_retention_days);
        let news = self
            .fetch_news(regions, &window, config.fetch_timeout())
            .await
            .map_err(unavailable)?;

        pipeline.region_profiles(regions, &window, &Default::default(), &news)
    }

    /// Sector profiles only. Sentiment comes from news across the configured
    /// regions, so either collaborator failing is fatal to the call.
    pub async fn assess_sectors(
        &self,
        config: &EngineConfig,
        sectors: &[Sector],
        window: &TimeWindow,
    ) -> Result<Vec<SectorImpactProfile>> {
        let pipeline = ScoringPipeline::new(config)?;
        let regions: Vec<Region> = config.regions.iter().copied().collect();

        let window = window.clamp_retention(config.data_retention_days);
        let (news, market) = self
            .fetch_both(&regions, sectors, &window, config.fetch_timeout())
            .await;
        let news = news.map_err(unavailable)?;
        let market = market.map_err(unavailable)?;

        pipeline.sector_profiles(sectors, &regions, &window, &news, &market)
    }

    async fn fetch_both(
        &self,
        regions: &[Region],
        sectors: &[Sector],
        window: &TimeWindow,
        deadline: Duration,
    ) -> (Fetched<NewsItem>, Fetched<MarketObservation>) {
        tokio::join!(
            self.fetch_news(regions, window, deadline),
            self.fetch_market(sectors, window, deadline),
        )
    }

    async fn fetch_news(&self, regions: &[Region], window: &TimeWindow, deadline: Duration) -> Fetched<NewsItem> {
        let items = bounded(NEWS, deadline, self.news.fetch_news(regions, window)).await?;
        checked(NEWS, items, NewsItem::validate)
    }

    async fn fetch_market(
        &self,
        sectors: &[Sector],
        window: &TimeWindow,
        deadline: Duration,
    ) -> Fetched<MarketObservation> {
        // Nothing to ask for; the market source is not consulted
        if sectors.is_empty() {
            return Ok(Vec::new());
        }
        let observations = bounded(MARKET, deadline, self.market.fetch_market(sectors, window)).await?;
        checked(MARKET, observations, MarketObservation::validate)
    }
}

/// Await `fetch`, converting an elapsed deadline into [`SourceError::Timeout`]
async fn bounded<T, F>(source_name: &str, deadline: Duration, fetch: F) -> std::result::Result<T, SourceError>
where
    F: Future<Output = std::result::Result<T, SourceError>>,
{
    match tokio::time::timeout(deadline, fetch).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(source = source_name, deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX), "Collaborator timed out");
            Err(SourceError::Timeout {
                source_name: source_name.to_string(),
                after: deadline,
            })
        }
    }
}

/// Reject the whole batch if any item fails boundary validation
fn checked<T>(source_name: &str, items: Vec<T>, validate: impl Fn(&T) -> Result<()>) -> Fetched<T> {
    if let Some(err) = items.iter().find_map(|item| validate(item).err()) {
        tracing::warn!(source = source_name, error = %err, "Collaborator returned invalid data");
        return Err(SourceError::InvalidItem {
            source_name: source_name.to_string(),
            reason: err.to_string(),
        });
    }
    tracing::debug!(source = source_name, items = items.len(), "Fetched");
    Ok(items)
}

fn status<T>(fetched: &Fetched<T>) -> SourceStatus {
    match fetched {
        Ok(items) => SourceStatus::Available { items: items.len() },
        Err(err) => SourceStatus::Unavailable {
            reason: err.to_string(),
        },
    }
}

fn unavailable(err: SourceError) -> GeoRiskError {
    GeoRiskError::DataUnavailable {
        reason: err.to_string(),
    }
}
