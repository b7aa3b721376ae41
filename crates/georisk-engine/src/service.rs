//! Transport-facing facade
//!
//! Wraps an [`AnalysisOrchestrator`] with the configured defaults and the
//! profile caches. This is the surface the CLI and any RPC layer call into.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::ProfileCache;
use crate::config::EngineConfig;
use crate::engine::{AnalysisOrchestrator, AnalysisReport, AnalysisRequest, AnalysisResult, ScoringPipeline, SourceReport};
use crate::error::{GeoRiskError, Result};
use crate::model::{MarketObservation, NewsItem, Region, RegionRiskProfile, Sector, SectorImpactProfile, TimeWindow};
use crate::scoring::unique_in_order;
use crate::sources::{Dataset, MarketSource, NewsSource};

/// Risk and impact queries with caching
pub struct GeoRiskService {
    orchestrator: AnalysisOrchestrator,
    config: EngineConfig,
    cache: ProfileCache,
}

impl GeoRiskService {
    pub fn new(config: EngineConfig, news: Arc<dyn NewsSource>, market: Arc<dyn MarketSource>) -> Result<Self> {
        Self::with_orchestrator(config, AnalysisOrchestrator::new(news, market))
    }

    /// Service over a fixed in-memory data set
    pub fn from_dataset(config: EngineConfig, dataset: Dataset) -> Result<Self> {
        Self::with_orchestrator(config, AnalysisOrchestrator::from_dataset(dataset))
    }

    pub fn with_orchestrator(config: EngineConfig, orchestrator: AnalysisOrchestrator) -> Result<Self> {
        config.validate()?;
        let cache = ProfileCache::from_config(&config);
        Ok(Self {
            orchestrator,
            config,
            cache,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The configured look-back ending now
    pub fn default_window(&self) -> TimeWindow {
        TimeWindow::last_days(Utc::now(), self.config.default_window_days)
    }

    /// Risk profiles for `regions` in request order over the default window.
    ///
    /// Fresh cached profiles are reused; only the missing regions are
    /// fetched. News is the only input, so a news failure is
    /// [`GeoRiskError::DataUnavailable`].
    pub async fn get_risk_assessment(&self, regions: &[Region]) -> Result<Vec<RegionRiskProfile>> {
        let regions = unique_in_order(regions);
        if regions.is_empty() {
            return Err(GeoRiskError::validation("no regions requested"));
        }

        let mut profiles = HashMap::with_capacity(regions.len());
        let mut missing = Vec::new();
        for region in &regions {
            match self.cache.regions.get(region).await {
                Some(profile) => {
                    profiles.insert(*region, profile);
                }
                None => missing.push(*region),
            }
        }

        if !missing.is_empty() {
            tracing::debug!(?missing, "Scoring regions not in cache");
            let fresh = self
                .orchestrator
                .assess_regions(&self.config, &missing, &self.default_window())
                .await?;
            for profile in fresh {
                self.cache.regions.insert(profile.region, profile.clone()).await;
                profiles.insert(profile.region, profile);
            }
        }

        regions
            .iter()
            .map(|region| {
                profiles
                    .remove(region)
                    .ok_or_else(|| GeoRiskError::validation(format!("no profile produced for {region}")))
            })
            .collect()
    }

    /// Impact profiles for `sectors` in request order over the default
    /// window. Impact is relative within the requested set, so results are
    /// cached per set. An empty request yields an empty answer without a
    /// fetch.
    pub async fn get_market_impact(&self, sectors: &[Sector]) -> Result<Vec<SectorImpactProfile>> {
        let sectors = unique_in_order(sectors);
        if sectors.is_empty() {
            return Ok(Vec::new());
        }

        let window = self.default_window();
        self.cache
            .sectors
            .get_or_fetch(sectors.clone(), || {
                self.orchestrator.assess_sectors(&self.config, &sectors, &window)
            })
            .await
    }

    /// Analyse caller-supplied data for the configured regions and sectors.
    ///
    /// Nothing is fetched. Every item must pass boundary validation. The
    /// window spans the supplied timestamps, or the default window when no
    /// data is given, narrowed to the retention period.
    pub fn generate_analysis(&self, news: &[NewsItem], market: &[MarketObservation]) -> Result<AnalysisResult> {
        for item in news {
            item.validate()?;
        }
        for observation in market {
            observation.validate()?;
        }

        let timestamps: Vec<DateTime<Utc>> = news
            .iter()
            .map(|item| item.published_at)
            .chain(market.iter().map(|obs| obs.timestamp))
            .collect();
        let window = match (timestamps.iter().min(), timestamps.iter().max()) {
            (Some(start), Some(end)) => TimeWindow::new(*start, *end)?,
            _ => self.default_window(),
        }
        .clamp_retention(self.config.data_retention_days);

        let request = AnalysisRequest::new(
            self.config.regions.iter().copied().collect(),
            self.config.sectors.iter().copied().collect(),
            window,
        );

        let pipeline = ScoringPipeline::new(&self.config)?;
        let report = pipeline.analyze(
            &request,
            &window,
            news,
            market,
            SourceReport::supplied(news.len(), market.len()),
        )?;
        Ok(report.result)
    }

    /// Full analysis through the orchestrator. Not cached.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        self.orchestrator.analyze(&self.config, request).await
    }

    /// Run several analyses concurrently. Results keep request order and
    /// one failing request does not affect the others.
    pub async fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Vec<Result<AnalysisReport>> {
        let analyses: Vec<_> = requests.iter().map(|request| self.analyze(request)).collect();
        futures::future::join_all(analyses).await
    }

    /// Drop every cached profile
    pub async fn invalidate_cache(&self) {
        self.cache.clear_all().await;
    }
}
