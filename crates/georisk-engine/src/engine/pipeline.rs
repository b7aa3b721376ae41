//! Request-scoped scoring and synthesis
//!
//! Takes already-fetched news and market data and produces profiles and the
//! headline [`AnalysisResult`]. Holds no state beyond the scorers built from
//! the config, so it can run for many requests concurrently.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};

use crate::config::EngineConfig;
use crate::engine::request::AnalysisRequest;
use crate::engine::result::{AnalysisReport, AnalysisResult, SourceReport};
use crate::error::Result;
use crate::model::{
    FactorScores, MarketObservation, NewsItem, Recommendation, Region, RegionRiskProfile,
    RiskFactor, RiskLevel, Sector, SectorImpactProfile, TimeWindow, Trend,
};
use crate::scoring::{
    RegionRiskScorer, SectorImpactScorer, SectorInput, SentimentAggregator, SentimentSummary,
    TrendClassifier, unique_in_order,
};

/// How far a fully negative news flow lifts every baseline factor
const SENTIMENT_RISK_SHIFT: f64 = 0.3;

/// News items needed for full coverage confidence
const FULL_COVERAGE_ITEMS: f64 = 10.0;

/// Regions and sectors named in the summary sentence
const SUMMARY_TOP_N: usize = 2;

const KEY_INSIGHT_COUNT: usize = 3;

/// Scorers configured for one analysis run
pub struct ScoringPipeline<'a> {
    config: &'a EngineConfig,
    aggregator: SentimentAggregator,
    region_scorer: RegionRiskScorer,
    sector_scorer: SectorImpactScorer,
    trend: TrendClassifier,
}

impl<'a> ScoringPipeline<'a> {
    pub fn new(config: &'a EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            aggregator: SentimentAggregator::default(),
            region_scorer: RegionRiskScorer::new(config.weights.clone()),
            sector_scorer: SectorImpactScorer::new(config.impact_weights)?,
            trend: TrendClassifier::new(config.trend_threshold)?,
        })
    }

    /// Raw factor scores for a region: its baseline shifted against the news
    /// mood, so negative coverage raises every factor.
    pub fn derive_factors(region: Region, sentiment: &SentimentSummary) -> FactorScores {
        region
            .baseline_factors()
            .into_iter()
            .map(|(factor, baseline)| {
                let raw = baseline - SENTIMENT_RISK_SHIFT * sentiment.mean_sentiment;
                (factor, raw.clamp(0.0, 1.0))
            })
            .collect()
    }

    /// Share of full coverage the region's news volume provides, in [0, 1]
    pub fn coverage(&self, region: Region, window: &TimeWindow, news: &[NewsItem]) -> f64 {
        let summary = self.aggregator.aggregate_region(news, region, window);
        (summary.count as f64 / FULL_COVERAGE_ITEMS).min(1.0)
    }

    /// Score each requested region. Regions with a factor override use it
    /// verbatim and, having no history, are `Stable`; the rest derive factors
    /// from news and take their trend from the day-by-day score series.
    pub fn region_profiles(
        &self,
        regions: &[Region],
        window: &TimeWindow,
        overrides: &BTreeMap<Region, FactorScores>,
        news: &[NewsItem],
    ) -> Result<Vec<RegionRiskProfile>> {
        let regions = unique_in_order(regions);
        let mut inputs = BTreeMap::new();
        let mut trends = HashMap::new();

        for &region in &regions {
            if let Some(factors) = overrides.get(&region) {
                inputs.insert(region, factors.clone());
                trends.insert(region, Trend::Stable);
                continue;
            }

            let summary = self.aggregator.aggregate_region(news, region, window);
            inputs.insert(region, Self::derive_factors(region, &summary));

            let daily_scores = self
                .aggregator
                .daily(news, region, window)
                .iter()
                .map(|day| self.region_scorer.score(&Self::derive_factors(region, &day.summary)))
                .collect::<Result<Vec<_>>>()?;
            trends.insert(region, self.trend.classify(&daily_scores));
        }

        self.region_scorer.score_regions(&regions, &inputs, &trends)
    }

    /// Score each requested sector against the overall news mood of
    /// `regions` and the sector's market activity inside `window`
    pub fn sector_profiles(
        &self,
        sectors: &[Sector],
        regions: &[Region],
        window: &TimeWindow,
        news: &[NewsItem],
        market: &[MarketObservation],
    ) -> Result<Vec<SectorImpactProfile>> {
        let sentiment = self.aggregator.aggregate(
            news.iter()
                .filter(|item| regions.contains(&item.region) && window.contains(item.published_at)),
        );
        let in_window: Vec<MarketObservation> = market
            .iter()
            .filter(|obs| window.contains(obs.timestamp))
            .cloned()
            .collect();

        let inputs: Vec<SectorInput> = unique_in_order(sectors)
            .into_iter()
            .map(|sector| SectorInput::from_observations(sector, &in_window, sentiment))
            .collect();

        self.sector_scorer.score_sectors(&inputs)
    }

    /// Score everything in `request` and synthesise the headline result
    pub fn analyze(
        &self,
        request: &AnalysisRequest,
        window: &TimeWindow,
        news: &[NewsItem],
        market: &[MarketObservation],
        sources: SourceReport,
    ) -> Result<AnalysisReport> {
        request.validate()?;

        let regions = self.region_profiles(&request.regions, window, &request.factor_overrides, news)?;
        let sectors = self.sector_profiles(&request.sectors, &request.regions, window, news, market)?;

        let thin_coverage: Vec<Region> = regions
            .iter()
            .map(|p| p.region)
            .filter(|region| {
                !request.factor_overrides.contains_key(region)
                    && self.coverage(*region, window, news) < self.config.confidence_threshold
            })
            .collect();

        let result = self.synthesize(&regions, &sectors, &thin_coverage, &sources);

        tracing::info!(
            regions = regions.len(),
            sectors = sectors.len(),
            risk_level = %result.risk_level,
            degraded = result.degraded,
            "analysis complete"
        );

        Ok(AnalysisReport {
            result,
            regions,
            sectors,
            window: *window,
            sources,
        })
    }

    fn synthesize(
        &self,
        regions: &[RegionRiskProfile],
        sectors: &[SectorImpactProfile],
        thin_coverage: &[Region],
        sources: &SourceReport,
    ) -> AnalysisResult {
        let risk_level = regions.iter().map(|p| p.level).max().unwrap_or(RiskLevel::Low);

        let ranked_regions = rank_by(regions, |p| p.score);
        let ranked_sectors = rank_by(sectors, |p| p.impact);

        let mut summary = format!(
            "Highest geopolitical risk: {}.",
            ranked_regions
                .iter()
                .take(SUMMARY_TOP_N)
                .map(|p| format!("{} ({:.2}, {}, {})", p.region, p.score, p.level, p.trend))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !ranked_sectors.is_empty() {
            summary.push_str(&format!(
                " Most impacted sectors: {}.",
                ranked_sectors
                    .iter()
                    .take(SUMMARY_TOP_N)
                    .map(|p| format!("{} ({:.2}, {})", p.sector, p.impact, p.recommendation))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        summary.push_str(&format!(" Overall risk level: {risk_level}."));
        if !thin_coverage.is_empty() {
            summary.push_str(&format!(
                " Limited news coverage for {}.",
                thin_coverage.iter().map(Region::name).collect::<Vec<_>>().join(", ")
            ));
        }
        for failure in sources.failures() {
            summary.push_str(&format!(" Partial data: {failure}."));
        }

        AnalysisResult {
            summary,
            key_insights: self.key_insights(regions),
            recommendations: self.recommendations(&ranked_regions, &ranked_sectors),
            risk_level,
            generated_at: Utc::now(),
            degraded: sources.is_degraded(),
        }
    }

    /// The largest (region, factor) contributions to any region score
    fn key_insights(&self, regions: &[RegionRiskProfile]) -> Vec<String> {
        let mut contributions: Vec<(Region, RiskFactor, f64)> = regions
            .iter()
            .flat_map(|profile| {
                self.region_scorer
                    .contributions(&profile.factors)
                    .into_iter()
                    .map(move |(factor, contribution)| (profile.region, factor, contribution))
            })
            .filter(|(_, _, contribution)| *contribution > 0.0)
            .collect();

        // Stable sort: ties keep region request order, then factor order
        contributions.sort_by(|a, b| b.2.total_cmp(&a.2));

        contributions
            .into_iter()
            .take(KEY_INSIGHT_COUNT)
            .map(|(region, factor, contribution)| {
                let raw = regions
                    .iter()
                    .find(|p| p.region == region)
                    .and_then(|p| p.factors.get(&factor))
                    .copied()
                    .unwrap_or(0.0);
                format!(
                    "{region}: {factor} contributes {contribution:.3} to the risk score (raw {raw:.2} × weight {:.2})",
                    self.region_scorer.weights().get(factor)
                )
            })
            .collect()
    }

    fn recommendations(
        &self,
        ranked_regions: &[&RegionRiskProfile],
        ranked_sectors: &[&SectorImpactProfile],
    ) -> Vec<String> {
        let mut recommendations: Vec<String> = ranked_sectors
            .iter()
            .map(|p| match p.recommendation {
                Recommendation::MonitorClosely => format!(
                    "Monitor {} closely: impact {:.2} with volatility {:.2}",
                    p.sector, p.impact, p.volatility
                ),
                Recommendation::Watch => {
                    format!("Watch {}: impact {:.2} is elevated", p.sector, p.impact)
                }
                Recommendation::Stable => format!(
                    "{} is stable (impact {:.2}); maintain current allocation",
                    p.sector, p.impact
                ),
            })
            .collect();

        recommendations.extend(ranked_regions.iter().map(|p| {
            format!("{} ({} risk): {}", p.region, p.level, p.level.playbook().join("; "))
        }));

        recommendations.extend(
            ranked_regions
                .iter()
                .filter(|p| p.score >= self.config.risk_threshold)
                .map(|p| {
                    format!(
                        "Reduce exposure to {} (risk {:.2}); track {}",
                        p.region,
                        p.score,
                        p.region.key_indicators().join(", ").to_lowercase()
                    )
                }),
        );

        recommendations
    }
}

/// Items ordered by `key` descending; equal keys keep input order
fn rank_by<T>(items: &[T], key: impl Fn(&T) -> f64) -> Vec<&T> {
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
}
