//! Configuration for risk scoring operations
//!
//! An [`EngineConfig`] is immutable once built and is handed to the
//! orchestrator on every call; nothing in the engine reads ambient settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{GeoRiskError, Result};
use crate::model::{Region, RiskFactorWeights, Sector};
use crate::scoring::{DEFAULT_TREND_THRESHOLD, ImpactWeights};

/// Configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Regions analysed when a caller does not name any
    pub regions: BTreeSet<Region>,

    /// Sectors analysed when a caller does not name any
    pub sectors: BTreeSet<Sector>,

    /// Refresh interval (cache TTL) for news-derived profiles
    pub refresh_interval_seconds: u64,

    /// Refresh interval (cache TTL) for market-derived profiles
    pub market_refresh_interval_seconds: u64,

    /// Oldest data considered, counted back from the end of the window
    pub data_retention_days: u32,

    /// Regions scoring at or above this get an explicit alert
    pub risk_threshold: f64,

    /// News coverage confidence below this is reported as limited
    pub confidence_threshold: f64,

    /// Deadline for each collaborator call
    pub fetch_timeout_ms: u64,

    /// Minimum score change that counts as a trend
    pub trend_threshold: f64,

    /// Window length used by the transport calls that take no window
    pub default_window_days: u32,

    pub weights: RiskFactorWeights,

    pub impact_weights: ImpactWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regions: BTreeSet::from([Region::NorthAmerica, Region::Europe, Region::AsiaPacific]),
            sectors: BTreeSet::from([Sector::Technology, Sector::Energy, Sector::Finance]),
            refresh_interval_seconds: 300, // 5 minutes
            market_refresh_interval_seconds: 60, // 1 minute
            data_retention_days: 30,
            risk_threshold: 0.7,
            confidence_threshold: 0.8,
            fetch_timeout_ms: 5_000,
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            default_window_days: 7,
            weights: RiskFactorWeights::default(),
            impact_weights: ImpactWeights::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Defaults overridden by `GEORISK_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            return Err(GeoRiskError::config("at least one region must be configured"));
        }

        for (name, value) in [
            ("risk_threshold", self.risk_threshold),
            ("confidence_threshold", self.confidence_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(GeoRiskError::config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }

        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(GeoRiskError::config(format!(
                "trend_threshold must be non-negative, got {}",
                self.trend_threshold
            )));
        }

        if self.refresh_interval_seconds == 0 || self.market_refresh_interval_seconds == 0 {
            return Err(GeoRiskError::config("refresh intervals must be greater than 0"));
        }

        if self.fetch_timeout_ms == 0 {
            return Err(GeoRiskError::config("fetch_timeout_ms must be greater than 0"));
        }

        if self.data_retention_days == 0 || self.default_window_days == 0 {
            return Err(GeoRiskError::config(
                "data_retention_days and default_window_days must be greater than 0",
            ));
        }

        self.impact_weights.validate()
    }

    pub fn news_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn market_ttl(&self) -> Duration {
        Duration::from_secs(self.market_refresh_interval_seconds)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    regions: Option<BTreeSet<Region>>,
    sectors: Option<BTreeSet<Sector>>,
    refresh_interval_seconds: Option<u64>,
    market_refresh_interval_seconds: Option<u64>,
    data_retention_days: Option<u32>,
    risk_threshold: Option<f64>,
    confidence_threshold: Option<f64>,
    fetch_timeout_ms: Option<u64>,
    trend_threshold: Option<f64>,
    default_window_days: Option<u32>,
    weights: Option<RiskFactorWeights>,
    impact_weights: Option<ImpactWeights>,
}

impl EngineConfigBuilder {
    /// Set the default regions
    pub fn regions(mut self, regions: impl IntoIterator<Item = Region>) -> Self {
        self.regions = Some(regions.into_iter().collect());
        self
    }

    /// Set the default sectors
    pub fn sectors(mut self, sectors: impl IntoIterator<Item = Sector>) -> Self {
        self.sectors = Some(sectors.into_iter().collect());
        self
    }

    /// Set the news refresh interval
    pub fn refresh_interval_seconds(mut self, seconds: u64) -> Self {
        self.refresh_interval_seconds = Some(seconds);
        self
    }

    /// Set the market refresh interval
    pub fn market_refresh_interval_seconds(mut self, seconds: u64) -> Self {
        self.market_refresh_interval_seconds = Some(seconds);
        self
    }

    pub fn data_retention_days(mut self, days: u32) -> Self {
        self.data_retention_days = Some(days);
        self
    }

    pub fn risk_threshold(mut self, threshold: f64) -> Self {
        self.risk_threshold = Some(threshold);
        self
    }

    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = Some(threshold);
        self
    }

    /// Set the per-collaborator deadline
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn trend_threshold(mut self, threshold: f64) -> Self {
        self.trend_threshold = Some(threshold);
        self
    }

    pub fn default_window_days(mut self, days: u32) -> Self {
        self.default_window_days = Some(days);
        self
    }

    pub fn weights(mut self, weights: RiskFactorWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn impact_weights(mut self, weights: ImpactWeights) -> Self {
        self.impact_weights = Some(weights);
        self
    }

    /// Apply `GEORISK_*` environment overrides. Unparsable values are a
    /// configuration error rather than being ignored.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(v) = env_var("GEORISK_REFRESH_INTERVAL")? {
            self.refresh_interval_seconds = Some(v);
        }
        if let Some(v) = env_var("GEORISK_MARKET_REFRESH_INTERVAL")? {
            self.market_refresh_interval_seconds = Some(v);
        }
        if let Some(v) = env_var("GEORISK_DATA_RETENTION_DAYS")? {
            self.data_retention_days = Some(v);
        }
        if let Some(v) = env_var("GEORISK_RISK_THRESHOLD")? {
            self.risk_threshold = Some(v);
        }
        if let Some(v) = env_var("GEORISK_CONFIDENCE_THRESHOLD")? {
            self.confidence_threshold = Some(v);
        }
        if let Some(v) = env_var("GEORISK_FETCH_TIMEOUT_MS")? {
            self.fetch_timeout_ms = Some(v);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            regions: self.regions.unwrap_or(defaults.regions),
            sectors: self.sectors.unwrap_or(defaults.sectors),
            refresh_interval_seconds: self
                .refresh_interval_seconds
                .unwrap_or(defaults.refresh_interval_seconds),
            market_refresh_interval_seconds: self
                .market_refresh_interval_seconds
                .unwrap_or(defaults.market_refresh_interval_seconds),
            data_retention_days: self.data_retention_days.unwrap_or(defaults.data_retention_days),
            risk_threshold: self.risk_threshold.unwrap_or(defaults.risk_threshold),
            confidence_threshold: self.confidence_threshold.unwrap_or(defaults.confidence_threshold),
            fetch_timeout_ms: self.fetch_timeout_ms.unwrap_or(defaults.fetch_timeout_ms),
            trend_threshold: self.trend_threshold.unwrap_or(defaults.trend_threshold),
            default_window_days: self.default_window_days.unwrap_or(defaults.default_window_days),
            weights: self.weights.unwrap_or(defaults.weights),
            impact_weights: self.impact_weights.unwrap_or(defaults.impact_weights),
        };

        config.validate()?;
        Ok(config)
    }
}

fn env_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GeoRiskError::config(format!("{name} has invalid value {raw:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.refresh_interval_seconds, 300);
        assert_eq!(config.market_ttl(), Duration::from_secs(60));
        assert_eq!(config.risk_threshold, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::builder()
            .regions([Region::MiddleEast, Region::Africa])
            .sectors([Sector::Energy])
            .fetch_timeout(Duration::from_millis(750))
            .risk_threshold(0.6)
            .build()
            .unwrap();

        assert_eq!(config.regions.len(), 2);
        assert_eq!(config.fetch_timeout(), Duration::from_millis(750));
        assert_eq!(config.risk_threshold, 0.6);
    }

    #[test]
    fn test_fetch_timeout_saturates() {
        let config = EngineConfig::builder()
            .fetch_timeout(Duration::MAX)
            .build()
            .unwrap();
        assert_eq!(config.fetch_timeout_ms, u64::MAX);
    }

    #[test]
    fn test_validation_errors_are_configuration() {
        let bad = [
            EngineConfig::builder().regions(Vec::new()).build(),
            EngineConfig::builder().risk_threshold(1.5).build(),
            EngineConfig::builder().confidence_threshold(-0.1).build(),
            EngineConfig::builder().refresh_interval_seconds(0).build(),
            EngineConfig::builder().fetch_timeout(Duration::ZERO).build(),
            EngineConfig::builder().trend_threshold(f64::NAN).build(),
            EngineConfig::builder()
                .impact_weights(ImpactWeights {
                    sentiment: 1.0,
                    volatility: 1.0,
                    volume: 1.0,
                })
                .build(),
        ];

        for result in bad {
            assert!(matches!(result, Err(GeoRiskError::Configuration(_))));
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"regions": ["MiddleEast"], "risk_threshold": 0.5}"#).unwrap();
        assert_eq!(config.regions, BTreeSet::from([Region::MiddleEast]));
        assert_eq!(config.risk_threshold, 0.5);
        assert_eq!(config.refresh_interval_seconds, 300);
    }

    #[test]
    fn test_json_with_bad_weights_rejected() {
        let result = serde_json::from_str::<EngineConfig>(r#"{"weights": {"political_stability": 0.3}}"#);
        assert!(result.is_err());
    }
}
