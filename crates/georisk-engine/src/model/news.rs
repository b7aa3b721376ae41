//! Scored news items and time windows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GeoRiskError, Result};
use crate::model::region::Region;

/// A news item pre-scored by an upstream sentiment analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub region: Region,
    /// Polarity in [-1, 1]
    pub sentiment: f64,
    pub summary: String,
}

impl NewsItem {
    /// Check the sentiment polarity is a finite value in [-1, 1]
    pub fn validate(&self) -> Result<()> {
        if !self.sentiment.is_finite() || !(-1.0..=1.0).contains(&self.sentiment) {
            return Err(GeoRiskError::validation(format!(
                "news item {} has sentiment {} outside [-1, 1]",
                self.id, self.sentiment
            )));
        }
        Ok(())
    }
}

/// Inclusive `[start, end]` time range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(GeoRiskError::validation(format!(
                "time window start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to `end`
    pub fn last_days(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: days_before(end, days),
            end,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Narrow the window so it reaches back at most `retention_days` from its end
    pub fn clamp_retention(&self, retention_days: u32) -> Self {
        let earliest = days_before(self.end, retention_days);
        Self {
            start: self.start.max(earliest),
            end: self.end,
        }
    }
}

/// `days` before `at`, saturating at the earliest representable instant
fn days_before(at: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    at.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    fn item(sentiment: f64) -> NewsItem {
        NewsItem {
            id: "n1".to_string(),
            title: "Summit concludes".to_string(),
            source: "Wire".to_string(),
            published_at: at(1),
            region: Region::Europe,
            sentiment,
            summary: String::new(),
        }
    }

    #[test]
    fn test_news_validation() {
        assert!(item(-1.0).validate().is_ok());
        assert!(item(1.0).validate().is_ok());
        assert!(item(1.01).validate().is_err());
        assert!(item(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        assert!(TimeWindow::new(at(5), at(1)).is_err());
        assert!(TimeWindow::new(at(1), at(1)).is_ok());
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TimeWindow::new(at(1), at(3)).unwrap();
        assert!(window.contains(at(1)));
        assert!(window.contains(at(3)));
        assert!(!window.contains(at(4)));
    }

    #[test]
    fn test_clamp_retention() {
        let window = TimeWindow::new(at(1), at(10)).unwrap();
        let clamped = window.clamp_retention(3);
        assert_eq!(clamped.start, at(7));
        assert_eq!(clamped.end, at(10));

        // A window already inside retention is unchanged
        assert_eq!(window.clamp_retention(30), window);
    }

    #[test]
    fn test_huge_day_counts_saturate() {
        let window = TimeWindow::last_days(at(10), u32::MAX);
        assert_eq!(window.start, DateTime::<Utc>::MIN_UTC);
        assert_eq!(window.end, at(10));

        let narrow = TimeWindow::new(at(1), at(10)).unwrap();
        assert_eq!(narrow.clamp_retention(100_000_000), narrow);
    }

    #[test]
    fn test_last_days() {
        let window = TimeWindow::last_days(at(10), 2);
        assert_eq!(window.start, at(8));
    }
}
