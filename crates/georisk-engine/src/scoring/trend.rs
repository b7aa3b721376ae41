//! Trend labelling between successive score snapshots

use crate::error::{GeoRiskError, Result};
use crate::model::Trend;

/// Absolute change below which a score counts as unchanged
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.03;

/// Labels the latest move in a score series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendClassifier {
    threshold: f64,
}

impl Default for TrendClassifier {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_TREND_THRESHOLD,
        }
    }
}

impl TrendClassifier {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(GeoRiskError::config(format!(
                "trend threshold must be a non-negative number, got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify `snapshots` ordered oldest to newest by comparing the last
    /// two. Fewer than two snapshots is `Stable`.
    pub fn classify(&self, snapshots: &[f64]) -> Trend {
        let [.., previous, latest] = snapshots else {
            return Trend::Stable;
        };

        let delta = latest - previous;
        // With a zero threshold an unchanged score is still stable
        if delta.abs() < self.threshold || delta == 0.0 {
            Trend::Stable
        } else if delta > 0.0 {
            Trend::Increasing
        } else {
            Trend::Decreasing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_direction() {
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&[0.4, 0.5]), Trend::Increasing);
        assert_eq!(classifier.classify(&[0.5, 0.4]), Trend::Decreasing);
        assert_eq!(classifier.classify(&[0.5, 0.52]), Trend::Stable);
        assert_eq!(classifier.classify(&[0.5, 0.48]), Trend::Stable);
    }

    #[test]
    fn test_only_last_two_matter() {
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&[0.9, 0.1, 0.2]), Trend::Increasing);
    }

    #[test]
    fn test_insufficient_history_is_stable() {
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&[]), Trend::Stable);
        assert_eq!(classifier.classify(&[0.8]), Trend::Stable);
    }

    #[test]
    fn test_repeated_snapshot_is_stable() {
        let classifier = TrendClassifier::default();
        assert_eq!(classifier.classify(&[0.63, 0.63]), Trend::Stable);
        assert_eq!(classifier.classify(&[0.63, 0.63, 0.63]), Trend::Stable);
    }

    #[test]
    fn test_custom_threshold() {
        let classifier = TrendClassifier::new(0.1).unwrap();
        assert_eq!(classifier.classify(&[0.4, 0.48]), Trend::Stable);
        assert_eq!(classifier.classify(&[0.4, 0.55]), Trend::Increasing);

        let zero = TrendClassifier::new(0.0).unwrap();
        assert_eq!(zero.classify(&[0.4, 0.4]), Trend::Stable);
        assert!(TrendClassifier::new(-0.1).is_err());
    }
}
