//! JSON export and import of analysis output
//!
//! Field names follow the serde derives on the result types; enums are
//! written as their variant names and floats round-trip exactly.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// Marker for types that can be exported as JSON documents
pub trait JsonExport: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl JsonExport for crate::engine::AnalysisResult {}
impl JsonExport for crate::engine::AnalysisReport {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{AnalysisReport, AnalysisResult, SourceReport};
    use crate::error::GeoRiskError;
    use crate::model::{
        Recommendation, Region, RegionRiskProfile, RiskLevel, Sector, SectorImpactProfile, TimeWindow, Trend,
    };
    use chrono::{TimeZone, Utc};

    fn result() -> AnalysisResult {
        AnalysisResult {
            summary: "Highest geopolitical risk: Middle East (0.72, High, increasing).".to_string(),
            key_insights: vec!["Middle East: regional conflicts contributes 0.135".to_string()],
            recommendations: vec!["Monitor Energy closely".to_string()],
            risk_level: RiskLevel::High,
            generated_at: Utc.with_ymd_and_hms(2024, 7, 1, 9, 30, 0).unwrap(),
            degraded: false,
        }
    }

    #[test]
    fn test_result_wire_shape() {
        let value: serde_json::Value = serde_json::from_str(&result().to_json().unwrap()).unwrap();
        assert_eq!(value["risk_level"], "High");
        assert_eq!(value["degraded"], false);
        assert_eq!(value["generated_at"], "2024-07-01T09:30:00Z");
        assert!(value["key_insights"].is_array());
    }

    #[test]
    fn test_report_round_trip() {
        let start = Utc.with_ymd_and_hms(2024, 6, 24, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let report = AnalysisReport {
            result: result(),
            regions: vec![RegionRiskProfile {
                region: Region::MiddleEast,
                score: 0.1 + 0.2 + 0.42,
                level: RiskLevel::High,
                factors: Region::MiddleEast.baseline_factors(),
                trend: Trend::Increasing,
            }],
            sectors: vec![SectorImpactProfile {
                sector: Sector::Energy,
                impact: 0.7300000000000001,
                volatility: 0.41,
                sentiment: 1.0 / 3.0,
                volume: 12_345.0,
                recommendation: Recommendation::MonitorClosely,
            }],
            window: TimeWindow::new(start, end).unwrap(),
            sources: SourceReport::supplied(12, 4),
        };

        let json = report.to_json_pretty().unwrap();
        assert!(json.contains("\"trend\": \"increasing\""));
        assert_eq!(AnalysisReport::from_json(&json).unwrap(), report);
    }

    #[test]
    fn test_malformed_import_is_json_error() {
        let err = AnalysisResult::from_json("{\"summary\": 3}").unwrap_err();
        assert!(matches!(err, GeoRiskError::Json(_)));
    }
}
