//! Sector-in-region risk and portfolio roll-ups

use serde::{Deserialize, Serialize};

use crate::error::{GeoRiskError, Result};
use crate::model::{Region, RegionRiskProfile, RiskFactor, RiskLevel, Sector};

/// How much a sector's sensitivities can move it off the region score
const SENSITIVITY_SCALE: f64 = 0.2;

/// Risk for one sector operating inside one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRiskAssessment {
    pub sector: Sector,
    pub region: Region,
    pub score: f64,
    pub level: RiskLevel,
    pub key_factors: Vec<String>,
}

/// A holding tagged with the sector and region it is exposed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    pub sector: Sector,
    pub region: Region,
    /// Relative weight; need not sum to 1 across positions
    pub allocation: f64,
}

/// Aggregate geopolitical risk of a set of positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRisk {
    pub average_risk: f64,
    pub weighted_risk: f64,
    pub risk_level: RiskLevel,
    pub total_positions: usize,
    /// Positions whose sector-in-region score is above 0.7
    pub high_risk_positions: usize,
}

/// Shift the region score by the sector's factor sensitivities.
///
/// Each sensitive factor moves the score by `(raw - 0.5) × sensitivity × 0.2`,
/// so a factor sitting at 0.5 (or absent from the profile) has no effect.
pub fn sector_risk(sector: Sector, profile: &RegionRiskProfile) -> SectorRiskAssessment {
    let raw = |factor: RiskFactor| profile.factors.get(&factor).copied().unwrap_or(0.5);

    let adjustment: f64 = sector
        .sensitivities()
        .iter()
        .map(|(factor, sensitivity)| (raw(*factor) - 0.5) * sensitivity * SENSITIVITY_SCALE)
        .sum();
    let score = (profile.score + adjustment).clamp(0.0, 1.0);

    let mut key_factors: Vec<String> = sector
        .sensitivities()
        .iter()
        .filter(|(factor, sensitivity)| *sensitivity > 0.7 && raw(*factor) > 0.6)
        .map(|(factor, _)| format!("High {} risk", factor.label()))
        .collect();
    key_factors.extend(sector.standing_risks().into_iter().map(String::from));
    if key_factors.is_empty() {
        key_factors.push("Moderate risk factors".to_string());
    }

    SectorRiskAssessment {
        sector,
        region: profile.region,
        score,
        level: RiskLevel::from_score(score),
        key_factors,
    }
}

/// Roll sector-in-region risk up across positions.
///
/// Every position's region must have a profile in `profiles`.
pub fn portfolio_risk(
    positions: &[PortfolioPosition],
    profiles: &[RegionRiskProfile],
) -> Result<PortfolioRisk> {
    if positions.is_empty() {
        return Err(GeoRiskError::validation("portfolio has no positions"));
    }

    let mut total_risk = 0.0;
    let mut weighted_risk = 0.0;
    let mut total_allocation = 0.0;
    let mut high_risk_positions = 0;

    for position in positions {
        if !position.allocation.is_finite() || position.allocation < 0.0 {
            return Err(GeoRiskError::validation(format!(
                "position {} has invalid allocation {}",
                position.symbol, position.allocation
            )));
        }

        let profile = profiles
            .iter()
            .find(|p| p.region == position.region)
            .ok_or_else(|| {
                GeoRiskError::validation(format!(
                    "no risk profile for region {} of position {}",
                    position.region, position.symbol
                ))
            })?;

        let assessment = sector_risk(position.sector, profile);
        total_risk += assessment.score;
        weighted_risk += assessment.score * position.allocation;
        total_allocation += position.allocation;
        if assessment.score > 0.7 {
            high_risk_positions += 1;
        }
    }

    if total_allocation <= 0.0 {
        return Err(GeoRiskError::validation("portfolio allocations sum to zero"));
    }

    let weighted_risk = weighted_risk / total_allocation;
    Ok(PortfolioRisk {
        average_risk: total_risk / positions.len() as f64,
        weighted_risk,
        risk_level: RiskLevel::from_score(weighted_risk),
        total_positions: positions.len(),
        high_risk_positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FactorScores, Trend};
    use crate::scoring::RegionRiskScorer;

    fn profile(region: Region, factors: FactorScores) -> RegionRiskProfile {
        RegionRiskScorer::default()
            .profile(region, &factors, Trend::Stable)
            .unwrap()
    }

    fn neutral() -> FactorScores {
        RiskFactor::all().into_iter().map(|f| (f, 0.5)).collect()
    }

    #[test]
    fn test_neutral_factors_leave_score_unchanged() {
        let p = profile(Region::Europe, neutral());
        let assessment = sector_risk(Sector::Energy, &p);
        assert!((assessment.score - p.score).abs() < 1e-12);
        assert_eq!(assessment.region, Region::Europe);
    }

    #[test]
    fn test_sensitive_factor_raises_score() {
        let mut factors = neutral();
        factors.insert(RiskFactor::RegionalConflicts, 0.9);
        let p = profile(Region::MiddleEast, factors);

        let energy = sector_risk(Sector::Energy, &p);
        let healthcare = sector_risk(Sector::Healthcare, &p);

        // Energy: (0.9 - 0.5) × 0.8 × 0.2
        assert!((energy.score - (p.score + 0.064)).abs() < 1e-9);
        assert!((healthcare.score - p.score).abs() < 1e-12);
        assert!(energy.key_factors.contains(&"High regional conflicts risk".to_string()));
        assert!(energy.key_factors.contains(&"Oil price volatility".to_string()));
        assert_eq!(healthcare.key_factors, vec!["Moderate risk factors".to_string()]);
    }

    #[test]
    fn test_portfolio_risk() {
        let europe = profile(Region::Europe, neutral());
        let mut hot = neutral();
        hot.insert(RiskFactor::PoliticalStability, 1.0);
        hot.insert(RiskFactor::DiplomaticRelations, 1.0);
        hot.insert(RiskFactor::RegionalConflicts, 1.0);
        let middle_east = profile(Region::MiddleEast, hot);

        let positions = vec![
            PortfolioPosition {
                symbol: "SAP".to_string(),
                sector: Sector::Technology,
                region: Region::Europe,
                allocation: 3.0,
            },
            PortfolioPosition {
                symbol: "ARAMCO".to_string(),
                sector: Sector::Energy,
                region: Region::MiddleEast,
                allocation: 1.0,
            },
        ];

        let risk = portfolio_risk(&positions, &[europe.clone(), middle_east.clone()]).unwrap();
        let energy = sector_risk(Sector::Energy, &middle_east).score;
        let tech = sector_risk(Sector::Technology, &europe).score;

        assert_eq!(risk.total_positions, 2);
        assert!((risk.average_risk - (energy + tech) / 2.0).abs() < 1e-12);
        assert!((risk.weighted_risk - (3.0 * tech + energy) / 4.0).abs() < 1e-12);
        assert_eq!(risk.high_risk_positions, usize::from(energy > 0.7));
    }

    #[test]
    fn test_portfolio_requires_profiles() {
        let positions = vec![PortfolioPosition {
            symbol: "PBR".to_string(),
            sector: Sector::Energy,
            region: Region::LatinAmerica,
            allocation: 1.0,
        }];
        let err = portfolio_risk(&positions, &[]).unwrap_err();
        assert!(matches!(err, GeoRiskError::Validation(_)));
        assert!(portfolio_risk(&[], &[]).is_err());
    }

    #[test]
    fn test_zero_allocation_rejected() {
        let europe = profile(Region::Europe, neutral());
        let positions = vec![PortfolioPosition {
            symbol: "SAP".to_string(),
            sector: Sector::Technology,
            region: Region::Europe,
            allocation: 0.0,
        }];
        assert!(portfolio_risk(&positions, &[europe]).is_err());
    }
}
