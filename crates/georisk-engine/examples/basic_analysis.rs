//! Basic geopolitical risk analysis example
//!
//! Builds a small in-memory data set, then walks through the service calls:
//! region risk, sector impact, a full report and a portfolio roll-up.
//!
//! To run this example:
//! ```bash
//! # Optional: tighten thresholds through the environment
//! export GEORISK_RISK_THRESHOLD=0.6
//!
//! cargo run -p georisk-engine --example basic_analysis
//! ```

use chrono::{Duration, Utc};
use georisk_engine::{
    AnalysisRequest, Dataset, EngineConfig, GeoRiskService, JsonExport, MarketObservation, NewsItem,
    PortfolioPosition, Region, Sector, TimeWindow, portfolio_risk, sector_risk,
};

fn sample_dataset() -> Dataset {
    let now = Utc::now();
    let headlines = [
        (Region::MiddleEast, 3, -0.7, "Shipping lanes disrupted after strikes"),
        (Region::MiddleEast, 1, -0.5, "Ceasefire talks stall"),
        (Region::Europe, 4, 0.2, "EU agrees energy price framework"),
        (Region::Europe, 2, -0.4, "New sanctions package announced"),
        (Region::AsiaPacific, 5, 0.4, "Trade delegation visit eases tensions"),
        (Region::AsiaPacific, 1, -0.6, "Export controls widened on chips"),
        (Region::NorthAmerica, 2, 0.1, "Budget deal reached"),
    ];
    let news = headlines
        .iter()
        .enumerate()
        .map(|(i, (region, days_ago, sentiment, title))| NewsItem {
            id: format!("n{i}"),
            title: title.to_string(),
            source: "Example Wire".to_string(),
            published_at: now - Duration::days(*days_ago),
            region: *region,
            sentiment: *sentiment,
            summary: String::new(),
        })
        .collect();

    let quotes = [
        ("XOM", Sector::Energy, 118.0, 2_400_000.0, 0.55),
        ("CVX", Sector::Energy, 152.0, 1_900_000.0, 0.48),
        ("AAPL", Sector::Technology, 190.0, 5_100_000.0, 0.30),
        ("NVDA", Sector::Technology, 870.0, 4_300_000.0, 0.62),
        ("JPM", Sector::Finance, 196.0, 1_200_000.0, 0.22),
    ];
    let market = quotes
        .iter()
        .map(|(symbol, sector, price, volume, volatility)| MarketObservation {
            symbol: symbol.to_string(),
            sector: *sector,
            timestamp: now - Duration::hours(6),
            price: *price,
            volume: *volume,
            volatility: *volatility,
        })
        .collect();

    Dataset { news, market }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    georisk_utils::init_tracing();

    println!("=== Geopolitical Risk Engine ===\n");

    let config = EngineConfig::builder().with_env()?.build()?;
    println!("Configuration:");
    println!("  - Risk threshold: {}", config.risk_threshold);
    println!("  - News refresh: {:?}", config.news_ttl());
    println!("  - Fetch timeout: {:?}\n", config.fetch_timeout());

    let service = GeoRiskService::from_dataset(config, sample_dataset())?;

    // Example 1: Region risk
    println!("=== 1. Region Risk ===");
    let regions = [Region::MiddleEast, Region::Europe, Region::AsiaPacific, Region::NorthAmerica];
    let profiles = service.get_risk_assessment(&regions).await?;
    for profile in &profiles {
        println!(
            "  {:<14} {:.3}  {:<6} {}",
            profile.region.name(),
            profile.score,
            profile.level,
            profile.trend
        );
    }
    println!();

    // Example 2: Sector impact
    println!("=== 2. Sector Impact ===");
    for profile in service
        .get_market_impact(&[Sector::Energy, Sector::Technology, Sector::Finance])
        .await?
    {
        println!(
            "  {:<14} {:.3}  {}",
            profile.sector.name(),
            profile.impact,
            profile.recommendation
        );
    }
    println!();

    // Example 3: Full report
    println!("=== 3. Full Analysis ===");
    let request = AnalysisRequest::new(
        regions.to_vec(),
        vec![Sector::Energy, Sector::Technology],
        TimeWindow::last_days(Utc::now(), 7),
    );
    let report = service.analyze(&request).await?;
    println!("{}\n", report.result.summary);
    for insight in &report.result.key_insights {
        println!("  * {insight}");
    }
    println!();

    // Example 4: Sector-in-region and portfolio risk
    println!("=== 4. Exposure ===");
    if let Some(middle_east) = profiles.iter().find(|p| p.region == Region::MiddleEast) {
        let energy = sector_risk(Sector::Energy, middle_east);
        println!(
            "  Energy in Middle East: {:.3} ({}) key factors: {:?}",
            energy.score, energy.level, energy.key_factors
        );
    }
    let positions = vec![
        PortfolioPosition {
            symbol: "XOM".to_string(),
            sector: Sector::Energy,
            region: Region::MiddleEast,
            allocation: 0.3,
        },
        PortfolioPosition {
            symbol: "AAPL".to_string(),
            sector: Sector::Technology,
            region: Region::NorthAmerica,
            allocation: 0.7,
        },
    ];
    let portfolio = portfolio_risk(&positions, &profiles)?;
    println!(
        "  Portfolio: weighted {:.3}, level {}, {} of {} positions high risk\n",
        portfolio.weighted_risk, portfolio.risk_level, portfolio.high_risk_positions, portfolio.total_positions
    );

    // Example 5: Export
    println!("=== 5. JSON Export ===");
    println!("{}", report.result.to_json_pretty()?);

    Ok(())
}
