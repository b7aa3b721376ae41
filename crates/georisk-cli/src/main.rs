//! Command-line interface for the georisk scoring engine
//!
//! Runs the engine over a JSON data set of scored news and market
//! observations and prints tables, or JSON with `--json`.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};
use georisk_engine::{
    AnalysisRequest, AnalysisResult, Dataset, EngineConfig, GeoRiskService, JsonExport, Region,
    RegionRiskProfile, Sector, SectorImpactProfile, TimeWindow,
};
use georisk_utils::LogFormat;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "georisk")]
#[command(about = "Score geopolitical risk and market impact from news and market data", long_about = None)]
struct Args {
    /// JSON file with `news` and `market` arrays
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// JSON engine configuration; defaults plus GEORISK_* variables when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Log output format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Risk profile per region over the configured look-back
    Risk {
        /// Comma separated, e.g. "Middle East,Europe". Defaults to the configured regions.
        #[arg(short, long, value_delimiter = ',')]
        regions: Vec<Region>,
    },
    /// Relative market impact per sector over the configured look-back
    Impact {
        /// Defaults to the configured sectors
        #[arg(short, long, value_delimiter = ',')]
        sectors: Vec<Sector>,
    },
    /// Full analysis report over an explicit window
    Analyze {
        #[arg(short, long, value_delimiter = ',')]
        regions: Vec<Region>,

        #[arg(short, long, value_delimiter = ',')]
        sectors: Vec<Sector>,

        /// Window length in days
        #[arg(long)]
        days: Option<u32>,

        /// Window end (RFC 3339); defaults to now
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
    /// Analyse every item in the data file for the configured scope
    Generate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    georisk_utils::init_tracing_with(args.log_format);

    info!("Starting georisk");

    let config = load_config(args.config.as_deref())?;
    let dataset = load_dataset(args.data.as_deref())?;

    match args.command {
        Command::Risk { regions } => {
            let regions = or_configured(regions, &config.regions);
            let service = GeoRiskService::from_dataset(config, dataset)?;
            let profiles = service.get_risk_assessment(&regions).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                println!("{}", region_table(&profiles));
            }
        }
        Command::Impact { sectors } => {
            let sectors = or_configured(sectors, &config.sectors);
            let service = GeoRiskService::from_dataset(config, dataset)?;
            let profiles = service.get_market_impact(&sectors).await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&profiles)?);
            } else {
                println!("{}", sector_table(&profiles));
            }
        }
        Command::Analyze {
            regions,
            sectors,
            days,
            end,
        } => {
            let regions = or_configured(regions, &config.regions);
            let sectors = or_configured(sectors, &config.sectors);
            let window = TimeWindow::last_days(
                end.unwrap_or_else(Utc::now),
                days.unwrap_or(config.default_window_days),
            );
            let service = GeoRiskService::from_dataset(config, dataset)?;
            let report = service
                .analyze(&AnalysisRequest::new(regions, sectors, window))
                .await?;
            if args.json {
                println!("{}", report.to_json_pretty()?);
            } else {
                println!("{}\n", region_table(&report.regions));
                if !report.sectors.is_empty() {
                    println!("{}\n", sector_table(&report.sectors));
                }
                print_result(&report.result);
            }
        }
        Command::Generate => {
            let service = GeoRiskService::from_dataset(config, Dataset::default())?;
            let result = service.generate_analysis(&dataset.news, &dataset.market)?;
            if args.json {
                println!("{}", result.to_json_pretty()?);
            } else {
                print_result(&result);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::from_env()?);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_dataset(path: Option<&Path>) -> anyhow::Result<Dataset> {
    let Some(path) = path else {
        info!("No data file given, running on an empty data set");
        return Ok(Dataset::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading data {}", path.display()))?;
    let dataset = Dataset::from_json(&raw)
        .with_context(|| format!("parsing data {}", path.display()))?;
    info!(
        news = dataset.news.len(),
        market = dataset.market.len(),
        "Loaded data set"
    );
    Ok(dataset)
}

/// The explicit selection, or the configured set when none was given
fn or_configured<T: Copy>(selected: Vec<T>, configured: &std::collections::BTreeSet<T>) -> Vec<T> {
    if selected.is_empty() {
        configured.iter().copied().collect()
    } else {
        selected
    }
}

fn region_table(profiles: &[RegionRiskProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Region", "Score", "Level", "Trend"]);
    for profile in profiles {
        table.add_row(vec![
            Cell::new(profile.region.name()),
            Cell::new(format!("{:.3}", profile.score)),
            Cell::new(profile.level),
            Cell::new(profile.trend),
        ]);
    }
    table
}

fn sector_table(profiles: &[SectorImpactProfile]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Sector", "Impact", "Volatility", "Sentiment", "Volume", "Recommendation"]);
    for profile in profiles {
        table.add_row(vec![
            Cell::new(profile.sector.name()),
            Cell::new(format!("{:.3}", profile.impact)),
            Cell::new(format!("{:.3}", profile.volatility)),
            Cell::new(format!("{:.3}", profile.sentiment)),
            Cell::new(format!("{:.0}", profile.volume)),
            Cell::new(profile.recommendation),
        ]);
    }
    table
}

fn print_result(result: &AnalysisResult) {
    println!("Risk level: {}", result.risk_level);
    if result.degraded {
        println!("(degraded: partial data)");
    }
    println!("\n{}\n", result.summary);

    println!("Key insights:");
    for insight in &result.key_insights {
        println!("  - {insight}");
    }
    println!("\nRecommendations:");
    for recommendation in &result.recommendations {
        println!("  - {recommendation}");
    }
}
