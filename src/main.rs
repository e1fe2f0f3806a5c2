use analytics::{Forecast, magnitude_exceedance_probability};
use analyzer::{AnalysisResult, SeismicAnalyzer};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Table, presets::UTF8_FULL};
use core_types::catalog::parse_geojson;
use core_types::{AnalysisRequest, GeoPoint};
use std::path::PathBuf;

/// The main entry point for the Quakescope seismicity analyzer.
fn main() -> anyhow::Result<()> {
    // Pick up RUST_LOG and QUAKESCOPE__* overrides from a .env file when present.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let _log_guard = configuration::init_tracing(cli.log_dir.as_deref())?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
        Commands::Probability(args) => handle_probability(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Statistical assessment of regional earthquake activity.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a GeoJSON earthquake catalog around a point.
    Analyze(AnalyzeArgs),
    /// Compute a Gutenberg-Richter exceedance probability.
    Probability(ProbabilityArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to a GeoJSON FeatureCollection (USGS feed format).
    #[arg(long)]
    catalog: PathBuf,

    /// Latitude of the region center in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the region center in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// Radius of the region in kilometres.
    #[arg(long)]
    radius_km: f64,

    /// Length of the analysis window in days, ending at --as-of.
    #[arg(long, default_value_t = 30.0)]
    days: f64,

    /// Ignore events below this magnitude.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    min_magnitude: f64,

    /// End of the analysis window (RFC 3339). Defaults to now.
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,

    /// Analysis configuration file (TOML). Defaults to ./quakescope.toml if present.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Parser)]
struct ProbabilityArgs {
    /// Annual Gutenberg-Richter a-value.
    #[arg(long, allow_hyphen_values = true)]
    a: f64,

    /// Gutenberg-Richter b-value.
    #[arg(long)]
    b: f64,

    /// Magnitude threshold.
    #[arg(long, allow_hyphen_values = true)]
    magnitude: f64,

    /// Forecast horizon in days.
    #[arg(long, default_value_t = 30.0)]
    horizon_days: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let payload = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("Failed to read catalog {}", args.catalog.display()))?;
    let catalog =
        parse_geojson(&payload).context("Catalog is not a GeoJSON FeatureCollection")?;
    if catalog.skipped > 0 {
        tracing::warn!(
            skipped = catalog.skipped,
            "Catalog features without time, position or magnitude were ignored."
        );
    }

    let config = configuration::load_config(args.config.as_deref())
        .context("Failed to load configuration")?;

    let mut request = AnalysisRequest::new(
        GeoPoint::new(args.lat, args.lon),
        args.radius_km,
        args.days,
        args.min_magnitude,
    );
    if let Some(as_of) = args.as_of {
        request = request.with_as_of(as_of);
    }

    let analyzer = SeismicAnalyzer::new(config)?;
    let result = analyzer.analyze(&request, &catalog.events)?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Table => print_tables(&result),
    }
    Ok(())
}

fn handle_probability(args: ProbabilityArgs) -> anyhow::Result<()> {
    let p = magnitude_exceedance_probability(args.a, args.b, args.magnitude, args.horizon_days);
    println!(
        "P(M >= {:.1} within {} days) = {:.6}",
        args.magnitude, args.horizon_days, p
    );
    Ok(())
}

fn print_tables(result: &AnalysisResult) {
    let fmt_opt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
    let gr = &result.gutenberg_richter;

    let mut summary = Table::new();
    summary.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    summary
        .add_row(vec![
            "Window".to_string(),
            format!(
                "{} -> {}",
                result.window_start.format("%Y-%m-%d %H:%M"),
                result.window_end.format("%Y-%m-%d %H:%M")
            ),
        ])
        .add_row(vec![
            "Events".to_string(),
            format!(
                "{} ({} malformed skipped)",
                result.total_events, result.dropped_events
            ),
        ])
        .add_row(vec![
            "Average magnitude".to_string(),
            format!("{:.2}", result.average_magnitude),
        ])
        .add_row(vec![
            "Largest magnitude".to_string(),
            format!("{:.1}", result.largest_magnitude),
        ])
        .add_row(vec!["Daily rate".to_string(), format!("{:.2}", result.daily_rate)])
        .add_row(vec![
            "Depth (shallow/intermediate/deep)".to_string(),
            format!(
                "{}/{}/{} (mean {:.1} km)",
                result.depth_stats.shallow,
                result.depth_stats.intermediate,
                result.depth_stats.deep,
                result.depth_stats.mean_depth_km
            ),
        ])
        .add_row(vec![
            "Temporal pattern".to_string(),
            format!(
                "{} (ratio {})",
                result.temporal_pattern.trend,
                fmt_opt(result.temporal_pattern.rate_ratio)
            ),
        ])
        .add_row(vec![
            "Spatial clustering".to_string(),
            format!(
                "{} ({:.0}% within {} km)",
                result.spatial_clustering.class,
                result.spatial_clustering.percentage_within_radius,
                result.spatial_clustering.clustering_radius_km
            ),
        ])
        .add_row(vec![
            "Gutenberg-Richter".to_string(),
            format!(
                "b={} a={} Mc={} confidence={:.2}",
                fmt_opt(gr.b_value),
                fmt_opt(gr.a_value),
                fmt_opt(gr.completeness_magnitude),
                gr.fit_confidence
            ),
        ])
        .add_row(vec![
            "Risk".to_string(),
            format!("{} (score {:.2})", result.risk_level, result.risk_score),
        ])
        .add_row(vec![
            "Risk factors".to_string(),
            if result.risk_factors.is_empty() {
                "none".to_string()
            } else {
                result
                    .risk_factors
                    .iter()
                    .map(|f| f.description())
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        ]);
    println!("{summary}");

    if let Some(Forecast::Available {
        horizon_days,
        buckets,
        ..
    }) = &result.forecast
    {
        let mut forecast = Table::new();
        forecast.load_preset(UTF8_FULL).set_header(vec![
            "Magnitude".to_string(),
            "Expected events".to_string(),
            format!("P within {horizon_days} d"),
        ]);
        for bucket in buckets {
            forecast.add_row(vec![
                format!(">= {:.1}", bucket.magnitude),
                format!("{:.4}", bucket.expected_events),
                format!("{:.4}", bucket.probability),
            ]);
        }
        println!("{forecast}");
    } else if let Some(Forecast::InsufficientData { reason }) = &result.forecast {
        println!("Forecast: {reason}");
    }

    for (i, recommendation) in result.recommendations.iter().enumerate() {
        println!("{}. {}", i + 1, recommendation);
    }
}
