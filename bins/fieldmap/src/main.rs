//! fieldmap: inspect, analyze and convert KMZ/KML map archives.

mod import;
mod report;

use clap::{Parser, Subcommand};
use fieldmap_cli::output::{format_count, format_duration, Status};
use fieldmap_core::config::Config;
use fieldmap_core::error::exit_codes;
use fieldmap_core::{Error, ErrorCode, Result};
use fieldmap_kmz::{analytics_file_name, analyze_with_options, export_file_name, to_geojson, AnalysisOptions};
use fieldmap_telemetry::{metrics, TelemetryConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fieldmap")]
#[command(about = "Inspect, analyze and convert KMZ/KML map archives")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to .fieldmap.toml, fieldmap.toml or .config/fieldmap.toml)
    #[arg(short, long, global = true, env = "FIELDMAP_CONFIG")]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print collected timings and counters to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the folder tree of an archive
    Parse {
        /// .kmz archive or .kml file
        path: PathBuf,
        /// Print the parsed document as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute placemark statistics, clusters and routes
    Analyze {
        /// .kmz archive or .kml file
        path: PathBuf,
        /// Maximum distance from a cluster seed, in kilometers
        #[arg(long)]
        max_distance_km: Option<f64>,
        /// Print the report as JSON
        #[arg(long, conflicts_with_all = ["output", "save"])]
        json: bool,
        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the JSON report to `<name>_analytics.json` in the output directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Convert placemarks to a GeoJSON FeatureCollection
    Export {
        /// .kmz archive or .kml file
        path: PathBuf,
        /// Destination file (defaults to `<name>.geojson` in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write GeoJSON to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let machine_output = cli.command.machine_output();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report_failure(&e, machine_output)),
    };

    let logging = &config.schema.logging;
    fieldmap_telemetry::init_with_config(TelemetryConfig {
        log_level: if cli.verbose { "debug".to_string() } else { logging.level.clone() },
        show_target: logging.show_target,
        ..TelemetryConfig::default()
    })?;

    if let Some(path) = &config.path {
        tracing::debug!(config = %path, "Loaded configuration");
    }

    let result = match cli.command {
        Commands::Parse { path, json } => run_parse(&path, json, &config),
        Commands::Analyze {
            path,
            max_distance_km,
            json,
            output,
            save,
        } => run_analyze(&path, max_distance_km, json, output, save, &config),
        Commands::Export { path, output, stdout } => run_export(&path, output, stdout, &config),
    };

    if cli.metrics {
        eprintln!("{}", serde_json::to_string_pretty(&metrics().export_json())?);
    }

    let code = match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report_failure(&e, machine_output),
    };
    std::process::exit(code);
}

impl Commands {
    /// Whether stdout carries JSON, in which case failures are reported as JSON too
    fn machine_output(&self) -> bool {
        match self {
            Commands::Parse { json, .. } | Commands::Analyze { json, .. } => *json,
            Commands::Export { stdout, .. } => *stdout,
        }
    }
}

/// Print a failure to stderr and return the matching exit code
///
/// With JSON output the error is written as an `ErrorReport` object so that
/// scripts can read the code and suggestion.
fn report_failure(error: &Error, machine_output: bool) -> i32 {
    let rendered = if machine_output {
        serde_json::to_string(&error.to_report()).ok()
    } else {
        None
    };
    match rendered {
        Some(json) => eprintln!("{}", json),
        None => Status::error(&error.to_string()),
    }
    exit_codes::for_code(error.code)
}

fn run_parse(path: &Path, json: bool, config: &Config) -> Result<()> {
    let doc = import::load(path, config, !json)?;

    if json {
        println!("{}", to_json(&doc, config.schema.general.pretty_json)?);
    } else {
        report::print_tree(&doc);
    }
    Ok(())
}

fn run_analyze(
    path: &Path,
    max_distance_km: Option<f64>,
    json: bool,
    output: Option<PathBuf>,
    save: bool,
    config: &Config,
) -> Result<()> {
    let cluster_max_distance_km =
        max_distance_km.unwrap_or(config.schema.analysis.cluster_max_distance_km);
    if !cluster_max_distance_km.is_finite() || cluster_max_distance_km <= 0.0 {
        return Err(Error::new(
            ErrorCode::InvalidArgument,
            format!("--max-distance-km must be a positive number, got {}", cluster_max_distance_km),
        ));
    }

    let doc = import::load(path, config, !json)?;

    let started = Instant::now();
    let stats = {
        fieldmap_telemetry::timed_span!("analyze");
        analyze_with_options(&doc, &AnalysisOptions { cluster_max_distance_km })
    };
    metrics().increment_by("clusters_formed", stats.clusters.len() as u64);
    tracing::debug!(
        clusters = stats.clusters.len(),
        routes = stats.routes.len(),
        elapsed = %format_duration(started.elapsed()),
        "Analysis finished"
    );

    let destination = match output {
        Some(path) => Some(path),
        None if save => Some(default_destination(config, &analytics_file_name(&doc))),
        None => None,
    };

    if json {
        println!("{}", to_json(&stats, config.schema.general.pretty_json)?);
    } else if let Some(destination) = destination {
        write_output(&destination, &to_json(&stats, config.schema.general.pretty_json)?)?;
        Status::success(&format!("Wrote analytics report to {}", destination.display()));
    } else {
        report::print_stats(&doc, &stats, cluster_max_distance_km);
    }
    Ok(())
}

fn run_export(path: &Path, output: Option<PathBuf>, stdout: bool, config: &Config) -> Result<()> {
    let doc = import::load(path, config, !stdout)?;
    let collection = to_geojson(&doc);

    let body = if config.schema.general.pretty_json {
        collection.to_json_pretty()?
    } else {
        serde_json::to_string(&collection)?
    };

    if stdout {
        println!("{}", body);
        return Ok(());
    }

    let destination = output.unwrap_or_else(|| default_destination(config, &export_file_name(&doc)));
    write_output(&destination, &body)?;
    Status::success(&format!(
        "Exported {} to {}",
        format_count(collection.features.len(), "feature", "features"),
        destination.display()
    ));
    Ok(())
}

fn default_destination(config: &Config, file_name: &str) -> PathBuf {
    Path::new(&config.schema.general.output_dir).join(file_name)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn write_output(destination: &Path, body: &str) -> Result<()> {
    std::fs::write(destination, body).map_err(|e| {
        Error::export(format!("Failed to write {}: {}", destination.display(), e))
            .with_suggestion("Check that the output directory exists and is writable")
            .with_source(e)
    })
}
