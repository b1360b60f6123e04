//! Restore Projection Binary
//!
//! Reads a resolved restore (project, graphs and package contents) as JSON,
//! projects every graph into a manifest target and aggregates the project's
//! build-integration files. The result is printed to stdout as JSON; logs go
//! to stderr.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RESTORE_PROJECTION_INPUT`: input file (default: stdin)
//! - `NUGET_XPROJ_WRITE_TARGETS`: aggregate build files for non-msbuild projects
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! RESTORE_PROJECTION_INPUT=restore.json cargo run --bin restore_projection
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use restore_projection::{
    BuildAssetsResult, FolderRepository, InMemoryPackageSource, ManifestBuilder, ManifestTarget,
    ProjectAssetAggregator, ProjectSpec, ProjectionConfig, ResolvedGraph, PROJECTION_SCHEMA_VERSION,
};

/// Restore input document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestoreInput {
    project: ProjectSpec,
    graphs: Vec<ResolvedGraph>,
    #[serde(default)]
    packages: InMemoryPackageSource,
    /// Installed package folders, probed in order.
    #[serde(default)]
    package_folders: Vec<PathBuf>,
}

/// Output document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RestoreOutput {
    schema_version: &'static str,
    targets: Vec<ManifestTarget>,
    build_assets: BuildAssetsResult,
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "restore_projection=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

fn read_input(config: &ProjectionConfig) -> Result<RestoreInput, Box<dyn std::error::Error>> {
    let raw = match &config.input_path {
        Some(path) => {
            info!(path = %path.display(), "Reading restore input");
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    Ok(serde_json::from_str(&raw)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ProjectionConfig::from_env();
    let input = read_input(&config)?;
    let start = Instant::now();

    info!(
        project = %input.project.name,
        graphs = input.graphs.len(),
        packages = input.packages.len(),
        "Projecting restore"
    );

    let targets = ManifestBuilder::new(&input.packages, &input.project).build(&input.graphs)?;

    let repositories: Vec<FolderRepository> = input.package_folders.iter().map(FolderRepository::new).collect();
    let build_assets =
        ProjectAssetAggregator::new(&repositories, &input.packages, config).aggregate(&input.project, &input.graphs)?;

    info!(
        targets = targets.len(),
        build_assets_success = build_assets.success,
        latency_ms = start.elapsed().as_millis() as u64,
        "Projection complete"
    );

    let output = RestoreOutput {
        schema_version: PROJECTION_SCHEMA_VERSION,
        targets,
        build_assets,
    };
    serde_json::to_writer_pretty(std::io::stdout().lock(), &output)?;
    println!();

    Ok(())
}
