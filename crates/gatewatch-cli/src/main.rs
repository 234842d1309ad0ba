//! Gatewatch - CI results reconciliation CLI
//!
//! The `gatewatch` command reconciles one artifact snapshot (a JSON file
//! holding the message-bus lifecycle records and the gating decision) into
//! the deduplicated dashboard view.
//!
//! ## Commands
//!
//! - `reconcile`: Print or write the reconciled report as JSON or Markdown
//! - `digest`: Print the digest of the reconciled view

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gatewatch_core::{
    build_report, output_digest, render_report_md, sort_for_display, write_report_json,
    ReconcileReport,
};
use gatewatch_domain::Artifact;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use config::{OutputFormat, ViewConfig, ViewOverrides};

#[derive(Parser)]
#[command(name = "gatewatch")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reconcile CI message-bus results with gating decisions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// View config file (TOML)
    #[arg(long, global = true, env = "GATEWATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an artifact snapshot and print the report
    Reconcile {
        /// Path to the artifact snapshot (JSON)
        #[arg(short, long, env = "GATEWATCH_INPUT")]
        input: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, env = "GATEWATCH_FORMAT")]
        format: Option<OutputFormat>,

        /// Keep bookkeeping categories such as fetched-gating-yaml
        #[arg(long)]
        show_internal: bool,

        /// Order groups problems-first within each stage
        #[arg(long)]
        display_order: bool,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the digest of the reconciled view
    Digest {
        /// Path to the artifact snapshot (JSON)
        #[arg(short, long, env = "GATEWATCH_INPUT")]
        input: PathBuf,

        /// Keep bookkeeping categories such as fetched-gating-yaml
        #[arg(long)]
        show_internal: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gatewatch_core::init_tracing(cli.json, level);

    let file_config = ViewConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            input,
            format,
            show_internal,
            display_order,
            output,
        } => {
            let config = file_config.apply(ViewOverrides {
                show_internal,
                format,
                output,
                display_order,
            });
            cmd_reconcile(&input, &config)
        }
        Commands::Digest {
            input,
            show_internal,
        } => cmd_digest(&input, show_internal || file_config.show_internal),
    }
}

/// Reconcile a snapshot file and emit the report
fn cmd_reconcile(input: &Path, config: &ViewConfig) -> Result<()> {
    let artifact = load_artifact(input)?;
    let report = prepare_report(&artifact, config)?;

    match (&config.output, config.format) {
        (Some(path), OutputFormat::Json) => {
            write_report_json(path, &report)?;
            info!(path = ?path, digest = %report.digest, "report written");
        }
        (Some(path), OutputFormat::Markdown) => {
            std::fs::write(path, render_report_md(&report))
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            info!(path = ?path, digest = %report.digest, "report written");
        }
        (None, format) => println!("{}", render(&report, format)?),
    }
    Ok(())
}

/// Print only the view digest
fn cmd_digest(input: &Path, show_internal: bool) -> Result<()> {
    let artifact = load_artifact(input)?;
    let report = build_report(&artifact, show_internal)?;
    println!("{}", report.digest);
    Ok(())
}

fn load_artifact(path: &Path) -> Result<Artifact> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read artifact file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid artifact JSON in {:?}", path))
}

/// Build the report, reordering for display when asked.
///
/// The digest always describes the groups in the order they are emitted.
fn prepare_report(artifact: &Artifact, config: &ViewConfig) -> Result<ReconcileReport> {
    let mut report = build_report(artifact, config.show_internal)?;
    if config.display_order {
        report.groups = sort_for_display(report.groups);
        report.digest = output_digest(&report.groups)?;
    }
    Ok(report)
}

fn render(report: &ReconcileReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
        OutputFormat::Markdown => Ok(render_report_md(report)),
    }
}
