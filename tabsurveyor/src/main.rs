//! Dataset integrity audit and distribution summary tool.
//!
//! Reads a JSON registry of named datasets, then profiles their structure,
//! audits their integrity (duplicate keys, missing values, zero values) or
//! summarizes the distributions of their continuous columns.

mod render;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabsurveyor_core::{
    AuditBatch, AuditConfig, DatasetRegistry, DistributionSummarizer, PrimaryKeys,
    QualityAuditor, SummaryConfig, bin_count, load_primary_keys_file, load_registry_file,
    logging::init_logging, profile_registry,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "tabsurveyor")]
#[command(about = "Dataset integrity audit and distribution summary tool")]
#[command(version)]
#[command(long_about = "
tabsurveyor - dataset integrity audits and distribution summaries

The input is a JSON object mapping dataset names to datasets. A dataset is
either an array of row objects (column types inferred) or an object with
declared \"columns\" ([{\"name\", \"type\"}]) and \"rows\".

EXAMPLES:
  tabsurveyor profile --input registry.json
  tabsurveyor audit --input registry.json --keys keys.json
  tabsurveyor describe --input registry.json --dataset items --columns price,freight_value
  tabsurveyor bins 1000
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Report row counts, column names and column types
    Profile(InputArgs),
    /// Check for duplicate keys, missing values and zero values
    Audit(AuditArgs),
    /// Summarize the distributions of continuous columns
    Describe(DescribeArgs),
    /// Suggest a histogram bin count for a sample size
    Bins {
        /// Number of observations
        n: usize,
    },
}

#[derive(Args)]
pub struct InputArgs {
    /// Registry document path
    #[arg(short, long, help = "JSON registry document")]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Primary key declarations
    #[arg(
        short,
        long,
        help = "JSON list of {\"dataset\", \"primary_key\"} declarations"
    )]
    pub keys: Option<PathBuf>,

    /// Skip the duplicate check for datasets without a primary key
    #[arg(long)]
    pub skip_missing_keys: bool,

    /// Maximum missing percentage per column
    #[arg(long, help = "Maximum missing percentage per column before a violation")]
    pub max_missing: Option<f64>,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only summarize this dataset
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Columns to summarize (defaults to every continuous column)
    #[arg(short, long, value_delimiter = ',', requires = "dataset")]
    pub columns: Vec<String>,

    /// Normality test significance level
    #[arg(long, default_value = "0.05")]
    pub significance: f64,

    /// Decimals shown in the output
    #[arg(long, default_value = "3")]
    pub decimals: u32,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all logging except errors")]
    pub quiet: bool,
}

/// Available output formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per finding
    Text,
    /// Pretty-printed JSON
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    match &cli.command {
        Command::Profile(args) => run_profile(args),
        Command::Audit(args) => run_audit(args),
        Command::Describe(args) => run_describe(args),
        Command::Bins { n } => {
            println!("{}", bin_count(*n)?);
            Ok(())
        }
    }
}

fn read_registry(path: &Path) -> anyhow::Result<DatasetRegistry> {
    info!("Loading registry from {}", path.display());
    let registry = load_registry_file(path)
        .with_context(|| format!("Invalid registry document {}", path.display()))?;
    Ok(registry)
}

/// Prints `value` as JSON, or the text lines produced by `lines`.
fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    lines: impl FnOnce() -> Vec<String>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for line in lines() {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).context("Failed to serialize report")?
            );
        }
    }
    Ok(())
}

/// Fails the command when some datasets could not be analyzed.
fn check_batch<T>(batch: &AuditBatch<T>) -> anyhow::Result<()> {
    if !batch.is_complete() {
        bail!(
            "{} of {} datasets could not be analyzed",
            batch.failures.len(),
            batch.len()
        );
    }
    Ok(())
}

fn run_profile(args: &InputArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.input)?;
    let profiles = profile_registry(&registry);
    emit(args.format, &profiles, || render::profile_lines(&profiles))
}

/// Builds the audit configuration from command line flags.
fn audit_config(args: &AuditArgs) -> AuditConfig {
    let mut config = AuditConfig::new().with_require_primary_keys(!args.skip_missing_keys);
    if let Some(threshold) = args.max_missing {
        config = config.with_max_missing_percentage(threshold);
    }
    config
}

fn run_audit(args: &AuditArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.input.input)?;
    let keys = match &args.keys {
        Some(path) => load_primary_keys_file(path)
            .with_context(|| format!("Invalid primary key document {}", path.display()))?,
        None => PrimaryKeys::new(),
    };

    let auditor = QualityAuditor::new(audit_config(args));
    let batch = auditor.audit_registry(&registry, &keys);

    let violations: usize = batch
        .reports
        .iter()
        .map(|r| r.threshold_violations.len())
        .sum();
    info!(
        "Audited {} datasets with {} threshold violations",
        batch.reports.len(),
        violations
    );

    emit(args.input.format, &batch, || render::audit_lines(&batch))?;
    check_batch(&batch)
}

fn run_describe(args: &DescribeArgs) -> anyhow::Result<()> {
    let registry = read_registry(&args.input.input)?;
    let config = SummaryConfig::new()
        .with_significance_level(args.significance)
        .with_decimal_places(args.decimals);
    let places = config.decimal_places;
    let summarizer = DistributionSummarizer::new(config);

    let batch = match &args.dataset {
        Some(name) => {
            let dataset = registry
                .get(name)
                .with_context(|| format!("Dataset '{}' is not in the registry", name))?;
            let mut batch = AuditBatch::new();
            let outcome = if args.columns.is_empty() {
                let continuous: Vec<String> = dataset
                    .schema()
                    .iter()
                    .filter(|c| c.column_type == tabsurveyor_core::ColumnType::NumericContinuous)
                    .map(|c| c.name.clone())
                    .collect();
                summarizer.summarize(name, dataset, &continuous)
            } else {
                summarizer.summarize(name, dataset, &args.columns)
            };
            batch.record(name, outcome);
            batch
        }
        None => summarizer.summarize_registry(&registry),
    };

    let shown = AuditBatch {
        reports: batch.reports.iter().map(|t| t.rounded(places)).collect(),
        failures: batch.failures.clone(),
    };

    emit(args.input.format, &shown, || render::describe_lines(&shown))?;
    check_batch(&shown)
}
