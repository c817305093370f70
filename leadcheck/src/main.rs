//! Marketing dataset validation tool.
//!
//! This binary loads a dataset from a local file, the upload endpoint or the
//! built-in sample, prints a short preview and a validation summary, and
//! exports the lead scoring table as CSV.
//!
//! # Guarantees
//! - Summaries contain counts and ratios, never row values
//! - Upload endpoint credentials are redacted in logs
//! - The upload request is the only network call

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use leadcheck_core::{
    IngestConfig, IngestSource, LeadStats, QualityAnalyzer, ValidationConfig, builtin_leads,
    create_loader, error::redact_endpoint_url, export::DEFAULT_EXPORT_FILE, export_leads_csv,
    init_logging, quality::DEFAULT_EMAIL_COLUMN,
};
use tracing::{debug, error, info};

mod output;

#[derive(Parser)]
#[command(name = "leadcheck")]
#[command(about = "Marketing dataset validation and lead export tool")]
#[command(version)]
#[command(long_about = "
leadcheck - Validate marketing datasets before they feed lead scoring

Loads a dataset and reports:
- Total rows and duplicate rows
- Missing values across all cells
- Share of well-formed email addresses
- An overall quality tier (Excellent, Good, Poor)

SOURCES:
- Local CSV or JSON files (validate)
- The remote upload endpoint (upload)
- Built-in sample rows (sample)

EXAMPLES:
  leadcheck validate customers.csv
  leadcheck validate leads.json --format json --email-column contact_email
  leadcheck upload customers.csv --endpoint http://localhost:8000
  leadcheck export-leads --segment \"High Value\" -o high_value.csv
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a local CSV or JSON file
    Validate(ValidateArgs),
    /// Send a file to the upload endpoint and validate the parsed rows
    Upload(UploadArgs),
    /// Validate the built-in sample dataset
    Sample(ReportArgs),
    /// Export lead scores as CSV
    ExportLeads(ExportArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Dataset file (.csv or .json)
    #[arg(help = "Dataset file to validate (.csv or .json)")]
    pub file: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct UploadArgs {
    /// Dataset file to upload
    #[arg(help = "Dataset file to send to the upload endpoint")]
    pub file: PathBuf,

    /// Upload endpoint base URL
    #[arg(
        long,
        env = "LEADCHECK_UPLOAD_URL",
        help = "Upload endpoint base URL; /upload is appended (credentials are redacted in logs)"
    )]
    pub endpoint: String,

    /// Request timeout in seconds
    #[arg(long, help = "Request timeout in seconds (no timeout when unset)")]
    pub timeout_secs: Option<u64>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Email column name
    #[arg(
        long,
        default_value = DEFAULT_EMAIL_COLUMN,
        help = "Column checked for valid email addresses"
    )]
    pub email_column: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Only export leads in this segment
    #[arg(long, help = "Only export leads in this segment (exact match)")]
    pub segment: Option<String>,

    /// Output file path
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILE, help = "Output file path")]
    pub output: PathBuf,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with = "output", help = "Print the CSV to stdout")]
    pub stdout: bool,
}

/// Available report formats
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Preview table followed by the summary block
    Text,
    /// Pretty-printed JSON report
    Json,
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
    #[arg(
        short,
        long,
        global = true,
        help = "Suppress all log output except errors"
    )]
    pub quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let result = match cli.command {
        Command::Validate(args) => {
            report(
                IngestSource::LocalFile(args.file),
                IngestConfig::new(),
                &args.report,
            )
            .await
        }
        Command::Upload(args) => upload(args).await,
        Command::Sample(args) => report(IngestSource::Sample, IngestConfig::new(), &args).await,
        Command::ExportLeads(args) => export_leads(&args).await,
    };

    if let Err(ref e) = result {
        error!("{:#}", e);
    }
    result
}

/// Validates a file through the upload endpoint.
async fn upload(args: UploadArgs) -> anyhow::Result<()> {
    info!("Upload endpoint: {}", redact_endpoint_url(&args.endpoint));

    let config = IngestConfig::new()
        .with_endpoint(&args.endpoint)?
        .with_timeout(args.timeout_secs.map(Duration::from_secs));

    report(IngestSource::Upload(args.file), config, &args.report).await
}

/// Loads a dataset, summarizes it and prints the report.
async fn report(
    source: IngestSource,
    ingest: IngestConfig,
    args: &ReportArgs,
) -> anyhow::Result<()> {
    let config = ValidationConfig::new().with_email_column(&args.email_column);
    config.validate().context("Invalid validation settings")?;

    let loader = create_loader(source, ingest)?;
    info!("Loading dataset from {}", loader.describe());

    let dataset = loader.load().await?;
    info!(
        "Loaded {} rows with {} columns",
        dataset.len(),
        dataset.columns.len()
    );

    let analyzer = QualityAnalyzer::new(config);
    let summary = analyzer.summarize(&dataset);
    info!(
        "Data quality: {} ({}% valid emails)",
        summary.quality_tier,
        summary.valid_email_display()
    );

    let preview_rows = analyzer.config().preview_rows;
    let rendered = match args.format {
        OutputFormat::Text => output::render_text(&dataset, &summary, preview_rows),
        OutputFormat::Json => output::render_json(&dataset, &summary, preview_rows)?,
    };
    println!("{}", rendered);

    Ok(())
}

/// Writes the lead scoring export.
async fn export_leads(args: &ExportArgs) -> anyhow::Result<()> {
    let leads = builtin_leads();
    let stats = LeadStats::from_leads(&leads);
    debug!(
        "Lead table: {} high value, {} medium, {} low priority",
        stats.high_value, stats.medium, stats.low_priority
    );

    let csv = export_leads_csv(&leads, args.segment.as_deref())?;
    let exported = csv.lines().count().saturating_sub(1);
    if let Some(ref segment) = args.segment {
        info!("Exporting {} leads in segment '{}'", exported, segment);
    }

    if args.stdout {
        println!("{}", csv);
        return Ok(());
    }

    output::save_text(&csv, &args.output).await?;
    info!("Lead export saved to {}", args.output.display());
    println!("Exported {} leads to {}", exported, args.output.display());

    Ok(())
}
