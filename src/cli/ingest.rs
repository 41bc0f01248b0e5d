//! Ingest command implementation

use crate::cli::CliError;
use crate::ingest::{self, IngestRequest, WireFormat};
use crate::series::Mode;
use crate::{config, fetch};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "fuel-mix-archiver",
    version,
    about = "Ingest, validate and archive grid fuel-mix (FUELINST) data"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a payload, validate it and merge it into the archive
    Ingest(IngestCommand),
    /// Strictly validate an existing archive without modifying it
    Check(crate::cli::check::CheckCommand),
}

/// Arguments for the `ingest` subcommand.
#[derive(Parser, Debug)]
pub struct IngestCommand {
    /// Archive file to maintain (gzip-compressed envelope)
    #[arg(long)]
    pub archive: PathBuf,

    /// Fetch the payload from this URL
    #[arg(long, conflicts_with = "input")]
    pub url: Option<String>,

    /// Read the payload from this local file instead of fetching
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Wire format of the payload: legacy | stream
    #[arg(long, default_value = "stream")]
    pub format: WireFormat,

    /// Positional column template (comma-separated; defaults to the
    /// published FUELINST column order)
    #[arg(long)]
    pub template: Option<String>,

    /// Maximum archive span in hours
    #[arg(long, default_value_t = config::DEFAULT_MAX_SPAN_HOURS)]
    pub max_hours: u32,

    /// Fail on the first data problem instead of repairing
    #[arg(long)]
    pub strict: bool,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub fn execute(&self) -> Result<(), CliError> {
        let payload = match (&self.url, &self.input) {
            (Some(url), None) => fetch::fetch_bytes(url)?,
            (None, Some(path)) => std::fs::read(path).map_err(|e| {
                CliError::InvalidArgument(format!(
                    "cannot read payload '{}': {e}",
                    path.display()
                ))
            })?,
            _ => {
                return Err(CliError::InvalidArgument(
                    "exactly one of --url or --input is required".to_string(),
                ));
            }
        };

        let mut request = IngestRequest::new(self.archive.clone(), payload, self.format);
        if let Some(raw) = &self.template {
            request.template = raw.parse().map_err(CliError::InvalidArgument)?;
        }
        request.max_span_hours = self.max_hours;
        if self.strict {
            request.mode = Mode::Strict;
        }

        info!(archive = %self.archive.display(), format = ?self.format, "starting ingest");
        let report = ingest::run_cycle(&request)?;

        println!("Ingest complete: {}", self.archive.display());
        println!("  Rows decoded:  {}", report.decoded);
        if let Some(description) = &report.repaired {
            println!("  Repaired:      {description}");
        }
        println!("  Rows appended: {}", report.appended);
        if report.trimmed > 0 {
            println!("  Rows trimmed:  {}", report.trimmed);
        }
        println!(
            "  Archive {}",
            if report.replaced { "updated" } else { "unchanged" }
        );

        Ok(())
    }
}
