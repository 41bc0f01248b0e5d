//! Check subcommand: strict archive validation

use crate::cli::CliError;
use crate::codec::legacy_csv;
use crate::series::{self, Mode};
use crate::store::ArchiveStore;
use crate::{config, Row};
use chrono::{Duration, Utc};
use clap::Parser;
use std::path::PathBuf;

/// Check command for validating an archive in place.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Archive file to check (gzip-compressed envelope)
    pub archive: PathBuf,

    /// Treat the file as an uncompressed envelope
    #[arg(long)]
    pub plain: bool,
}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(&self) -> Result<(), CliError> {
        let rows = self.load_rows()?;

        let newest_ok = Utc::now() + Duration::minutes(config::FRESHNESS_TOLERANCE_MINS);
        match series::validate(&rows, config::RECORD_TYPE, newest_ok, Mode::Strict) {
            Ok(_) => {
                println!(
                    "OK: {} rows, {} .. {}",
                    rows.len(),
                    rows.first().map(Row::timestamp).unwrap_or("-"),
                    rows.last().map(Row::timestamp).unwrap_or("-"),
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("Archive invalid: {e}");
                Err(e.into())
            }
        }
    }

    fn load_rows(&self) -> Result<Vec<Row>, CliError> {
        if self.plain {
            let text = std::fs::read_to_string(&self.archive).map_err(|e| {
                CliError::InvalidArgument(format!(
                    "cannot read '{}': {e}",
                    self.archive.display()
                ))
            })?;
            return Ok(legacy_csv::decode(&text, None)?);
        }

        ArchiveStore::new(&self.archive)
            .load()?
            .ok_or_else(|| {
                CliError::InvalidArgument(format!("no archive at '{}'", self.archive.display()))
            })
    }
}
