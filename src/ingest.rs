//! Ingestion cycle orchestration
//!
//! One cycle takes a fetched payload all the way to a published archive:
//! decode (per wire format) -> validate/repair -> lock -> load -> merge ->
//! trim -> save. Every transformation in the middle is pure; the lock
//! brackets only the read/modify/write of the on-disk archive.

use crate::codec::{legacy_csv, stream_json, CodecError};
use crate::series::{self, Merge, Mode, SeriesError, Trim, Validated};
use crate::store::{ArchiveLock, ArchiveStore, StoreError};
use crate::{config, FieldTemplate, Row};
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Which wire format a payload is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// The legacy positional CSV envelope (HDR/FTR framed)
    LegacyCsv,
    /// The newer per-fuel JSON stream format
    StreamJson,
}

impl FromStr for WireFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" | "csv" | "legacy-csv" => Ok(WireFormat::LegacyCsv),
            "stream" | "json" | "stream-json" => Ok(WireFormat::StreamJson),
            _ => Err(format!(
                "Invalid wire format: {s}. Valid options: legacy, stream"
            )),
        }
    }
}

/// Ingest errors
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Payload decode error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Validation, merge or trim error
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Archive load/save error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The payload was not usable at all
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Everything one ingestion cycle needs.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    /// Archive file path
    pub archive: PathBuf,
    /// Raw fetched payload
    pub payload: Vec<u8>,
    /// Which wire format the payload is in
    pub format: WireFormat,
    /// Positional column template for row synthesis
    pub template: FieldTemplate,
    /// Maximum archive span in hours
    pub max_span_hours: u32,
    /// Strict or repair validation
    pub mode: Mode,
    /// Latest instant any record may claim
    pub newest_ok: DateTime<Utc>,
}

impl IngestRequest {
    /// A request with the stock template, span bound, repair mode and a
    /// freshness bound of now plus the configured tolerance.
    pub fn new(archive: PathBuf, payload: Vec<u8>, format: WireFormat) -> Self {
        Self {
            archive,
            payload,
            format,
            template: config::DEFAULT_TEMPLATE.clone(),
            max_span_hours: config::DEFAULT_MAX_SPAN_HOURS,
            mode: Mode::Repair,
            newest_ok: Utc::now() + Duration::minutes(config::FRESHNESS_TOLERANCE_MINS),
        }
    }
}

/// What one ingestion cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Rows decoded from the payload, before any repair
    pub decoded: usize,
    /// Description of the first repair, when the validator removed rows
    pub repaired: Option<String>,
    /// Rows appended to the archive
    pub appended: usize,
    /// Rows dropped by the span trim
    pub trimmed: usize,
    /// Whether the on-disk archive was actually replaced
    pub replaced: bool,
}

/// Run one complete ingestion cycle.
///
/// The publish step is skipped when the merge reports nothing new; the
/// archive on disk is then left untouched.
pub fn run_cycle(request: &IngestRequest) -> Result<IngestReport, IngestError> {
    let rows = decode_payload(request)?;
    let decoded = rows.len();

    let (rows, repaired) =
        match series::validate(&rows, config::RECORD_TYPE, request.newest_ok, request.mode)? {
            Validated::Clean => (rows, None),
            Validated::Repaired { rows, description } => {
                warn!(
                    surviving = rows.len(),
                    removed = decoded - rows.len(),
                    %description,
                    "payload repaired"
                );
                (rows, Some(description))
            }
        };

    // Single-writer section: everything between load and save.
    let mut lock = ArchiveLock::new(&request.archive)?;
    let _guard = lock.lock()?;

    let store = ArchiveStore::new(&request.archive);
    let existing = store.load()?.unwrap_or_default();

    let extended = match series::merge(&existing, &rows)? {
        Merge::Unchanged => {
            info!(
                archive = %request.archive.display(),
                existing = existing.len(),
                "nothing new to append"
            );
            return Ok(IngestReport {
                decoded,
                repaired,
                ..IngestReport::default()
            });
        }
        Merge::Extended(extended) => extended,
    };
    let appended = extended.len() - existing.len();

    let (bounded, trimmed) = match series::trim(&extended, request.max_span_hours)? {
        Trim::Unchanged => (extended, 0),
        Trim::Trimmed(bounded) => {
            let dropped = extended.len() - bounded.len();
            (bounded, dropped)
        }
    };

    let replaced = store.save(&bounded)?;
    info!(
        archive = %request.archive.display(),
        decoded,
        appended,
        trimmed,
        replaced,
        "ingest cycle complete"
    );

    Ok(IngestReport {
        decoded,
        repaired,
        appended,
        trimmed,
        replaced,
    })
}

fn decode_payload(request: &IngestRequest) -> Result<Vec<Row>, IngestError> {
    match request.format {
        WireFormat::LegacyCsv => {
            let text = std::str::from_utf8(&request.payload)
                .map_err(|e| IngestError::InvalidPayload(format!("payload is not UTF-8: {e}")))?;
            Ok(legacy_csv::decode(text, None)?)
        }
        WireFormat::StreamJson => {
            let grouped = stream_json::decode(&request.payload, config::RECORD_TYPE, true)?;
            Ok(grouped.to_rows(&request.template, config::RECORD_TYPE)?)
        }
    }
}
