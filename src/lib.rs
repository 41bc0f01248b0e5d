//! # Fuel Mix Archiver Library
//!
//! A library for ingesting half-hourly electricity generation-by-fuel-type
//! ("FUELINST") data published by a grid operator, normalizing it, validating
//! the resulting time series and maintaining a persisted, time-bounded archive.
//!
//! ## Features
//!
//! - **Two Wire Formats**: the legacy positional CSV envelope (HDR/FTR framed)
//!   and the newer per-fuel JSON stream format, both converging on one row model
//! - **Strict Validation**: single-pass monotonicity and structure checks with
//!   an optional repair mode that excises offending rows and reports what changed
//! - **Incremental Archival**: append-only merge of genuinely newer data plus
//!   a time-span trim, persisted as a gzip-compressed envelope
//! - **Atomic Publish**: temp-file-and-rename writes guarded by an advisory
//!   single-writer lock
//!
//! ## Quick Start
//!
//! ```
//! use fuel_mix_archiver::codec::legacy_csv;
//! use fuel_mix_archiver::series::{self, Merge, Mode, Validated};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = "HDR\nFUELINST,20230621,23,20230621114500,6030,0,864\nFTR,1\n";
//! let rows = legacy_csv::decode(text, None)?;
//!
//! let newest_ok = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();
//! let outcome = series::validate(&rows, "FUELINST", newest_ok, Mode::Strict)?;
//! assert!(matches!(outcome, Validated::Clean));
//!
//! match series::merge(&[], &rows)? {
//!     Merge::Extended(archive) => assert_eq!(archive.len(), 1),
//!     Merge::Unchanged => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`codec`] - Wire-format decoders/encoder (legacy CSV envelope, JSON stream)
//! - [`series`] - Time-series validation, repair, merge and trim
//! - [`store`] - Gzip archive persistence with atomic publish and locking
//! - [`fetch`] - Minimal HTTP retrieval of remote payloads
//! - [`ingest`] - One complete fetch-to-publish ingestion cycle
//! - [`cli`] - Command implementations for the `fuel-mix-archiver` binary
//!
//! Everything downstream of a codec operates only on [`Row`]; the codecs exist
//! to decouple parsing concerns from time-series maintenance concerns.

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Wire-format codecs
pub mod codec;

/// Command-line interface implementations
pub mod cli;

/// Tunable constants and defaults
pub mod config;

/// Remote payload retrieval
pub mod fetch;

/// Ingestion cycle orchestration
pub mod ingest;

/// Time-series validation, merge and trim
pub mod series;

/// Archive persistence
pub mod store;

/// Timestamp field format: `YYYYMMDDHHmmss`, UTC, fixed width.
///
/// Zero-padded and fixed-width, so lexical order on the raw field is
/// equivalent to chronological order.
pub const TIMESTAMP_FMT: &str = "%Y%m%d%H%M%S";

/// Date field format: `YYYYMMDD`, UTC.
pub const DATE_FMT: &str = "%Y%m%d";

/// One canonical fuel-mix row in the legacy positional form.
///
/// Field 0 is the record-type tag (e.g. `FUELINST`), field 1 the `YYYYMMDD`
/// date, field 2 the settlement period, field 3 the 14-character
/// `YYYYMMDDHHmmss` timestamp used as the sort key, and fields 4..N the
/// generation values, positionally mapped to fuel types by a [`FieldTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<String>,
}

impl Row {
    /// Create a row from pre-split field values.
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Create a row from anything yielding string-like field values.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// All fields in wire order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The record-type tag (field 0), or `""` for a fieldless row.
    pub fn type_tag(&self) -> &str {
        self.fields.first().map(String::as_str).unwrap_or("")
    }

    /// The `YYYYMMDD` date field (field 1), or `""` if absent.
    pub fn date(&self) -> &str {
        self.fields.get(1).map(String::as_str).unwrap_or("")
    }

    /// The settlement-period field (field 2), or `""` if absent.
    pub fn settlement_period(&self) -> &str {
        self.fields.get(2).map(String::as_str).unwrap_or("")
    }

    /// The 14-character timestamp sort key (field 3), or `""` if absent.
    pub fn timestamp(&self) -> &str {
        self.fields.get(3).map(String::as_str).unwrap_or("")
    }

    /// The positional generation values (fields 4..N).
    pub fn generation_values(&self) -> &[String] {
        self.fields.get(4..).unwrap_or(&[])
    }

    /// Validate row structure against the expected record-type tag.
    ///
    /// Checks the minimum field count, the tag, and that the timestamp field
    /// is exactly 14 ASCII digits. Temporal ordering is the series
    /// validator's job, not the row's.
    pub fn validate(&self, expected_tag: &str) -> Result<(), String> {
        if self.fields.len() < config::MIN_ROW_FIELDS {
            return Err(format!(
                "row has {} fields, minimum is {}",
                self.fields.len(),
                config::MIN_ROW_FIELDS
            ));
        }

        if self.type_tag() != expected_tag {
            return Err(format!(
                "record type '{}' does not match expected '{}'",
                self.type_tag(),
                expected_tag
            ));
        }

        let ts = self.timestamp();
        if !is_timestamp(ts) {
            return Err(format!(
                "timestamp '{ts}' is not {} ASCII digits",
                config::TIMESTAMP_LEN
            ));
        }

        Ok(())
    }

    /// Map this row's generation values to fuel types via `template`.
    ///
    /// Empty template positions are skipped; values are clamped to be
    /// non-negative. A value that does not parse as an integer is an error.
    pub fn fuel_map(&self, template: &FieldTemplate) -> Result<BTreeMap<String, i64>, String> {
        let mut map = BTreeMap::new();
        for (pos, name) in template.fuels() {
            let Some(raw) = self.fields.get(pos) else {
                continue;
            };
            let value: i64 = raw
                .parse()
                .map_err(|_| format!("generation value '{raw}' for {name} is not an integer"))?;
            map.insert(name.to_string(), value.max(0));
        }
        Ok(map)
    }
}

/// One decoded per-fuel generation sample from the JSON stream format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelSample {
    /// Interval start instant (the canonical time of the sample).
    pub time: DateTime<Utc>,
    /// Fuel-type code, non-empty uppercase alphanumeric (e.g. `CCGT`).
    pub fuel_type: String,
    /// Generation in MW. May be negative unless clamped at decode time.
    pub generation: i64,
    /// 1-based half-hour settlement period within the UTC day.
    pub settlement_period: u32,
}

impl FuelSample {
    /// Validate sample field integrity.
    pub fn validate(&self) -> Result<(), String> {
        if self.fuel_type.is_empty() {
            return Err("fuel type cannot be empty".to_string());
        }

        if !self
            .fuel_type
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        {
            return Err(format!(
                "fuel type '{}' is not uppercase alphanumeric",
                self.fuel_type
            ));
        }

        if self.settlement_period < 1 {
            return Err(format!(
                "settlement period must be >= 1, got {}",
                self.settlement_period
            ));
        }

        Ok(())
    }
}

/// Ordered column-name template for the legacy positional row layout.
///
/// Positions 0..3 name the fixed columns (type, date, period, timestamp);
/// positions 4 onward name fuel types, index-aligned with [`Row`] field
/// offsets. Empty positions are legal: they are skipped when decoding a row
/// to a fuel map, but still occupy a field when a row is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    names: Vec<String>,
}

impl FieldTemplate {
    /// Number of template positions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the template has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The column name at `pos`, if within the template.
    pub fn name(&self, pos: usize) -> Option<&str> {
        self.names.get(pos).map(String::as_str)
    }

    /// Iterate `(field_position, fuel_name)` for all named fuel positions.
    pub fn fuels(&self) -> impl Iterator<Item = (usize, &str)> {
        self.names
            .iter()
            .enumerate()
            .skip(config::MIN_ROW_FIELDS)
            .filter(|(_, name)| !name.is_empty())
            .map(|(pos, name)| (pos, name.as_str()))
    }
}

impl FromStr for FieldTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<String> = s.split(',').map(|n| n.trim().to_string()).collect();
        if names.len() < config::MIN_ROW_FIELDS {
            return Err(format!(
                "template has {} positions, minimum is {}",
                names.len(),
                config::MIN_ROW_FIELDS
            ));
        }
        Ok(Self { names })
    }
}

impl std::fmt::Display for FieldTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(","))
    }
}

/// True if `s` is exactly 14 ASCII digits (the archive timestamp shape).
pub fn is_timestamp(s: &str) -> bool {
    s.len() == config::TIMESTAMP_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a 14-digit `YYYYMMDDHHmmss` timestamp field to a UTC instant.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FMT)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{s}': {e}"))
}

/// Format a UTC instant as a 14-digit timestamp field.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.format(TIMESTAMP_FMT).to_string()
}

/// Format a UTC instant as a `YYYYMMDD` date field.
pub fn format_date(t: &DateTime<Utc>) -> String {
    t.format(DATE_FMT).to_string()
}
