//! Legacy positional CSV envelope codec
//!
//! The envelope is line-oriented ASCII: a `HDR` line (optionally carrying a
//! description field), one comma-separated data row per line, and a
//! `FTR,<rowCount>` footer whose count guards against truncated transfers.
//! There is no quoting or escaping; a literal comma inside a field is
//! unsupported by the format itself.

use crate::codec::{CodecError, CodecResult};
use crate::{config, Row};
use tracing::debug;

/// Header line marker.
const HDR: &str = "HDR";

/// Footer line marker.
const FTR: &str = "FTR";

/// Decode a legacy CSV envelope into rows.
///
/// `expected_note` is checked against the header's optional description
/// field when supplied; a mismatch means we were handed the wrong feed.
/// Decoding never reorders or filters rows - temporal validation is the
/// series validator's job.
///
/// The envelope forbids quoting and an empty line must be a hard error, so
/// lines are split by hand rather than run through a general CSV reader
/// (which would silently skip blank lines).
pub fn decode(text: &str, expected_note: Option<&str>) -> CodecResult<Vec<Row>> {
    // str::lines handles both \n and \r\n termination.
    let mut lines = text.lines();

    let header = lines
        .next()
        .ok_or_else(|| CodecError::Format("empty envelope: missing HDR line".to_string()))?;
    let header_fields: Vec<&str> = header.split(',').collect();
    if header_fields[0] != HDR {
        return Err(CodecError::Format(format!(
            "first line must be {HDR}, got '{header}'"
        )));
    }
    if let Some(expected) = expected_note {
        let note = header_fields.get(1).copied().unwrap_or("");
        if note != expected {
            return Err(CodecError::Format(format!(
                "header description '{note}' does not match expected '{expected}'"
            )));
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    let mut saw_footer = false;

    for (idx, line) in lines.enumerate() {
        // +2: one for the header line, one for 1-based line numbers.
        let line_no = idx + 2;

        if line.is_empty() {
            return Err(CodecError::Format(format!("empty line at line {line_no}")));
        }

        let fields: Vec<&str> = line.split(',').collect();

        if fields[0] == FTR {
            let declared: usize = fields
                .get(1)
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| {
                    CodecError::Format(format!("unparseable {FTR} count at line {line_no}"))
                })?;
            if declared != rows.len() {
                return Err(CodecError::Integrity(format!(
                    "footer declares {declared} rows but {} were decoded",
                    rows.len()
                )));
            }
            saw_footer = true;
            break;
        }

        if fields[0].is_empty() {
            return Err(CodecError::Format(format!(
                "empty record type at line {line_no}"
            )));
        }

        rows.push(Row::from_fields(fields));
    }

    if !saw_footer {
        return Err(CodecError::Format(format!(
            "missing {FTR} footer (truncated transfer?)"
        )));
    }

    debug!(rows = rows.len(), "decoded legacy CSV envelope");
    Ok(rows)
}

/// Encode rows back into the legacy CSV envelope.
///
/// The only structural validation performed here is the per-row minimum
/// field count and record-type tag; anything temporal belongs to the
/// series validator. Output is `HDR`, one line per row, `FTR,<count>`.
pub fn encode(rows: &[Row], expected_tag: &str) -> CodecResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    writer
        .write_record([HDR])
        .map_err(|e| CodecError::Format(format!("failed to write header: {e}")))?;

    for (idx, row) in rows.iter().enumerate() {
        if row.fields().len() < config::MIN_ROW_FIELDS {
            return Err(CodecError::Format(format!(
                "row {idx} has {} fields, minimum is {}",
                row.fields().len(),
                config::MIN_ROW_FIELDS
            )));
        }
        if row.type_tag() != expected_tag {
            return Err(CodecError::Format(format!(
                "row {idx} carries record type '{}', expected '{expected_tag}'",
                row.type_tag()
            )));
        }
        writer
            .write_record(row.fields())
            .map_err(|e| CodecError::Format(format!("failed to write row {idx}: {e}")))?;
    }

    let count = rows.len().to_string();
    writer
        .write_record([FTR, count.as_str()])
        .map_err(|e| CodecError::Format(format!("failed to write footer: {e}")))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| CodecError::Format(format!("failed to flush envelope: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CodecError::Format(format!("envelope is not valid UTF-8: {e}")))
}
