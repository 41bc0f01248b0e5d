//! Archive span bounding
//!
//! Drops the oldest rows so the archive never covers more than a maximum
//! time span ending at its newest row. Unlike the merge path, the span
//! arithmetic needs true elapsed time, so the boundary timestamps are
//! parsed; the interior scan can then compare lexically against a
//! precomputed cutoff string.

use crate::series::{SeriesError, SeriesResult, Trim};
use crate::{format_timestamp, parse_timestamp, Row};
use chrono::Duration;
use tracing::debug;

/// Bound `rows` to at most `max_span_hours` ending at the last row.
///
/// Rows with timestamps within `[last - span, last]` (inclusive) are
/// retained. A sequence of fewer than two rows is never trimmed.
pub fn trim(rows: &[Row], max_span_hours: u32) -> SeriesResult<Trim> {
    if rows.len() < 2 {
        return Ok(Trim::Unchanged);
    }

    let first_stamp = rows[0].timestamp();
    let last_stamp = rows[rows.len() - 1].timestamp();
    let first = parse_timestamp(first_stamp).map_err(|reason| SeriesError::BadTimestamp {
        stamp: first_stamp.to_string(),
        reason,
    })?;
    let last = parse_timestamp(last_stamp).map_err(|reason| SeriesError::BadTimestamp {
        stamp: last_stamp.to_string(),
        reason,
    })?;

    let span = Duration::hours(i64::from(max_span_hours));
    if last - first <= span {
        return Ok(Trim::Unchanged);
    }

    // Lexical compare against the cutoff string agrees with chronological
    // order because the stamp format is fixed-width and zero-padded.
    let cutoff = format_timestamp(&(last - span));
    let keep_from = rows
        .iter()
        .position(|row| row.timestamp() >= cutoff.as_str())
        .unwrap_or(0);
    if keep_from == 0 {
        return Ok(Trim::Unchanged);
    }

    debug!(
        dropped = keep_from,
        retained = rows.len() - keep_from,
        %cutoff,
        "trimmed archive span"
    );
    Ok(Trim::Trimmed(rows[keep_from..].to_vec()))
}
