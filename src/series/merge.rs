//! Archive extension by strictly-newer candidate rows
//!
//! The archive only ever grows at its newest end: freshly fetched data is
//! appended, never spliced into the middle, and already-archived rows are
//! never rewritten. Late republications of stamps the archive already holds
//! are therefore discarded here.

use crate::series::{Merge, SeriesError, SeriesResult};
use crate::Row;
use tracing::debug;

/// Compute the archive extended by the candidate rows strictly newer than
/// its last timestamp.
///
/// Timestamp fields are compared lexically; the fixed-width zero-padded
/// format makes that equivalent to chronological comparison without a
/// date-parse per row. The candidate is assumed internally ordered and
/// non-decreasing - callers run the validator first; that precondition is
/// not re-checked here.
pub fn merge(existing: &[Row], candidate: &[Row]) -> SeriesResult<Merge> {
    let candidate_last = candidate
        .last()
        .map(Row::timestamp)
        .ok_or(SeriesError::EmptyCandidate)?;
    let existing_last = existing.last().map(Row::timestamp).unwrap_or("");

    if candidate_last <= existing_last {
        debug!(
            candidate_last,
            existing_last, "candidate holds nothing newer than archive"
        );
        return Ok(Merge::Unchanged);
    }

    // Walk backward to the earliest candidate row still strictly newer than
    // the archive's last stamp; everything from there on is appendable.
    let mut start = candidate.len();
    while start > 0 && candidate[start - 1].timestamp() > existing_last {
        start -= 1;
    }

    let mut extended = existing.to_vec();
    extended.extend_from_slice(&candidate[start..]);
    debug!(
        appended = candidate.len() - start,
        total = extended.len(),
        "extended archive"
    );
    Ok(Merge::Extended(extended))
}
