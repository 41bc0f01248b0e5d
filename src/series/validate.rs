//! Row-sequence validation and repair
//!
//! A single forward pass over the ordered rows, carrying one piece of state:
//! the high-water timestamp of the last accepted row. Structural damage and
//! future-dated data are always fatal; ordering violations are fatal in
//! strict mode and repairable in repair mode.
//!
//! The duplicate-stamp repair removes the predecessor row as well as the
//! duplicate itself. That is a heuristic for the upstream republication
//! pattern observed in practice (a resent window whose first record lands on
//! an already-archived stamp casts doubt on both copies), not a
//! proven-correct policy.

use crate::series::{SeriesError, SeriesResult, Validated};
use crate::{format_timestamp, parse_timestamp, Row};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Validation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Fail on the first problem found
    Strict,
    /// Remove offending rows and report what changed
    Repair,
}

/// Validate an ordered row sequence, optionally repairing ordering faults.
///
/// `expected_tag` is the record type every row must carry; `newest_ok` is
/// the latest instant any record may claim ("now plus tolerance" for live
/// data). Strict mode stops at the first problem and never returns
/// [`Validated::Repaired`].
pub fn validate(
    rows: &[Row],
    expected_tag: &str,
    newest_ok: DateTime<Utc>,
    mode: Mode,
) -> SeriesResult<Validated> {
    let mut deleted = vec![false; rows.len()];
    // Sentinel: lexically below any 14-digit stamp.
    let mut high_water = "";
    let mut high_water_idx: Option<usize> = None;
    let mut first_repair: Option<String> = None;

    for (index, row) in rows.iter().enumerate() {
        row.validate(expected_tag)
            .map_err(|reason| SeriesError::MalformedRow { index, reason })?;

        let stamp = row.timestamp();

        if stamp < high_water {
            // A late-arriving straggler. The prior high water stays
            // authoritative.
            match mode {
                Mode::Strict => {
                    return Err(SeriesError::OutOfOrder {
                        index,
                        found: stamp.to_string(),
                        high_water: high_water.to_string(),
                    });
                }
                Mode::Repair => {
                    warn!(index, stamp, high_water, "removing out-of-order row");
                    deleted[index] = true;
                    first_repair.get_or_insert_with(|| {
                        format!(
                            "removed out-of-order row {index} \
                             ({stamp} arrived after {high_water})"
                        )
                    });
                    continue;
                }
            }
        }

        if stamp == high_water {
            // Upstream republished overlapping data under a duplicate stamp.
            match mode {
                Mode::Strict => {
                    return Err(SeriesError::DuplicateTimestamp {
                        index,
                        stamp: stamp.to_string(),
                    });
                }
                Mode::Repair => {
                    // The predecessor's supposed uniqueness is now in doubt:
                    // drop both copies.
                    warn!(index, stamp, "removing duplicate-stamp row and its predecessor");
                    deleted[index] = true;
                    if let Some(prev) = high_water_idx {
                        deleted[prev] = true;
                    }
                    first_repair.get_or_insert_with(|| {
                        let prev = high_water_idx
                            .map(|p| p.to_string())
                            .unwrap_or_else(|| "?".to_string());
                        format!(
                            "removed duplicate-stamp rows {prev} and {index} (stamp {stamp})"
                        )
                    });
                    high_water_idx = Some(index);
                    continue;
                }
            }
        }

        high_water = stamp;
        high_water_idx = Some(index);
    }

    // The newest surviving record must not claim to be from the future;
    // that would indicate a clock or format problem, never a data hiccup.
    let newest_surviving = rows
        .iter()
        .enumerate()
        .rev()
        .find(|(index, _)| !deleted[*index])
        .map(|(_, row)| row.timestamp());
    if let Some(stamp) = newest_surviving {
        let instant = parse_timestamp(stamp).map_err(|reason| SeriesError::BadTimestamp {
            stamp: stamp.to_string(),
            reason,
        })?;
        if instant > newest_ok {
            return Err(SeriesError::TooNew {
                stamp: stamp.to_string(),
                bound: format_timestamp(&newest_ok),
            });
        }
    }

    let removed = deleted.iter().filter(|d| **d).count();
    if removed == 0 {
        debug!(rows = rows.len(), "row sequence is clean");
        return Ok(Validated::Clean);
    }

    let surviving: Vec<Row> = rows
        .iter()
        .enumerate()
        .filter(|(index, _)| !deleted[*index])
        .map(|(_, row)| row.clone())
        .collect();
    let description = first_repair.unwrap_or_else(|| format!("removed {removed} rows"));
    debug!(removed, surviving = surviving.len(), "repaired row sequence");

    Ok(Validated::Repaired {
        rows: surviving,
        description,
    })
}
