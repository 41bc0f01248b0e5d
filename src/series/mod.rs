//! Time-series validation, repair, merge and trim
//!
//! Every operation here is a pure function from an immutable row sequence to
//! either a new sequence or an explicit "no change" variant, so callers can
//! never mistake a no-op for an error or overlook an unhandled case.

mod merge;
mod trim;
mod validate;

pub use merge::merge;
pub use trim::trim;
pub use validate::{validate, Mode};

use crate::Row;

/// Time-series errors
#[derive(Debug, thiserror::Error)]
pub enum SeriesError {
    /// Structurally invalid row (field count, tag or timestamp shape)
    #[error("malformed row at index {index}: {reason}")]
    MalformedRow {
        /// Position of the offending row in the input sequence
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A row's timestamp is older than the running high-water mark
    #[error("out-of-order row at index {index}: {found} arrived after {high_water}")]
    OutOfOrder {
        /// Position of the offending row in the input sequence
        index: usize,
        /// The straggler's timestamp
        found: String,
        /// The high-water timestamp it fell behind
        high_water: String,
    },

    /// Two rows carry the same timestamp
    #[error("duplicate timestamp {stamp} at index {index}")]
    DuplicateTimestamp {
        /// Position of the second row carrying the stamp
        index: usize,
        /// The duplicated timestamp
        stamp: String,
    },

    /// The newest record claims to be from the future
    #[error("newest record {stamp} is later than allowed bound {bound}")]
    TooNew {
        /// The offending timestamp
        stamp: String,
        /// The caller-supplied upper bound
        bound: String,
    },

    /// A timestamp field that should parse as an instant did not
    #[error("unparseable timestamp '{stamp}': {reason}")]
    BadTimestamp {
        /// The raw field value
        stamp: String,
        /// Parser diagnostics
        reason: String,
    },

    /// The candidate row sequence for a merge was empty
    #[error("candidate row sequence is empty")]
    EmptyCandidate,
}

/// Result type for series operations
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validated {
    /// No problems found; the input is usable as-is
    Clean,
    /// Offending rows were removed (repair mode only)
    Repaired {
        /// The surviving rows, original order preserved
        rows: Vec<Row>,
        /// Human-readable description of the first repair performed
        description: String,
    },
}

/// Merge outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Merge {
    /// The candidate held nothing newer than the archive
    Unchanged,
    /// The archive extended by the strictly-newer candidate suffix
    Extended(Vec<Row>),
}

/// Trim outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trim {
    /// The sequence already fits the span bound
    Unchanged,
    /// The sequence with rows older than the span bound dropped
    Trimmed(Vec<Row>),
}
