//! Wire-format codecs
//!
//! Two incompatible upstream formats carry the same data: the legacy
//! positional CSV envelope and the newer per-fuel JSON stream. Both decode
//! into the canonical [`crate::Row`] shape so that everything downstream
//! (validation, merge, trim, persistence) is format-agnostic.

pub mod legacy_csv;
pub mod stream_json;

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Malformed envelope, header, footer or field content
    #[error("format error: {0}")]
    Format(String),

    /// Internally inconsistent payload (row-count or cross-field mismatch)
    #[error("integrity error: {0}")]
    Integrity(String),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
