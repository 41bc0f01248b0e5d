//! CLI error types and conversions

use crate::codec::CodecError;
use crate::fetch::FetchError;
use crate::ingest::IngestError;
use crate::series::SeriesError;
use crate::store::StoreError;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Codec error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Fetch error
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Ingest error
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    /// Series error
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Store error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
