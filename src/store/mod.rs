//! Archive persistence
//!
//! The archive is one gzip-compressed legacy CSV envelope on disk. Loading
//! and saving go through this module; the actual byte replacement is the
//! atomic [`publish`] primitive and the read/modify/write cycle is meant to
//! run under an [`ArchiveLock`].

mod lock;
mod publish;

pub use lock::ArchiveLock;
pub use publish::publish;

use crate::codec::{legacy_csv, CodecError};
use crate::{config, Row};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Archive store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Gzip compression or decompression error
    #[error("compression error: {0}")]
    Compression(String),

    /// Envelope codec error
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// File lock error
    #[error("lock error: {0}")]
    Lock(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent archive of canonical rows at one filesystem path.
pub struct ArchiveStore {
    path: PathBuf,
}

impl ArchiveStore {
    /// Create a store handle for `path`. Nothing is touched on disk.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The archive file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the archived rows, or `None` when no archive exists yet.
    pub fn load(&self) -> StoreResult<Option<Vec<Row>>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no archive on disk yet");
            return Ok(None);
        }

        let bytes = std::fs::read(&self.path)
            .map_err(|e| StoreError::Io(format!("failed to read archive: {e}")))?;

        let mut text = String::new();
        GzDecoder::new(bytes.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| StoreError::Compression(format!("failed to gunzip archive: {e}")))?;

        let rows = legacy_csv::decode(&text, None)?;
        debug!(path = %self.path.display(), rows = rows.len(), "loaded archive");
        Ok(Some(rows))
    }

    /// Encode, compress and atomically publish `rows`.
    ///
    /// Returns whether anything on disk was actually replaced; saving
    /// byte-identical content is a no-op.
    pub fn save(&self, rows: &[Row]) -> StoreResult<bool> {
        let text = legacy_csv::encode(rows, config::RECORD_TYPE)?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(text.as_bytes())
            .map_err(|e| StoreError::Compression(format!("failed to gzip archive: {e}")))?;
        let bytes = encoder
            .finish()
            .map_err(|e| StoreError::Compression(format!("failed to finish gzip: {e}")))?;

        let replaced = publish(&self.path, &bytes)?;
        if replaced {
            info!(path = %self.path.display(), rows = rows.len(), "archive published");
        } else {
            debug!(path = %self.path.display(), "archive unchanged, publish skipped");
        }
        Ok(replaced)
    }
}
