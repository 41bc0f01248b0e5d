//! Advisory locking for the archive read/modify/write cycle
//!
//! The archive file is the only shared mutable resource in the pipeline.
//! A load-transform-publish cycle must run under a single writer lock so
//! that concurrent ingest runs (e.g. per remote grid, or an overlapping
//! cron invocation) cannot interleave. The lock is scoped to the archive
//! path rather than being process-global, so independent archives do not
//! serialize against each other.

use crate::store::StoreError;
use fd_lock::{RwLock, RwLockWriteGuard};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Advisory lock over one archive path.
///
/// Holds the lock file open; the actual exclusion is taken by [`lock`] or
/// [`try_lock`] and lasts for the lifetime of the returned guard.
///
/// [`lock`]: ArchiveLock::lock
/// [`try_lock`]: ArchiveLock::try_lock
pub struct ArchiveLock {
    lock: RwLock<File>,
}

impl ArchiveLock {
    /// Open (creating if needed) the lock file that guards `path`.
    pub fn new(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }

        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StoreError::Lock(format!("failed to open lock file: {e}")))?;
        Ok(Self {
            lock: RwLock::new(file),
        })
    }

    /// Take the writer lock, blocking until available.
    pub fn lock(&mut self) -> Result<RwLockWriteGuard<'_, File>, StoreError> {
        self.lock
            .write()
            .map_err(|e| StoreError::Lock(format!("failed to acquire write lock: {e}")))
    }

    /// Try to take the writer lock without blocking.
    ///
    /// Errors immediately when another holder has it.
    pub fn try_lock(&mut self) -> Result<RwLockWriteGuard<'_, File>, StoreError> {
        self.lock
            .try_write()
            .map_err(|e| StoreError::Lock(format!("failed to acquire write lock: {e}")))
    }
}
