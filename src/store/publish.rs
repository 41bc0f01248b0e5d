//! Atomic file publication
//!
//! Readers of the archive must see either the fully-old or the fully-new
//! file content, never a partial write. The sequence is: write a
//! uniquely-named temp file in the target directory, fsync it, then rename
//! it over the target, falling back to delete-then-rename where the
//! platform rename cannot overwrite.

use crate::store::{StoreError, StoreResult};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Atomically replace the contents of `path` with `bytes`.
///
/// Returns `false` without touching anything when the target already holds
/// exactly these bytes, `true` when a replacement was performed. The
/// published file is made world-readable unless the target file name begins
/// with a dot.
pub fn publish(path: &Path, bytes: &[u8]) -> StoreResult<bool> {
    if let Ok(existing) = std::fs::read(path) {
        if existing == bytes {
            debug!(path = %path.display(), "content identical, nothing to publish");
            return Ok(false);
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| StoreError::Io(format!("failed to create directory: {e}")))?;

    // The temp file must live in the target directory so the final rename
    // stays on one filesystem.
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| StoreError::Io(format!("failed to create temp file: {e}")))?;
    temp.write_all(bytes)
        .map_err(|e| StoreError::Io(format!("failed to write temp file: {e}")))?;
    temp.flush()
        .map_err(|e| StoreError::Io(format!("failed to flush temp file: {e}")))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::Io(format!("failed to sync temp file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if !hidden {
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| StoreError::Io(format!("failed to set permissions: {e}")))?;
        }
    }

    match temp.persist(path) {
        Ok(_) => {}
        Err(persist_err) => {
            // Some platforms refuse to rename over an existing file; retry
            // once with the target out of the way.
            let temp = persist_err.file;
            std::fs::remove_file(path)
                .map_err(|e| StoreError::Io(format!("failed to remove old target: {e}")))?;
            temp.persist(path)
                .map_err(|e| StoreError::Io(format!("failed to persist temp file: {e}")))?;
        }
    }

    // Make the rename itself durable.
    if let Ok(dir_handle) = std::fs::File::open(dir) {
        let _ = dir_handle.sync_all();
    }

    debug!(path = %path.display(), bytes = bytes.len(), "published file");
    Ok(true)
}
