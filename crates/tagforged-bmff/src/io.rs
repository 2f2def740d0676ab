//! Whole-file replacement.

use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes a new version of a file over the old one.
///
/// Implementations must leave the original untouched when they fail.
pub trait FileReplacer {
    fn replace(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Stage into a temp file beside the target, then rename it over.
///
/// The temp file lives in the target's directory so the rename never
/// crosses filesystems. It is removed on drop if anything fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicReplace;

impl AtomicReplace {
    fn stage(&self, path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| Error::write_failed(path, e))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| Error::write_failed(path, e))?;

        if let Ok(metadata) = std::fs::metadata(path) {
            staged
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| Error::write_failed(path, e))?;
        }
        Ok(staged)
    }
}

impl FileReplacer for AtomicReplace {
    fn replace(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let staged = self.stage(path, bytes)?;
        tracing::debug!(temp = %staged.path().display(), target = %path.display(), "Replacing file");
        staged
            .persist(path)
            .map_err(|e| Error::write_failed(path, e.error))?;
        Ok(())
    }
}
