//! File I/O primitives behind [`crate::LocalFileSystem`]

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Hidden temp file next to `target`, so the final rename never crosses
/// filesystems.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

/// Replace `path` with `content` in one step.
///
/// Readers see either the old or the new content, never a partial write.
/// The staging file is held under an exclusive advisory lock while it is
/// written. Missing parent directories are created.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let target = path.to_native();
    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let staging = staging_path(&target);
    let written = File::create(&staging)
        .map_err(|e| Error::io(&staging, e))
        .and_then(|mut file| {
            file.lock_exclusive().map_err(|_| Error::LockFailed {
                path: target.clone(),
            })?;
            file.write_all(content)
                .and_then(|()| file.sync_all())
                .map_err(|e| Error::io(&staging, e))
        });

    if let Err(e) = written.and_then(|()| fs::rename(&staging, &target).map_err(|e| Error::io(&target, e))) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    Ok(())
}

/// Read a UTF-8 file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native = path.to_native();
    fs::read_to_string(&native).map_err(|e| Error::io(native, e))
}

/// Read a UTF-8 file, treating a missing file as `None`.
pub fn read_optional(path: &NormalizedPath) -> Result<Option<String>> {
    match read_text(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// [`write_atomic`] for text.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Remove a file. A file that is already gone is not an error.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    ignore_missing(path, |p| fs::remove_file(p))
}

/// Remove a directory and everything below it. A missing directory is not
/// an error.
pub fn remove_dir_all(path: &NormalizedPath) -> Result<()> {
    ignore_missing(path, |p| fs::remove_dir_all(p))
}

fn ignore_missing(path: &NormalizedPath, op: impl FnOnce(&Path) -> std::io::Result<()>) -> Result<()> {
    let native = path.to_native();
    match op(&native) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(Error::io(native, e)),
        _ => Ok(()),
    }
}
