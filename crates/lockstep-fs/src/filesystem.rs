//! The file I/O seam consumed by graph discovery and lock snapshots

use std::fmt::Debug;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, NormalizedPath, Result, io};

/// File operations needed by the higher layers.
///
/// Implementations must treat a missing file as `Ok(None)` on read and as
/// success on removal.
pub trait FileSystem: Debug + Send + Sync {
    /// Read a file, returning `None` when it does not exist.
    fn read_file(&self, path: &NormalizedPath) -> Result<Option<String>>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&self, path: &NormalizedPath, content: &str) -> Result<()>;

    /// Remove a single file.
    fn remove_file(&self, path: &NormalizedPath) -> Result<()>;

    /// Remove a directory tree.
    fn remove_dir_all(&self, path: &NormalizedPath) -> Result<()>;

    /// List every file below `root` whose extension is in `extensions`
    /// (case-insensitive), in a stable sorted order.
    fn list_files_recursively(
        &self,
        root: &NormalizedPath,
        extensions: &[String],
    ) -> Result<Vec<NormalizedPath>>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn read_file(&self, path: &NormalizedPath) -> Result<Option<String>> {
        io::read_optional(path)
    }

    fn write_file(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        io::write_text(path, content)
    }

    fn remove_file(&self, path: &NormalizedPath) -> Result<()> {
        io::remove_file(path)
    }

    fn remove_dir_all(&self, path: &NormalizedPath) -> Result<()> {
        io::remove_dir_all(path)
    }

    fn list_files_recursively(
        &self,
        root: &NormalizedPath,
        extensions: &[String],
    ) -> Result<Vec<NormalizedPath>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root.to_native()).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_native()),
                message: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = NormalizedPath::new(entry.path());
            let matches = path
                .extension()
                .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
            if matches {
                files.push(path);
            }
        }

        tracing::debug!(root = %root, count = files.len(), "Listed manifest files");
        Ok(files)
    }
}
