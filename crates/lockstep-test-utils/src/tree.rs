//! [`TestTree`] builder for multi-project source tree scenarios.

use std::fs;
use std::path::Path;

use lockstep_fs::NormalizedPath;
use tempfile::TempDir;

/// Lock file name written next to manifests by [`TestTree::lock`].
pub const LOCK_FILE: &str = "packages.lock.json";

/// Render a minimal SDK-style manifest referencing `references`.
pub fn manifest_xml(references: &[&str]) -> String {
    let mut xml = String::from("<Project Sdk=\"Microsoft.NET.Sdk\">\n");
    xml.push_str("  <PropertyGroup>\n    <TargetFramework>net8.0</TargetFramework>\n  </PropertyGroup>\n");
    if !references.is_empty() {
        xml.push_str("  <ItemGroup>\n");
        for reference in references {
            xml.push_str(&format!("    <ProjectReference Include=\"{reference}\" />\n"));
        }
        xml.push_str("  </ItemGroup>\n");
    }
    xml.push_str("</Project>\n");
    xml
}

/// A temporary source tree with helpers for writing manifests and lock
/// files and asserting on the result.
///
/// # Example
///
/// ```rust,no_run
/// use lockstep_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.manifest("src/App/App.csproj", &["../Lib/Lib.csproj"]);
/// tree.manifest("src/Lib/Lib.csproj", &[]);
/// tree.lock("src/App/App.csproj", "{}");
/// tree.assert_file_exists("src/App/packages.lock.json");
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the native root path of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Return the canonical root as a [`NormalizedPath`].
    ///
    /// Canonical so that paths built here compare equal to paths discovered
    /// by walking the tree.
    pub fn root_path(&self) -> NormalizedPath {
        NormalizedPath::canonicalize(self.root())
            .unwrap_or_else(|e| panic!("TestTree::root_path: failed to canonicalize root: {e}"))
    }

    /// Absolute normalized path of `rel` below the root.
    pub fn path(&self, rel: &str) -> NormalizedPath {
        self.root_path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> NormalizedPath {
        let full_path = self.root().join(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("TestTree::write: failed to write {}: {e}", full_path.display()));
        self.path(rel)
    }

    /// Write an SDK-style manifest at `rel` referencing `references`.
    pub fn manifest(&self, rel: &str, references: &[&str]) -> NormalizedPath {
        self.write(rel, &manifest_xml(references))
    }

    /// Write the lock file that sits next to the manifest at `manifest_rel`.
    pub fn lock(&self, manifest_rel: &str, content: &str) -> NormalizedPath {
        let lock_rel = match manifest_rel.rfind('/') {
            Some(idx) => format!("{}/{LOCK_FILE}", &manifest_rel[..idx]),
            None => LOCK_FILE.to_string(),
        };
        self.write(&lock_rel, content)
    }

    /// Read `rel`, returning `None` if it does not exist.
    pub fn read(&self, rel: &str) -> Option<String> {
        fs::read_to_string(self.root().join(rel)).ok()
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) has exactly
    /// `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or differs.
    pub fn assert_file_content(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert_eq!(
            file_content, content,
            "File {} does not have the expected content",
            full_path.display()
        );
    }
}
