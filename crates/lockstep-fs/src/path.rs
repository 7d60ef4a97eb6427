//! Separator-agnostic paths for manifests and their references

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A path stored with `/` as its only separator.
///
/// Manifests reference each other with whatever separator their authors
/// used (`..\Core\Core.csproj` is as common as `../Core/Core.csproj`), so
/// every path entering the graph goes through this type. Two manifests are
/// the same node exactly when their cleaned `NormalizedPath`s compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Wrap `path`, turning every `\` into `/`.
    ///
    /// `.` and `..` segments are kept; [`NormalizedPath::clean`] collapses
    /// them.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// The path as the operating system expects it for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append `segment`, which may use either separator.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        let base = self.inner.trim_end_matches('/');
        let inner = if base.is_empty() && self.inner.starts_with('/') {
            format!("/{segment}")
        } else {
            format!("{base}/{segment}")
        };
        Self { inner }
    }

    /// The containing directory; `None` for a bare relative name.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        let idx = trimmed.rfind('/')?;
        let inner = if idx == 0 { "/".to_string() } else { trimmed[..idx].to_string() };
        Some(Self { inner })
    }

    /// Last segment, ignoring a trailing separator.
    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Path of a file named `name` in the same directory as this one.
    pub fn sibling(&self, name: &str) -> Self {
        match self.parent() {
            Some(dir) => dir.join(name),
            None => Self::new(name),
        }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Whether the path is rooted (`/x`, `//server/x` or `C:/x`).
    pub fn is_absolute(&self) -> bool {
        !split_prefix(&self.inner).0.is_empty()
    }

    /// Text after the last `.` of the file name. Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Collapse empty, `.` and `..` segments.
    ///
    /// `..` never climbs above the root of an absolute path. A relative
    /// path keeps leading `..` segments it cannot resolve.
    pub fn clean(&self) -> Self {
        let (prefix, rest) = split_prefix(&self.inner);

        let mut parts: Vec<&str> = Vec::new();
        for segment in rest.split('/') {
            match segment {
                "" | "." => {}
                ".." => match parts.last() {
                    Some(&last) if last != ".." => {
                        parts.pop();
                    }
                    _ if prefix.is_empty() => parts.push(".."),
                    _ => {}
                },
                other => parts.push(other),
            }
        }

        let joined = parts.join("/");
        let inner = if prefix.is_empty() && joined.is_empty() {
            ".".to_string()
        } else {
            format!("{prefix}{joined}")
        };
        Self { inner }
    }

    /// Resolve a reference authored inside the manifest at `self`.
    ///
    /// Relative references are taken relative to this manifest's directory;
    /// absolute references stand on their own. Both come back cleaned. No
    /// filesystem access happens here.
    pub fn resolve_reference(&self, reference: &str) -> Self {
        let candidate = Self::new(reference.trim());
        if candidate.is_absolute() {
            return candidate.clean();
        }
        match self.parent() {
            Some(dir) => dir.join(candidate.as_str()).clean(),
            None => candidate.clean(),
        }
    }

    /// The remainder of this path below `base`, if it lies inside it.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<Self> {
        let base = base.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?.strip_prefix('/')?;
        if rest.is_empty() {
            None
        } else {
            Some(Self {
                inner: rest.to_string(),
            })
        }
    }

    /// Canonicalize an existing directory or file at the I/O boundary.
    ///
    /// Resolves symlinks and makes the path absolute without the `\\?\`
    /// prefix Windows would otherwise add.
    pub fn canonicalize(path: impl AsRef<Path>) -> std::io::Result<Self> {
        dunce::canonicalize(path).map(Self::new)
    }
}

/// Split the root prefix (`//`, `/` or `X:/`) from the rest of the path.
fn split_prefix(s: &str) -> (&str, &str) {
    let bytes = s.as_bytes();
    if s.starts_with("//") {
        ("//", &s[2..])
    } else if s.starts_with('/') {
        ("/", &s[1..])
    } else if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        (&s[..3], &s[3..])
    } else {
        ("", s)
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_prefix_variants() {
        assert_eq!(split_prefix("/a/b"), ("/", "a/b"));
        assert_eq!(split_prefix("//srv/share"), ("//", "srv/share"));
        assert_eq!(split_prefix("C:/src"), ("C:/", "src"));
        assert_eq!(split_prefix("src/a"), ("", "src/a"));
    }

    #[test]
    fn test_clean_keeps_root() {
        let path = NormalizedPath::new("/../../a");
        assert_eq!(path.clean().as_str(), "/a");
    }

    #[test]
    fn test_clean_empty_relative_is_dot() {
        let path = NormalizedPath::new("a/..");
        assert_eq!(path.clean().as_str(), ".");
    }
}
