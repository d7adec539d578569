//! Normalized client-supplied names and archive entry sanitization

use std::path::{Path, PathBuf};

/// A client-supplied path or name, normalized to forward slashes.
///
/// `.` segments and repeated separators are dropped and `..` segments are
/// resolved against the preceding segment. A `..` that would climb above the
/// start of a relative path is discarded. Host paths that get opened are
/// kept as plain [`Path`]s and never go through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self {
            inner: resolve_segments(&raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the final path component, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension of the final component, if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }
}

fn resolve_segments(raw: &str) -> String {
    let absolute = raw.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Convert an archive-relative entry name into a relative filesystem path.
///
/// Returns `None` when the name is absolute, carries a drive or scheme
/// prefix, contains a `..` segment, or has no segments at all. Callers skip
/// such entries instead of writing them.
pub fn safe_relative(entry_name: &str) -> Option<PathBuf> {
    let name = entry_name.replace('\\', "/");
    if name.starts_with('/') {
        return None;
    }

    let mut relative = PathBuf::new();
    for segment in name.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains(':') => return None,
            s => relative.push(s),
        }
    }

    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
