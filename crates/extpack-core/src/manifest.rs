//! The multi-item manifest (`uploadedItems.json`) at the archive root.
//!
//! # Example
//!
//! ```json
//! [
//!   {
//!     "Type": "Plugin",
//!     "SystemName": "Payments.Demo",
//!     "Version": "1.10",
//!     "DirectoryPath": "Plugins/Payments.Demo",
//!     "SourceDirectoryPath": "src/Plugins/Payments.Demo"
//!   },
//!   { "Type": "Theme", "DirectoryPath": "Themes/Midnight" }
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archive::ArchiveReader;
use crate::descriptor::ExtensionKind;
use crate::error::{Error, Result};

/// Default manifest entry name.
pub const MANIFEST_FILE_NAME: &str = "uploadedItems.json";

/// One item declared by a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManifestEntry {
    /// Kind of item; entries without one are skipped.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<ExtensionKind>,
    #[serde(default)]
    pub system_name: String,
    #[serde(default)]
    pub version: String,
    /// Archive-relative directory holding the item's files.
    #[serde(default)]
    pub directory_path: String,
    #[serde(default)]
    pub source_directory_path: String,
}

impl ManifestEntry {
    /// [`directory_path`](Self::directory_path) normalized to forward slashes
    /// with exactly one trailing slash.
    pub fn directory_prefix(&self) -> String {
        normalize_directory_path(&self.directory_path)
    }
}

/// Ordered manifest items; order is processing order.
pub type Manifest = Vec<ManifestEntry>;

/// Locates and parses the manifest of an archive.
#[derive(Debug, Clone)]
pub struct ManifestResolver {
    file_name: String,
}

impl Default for ManifestResolver {
    fn default() -> Self {
        Self::new(MANIFEST_FILE_NAME)
    }
}

impl ManifestResolver {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Open the archive at `archive_path` and read its manifest.
    pub fn resolve(&self, archive_path: &Path) -> Result<Option<Manifest>> {
        let mut reader = ArchiveReader::open(archive_path)?;
        self.resolve_in(&mut reader)
    }

    /// Read the manifest from an already open archive.
    ///
    /// Returns `None` when there is no manifest entry at the archive root or
    /// the entry is blank. Unparseable content is
    /// [`Error::MalformedManifest`].
    pub fn resolve_in(&self, reader: &mut ArchiveReader) -> Result<Option<Manifest>> {
        let Some(entry_name) = reader
            .entry_names()
            .into_iter()
            .filter(|name| !name.contains('/'))
            .find(|name| name.eq_ignore_ascii_case(&self.file_name))
        else {
            return Ok(None);
        };

        let Some(text) = reader.read_entry_text(&entry_name)? else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Ok(None);
        }

        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|source| Error::MalformedManifest {
                entry: entry_name.clone(),
                source,
            })?;
        tracing::debug!(entry = %entry_name, items = manifest.len(), "Resolved archive manifest");
        Ok(Some(manifest))
    }
}

/// Normalize a manifest directory path: backslashes become slashes, a
/// leading `./` or `/` is dropped and the result ends with exactly one `/`.
pub fn normalize_directory_path(raw: &str) -> String {
    let unified = raw.trim().replace('\\', "/");
    let mut path = unified.as_str();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }
    format!("{}/", path.trim_end_matches('/'))
}

/// Last segment of a directory path, if it is usable as an install
/// directory name.
pub fn directory_name(path: &str) -> Option<&str> {
    let name = path.trim_end_matches('/').rsplit('/').next()?;
    is_safe_directory_name(name).then_some(name)
}

/// Whether `name` can be joined onto an install root as a single directory.
pub fn is_safe_directory_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', ':'])
}
