//! [`ZipFixture`] builds zip archives in memory for installer tests.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Ordered list of archive entries, written out as a zip on demand.
///
/// # Example
///
/// ```rust
/// use extpack_test_utils::ZipFixture;
///
/// let bytes = ZipFixture::new()
///     .plugin("Payments.Demo", "Payments.Demo", &["4.60"])
///     .file("Payments.Demo/lib/Payments.Demo.dll", "binary")
///     .to_bytes();
/// assert!(!bytes.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZipFixture {
    entries: Vec<(String, Option<Vec<u8>>)>,
}

impl ZipFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicit directory entry (`name/`).
    pub fn dir(mut self, name: &str) -> Self {
        let name = format!("{}/", name.trim_end_matches('/'));
        self.entries.push((name, None));
        self
    }

    /// Add a file entry.
    pub fn file(mut self, name: &str, content: impl AsRef<[u8]>) -> Self {
        self.entries
            .push((name.to_string(), Some(content.as_ref().to_vec())));
        self
    }

    /// Add `dir/` and `dir/plugin.json` for a plugin.
    pub fn plugin(self, dir: &str, system_name: &str, supported_versions: &[&str]) -> Self {
        let descriptor = plugin_json(system_name, supported_versions);
        self.dir(dir)
            .file(&format!("{}/plugin.json", dir.trim_end_matches('/')), descriptor)
    }

    /// Add `dir/` and `dir/theme.json` for a theme.
    pub fn theme(self, dir: &str, system_name: &str) -> Self {
        let descriptor = theme_json(system_name);
        self.dir(dir)
            .file(&format!("{}/theme.json", dir.trim_end_matches('/')), descriptor)
    }

    /// Add `uploadedItems.json` at the archive root.
    pub fn manifest(self, json: &str) -> Self {
        self.file("uploadedItems.json", json)
    }

    /// Serialize the archive.
    ///
    /// # Panics
    /// Panics if the zip writer fails, which only happens on invalid input.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        for (name, content) in &self.entries {
            match content {
                None => writer
                    .add_directory(name.as_str(), options)
                    .unwrap_or_else(|e| panic!("ZipFixture: cannot add directory {name}: {e}")),
                Some(bytes) => {
                    writer
                        .start_file(name.as_str(), options)
                        .unwrap_or_else(|e| panic!("ZipFixture: cannot add file {name}: {e}"));
                    writer.write_all(bytes).unwrap();
                }
            }
        }

        writer.finish().unwrap().into_inner()
    }

    /// Write the archive to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> PathBuf {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, self.to_bytes()).unwrap();
        path.to_path_buf()
    }
}

/// A `plugin.json` body.
pub fn plugin_json(system_name: &str, supported_versions: &[&str]) -> String {
    serde_json::json!({
        "Group": "Misc",
        "FriendlyName": system_name,
        "SystemName": system_name,
        "Version": "1.00",
        "SupportedVersions": supported_versions,
        "Author": "extpack tests",
        "DisplayOrder": 1,
        "FileName": format!("{system_name}.dll"),
    })
    .to_string()
}

/// A `theme.json` body.
pub fn theme_json(system_name: &str) -> String {
    serde_json::json!({
        "SystemName": system_name,
        "FriendlyName": system_name,
        "SupportRTL": false,
        "PreviewImageUrl": format!("~/Themes/{system_name}/preview.jpg"),
        "PreviewText": "Test theme",
    })
    .to_string()
}
