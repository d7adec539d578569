//! [`TestRoots`]: temporary plugin, theme and staging directories.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Install roots inside one temporary directory.
///
/// ```text
/// <temp>/Plugins
/// <temp>/Themes
/// <temp>/staging
/// <temp>/uploads
/// ```
pub struct TestRoots {
    temp_dir: TempDir,
}

impl Default for TestRoots {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRoots {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("Plugins")).unwrap();
        fs::create_dir_all(temp_dir.path().join("Themes")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.root().join("Plugins")
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.root().join("Themes")
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root().join("staging")
    }

    /// [`staging_dir`](Self::staging_dir) relative to the current working
    /// directory: `..` up to the filesystem root, then down to the staging
    /// directory.
    #[cfg(unix)]
    pub fn relative_staging_dir(&self) -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        let mut relative = PathBuf::new();
        for _ in cwd.components().skip(1) {
            relative.push("..");
        }
        relative.join(self.staging_dir().strip_prefix("/").unwrap())
    }

    /// Path for an archive the test writes before installing it.
    pub fn upload_path(&self, file_name: &str) -> PathBuf {
        self.root().join("uploads").join(file_name)
    }

    /// Files in the staging directory; empty when it does not exist.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        match fs::read_dir(self.staging_dir()) {
            Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Relative paths (forward slashes) of all files under `dir`.
    pub fn files_under(&self, dir: &Path) -> BTreeSet<String> {
        tree_snapshot(dir).into_keys().collect()
    }

    /// Assert that `dir` holds exactly `expected` files (relative paths).
    ///
    /// # Panics
    /// Panics with both listings when they differ.
    pub fn assert_files(&self, dir: &Path, expected: &[&str]) {
        let actual = self.files_under(dir);
        let expected: BTreeSet<String> = expected.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            actual,
            expected,
            "Unexpected files under {}",
            dir.display()
        );
    }
}

/// Map of relative file path to content checksum for every file under
/// `dir`. Missing directories yield an empty map.
pub fn tree_snapshot(dir: &Path) -> BTreeMap<String, String> {
    let mut snapshot = BTreeMap::new();
    collect(dir, dir, &mut snapshot);
    snapshot
}

fn collect(base: &Path, dir: &Path, snapshot: &mut BTreeMap<String, String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            collect(base, &path, snapshot);
        } else {
            let relative = path
                .strip_prefix(base)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            let checksum = extpack_fs::checksum::compute_file_checksum(&path).unwrap();
            snapshot.insert(relative, checksum);
        }
    }
}
