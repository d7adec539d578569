//! Read-only access to an uploaded zip archive.
//!
//! Entry names are archive-relative and forward-slash separated; directory
//! entries end with a slash. Lookups by name are case-insensitive.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use extpack_fs::{io, safe_relative};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// An open zip archive.
pub struct ArchiveReader {
    path: PathBuf,
    archive: ZipArchive<File>,
}

impl ArchiveReader {
    /// Open the archive at `path` for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| extpack_fs::Error::io(path, e))?;
        let archive = ZipArchive::new(file).map_err(|e| Error::archive(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .map(str::to_string)
            .collect()
    }

    /// The stored name of the entry matching `name` case-insensitively.
    pub fn find_entry(&self, name: &str) -> Option<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(str::to_string)
    }

    /// Decoded text of the entry matching `name`, or `None` if there is no
    /// such entry. A leading UTF-8 byte order mark is removed.
    pub fn read_entry_text(&mut self, name: &str) -> Result<Option<String>> {
        let Some(stored) = self.find_entry(name) else {
            return Ok(None);
        };

        let mut entry = self
            .archive
            .by_name(&stored)
            .map_err(|e| Error::archive(&self.path, e))?;
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| extpack_fs::Error::io(&self.path, e))?;

        let text = String::from_utf8_lossy(&bytes);
        Ok(Some(text.trim_start_matches('\u{feff}').to_string()))
    }

    /// Names of the directory entries at the archive root, in archive order.
    ///
    /// A top-level directory is an entry whose name has exactly one slash,
    /// at the end (`name/`). Directories only implied by nested file names
    /// do not count.
    pub fn top_level_directories(&self) -> Vec<String> {
        self.entry_names()
            .into_iter()
            .filter_map(|name| {
                let dir = name.strip_suffix('/')?;
                (!dir.is_empty() && !dir.contains('/')).then(|| dir.to_string())
            })
            .collect()
    }

    /// Extract every entry under `dest`, mirroring the archive layout.
    ///
    /// Entries whose names would escape `dest` are skipped. Returns the
    /// number of files written.
    pub fn extract_all(&mut self, dest: &Path) -> Result<usize> {
        fs::create_dir_all(dest).map_err(|e| extpack_fs::Error::io(dest, e))?;

        let mut written = 0;
        for index in 0..self.archive.len() {
            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|e| Error::archive(&self.path, e))?;
            let name = entry.name().to_string();

            let Some(relative) = safe_relative(&name) else {
                tracing::warn!(entry = %name, "Skipping archive entry with unsafe path");
                continue;
            };
            let target = dest.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&target).map_err(|e| extpack_fs::Error::io(&target, e))?;
            } else {
                io::write_stream(&target, &mut entry)?;
                written += 1;
            }
        }

        Ok(written)
    }

    /// Extract the entries under `prefix` (which ends with `/`) into `dest`,
    /// with the prefix stripped from each name. Prefix matching ignores case.
    ///
    /// Returns the number of files written.
    pub fn extract_prefix(&mut self, prefix: &str, dest: &Path) -> Result<usize> {
        let mut written = 0;
        for index in 0..self.archive.len() {
            let Some(name) = self.archive.name_for_index(index).map(str::to_string) else {
                continue;
            };
            let Some(relative_name) = strip_prefix_ignore_case(&name, prefix) else {
                continue;
            };
            if relative_name.is_empty() {
                continue;
            }

            let Some(relative) = safe_relative(relative_name) else {
                tracing::warn!(entry = %name, "Skipping archive entry with unsafe path");
                continue;
            };
            let target = dest.join(relative);

            if relative_name.ends_with('/') {
                fs::create_dir_all(&target).map_err(|e| extpack_fs::Error::io(&target, e))?;
                continue;
            }

            let mut entry = self
                .archive
                .by_index(index)
                .map_err(|e| Error::archive(&self.path, e))?;
            io::write_stream(&target, &mut entry)?;
            written += 1;
        }

        Ok(written)
    }
}

impl std::fmt::Debug for ArchiveReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveReader")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .finish()
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        name.get(prefix.len()..)
    } else {
        None
    }
}
