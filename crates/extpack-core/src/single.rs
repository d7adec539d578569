//! Installation of an archive holding exactly one extension.

use std::path::Path;

use extpack_fs::{RobustnessConfig, io};

use crate::archive::ArchiveReader;
use crate::descriptor::{ExtensionDescriptor, ExtensionKind};
use crate::error::{Error, Result};
use crate::locator::Locators;
use crate::manifest::is_safe_directory_name;
use crate::version;

/// Installs an archive whose single top-level directory is the extension.
///
/// Installation is all-or-nothing up to the point of replacement: every
/// check runs before an existing install directory is removed.
#[derive(Debug)]
pub struct SingleItemInstaller<'a> {
    locators: &'a Locators,
    app_version: &'a str,
    robustness: RobustnessConfig,
}

impl<'a> SingleItemInstaller<'a> {
    pub fn new(locators: &'a Locators, app_version: &'a str) -> Self {
        Self {
            locators,
            app_version,
            robustness: RobustnessConfig::default(),
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Install the archive at `archive_path`.
    ///
    /// The archive's top-level directory name becomes the installed
    /// directory name under the plugins or themes root.
    pub fn install(&self, archive_path: &Path) -> Result<ExtensionDescriptor> {
        let (root_dir, descriptor) = {
            let mut reader = ArchiveReader::open(archive_path)?;
            let root_dir = single_root_directory(&reader)?;
            let (kind, text) = self.find_descriptor(&mut reader, &root_dir)?;
            (root_dir, self.locators.parse(kind, &text)?)
        };

        if let ExtensionDescriptor::Plugin(plugin) = &descriptor {
            if !version::is_supported(&plugin.supported_versions, self.app_version) {
                return Err(Error::UnsupportedVersion {
                    system_name: plugin.system_name.clone(),
                    app_version: self.app_version.to_string(),
                    supported: plugin.supported_versions.clone(),
                });
            }
        }

        let kind = descriptor.kind();
        if !is_safe_directory_name(&root_dir) {
            return Err(Error::UnresolvedTargetDirectory {
                kind,
                reason: format!("'{root_dir}' is not a usable directory name"),
            });
        }
        let target_root = self.locators.root_dir(kind)?;
        let target = target_root.join(&root_dir);

        if target.exists() {
            tracing::info!(path = %target.display(), "Removing previous installation");
            io::remove_dir_all(&target, &self.robustness)?;
        }

        let written = ArchiveReader::open(archive_path)?.extract_all(target_root)?;
        tracing::info!(
            kind = %kind,
            system_name = %descriptor.system_name(),
            path = %target.display(),
            files = written,
            "Installed extension"
        );

        Ok(descriptor)
    }

    /// First descriptor found directly under `root_dir`; plugins win over
    /// themes, and themes are only considered when a theme locator is set.
    fn find_descriptor(
        &self,
        reader: &mut ArchiveReader,
        root_dir: &str,
    ) -> Result<(ExtensionKind, String)> {
        for kind in ExtensionKind::ALL {
            let Some(file_name) = self.locators.descriptor_file_name(kind) else {
                continue;
            };
            let entry = format!("{root_dir}/{file_name}");
            if let Some(text) = reader.read_entry_text(&entry)? {
                tracing::debug!(%entry, kind = %kind, "Found descriptor");
                return Ok((kind, text));
            }
        }

        Err(Error::DescriptorNotFound {
            directory: root_dir.to_string(),
        })
    }
}

fn single_root_directory(reader: &ArchiveReader) -> Result<String> {
    let mut directories = reader.top_level_directories();
    if directories.len() != 1 {
        return Err(Error::AmbiguousArchiveLayout { directories });
    }
    Ok(directories.remove(0))
}
