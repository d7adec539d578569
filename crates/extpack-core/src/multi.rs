//! Installation of an archive that declares its items in a manifest.
//!
//! Items are processed in manifest order and independently: an item that
//! cannot be installed is logged and left out of the result, and only a
//! failure to open the archive aborts the batch.

use std::path::Path;

use extpack_fs::{RobustnessConfig, io};

use crate::archive::ArchiveReader;
use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::locator::Locators;
use crate::manifest::{ManifestEntry, directory_name};
use crate::version;

/// Why a manifest item was not installed.
#[derive(Debug)]
enum Skip {
    MissingType,
    KindDisabled,
    DescriptorMissing(String),
    Unparseable(Error),
    UnsupportedVersion { supported: Vec<String> },
    UnusableDirectory(String),
    Failed(Error),
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingType => f.write_str("no item type declared"),
            Self::KindDisabled => f.write_str("theme support is disabled"),
            Self::DescriptorMissing(entry) => write!(f, "descriptor '{entry}' not in archive"),
            Self::Unparseable(e) => write!(f, "{e}"),
            Self::UnsupportedVersion { supported } => {
                write!(f, "application version not in supported versions {supported:?}")
            }
            Self::UnusableDirectory(path) => {
                write!(f, "directory path '{path}' has no usable directory name")
            }
            Self::Failed(e) => write!(f, "installation failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct MultiItemInstaller<'a> {
    locators: &'a Locators,
    app_version: &'a str,
    robustness: RobustnessConfig,
}

impl<'a> MultiItemInstaller<'a> {
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

    /// Install every installable item of `manifest` from the archive.
    ///
    /// Returns the descriptors of the installed items in manifest order.
    /// Compare its length with the manifest to detect skipped items.
    pub fn install(
        &self,
        archive_path: &Path,
        manifest: &[ManifestEntry],
    ) -> Result<Vec<ExtensionDescriptor>> {
        let mut reader = ArchiveReader::open(archive_path)?;
        let mut installed = Vec::with_capacity(manifest.len());

        for (index, entry) in manifest.iter().enumerate() {
            match self.install_entry(&mut reader, entry) {
                Ok(descriptor) => installed.push(descriptor),
                Err(reason) => tracing::warn!(
                    index,
                    system_name = %entry.system_name,
                    directory = %entry.directory_path,
                    %reason,
                    "Skipping manifest item"
                ),
            }
        }

        tracing::info!(
            declared = manifest.len(),
            installed = installed.len(),
            "Finished multi-item install"
        );
        Ok(installed)
    }

    fn install_entry(
        &self,
        reader: &mut ArchiveReader,
        entry: &ManifestEntry,
    ) -> std::result::Result<ExtensionDescriptor, Skip> {
        let kind = entry.item_type.ok_or(Skip::MissingType)?;
        let prefix = entry.directory_prefix();
        let file_name = self
            .locators
            .descriptor_file_name(kind)
            .ok_or(Skip::KindDisabled)?;
        let descriptor_entry = format!("{prefix}{file_name}");

        let text = reader
            .read_entry_text(&descriptor_entry)
            .map_err(Skip::Failed)?
            .ok_or_else(|| Skip::DescriptorMissing(descriptor_entry.clone()))?;
        let descriptor = self
            .locators
            .parse(kind, &text)
            .map_err(Skip::Unparseable)?;

        if let ExtensionDescriptor::Plugin(plugin) = &descriptor {
            if !version::is_supported(&plugin.supported_versions, self.app_version) {
                return Err(Skip::UnsupportedVersion {
                    supported: plugin.supported_versions.clone(),
                });
            }
        }

        let name = directory_name(&prefix).ok_or_else(|| Skip::UnusableDirectory(prefix.clone()))?;
        let target = self.locators.root_dir(kind).map_err(Skip::Failed)?.join(name);

        if target.exists() {
            tracing::info!(path = %target.display(), "Removing previous installation");
            io::remove_dir_all(&target, &self.robustness)
                .map_err(|e| Skip::Failed(e.into()))?;
        }

        let written = reader
            .extract_prefix(&prefix, &target)
            .map_err(Skip::Failed)?;
        tracing::info!(
            kind = %kind,
            system_name = %descriptor.system_name(),
            path = %target.display(),
            files = written,
            "Installed extension"
        );

        Ok(descriptor)
    }
}
