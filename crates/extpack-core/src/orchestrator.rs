//! Entry point for installing an uploaded archive.

use std::path::{Path, PathBuf};

use extpack_fs::{NormalizedPath, RobustnessConfig, checksum, io};
use serde::Serialize;

use crate::archive::ArchiveReader;
use crate::config::InstallerConfig;
use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::locator::{JsonPluginLocator, JsonThemeLocator, Locators, PluginLocator, ThemeLocator};
use crate::manifest::{ManifestEntry, ManifestResolver};
use crate::multi::MultiItemInstaller;
use crate::single::SingleItemInstaller;

/// How an archive would be installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ArchiveLayout {
    /// No manifest; the archive's top-level directories (exactly one is
    /// installable).
    Single { directories: Vec<String> },
    /// A non-empty manifest drives the install.
    Multi { entries: Vec<ManifestEntry> },
}

/// Installs uploaded extension archives.
///
/// Calls must be serialized by the caller: no locking is done on the
/// install roots or the staging directory.
#[derive(Debug)]
pub struct InstallOrchestrator {
    locators: Locators,
    app_version: String,
    staging_dir: PathBuf,
    resolver: ManifestResolver,
    robustness: RobustnessConfig,
}

impl InstallOrchestrator {
    /// Create an orchestrator with theme support disabled.
    pub fn new(app_version: impl Into<String>, plugins: impl PluginLocator + 'static) -> Self {
        Self {
            locators: Locators::new(plugins),
            app_version: app_version.into(),
            staging_dir: std::env::temp_dir().join(crate::config::DEFAULT_STAGING_DIR_NAME),
            resolver: ManifestResolver::default(),
            robustness: RobustnessConfig::default(),
        }
    }

    /// Build an orchestrator with JSON locators from validated config.
    pub fn from_config(config: &InstallerConfig) -> Result<Self> {
        config.validate()?;

        let plugins = JsonPluginLocator::new(&config.plugins_dir)
            .with_descriptor_file_name(&config.plugin_descriptor_file_name);
        let mut orchestrator = Self::new(&config.app_version, plugins)
            .with_staging_dir(config.staging_dir())
            .with_manifest_file_name(&config.manifest_file_name);

        if let Some(themes_dir) = &config.themes_dir {
            orchestrator = orchestrator.with_theme_locator(
                JsonThemeLocator::new(themes_dir)
                    .with_descriptor_file_name(&config.theme_descriptor_file_name),
            );
        }
        Ok(orchestrator)
    }

    pub fn with_theme_locator(mut self, themes: impl ThemeLocator + 'static) -> Self {
        self.locators = self.locators.with_themes(themes);
        self
    }

    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    pub fn with_manifest_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.resolver = ManifestResolver::new(file_name);
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Install an uploaded archive.
    ///
    /// `file_name` is the name the archive was uploaded under; only `.zip`
    /// is accepted. The upload is staged under that name and the staged
    /// file is removed again on every exit path.
    pub fn install_from_upload(
        &self,
        file_name: &str,
        content: Option<&[u8]>,
    ) -> Result<Vec<ExtensionDescriptor>> {
        let content = match content {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                return Err(Error::InvalidArgument(
                    "no archive content was uploaded".to_string(),
                ));
            }
        };

        let staged_name = NormalizedPath::new(file_name)
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidArgument(format!("'{file_name}' is not a file name")))?;
        let is_zip = Path::new(&staged_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if !is_zip {
            return Err(Error::UnsupportedFileType {
                file_name: file_name.to_string(),
            });
        }

        let staged = StagedArchive::stage(&self.staging_dir, &staged_name, content)?;
        tracing::info!(
            archive = %staged.path().display(),
            checksum = %checksum::compute_bytes_checksum(content),
            bytes = content.len(),
            "Staged upload"
        );

        self.install_staged(staged.path())
    }

    /// Install a local archive file as if it had been uploaded.
    pub fn install_file(&self, path: &Path) -> Result<Vec<ExtensionDescriptor>> {
        let content = std::fs::read(path).map_err(|e| extpack_fs::Error::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.install_from_upload(&file_name, Some(content.as_slice()))
    }

    /// Report how the archive at `path` would be installed without
    /// touching any install root.
    pub fn inspect(&self, path: &Path) -> Result<ArchiveLayout> {
        inspect_archive(path, &self.resolver)
    }

    fn install_staged(&self, archive_path: &Path) -> Result<Vec<ExtensionDescriptor>> {
        match self.resolver.resolve(archive_path)? {
            Some(manifest) if !manifest.is_empty() => {
                tracing::debug!(items = manifest.len(), "Installing from manifest");
                MultiItemInstaller::new(&self.locators, &self.app_version)
                    .with_robustness(self.robustness)
                    .install(archive_path, &manifest)
            }
            _ => {
                tracing::debug!("No manifest, installing single item");
                let descriptor = SingleItemInstaller::new(&self.locators, &self.app_version)
                    .with_robustness(self.robustness)
                    .install(archive_path)?;
                Ok(vec![descriptor])
            }
        }
    }
}

/// Report the layout of the archive at `path`, looking for the manifest
/// `resolver` names.
pub fn inspect_archive(path: &Path, resolver: &ManifestResolver) -> Result<ArchiveLayout> {
    let mut reader = ArchiveReader::open(path)?;
    match resolver.resolve_in(&mut reader)? {
        Some(entries) if !entries.is_empty() => Ok(ArchiveLayout::Multi { entries }),
        _ => Ok(ArchiveLayout::Single {
            directories: reader.top_level_directories(),
        }),
    }
}

/// An upload written to the staging directory, deleted on drop.
#[derive(Debug)]
struct StagedArchive {
    path: PathBuf,
}

impl StagedArchive {
    fn stage(staging_dir: &Path, file_name: &str, content: &[u8]) -> Result<Self> {
        let path = staging_dir.join(file_name);
        io::write_atomic(&path, content)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedArchive {
    fn drop(&mut self) {
        match io::remove_file_if_exists(&self.path) {
            Ok(_) => tracing::debug!(archive = %self.path.display(), "Removed staged upload"),
            Err(e) => tracing::warn!(
                archive = %self.path.display(),
                error = %e,
                "Failed to remove staged upload"
            ),
        }
    }
}
