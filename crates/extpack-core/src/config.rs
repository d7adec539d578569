//! Installer configuration.
//!
//! ```toml
//! app_version = "4.60"
//! plugins_dir = "/srv/app/Plugins"
//! themes_dir = "/srv/app/Themes"
//! ```

use std::path::{Path, PathBuf};

use extpack_fs::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::locator::{PLUGIN_DESCRIPTOR_FILE_NAME, THEME_DESCRIPTOR_FILE_NAME};
use crate::manifest::MANIFEST_FILE_NAME;

/// Name of the staging directory created under the OS temp directory when
/// no `staging_dir` is configured.
pub const DEFAULT_STAGING_DIR_NAME: &str = "extpack-uploads";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Version of the running application, checked against plugin
    /// `SupportedVersions`.
    pub app_version: String,
    pub plugins_dir: PathBuf,
    /// Themes root. Theme support is disabled when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes_dir: Option<PathBuf>,
    /// Where uploads are staged while they are installed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
    #[serde(default = "default_manifest_file_name")]
    pub manifest_file_name: String,
    #[serde(default = "default_plugin_descriptor_file_name")]
    pub plugin_descriptor_file_name: String,
    #[serde(default = "default_theme_descriptor_file_name")]
    pub theme_descriptor_file_name: String,
}

fn default_manifest_file_name() -> String {
    MANIFEST_FILE_NAME.to_string()
}

fn default_plugin_descriptor_file_name() -> String {
    PLUGIN_DESCRIPTOR_FILE_NAME.to_string()
}

fn default_theme_descriptor_file_name() -> String {
    THEME_DESCRIPTOR_FILE_NAME.to_string()
}

impl InstallerConfig {
    pub fn new(app_version: impl Into<String>, plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_version: app_version.into(),
            plugins_dir: plugins_dir.into(),
            themes_dir: None,
            staging_dir: None,
            manifest_file_name: default_manifest_file_name(),
            plugin_descriptor_file_name: default_plugin_descriptor_file_name(),
            theme_descriptor_file_name: default_theme_descriptor_file_name(),
        }
    }

    /// Load and validate a config file (`.toml`, `.json`, `.yaml` or `.yml`).
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config in the format given by `path`'s extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_version.trim().is_empty() {
            return Err(Error::InvalidConfig("app_version must not be empty".to_string()));
        }
        if self.plugins_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("plugins_dir must not be empty".to_string()));
        }
        for (key, value) in [
            ("manifest_file_name", &self.manifest_file_name),
            ("plugin_descriptor_file_name", &self.plugin_descriptor_file_name),
            ("theme_descriptor_file_name", &self.theme_descriptor_file_name),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) {
                return Err(Error::InvalidConfig(format!(
                    "{key} must be a plain file name, got '{value}'"
                )));
            }
        }
        Ok(())
    }

    /// Configured staging directory, or `<temp>/extpack-uploads`.
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_STAGING_DIR_NAME))
    }
}
