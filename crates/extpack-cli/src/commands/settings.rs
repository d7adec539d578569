//! Merging of the config file with command-line overrides

use extpack_core::InstallerConfig;

use crate::cli::InstallSettings;
use crate::error::{CliError, Result};

/// Build the installer config from `--config` and the override flags.
///
/// Without a config file both `--app-version` and `--plugins-dir` are
/// required. The merged config is validated.
pub fn resolve_config(settings: &InstallSettings) -> Result<InstallerConfig> {
    let mut config = match &settings.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading config file");
            InstallerConfig::load(path)?
        }
        None => {
            let app_version = settings.app_version.clone().ok_or_else(|| {
                CliError::user("--app-version is required when no --config is given")
            })?;
            let plugins_dir = settings.plugins_dir.clone().ok_or_else(|| {
                CliError::user("--plugins-dir is required when no --config is given")
            })?;
            InstallerConfig::new(app_version, plugins_dir)
        }
    };

    if let Some(app_version) = &settings.app_version {
        config.app_version = app_version.clone();
    }
    if let Some(plugins_dir) = &settings.plugins_dir {
        config.plugins_dir = plugins_dir.clone();
    }
    if let Some(themes_dir) = &settings.themes_dir {
        config.themes_dir = Some(themes_dir.clone());
    }

    config.validate()?;
    Ok(config)
}
