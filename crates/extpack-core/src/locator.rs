//! Plugin and theme locators.
//!
//! A locator knows where one kind of extension lives on disk, what its
//! descriptor file is called and how to turn descriptor text into a
//! descriptor. The installer receives a plugin locator and, optionally, a
//! theme locator; without one every theme branch is inert.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::descriptor::{ExtensionDescriptor, ExtensionKind, PluginDescriptor, ThemeDescriptor};
use crate::error::{Error, Result};

/// Default plugin descriptor file name.
pub const PLUGIN_DESCRIPTOR_FILE_NAME: &str = "plugin.json";

/// Default theme descriptor file name.
pub const THEME_DESCRIPTOR_FILE_NAME: &str = "theme.json";

pub trait PluginLocator: Send + Sync {
    /// Root directory that installed plugins live under.
    fn plugins_dir(&self) -> &Path;

    /// File name of the descriptor inside each plugin directory.
    fn descriptor_file_name(&self) -> &str;

    fn parse_descriptor(&self, text: &str) -> Result<PluginDescriptor>;
}

pub trait ThemeLocator: Send + Sync {
    /// Root directory that installed themes live under.
    fn themes_dir(&self) -> &Path;

    /// File name of the descriptor inside each theme directory.
    fn descriptor_file_name(&self) -> &str;

    fn parse_descriptor(&self, text: &str) -> Result<ThemeDescriptor>;
}

/// Plugin locator reading JSON `plugin.json` descriptors.
#[derive(Debug, Clone)]
pub struct JsonPluginLocator {
    plugins_dir: PathBuf,
    descriptor_file_name: String,
}

impl JsonPluginLocator {
    pub fn new(plugins_dir: impl Into<PathBuf>) -> Self {
        Self {
            plugins_dir: plugins_dir.into(),
            descriptor_file_name: PLUGIN_DESCRIPTOR_FILE_NAME.to_string(),
        }
    }

    pub fn with_descriptor_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.descriptor_file_name = file_name.into();
        self
    }
}

impl PluginLocator for JsonPluginLocator {
    fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    fn descriptor_file_name(&self) -> &str {
        &self.descriptor_file_name
    }

    fn parse_descriptor(&self, text: &str) -> Result<PluginDescriptor> {
        parse_json(ExtensionKind::Plugin, text)
    }
}

/// Theme locator reading JSON `theme.json` descriptors.
#[derive(Debug, Clone)]
pub struct JsonThemeLocator {
    themes_dir: PathBuf,
    descriptor_file_name: String,
}

impl JsonThemeLocator {
    pub fn new(themes_dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: themes_dir.into(),
            descriptor_file_name: THEME_DESCRIPTOR_FILE_NAME.to_string(),
        }
    }

    pub fn with_descriptor_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.descriptor_file_name = file_name.into();
        self
    }
}

impl ThemeLocator for JsonThemeLocator {
    fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    fn descriptor_file_name(&self) -> &str {
        &self.descriptor_file_name
    }

    fn parse_descriptor(&self, text: &str) -> Result<ThemeDescriptor> {
        parse_json(ExtensionKind::Theme, text)
    }
}

fn parse_json<T: DeserializeOwned>(kind: ExtensionKind, text: &str) -> Result<T> {
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Err(Error::DescriptorParse {
            kind,
            message: "descriptor is empty".to_string(),
        });
    }

    serde_json::from_str(text).map_err(|e| Error::DescriptorParse {
        kind,
        message: e.to_string(),
    })
}

/// The locators available to an installation, keyed by extension kind.
pub struct Locators {
    plugins: Box<dyn PluginLocator>,
    themes: Option<Box<dyn ThemeLocator>>,
}

impl Locators {
    pub fn new(plugins: impl PluginLocator + 'static) -> Self {
        Self {
            plugins: Box::new(plugins),
            themes: None,
        }
    }

    pub fn with_themes(mut self, themes: impl ThemeLocator + 'static) -> Self {
        self.themes = Some(Box::new(themes));
        self
    }

    pub fn themes_enabled(&self) -> bool {
        self.themes.is_some()
    }

    /// Descriptor file name for `kind`, or `None` when that kind is disabled.
    pub fn descriptor_file_name(&self, kind: ExtensionKind) -> Option<&str> {
        match kind {
            ExtensionKind::Plugin => Some(self.plugins.descriptor_file_name()),
            ExtensionKind::Theme => self.themes.as_ref().map(|t| t.descriptor_file_name()),
        }
    }

    /// Parse descriptor text through the locator for `kind`.
    pub fn parse(&self, kind: ExtensionKind, text: &str) -> Result<ExtensionDescriptor> {
        match kind {
            ExtensionKind::Plugin => self
                .plugins
                .parse_descriptor(text)
                .map(ExtensionDescriptor::Plugin),
            ExtensionKind::Theme => self
                .themes
                .as_ref()
                .ok_or_else(themes_disabled)?
                .parse_descriptor(text)
                .map(ExtensionDescriptor::Theme),
        }
    }

    /// Root directory that items of `kind` are installed under.
    pub fn root_dir(&self, kind: ExtensionKind) -> Result<&Path> {
        let root = match kind {
            ExtensionKind::Plugin => self.plugins.plugins_dir(),
            ExtensionKind::Theme => self
                .themes
                .as_ref()
                .ok_or_else(themes_disabled)?
                .themes_dir(),
        };

        if root.as_os_str().is_empty() {
            return Err(Error::UnresolvedTargetDirectory {
                kind,
                reason: "root directory is not configured".to_string(),
            });
        }
        Ok(root)
    }
}

impl std::fmt::Debug for Locators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Locators")
            .field("plugins_dir", &self.plugins.plugins_dir())
            .field("themes_dir", &self.themes.as_ref().map(|t| t.themes_dir()))
            .finish()
    }
}

fn themes_disabled() -> Error {
    Error::UnresolvedTargetDirectory {
        kind: ExtensionKind::Theme,
        reason: "theme support is disabled".to_string(),
    }
}
