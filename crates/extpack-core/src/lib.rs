//! Extension package installer.
//!
//! Installs plugins and themes into an application's runtime directory tree
//! from a single zip upload. An archive either holds one extension (one
//! top-level directory with a descriptor file) or carries a manifest at its
//! root declaring several items, each extracted into its own directory.
//!
//! [`InstallOrchestrator`] is the entry point; the installers and readers it
//! drives are public so callers can run individual stages.

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod multi;
pub mod orchestrator;
pub mod single;
pub mod version;

pub use archive::ArchiveReader;
pub use config::InstallerConfig;
pub use descriptor::{ExtensionDescriptor, ExtensionKind, PluginDescriptor, ThemeDescriptor};
pub use error::{Error, Result};
pub use locator::{JsonPluginLocator, JsonThemeLocator, Locators, PluginLocator, ThemeLocator};
pub use manifest::{Manifest, ManifestEntry, ManifestResolver};
pub use multi::MultiItemInstaller;
pub use orchestrator::{ArchiveLayout, InstallOrchestrator, inspect_archive};
pub use single::SingleItemInstaller;
