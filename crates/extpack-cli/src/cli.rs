//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Install plugin and theme packages from zip archives
#[derive(Parser, Debug)]
#[command(name = "extpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install an extension archive
    ///
    /// An archive with an uploadedItems.json manifest at its root installs
    /// every item it declares; otherwise its single top-level directory is
    /// installed as one plugin or theme.
    ///
    /// Examples:
    ///   extpack install Payments.Demo.zip --config extpack.toml
    ///   extpack install bundle.zip --app-version 4.60 --plugins-dir ./Plugins
    Install {
        /// Path to the .zip archive
        archive: PathBuf,

        #[command(flatten)]
        settings: InstallSettings,

        /// Output installed descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how an archive would be installed without installing it
    Inspect {
        /// Path to the .zip archive
        archive: PathBuf,

        /// Config file (.toml, .json, .yaml)
        #[arg(short, long, env = "EXTPACK_CONFIG")]
        config: Option<PathBuf>,

        /// Output the layout as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where the installer settings come from. Flags override the config file.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSettings {
    /// Config file (.toml, .json, .yaml)
    #[arg(short, long, env = "EXTPACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Running application version, checked against plugin SupportedVersions
    #[arg(long)]
    pub app_version: Option<String>,

    /// Plugins root directory
    #[arg(long)]
    pub plugins_dir: Option<PathBuf>,

    /// Themes root directory; theme support is disabled without one
    #[arg(long)]
    pub themes_dir: Option<PathBuf>,
}
