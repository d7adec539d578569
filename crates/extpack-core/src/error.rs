use std::path::PathBuf;

use crate::descriptor::ExtensionKind;

/// Errors that can occur while installing an extension package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The upload carried no content.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The uploaded file is not a `.zip` archive.
    #[error("unsupported file type '{file_name}': only .zip archives can be installed")]
    UnsupportedFileType { file_name: String },

    /// A single-item archive does not hold exactly one top-level directory.
    #[error("archive must contain exactly one top-level directory, found {}: {directories:?}", .directories.len())]
    AmbiguousArchiveLayout { directories: Vec<String> },

    /// No plugin or theme descriptor directly under the archive's root directory.
    #[error("no plugin or theme descriptor found in '{directory}'")]
    DescriptorNotFound { directory: String },

    /// The plugin does not list the running application version.
    #[error(
        "plugin '{system_name}' does not support application version {app_version} (supports {supported:?})"
    )]
    UnsupportedVersion {
        system_name: String,
        app_version: String,
        supported: Vec<String>,
    },

    /// The item cannot be mapped to a directory on disk.
    #[error("cannot resolve target directory for {kind}: {reason}")]
    UnresolvedTargetDirectory { kind: ExtensionKind, reason: String },

    /// The manifest entry exists but is not a valid JSON item list.
    #[error("malformed manifest '{entry}': {source}")]
    MalformedManifest {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    /// Descriptor text could not be turned into a descriptor.
    #[error("failed to parse {kind} descriptor: {message}")]
    DescriptorParse { kind: ExtensionKind, message: String },

    /// The archive could not be opened or one of its entries could not be read.
    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    /// Installer configuration failed validation.
    #[error("invalid installer configuration: {0}")]
    InvalidConfig(String),

    /// Filesystem failure while staging, replacing or extracting.
    #[error(transparent)]
    Fs(#[from] extpack_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }
}
