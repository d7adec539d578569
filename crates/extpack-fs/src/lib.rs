//! Filesystem layer for the extension package installer
//!
//! Provides sanitized path handling, atomic writes, robust directory
//! replacement and format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, safe_relative};
