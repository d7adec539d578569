//! Matching a plugin's `SupportedVersions` against the running application.
//!
//! ```
//! use extpack_core::version::is_supported;
//!
//! let supported = vec!["4.50".to_string(), "4.60".to_string()];
//! assert!(is_supported(&supported, "4.60"));
//! assert!(!is_supported(&supported, "4.70"));
//! ```

/// Whether `app_version` is one of the items of a plugin's supported
/// versions list. Items are compared as exact strings; an empty list
/// supports nothing.
pub fn is_supported(supported_versions: &[String], app_version: &str) -> bool {
    supported_versions.iter().any(|item| item == app_version)
}
