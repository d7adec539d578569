//! Shared test fixtures for the extpack workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`archive`]: [`ZipFixture`] builder for upload archives
//! - [`roots`]: [`TestRoots`] temporary install roots with tree assertions

pub mod archive;
pub mod roots;

pub use archive::{ZipFixture, plugin_json, theme_json};
pub use roots::{TestRoots, tree_snapshot};
