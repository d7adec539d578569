//! Command implementations for extpack-cli

pub mod inspect;
pub mod install;
pub mod settings;

pub use inspect::run_inspect;
pub use install::run_install;
pub use settings::resolve_config;
