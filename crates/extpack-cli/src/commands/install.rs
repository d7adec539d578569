//! Install command implementation

use std::path::Path;

use colored::Colorize;
use extpack_core::{ArchiveLayout, ExtensionDescriptor, InstallOrchestrator, InstallerConfig};

use crate::error::Result;

/// Run the install command
pub fn run_install(archive: &Path, config: &InstallerConfig, json: bool) -> Result<()> {
    let orchestrator = InstallOrchestrator::from_config(config)?;
    let installed = orchestrator.install_file(archive)?;

    // The upload is valid at this point, so the archive opens
    if let ArchiveLayout::Multi { entries } = orchestrator.inspect(archive)? {
        if installed.len() < entries.len() {
            eprintln!(
                "{}: installed {} of {} items declared by the manifest",
                "warning".yellow().bold(),
                installed.len(),
                entries.len()
            );
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&installed)?);
        return Ok(());
    }

    println!(
        "{} {} extension(s) from {}",
        "Installed".green().bold(),
        installed.len(),
        archive.display()
    );
    for descriptor in &installed {
        println!("  {} {}", "+".green(), describe(descriptor));
    }

    Ok(())
}

fn describe(descriptor: &ExtensionDescriptor) -> String {
    match descriptor {
        ExtensionDescriptor::Plugin(plugin) => format!(
            "{} {} ({} {})",
            "plugin".dimmed(),
            plugin.system_name.cyan(),
            plugin.friendly_name,
            plugin.version
        ),
        ExtensionDescriptor::Theme(theme) => format!(
            "{} {} ({})",
            "theme".dimmed(),
            theme.system_name.cyan(),
            theme.friendly_name
        ),
    }
}
