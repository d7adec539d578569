//! Inspect command implementation

use std::path::Path;

use colored::Colorize;
use extpack_core::{ArchiveLayout, InstallerConfig, ManifestResolver, inspect_archive};

use crate::error::Result;

/// Run the inspect command
pub fn run_inspect(archive: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let resolver = match config {
        Some(path) => ManifestResolver::new(InstallerConfig::load(path)?.manifest_file_name),
        None => ManifestResolver::default(),
    };
    let layout = inspect_archive(archive, &resolver)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("{}", archive.display().to_string().bold());
    match &layout {
        ArchiveLayout::Single { directories } => {
            println!("{}:   single item", "Layout".dimmed());
            match directories.as_slice() {
                [directory] => println!("{}:   {}", "Folder".dimmed(), directory.cyan()),
                _ => {
                    println!(
                        "{}: {} top-level directories, exactly one is required",
                        "Not installable".red().bold(),
                        directories.len()
                    );
                    for directory in directories {
                        println!("  {} {}", "-".dimmed(), directory);
                    }
                }
            }
        }
        ArchiveLayout::Multi { entries } => {
            println!(
                "{}:   manifest ({} {})",
                "Layout".dimmed(),
                entries.len(),
                if entries.len() == 1 { "item" } else { "items" }
            );
            for entry in entries {
                let kind = match entry.item_type {
                    Some(kind) => kind.as_str().cyan(),
                    None => "no type".yellow(),
                };
                println!(
                    "  {} {:<8} {} {}",
                    "-".dimmed(),
                    kind,
                    entry.system_name,
                    entry.directory_prefix().dimmed()
                );
            }
        }
    }

    Ok(())
}
