//! Extension package installer CLI
//!
//! Installs plugin and theme archives into an application's directory tree.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Skipped manifest items are reported at warn, so that level is always on
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} extension package installer", "extpack".green().bold());
            println!();
            println!("Run {} for available commands.", "extpack --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install {
            archive,
            settings,
            json,
        } => {
            let config = commands::resolve_config(&settings)?;
            commands::run_install(&archive, &config, json)
        }
        Commands::Inspect {
            archive,
            config,
            json,
        } => commands::run_inspect(&archive, config.as_deref(), json),
    }
}
