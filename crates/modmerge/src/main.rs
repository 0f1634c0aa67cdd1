use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use modmerge_core::Config;
use modmerge_core::merge::constants::CONFIG_FILENAME;
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;

#[derive(Parser)]
#[command(name = "modmerge")]
#[command(about = "Carry script mods across a game update with three-way merges")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (written with defaults if missing)
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge changed vanilla scripts into every mod that overrides them (default)
    Merge,
    /// Restore mod files from their pre-merge backups
    Rollback,
}

fn load_config(path: &Path) -> Config {
    match Config::load_or_create(path) {
        Ok((_, true)) => {
            println!("Wrote default configuration to {}", path.display());
            println!("Review the paths and versions in it, then run again.");
            process::exit(0);
        }
        Ok((config, false)) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config);

    match cli.command.unwrap_or(Commands::Merge) {
        Commands::Merge => match commands::merge::run(&config) {
            Ok(report) => {
                let summary = &report.summary;
                println!(
                    "Done: {} merged, {} skipped, {} failed ({} changed files, {} merge tasks)",
                    summary.merged(),
                    summary.skipped(),
                    summary.failed(),
                    report.changed_files,
                    report.tasks
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        },
        Commands::Rollback => match commands::rollback::run(&config) {
            Ok(restored) => {
                for file in &restored {
                    println!("Restored {}", file.display());
                }
                println!("Rollback complete: {} files restored", restored.len());
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        },
    }
}
