mod book;
mod chapters;
mod cli;
mod commands;
mod config;
mod error;
mod media;
mod metadata;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            folder,
            output_dir,
            keep_temp,
        } => {
            commands::build::run(&folder, output_dir.as_ref(), keep_temp, cli.quiet)?;
        }
        Commands::Chapters { folder, json } => {
            commands::chapters::run(&folder, json)?;
        }
        Commands::Parse { name, json } => {
            commands::parse::run(&name, json)?;
        }
        Commands::Show { file, json } => {
            commands::show::run(&file, json, cli.quiet)?;
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
        }
    }

    Ok(())
}

/// Log to stderr; RUST_LOG overrides the level picked from the flags
fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
