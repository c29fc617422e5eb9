//! Multicam CLI - build multicam editing timelines from clip databases.
//!
//! Usage:
//!   multicam generate [OPTIONS]       Write the XML timeline
//!   multicam info [OPTIONS]           Show what the timeline would contain
//!   multicam validate [OPTIONS]       Check templates and every clip without writing
//!   multicam init-config [PATH]       Write the default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use multicam_common::config::AppConfig;

mod commands;

use commands::SourceArgs;

#[derive(Parser)]
#[command(
    name = "multicam",
    about = "Generate multicam XML timelines from recorded clip databases",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the timeline and write it to the output file
    Generate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show clip counts, cameras and the timeline span
    Info {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build every clip entry without writing anything
    Validate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write the default configuration as JSON
    InitConfig {
        /// Destination (defaults to the standard config location)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, fallback) = match &cli.command {
        Commands::Generate { source }
        | Commands::Info { source, .. }
        | Commands::Validate { source } => {
            let resolved = source.resolve()?;
            (resolved.config, resolved.fallback)
        }
        Commands::InitConfig { .. } => (AppConfig::default(), None),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    multicam_common::logging::init_logging(&logging)?;

    // Reported only once the subscriber is installed.
    if let Some(err) = fallback {
        tracing::warn!("{err}; using defaults");
    }

    match cli.command {
        Commands::Generate { .. } => commands::generate::run(&config),
        Commands::Info { json, .. } => commands::info::run(&config, json),
        Commands::Validate { .. } => commands::validate::run(&config),
        Commands::InitConfig { path, force } => commands::init_config::run(path, force),
    }
}
