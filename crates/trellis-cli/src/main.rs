mod commands;
mod options;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trellis")]
#[command(version, about = "trellis - file-based routes for axum and maud", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the route registry from the app directory
    Generate {
        /// Path to trellis.toml
        #[arg(short, long, default_value = trellis::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Compare against the committed output instead of writing
        #[arg(long)]
        check: bool,
    },

    /// List discovered routes in match order
    Routes {
        /// Path to trellis.toml
        #[arg(short, long, default_value = trellis::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Show which route a request path resolves to
        #[arg(long = "match", value_name = "PATH")]
        request_path: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config, check } => {
            let opts = options::generate_options(&config)?;
            if check {
                commands::generate::check(&opts)?;
            } else {
                commands::generate::execute(&opts)?;
            }
        }
        Commands::Routes { config, request_path } => {
            let opts = options::generate_options(&config)?;
            commands::routes::execute(&opts, request_path.as_deref())?;
        }
    }

    Ok(())
}
