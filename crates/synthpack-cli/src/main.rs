//! Synthpack CLI - compile declarative app descriptors into Kubernetes manifests

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "synthpack")]
#[command(author = "Synthpack Contributors")]
#[command(version)]
#[command(about = "Compile declarative app descriptors into Kubernetes manifests", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an app descriptor into Kubernetes manifests
    Render {
        /// App descriptor path
        app: PathBuf,

        /// Deployment slot
        #[arg(short, long, default_value = "local")]
        slot: String,

        /// Maximum length for derived resource names
        #[arg(long, default_value_t = 64)]
        max_name_length: usize,

        /// Output directory (if not set, outputs to stdout)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Show the names and labels derived from a descriptor
    Show {
        /// App descriptor path
        app: PathBuf,

        /// Deployment slot
        #[arg(short, long, default_value = "local")]
        slot: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            app,
            slot,
            max_name_length,
            output_dir,
        } => commands::render::run(
            &app,
            &slot,
            max_name_length,
            output_dir.as_deref(),
            cli.debug,
        ),
        Commands::Show { app, slot } => commands::show::run(&app, &slot),
    }
}
