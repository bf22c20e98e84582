//! Sitefold CLI
//!
//! Single binary that folds a multi-file web application into one
//! self-executing script artifact.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for sitefold.
#[derive(Parser)]
#[command(
    name = "sitefold",
    version,
    about = "Folds a multi-file web app into one self-executing script"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "bundle.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the bundle artifact
    Build {
        /// Override the output path
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
        /// Skip output compaction
        #[arg(long)]
        no_minify: bool,
    },
    /// Validate configuration and referenced files
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitefold::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output, no_minify } => {
            sitefold::cmd::build::run(&cli.config, output.as_deref(), no_minify)?;
        }
        Commands::Check { strict } => {
            sitefold::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
