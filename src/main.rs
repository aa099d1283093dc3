//! Disguise - Hide a file at the tail of a picture or a video
//!
//! Generates a solid-color cover and appends the file after it. Media
//! players still open the cover; `extract` gets the file back.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CommandExecutor, ExtractCommand, GlobalArgs, HideCommand};

/// Disguise - Hide a file at the tail of a picture or a video
#[derive(Parser)]
#[command(name = "disguise")]
#[command(version)]
#[command(about = "Hide files at the end of generated pictures or videos")]
#[command(after_help = "Examples:
  disguise hide secret.txt                 # secret.txt.bmp
  disguise hide -t video -o clip.mp4 a.zip # clip.mp4
  disguise hide -o out/ *.txt              # out/<name>.txt.bmp
  disguise extract -o restored/ *.bmp")]
struct Cli {
    #[command(flatten)]
    globals: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide files in generated covers
    Hide(HideCommand),

    /// Extract hidden files from containers
    Extract(ExtractCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.globals.verbose);

    match &cli.command {
        Commands::Hide(cmd) => cmd.execute(&cli.globals),
        Commands::Extract(cmd) => cmd.execute(&cli.globals),
    }
}

/// Logs go to stderr. `--verbose` forces debug; otherwise `RUST_LOG` or warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
