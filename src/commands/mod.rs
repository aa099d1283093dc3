//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.

mod extract;
mod hide;

pub use extract::ExtractCommand;
pub use hide::HideCommand;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use disguise::config::FileConfig;
use disguise::{resolve_inputs, BatchItem, BatchReport, Config};

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command with its parsed arguments.
    fn execute(&self, globals: &GlobalArgs) -> Result<()>;
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ~/.disguise/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Read/write chunk size in bytes
    #[arg(long, global = true)]
    pub chunk_size: Option<usize>,
}

impl GlobalArgs {
    /// Loads the configuration file and applies the global overrides.
    ///
    /// The parsed file is returned too, so commands can pick cover sizes
    /// from it after choosing the cover type.
    pub fn load(&self) -> Result<(Config, FileConfig)> {
        let file = FileConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        let mut config = Config::default().with_file(&file);
        if let Some(size) = self.chunk_size {
            config = config.with_chunk_size(size);
        }
        Ok((config, file))
    }
}

/// Expands command-line file arguments, warning about the ones skipped.
fn resolve_files(files: &[String]) -> Result<Vec<PathBuf>> {
    let resolved = resolve_inputs(files);
    for warning in &resolved.skipped {
        eprintln!("Warning: {}", warning);
    }

    if resolved.paths.is_empty() {
        bail!("No valid input files found");
    }
    Ok(resolved.paths)
}

/// How a command words its per-file lines and summary.
struct Wording {
    done: &'static str,
    failed: &'static str,
    summary: &'static str,
}

const HIDE_WORDING: Wording = Wording {
    done: "Created",
    failed: "Failed to process",
    summary: "Processed",
};

const EXTRACT_WORDING: Wording = Wording {
    done: "Extracted",
    failed: "Failed to extract from",
    summary: "Extracted",
};

/// One report line per item, in processing order.
fn item_lines(report: &BatchReport, wording: &Wording) -> Vec<(bool, String)> {
    report
        .items()
        .iter()
        .map(|item| match item {
            BatchItem::Done { output, .. } => {
                (true, format!("✓ {}: {}", wording.done, output.display()))
            }
            BatchItem::Failed(failure) => (
                false,
                format!(
                    "✗ {} '{}': {}",
                    wording.failed,
                    failure.input.display(),
                    failure.error
                ),
            ),
        })
        .collect()
}

/// Prints the item lines and the summary. Fails if any item failed.
fn finish(report: &BatchReport, wording: &Wording) -> Result<()> {
    for (ok, line) in item_lines(report, wording) {
        if ok {
            println!("{}", line);
        } else {
            eprintln!("{}", line);
        }
    }

    println!();
    println!(
        "{} {}/{} files successfully",
        wording.summary,
        report.processed(),
        report.total()
    );

    if !report.is_success() {
        bail!(
            "{} of {} files failed",
            report.total() - report.processed(),
            report.total()
        );
    }
    Ok(())
}
