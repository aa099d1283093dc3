//! Extract command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use disguise::Extractor;

use super::{finish, resolve_files, CommandExecutor, GlobalArgs, EXTRACT_WORDING};

/// Recover files hidden by `hide`.
///
/// Restored files are named after the hidden file plus a suffix
/// (default `.restored`).
#[derive(Args, Debug)]
pub struct ExtractCommand {
    /// Containers to extract from (glob patterns are expanded)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Marker used when hiding
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Suffix appended to restored file names (empty for none)
    #[arg(long)]
    pub suffix: Option<String>,
}

impl CommandExecutor for ExtractCommand {
    fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let (mut config, _) = globals.load()?;

        if let Some(separator) = &self.separator {
            config = config.with_marker(separator.as_bytes());
        }
        if let Some(suffix) = &self.suffix {
            config = config.with_restored_suffix(suffix.as_str());
        }
        let config = config.validate().context("Invalid settings")?;

        let containers = resolve_files(&self.files)?;
        let report = Extractor::new(&config).extract_batch(&containers, self.output.as_deref());
        finish(&report, &EXTRACT_WORDING)
    }
}
