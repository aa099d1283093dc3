//! Hide command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use disguise::Embedder;

use super::{finish, resolve_files, CommandExecutor, GlobalArgs, HIDE_WORDING};

/// Kind of cover to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CoverType {
    /// Solid-color BMP image
    Image,
    /// Solid-color MP4 video (needs ffmpeg)
    Video,
}

/// Hide files at the end of generated pictures or videos.
///
/// Each file gets its own cover. Without -o the container is written next
/// to the input as `<name>.bmp` or `<name>.mp4`.
#[derive(Args, Debug)]
pub struct HideCommand {
    /// Files to hide (glob patterns are expanded)
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Cover type
    #[arg(short = 't', long = "type", value_enum, default_value_t = CoverType::Image)]
    pub cover_type: CoverType,

    /// Output file, or directory for several inputs
    /// With several inputs and a file name, each output is `<stem>_<input>.<ext>`
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Marker separating the cover from the hidden file
    #[arg(short, long)]
    pub separator: Option<String>,
}

impl CommandExecutor for HideCommand {
    fn execute(&self, globals: &GlobalArgs) -> Result<()> {
        let (config, file) = globals.load()?;

        let mut config = config.with_cover_type(self.cover_type == CoverType::Video, &file);
        if let Some(separator) = &self.separator {
            config = config.with_marker(separator.as_bytes());
        }
        let config = config.validate().context("Invalid settings")?;

        if self.cover_type == CoverType::Video && which::which(config.encoder()).is_err() {
            bail!(
                "'{}' not found on PATH. Install ffmpeg to generate video covers.",
                config.encoder()
            );
        }

        let inputs = resolve_files(&self.files)?;
        let report = Embedder::new(&config).hide_batch(&inputs, self.output.as_deref());
        finish(&report, &HIDE_WORDING)
    }
}
