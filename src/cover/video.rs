//! Solid-color video covers, produced by an external encoder.
//!
//! The encoder is invoked with a fixed template:
//!
//! ```text
//! ffmpeg -y -f lavfi -i color=#rrggbb:s=WxH -t SECONDS -pix_fmt yuv420p OUT.mp4
//! ```
//!
//! It writes to a scratch file next to the target; the target only appears
//! once the encoder has exited successfully with a non-empty file.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use super::{CoverGenerator, Rgb};
use crate::config::DEFAULT_ENCODER;
use crate::error::{DisguiseError, Result};
use crate::frame::{parent_dir, scratch_file_in};

/// Lines of encoder stderr kept in error reports.
const STDERR_TAIL_LINES: usize = 5;

/// Video cover generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCover {
    width: u32,
    height: u32,
    duration_secs: u32,
    program: String,
}

impl VideoCover {
    pub fn new(width: u32, height: u32, duration_secs: u32) -> Self {
        Self {
            width,
            height,
            duration_secs,
            program: DEFAULT_ENCODER.to_string(),
        }
    }

    /// Uses `program` instead of `ffmpeg`.
    pub fn with_program(self, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..self
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns true if the encoder can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    /// Arguments passed to the encoder to produce `output`.
    pub fn command_args(&self, color: Rgb, output: &Path) -> Vec<OsString> {
        let source = format!("color={}:s={}x{}", color.to_hex(), self.width, self.height);
        let duration = self.duration_secs.to_string();

        let mut args: Vec<OsString> = [
            "-y",
            "-f",
            "lavfi",
            "-i",
            source.as_str(),
            "-t",
            duration.as_str(),
            "-pix_fmt",
            "yuv420p",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(output.as_os_str().to_os_string());
        args
    }

    fn unavailable(&self, source: io::Error) -> DisguiseError {
        DisguiseError::EncoderUnavailable {
            program: self.program.clone(),
            source,
        }
    }
}

impl CoverGenerator for VideoCover {
    fn generate(&self, path: &Path, color: Rgb) -> Result<()> {
        let program = which::which(&self.program)
            .map_err(|e| self.unavailable(io::Error::new(io::ErrorKind::NotFound, e)))?;

        // The encoder picks the container format from the extension
        let scratch = scratch_file_in(parent_dir(path), ".mp4")?;

        debug!(program = %program.display(), scratch = %scratch.path().display(), "running video encoder");
        let output = Command::new(&program)
            .args(self.command_args(color, scratch.path()))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(DisguiseError::ExternalEncoderFailure {
                program: self.program.clone(),
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        if scratch.as_file().metadata()?.len() == 0 {
            return Err(DisguiseError::ExternalEncoderFailure {
                program: self.program.clone(),
                status: output.status,
                stderr: "encoder produced an empty file".into(),
            });
        }

        scratch.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), color = %color.to_hex(), "video cover written");
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "mp4"
    }
}

/// Last few non-empty lines of the encoder's stderr.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
