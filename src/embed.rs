//! Hide pipeline: generate a cover, then append the payload frame.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::batch::BatchReport;
use crate::config::Config;
use crate::cover::{generator_for, Rgb};
use crate::error::{DisguiseError, Result};
use crate::frame::writer::{append_frame, payload_name};
use crate::frame::{parent_dir, same_file, scratch_file_in};

/// Hides payload files in freshly generated covers.
#[derive(Debug, Clone, Copy)]
pub struct Embedder<'a> {
    config: &'a Config,
}

impl<'a> Embedder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    fn extension(&self) -> &'static str {
        self.config.cover().extension()
    }

    /// Container path used when none is given: `{input}.{ext}` next to the input.
    pub fn default_output(&self, input: &Path) -> PathBuf {
        let mut name = input.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(self.extension());
        input.with_file_name(name)
    }

    /// Container path for `input`.
    ///
    /// An explicit output keeps its name but gets the cover's extension. An
    /// existing directory, or a path ending in a separator, receives the
    /// default name inside it.
    pub fn output_path(&self, input: &Path, output: Option<&Path>) -> PathBuf {
        match output {
            None => self.default_output(input),
            Some(dir) if is_directory(dir) => {
                let default = self.default_output(input);
                dir.join(default.file_name().unwrap_or_default())
            }
            Some(path) if path.extension().and_then(|e| e.to_str()) == Some(self.extension()) => {
                path.to_path_buf()
            }
            Some(path) => path.with_extension(self.extension()),
        }
    }

    /// Container path for one item of a batch sharing a single output.
    ///
    /// `out/result.bmp` and `notes.txt` give `out/result_notes.txt.bmp`.
    pub fn batch_output(&self, output: &Path, input: &Path) -> PathBuf {
        if is_directory(output) {
            return self.output_path(input, Some(output));
        }

        let stem = output.file_stem().unwrap_or_default().to_string_lossy();
        let name = input.file_name().unwrap_or_default().to_string_lossy();
        output.with_file_name(format!("{}_{}.{}", stem, name, self.extension()))
    }

    /// Hides `input` in a new cover and returns the container path.
    ///
    /// The container is assembled in a scratch file next to the output and
    /// renamed into place only once complete, so a failed item never
    /// touches whatever already exists at the output path.
    pub fn hide_file(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        if !input.is_file() {
            return Err(DisguiseError::InputNotFound(input.to_path_buf()));
        }
        let filename = payload_name(input)?;

        let output = self.output_path(input, output);
        if same_file(input, &output) {
            return Err(DisguiseError::OutputIsInput(output));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let suffix = format!(".{}", self.extension());
        let scratch = scratch_file_in(parent_dir(&output), &suffix)?.into_temp_path();

        generator_for(self.config).generate(&scratch, Rgb::random())?;
        debug!(scratch = %scratch.display(), "cover generated");

        let summary = append_frame(&scratch, input, self.config)?;
        scratch.persist(&output).map_err(|e| e.error)?;

        info!(
            input = %input.display(),
            container = %output.display(),
            %filename,
            payload_len = summary.payload_len,
            "payload hidden"
        );
        Ok(output)
    }

    /// Hides each input in turn.
    ///
    /// With an explicit output and several inputs, each container is named
    /// after both (see [`batch_output`](Self::batch_output)).
    pub fn hide_batch(&self, inputs: &[PathBuf], output: Option<&Path>) -> BatchReport {
        let mut report = BatchReport::new(inputs.len());

        for input in inputs {
            let target = match output {
                Some(out) if inputs.len() > 1 => Some(self.batch_output(out, input)),
                Some(out) => Some(out.to_path_buf()),
                None => None,
            };
            report.record(input, self.hide_file(input, target.as_deref()));
        }

        report
    }
}

/// An existing directory, or a path written as one (`out/`).
fn is_directory(path: &Path) -> bool {
    path.is_dir() || path.as_os_str().to_string_lossy().ends_with(['/', std::path::MAIN_SEPARATOR])
}
