//! Extract pipeline: locate the frame, then restore the payload.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::batch::BatchReport;
use crate::config::Config;
use crate::error::{DisguiseError, Result};
use crate::frame::locator::{self, Location};
use crate::frame::reader::read_payload;
use crate::frame::same_file;

/// Restores payloads hidden in containers.
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    config: &'a Config,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Finds the first valid frame in `container`.
    pub fn locate(&self, container: &Path) -> Result<Location> {
        if !container.is_file() {
            return Err(DisguiseError::InputNotFound(container.to_path_buf()));
        }

        let mut file = File::open(container)?;
        let location = locator::locate(&mut file, self.config.marker(), self.config.chunk_size())?;
        debug!(container = %container.display(), ?location, "scan finished");
        Ok(location)
    }

    /// Where a payload named `filename` is restored to.
    pub fn output_path(&self, filename: &str, output_dir: Option<&Path>) -> PathBuf {
        let name = format!("{}{}", filename, self.config.restored_suffix());
        match output_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    /// Restores the payload of `container` and returns its path.
    ///
    /// Without `output_dir` the file lands in the current directory. Nothing
    /// is created if the container holds no frame, and a restored name that
    /// resolves to the container itself is refused.
    pub fn extract_file(&self, container: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        let (offset, filename) = match self.locate(container)? {
            Location::Found { offset, filename } => (offset, filename),
            Location::NotFound => {
                return Err(DisguiseError::MarkerNotFound(container.to_path_buf()))
            }
        };

        if let Some(dir) = output_dir {
            fs::create_dir_all(dir)?;
        }

        let output = self.output_path(&filename, output_dir);
        if same_file(container, &output) {
            return Err(DisguiseError::OutputIsInput(output));
        }
        let written = read_payload(container, offset, &output, self.config)?;

        info!(
            container = %container.display(),
            output = %output.display(),
            offset,
            bytes = written,
            "payload extracted"
        );
        Ok(output)
    }

    /// Extracts each container in turn.
    pub fn extract_batch(&self, containers: &[PathBuf], output_dir: Option<&Path>) -> BatchReport {
        let mut report = BatchReport::new(containers.len());
        for container in containers {
            report.record(container, self.extract_file(container, output_dir));
        }
        report
    }
}
