//! Error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while hiding or extracting a payload.
#[derive(Error, Debug)]
pub enum DisguiseError {
    /// A payload or container path does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The container holds no valid frame.
    #[error("No hidden data found in {}", .0.display())]
    MarkerNotFound(PathBuf),

    /// The bytes after a marker do not form a frame.
    #[error("Malformed frame at offset {offset}")]
    MalformedFrame {
        /// Absolute offset of the marker.
        offset: u64,
    },

    /// The video encoder ran and exited non-zero.
    #[error("{program} exited with {status}: {stderr}")]
    ExternalEncoderFailure {
        /// Encoder program name.
        program: String,
        /// Exit status of the process.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The video encoder could not be started.
    #[error("Cannot run {program}: {source}")]
    EncoderUnavailable {
        /// Encoder program name.
        program: String,
        /// Underlying lookup or spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The payload name is not valid UTF-8 or has no file name component.
    #[error("Invalid payload file name: {}", .0.display())]
    InvalidFilename(PathBuf),

    /// The payload name does not fit the 32-bit length field.
    #[error("Payload file name too long: {0} bytes")]
    FilenameTooLong(usize),

    /// The container would replace the payload it is meant to carry.
    #[error("Output would overwrite the input: {}", .0.display())]
    OutputIsInput(PathBuf),

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed.
    #[error("TOML parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DisguiseError>;
