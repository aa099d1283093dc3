//! Atomic frame append.
//!
//! The container is never written in place. Its bytes, the frame header and
//! the payload are streamed into a scratch file next to it, which is then
//! renamed over the container. Any failure before the rename drops the
//! scratch file and leaves the container exactly as it was.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use super::{copy_chunked, encode_header, is_plain_filename, parent_dir, scratch_file_in, MAX_FILENAME_LEN};
use crate::config::Config;
use crate::error::{DisguiseError, Result};

/// What an append produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    /// Offset of the marker, i.e. the original container length.
    pub marker_offset: u64,
    /// Name recorded in the frame.
    pub filename: String,
    /// Payload bytes appended.
    pub payload_len: u64,
    /// Final container length.
    pub container_len: u64,
}

/// Appends the file at `payload` to `container` under its base name.
///
/// Both paths must exist; nothing is created otherwise.
pub fn append_frame(container: &Path, payload: &Path, config: &Config) -> Result<FrameSummary> {
    if !payload.is_file() {
        return Err(DisguiseError::InputNotFound(payload.to_path_buf()));
    }

    let filename = payload_name(payload)?;
    let mut source = File::open(payload)?;
    append_frame_from_reader(container, filename, &mut source, config)
}

/// Name under which the file at `payload` is recorded.
///
/// Fails for names that are not UTF-8, too long, or not a single plain
/// component, without touching the filesystem.
pub fn payload_name(payload: &Path) -> Result<&str> {
    let filename = payload
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DisguiseError::InvalidFilename(payload.to_path_buf()))?;

    check_filename(filename)?;
    Ok(filename)
}

fn check_filename(filename: &str) -> Result<()> {
    if filename.len() > MAX_FILENAME_LEN {
        return Err(DisguiseError::FilenameTooLong(filename.len()));
    }
    if !is_plain_filename(filename) {
        return Err(DisguiseError::InvalidFilename(filename.into()));
    }
    Ok(())
}

/// Appends a payload read from `payload` to `container`, recorded as `filename`.
pub fn append_frame_from_reader<R>(
    container: &Path,
    filename: &str,
    payload: &mut R,
    config: &Config,
) -> Result<FrameSummary>
where
    R: Read + ?Sized,
{
    if !container.is_file() {
        return Err(DisguiseError::InputNotFound(container.to_path_buf()));
    }
    check_filename(filename)?;

    let chunk_size = config.chunk_size();
    let header = encode_header(config.marker(), filename);

    let mut cover = File::open(container)?;
    let permissions = cover.metadata()?.permissions();

    let mut scratch = scratch_file_in(parent_dir(container), "")?;
    debug!(scratch = %scratch.path().display(), "rewriting container");

    let marker_offset = copy_chunked(&mut cover, &mut scratch, chunk_size)?;
    scratch.write_all(&header)?;
    let payload_len = copy_chunked(payload, &mut scratch, chunk_size)?;

    scratch.flush()?;
    scratch.as_file().sync_all()?;
    drop(cover);

    fs::set_permissions(scratch.path(), permissions)?;
    scratch.persist(container).map_err(|e| e.error)?;

    let container_len = marker_offset + header.len() as u64 + payload_len;
    debug!(
        container = %container.display(),
        marker_offset,
        payload_len,
        container_len,
        "frame appended"
    );

    Ok(FrameSummary {
        marker_offset,
        filename: filename.to_string(),
        payload_len,
        container_len,
    })
}
