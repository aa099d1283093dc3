//! Payload extraction from a located frame.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::debug;

use super::locator::{probe, Probe};
use super::{copy_chunked, parent_dir, scratch_file_in};
use crate::config::Config;
use crate::error::{DisguiseError, Result};

/// Streams the payload of the frame at `offset` in `container` to `output`.
///
/// The name record is read again rather than trusted from the locator, so
/// locating and reading may happen in separate passes. The output goes
/// through a scratch file and only appears at `output` once complete.
///
/// Returns the number of payload bytes written.
pub fn read_payload(container: &Path, offset: u64, output: &Path, config: &Config) -> Result<u64> {
    let mut source = File::open(container)?;
    let marker = config.marker();

    source.seek(SeekFrom::Start(offset))?;
    let mut found = vec![0u8; marker.len()];
    source.read_exact(&mut found)?;
    if found != marker {
        return Err(DisguiseError::MalformedFrame { offset });
    }

    // Positions the reader after the name on success
    if let Probe::Malformed = probe(&mut source, offset, marker.len())? {
        return Err(DisguiseError::MalformedFrame { offset });
    }

    let mut scratch = scratch_file_in(parent_dir(output), "")?;
    let written = copy_chunked(&mut source, &mut scratch, config.chunk_size())?;
    scratch.flush()?;
    scratch.as_file().sync_all()?;
    scratch.persist(output).map_err(|e| e.error)?;

    debug!(output = %output.display(), bytes = written, "payload restored");
    Ok(written)
}
