//! Marker location.
//!
//! Streams a container in fixed-size chunks and returns the offset of the
//! first marker followed by a well-formed name record. Marker-like bytes in
//! the cover that are followed by garbage are skipped, not fatal.

use std::io::{self, Read, Seek, SeekFrom};

use tracing::{debug, warn};

use super::window::SearchWindow;
use super::{is_plain_filename, MAX_FILENAME_LEN, NAME_LEN_SIZE};

/// Outcome of scanning a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A valid frame starts at `offset`.
    Found { offset: u64, filename: String },
    /// End of stream reached without a valid frame.
    NotFound,
}

impl Location {
    /// Offset of the marker, if found.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Location::Found { offset, .. } => Some(*offset),
            Location::NotFound => None,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Location::Found { filename, .. } => Some(filename),
            Location::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Location::Found { .. })
    }
}

/// Outcome of reading the name record after one marker candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// The candidate carries a usable name.
    Frame { filename: String },
    /// Truncated length, truncated name, invalid UTF-8, or an unsafe name.
    Malformed,
}

/// Finds the first valid frame in `reader`.
///
/// The reader is rewound first and read in chunks of `chunk_size` bytes.
/// Memory stays around two chunks regardless of the container size.
/// The window never keeps less than one marker of history, so a marker
/// split across reads is found even with a tiny chunk size.
pub fn locate<R>(reader: &mut R, marker: &[u8], chunk_size: usize) -> io::Result<Location>
where
    R: Read + Seek + ?Sized,
{
    reader.seek(SeekFrom::Start(0))?;

    let mut window = SearchWindow::new(chunk_size.max(marker.len()));
    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut stream_pos = 0u64;

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        window.push(&chunk[..n]);
        stream_pos += n as u64;

        while let Some(index) = window.find(marker) {
            let offset = window.absolute(index);

            match probe(reader, offset, marker.len())? {
                Probe::Frame { filename } => {
                    debug!(offset, %filename, "marker located");
                    return Ok(Location::Found { offset, filename });
                }
                Probe::Malformed => {
                    warn!(offset, "ignoring marker bytes without a valid frame");
                    window.skip_match(index);
                    reader.seek(SeekFrom::Start(stream_pos))?;
                }
            }
        }

        window.trim();
    }

    debug!(scanned = stream_pos, "no marker found");
    Ok(Location::NotFound)
}

/// Reads the name record following a marker at `offset`.
///
/// Leaves the reader positioned after the name on success; the caller is
/// responsible for restoring its position otherwise.
pub fn probe<R>(reader: &mut R, offset: u64, marker_len: usize) -> io::Result<Probe>
where
    R: Read + Seek + ?Sized,
{
    reader.seek(SeekFrom::Start(offset + marker_len as u64))?;

    let mut len_bytes = [0u8; NAME_LEN_SIZE];
    if !read_exact_or_eof(reader, &mut len_bytes)? {
        return Ok(Probe::Malformed);
    }

    let name_len = u32::from_le_bytes(len_bytes) as usize;
    if name_len == 0 || name_len > MAX_FILENAME_LEN {
        return Ok(Probe::Malformed);
    }

    let mut name = vec![0u8; name_len];
    if !read_exact_or_eof(reader, &mut name)? {
        return Ok(Probe::Malformed);
    }

    match String::from_utf8(name) {
        Ok(filename) if is_plain_filename(&filename) => Ok(Probe::Frame { filename }),
        _ => Ok(Probe::Malformed),
    }
}

/// Like `read_exact`, but reports a short read as `false` instead of an error.
fn read_exact_or_eof<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}
