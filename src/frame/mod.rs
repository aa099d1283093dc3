//! Frame format shared by the hide and extract pipelines.
//!
//! Format: `[marker][4 bytes name length, LE][name bytes][payload ... EOF]`
//!
//! The name length describes only the name. The payload has no length field
//! and always runs to end-of-file.

pub mod locator;
pub mod reader;
pub mod window;
pub mod writer;

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path};

use tempfile::NamedTempFile;

/// Size of the name length field in bytes.
pub const NAME_LEN_SIZE: usize = 4;

/// Longest name a frame may carry. Longer values are treated as garbage.
pub const MAX_FILENAME_LEN: usize = 4096;

/// Prefix of scratch files created next to their final destination.
pub(crate) const SCRATCH_PREFIX: &str = ".disguise-";

/// Builds the bytes between the cover and the payload.
pub fn encode_header(marker: &[u8], filename: &str) -> Vec<u8> {
    let name = filename.as_bytes();
    let mut header = Vec::with_capacity(marker.len() + NAME_LEN_SIZE + name.len());
    header.extend_from_slice(marker);
    header.extend_from_slice(&(name.len() as u32).to_le_bytes());
    header.extend_from_slice(name);
    header
}

/// Returns true if `name` could have been written by the frame writer.
///
/// The writer only ever stores a bare file name: the name must be exactly one
/// normal path component on this platform. On Unix a backslash is an
/// ordinary character; on Windows it separates components and is rejected.
pub fn is_plain_filename(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_FILENAME_LEN || name.contains('\0') {
        return false;
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        // `a/` normalizes to `a`; compare with the raw name to catch it
        (Some(Component::Normal(part)), None) => part == OsStr::new(name),
        _ => false,
    }
}

/// Copies `reader` into `writer` through a buffer of `chunk_size` bytes.
///
/// Returns the number of bytes copied. Memory use is bounded by the chunk
/// size no matter how large the source is.
pub fn copy_chunked<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buf[..n])?;
        total += n as u64;
    }

    Ok(total)
}

/// Creates a scratch file in `dir` that is deleted unless persisted.
pub(crate) fn scratch_file_in(dir: &Path, suffix: &str) -> io::Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .suffix(suffix)
        .tempfile_in(dir)
}

/// True if both paths resolve to the same existing file.
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Directory a path lives in, with the empty parent of a bare name mapped to `.`.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
