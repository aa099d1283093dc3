//! Solid-color BMP covers.
//!
//! Layout: 14-byte file header + 40-byte BITMAPINFOHEADER + pixel rows.
//! 24 bits per pixel, uncompressed, bottom-up, rows padded to 4 bytes.
//! Pixels are stored blue, green, red.

use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::{CoverGenerator, Rgb};
use crate::error::{DisguiseError, Result};
use crate::frame::{parent_dir, scratch_file_in};

/// Combined size of the file and info headers; also the pixel data offset.
pub const HEADER_SIZE: u32 = 54;

/// Horizontal and vertical resolution in pixels per metre (72 DPI).
const RESOLUTION: u32 = 0x0B13;

/// Bitmap cover generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapCover {
    width: u32,
    height: u32,
}

impl BitmapCover {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes per pixel row, including padding.
    pub fn row_stride(&self) -> usize {
        (self.width as usize * 3 + 3) & !3
    }

    /// Size of the pixel array in bytes.
    pub fn image_size(&self) -> Result<u32> {
        u32::try_from(self.row_stride() as u64 * self.height as u64).map_err(|_| self.too_large())
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> Result<u32> {
        self.image_size()?
            .checked_add(HEADER_SIZE)
            .ok_or_else(|| self.too_large())
    }

    /// Encodes both headers.
    pub fn headers(&self) -> Result<[u8; HEADER_SIZE as usize]> {
        let width = i32::try_from(self.width).map_err(|_| self.too_large())?;
        let height = i32::try_from(self.height).map_err(|_| self.too_large())?;

        let mut header = [0u8; HEADER_SIZE as usize];

        // File header
        header[0..2].copy_from_slice(b"BM");
        header[2..6].copy_from_slice(&self.file_size()?.to_le_bytes());
        // 6..10: two reserved u16, zero
        header[10..14].copy_from_slice(&HEADER_SIZE.to_le_bytes());

        // Info header
        header[14..18].copy_from_slice(&40u32.to_le_bytes());
        header[18..22].copy_from_slice(&width.to_le_bytes());
        header[22..26].copy_from_slice(&height.to_le_bytes());
        header[26..28].copy_from_slice(&1u16.to_le_bytes());
        header[28..30].copy_from_slice(&24u16.to_le_bytes());
        // 30..34: compression, none
        header[34..38].copy_from_slice(&self.image_size()?.to_le_bytes());
        header[38..42].copy_from_slice(&RESOLUTION.to_le_bytes());
        header[42..46].copy_from_slice(&RESOLUTION.to_le_bytes());
        // 46..54: palette colors and important colors, zero

        Ok(header)
    }

    fn too_large(&self) -> DisguiseError {
        DisguiseError::InvalidConfig(format!(
            "bitmap of {}x{} does not fit the BMP size fields",
            self.width, self.height
        ))
    }
}

impl CoverGenerator for BitmapCover {
    fn generate(&self, path: &Path, color: Rgb) -> Result<()> {
        let headers = self.headers()?;

        let mut row = vec![0u8; self.row_stride()];
        for pixel in row[..self.width as usize * 3].chunks_exact_mut(3) {
            pixel.copy_from_slice(&[color.b, color.g, color.r]);
        }

        let scratch = scratch_file_in(parent_dir(path), "")?;
        {
            let mut out = BufWriter::new(scratch.as_file());
            out.write_all(&headers)?;
            for _ in 0..self.height {
                out.write_all(&row)?;
            }
            out.flush()?;
        }
        scratch.as_file().sync_all()?;
        scratch.persist(path).map_err(|e| e.error)?;

        debug!(
            path = %path.display(),
            width = self.width,
            height = self.height,
            color = %color.to_hex(),
            "bitmap cover written"
        );
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "bmp"
    }
}
