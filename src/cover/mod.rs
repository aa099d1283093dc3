//! Cover generation.
//!
//! Covers are opaque to the rest of the crate: a generator either leaves a
//! complete, non-empty file at the requested path or fails without leaving
//! anything there.
//!
//! Supports:
//! - Uncompressed 24-bit BMP images (written directly)
//! - MP4 videos (delegated to an external encoder)

pub mod bitmap;
pub mod video;

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::config::{Config, CoverKind, DEFAULT_ENCODER};
use crate::error::Result;

pub use bitmap::BitmapCover;
pub use video::VideoCover;

/// A solid fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Picks a uniformly random color. Purely cosmetic.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            r: rng.gen(),
            g: rng.gen(),
            b: rng.gen(),
        }
    }

    /// `#rrggbb` form, as understood by the video encoder.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Something that can produce a cover file.
pub trait CoverGenerator {
    /// Writes a cover filled with `color` to `path`.
    fn generate(&self, path: &Path, color: Rgb) -> Result<()>;

    /// Extension of the produced files, without the dot.
    fn extension(&self) -> &'static str;
}

/// Returns the generator matching the configured cover kind.
pub fn generator_for(config: &Config) -> Box<dyn CoverGenerator> {
    match *config.cover() {
        CoverKind::Image { width, height } => Box::new(BitmapCover::new(width, height)),
        CoverKind::Video {
            width,
            height,
            duration_secs,
        } => Box::new(
            VideoCover::new(width, height, duration_secs).with_program(config.encoder()),
        ),
    }
}

/// Writes a solid-color bitmap to `path`.
pub fn make_image(path: &Path, width: u32, height: u32, color: Rgb) -> Result<PathBuf> {
    BitmapCover::new(width, height).generate(path, color)?;
    Ok(path.to_path_buf())
}

/// Encodes a solid-color video to `path` with the default encoder.
pub fn make_video(
    path: &Path,
    width: u32,
    height: u32,
    duration_secs: u32,
    color: Rgb,
) -> Result<PathBuf> {
    VideoCover::new(width, height, duration_secs)
        .with_program(DEFAULT_ENCODER)
        .generate(path, color)?;
    Ok(path.to_path_buf())
}
