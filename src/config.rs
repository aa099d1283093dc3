//! Run configuration.
//!
//! A [`Config`] is built once per invocation (defaults, then an optional TOML
//! file, then command-line overrides), validated, and handed by reference to
//! both pipelines. It is never mutated afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DisguiseError, Result};
use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_MARKER, DEFAULT_RESTORED_SUFFIX};

/// Default bitmap cover width.
pub const DEFAULT_IMAGE_WIDTH: u32 = 320;

/// Default bitmap cover height.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 240;

/// Default video cover width.
pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;

/// Default video cover height.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

/// Default video cover duration in seconds.
pub const DEFAULT_VIDEO_DURATION_SECS: u32 = 1;

/// Default external video encoder.
pub const DEFAULT_ENCODER: &str = "ffmpeg";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Kind of cover to generate, with its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    /// Uncompressed 24-bit bitmap.
    Image { width: u32, height: u32 },
    /// Short solid-color video produced by the external encoder.
    Video {
        width: u32,
        height: u32,
        duration_secs: u32,
    },
}

impl CoverKind {
    /// Default-sized image cover.
    pub fn image() -> Self {
        Self::Image {
            width: DEFAULT_IMAGE_WIDTH,
            height: DEFAULT_IMAGE_HEIGHT,
        }
    }

    /// Default-sized video cover.
    pub fn video() -> Self {
        Self::Video {
            width: DEFAULT_VIDEO_WIDTH,
            height: DEFAULT_VIDEO_HEIGHT,
            duration_secs: DEFAULT_VIDEO_DURATION_SECS,
        }
    }

    /// File extension of containers of this kind, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Image { .. } => "bmp",
            Self::Video { .. } => "mp4",
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, Self::Video { .. })
    }
}

impl Default for CoverKind {
    fn default() -> Self {
        Self::image()
    }
}

/// Immutable configuration shared by the hide and extract pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    chunk_size: usize,
    marker: Vec<u8>,
    cover: CoverKind,
    restored_suffix: String,
    encoder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            marker: DEFAULT_MARKER.to_vec(),
            cover: CoverKind::default(),
            restored_suffix: DEFAULT_RESTORED_SUFFIX.to_string(),
            encoder: DEFAULT_ENCODER.to_string(),
        }
    }
}

impl Config {
    /// Chunk size for every streamed read and copy.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Marker bytes separating cover from frame.
    pub fn marker(&self) -> &[u8] {
        &self.marker
    }

    pub fn cover(&self) -> &CoverKind {
        &self.cover
    }

    /// Suffix appended to restored file names.
    pub fn restored_suffix(&self) -> &str {
        &self.restored_suffix
    }

    /// External video encoder program.
    pub fn encoder(&self) -> &str {
        &self.encoder
    }

    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        Self { chunk_size, ..self }
    }

    pub fn with_marker(self, marker: impl Into<Vec<u8>>) -> Self {
        Self {
            marker: marker.into(),
            ..self
        }
    }

    pub fn with_cover(self, cover: CoverKind) -> Self {
        Self { cover, ..self }
    }

    /// Switches the cover kind while keeping the sizes from `file`.
    ///
    /// Used by the CLI, where `-t` picks the kind and the config file picks
    /// the dimensions.
    pub fn with_cover_type(self, video: bool, file: &FileConfig) -> Self {
        let cover = if video {
            file.video_kind()
        } else {
            file.image_kind()
        };
        Self { cover, ..self }
    }

    pub fn with_restored_suffix(self, suffix: impl Into<String>) -> Self {
        Self {
            restored_suffix: suffix.into(),
            ..self
        }
    }

    pub fn with_encoder(self, encoder: impl Into<String>) -> Self {
        Self {
            encoder: encoder.into(),
            ..self
        }
    }

    /// Applies the values present in a parsed configuration file.
    pub fn with_file(self, file: &FileConfig) -> Self {
        let cover = if self.cover.is_video() {
            file.video_kind()
        } else {
            file.image_kind()
        };

        Self {
            chunk_size: file.chunk_size.unwrap_or(self.chunk_size),
            marker: file
                .marker
                .as_ref()
                .map(|m| m.as_bytes().to_vec())
                .unwrap_or(self.marker),
            cover,
            restored_suffix: file.restored_suffix.clone().unwrap_or(self.restored_suffix),
            encoder: file.encoder.clone().unwrap_or(self.encoder),
        }
    }

    /// Checks the invariants both pipelines rely on.
    ///
    /// The marker must fit in one chunk: the locator keeps exactly one chunk
    /// of history, so a longer marker split across reads could be missed.
    pub fn validate(self) -> Result<Self> {
        if self.chunk_size == 0 {
            return Err(DisguiseError::InvalidConfig(
                "chunk size must be greater than zero".into(),
            ));
        }
        if self.marker.is_empty() {
            return Err(DisguiseError::InvalidConfig("marker cannot be empty".into()));
        }
        if self.marker.len() > self.chunk_size {
            return Err(DisguiseError::InvalidConfig(format!(
                "marker length {} exceeds chunk size {}",
                self.marker.len(),
                self.chunk_size
            )));
        }
        match self.cover {
            CoverKind::Image { width, height } | CoverKind::Video { width, height, .. }
                if width == 0 || height == 0 =>
            {
                return Err(DisguiseError::InvalidConfig(format!(
                    "cover dimensions must be non-zero, got {}x{}",
                    width, height
                )));
            }
            CoverKind::Video {
                duration_secs: 0, ..
            } => {
                return Err(DisguiseError::InvalidConfig(
                    "video duration must be at least one second".into(),
                ));
            }
            _ => {}
        }
        if self.encoder.trim().is_empty() {
            return Err(DisguiseError::InvalidConfig("encoder cannot be empty".into()));
        }
        Ok(self)
    }
}

/// Image section of the configuration file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImageSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Video section of the configuration file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VideoSection {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub duration_secs: Option<u32>,
}

/// Configuration file stored in TOML format. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub chunk_size: Option<usize>,
    pub marker: Option<String>,
    pub restored_suffix: Option<String>,
    pub encoder: Option<String>,
    #[serde(default)]
    pub image: ImageSection,
    #[serde(default)]
    pub video: VideoSection,
}

impl FileConfig {
    /// Parses a configuration file from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a configuration file.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// location is tried and an absent file yields an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(DisguiseError::InputNotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        tracing::debug!(path = %path.display(), "loading configuration file");
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    fn image_kind(&self) -> CoverKind {
        CoverKind::Image {
            width: self.image.width.unwrap_or(DEFAULT_IMAGE_WIDTH),
            height: self.image.height.unwrap_or(DEFAULT_IMAGE_HEIGHT),
        }
    }

    fn video_kind(&self) -> CoverKind {
        CoverKind::Video {
            width: self.video.width.unwrap_or(DEFAULT_VIDEO_WIDTH),
            height: self.video.height.unwrap_or(DEFAULT_VIDEO_HEIGHT),
            duration_secs: self
                .video
                .duration_secs
                .unwrap_or(DEFAULT_VIDEO_DURATION_SECS),
        }
    }
}

/// Get the Disguise config directory (`~/.disguise`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".disguise"))
}

/// Path of the default configuration file, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
