//! # Disguise - Hide a file at the tail of a picture or a video
//!
//! Disguise appends an arbitrary payload file after the valid content of a
//! freshly generated cover (a solid-color bitmap or a short video), and gets
//! it back later by scanning for a marker.
//!
//! ## Frame format
//!
//! ```text
//! [cover bytes ...][MARKER][u32 LE name length][name (UTF-8)][payload ... EOF]
//! ```
//!
//! - The cover is never parsed; only its length matters.
//! - The payload has no length field; it runs until end-of-file.
//! - Media players ignore the trailing bytes, so the cover still opens.
//!
//! This is framing, not concealment: anyone who knows the marker can read
//! the payload.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use disguise::{Config, Embedder, Extractor};
//!
//! let config = Config::default();
//!
//! let container = Embedder::new(&config)
//!     .hide_file(Path::new("secret.txt"), None)
//!     .unwrap();
//!
//! let restored = Extractor::new(&config)
//!     .extract_file(&container, Some(Path::new("out")))
//!     .unwrap();
//!
//! println!("Restored: {}", restored.display());
//! ```
//!
//! ## Modules
//!
//! - [`frame`]: Framing, marker location, atomic append and payload read
//! - [`cover`]: Cover generators (bitmap, video)
//! - [`embed`]: Hide pipeline
//! - [`extract`]: Extract pipeline
//! - [`config`]: Immutable run configuration
//! - [`batch`]: Batch reporting and input resolution

/// Default marker separating the cover from the frame.
pub const DEFAULT_MARKER: &[u8] = b"FILE_DATA_BEGIN";

/// Default chunk size for streamed I/O (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Default suffix appended to restored file names.
pub const DEFAULT_RESTORED_SUFFIX: &str = ".restored";

pub mod batch;
pub mod config;
pub mod cover;
pub mod embed;
pub mod error;
pub mod extract;
pub mod frame;

// Re-export commonly used types at the crate root
pub use batch::{resolve_inputs, BatchFailure, BatchItem, BatchReport, ResolvedInputs};
pub use config::{Config, CoverKind};
pub use cover::{generator_for, make_image, make_video, BitmapCover, CoverGenerator, Rgb, VideoCover};
pub use embed::Embedder;
pub use error::{DisguiseError, Result};
pub use extract::Extractor;
pub use frame::locator::{locate, Location, Probe};
pub use frame::reader::read_payload;
pub use frame::writer::{append_frame, append_frame_from_reader, FrameSummary};
