//! # voxio
//!
//! 2D/3D image decoding for files whose pixel encoding (dimensionality,
//! sample width and signedness, channel layout) is unknown until the
//! file is opened.
//!
//! A read is a single probe, dispatch, and decode pass. The probe reads
//! just enough header to learn the metadata; the dispatch layer maps
//! that metadata onto exactly one statically-typed decode path out of
//! the (dimension x component kind x layout class) matrix; the result
//! is a reference-counted, type-erased [`ImageHandle`] whose concrete
//! sample type is recovered with a checked downcast.
//!
//! The mapping is total over the build's fixed allow-list of
//! instantiated types ([`supported_tags`]); anything outside it fails
//! with a distinct error before any pixel data is touched.
//!
//! ## Supported formats
//!
//! - **voxraw** (native container): the full metadata matrix. 2D/3D,
//!   ten component kinds, nine pixel layouts, arbitrary channel counts.
//! - **PGM** (`pgm` feature): binary P5, 8- and 16-bit grayscale.
//! - **farbfeld** (`farbfeld` feature): RGBA 16-bit.
//!
//! ## Non-goals
//!
//! - Transcoding, resampling, or any pixel-value transformation. This
//!   layer acquires a correctly-typed, correctly-shaped raw buffer and
//!   nothing else.
//! - Spatial metadata (origin, spacing, orientation).
//! - Cancellation or timeouts: a decode runs to completion or fails
//!   with a terminal error.
//!
//! ## Usage
//!
//! ```no_run
//! use voxio::{read_image, probe, PixelBuffer};
//!
//! // Probe without decoding
//! let meta = probe("scan.vxr")?;
//! println!("{} {} x{}", meta.dimension, meta.kind, meta.channels);
//!
//! // Decode; the handle's tag tells you what you got
//! let handle = read_image("scan.vxr")?;
//! match handle.buffer() {
//!     PixelBuffer::U16(samples) => println!("{} u16 samples", samples.len()),
//!     other => println!("decoded as {}", other.kind()),
//! }
//!
//! // Or downcast when you know what to expect
//! let samples: &[u16] = handle.samples()?;
//! # let _ = samples;
//! # Ok::<(), voxio::VoxError>(())
//! ```

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod limits;
mod meta;
mod pixel;
mod reader;

pub mod vxr;

#[cfg(feature = "farbfeld")]
pub mod farbfeld;

#[cfg(feature = "pgm")]
pub mod pgm;

#[cfg(feature = "imgref")]
pub use imgref;
#[cfg(feature = "rgb")]
pub use rgb;

// Re-exports
pub use buffer::{ImageHandle, PixelBuffer, Sample};
pub use error::VoxError;
pub use limits::Limits;
pub use meta::ImageMeta;
pub use pixel::{supported_tags, ComponentKind, Dimension, ElementShape, PixelLayout, TypeTag};
pub use reader::{probe, read_image, ImageReader};
