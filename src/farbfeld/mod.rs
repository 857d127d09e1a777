//! Farbfeld image format backend (internal decode, public encode).
//!
//! Farbfeld is a simple lossless format: 8-byte magic ("farbfeld"),
//! width/height as u32 big-endian, then RGBA u16 big-endian pixels.
//! Every farbfeld file probes as (2D, uint16, rgba, 4 channels).

pub(crate) mod decode;
mod encode;

pub(crate) use decode::FarbfeldDecoder;
pub use encode::encode;

pub(crate) const MAGIC: &[u8; 8] = b"farbfeld";

pub(crate) fn matches_magic(prefix: &[u8]) -> bool {
    prefix.starts_with(MAGIC)
}
