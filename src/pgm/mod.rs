//! Binary PGM (P5) backend (internal decode, public encode).
//!
//! Grayscale only: maxval <= 255 probes as (2D, uint8, scalar, 1),
//! larger maxvals as (2D, uint16, scalar, 1). 16-bit samples are
//! big-endian on disk, converted to native little-endian storage.

pub(crate) mod decode;
mod encode;

pub(crate) use decode::PgmDecoder;
pub use encode::encode;

pub(crate) const MAGIC: &[u8; 2] = b"P5";

pub(crate) fn matches_magic(prefix: &[u8]) -> bool {
    prefix.starts_with(MAGIC)
}
