//! Native raw container (internal decode, public encode).
//!
//! Layout: 8-byte magic `voxraw01`, ASCII key/value header lines
//! terminated by `ENDHDR`, then little-endian samples in storage order
//! (channels interleaved per position, fastest axis first):
//!
//! ```text
//! voxraw01DIM 3
//! SIZE 64 64 32
//! TYPE uint16
//! LAYOUT vector
//! CHANNELS 3
//! ENDHDR
//! <raw little-endian samples>
//! ```
//!
//! The one backend that can express the full metadata matrix.

pub(crate) mod decode;
mod encode;

pub(crate) use decode::VxrDecoder;
pub use encode::{encode, encode_image};

/// 8-byte file magic.
pub(crate) const MAGIC: &[u8; 8] = b"voxraw01";

pub(crate) fn matches_magic(prefix: &[u8]) -> bool {
    prefix.starts_with(MAGIC)
}
