//! Native container encoder.

use crate::buffer::ImageHandle;
use crate::error::VoxError;
use crate::meta::ImageMeta;

/// Encode little-endian sample bytes under the given metadata.
///
/// `samples_le` is storage order: channels interleaved per position,
/// fastest axis first. Exactly `meta.byte_len()` bytes are consumed.
pub fn encode(meta: &ImageMeta, samples_le: &[u8]) -> Result<Vec<u8>, VoxError> {
    meta.validate()?;
    match meta.layout.required_channels() {
        Some(required) if !meta.layout.is_single_class() && meta.channels != required => {
            return Err(VoxError::InvalidHeader(format!(
                "{:?} layout declares {} channels, requires {required}",
                meta.layout, meta.channels
            )));
        }
        _ => {}
    }

    let needed = meta.byte_len()?;
    if samples_le.len() < needed {
        return Err(VoxError::BufferTooSmall {
            needed,
            actual: samples_le.len(),
        });
    }

    let mut header = String::new();
    header.push_str(&format!("DIM {}\n", meta.dimension.rank()));
    header.push_str("SIZE");
    for e in &meta.extents {
        header.push_str(&format!(" {e}"));
    }
    header.push('\n');
    header.push_str(&format!("TYPE {}\n", meta.kind.token()));
    header.push_str(&format!("LAYOUT {}\n", meta.layout.token()));
    header.push_str(&format!("CHANNELS {}\n", meta.channels));
    header.push_str("ENDHDR\n");

    let mut out = Vec::with_capacity(super::MAGIC.len() + header.len() + needed);
    out.extend_from_slice(super::MAGIC);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&samples_le[..needed]);
    Ok(out)
}

/// Encode a decoded handle back into the native container.
pub fn encode_image(handle: &ImageHandle) -> Result<Vec<u8>, VoxError> {
    let meta = ImageMeta {
        dimension: handle.dimension(),
        extents: handle.extents().to_vec(),
        kind: handle.kind(),
        layout: handle.layout(),
        channels: handle.channels(),
    };
    encode(&meta, &handle.to_le_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::{ComponentKind, Dimension, PixelLayout};
    use crate::vxr::decode::parse_header;
    use std::io::Cursor;

    fn meta_2d_gray() -> ImageMeta {
        ImageMeta {
            dimension: Dimension::D2,
            extents: vec![3, 2],
            kind: ComponentKind::UInt8,
            layout: PixelLayout::Scalar,
            channels: 1,
        }
    }

    #[test]
    fn encoded_header_parses_back() {
        let meta = meta_2d_gray();
        let encoded = encode(&meta, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(encoded.starts_with(super::super::MAGIC));
        let parsed = parse_header(&mut Cursor::new(encoded)).unwrap();
        assert_eq!(parsed, meta);
    }

    #[test]
    fn short_input_is_too_small() {
        let meta = meta_2d_gray();
        let err = encode(&meta, &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            VoxError::BufferTooSmall {
                needed: 6,
                actual: 3
            }
        ));
    }
}
