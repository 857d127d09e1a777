//! Farbfeld decoder: fixed (2D, uint16, rgba) metadata, big-endian
//! samples converted to native little-endian storage.

use std::io::Read;

use crate::error::VoxError;
use crate::meta::ImageMeta;
use crate::pixel::{ComponentKind, Dimension, PixelLayout};
use crate::reader::FormatDecoder;

pub(crate) struct FarbfeldDecoder<R> {
    reader: R,
}

impl<R: Read> FarbfeldDecoder<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> FormatDecoder for FarbfeldDecoder<R> {
    fn read_header(&mut self) -> Result<ImageMeta, VoxError> {
        let mut header = [0u8; 16];
        self.reader
            .read_exact(&mut header)
            .map_err(|e| VoxError::InvalidHeader(format!("truncated farbfeld header: {e}")))?;
        if !header.starts_with(super::MAGIC) {
            return Err(VoxError::UnrecognizedFormat(
                "unrecognized format magic bytes".into(),
            ));
        }
        let width = u32::from_be_bytes([header[8], header[9], header[10], header[11]]);
        let height = u32::from_be_bytes([header[12], header[13], header[14], header[15]]);
        if width == 0 {
            return Err(VoxError::InvalidHeader("farbfeld width is zero".into()));
        }
        if height == 0 {
            return Err(VoxError::InvalidHeader("farbfeld height is zero".into()));
        }
        Ok(ImageMeta {
            dimension: Dimension::D2,
            extents: vec![width, height],
            kind: ComponentKind::UInt16,
            layout: PixelLayout::Rgba,
            channels: 4,
        })
    }

    fn stream_pixels(&mut self, into: &mut [u8]) -> Result<(), VoxError> {
        self.reader
            .read_exact(into)
            .map_err(|e| VoxError::Decode(format!("unexpected end of pixel data: {e}")))?;
        // Each u16 arrives big-endian; storage is little-endian.
        for pair in into.chunks_exact_mut(2) {
            pair.swap(0, 1);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn file_2x1(samples_be: &[u16]) -> Vec<u8> {
        let mut bytes = super::super::MAGIC.to_vec();
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        for s in samples_be {
            bytes.extend_from_slice(&s.to_be_bytes());
        }
        bytes
    }

    #[test]
    fn header_is_fixed_rgba16() {
        let bytes = file_2x1(&[0; 8]);
        let mut dec = FarbfeldDecoder::new(Cursor::new(bytes));
        let meta = dec.read_header().unwrap();
        assert_eq!(meta.dimension, Dimension::D2);
        assert_eq!(meta.extents, vec![2, 1]);
        assert_eq!(meta.kind, ComponentKind::UInt16);
        assert_eq!(meta.layout, PixelLayout::Rgba);
        assert_eq!(meta.channels, 4);
    }

    #[test]
    fn big_endian_samples_become_little_endian() {
        let bytes = file_2x1(&[0x1234, 0, 0, 0xFFFF, 0x00FF, 0xFF00, 1, 2]);
        let mut dec = FarbfeldDecoder::new(Cursor::new(bytes));
        let meta = dec.read_header().unwrap();
        let mut raw = vec![0u8; meta.byte_len().unwrap()];
        dec.stream_pixels(&mut raw).unwrap();
        assert_eq!(&raw[0..2], &0x1234u16.to_le_bytes());
        assert_eq!(&raw[6..8], &0xFFFFu16.to_le_bytes());
        assert_eq!(&raw[8..10], &0x00FFu16.to_le_bytes());
    }

    #[test]
    fn zero_width_rejected() {
        let mut bytes = super::super::MAGIC.to_vec();
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&1u32.to_be_bytes());
        let mut dec = FarbfeldDecoder::new(Cursor::new(bytes));
        assert!(matches!(
            dec.read_header(),
            Err(VoxError::InvalidHeader(_))
        ));
    }
}
