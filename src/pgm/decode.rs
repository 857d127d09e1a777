//! P5 header tokenizing and pixel streaming.

use std::io::Read;

use crate::error::VoxError;
use crate::meta::ImageMeta;
use crate::pixel::{ComponentKind, Dimension, PixelLayout};
use crate::reader::FormatDecoder;

const MAX_TOKEN_BYTES: usize = 16;

pub(crate) struct PgmDecoder<R> {
    reader: R,
    kind: Option<ComponentKind>,
}

impl<R: Read> PgmDecoder<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader, kind: None }
    }

    fn read_byte(&mut self) -> Result<u8, VoxError> {
        let mut byte = [0u8; 1];
        self.reader
            .read_exact(&mut byte)
            .map_err(|e| VoxError::InvalidHeader(format!("truncated PGM header: {e}")))?;
        Ok(byte[0])
    }

    /// Next whitespace-delimited token, skipping `#` comments. Consumes
    /// the single delimiter that terminates the token, so pixel data
    /// begins immediately after the maxval token.
    fn next_token(&mut self) -> Result<String, VoxError> {
        let mut token = Vec::new();
        loop {
            let byte = self.read_byte()?;
            if byte == b'#' && token.is_empty() {
                while self.read_byte()? != b'\n' {}
                continue;
            }
            if byte.is_ascii_whitespace() {
                if token.is_empty() {
                    continue;
                }
                break;
            }
            token.push(byte);
            if token.len() > MAX_TOKEN_BYTES {
                return Err(VoxError::InvalidHeader("PGM header token too long".into()));
            }
        }
        String::from_utf8(token).map_err(|_| VoxError::InvalidHeader("non-ASCII PGM header".into()))
    }

    fn next_number(&mut self, what: &str) -> Result<u32, VoxError> {
        let token = self.next_token()?;
        token
            .parse()
            .map_err(|_| VoxError::InvalidHeader(format!("PGM {what} is not a valid number")))
    }
}

impl<R: Read> FormatDecoder for PgmDecoder<R> {
    fn read_header(&mut self) -> Result<ImageMeta, VoxError> {
        let mut magic = [0u8; 2];
        self.reader
            .read_exact(&mut magic)
            .map_err(|e| VoxError::InvalidHeader(format!("truncated PGM header: {e}")))?;
        if &magic != super::MAGIC {
            return Err(VoxError::UnrecognizedFormat(
                "unrecognized format magic bytes".into(),
            ));
        }
        // P5 requires a whitespace delimiter between the magic and the
        // width token.
        if !self.read_byte()?.is_ascii_whitespace() {
            return Err(VoxError::InvalidHeader(
                "missing whitespace after PGM magic".into(),
            ));
        }

        let width = self.next_number("width")?;
        let height = self.next_number("height")?;
        let maxval = self.next_number("maxval")?;

        let kind = match maxval {
            1..=255 => ComponentKind::UInt8,
            256..=65535 => ComponentKind::UInt16,
            _ => {
                return Err(VoxError::InvalidHeader(format!(
                    "PGM maxval {maxval} out of range"
                )));
            }
        };
        self.kind = Some(kind);

        Ok(ImageMeta {
            dimension: Dimension::D2,
            extents: vec![width, height],
            kind,
            layout: PixelLayout::Scalar,
            channels: 1,
        })
    }

    fn stream_pixels(&mut self, into: &mut [u8]) -> Result<(), VoxError> {
        self.reader
            .read_exact(into)
            .map_err(|e| VoxError::Decode(format!("unexpected end of pixel data: {e}")))?;
        if self.kind == Some(ComponentKind::UInt16) {
            // 16-bit PGM is big-endian on disk.
            for pair in into.chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
        }
        Ok(())
    }
}
