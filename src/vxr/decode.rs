//! Native container header parsing and pixel streaming.

use std::io::{BufRead, Read};

use crate::error::VoxError;
use crate::meta::ImageMeta;
use crate::pixel::{ComponentKind, Dimension, PixelLayout};
use crate::reader::FormatDecoder;

const MAX_HEADER_LINES: usize = 64;
const MAX_LINE_BYTES: usize = 256;

pub(crate) struct VxrDecoder<R> {
    reader: R,
}

impl<R: BufRead> VxrDecoder<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> FormatDecoder for VxrDecoder<R> {
    fn read_header(&mut self) -> Result<ImageMeta, VoxError> {
        parse_header(&mut self.reader)
    }

    fn stream_pixels(&mut self, into: &mut [u8]) -> Result<(), VoxError> {
        self.reader
            .read_exact(into)
            .map_err(|e| VoxError::Decode(format!("unexpected end of pixel data: {e}")))
    }
}

pub(crate) fn parse_header<R: BufRead>(reader: &mut R) -> Result<ImageMeta, VoxError> {
    let mut magic = [0u8; 8];
    reader
        .read_exact(&mut magic)
        .map_err(|e| VoxError::InvalidHeader(format!("truncated magic: {e}")))?;
    if &magic != super::MAGIC {
        return Err(VoxError::UnrecognizedFormat(
            "unrecognized format magic bytes".into(),
        ));
    }

    let mut rank: Option<u32> = None;
    let mut extents: Option<Vec<u32>> = None;
    let mut kind_token: Option<String> = None;
    let mut layout_token: Option<String> = None;
    let mut channels: Option<u32> = None;

    let mut line = String::new();
    for _ in 0..MAX_HEADER_LINES {
        line.clear();
        // Cap the read itself, not just the result: an unterminated
        // multi-gigabyte "line" must fail before it is buffered.
        let n = reader
            .by_ref()
            .take(MAX_LINE_BYTES as u64 + 1)
            .read_line(&mut line)
            .map_err(|e| VoxError::InvalidHeader(format!("unreadable header line: {e}")))?;
        if n == 0 {
            return Err(VoxError::InvalidHeader(
                "unexpected end of header before ENDHDR".into(),
            ));
        }
        if n > MAX_LINE_BYTES {
            return Err(VoxError::InvalidHeader("header line too long".into()));
        }

        let mut fields = line.split_whitespace();
        let key = match fields.next() {
            // Blank lines and # comments are tolerated, PAM-style.
            None => continue,
            Some(k) if k.starts_with('#') => continue,
            Some(k) => k,
        };
        match key {
            "ENDHDR" => {
                return finish_header(rank, extents, kind_token, layout_token, channels);
            }
            "DIM" => rank = Some(parse_u32(fields.next(), "DIM")?),
            "SIZE" => {
                let parsed: Result<Vec<u32>, VoxError> =
                    fields.map(|f| parse_u32(Some(f), "SIZE")).collect();
                let parsed = parsed?;
                if parsed.is_empty() {
                    return Err(VoxError::InvalidHeader("SIZE declares no extents".into()));
                }
                extents = Some(parsed);
            }
            "TYPE" => {
                kind_token = Some(
                    fields
                        .next()
                        .ok_or_else(|| VoxError::InvalidHeader("TYPE missing value".into()))?
                        .to_owned(),
                );
            }
            "LAYOUT" => {
                layout_token = Some(
                    fields
                        .next()
                        .ok_or_else(|| VoxError::InvalidHeader("LAYOUT missing value".into()))?
                        .to_owned(),
                );
            }
            "CHANNELS" => channels = Some(parse_u32(fields.next(), "CHANNELS")?),
            other => {
                return Err(VoxError::InvalidHeader(format!(
                    "unknown header key \"{other}\""
                )));
            }
        }
    }
    Err(VoxError::InvalidHeader("header too long".into()))
}

fn parse_u32(field: Option<&str>, key: &str) -> Result<u32, VoxError> {
    field
        .ok_or_else(|| VoxError::InvalidHeader(format!("{key} missing value")))?
        .parse()
        .map_err(|_| VoxError::InvalidHeader(format!("{key} is not a valid number")))
}

fn finish_header(
    rank: Option<u32>,
    extents: Option<Vec<u32>>,
    kind_token: Option<String>,
    layout_token: Option<String>,
    channels: Option<u32>,
) -> Result<ImageMeta, VoxError> {
    let rank = rank.ok_or_else(|| VoxError::InvalidHeader("missing DIM".into()))?;
    let extents = extents.ok_or_else(|| VoxError::InvalidHeader("missing SIZE".into()))?;
    let kind_token = kind_token.ok_or_else(|| VoxError::InvalidHeader("missing TYPE".into()))?;
    let layout_token =
        layout_token.ok_or_else(|| VoxError::InvalidHeader("missing LAYOUT".into()))?;
    let channels = channels.ok_or_else(|| VoxError::InvalidHeader("missing CHANNELS".into()))?;

    let dimension = Dimension::from_rank(rank).ok_or_else(|| {
        VoxError::UnsupportedPixelType(format!(
            "only 2- and 3-dimensional images are supported ({rank} declared)"
        ))
    })?;
    let kind = ComponentKind::from_token(&kind_token).ok_or_else(|| {
        VoxError::UnsupportedPixelType(format!("unknown component kind \"{kind_token}\""))
    })?;
    let layout = PixelLayout::from_token(&layout_token).ok_or_else(|| {
        VoxError::UnsupportedPixelType(format!("unknown pixel layout \"{layout_token}\""))
    })?;

    // RGB/RGBA fix their own channel counts; scalar/complex channel
    // counts are passed through as declared and judged at dispatch.
    match layout.required_channels() {
        Some(required) if !layout.is_single_class() && channels != required => {
            return Err(VoxError::InvalidHeader(format!(
                "{layout_token} layout declares {channels} channels, requires {required}"
            )));
        }
        _ => {}
    }

    let meta = ImageMeta {
        dimension,
        extents,
        kind,
        layout,
        channels,
    };
    meta.validate()?;
    Ok(meta)
}
