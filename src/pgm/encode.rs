//! P5 encoder.

use crate::error::VoxError;
use crate::pixel::ComponentKind;

/// Encode grayscale samples (little-endian bytes) as binary PGM.
///
/// `kind` must be `UInt8` or `UInt16`; 16-bit output is written
/// big-endian as the format requires.
pub fn encode(
    width: u32,
    height: u32,
    kind: ComponentKind,
    samples_le: &[u8],
) -> Result<Vec<u8>, VoxError> {
    let maxval: u32 = match kind {
        ComponentKind::UInt8 => 255,
        ComponentKind::UInt16 => 65535,
        other => {
            return Err(VoxError::UnsupportedPixelType(format!(
                "PGM cannot hold {other} samples"
            )));
        }
    };
    if width == 0 || height == 0 {
        return Err(VoxError::InvalidHeader("PGM extents must be nonzero".into()));
    }

    let needed = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(kind.bytes_per_sample()))
        .ok_or(VoxError::ExtentsTooLarge {
            extents: vec![width, height],
        })?;
    if samples_le.len() < needed {
        return Err(VoxError::BufferTooSmall {
            needed,
            actual: samples_le.len(),
        });
    }

    let header = format!("P5\n{width} {height}\n{maxval}\n");
    let mut out = Vec::with_capacity(header.len() + needed);
    out.extend_from_slice(header.as_bytes());
    match kind {
        ComponentKind::UInt8 => out.extend_from_slice(&samples_le[..needed]),
        _ => {
            for pair in samples_le[..needed].chunks_exact(2) {
                out.push(pair[1]);
                out.push(pair[0]);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray8_header() {
        let out = encode(3, 2, ComponentKind::UInt8, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert!(out.starts_with(b"P5\n3 2\n255\n"));
        assert!(out.ends_with(&[1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn gray16_written_big_endian() {
        let out = encode(1, 1, ComponentKind::UInt16, &0x0102u16.to_le_bytes()).unwrap();
        assert!(out.ends_with(&0x0102u16.to_be_bytes()));
    }

    #[test]
    fn signed_samples_refused() {
        assert!(matches!(
            encode(1, 1, ComponentKind::Int8, &[0]),
            Err(VoxError::UnsupportedPixelType(_))
        ));
    }
}
