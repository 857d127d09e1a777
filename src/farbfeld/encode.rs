//! Farbfeld encoder.

use crate::error::VoxError;

/// Encode RGBA u16 samples (little-endian bytes, interleaved) as
/// farbfeld. `samples_le` must hold `width * height * 4` u16 values.
pub fn encode(width: u32, height: u32, samples_le: &[u8]) -> Result<Vec<u8>, VoxError> {
    if width == 0 || height == 0 {
        return Err(VoxError::InvalidHeader(
            "farbfeld extents must be nonzero".into(),
        ));
    }
    let needed = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(8))
        .ok_or(VoxError::ExtentsTooLarge {
            extents: vec![width, height],
        })?;
    if samples_le.len() < needed {
        return Err(VoxError::BufferTooSmall {
            needed,
            actual: samples_le.len(),
        });
    }

    let mut out = Vec::with_capacity(16 + needed);
    out.extend_from_slice(super::MAGIC);
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    for pair in samples_le[..needed].chunks_exact(2) {
        // LE storage back to the format's big-endian.
        out.push(pair[1]);
        out.push(pair[0]);
    }
    Ok(out)
}
