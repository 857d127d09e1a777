use crate::error::VoxError;
use crate::pixel::{ComponentKind, Dimension, PixelLayout};

/// Metadata probed from a file header, before any pixel decode.
///
/// Produced once per read attempt and discarded after dispatch. The
/// probe layer guarantees `extents.len() == dimension.rank()` and
/// nonzero extents/channels; layout routing happens later, in the
/// reader, so a coherent but undecodable combination (say, a scalar
/// layout claiming five channels) survives probing and is rejected at
/// dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageMeta {
    pub dimension: Dimension,
    /// Extent per axis, fastest-varying first. `extents.len()` equals
    /// `dimension.rank()`.
    pub extents: Vec<u32>,
    pub kind: ComponentKind,
    pub layout: PixelLayout,
    /// Samples per pixel position.
    pub channels: u32,
}

impl ImageMeta {
    /// Structural coherence checks shared by probe and encode paths.
    pub(crate) fn validate(&self) -> Result<(), VoxError> {
        if self.extents.len() != self.dimension.rank() {
            return Err(VoxError::InvalidHeader(format!(
                "{} image declares {} extents",
                self.dimension,
                self.extents.len()
            )));
        }
        if self.extents.iter().any(|&e| e == 0) {
            return Err(VoxError::InvalidHeader(format!(
                "zero extent in {:?}",
                self.extents
            )));
        }
        if self.channels == 0 {
            return Err(VoxError::InvalidHeader("zero channels".into()));
        }
        Ok(())
    }

    /// Pixel positions in the image (product of all extents).
    pub fn pixel_count(&self) -> Result<u64, VoxError> {
        self.extents
            .iter()
            .try_fold(1u64, |acc, &e| acc.checked_mul(u64::from(e)))
            .ok_or_else(|| VoxError::ExtentsTooLarge {
                extents: self.extents.clone(),
            })
    }

    /// Total samples: pixel positions times channels, checked against
    /// address-space overflow.
    pub fn sample_count(&self) -> Result<usize, VoxError> {
        let samples = self
            .pixel_count()?
            .checked_mul(u64::from(self.channels))
            .ok_or_else(|| VoxError::ExtentsTooLarge {
                extents: self.extents.clone(),
            })?;
        usize::try_from(samples).map_err(|_| VoxError::ExtentsTooLarge {
            extents: self.extents.clone(),
        })
    }

    /// Exact byte length of the raw sample data.
    pub fn byte_len(&self) -> Result<usize, VoxError> {
        self.sample_count()?
            .checked_mul(self.kind.bytes_per_sample())
            .ok_or_else(|| VoxError::ExtentsTooLarge {
                extents: self.extents.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta_3d() -> ImageMeta {
        ImageMeta {
            dimension: Dimension::D3,
            extents: vec![4, 5, 6],
            kind: ComponentKind::UInt16,
            layout: PixelLayout::Vector,
            channels: 3,
        }
    }

    #[test]
    fn sizes() {
        let meta = meta_3d();
        assert_eq!(meta.pixel_count().unwrap(), 120);
        assert_eq!(meta.sample_count().unwrap(), 360);
        assert_eq!(meta.byte_len().unwrap(), 720);
    }

    #[test]
    fn rank_mismatch_rejected() {
        let mut meta = meta_3d();
        meta.extents = vec![4, 5];
        assert!(matches!(meta.validate(), Err(VoxError::InvalidHeader(_))));
    }

    #[test]
    fn overflow_rejected() {
        let mut meta = meta_3d();
        meta.extents = vec![u32::MAX, u32::MAX, u32::MAX];
        assert!(matches!(
            meta.byte_len(),
            Err(VoxError::ExtentsTooLarge { .. })
        ));
    }
}
