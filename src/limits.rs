/// Resource limits for decode operations.
///
/// All fields default to `None` (no limit). Checked after probing and
/// before any pixel buffer is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    /// Maximum extent along any single axis.
    pub max_extent: Option<u64>,
    /// Maximum pixel count (product of all extents).
    pub max_pixels: Option<u64>,
    /// Maximum memory bytes for output buffer allocation.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check extents against limits. Returns Ok(()) or LimitExceeded error.
    pub(crate) fn check(&self, extents: &[u32]) -> Result<(), crate::VoxError> {
        if let Some(max_e) = self.max_extent {
            for &e in extents {
                if u64::from(e) > max_e {
                    return Err(crate::VoxError::LimitExceeded(format!(
                        "extent {e} exceeds limit {max_e}"
                    )));
                }
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = extents
                .iter()
                .try_fold(1u64, |acc, &e| acc.checked_mul(u64::from(e)));
            match pixels {
                Some(pixels) if pixels <= max_px => {}
                _ => {
                    return Err(crate::VoxError::LimitExceeded(format!(
                        "pixel count of {extents:?} exceeds limit {max_px}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), crate::VoxError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(crate::VoxError::LimitExceeded(format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoxError;

    #[test]
    fn unlimited_by_default() {
        let limits = Limits::default();
        assert!(limits.check(&[10_000, 10_000, 10_000]).is_ok());
        assert!(limits.check_memory(usize::MAX).is_ok());
    }

    #[test]
    fn extent_limit() {
        let limits = Limits {
            max_extent: Some(256),
            ..Default::default()
        };
        assert!(limits.check(&[256, 256]).is_ok());
        assert!(matches!(
            limits.check(&[257, 16]),
            Err(VoxError::LimitExceeded(_))
        ));
    }

    #[test]
    fn pixel_limit_counts_all_axes() {
        let limits = Limits {
            max_pixels: Some(1_000),
            ..Default::default()
        };
        assert!(limits.check(&[10, 10, 10]).is_ok());
        assert!(matches!(
            limits.check(&[10, 10, 11]),
            Err(VoxError::LimitExceeded(_))
        ));
    }
}
