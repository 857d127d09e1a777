use crate::pixel::{ComponentKind, PixelLayout};

/// Errors from probing, dispatch, decoding, and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum VoxError {
    /// No format backend claims the file, or the file cannot be opened.
    #[error("unrecognized image format: {0}")]
    UnrecognizedFormat(String),

    /// A backend claimed the file but its header is malformed or
    /// self-inconsistent.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The probed metadata names a pixel type this build does not
    /// instantiate. Recoverable: the file may be valid, this build just
    /// cannot hold its pixels.
    #[error("unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// Metadata the probe layer should have excluded reached a
    /// dispatcher. A consistency bug, not bad input; callers should
    /// treat this as non-recoverable.
    #[error("internal dispatch error: {0}")]
    InternalDispatch(String),

    /// I/O failure or structural corruption while streaming pixel data.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A handle downcast requested a different sample type than the
    /// buffer holds.
    #[error("pixel type mismatch: requested {requested}, buffer holds {stored}")]
    TypeMismatch {
        requested: ComponentKind,
        stored: ComponentKind,
    },

    /// A typed view requested a different pixel layout than the handle
    /// carries.
    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: PixelLayout,
        actual: PixelLayout,
    },

    /// Extents whose sample count overflows address arithmetic.
    #[error("image extents too large: {extents:?}")]
    ExtentsTooLarge { extents: Vec<u32> },

    /// A configured [`crate::Limits`] bound was exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Encode input shorter than the header-implied sample data.
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },
}
