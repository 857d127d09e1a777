use std::sync::Arc;

use crate::error::VoxError;
use crate::pixel::{ComponentKind, Dimension, PixelLayout, TypeTag};

/// A sample type the crate instantiates decode paths for.
///
/// Implemented exactly for the ten component kinds; the associated
/// constants and buffer hooks keep the type to [`ComponentKind`] mapping
/// in one place.
pub trait Sample: Copy + Send + Sync + 'static {
    const KIND: ComponentKind;
    const BYTES: usize;

    /// Decode one sample from exactly `Self::BYTES` little-endian bytes.
    fn from_le_bytes(raw: &[u8]) -> Self;

    /// Append this sample's little-endian bytes.
    fn write_le_bytes(self, out: &mut Vec<u8>);

    #[doc(hidden)]
    fn into_buffer(samples: Vec<Self>) -> PixelBuffer;

    #[doc(hidden)]
    fn slice_of(buffer: &PixelBuffer) -> Option<&[Self]>;
}

/// Decoded pixel storage: one flat, contiguous vector per component
/// kind. The closed set of variants is what makes dispatch exhaustive
/// at compile time.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelBuffer {
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! impl_sample {
    ($($t:ty => $variant:ident / $kind:ident;)+) => {
        $(
            impl Sample for $t {
                const KIND: ComponentKind = ComponentKind::$kind;
                const BYTES: usize = std::mem::size_of::<$t>();

                fn from_le_bytes(raw: &[u8]) -> Self {
                    let mut bytes = [0u8; std::mem::size_of::<$t>()];
                    bytes.copy_from_slice(raw);
                    <$t>::from_le_bytes(bytes)
                }

                fn write_le_bytes(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn into_buffer(samples: Vec<Self>) -> PixelBuffer {
                    PixelBuffer::$variant(samples)
                }

                fn slice_of(buffer: &PixelBuffer) -> Option<&[Self]> {
                    match buffer {
                        PixelBuffer::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_sample! {
    i8  => I8  / Int8;
    u8  => U8  / UInt8;
    i16 => I16 / Int16;
    u16 => U16 / UInt16;
    i32 => I32 / Int32;
    u32 => U32 / UInt32;
    i64 => I64 / Int64;
    u64 => U64 / UInt64;
    f32 => F32 / Float32;
    f64 => F64 / Float64;
}

impl PixelBuffer {
    /// Component kind stored in this buffer.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::I8(_) => ComponentKind::Int8,
            Self::U8(_) => ComponentKind::UInt8,
            Self::I16(_) => ComponentKind::Int16,
            Self::U16(_) => ComponentKind::UInt16,
            Self::I32(_) => ComponentKind::Int32,
            Self::U32(_) => ComponentKind::UInt32,
            Self::I64(_) => ComponentKind::Int64,
            Self::U64(_) => ComponentKind::UInt64,
            Self::F32(_) => ComponentKind::Float32,
            Self::F64(_) => ComponentKind::Float64,
        }
    }

    /// Number of samples (not bytes).
    pub fn len(&self) -> usize {
        match self {
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I64(v) => v.len(),
            Self::U64(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little-endian byte image of the samples, in storage order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        fn bytes_of<T: Sample>(v: &[T]) -> Vec<u8> {
            let mut out = Vec::with_capacity(v.len() * T::BYTES);
            for &s in v {
                s.write_le_bytes(&mut out);
            }
            out
        }
        match self {
            Self::I8(v) => bytes_of(v),
            Self::U8(v) => bytes_of(v),
            Self::I16(v) => bytes_of(v),
            Self::U16(v) => bytes_of(v),
            Self::I32(v) => bytes_of(v),
            Self::U32(v) => bytes_of(v),
            Self::I64(v) => bytes_of(v),
            Self::U64(v) => bytes_of(v),
            Self::F32(v) => bytes_of(v),
            Self::F64(v) => bytes_of(v),
        }
    }
}

#[derive(Debug)]
struct HandleInner {
    tag: TypeTag,
    extents: Vec<u32>,
    channels: u32,
    layout: PixelLayout,
    buffer: PixelBuffer,
}

/// Type-erased handle over one decoded image.
///
/// Construction is only reachable through a successful typed read.
/// Cloning shares the underlying buffer (reference-counted); the buffer
/// identity, tag, and shape never change after construction. The
/// concrete sample type is recovered with [`ImageHandle::samples`],
/// which fails with [`VoxError::TypeMismatch`] rather than ever
/// reinterpreting storage.
#[derive(Clone, Debug)]
pub struct ImageHandle {
    inner: Arc<HandleInner>,
}

impl ImageHandle {
    pub(crate) fn new(
        tag: TypeTag,
        extents: Vec<u32>,
        channels: u32,
        layout: PixelLayout,
        buffer: PixelBuffer,
    ) -> Self {
        debug_assert_eq!(tag.kind, buffer.kind());
        Self {
            inner: Arc::new(HandleInner {
                tag,
                extents,
                channels,
                layout,
                buffer,
            }),
        }
    }

    /// The concrete type this handle was decoded as.
    pub fn tag(&self) -> TypeTag {
        self.inner.tag
    }

    pub fn kind(&self) -> ComponentKind {
        self.inner.tag.kind
    }

    pub fn dimension(&self) -> Dimension {
        self.inner.tag.dimension
    }

    /// Extent per axis, fastest-varying first.
    pub fn extents(&self) -> &[u32] {
        &self.inner.extents
    }

    /// Samples per pixel position.
    pub fn channels(&self) -> u32 {
        self.inner.channels
    }

    /// Layout declared by the file. Dispatch does not interpret
    /// multi-channel layouts; consumers may.
    pub fn layout(&self) -> PixelLayout {
        self.inner.layout
    }

    /// Total samples in the buffer.
    pub fn sample_count(&self) -> usize {
        self.inner.buffer.len()
    }

    /// The untyped buffer, for consumers that match on the sum type.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.inner.buffer
    }

    /// Checked downcast: the samples as `&[T]`, in storage order
    /// (channels interleaved per position).
    pub fn samples<T: Sample>(&self) -> Result<&[T], VoxError> {
        T::slice_of(&self.inner.buffer).ok_or(VoxError::TypeMismatch {
            requested: T::KIND,
            stored: self.kind(),
        })
    }

    /// Little-endian byte image of the buffer, in storage order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.inner.buffer.to_le_bytes()
    }

    /// Reinterpret an 8-bit RGB handle as typed pixels.
    #[cfg(feature = "rgb")]
    pub fn rgb8(&self) -> Result<&[rgb::RGB8], VoxError> {
        use rgb::AsPixels as _;
        if self.layout() != PixelLayout::Rgb {
            return Err(VoxError::LayoutMismatch {
                expected: PixelLayout::Rgb,
                actual: self.layout(),
            });
        }
        Ok(self.samples::<u8>()?.as_pixels())
    }

    /// Reinterpret an 8-bit RGBA handle as typed pixels.
    #[cfg(feature = "rgb")]
    pub fn rgba8(&self) -> Result<&[rgb::RGBA8], VoxError> {
        use rgb::AsPixels as _;
        if self.layout() != PixelLayout::Rgba {
            return Err(VoxError::LayoutMismatch {
                expected: PixelLayout::Rgba,
                actual: self.layout(),
            });
        }
        Ok(self.samples::<u8>()?.as_pixels())
    }

    /// Zero-copy [`imgref::ImgRef`] view of a 2D 8-bit RGB handle.
    #[cfg(feature = "imgref")]
    pub fn imgref_rgb8(&self) -> Result<imgref::ImgRef<'_, rgb::RGB8>, VoxError> {
        let pixels = self.rgb8()?;
        let [w, h] = self.plane_extents()?;
        Ok(imgref::ImgRef::new(pixels, w as usize, h as usize))
    }

    /// Zero-copy [`imgref::ImgRef`] view of a 2D 8-bit RGBA handle.
    #[cfg(feature = "imgref")]
    pub fn imgref_rgba8(&self) -> Result<imgref::ImgRef<'_, rgb::RGBA8>, VoxError> {
        let pixels = self.rgba8()?;
        let [w, h] = self.plane_extents()?;
        Ok(imgref::ImgRef::new(pixels, w as usize, h as usize))
    }

    #[cfg(feature = "imgref")]
    fn plane_extents(&self) -> Result<[u32; 2], VoxError> {
        match self.extents() {
            &[w, h] => Ok([w, h]),
            _ => Err(VoxError::UnsupportedPixelType(format!(
                "no planar view of a {} image",
                self.dimension()
            ))),
        }
    }
}
