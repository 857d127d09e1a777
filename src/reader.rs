//! Probe, dispatch, and typed decode.
//!
//! A read is one pass: the registry picks a backend by magic bytes, the
//! backend's header yields [`ImageMeta`], the layout class routes to the
//! scalar or vector dispatcher, and the dispatcher's exhaustive
//! component-kind match picks exactly one typed read. The typed read is
//! all-or-nothing: a handle is either fully populated or never exists.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::buffer::{ImageHandle, Sample};
use crate::error::VoxError;
use crate::limits::Limits;
use crate::meta::ImageMeta;
use crate::pixel::{ComponentKind, ElementShape, TypeTag};
use crate::vxr;

/// A format backend: header probe plus a one-shot pixel stream.
///
/// `stream_pixels` fills `into` completely with little-endian sample
/// bytes in storage order, or fails with [`VoxError::Decode`]. It is
/// called at most once, after `read_header`.
pub(crate) trait FormatDecoder {
    fn read_header(&mut self) -> Result<ImageMeta, VoxError>;
    fn stream_pixels(&mut self, into: &mut [u8]) -> Result<(), VoxError>;
}

/// Longest magic prefix any backend sniffs.
const MAGIC_LEN: usize = 8;

fn open_decoder(path: &Path) -> Result<Box<dyn FormatDecoder>, VoxError> {
    let file = File::open(path).map_err(|e| {
        VoxError::UnrecognizedFormat(format!("cannot open {}: {e}", path.display()))
    })?;
    let mut reader = BufReader::new(file);

    let mut prefix = [0u8; MAGIC_LEN];
    let got = read_prefix(&mut reader, &mut prefix)?;
    let magic = &prefix[..got];
    reader.rewind().map_err(|e| {
        VoxError::UnrecognizedFormat(format!("cannot read {}: {e}", path.display()))
    })?;

    if vxr::matches_magic(magic) {
        return Ok(Box::new(vxr::VxrDecoder::new(reader)));
    }
    #[cfg(feature = "farbfeld")]
    if crate::farbfeld::matches_magic(magic) {
        return Ok(Box::new(crate::farbfeld::FarbfeldDecoder::new(reader)));
    }
    #[cfg(feature = "pgm")]
    if crate::pgm::matches_magic(magic) {
        return Ok(Box::new(crate::pgm::PgmDecoder::new(reader)));
    }
    Err(VoxError::UnrecognizedFormat(format!(
        "no decoder claims {}",
        path.display()
    )))
}

fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, VoxError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(VoxError::UnrecognizedFormat(format!(
                    "cannot read header: {e}"
                )));
            }
        }
    }
    Ok(filled)
}

/// Probe a file's metadata without decoding or allocating pixel storage.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<ImageMeta, VoxError> {
    let path = path.as_ref();
    let mut decoder = open_decoder(path)?;
    let meta = decoder.read_header()?;
    meta.validate()?;
    debug!(
        "probed {}: {} {} {:?} x{} {:?}",
        path.display(),
        meta.dimension,
        meta.kind,
        meta.layout,
        meta.channels,
        meta.extents
    );
    Ok(meta)
}

/// Reads one image file whose pixel encoding is unknown until opened.
///
/// ```no_run
/// use voxio::ImageReader;
///
/// let mut reader = ImageReader::new();
/// reader.set_filename("volume.vxr");
/// let handle = reader.execute()?;
/// println!("{} as {}", handle.sample_count(), handle.tag());
/// # Ok::<(), voxio::VoxError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ImageReader {
    path: Option<PathBuf>,
    limits: Option<Limits>,
}

impl ImageReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the pending read. No I/O happens here.
    pub fn set_filename(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    pub fn filename(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bound the resources the decode may consume.
    pub fn set_limits(&mut self, limits: Limits) -> &mut Self {
        self.limits = Some(limits);
        self
    }

    /// Run the full probe, dispatch, and decode sequence.
    pub fn execute(&self) -> Result<ImageHandle, VoxError> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| VoxError::UnrecognizedFormat("no filename set".into()))?;
        let mut decoder = open_decoder(path)?;
        let meta = decoder.read_header()?;
        meta.validate()?;
        debug!(
            "reading {}: {} {} {:?} x{} {:?}",
            path.display(),
            meta.dimension,
            meta.kind,
            meta.layout,
            meta.channels,
            meta.extents
        );

        let limits = self.limits.as_ref();
        if meta.channels == 1 && meta.layout.is_single_class() {
            dispatch_single(decoder.as_mut(), &meta, limits)
        } else if !meta.layout.is_single_class() {
            dispatch_multi(decoder.as_mut(), &meta, limits)
        } else {
            // Scalar/complex layout with more than one channel: not a
            // combination any decode path is instantiated for.
            Err(VoxError::UnsupportedPixelType(format!(
                "{:?} pixels with {} channels",
                meta.layout, meta.channels
            )))
        }
    }
}

/// One-call convenience wrapper around [`ImageReader`].
pub fn read_image<P: AsRef<Path>>(path: P) -> Result<ImageHandle, VoxError> {
    let mut reader = ImageReader::new();
    reader.set_filename(path.as_ref());
    reader.execute()
}

/// Select the typed read for single-component (scalar/complex) pixels.
fn dispatch_single(
    decoder: &mut dyn FormatDecoder,
    meta: &ImageMeta,
    limits: Option<&Limits>,
) -> Result<ImageHandle, VoxError> {
    if meta.channels != 1 || !meta.layout.is_single_class() {
        // The probe layer routes here only for single-component pixels;
        // anything else reaching this point is a consistency bug.
        return Err(VoxError::InternalDispatch(format!(
            "scalar dispatch invoked for {:?} pixels with {} channels",
            meta.layout, meta.channels
        )));
    }
    match meta.kind {
        ComponentKind::Int8 => read_typed::<i8>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::UInt8 => read_typed::<u8>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::Int16 => read_typed::<i16>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::UInt16 => read_typed::<u16>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::Int32 => read_typed::<i32>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::UInt32 => read_typed::<u32>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::Int64 => read_typed::<i64>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::UInt64 => read_typed::<u64>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::Float32 => read_typed::<f32>(decoder, meta, ElementShape::Single, limits),
        ComponentKind::Float64 => read_typed::<f64>(decoder, meta, ElementShape::Single, limits),
    }
}

/// Select the typed read for multi-component pixels. RGB, RGBA, vector,
/// covariant vector, fixed array, point, and offset are all N-channel
/// elements as far as decoding is concerned.
fn dispatch_multi(
    decoder: &mut dyn FormatDecoder,
    meta: &ImageMeta,
    limits: Option<&Limits>,
) -> Result<ImageHandle, VoxError> {
    if meta.layout.is_single_class() {
        return Err(VoxError::InternalDispatch(format!(
            "vector dispatch invoked for {:?} pixels",
            meta.layout
        )));
    }
    match meta.kind {
        ComponentKind::Int8 => read_typed::<i8>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::UInt8 => read_typed::<u8>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::Int16 => read_typed::<i16>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::UInt16 => read_typed::<u16>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::Int32 => read_typed::<i32>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::UInt32 => read_typed::<u32>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::Int64 => read_typed::<i64>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::UInt64 => read_typed::<u64>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::Float32 => read_typed::<f32>(decoder, meta, ElementShape::Multi, limits),
        ComponentKind::Float64 => read_typed::<f64>(decoder, meta, ElementShape::Multi, limits),
    }
}

/// Decode for exactly one (dimension, kind, shape) instantiation.
fn read_typed<T: Sample>(
    decoder: &mut dyn FormatDecoder,
    meta: &ImageMeta,
    shape: ElementShape,
    limits: Option<&Limits>,
) -> Result<ImageHandle, VoxError> {
    let tag = TypeTag::new(meta.dimension, T::KIND, shape);
    if !tag.is_supported() {
        return Err(VoxError::UnsupportedPixelType(format!(
            "this build does not instantiate {tag} buffers"
        )));
    }

    if let Some(limits) = limits {
        limits.check(&meta.extents)?;
    }
    let samples = meta.sample_count()?;
    let nbytes = samples
        .checked_mul(T::BYTES)
        .ok_or_else(|| VoxError::ExtentsTooLarge {
            extents: meta.extents.clone(),
        })?;
    if let Some(limits) = limits {
        limits.check_memory(nbytes)?;
    }

    trace!("decoding {samples} samples ({nbytes} bytes) as {tag}");
    let mut raw = vec![0u8; nbytes];
    decoder.stream_pixels(&mut raw)?;

    let mut out = Vec::with_capacity(samples);
    for chunk in raw.chunks_exact(T::BYTES) {
        out.push(T::from_le_bytes(chunk));
    }
    Ok(ImageHandle::new(
        tag,
        meta.extents.clone(),
        meta.channels,
        meta.layout,
        T::into_buffer(out),
    ))
}
