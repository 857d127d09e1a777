use std::fmt;

/// Numeric encoding of one sample value.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
}

impl ComponentKind {
    /// Bytes occupied by one sample of this kind.
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Int64 | Self::UInt64 | Self::Float64 => 8,
        }
    }

    /// Lowercase header token, as written by the native container.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Int64 => "int64",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Parse a header token. `None` for anything outside the ten kinds.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "int8" => Self::Int8,
            "uint8" => Self::UInt8,
            "int16" => Self::Int16,
            "uint16" => Self::UInt16,
            "int32" => Self::Int32,
            "uint32" => Self::UInt32,
            "int64" => Self::Int64,
            "uint64" => Self::UInt64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            _ => return None,
        })
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Structural shape of one pixel's value, as declared by the file.
///
/// Multi-component layouts differ only in downstream interpretation
/// (color vs. geometric vector vs. index offset); decode and storage
/// mechanics are identical, so dispatch collapses them to one class.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    Scalar,
    Complex,
    Rgb,
    Rgba,
    Vector,
    CovariantVector,
    FixedArray,
    Point,
    Offset,
}

impl PixelLayout {
    /// Whether this layout belongs to the single-component class
    /// (routed through the scalar dispatcher when `channels == 1`).
    pub const fn is_single_class(self) -> bool {
        matches!(self, Self::Scalar | Self::Complex)
    }

    /// Channel count this layout fixes, if any. `None` means the
    /// header's channel count stands on its own.
    pub const fn required_channels(self) -> Option<u32> {
        match self {
            Self::Scalar | Self::Complex => Some(1),
            Self::Rgb => Some(3),
            Self::Rgba => Some(4),
            Self::Vector
            | Self::CovariantVector
            | Self::FixedArray
            | Self::Point
            | Self::Offset => None,
        }
    }

    /// Lowercase header token, as written by the native container.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Complex => "complex",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
            Self::Vector => "vector",
            Self::CovariantVector => "covariant_vector",
            Self::FixedArray => "fixed_array",
            Self::Point => "point",
            Self::Offset => "offset",
        }
    }

    /// Parse a header token. `None` for anything outside the nine layouts.
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "scalar" => Self::Scalar,
            "complex" => Self::Complex,
            "rgb" => Self::Rgb,
            "rgba" => Self::Rgba,
            "vector" => Self::Vector,
            "covariant_vector" => Self::CovariantVector,
            "fixed_array" => Self::FixedArray,
            "point" => Self::Point,
            "offset" => Self::Offset,
            _ => return None,
        })
    }
}

/// Image dimensionality. Only 2D and 3D images are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    D2,
    D3,
}

impl Dimension {
    /// Number of axes.
    pub const fn rank(self) -> usize {
        match self {
            Self::D2 => 2,
            Self::D3 => 3,
        }
    }

    /// Map a header-declared dimensionality. `None` outside {2, 3}.
    pub const fn from_rank(rank: u32) -> Option<Self> {
        match rank {
            2 => Some(Self::D2),
            3 => Some(Self::D3),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.rank())
    }
}

/// Element shape a decode path is instantiated for: one sample per
/// pixel position, or an N-channel run of samples per position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementShape {
    Single,
    Multi,
}

/// The concrete identity a decode is instantiated for. Exactly one tag
/// is legal per supported metadata combination; the channel count of
/// `Multi` elements lives on the handle, not the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeTag {
    pub dimension: Dimension,
    pub kind: ComponentKind,
    pub shape: ElementShape,
}

impl TypeTag {
    pub const fn new(dimension: Dimension, kind: ComponentKind, shape: ElementShape) -> Self {
        Self {
            dimension,
            kind,
            shape,
        }
    }

    /// Whether this build instantiates a decode path for the tag.
    pub fn is_supported(self) -> bool {
        match self.shape {
            ElementShape::Single => SINGLE_TAGS.contains(&self),
            ElementShape::Multi => MULTI_TAGS.contains(&self),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.shape {
            ElementShape::Single => "single-component",
            ElementShape::Multi => "multi-channel",
        };
        write!(f, "{} {} {}", self.dimension, self.kind, shape)
    }
}

macro_rules! tags_for {
    ($shape:ident: $($kind:ident),+ $(,)?) => {
        &[
            $(
                TypeTag::new(Dimension::D2, ComponentKind::$kind, ElementShape::$shape),
                TypeTag::new(Dimension::D3, ComponentKind::$kind, ElementShape::$shape),
            )+
        ]
    };
}

const SINGLE_TAGS: &[TypeTag] = tags_for!(Single:
    Int8, UInt8, Int16, UInt16, Int32, UInt32, Int64, UInt64, Float32, Float64,
);

// 64-bit integer multi-channel buffers are not instantiated in this
// build; files declaring them are refused before any pixel decode.
const MULTI_TAGS: &[TypeTag] = tags_for!(Multi:
    Int8, UInt8, Int16, UInt16, Int32, UInt32, Float32, Float64,
);

/// The fixed allow-list of instantiated decode paths. Built into the
/// binary, never mutated; safe for unsynchronized concurrent reads.
pub fn supported_tags() -> impl Iterator<Item = TypeTag> {
    SINGLE_TAGS.iter().chain(MULTI_TAGS).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        for tag in supported_tags() {
            assert_eq!(ComponentKind::from_token(tag.kind.token()), Some(tag.kind));
        }
        assert_eq!(ComponentKind::from_token("decimal128"), None);
        assert_eq!(PixelLayout::from_token("rgb"), Some(PixelLayout::Rgb));
        assert_eq!(PixelLayout::from_token("tensor"), None);
    }

    #[test]
    fn allow_list_shape() {
        // 20 single-component tags, 16 multi-channel tags.
        assert_eq!(supported_tags().count(), 36);
        for tag in supported_tags() {
            assert!(tag.is_supported());
        }
        let excluded = TypeTag::new(Dimension::D3, ComponentKind::Int64, ElementShape::Multi);
        assert!(!excluded.is_supported());
        assert!(
            TypeTag::new(Dimension::D3, ComponentKind::Int64, ElementShape::Single).is_supported()
        );
    }

    #[test]
    fn layout_classes() {
        assert!(PixelLayout::Scalar.is_single_class());
        assert!(PixelLayout::Complex.is_single_class());
        for layout in [
            PixelLayout::Rgb,
            PixelLayout::Rgba,
            PixelLayout::Vector,
            PixelLayout::CovariantVector,
            PixelLayout::FixedArray,
            PixelLayout::Point,
            PixelLayout::Offset,
        ] {
            assert!(!layout.is_single_class());
        }
    }

    #[test]
    fn sample_widths() {
        assert_eq!(ComponentKind::UInt8.bytes_per_sample(), 1);
        assert_eq!(ComponentKind::Int16.bytes_per_sample(), 2);
        assert_eq!(ComponentKind::Float32.bytes_per_sample(), 4);
        assert_eq!(ComponentKind::UInt64.bytes_per_sample(), 8);
    }
}
