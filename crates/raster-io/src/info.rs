//! File metadata and the decoded-image tagged union.
//!
//! Decoders report what a file contains through [`FileInfo`] without
//! touching pixel data, and deliver pixels as a [`DecodedImage`]: one
//! variant per supported component type, so callers match instead of
//! downcasting.

use half::f16;
use raster_core::{AlphaMode, ColorSpace, Image};

/// The closed set of component types a decode can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// 8-bit unsigned normalized.
    U8,
    /// 16-bit unsigned normalized.
    U16,
    /// 8-bit signed normalized.
    I8,
    /// 16-bit signed normalized.
    I16,
    /// 16-bit float.
    F16,
    /// 32-bit float.
    F32,
}

impl SampleKind {
    /// Bits per component.
    #[inline]
    pub fn bit_depth(self) -> u32 {
        match self {
            SampleKind::U8 | SampleKind::I8 => 8,
            SampleKind::U16 | SampleKind::I16 | SampleKind::F16 => 16,
            SampleKind::F32 => 32,
        }
    }

    /// Whether the encoding is signed.
    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            SampleKind::I8 | SampleKind::I16 | SampleKind::F16 | SampleKind::F32
        )
    }

    /// Whether the encoding is floating point.
    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, SampleKind::F16 | SampleKind::F32)
    }
}

/// What a file contains, reported by probing without decoding pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Interleaved channel count.
    pub channels: u32,
    /// Bits per stored component.
    pub bit_depth: u32,
    /// Whether stored components are signed.
    pub is_signed: bool,
    /// Whether stored components are floating point.
    pub is_float: bool,
    /// Declared color space.
    pub color_space: ColorSpace,
    /// Declared alpha mode.
    pub alpha_mode: AlphaMode,
}

/// A decoded image, tagged by component type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedImage {
    /// 8-bit unsigned normalized pixels.
    U8(Image<u8>),
    /// 16-bit unsigned normalized pixels.
    U16(Image<u16>),
    /// 8-bit signed normalized pixels.
    I8(Image<i8>),
    /// 16-bit signed normalized pixels.
    I16(Image<i16>),
    /// 16-bit float pixels.
    F16(Image<f16>),
    /// 32-bit float pixels.
    F32(Image<f32>),
}

/// Dispatches over the contained `Image<T>` regardless of component type.
macro_rules! with_image {
    ($value:expr, $img:ident => $body:expr) => {
        match $value {
            DecodedImage::U8($img) => $body,
            DecodedImage::U16($img) => $body,
            DecodedImage::I8($img) => $body,
            DecodedImage::I16($img) => $body,
            DecodedImage::F16($img) => $body,
            DecodedImage::F32($img) => $body,
        }
    };
}

impl DecodedImage {
    /// The component type of the contained image.
    #[inline]
    pub fn kind(&self) -> SampleKind {
        match self {
            DecodedImage::U8(_) => SampleKind::U8,
            DecodedImage::U16(_) => SampleKind::U16,
            DecodedImage::I8(_) => SampleKind::I8,
            DecodedImage::I16(_) => SampleKind::I16,
            DecodedImage::F16(_) => SampleKind::F16,
            DecodedImage::F32(_) => SampleKind::F32,
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        with_image!(self, img => img.width())
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        with_image!(self, img => img.height())
    }

    /// Interleaved channel count.
    #[inline]
    pub fn channels(&self) -> u32 {
        with_image!(self, img => img.channels())
    }

    /// The color space the pixels are encoded in.
    #[inline]
    pub fn color_space(&self) -> ColorSpace {
        with_image!(self, img => img.color_space())
    }

    /// How color channels relate to alpha.
    #[inline]
    pub fn alpha_mode(&self) -> AlphaMode {
        with_image!(self, img => img.alpha_mode())
    }

    /// The logical pixel data as raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        with_image!(self, img => img.as_bytes())
    }

    /// Metadata of the contained image as a [`FileInfo`].
    pub fn file_info(&self) -> FileInfo {
        let kind = self.kind();
        FileInfo {
            width: self.width(),
            height: self.height(),
            channels: self.channels(),
            bit_depth: kind.bit_depth(),
            is_signed: kind.is_signed(),
            is_float: kind.is_float(),
            color_space: self.color_space(),
            alpha_mode: self.alpha_mode(),
        }
    }

    /// Converts to the requested component type through normalized `f32`.
    /// Identity (cheap clone) when the kind already matches.
    pub fn convert_kind(&self, kind: SampleKind) -> DecodedImage {
        if self.kind() == kind {
            return self.clone();
        }
        match kind {
            SampleKind::U8 => DecodedImage::U8(with_image!(self, img => img.convert_format())),
            SampleKind::U16 => DecodedImage::U16(with_image!(self, img => img.convert_format())),
            SampleKind::I8 => DecodedImage::I8(with_image!(self, img => img.convert_format())),
            SampleKind::I16 => DecodedImage::I16(with_image!(self, img => img.convert_format())),
            SampleKind::F16 => DecodedImage::F16(with_image!(self, img => img.convert_format())),
            SampleKind::F32 => DecodedImage::F32(with_image!(self, img => img.convert_format())),
        }
    }
}
