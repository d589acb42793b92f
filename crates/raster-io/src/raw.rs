//! Minimal uncompressed sample-dump codec.
//!
//! `RawCodec` exists to exercise the backend contracts and the bit-exact
//! round-trip guarantees without pulling in a real container format. The
//! layout is a fixed 24-byte header followed by raw little-endian samples:
//!
//! ```text
//! offset  size  field
//!      0     4  magic "RBUF"
//!      4     1  version (1)
//!      5     1  sample kind (0=u8 1=u16 2=i8 3=i16 4=f16 5=f32)
//!      6     1  color space (0=undefined 1=srgb 2=linear 3=gamma)
//!      7     1  alpha mode (0=none 1=premultiplied 2=postmultiplied)
//!      8     4  width (u32 le)
//!     12     4  height (u32 le)
//!     16     4  channels (u32 le)
//!     20     4  gamma (f32 le, only meaningful for color space 3)
//!     24     -  interleaved row-major samples, little endian
//! ```
//!
//! CIE-described color spaces are not representable in the header and fail
//! encoding with an unsupported-layout error.
//!
//! # Dependencies
//!
//! - [`byteorder`] - little-endian sample packing

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use half::f16;
use raster_core::{AlphaMode, ColorSpace, Component, Image};

use crate::error::{IoError, Result};
use crate::info::{DecodedImage, FileInfo, SampleKind};
use crate::traits::{PixelDecoder, PixelEncoder};

const MAGIC: &[u8; 4] = b"RBUF";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 24;

/// The uncompressed debugging codec. Stateless; implements both backend
/// traits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCodec;

fn kind_code(kind: SampleKind) -> u8 {
    match kind {
        SampleKind::U8 => 0,
        SampleKind::U16 => 1,
        SampleKind::I8 => 2,
        SampleKind::I16 => 3,
        SampleKind::F16 => 4,
        SampleKind::F32 => 5,
    }
}

fn kind_from_code(code: u8) -> Result<SampleKind> {
    match code {
        0 => Ok(SampleKind::U8),
        1 => Ok(SampleKind::U16),
        2 => Ok(SampleKind::I8),
        3 => Ok(SampleKind::I16),
        4 => Ok(SampleKind::F16),
        5 => Ok(SampleKind::F32),
        other => Err(IoError::malformed_header(format!(
            "unknown sample kind code {other}"
        ))),
    }
}

fn space_code(color_space: ColorSpace) -> Result<(u8, f32)> {
    match color_space.canonical() {
        ColorSpace::Undefined => Ok((0, 0.0)),
        ColorSpace::Srgb => Ok((1, 0.0)),
        ColorSpace::LinearSrgb => Ok((2, 0.0)),
        ColorSpace::GammaSrgb(g) => Ok((3, g)),
        ColorSpace::Cie { .. } => Err(IoError::unsupported_layout(
            "raw codec cannot represent CIE color spaces",
        )),
    }
}

fn space_from_code(code: u8, gamma: f32) -> Result<ColorSpace> {
    match code {
        0 => Ok(ColorSpace::Undefined),
        1 => Ok(ColorSpace::Srgb),
        2 => Ok(ColorSpace::LinearSrgb),
        3 => Ok(ColorSpace::GammaSrgb(gamma)),
        other => Err(IoError::malformed_header(format!(
            "unknown color space code {other}"
        ))),
    }
}

fn alpha_code(alpha_mode: AlphaMode) -> u8 {
    match alpha_mode {
        AlphaMode::None => 0,
        AlphaMode::Premultiplied => 1,
        // Inferred never survives construction.
        AlphaMode::Postmultiplied | AlphaMode::Inferred => 2,
    }
}

fn alpha_from_code(code: u8) -> Result<AlphaMode> {
    match code {
        0 => Ok(AlphaMode::None),
        1 => Ok(AlphaMode::Premultiplied),
        2 => Ok(AlphaMode::Postmultiplied),
        other => Err(IoError::malformed_header(format!(
            "unknown alpha mode code {other}"
        ))),
    }
}

/// Parsed header fields shared by probe and decode.
struct RawHeader {
    kind: SampleKind,
    color_space: ColorSpace,
    alpha_mode: AlphaMode,
    width: u32,
    height: u32,
    channels: u32,
}

impl RawHeader {
    fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(IoError::truncated_data(HEADER_LEN, bytes.len()));
        }
        if &bytes[0..4] != MAGIC {
            return Err(IoError::malformed_header("bad magic"));
        }
        if bytes[4] != VERSION {
            return Err(IoError::malformed_header(format!(
                "unsupported version {}",
                bytes[4]
            )));
        }
        let kind = kind_from_code(bytes[5])?;
        let alpha_mode = alpha_from_code(bytes[7])?;
        let width = LittleEndian::read_u32(&bytes[8..12]);
        let height = LittleEndian::read_u32(&bytes[12..16]);
        let channels = LittleEndian::read_u32(&bytes[16..20]);
        let gamma = LittleEndian::read_f32(&bytes[20..24]);
        let color_space = space_from_code(bytes[6], gamma)?;
        if width == 0 || height == 0 || channels == 0 {
            return Err(IoError::malformed_header(format!(
                "zero dimension: {width}x{height} with {channels} channels"
            )));
        }
        Ok(Self {
            kind,
            color_space,
            alpha_mode,
            width,
            height,
            channels,
        })
    }

    fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    /// The payload slice, length-checked against the header.
    fn payload<'a>(&self, bytes: &'a [u8]) -> Result<&'a [u8]> {
        let expected = self.sample_count() * (self.kind.bit_depth() as usize / 8);
        let payload = &bytes[HEADER_LEN..];
        if payload.len() < expected {
            return Err(IoError::truncated_data(expected, payload.len()));
        }
        Ok(&payload[..expected])
    }
}

fn decode_native(header: &RawHeader, payload: &[u8]) -> Result<DecodedImage> {
    let count = header.sample_count();
    let image = match header.kind {
        SampleKind::U8 => DecodedImage::U8(build_image(header, payload.to_vec())?),
        SampleKind::U16 => {
            let mut data = vec![0u16; count];
            LittleEndian::read_u16_into(payload, &mut data);
            DecodedImage::U16(build_image(header, data)?)
        }
        SampleKind::I8 => {
            let data: Vec<i8> = payload.iter().map(|&b| b as i8).collect();
            DecodedImage::I8(build_image(header, data)?)
        }
        SampleKind::I16 => {
            let mut data = vec![0i16; count];
            LittleEndian::read_i16_into(payload, &mut data);
            DecodedImage::I16(build_image(header, data)?)
        }
        SampleKind::F16 => {
            let mut bits = vec![0u16; count];
            LittleEndian::read_u16_into(payload, &mut bits);
            let data: Vec<f16> = bits.into_iter().map(f16::from_bits).collect();
            DecodedImage::F16(build_image(header, data)?)
        }
        SampleKind::F32 => {
            let mut data = vec![0.0f32; count];
            LittleEndian::read_f32_into(payload, &mut data);
            DecodedImage::F32(build_image(header, data)?)
        }
    };
    Ok(image)
}

fn build_image<T: Component>(header: &RawHeader, data: Vec<T>) -> Result<Image<T>> {
    Ok(Image::from_vec(
        data,
        header.width,
        header.height,
        header.channels,
        header.color_space,
        header.alpha_mode,
    )?)
}

impl PixelDecoder for RawCodec {
    fn name(&self) -> &str {
        "raw"
    }

    fn can_decode(&self, header: &[u8]) -> bool {
        header.len() >= 4 && &header[0..4] == MAGIC
    }

    fn probe(&self, bytes: &[u8]) -> Result<FileInfo> {
        let header = RawHeader::parse(bytes)?;
        Ok(FileInfo {
            width: header.width,
            height: header.height,
            channels: header.channels,
            bit_depth: header.kind.bit_depth(),
            is_signed: header.kind.is_signed(),
            is_float: header.kind.is_float(),
            color_space: header.color_space,
            alpha_mode: header.alpha_mode,
        })
    }

    fn decode(&self, bytes: &[u8], kind: SampleKind) -> Result<DecodedImage> {
        let header = RawHeader::parse(bytes)?;
        let payload = header.payload(bytes)?;
        let native = decode_native(&header, payload)?;
        Ok(native.convert_kind(kind))
    }
}

impl PixelEncoder for RawCodec {
    fn name(&self) -> &str {
        "raw"
    }

    fn encode(&self, image: &DecodedImage) -> Result<Vec<u8>> {
        let (space, gamma) = space_code(image.color_space())?;
        let mut out = Vec::with_capacity(HEADER_LEN + image.as_bytes().len());
        out.extend_from_slice(MAGIC);
        out.push(VERSION);
        out.push(kind_code(image.kind()));
        out.push(space);
        out.push(alpha_code(image.alpha_mode()));
        out.write_u32::<LittleEndian>(image.width())?;
        out.write_u32::<LittleEndian>(image.height())?;
        out.write_u32::<LittleEndian>(image.channels())?;
        out.write_f32::<LittleEndian>(gamma)?;
        match image {
            DecodedImage::U8(img) => out.extend_from_slice(img.data()),
            DecodedImage::U16(img) => {
                for &v in img.data() {
                    out.write_u16::<LittleEndian>(v)?;
                }
            }
            DecodedImage::I8(img) => out.extend(img.data().iter().map(|&v| v as u8)),
            DecodedImage::I16(img) => {
                for &v in img.data() {
                    out.write_i16::<LittleEndian>(v)?;
                }
            }
            DecodedImage::F16(img) => {
                for &v in img.data() {
                    out.write_u16::<LittleEndian>(v.to_bits())?;
                }
            }
            DecodedImage::F32(img) => {
                for &v in img.data() {
                    out.write_f32::<LittleEndian>(v)?;
                }
            }
        }
        Ok(out)
    }
}
