//! Lazily built 8-bit lookup tables.
//!
//! 8-bit buffers are the dominant case for the expensive per-component
//! operations, and with only 256 (or 256x256) possible inputs the exact
//! scalar result can be tabulated once and reused. Tables are built on
//! first use behind [`OnceLock`] and each entry is computed with the same
//! scalar code the generic path uses, so the fast path is bit-identical to
//! the slow path by construction.
//!
//! Tables exist for the named sRGB transfer in both directions and for
//! linear-light alpha premultiplication/unpremultiplication under the sRGB
//! and identity transfers. Anything else falls back to scalar math.

use std::sync::OnceLock;

use crate::colorspace::ColorSpace;
use crate::component::Component;

/// A 2D table indexed as `lut[alpha][color]`.
pub type AlphaLut = [[u8; 256]; 256];

static SRGB_TO_LINEAR_U8: OnceLock<[u8; 256]> = OnceLock::new();
static LINEAR_TO_SRGB_U8: OnceLock<[u8; 256]> = OnceLock::new();

static PREMUL_LINEAR: OnceLock<Box<AlphaLut>> = OnceLock::new();
static UNPREMUL_LINEAR: OnceLock<Box<AlphaLut>> = OnceLock::new();
static PREMUL_SRGB: OnceLock<Box<AlphaLut>> = OnceLock::new();
static UNPREMUL_SRGB: OnceLock<Box<AlphaLut>> = OnceLock::new();

/// Minimum alpha treated as nonzero when unpremultiplying.
const UNPREMUL_ALPHA_EPSILON: f32 = 1e-6;

fn build_transfer_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = u8::from_f32(f((i as u8).to_f32()));
    }
    table
}

fn build_alpha_lut(f: impl Fn(f32, f32) -> f32) -> Box<AlphaLut> {
    let mut table: Box<AlphaLut> = Box::new([[0u8; 256]; 256]);
    for alpha in 0..256usize {
        let a = (alpha as u8).to_f32();
        for color in 0..256usize {
            table[alpha][color] = u8::from_f32(f((color as u8).to_f32(), a));
        }
    }
    table
}

/// Multiplies a color value by alpha in linear light.
#[inline]
pub fn premultiply_scalar(color: f32, alpha: f32, color_space: ColorSpace) -> f32 {
    color_space.from_linear(color_space.to_linear(color) * alpha)
}

/// Divides a color value by alpha in linear light.
///
/// Alpha is clamped to a minimal positive epsilon and the quotient to
/// [0, 1], so nonzero color at (near-)zero alpha saturates to one; there is
/// no color information to recover from a fully transparent pixel.
#[inline]
pub fn unpremultiply_scalar(color: f32, alpha: f32, color_space: ColorSpace) -> f32 {
    let alpha = alpha.max(UNPREMUL_ALPHA_EPSILON);
    color_space.from_linear((color_space.to_linear(color) / alpha).clamp(0.0, 1.0))
}

/// The 8-bit table converting between the named sRGB and linear-sRGB
/// transfers, if one exists for the given pair.
pub fn transfer_lut_u8(from: ColorSpace, to: ColorSpace) -> Option<&'static [u8; 256]> {
    match (from.canonical(), to.canonical()) {
        (ColorSpace::Srgb, ColorSpace::LinearSrgb) => Some(
            SRGB_TO_LINEAR_U8.get_or_init(|| build_transfer_lut(crate::colorspace::srgb_to_linear)),
        ),
        (ColorSpace::LinearSrgb, ColorSpace::Srgb) => Some(
            LINEAR_TO_SRGB_U8.get_or_init(|| build_transfer_lut(crate::colorspace::linear_to_srgb)),
        ),
        _ => None,
    }
}

/// Whether 8-bit alpha tables apply to this color space, and with which
/// transfer. `Undefined` shares the identity-transfer tables.
fn alpha_lut_space(color_space: ColorSpace) -> Option<ColorSpace> {
    match color_space.canonical() {
        ColorSpace::Srgb => Some(ColorSpace::Srgb),
        ColorSpace::LinearSrgb | ColorSpace::Undefined => Some(ColorSpace::LinearSrgb),
        _ => None,
    }
}

/// The 8-bit premultiplication table for this color space, if one exists.
pub fn premultiply_lut_u8(color_space: ColorSpace) -> Option<&'static AlphaLut> {
    let space = alpha_lut_space(color_space)?;
    let lut = match space {
        ColorSpace::Srgb => {
            PREMUL_SRGB.get_or_init(|| build_alpha_lut(|c, a| premultiply_scalar(c, a, space)))
        }
        _ => PREMUL_LINEAR.get_or_init(|| build_alpha_lut(|c, a| premultiply_scalar(c, a, space))),
    };
    Some(lut)
}

/// The 8-bit unpremultiplication table for this color space, if one exists.
pub fn unpremultiply_lut_u8(color_space: ColorSpace) -> Option<&'static AlphaLut> {
    let space = alpha_lut_space(color_space)?;
    let lut = match space {
        ColorSpace::Srgb => {
            UNPREMUL_SRGB.get_or_init(|| build_alpha_lut(|c, a| unpremultiply_scalar(c, a, space)))
        }
        _ => {
            UNPREMUL_LINEAR.get_or_init(|| build_alpha_lut(|c, a| unpremultiply_scalar(c, a, space)))
        }
    };
    Some(lut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_lut_matches_scalar_exhaustively() {
        let to_linear = transfer_lut_u8(ColorSpace::Srgb, ColorSpace::LinearSrgb).unwrap();
        let from_linear = transfer_lut_u8(ColorSpace::LinearSrgb, ColorSpace::Srgb).unwrap();
        for v in 0..=u8::MAX {
            let expected = u8::from_f32(crate::colorspace::srgb_to_linear(v.to_f32()));
            assert_eq!(to_linear[v as usize], expected);
            let expected = u8::from_f32(crate::colorspace::linear_to_srgb(v.to_f32()));
            assert_eq!(from_linear[v as usize], expected);
        }
    }

    #[test]
    fn test_transfer_lut_only_for_srgb_pair() {
        assert!(transfer_lut_u8(ColorSpace::Srgb, ColorSpace::Srgb).is_none());
        assert!(transfer_lut_u8(ColorSpace::GammaSrgb(2.2), ColorSpace::LinearSrgb).is_none());
    }

    #[test]
    fn test_premultiply_luts_match_scalar_exhaustively() {
        for space in [ColorSpace::Srgb, ColorSpace::LinearSrgb] {
            let lut = premultiply_lut_u8(space).unwrap();
            for alpha in 0..=u8::MAX {
                for color in 0..=u8::MAX {
                    let expected = u8::from_f32(premultiply_scalar(
                        color.to_f32(),
                        alpha.to_f32(),
                        space,
                    ));
                    assert_eq!(
                        lut[alpha as usize][color as usize],
                        expected,
                        "{space:?} alpha {alpha} color {color}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_unpremultiply_luts_match_scalar_exhaustively() {
        for space in [ColorSpace::Srgb, ColorSpace::LinearSrgb] {
            let lut = unpremultiply_lut_u8(space).unwrap();
            for alpha in 0..=u8::MAX {
                for color in 0..=u8::MAX {
                    let expected = u8::from_f32(unpremultiply_scalar(
                        color.to_f32(),
                        alpha.to_f32(),
                        space,
                    ));
                    assert_eq!(
                        lut[alpha as usize][color as usize],
                        expected,
                        "{space:?} alpha {alpha} color {color}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_opaque_alpha_is_identity() {
        let lut = premultiply_lut_u8(ColorSpace::Srgb).unwrap();
        for v in 0..=u8::MAX {
            assert_eq!(lut[255][v as usize], v);
        }
    }

    #[test]
    fn test_zero_alpha_unpremultiply_saturates() {
        // Dividing by the clamped epsilon alpha drives every nonzero color
        // to the quotient clamp; zero stays zero.
        let lut = unpremultiply_lut_u8(ColorSpace::Srgb).unwrap();
        assert_eq!(lut[0][0], 0);
        for v in 1..=u8::MAX {
            assert_eq!(lut[0][v as usize], 255);
        }
    }

    #[test]
    fn test_undefined_shares_linear_tables() {
        let a = premultiply_lut_u8(ColorSpace::Undefined).unwrap();
        let b = premultiply_lut_u8(ColorSpace::LinearSrgb).unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_no_alpha_lut_for_power_gamma() {
        assert!(premultiply_lut_u8(ColorSpace::GammaSrgb(2.2)).is_none());
    }
}
