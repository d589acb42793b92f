//! Runtime color-space model and per-channel transfer functions.
//!
//! Unlike type-level color-space markers, this model is a runtime value:
//! decoders report spaces at runtime, and equality is defined *after*
//! canonicalization ("flattening"), which is a runtime property. A
//! [`ColorSpace::Cie`] value whose chromaticities match sRGB and whose
//! transfer function matches linear/sRGB/a power curve compares equal to the
//! corresponding named variant. Two in-memory descriptions of the physically
//! same space must never be treated as requiring conversion.
//!
//! # Transfer functions
//!
//! - `Undefined`: identity in both directions. This is deliberate "assume
//!   the data is already correct, do not touch" behavior, not an error.
//! - `Srgb`: IEC 61966-2-1 piecewise curve (linear segment below a small
//!   threshold, offset power segment above it).
//! - `LinearSrgb`: identity.
//! - `GammaSrgb(g)`: pure power curve, sign-preserving.
//! - `Cie`: its own [`TransferFunction`] scalar part; gamut differences are
//!   handled at the image level (see [`crate::convert`]).

use raster_math::Chromaticities;

/// Tolerance for deciding two chromaticity sets describe the same gamut.
pub const CHROMATICITY_EPSILON: f32 = 1e-5;

/// sRGB EOTF: decodes an encoded value to linear light.
#[inline]
pub fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: encodes linear light to an sRGB value.
#[inline]
pub fn linear_to_srgb(l: f32) -> f32 {
    if l <= 0.003_130_8 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}

/// Sign-preserving power curve.
#[inline]
fn powf_signed(v: f32, exponent: f32) -> f32 {
    v.abs().powf(exponent).copysign(v)
}

/// The scalar (per-channel) transfer function of a CIE-described space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    /// Identity: values are linear light.
    Linear,
    /// The sRGB piecewise curve.
    Srgb,
    /// A pure power curve with the given gamma.
    Power(f32),
}

impl TransferFunction {
    /// Decodes an encoded value to linear light.
    #[inline]
    pub fn to_linear(self, v: f32) -> f32 {
        match self {
            TransferFunction::Linear => v,
            TransferFunction::Srgb => srgb_to_linear(v),
            TransferFunction::Power(g) => powf_signed(v, g),
        }
    }

    /// Encodes linear light.
    #[inline]
    pub fn from_linear(self, l: f32) -> f32 {
        match self {
            TransferFunction::Linear => l,
            TransferFunction::Srgb => linear_to_srgb(l),
            TransferFunction::Power(g) => powf_signed(l, 1.0 / g),
        }
    }

    /// Collapses `Power(1.0)` to `Linear`.
    #[inline]
    pub fn canonical(self) -> Self {
        match self {
            TransferFunction::Power(g) if g == 1.0 => TransferFunction::Linear,
            other => other,
        }
    }
}

/// Describes how the stored channel values map to colorimetry.
///
/// # Example
///
/// ```rust
/// use raster_core::{ColorSpace, TransferFunction};
/// use raster_math::SRGB;
///
/// // A CIE description of sRGB flattens to the named variant.
/// let cie = ColorSpace::Cie {
///     chromaticities: SRGB,
///     transfer: TransferFunction::Srgb,
/// };
/// assert_eq!(cie, ColorSpace::Srgb);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum ColorSpace {
    /// No color-space information. Conversion to or from `Undefined` is an
    /// intentional no-op passthrough (see module docs), not an error.
    Undefined,
    /// sRGB primaries, D65 white, sRGB piecewise transfer.
    Srgb,
    /// sRGB primaries, D65 white, linear transfer.
    LinearSrgb,
    /// sRGB primaries, D65 white, pure power transfer.
    GammaSrgb(f32),
    /// Arbitrary primaries/white point with an explicit transfer function.
    Cie {
        /// The gamut: primaries and white point as CIE xy coordinates.
        chromaticities: Chromaticities,
        /// The per-channel transfer function.
        transfer: TransferFunction,
    },
}

impl ColorSpace {
    /// Returns the canonical ("flattened") form of this color space.
    ///
    /// CIE descriptions of sRGB-primaried spaces collapse to the named
    /// variants; `Power(1.0)` collapses to linear. Equality, hashing, and
    /// conversion identity checks all operate on this form.
    pub fn canonical(self) -> ColorSpace {
        match self {
            ColorSpace::GammaSrgb(g) if g == 1.0 => ColorSpace::LinearSrgb,
            ColorSpace::Cie {
                chromaticities,
                transfer,
            } => {
                let transfer = transfer.canonical();
                if chromaticities.approx_eq(&raster_math::SRGB, CHROMATICITY_EPSILON) {
                    match transfer {
                        TransferFunction::Linear => ColorSpace::LinearSrgb,
                        TransferFunction::Srgb => ColorSpace::Srgb,
                        TransferFunction::Power(g) => ColorSpace::GammaSrgb(g).canonical(),
                    }
                } else {
                    ColorSpace::Cie {
                        chromaticities,
                        transfer,
                    }
                }
            }
            other => other,
        }
    }

    /// Whether the stored values are linear light.
    #[inline]
    pub fn is_linear(self) -> bool {
        matches!(
            self.canonical(),
            ColorSpace::LinearSrgb
                | ColorSpace::Cie {
                    transfer: TransferFunction::Linear,
                    ..
                }
        )
    }

    /// The gamut of this space, if it has colorimetric meaning.
    ///
    /// Named variants report sRGB primaries; `Undefined` has none.
    pub fn chromaticities(self) -> Option<Chromaticities> {
        match self {
            ColorSpace::Undefined => None,
            ColorSpace::Srgb | ColorSpace::LinearSrgb | ColorSpace::GammaSrgb(_) => {
                Some(raster_math::SRGB)
            }
            ColorSpace::Cie { chromaticities, .. } => Some(chromaticities),
        }
    }

    /// Decodes an encoded channel value to linear light.
    #[inline]
    pub fn to_linear(self, v: f32) -> f32 {
        match self {
            // Intentional no-op: Undefined means "assume already correct".
            ColorSpace::Undefined => v,
            ColorSpace::Srgb => srgb_to_linear(v),
            ColorSpace::LinearSrgb => v,
            ColorSpace::GammaSrgb(g) => powf_signed(v, g),
            ColorSpace::Cie { transfer, .. } => transfer.to_linear(v),
        }
    }

    /// Encodes linear light into this space.
    #[inline]
    pub fn from_linear(self, l: f32) -> f32 {
        match self {
            // Intentional no-op: Undefined means "assume already correct".
            ColorSpace::Undefined => l,
            ColorSpace::Srgb => linear_to_srgb(l),
            ColorSpace::LinearSrgb => l,
            ColorSpace::GammaSrgb(g) => powf_signed(l, 1.0 / g),
            ColorSpace::Cie { transfer, .. } => transfer.from_linear(l),
        }
    }
}

impl PartialEq for ColorSpace {
    fn eq(&self, other: &Self) -> bool {
        match (self.canonical(), other.canonical()) {
            (ColorSpace::Undefined, ColorSpace::Undefined) => true,
            (ColorSpace::Srgb, ColorSpace::Srgb) => true,
            (ColorSpace::LinearSrgb, ColorSpace::LinearSrgb) => true,
            (ColorSpace::GammaSrgb(a), ColorSpace::GammaSrgb(b)) => a == b,
            (
                ColorSpace::Cie {
                    chromaticities: ca,
                    transfer: ta,
                },
                ColorSpace::Cie {
                    chromaticities: cb,
                    transfer: tb,
                },
            ) => ca.approx_eq(&cb, CHROMATICITY_EPSILON) && ta == tb,
            _ => false,
        }
    }
}

impl std::hash::Hash for ColorSpace {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Hash the canonical discriminant only. CIE chromaticities compare
        // with a tolerance, so they cannot contribute to the hash without
        // breaking the Eq/Hash contract; colliding all CIE spaces is fine.
        match self.canonical() {
            ColorSpace::Undefined => 0u8.hash(state),
            ColorSpace::Srgb => 1u8.hash(state),
            ColorSpace::LinearSrgb => 2u8.hash(state),
            ColorSpace::GammaSrgb(g) => {
                3u8.hash(state);
                g.to_bits().hash(state);
            }
            ColorSpace::Cie { .. } => 4u8.hash(state),
        }
    }
}

/// Converts one channel value between color spaces.
///
/// Identity when the spaces are canonically equal, otherwise decode to
/// linear light and re-encode. Gamut (primaries) differences are an
/// image-level concern; this is only the scalar transfer part.
#[inline]
pub fn convert_scalar(v: f32, from: ColorSpace, to: ColorSpace) -> f32 {
    if from == to {
        v
    } else {
        to.from_linear(from.to_linear(v))
    }
}
