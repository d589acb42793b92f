//! Component types and exact fixed-point <-> float conversion.
//!
//! Every color-space and alpha-mode conversion for fixed-point buffers is
//! defined in terms of the rules here, so they are load-bearing:
//!
//! - **unorm** (`u8`, `u16`): `float = int / MAX`. The inverse clamps to
//!   [0, 1] (NaN maps to 0), scales by `MAX`, and rounds half away from zero
//!   by adding 0.5 before truncation.
//! - **snorm** (`i8`, `i16`): the scale is the *positive* maximum, so +1.0
//!   and -1.0 are both exactly representable. The integer minimum is a
//!   special case decoding to exactly -1.0; re-encoding -1.0 yields the
//!   positive-max-scaled value (e.g. -127 for `i8`), the one fixed-point
//!   input whose round-trip is not bit-identical.
//! - **float** (`f16`, `f32`): pass-through.
//!
//! # Dependencies
//!
//! - [`half`] - `f16` support

use half::f16;

/// A pixel component type.
///
/// Implemented for `u8`, `u16`, `i8`, `i16`, [`f16`] and `f32`. Conversions
/// to and from `f32` follow the exact unorm/snorm rules in the module
/// documentation; for all fixed-point values other than the signed integer
/// minimum, `from_f32(to_f32(v)) == v` holds exactly.
pub trait Component: Copy + Default + PartialOrd + Send + Sync + 'static {
    /// Number of bits per component.
    const BITS: u32;

    /// Whether this is a floating-point encoding.
    const IS_FLOAT: bool;

    /// Whether this is a signed encoding.
    const IS_SIGNED: bool;

    /// Decodes to `f32` (normalized for fixed-point encodings).
    fn to_f32(self) -> f32;

    /// Encodes from `f32` (clamping and rounding for fixed-point encodings).
    fn from_f32(v: f32) -> Self;

    /// The zero value.
    fn zero() -> Self;

    /// The value representing 1.0.
    fn one() -> Self;

    /// Linear interpolation through `f32`.
    #[inline]
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::from_f32(a.to_f32() * (1.0 - t) + b.to_f32() * t)
    }

    /// Reinterprets a slice as raw `u8` components, if this type is the
    /// 8-bit unsigned encoding.
    ///
    /// This is the hook the lookup-table fast paths use to specialize
    /// without any dynamic type identity.
    #[inline]
    fn as_u8_slice(_data: &[Self]) -> Option<&[u8]> {
        None
    }

    /// Mutable variant of [`Component::as_u8_slice`].
    #[inline]
    fn as_u8_slice_mut(_data: &mut [Self]) -> Option<&mut [u8]> {
        None
    }
}

/// Rounds a non-negative scaled value half away from zero by truncation.
#[inline]
fn round_unorm(scaled: f32) -> f32 {
    scaled + 0.5
}

/// Rounds a scaled value half away from zero, preserving sign.
#[inline]
fn round_snorm(scaled: f32) -> f32 {
    if scaled >= 0.0 {
        scaled + 0.5
    } else {
        scaled - 0.5
    }
}

impl Component for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;
    const IS_SIGNED: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        round_unorm(v * 255.0) as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        255
    }

    #[inline]
    fn as_u8_slice(data: &[Self]) -> Option<&[u8]> {
        Some(data)
    }

    #[inline]
    fn as_u8_slice_mut(data: &mut [Self]) -> Option<&mut [u8]> {
        Some(data)
    }
}

impl Component for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;
    const IS_SIGNED: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        round_unorm(v * 65535.0) as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        65535
    }
}

impl Component for i8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;
    const IS_SIGNED: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        if self == i8::MIN {
            -1.0
        } else {
            self as f32 / 127.0
        }
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        let v = if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        round_snorm(v * 127.0) as i8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        127
    }
}

impl Component for i16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;
    const IS_SIGNED: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        if self == i16::MIN {
            -1.0
        } else {
            self as f32 / 32767.0
        }
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        let v = if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        round_snorm(v * 32767.0) as i16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        32767
    }
}

impl Component for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;
    const IS_SIGNED: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        f16::ONE
    }
}

impl Component for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;
    const IS_SIGNED: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unorm8_roundtrip_exact() {
        for v in 0..=u8::MAX {
            assert_eq!(u8::from_f32(v.to_f32()), v);
        }
    }

    #[test]
    fn test_unorm16_roundtrip_exact() {
        for v in 0..=u16::MAX {
            assert_eq!(u16::from_f32(v.to_f32()), v);
        }
    }

    #[test]
    fn test_snorm8_roundtrip_exact_above_min() {
        for v in (i8::MIN + 1)..=i8::MAX {
            assert_eq!(i8::from_f32(v.to_f32()), v);
        }
    }

    #[test]
    fn test_snorm16_roundtrip_exact_above_min() {
        for v in (i16::MIN + 1)..=i16::MAX {
            assert_eq!(i16::from_f32(v.to_f32()), v);
        }
    }

    #[test]
    fn test_snorm_min_decodes_to_negative_one() {
        assert_eq!(i8::MIN.to_f32(), -1.0);
        assert_eq!(i16::MIN.to_f32(), -1.0);
        // The one documented non-identity round-trip: -1.0 re-encodes to
        // the positive-max-scaled value.
        assert_eq!(i8::from_f32(-1.0), -127);
        assert_eq!(i16::from_f32(-1.0), -32767);
    }

    #[test]
    fn test_unorm_clamps_and_maps_nan_to_zero() {
        assert_eq!(u8::from_f32(f32::NAN), 0);
        assert_eq!(u8::from_f32(-0.5), 0);
        assert_eq!(u8::from_f32(2.0), 255);
        assert_eq!(u16::from_f32(f32::NAN), 0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 0.5 * 255 = 127.5 rounds away from zero to 128.
        assert_eq!(u8::from_f32(0.5), 128);
        // -0.5 * 127 = -63.5 rounds away from zero to -64.
        assert_eq!(i8::from_f32(-0.5), -64);
    }

    #[test]
    fn test_snorm_extremes_exact() {
        assert_eq!(i8::from_f32(1.0), 127);
        assert_eq!(i8::MAX.to_f32(), 1.0);
        assert_eq!(i16::from_f32(1.0), 32767);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(u8::lerp(10, 200, 0.0), 10);
        assert_eq!(u8::lerp(10, 200, 1.0), 200);
        // Encoded midpoint 127.5 rounds away from zero.
        assert_eq!(u8::lerp(0, 255, 0.5), 128);
        assert_eq!(i16::lerp(-32767, 32767, 0.5), 0);
        assert_eq!(f32::lerp(1.0, 3.0, 0.25), 1.5);
    }

    #[test]
    fn test_float_passthrough() {
        assert_eq!(0.25f32.to_f32(), 0.25);
        assert_eq!(f32::from_f32(-3.5), -3.5);
        let h = f16::from_f32(0.5);
        assert_eq!(h.to_f32(), 0.5);
    }

    #[test]
    fn test_u8_slice_hook() {
        let mut data = [0u8, 1, 2];
        assert!(<u8 as Component>::as_u8_slice(&data).is_some());
        assert!(<u8 as Component>::as_u8_slice_mut(&mut data).is_some());
        let data16 = [0u16; 3];
        assert!(<u16 as Component>::as_u8_slice(&data16).is_none());
    }
}
