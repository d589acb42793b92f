//! CIE xy chromaticity coordinates and standard primary sets.
//!
//! A [`Chromaticities`] value describes the gamut of an RGB color space:
//! the xy coordinates of its three primaries plus its white point. Together
//! with a transfer function (owned by raster-core) this is everything needed
//! to convert between RGB spaces.

use crate::Vec3;

/// RGB primaries and white point as CIE xy chromaticity coordinates.
///
/// # Example
///
/// ```rust
/// use raster_math::{Chromaticities, SRGB};
///
/// let custom = Chromaticities {
///     r: (0.64, 0.33),
///     g: (0.30, 0.60),
///     b: (0.15, 0.06),
///     w: (0.3127, 0.3290),
/// };
/// assert!(custom.approx_eq(&SRGB, 1e-5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chromaticities {
    /// Red primary (x, y).
    pub r: (f32, f32),
    /// Green primary (x, y).
    pub g: (f32, f32),
    /// Blue primary (x, y).
    pub b: (f32, f32),
    /// White point (x, y).
    pub w: (f32, f32),
}

impl Chromaticities {
    /// White point as XYZ with Y = 1.
    #[inline]
    pub fn white_xyz(&self) -> Vec3 {
        xy_to_xyz(self.w.0, self.w.1)
    }

    /// Compares two chromaticity sets within `epsilon` per coordinate.
    ///
    /// Used by color-space canonicalization: two descriptions of the
    /// physically same gamut must never be treated as requiring conversion.
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        let pairs = [
            (self.r, other.r),
            (self.g, other.g),
            (self.b, other.b),
            (self.w, other.w),
        ];
        pairs.iter().all(|((ax, ay), (bx, by))| {
            (ax - bx).abs() <= epsilon && (ay - by).abs() <= epsilon
        })
    }
}

/// Converts an xy chromaticity coordinate to XYZ with Y = 1.
#[inline]
pub fn xy_to_xyz(x: f32, y: f32) -> Vec3 {
    Vec3::new(x / y, 1.0, (1.0 - x - y) / y)
}

// ============================================================================
// Standard White Points
// ============================================================================

/// D65 white point chromaticity (daylight, ~6500K).
pub const D65_XY: (f32, f32) = (0.31270, 0.32900);

/// D50 white point chromaticity (~5000K).
pub const D50_XY: (f32, f32) = (0.34567, 0.35850);

/// D60 white point chromaticity (~6000K, used by ACES).
pub const D60_XY: (f32, f32) = (0.32168, 0.33767);

/// DCI white point chromaticity (theatrical projection).
pub const DCI_XY: (f32, f32) = (0.31400, 0.35100);

// ============================================================================
// Standard Primary Sets
// ============================================================================

/// sRGB / Rec.709 primaries (D65 white point).
pub const SRGB: Chromaticities = Chromaticities {
    r: (0.6400, 0.3300),
    g: (0.3000, 0.6000),
    b: (0.1500, 0.0600),
    w: D65_XY,
};

/// Rec.2020 primaries (D65 white point).
pub const REC2020: Chromaticities = Chromaticities {
    r: (0.7080, 0.2920),
    g: (0.1700, 0.7970),
    b: (0.1310, 0.0460),
    w: D65_XY,
};

/// DCI-P3 primaries (DCI white point).
pub const DCI_P3: Chromaticities = Chromaticities {
    r: (0.6800, 0.3200),
    g: (0.2650, 0.6900),
    b: (0.1500, 0.0600),
    w: DCI_XY,
};

/// ACES AP0 primaries (D60 white point).
pub const ACES_AP0: Chromaticities = Chromaticities {
    r: (0.7347, 0.2653),
    g: (0.0000, 1.0000),
    b: (0.0001, -0.0770),
    w: D60_XY,
};

/// ACES AP1 primaries (D60 white point), used by ACEScg.
pub const ACES_AP1: Chromaticities = Chromaticities {
    r: (0.7130, 0.2930),
    g: (0.1650, 0.8300),
    b: (0.1280, 0.0440),
    w: D60_XY,
};
