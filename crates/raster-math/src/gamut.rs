//! RGB <-> XYZ matrix derivation and gamut conversion.
//!
//! The standard derivation: build the matrix of primary XYZ columns, solve
//! for the scale factors that make the white point come out right, and scale
//! the columns. Conversion between two RGB gamuts is then
//! `XYZ_to_dst * adapt * src_to_XYZ` concatenated into a single 3x3.

use crate::{bradford_adaptation, xy_to_xyz, Chromaticities, Mat3, Vec3};

/// Derives the RGB -> XYZ matrix for the given primaries.
///
/// The returned matrix maps linear RGB in the given gamut to CIE XYZ
/// referenced to the gamut's own white point.
///
/// # Example
///
/// ```rust
/// use raster_math::{rgb_to_xyz_matrix, Vec3, SRGB};
///
/// let m = rgb_to_xyz_matrix(&SRGB);
/// // Linear sRGB white maps to the D65 white point.
/// let white = m * Vec3::ONE;
/// assert!((white.y - 1.0).abs() < 1e-4);
/// ```
pub fn rgb_to_xyz_matrix(c: &Chromaticities) -> Mat3 {
    let r = xy_to_xyz(c.r.0, c.r.1);
    let g = xy_to_xyz(c.g.0, c.g.1);
    let b = xy_to_xyz(c.b.0, c.b.1);
    let white = c.white_xyz();

    let primaries = Mat3::from_cols(r, g, b);
    // Scale factors so that RGB (1,1,1) lands on the white point. A gamut
    // with collinear primaries has no valid matrix; fall back to identity
    // scaling rather than propagating NaN.
    let scale = primaries
        .inverse()
        .map(|inv| inv * white)
        .unwrap_or(Vec3::ONE);

    Mat3::from_cols(r * scale.x, g * scale.y, b * scale.z)
}

/// Derives the XYZ -> RGB matrix for the given primaries.
pub fn xyz_to_rgb_matrix(c: &Chromaticities) -> Mat3 {
    rgb_to_xyz_matrix(c).inverse().unwrap_or(Mat3::IDENTITY)
}

/// Builds the combined matrix converting linear RGB between two gamuts.
///
/// Passes through CIE XYZ, applying Bradford chromatic adaptation when the
/// white points differ.
///
/// # Example
///
/// ```rust
/// use raster_math::{gamut_conversion_matrix, Vec3, SRGB, REC2020};
///
/// let m = gamut_conversion_matrix(&SRGB, &REC2020);
/// // White stays white; both spaces are D65 so no adaptation is needed.
/// let white = m * Vec3::ONE;
/// assert!((white.x - 1.0).abs() < 1e-3);
/// ```
pub fn gamut_conversion_matrix(from: &Chromaticities, to: &Chromaticities) -> Mat3 {
    let to_xyz = rgb_to_xyz_matrix(from);
    let from_xyz = xyz_to_rgb_matrix(to);

    let src_white = from.white_xyz();
    let dst_white = to.white_xyz();
    let whites_match = (src_white.x - dst_white.x).abs() < 1e-5
        && (src_white.z - dst_white.z).abs() < 1e-5;

    if whites_match {
        from_xyz * to_xyz
    } else {
        from_xyz * bradford_adaptation(src_white, dst_white) * to_xyz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ACES_AP1, REC2020, SRGB};

    #[test]
    fn test_srgb_red_xyz() {
        // Linear sRGB red has the well-known XYZ coordinates.
        let m = rgb_to_xyz_matrix(&SRGB);
        let red = m * Vec3::new(1.0, 0.0, 0.0);
        assert!((red.x - 0.4124).abs() < 1e-3);
        assert!((red.y - 0.2126).abs() < 1e-3);
        assert!((red.z - 0.0193).abs() < 1e-3);
    }

    #[test]
    fn test_srgb_white_is_d65() {
        let m = rgb_to_xyz_matrix(&SRGB);
        let white = m * Vec3::ONE;
        let d65 = SRGB.white_xyz();
        assert!((white.x - d65.x).abs() < 1e-4);
        assert!((white.y - d65.y).abs() < 1e-4);
        assert!((white.z - d65.z).abs() < 1e-4);
    }

    #[test]
    fn test_gamut_conversion_identity() {
        let m = gamut_conversion_matrix(&SRGB, &SRGB);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((m.m[i][j] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_gamut_conversion_roundtrip() {
        // sRGB -> AP1 -> sRGB crosses both a gamut and a white point change.
        let forward = gamut_conversion_matrix(&SRGB, &ACES_AP1);
        let back = gamut_conversion_matrix(&ACES_AP1, &SRGB);
        let roundtrip = back * forward;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((roundtrip.m[i][j] - expected).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_white_preserved_across_gamuts() {
        let m = gamut_conversion_matrix(&SRGB, &REC2020);
        let white = m * Vec3::ONE;
        assert!((white.x - 1.0).abs() < 1e-3);
        assert!((white.y - 1.0).abs() < 1e-3);
        assert!((white.z - 1.0).abs() < 1e-3);
    }
}
