//! Chromatic adaptation between white points.
//!
//! When two RGB spaces have different white points, converting between them
//! through XYZ needs an adaptation step so that white maps to white. The
//! Bradford transform is the standard choice.

use crate::{Mat3, Vec3};

/// Bradford cone response matrix.
///
/// # Reference
///
/// Lam, K.M. (1985). Metamerism and Colour Constancy.
pub const BRADFORD: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Inverse Bradford matrix.
pub const BRADFORD_INV: Mat3 = Mat3::from_rows([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// Computes a Bradford chromatic adaptation matrix between two white points.
///
/// The resulting matrix transforms XYZ values referenced to `src_white` into
/// XYZ values referenced to `dst_white`.
///
/// # Example
///
/// ```rust
/// use raster_math::{bradford_adaptation, xy_to_xyz, D65_XY, D60_XY};
///
/// let d65 = xy_to_xyz(D65_XY.0, D65_XY.1);
/// let d60 = xy_to_xyz(D60_XY.0, D60_XY.1);
/// let m = bradford_adaptation(d65, d60);
/// let adapted = m * d65;
/// assert!((adapted.x - d60.x).abs() < 1e-3);
/// ```
pub fn bradford_adaptation(src_white: Vec3, dst_white: Vec3) -> Mat3 {
    let src_cone = BRADFORD * src_white;
    let dst_cone = BRADFORD * dst_white;

    let scale = Mat3::diagonal(
        dst_cone.x / src_cone.x,
        dst_cone.y / src_cone.y,
        dst_cone.z / src_cone.z,
    );

    BRADFORD_INV * scale * BRADFORD
}
