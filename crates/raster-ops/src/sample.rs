//! Point sampling with per-axis wrap modes.
//!
//! Sample coordinates are in pixel space: the center of texel `(0, 0)` is at
//! `(0.5, 0.5)`. Both filters resolve out-of-range taps per axis through a
//! [`WrapMode`], so the two axes can wrap differently (tiling in x while
//! clamping in y is common for environment strips).
//!
//! Bicubic is a cubic B-spline evaluated as four weighted bilinear taps
//! rather than sixteen texel fetches; the hardware-style offset trick gives
//! the same result because bilinear interpolation is itself linear.

use raster_core::{Component, Image};

use crate::error::{OpsError, Result};

/// How an out-of-range tap coordinate is resolved, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Out-of-range taps read the caller-supplied border value.
    Zero,
    /// Coordinates wrap modulo the image size (tiling).
    Wrap,
    /// Coordinates reflect off the edges (mirror tiling).
    Reflect,
    /// Coordinates clamp to the edge texel.
    Clamp,
}

/// The reconstruction filter used by [`sample_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFilter {
    /// Four-texel bilinear blend.
    Bilinear,
    /// Cubic B-spline, evaluated as four bilinear taps.
    Bicubic,
}

/// Resolves an integer tap coordinate against one axis.
///
/// `None` means the tap falls outside and the border value applies
/// ([`WrapMode::Zero`] only; every other mode maps into range).
#[inline]
fn resolve(i: i64, size: u32, wrap: WrapMode) -> Option<u32> {
    let n = size as i64;
    match wrap {
        WrapMode::Zero => (0..n).contains(&i).then_some(i as u32),
        WrapMode::Wrap => Some(i.rem_euclid(n) as u32),
        WrapMode::Reflect => {
            let m = i.rem_euclid(2 * n);
            let m = if m >= n { 2 * n - 1 - m } else { m };
            Some(m as u32)
        }
        WrapMode::Clamp => Some(i.clamp(0, n - 1) as u32),
    }
}

/// Accumulates `weight` times the bilinear sample at `(x, y)` into `out`.
fn bilinear_accumulate<T: Component>(
    image: &Image<T>,
    x: f32,
    y: f32,
    wrap_x: WrapMode,
    wrap_y: WrapMode,
    border: f32,
    weight: f32,
    out: &mut [f32],
) {
    // Texel centers sit at half-integer coordinates.
    let sx = x - 0.5;
    let sy = y - 0.5;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let x0 = x0 as i64;
    let y0 = y0 as i64;

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];
    for (tx, ty, w) in taps {
        if w == 0.0 {
            continue;
        }
        let w = w * weight;
        match (
            resolve(tx, image.width(), wrap_x),
            resolve(ty, image.height(), wrap_y),
        ) {
            (Some(px), Some(py)) => {
                for (acc, &v) in out.iter_mut().zip(image.pixel(px, py)) {
                    *acc += w * v.to_f32();
                }
            }
            _ => {
                for acc in out.iter_mut() {
                    *acc += w * border;
                }
            }
        }
    }
}

/// Cubic B-spline basis weights for fractional position `t`.
#[inline]
fn bspline_weights(t: f32) -> [f32; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        (1.0 - t).powi(3) / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ]
}

/// Per-axis bicubic reduction to two bilinear tap positions and weights.
///
/// Returns `(coord0, coord1, weight0, weight1)` in sample space (half-texel
/// offset restored, since the bilinear stage subtracts it again).
#[inline]
fn bicubic_axis(coord: f32) -> (f32, f32, f32, f32) {
    let s = coord - 0.5;
    let base = s.floor();
    let [w0, w1, w2, w3] = bspline_weights(s - base);
    let g0 = w0 + w1;
    let g1 = w2 + w3;
    let h0 = base - 1.0 + w1 / g0 + 0.5;
    let h1 = base + 1.0 + w3 / g1 + 0.5;
    (h0, h1, g0, g1)
}

/// Samples the image at `(x, y)`, writing one `f32` per channel into `out`.
///
/// Channel values are the raw stored values decoded to `f32`; no
/// color-space or alpha handling happens here (resize owns that policy).
/// `out` must have exactly `image.channels()` elements.
pub fn sample_into<T: Component>(
    image: &Image<T>,
    x: f32,
    y: f32,
    filter: SampleFilter,
    wrap_x: WrapMode,
    wrap_y: WrapMode,
    border: f32,
    out: &mut [f32],
) -> Result<()> {
    let channels = image.channels() as usize;
    if out.len() != channels {
        return Err(OpsError::output_length_mismatch(channels, out.len()));
    }
    out.fill(0.0);
    match filter {
        SampleFilter::Bilinear => {
            bilinear_accumulate(image, x, y, wrap_x, wrap_y, border, 1.0, out);
        }
        SampleFilter::Bicubic => {
            let (hx0, hx1, gx0, gx1) = bicubic_axis(x);
            let (hy0, hy1, gy0, gy1) = bicubic_axis(y);
            bilinear_accumulate(image, hx0, hy0, wrap_x, wrap_y, border, gx0 * gy0, out);
            bilinear_accumulate(image, hx1, hy0, wrap_x, wrap_y, border, gx1 * gy0, out);
            bilinear_accumulate(image, hx0, hy1, wrap_x, wrap_y, border, gx0 * gy1, out);
            bilinear_accumulate(image, hx1, hy1, wrap_x, wrap_y, border, gx1 * gy1, out);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use raster_core::{AlphaMode, ColorSpace};

    fn two_by_two() -> Image<f32> {
        // Texels: (0,0)=0.0, (1,0)=0.25, (0,1)=0.5, (1,1)=0.75
        Image::from_vec(
            vec![0.0, 0.25, 0.5, 0.75],
            2,
            2,
            1,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap()
    }

    fn sample1(
        image: &Image<f32>,
        x: f32,
        y: f32,
        filter: SampleFilter,
        wrap: WrapMode,
    ) -> f32 {
        let mut out = [0.0f32];
        sample_into(image, x, y, filter, wrap, wrap, 0.0, &mut out).unwrap();
        out[0]
    }

    #[test]
    fn test_texel_center_is_exact() {
        let img = two_by_two();
        assert_eq!(sample1(&img, 0.5, 0.5, SampleFilter::Bilinear, WrapMode::Clamp), 0.0);
        assert_eq!(sample1(&img, 1.5, 1.5, SampleFilter::Bilinear, WrapMode::Clamp), 0.75);
    }

    #[test]
    fn test_midpoint_blends_equally() {
        let img = two_by_two();
        let v = sample1(&img, 1.0, 1.0, SampleFilter::Bilinear, WrapMode::Clamp);
        assert_relative_eq!(v, (0.0 + 0.25 + 0.5 + 0.75) / 4.0);
    }

    #[test]
    fn test_wrap_reads_opposite_edge() {
        let img = two_by_two();
        // (-0.5, -0.5) lands a full texel left/up of (0, 0); wrapping the
        // tap index -1 on a size-2 axis reads index 1, so texel (1, 1).
        let v = sample1(&img, -0.5, -0.5, SampleFilter::Bilinear, WrapMode::Wrap);
        assert_eq!(v, 0.75);
    }

    #[test]
    fn test_clamp_replicates_edge() {
        let img = two_by_two();
        let v = sample1(&img, -5.0, 0.5, SampleFilter::Bilinear, WrapMode::Clamp);
        assert_eq!(v, 0.0);
        let v = sample1(&img, 10.0, 1.5, SampleFilter::Bilinear, WrapMode::Clamp);
        assert_eq!(v, 0.75);
    }

    #[test]
    fn test_zero_mode_uses_border_value() {
        let img = two_by_two();
        let mut out = [0.0f32];
        sample_into(
            &img,
            -0.5,
            0.5,
            SampleFilter::Bilinear,
            WrapMode::Zero,
            WrapMode::Zero,
            9.0,
            &mut out,
        )
        .unwrap();
        // Tap index -1 is out of range in x; the sample is the border value.
        assert_eq!(out[0], 9.0);
    }

    #[test]
    fn test_reflect_folds_index() {
        // Size 3, indices reflect as 0 1 2 2 1 0 ...
        assert_eq!(resolve(3, 3, WrapMode::Reflect), Some(2));
        assert_eq!(resolve(4, 3, WrapMode::Reflect), Some(1));
        assert_eq!(resolve(5, 3, WrapMode::Reflect), Some(0));
        assert_eq!(resolve(-1, 3, WrapMode::Reflect), Some(0));
        assert_eq!(resolve(-2, 3, WrapMode::Reflect), Some(1));
    }

    #[test]
    fn test_wrap_modulo() {
        assert_eq!(resolve(-1, 4, WrapMode::Wrap), Some(3));
        assert_eq!(resolve(4, 4, WrapMode::Wrap), Some(0));
        assert_eq!(resolve(-5, 4, WrapMode::Wrap), Some(3));
    }

    #[test]
    fn test_bspline_weights_partition_unity() {
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            let sum: f32 = bspline_weights(t).iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_bicubic_constant_image_is_constant() {
        let img = Image::from_vec(
            vec![0.3f32; 16],
            4,
            4,
            1,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        for &(x, y) in &[(0.7, 1.3), (2.0, 2.0), (3.9, 0.1)] {
            let v = sample1(&img, x, y, SampleFilter::Bicubic, WrapMode::Clamp);
            assert_relative_eq!(v, 0.3, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_bicubic_smooths_toward_neighbors() {
        let img = two_by_two();
        // At the texel center a B-spline does not interpolate; it pulls the
        // value toward the neighborhood average.
        let v = sample1(&img, 0.5, 0.5, SampleFilter::Bicubic, WrapMode::Clamp);
        assert!(v > 0.0 && v < 0.375);
    }

    #[test]
    fn test_output_length_checked() {
        let img = two_by_two();
        let mut out = [0.0f32; 3];
        let err = sample_into(
            &img,
            0.5,
            0.5,
            SampleFilter::Bilinear,
            WrapMode::Clamp,
            WrapMode::Clamp,
            0.0,
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, OpsError::OutputLengthMismatch { expected: 1, got: 3 }));
    }

    #[test]
    fn test_per_axis_wrap_modes() {
        let img = two_by_two();
        let mut out = [0.0f32];
        // Wrap in x, clamp in y: (-0.5, 0.5) wraps x tap -1 to 1, clamps y.
        sample_into(
            &img,
            -0.5,
            0.5,
            SampleFilter::Bilinear,
            WrapMode::Wrap,
            WrapMode::Clamp,
            0.0,
            &mut out,
        )
        .unwrap();
        assert_eq!(out[0], 0.25);
    }
}
