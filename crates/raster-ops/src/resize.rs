//! Filter-based resize with a color-managed processing policy.
//!
//! The numerical kernel is a separable two-pass resample (horizontal then
//! vertical) over `f32` planes. The [`resize`] entry point owns the
//! processing-space policy on top of it:
//!
//! - Non-linear images are linearized before filtering and re-encoded
//!   afterwards. Averaging encoded sRGB values darkens edges; filtering must
//!   happen in linear light.
//! - Postmultiplied alpha is premultiplied (in linear light) for filtering
//!   and unpremultiplied afterwards, so color does not bleed from fully
//!   transparent texels.
//! - `Undefined` and already-linear images filter as stored.
//!
//! The returned image carries the original color space and alpha mode.
//!
//! # Filters
//!
//! - [`Filter::Nearest`] - no interpolation (blocky)
//! - [`Filter::Bilinear`] - triangle kernel (smooth but soft)
//! - [`Filter::Bicubic`] - Mitchell-Netravali (sharper)
//! - [`Filter::Lanczos3`] - windowed sinc (best for downscaling)
//!
//! # Dependencies
//!
//! - [`raster-core`](raster_core) - image type and conversions
//! - [`tracing`] - debug events for the policy decisions
//! - [`rayon`] - row-parallel passes behind the `parallel` feature

use raster_core::{AlphaMode, ColorSpace, Component, Image, TransferFunction};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Resampling filter for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Nearest-neighbor (fastest, no interpolation).
    Nearest,
    /// Triangle kernel (smooth, fast).
    Bilinear,
    /// Mitchell-Netravali cubic (sharper than bilinear).
    #[default]
    Bicubic,
    /// Lanczos-3 windowed sinc (high quality, best for downscaling).
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Nearest => 0.5,
            Filter::Bilinear => 1.0,
            Filter::Bicubic => 2.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Nearest => nearest_weight(x),
            Filter::Bilinear => triangle_weight(x),
            Filter::Bicubic => mitchell_weight(x),
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

#[inline]
fn nearest_weight(x: f32) -> f32 {
    if x.abs() < 0.5 { 1.0 } else { 0.0 }
}

#[inline]
fn triangle_weight(x: f32) -> f32 {
    let ax = x.abs();
    if ax < 1.0 { 1.0 - ax } else { 0.0 }
}

/// Mitchell-Netravali with B = C = 1/3.
#[inline]
fn mitchell_weight(x: f32) -> f32 {
    const B: f32 = 1.0 / 3.0;
    const C: f32 = 1.0 / 3.0;

    let ax = x.abs();
    if ax < 1.0 {
        ((12.0 - 9.0 * B - 6.0 * C) * ax * ax * ax
            + (-18.0 + 12.0 * B + 6.0 * C) * ax * ax
            + (6.0 - 2.0 * B))
            / 6.0
    } else if ax < 2.0 {
        ((-B - 6.0 * C) * ax * ax * ax
            + (6.0 * B + 30.0 * C) * ax * ax
            + (-12.0 * B - 48.0 * C) * ax
            + (8.0 * B + 24.0 * C))
            / 6.0
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// The linear-transfer space an image should be filtered in, if it is not
/// already linear (or has no color-space meaning at all).
fn linear_counterpart(color_space: ColorSpace) -> Option<ColorSpace> {
    match color_space.canonical() {
        ColorSpace::Undefined | ColorSpace::LinearSrgb => None,
        ColorSpace::Srgb | ColorSpace::GammaSrgb(_) => Some(ColorSpace::LinearSrgb),
        ColorSpace::Cie {
            chromaticities,
            transfer,
        } => match transfer {
            TransferFunction::Linear => None,
            _ => Some(ColorSpace::Cie {
                chromaticities,
                transfer: TransferFunction::Linear,
            }),
        },
    }
}

/// Resizes an image to `dst_w` x `dst_h`.
///
/// Filtering happens in linear light over premultiplied `f32` data (see the
/// module docs for the exact policy); the result is converted back and
/// carries the source's color space, alpha mode and component type.
///
/// # Panics
///
/// Panics if `dst_w` or `dst_h` is zero.
///
/// # Example
///
/// ```rust
/// use raster_core::{AlphaMode, ColorSpace, Image};
/// use raster_ops::resize::{resize, Filter};
///
/// let src = Image::<u8>::new(64, 64, 4, ColorSpace::Srgb, AlphaMode::Postmultiplied);
/// let dst = resize(&src, 32, 32, Filter::Lanczos3);
/// assert_eq!((dst.width(), dst.height()), (32, 32));
/// assert_eq!(dst.color_space(), ColorSpace::Srgb);
/// ```
pub fn resize<T: Component>(image: &Image<T>, dst_w: u32, dst_h: u32, filter: Filter) -> Image<T> {
    assert!(
        dst_w > 0 && dst_h > 0,
        "resize target must be nonzero, got {dst_w}x{dst_h}"
    );
    if dst_w == image.width() && dst_h == image.height() {
        return image.clone();
    }

    let original_space = image.color_space();
    let original_alpha = image.alpha_mode();
    debug!(
        src_w = image.width(),
        src_h = image.height(),
        dst_w,
        dst_h,
        ?filter,
        "resize"
    );

    let mut working: Image<f32> = image.convert_format();
    if let Some(linear) = linear_counterpart(original_space) {
        debug!(from = ?original_space, to = ?linear, "resize: linearizing for filtering");
        working.convert_color_space(linear);
    }
    let restore_postmultiplied =
        original_alpha == AlphaMode::Postmultiplied && working.channels() >= 2;
    if restore_postmultiplied {
        debug!("resize: premultiplying for filtering");
        working.convert_alpha_mode(AlphaMode::Premultiplied);
    }

    let channels = working.channels() as usize;
    let src_w = working.width() as usize;
    let src_h = working.height() as usize;
    let temp = horizontal_pass(working.data(), src_w, src_h, channels, dst_w as usize, filter);

    let mut resized = Image::<f32>::new(
        dst_w,
        dst_h,
        working.channels(),
        working.color_space(),
        working.alpha_mode(),
    );
    vertical_pass(
        &temp,
        dst_w as usize,
        src_h,
        channels,
        dst_h as usize,
        filter,
        resized.data_mut(),
    );

    if restore_postmultiplied {
        resized.convert_alpha_mode(AlphaMode::Postmultiplied);
    }
    resized.convert_color_space(original_space);
    resized.convert_format()
}

/// Horizontal resample pass; `src_h` rows are independent.
fn horizontal_pass(
    src: &[f32],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    filter: Filter,
) -> Vec<f32> {
    let mut dst = vec![0.0f32; dst_w * src_h * channels];
    let scale = src_w as f32 / dst_w as f32;
    let support = filter.support() * scale.max(1.0);
    let src_row_len = src_w * channels;
    let dst_row_len = dst_w * channels;

    let process_row = |y: usize, row: &mut [f32]| {
        let src_row = &src[y * src_row_len..][..src_row_len];
        for x in 0..dst_w {
            // Map destination x to source x.
            let center = (x as f32 + 0.5) * scale - 0.5;
            let left = (center - support).floor().max(0.0) as usize;
            let right = ((center + support).ceil() as usize).min(src_w - 1);

            let out = &mut row[x * channels..][..channels];
            let mut weight_sum = 0.0f32;
            for sx in left..=right {
                let w = filter.weight((sx as f32 - center) / scale.max(1.0));
                weight_sum += w;
                for (acc, &v) in out.iter_mut().zip(&src_row[sx * channels..][..channels]) {
                    *acc += v * w;
                }
            }
            if weight_sum > 0.0 {
                for v in out.iter_mut() {
                    *v /= weight_sum;
                }
            }
        }
    };

    #[cfg(feature = "parallel")]
    dst.par_chunks_exact_mut(dst_row_len)
        .enumerate()
        .for_each(|(y, row)| process_row(y, row));
    #[cfg(not(feature = "parallel"))]
    for (y, row) in dst.chunks_exact_mut(dst_row_len).enumerate() {
        process_row(y, row);
    }

    dst
}

/// Vertical resample pass into a caller-provided zeroed buffer.
fn vertical_pass(
    src: &[f32],
    width: usize,
    src_h: usize,
    channels: usize,
    dst_h: usize,
    filter: Filter,
    dst: &mut [f32],
) {
    let scale = src_h as f32 / dst_h as f32;
    let support = filter.support() * scale.max(1.0);
    let row_len = width * channels;

    let process_row = |y: usize, row: &mut [f32]| {
        // Map destination y to source y.
        let center = (y as f32 + 0.5) * scale - 0.5;
        let top = (center - support).floor().max(0.0) as usize;
        let bottom = ((center + support).ceil() as usize).min(src_h - 1);

        let mut weight_sum = 0.0f32;
        for sy in top..=bottom {
            let w = filter.weight((sy as f32 - center) / scale.max(1.0));
            weight_sum += w;
            let src_row = &src[sy * row_len..][..row_len];
            for (acc, &v) in row.iter_mut().zip(src_row) {
                *acc += v * w;
            }
        }
        if weight_sum > 0.0 {
            for v in row.iter_mut() {
                *v /= weight_sum;
            }
        }
    };

    #[cfg(feature = "parallel")]
    dst.par_chunks_exact_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| process_row(y, row));
    #[cfg(not(feature = "parallel"))]
    for (y, row) in dst.chunks_exact_mut(row_len).enumerate() {
        process_row(y, row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use raster_core::{linear_to_srgb, srgb_to_linear};

    #[test]
    fn test_filter_weights() {
        assert_relative_eq!(Filter::Nearest.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Nearest.weight(0.6), 0.0);
        assert_relative_eq!(Filter::Bilinear.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Bilinear.weight(0.5), 0.5);
        assert_relative_eq!(Filter::Lanczos3.weight(0.0), 1.0);
        assert_relative_eq!(Filter::Lanczos3.weight(3.5), 0.0);
    }

    #[test]
    fn test_same_size_is_clone() {
        let img = Image::<f32>::new(4, 4, 3, ColorSpace::LinearSrgb, AlphaMode::None);
        let out = resize(&img, 4, 4, Filter::Bicubic);
        assert_eq!(out, img);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let img = Image::from_vec(
            vec![0.5f32; 8 * 8 * 3],
            8,
            8,
            3,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        for filter in [Filter::Bilinear, Filter::Bicubic, Filter::Lanczos3] {
            let out = resize(&img, 16, 16, filter);
            for &v in out.data() {
                assert_relative_eq!(v, 0.5, epsilon = 1e-4);
            }
            let out = resize(&img, 3, 5, filter);
            for &v in out.data() {
                assert_relative_eq!(v, 0.5, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_metadata_restored() {
        let img = Image::<u8>::new(16, 16, 4, ColorSpace::Srgb, AlphaMode::Postmultiplied);
        let out = resize(&img, 8, 8, Filter::Bilinear);
        assert_eq!(out.color_space(), ColorSpace::Srgb);
        assert_eq!(out.alpha_mode(), AlphaMode::Postmultiplied);
        assert_eq!(out.channels(), 4);
    }

    #[test]
    fn test_srgb_downscale_averages_in_linear_light() {
        // A 2x1 sRGB checker of 0.0 and 1.0 downscaled to 1x1 must yield
        // the sRGB encoding of linear 0.5, not the value 0.5.
        let img = Image::from_vec(
            vec![0.0f32, 1.0],
            2,
            1,
            1,
            ColorSpace::Srgb,
            AlphaMode::None,
        )
        .unwrap();
        let out = resize(&img, 1, 1, Filter::Bilinear);
        let expected = linear_to_srgb((srgb_to_linear(0.0) + srgb_to_linear(1.0)) / 2.0);
        assert_relative_eq!(out.pixel_channel(0, 0, 0), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_transparent_texels_do_not_bleed_color() {
        // A red opaque texel next to a green fully transparent texel: the
        // downscaled pixel must stay pure red once unpremultiplied.
        let img = Image::from_vec(
            vec![1.0f32, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0],
            2,
            1,
            4,
            ColorSpace::LinearSrgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        let out = resize(&img, 1, 1, Filter::Bilinear);
        assert_relative_eq!(out.pixel_channel(0, 0, 1), 0.0, epsilon = 1e-6);
        assert_relative_eq!(out.pixel_channel(0, 0, 3), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_undefined_filters_as_stored() {
        let img = Image::from_vec(
            vec![0.0f32, 1.0],
            2,
            1,
            1,
            ColorSpace::Undefined,
            AlphaMode::None,
        )
        .unwrap();
        let out = resize(&img, 1, 1, Filter::Bilinear);
        assert_relative_eq!(out.pixel_channel(0, 0, 0), 0.5, epsilon = 1e-6);
        assert_eq!(out.color_space(), ColorSpace::Undefined);
    }

    #[test]
    #[should_panic(expected = "resize target must be nonzero")]
    fn test_zero_target_panics() {
        let img = Image::<f32>::new(4, 4, 1, ColorSpace::LinearSrgb, AlphaMode::None);
        let _ = resize(&img, 0, 4, Filter::Bilinear);
    }

    #[test]
    fn test_downscale_exact_halving_is_tent_average() {
        let img = Image::from_vec(
            vec![0.0f32, 1.0, 0.0, 1.0],
            4,
            1,
            1,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        let out = resize(&img, 2, 1, Filter::Bilinear);
        // Tent weights [0.125, 0.375, 0.375, 0.125] over the clamped
        // neighborhood; both outputs land between the two source values.
        for &v in out.data() {
            assert!(v > 0.0 && v < 1.0);
        }
    }
}
