//! Image-level color-space and alpha-mode conversion.
//!
//! Both conversions rewrite pixel data in place (through copy-on-write) and
//! retag the metadata. The scalar rules live in [`crate::colorspace`] and
//! [`crate::luts`]; this module decides which channels they apply to, when a
//! gamut matrix is needed, and when the 8-bit lookup-table fast path can be
//! taken. The fast path and the generic path are bit-identical because the
//! tables are built from the same scalar code.
//!
//! Conversions into or out of [`ColorSpace::Undefined`] retag without
//! touching data: undefined means "assume the values are already correct".

use raster_math::{gamut_conversion_matrix, Mat3, Vec3};

use crate::alpha::{infer_alpha_mode, AlphaMode};
use crate::colorspace::{ColorSpace, CHROMATICITY_EPSILON};
use crate::component::Component;
use crate::image::Image;
use crate::luts;

impl<T: Component> Image<T> {
    /// Converts the pixel data to `target` and retags the image.
    ///
    /// Transfer conversion applies to every channel except a related alpha
    /// channel, which is always linear. When both spaces have colorimetric
    /// meaning and their gamuts differ, images with at least three channels
    /// additionally pass their first three channels through a
    /// Bradford-adapted gamut matrix in linear light.
    ///
    /// Premultiplied data converts correctly as stored: premultiplication is
    /// defined in linear light, and both the transfer decode/encode and the
    /// gamut matrix commute with a linear-space alpha scale.
    pub fn convert_color_space(&mut self, target: ColorSpace) {
        let source = self.color_space();
        if source == target {
            self.reinterpret_color_space(target);
            return;
        }
        if matches!(source.canonical(), ColorSpace::Undefined)
            || matches!(target.canonical(), ColorSpace::Undefined)
        {
            self.reinterpret_color_space(target);
            return;
        }

        let color_channels = if self.has_related_alpha() {
            self.channels() - 1
        } else {
            self.channels()
        } as usize;
        let gamut = gamut_matrix(source, target, color_channels);

        if gamut.is_none() && self.apply_transfer_lut_u8(source, target, color_channels) {
            self.reinterpret_color_space(target);
            return;
        }

        let stride = self.channels() as usize;
        let data = self.data_mut();
        match gamut {
            Some(matrix) => {
                for pixel in data.chunks_exact_mut(stride) {
                    let rgb = Vec3::new(
                        source.to_linear(pixel[0].to_f32()),
                        source.to_linear(pixel[1].to_f32()),
                        source.to_linear(pixel[2].to_f32()),
                    );
                    let rgb = matrix.transform(rgb);
                    pixel[0] = T::from_f32(target.from_linear(rgb.x));
                    pixel[1] = T::from_f32(target.from_linear(rgb.y));
                    pixel[2] = T::from_f32(target.from_linear(rgb.z));
                    for v in &mut pixel[3..color_channels] {
                        *v = T::from_f32(target.from_linear(source.to_linear(v.to_f32())));
                    }
                }
            }
            None => {
                for pixel in data.chunks_exact_mut(stride) {
                    for v in &mut pixel[..color_channels] {
                        *v = T::from_f32(target.from_linear(source.to_linear(v.to_f32())));
                    }
                }
            }
        }
        self.reinterpret_color_space(target);
    }

    /// Converts the pixel data to the `target` alpha relationship.
    ///
    /// - `Premultiplied` <-> `Postmultiplied` multiplies or divides color
    ///   channels by alpha in linear light.
    /// - Conversions involving [`AlphaMode::None`] retag only; there is no
    ///   defined relationship to add or remove.
    /// - [`AlphaMode::Inferred`] resolves against the current data and
    ///   retags; the data is by definition already in the inferred mode.
    ///
    /// Images without an alpha channel retag only.
    pub fn convert_alpha_mode(&mut self, target: AlphaMode) {
        let target = match target {
            AlphaMode::Inferred => {
                let inferred =
                    infer_alpha_mode(self.data(), self.channels(), self.color_space());
                self.reinterpret_alpha_mode(inferred);
                return;
            }
            concrete => concrete,
        };
        let source = self.alpha_mode();
        if source == target
            || source == AlphaMode::None
            || target == AlphaMode::None
            || self.channels() < 2
        {
            self.reinterpret_alpha_mode(target);
            return;
        }

        let premultiply = target == AlphaMode::Premultiplied;
        if !self.apply_alpha_lut_u8(premultiply) {
            let color_space = self.color_space();
            let stride = self.channels() as usize;
            let alpha_index = stride - 1;
            for pixel in self.data_mut().chunks_exact_mut(stride) {
                let alpha = pixel[alpha_index].to_f32();
                for v in &mut pixel[..alpha_index] {
                    let c = v.to_f32();
                    let c = if premultiply {
                        luts::premultiply_scalar(c, alpha, color_space)
                    } else {
                        luts::unpremultiply_scalar(c, alpha, color_space)
                    };
                    *v = T::from_f32(c);
                }
            }
        }
        self.reinterpret_alpha_mode(target);
    }

    /// Runs the 1D transfer table over the color channels if the component
    /// type is `u8` and a table exists for this pair. Returns whether it ran.
    fn apply_transfer_lut_u8(
        &mut self,
        source: ColorSpace,
        target: ColorSpace,
        color_channels: usize,
    ) -> bool {
        let Some(lut) = luts::transfer_lut_u8(source, target) else {
            return false;
        };
        let stride = self.channels() as usize;
        let Some(bytes) = T::as_u8_slice_mut(self.data_mut()) else {
            return false;
        };
        for pixel in bytes.chunks_exact_mut(stride) {
            for v in &mut pixel[..color_channels] {
                *v = lut[*v as usize];
            }
        }
        true
    }

    /// Runs the 2D alpha table if the component type is `u8` and a table
    /// exists for this color space. Returns whether it ran.
    fn apply_alpha_lut_u8(&mut self, premultiply: bool) -> bool {
        let lut = if premultiply {
            luts::premultiply_lut_u8(self.color_space())
        } else {
            luts::unpremultiply_lut_u8(self.color_space())
        };
        let Some(lut) = lut else {
            return false;
        };
        let stride = self.channels() as usize;
        let alpha_index = stride - 1;
        let Some(bytes) = T::as_u8_slice_mut(self.data_mut()) else {
            return false;
        };
        for pixel in bytes.chunks_exact_mut(stride) {
            let row = &lut[pixel[alpha_index] as usize];
            for v in &mut pixel[..alpha_index] {
                *v = row[*v as usize];
            }
        }
        true
    }
}

/// The gamut matrix between two spaces, if one is needed and applicable.
/// Requires three color channels to interpret as RGB.
fn gamut_matrix(source: ColorSpace, target: ColorSpace, color_channels: usize) -> Option<Mat3> {
    if color_channels < 3 {
        return None;
    }
    let from = source.chromaticities()?;
    let to = target.chromaticities()?;
    if from.approx_eq(&to, CHROMATICITY_EPSILON) {
        return None;
    }
    Some(gamut_conversion_matrix(&from, &to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorspace::{linear_to_srgb, srgb_to_linear, TransferFunction};
    use approx::assert_relative_eq;
    use raster_math::ACES_AP1;

    fn srgb_image(data: Vec<f32>, channels: u32) -> Image<f32> {
        let pixels = data.len() as u32 / channels;
        Image::from_vec(data, pixels, 1, channels, ColorSpace::Srgb, AlphaMode::None).unwrap()
    }

    #[test]
    fn test_srgb_to_linear_conversion() {
        let mut img = srgb_image(vec![0.5, 0.25, 1.0], 3);
        img.convert_color_space(ColorSpace::LinearSrgb);
        assert_eq!(img.color_space(), ColorSpace::LinearSrgb);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), srgb_to_linear(0.5));
        assert_relative_eq!(img.pixel_channel(0, 0, 1), srgb_to_linear(0.25));
        assert_relative_eq!(img.pixel_channel(0, 0, 2), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_equal_spaces_is_identity() {
        let cie = ColorSpace::Cie {
            chromaticities: raster_math::SRGB,
            transfer: TransferFunction::Srgb,
        };
        let mut img = srgb_image(vec![0.5, 0.25, 1.0], 3);
        let original = img.clone();
        img.convert_color_space(cie);
        // Canonically equal target: data must be untouched (still shared).
        assert!(img.is_shared());
        assert_eq!(img.data(), original.data());
    }

    #[test]
    fn test_undefined_retags_without_touching_data() {
        let mut img = srgb_image(vec![0.5, 0.25, 1.0], 3);
        let original = img.clone();
        img.convert_color_space(ColorSpace::Undefined);
        assert_eq!(img.data(), original.data());
        img.convert_color_space(ColorSpace::LinearSrgb);
        assert_eq!(img.data(), original.data());
        assert_eq!(img.color_space(), ColorSpace::LinearSrgb);
    }

    #[test]
    fn test_alpha_channel_not_transfer_converted() {
        let mut img = Image::from_vec(
            vec![0.5f32, 0.5, 0.5, 0.5],
            1,
            1,
            4,
            ColorSpace::Srgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        img.convert_color_space(ColorSpace::LinearSrgb);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), srgb_to_linear(0.5));
        // Alpha is linear in both spaces and stays put.
        assert_eq!(img.pixel_channel(0, 0, 3), 0.5);
    }

    #[test]
    fn test_gamut_conversion_preserves_white_and_gray() {
        let acescg = ColorSpace::Cie {
            chromaticities: ACES_AP1,
            transfer: TransferFunction::Linear,
        };
        let mut img = Image::from_vec(
            vec![1.0f32, 1.0, 1.0, 0.18, 0.18, 0.18],
            2,
            1,
            3,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        img.convert_color_space(acescg);
        // Neutral axis maps to the neutral axis under chromatic adaptation.
        for c in 0..3 {
            assert_relative_eq!(img.pixel_channel(0, 0, c), 1.0, epsilon = 1e-3);
            assert_relative_eq!(img.pixel_channel(1, 0, c), 0.18, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_gamut_roundtrip() {
        let acescg = ColorSpace::Cie {
            chromaticities: ACES_AP1,
            transfer: TransferFunction::Linear,
        };
        let mut img = Image::from_vec(
            vec![0.8f32, 0.2, 0.4],
            1,
            1,
            3,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        img.convert_color_space(acescg);
        img.convert_color_space(ColorSpace::LinearSrgb);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), 0.8, epsilon = 1e-4);
        assert_relative_eq!(img.pixel_channel(0, 0, 1), 0.2, epsilon = 1e-4);
        assert_relative_eq!(img.pixel_channel(0, 0, 2), 0.4, epsilon = 1e-4);
    }

    #[test]
    fn test_u8_transfer_lut_matches_generic_path() {
        let data: Vec<u8> = (0..=255).collect();
        let mut fast = Image::from_vec(
            data.clone(),
            256,
            1,
            1,
            ColorSpace::Srgb,
            AlphaMode::None,
        )
        .unwrap();
        fast.convert_color_space(ColorSpace::LinearSrgb);
        for (i, &v) in data.iter().enumerate() {
            let expected = u8::from_f32(srgb_to_linear(v.to_f32()));
            assert_eq!(fast.data()[i], expected);
        }
    }

    #[test]
    fn test_premultiply_postmultiply_roundtrip_f32() {
        let mut img = Image::from_vec(
            vec![0.8f32, 0.4, 0.2, 0.5],
            1,
            1,
            4,
            ColorSpace::LinearSrgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        img.convert_alpha_mode(AlphaMode::Premultiplied);
        assert_eq!(img.alpha_mode(), AlphaMode::Premultiplied);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), 0.4);
        assert_eq!(img.pixel_channel(0, 0, 3), 0.5);

        img.convert_alpha_mode(AlphaMode::Postmultiplied);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), 0.8, epsilon = 1e-6);
        assert_relative_eq!(img.pixel_channel(0, 0, 2), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_premultiply_happens_in_linear_light() {
        let mut img = Image::from_vec(
            vec![0.5f32, 0.5, 0.5, 0.5],
            1,
            1,
            4,
            ColorSpace::Srgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        img.convert_alpha_mode(AlphaMode::Premultiplied);
        let expected = linear_to_srgb(srgb_to_linear(0.5) * 0.5);
        assert_relative_eq!(img.pixel_channel(0, 0, 0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_u8_alpha_lut_matches_scalar() {
        let mut img = Image::from_vec(
            vec![200u8, 100, 50, 128],
            1,
            1,
            4,
            ColorSpace::Srgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        img.convert_alpha_mode(AlphaMode::Premultiplied);
        for (channel, &original) in [200u8, 100, 50].iter().enumerate() {
            let expected = u8::from_f32(luts::premultiply_scalar(
                original.to_f32(),
                (128u8).to_f32(),
                ColorSpace::Srgb,
            ));
            assert_eq!(img.pixel_channel(0, 0, channel as u32), expected);
        }
        assert_eq!(img.pixel_channel(0, 0, 3), 128);
    }

    #[test]
    fn test_alpha_none_retags_only() {
        let mut img = Image::from_vec(
            vec![0.8f32, 0.4, 0.2, 0.5],
            1,
            1,
            4,
            ColorSpace::LinearSrgb,
            AlphaMode::None,
        )
        .unwrap();
        let original = img.clone();
        img.convert_alpha_mode(AlphaMode::Premultiplied);
        assert_eq!(img.alpha_mode(), AlphaMode::Premultiplied);
        assert_eq!(img.data(), original.data());
    }

    #[test]
    fn test_convert_to_inferred_resolves_and_retags() {
        let mut img = Image::from_vec(
            vec![1.0f32, 0.0, 0.0, 0.5],
            1,
            1,
            4,
            ColorSpace::LinearSrgb,
            AlphaMode::Postmultiplied,
        )
        .unwrap();
        let original = img.clone();
        img.convert_alpha_mode(AlphaMode::Inferred);
        assert_eq!(img.alpha_mode(), AlphaMode::Postmultiplied);
        assert_eq!(img.data(), original.data());
    }
}
