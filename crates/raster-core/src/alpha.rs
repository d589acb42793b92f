//! Alpha-mode metadata and inference.
//!
//! An image's alpha mode records whether color channels have been multiplied
//! by alpha. [`AlphaMode::Inferred`] is a transient request, not a storable
//! state: passing it to a constructor resolves it against the pixel data
//! before the image exists, so every constructed image carries a concrete
//! mode.

use crate::colorspace::ColorSpace;
use crate::component::Component;

/// How the color channels relate to the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaMode {
    /// No alpha channel, or alpha carries unrelated data.
    None,
    /// Color channels are stored multiplied by alpha.
    Premultiplied,
    /// Color channels are stored independent of alpha (straight alpha).
    Postmultiplied,
    /// Transient request: scan the pixel data to decide between
    /// premultiplied and postmultiplied. Never stored on an image.
    Inferred,
}

impl AlphaMode {
    /// Whether this is a concrete, storable mode.
    #[inline]
    pub fn is_concrete(self) -> bool {
        !matches!(self, AlphaMode::Inferred)
    }
}

/// Resolves [`AlphaMode::Inferred`] against interleaved pixel data.
///
/// Premultiplied color can never exceed its alpha in linear light, so any
/// pixel violating that bound is evidence of postmultiplied storage. The
/// bound `to_linear(c) <= a` is checked in the encoded domain as
/// `c <= from_linear(a)`, where fixed-point quantization is uniform and a
/// slack of 1.5 steps covers premultiplied data rounded on storage. Alpha
/// itself is stored linear and is encoded once per pixel for the comparison.
/// Data consistent with both interpretations (e.g. fully opaque, or all
/// black) resolves to premultiplied, which makes the two coincide.
///
/// # Panics
///
/// Panics if `channels < 2` (there is no alpha channel to infer against).
pub fn infer_alpha_mode<T: Component>(
    data: &[T],
    channels: u32,
    color_space: ColorSpace,
) -> AlphaMode {
    assert!(
        channels >= 2,
        "cannot infer alpha mode without an alpha channel (channels = {channels})"
    );
    let stride = channels as usize;
    let alpha_index = stride - 1;
    // Slack in encoded units, where fixed-point steps are uniform.
    let epsilon = if T::IS_FLOAT {
        1e-6
    } else {
        1.5 / ((1u64 << T::BITS) - 1) as f32
    };
    for pixel in data.chunks_exact(stride) {
        let alpha_encoded = color_space.from_linear(pixel[alpha_index].to_f32());
        for &c in &pixel[..alpha_index] {
            if c.to_f32() > alpha_encoded + epsilon {
                return AlphaMode::Postmultiplied;
            }
        }
    }
    AlphaMode::Premultiplied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_postmultiplied_when_color_exceeds_alpha() {
        // Color 1.0 with alpha 0.5 cannot be premultiplied.
        let data = [1.0f32, 0.25, 0.0, 0.5];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::LinearSrgb),
            AlphaMode::Postmultiplied
        );
    }

    #[test]
    fn test_infer_premultiplied_when_consistent() {
        let data = [0.25f32, 0.1, 0.0, 0.5, 0.5, 0.5, 0.5, 1.0];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::LinearSrgb),
            AlphaMode::Premultiplied
        );
    }

    #[test]
    fn test_infer_opaque_resolves_to_premultiplied() {
        // Fully opaque data is identical under both modes.
        let data = [0.9f32, 0.3, 0.7, 1.0];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::LinearSrgb),
            AlphaMode::Premultiplied
        );
    }

    #[test]
    fn test_infer_accounts_for_transfer() {
        // Encoded 0.7 exceeds the raw alpha value 0.6, but in linear light
        // 0.7 decodes to ~0.448 <= 0.6, so the data is premultiplied.
        let data = [0.7f32, 0.7, 0.7, 0.6];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::Srgb),
            AlphaMode::Premultiplied
        );
    }

    #[test]
    fn test_infer_near_white_u8_srgb_premultiplied() {
        // 253/255 encoded decodes to ~0.982 linear against alpha ~0.980.
        // One encoded step near white spans ~0.009 in linear light, so a
        // linear-domain slack would misread this as postmultiplied; the
        // encoded-domain comparison keeps it within quantization slack.
        let data = [253u8, 253, 253, 250];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::Srgb),
            AlphaMode::Premultiplied
        );
    }

    #[test]
    fn test_infer_fixed_point_slack() {
        // 129/255 vs alpha 128/255 is within one quantization step.
        let data = [129u8, 0, 0, 128];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::LinearSrgb),
            AlphaMode::Premultiplied
        );
        let data = [200u8, 0, 0, 128];
        assert_eq!(
            infer_alpha_mode(&data, 4, ColorSpace::LinearSrgb),
            AlphaMode::Postmultiplied
        );
    }

    #[test]
    #[should_panic(expected = "cannot infer alpha mode")]
    fn test_infer_panics_without_alpha_channel() {
        let data = [0.5f32, 0.5];
        infer_alpha_mode(&data, 1, ColorSpace::LinearSrgb);
    }
}
