//! Mip-chain generation.
//!
//! A mip chain is the base image followed by successively half-sized levels.
//! The base level is included unmodified; each following level halves both
//! dimensions via [`resize`]. Generation stops before producing a level that
//! would drop below the block size or stop being a block-size multiple
//! (compressed-texture encoders need whole blocks), or when the requested
//! level count is reached, whichever comes first.

use raster_core::{Component, Image};
use tracing::debug;

use crate::resize::{resize, Filter};

/// Generates a mip chain for `image`.
///
/// `block_size` is the texel granularity every level must respect (1 for
/// uncompressed use). `max_levels` caps the chain length including the base
/// level; `None` means no cap.
///
/// # Panics
///
/// Panics if `block_size` is zero.
///
/// # Example
///
/// ```rust
/// use raster_core::{AlphaMode, ColorSpace, Image};
/// use raster_ops::mip::generate_mip_chain;
/// use raster_ops::resize::Filter;
///
/// let base = Image::<u8>::new(16, 16, 4, ColorSpace::Srgb, AlphaMode::Postmultiplied);
/// let chain = generate_mip_chain(&base, 4, None, Filter::Bilinear);
/// // 16 -> 8 -> 4; a 2x2 level would no longer hold a whole 4x4 block.
/// assert_eq!(chain.len(), 3);
/// ```
pub fn generate_mip_chain<T: Component>(
    image: &Image<T>,
    block_size: u32,
    max_levels: Option<u32>,
    filter: Filter,
) -> Vec<Image<T>> {
    assert!(block_size > 0, "block size must be nonzero");

    let mut levels = vec![image.clone()];
    let mut width = image.width();
    let mut height = image.height();

    loop {
        if max_levels.is_some_and(|max| levels.len() as u32 >= max) {
            break;
        }
        let next_w = width / 2;
        let next_h = height / 2;
        if next_w < block_size
            || next_h < block_size
            || next_w % block_size != 0
            || next_h % block_size != 0
        {
            break;
        }
        debug!(level = levels.len(), next_w, next_h, "mip chain: generating level");
        let next = resize(&levels[levels.len() - 1], next_w, next_h, filter);
        levels.push(next);
        width = next_w;
        height = next_h;
    }

    levels
}
