//! # raster-core
//!
//! Copy-on-write pixel buffers with runtime color-space and alpha-mode
//! metadata.
//!
//! This crate provides the central [`Image`] type and everything it needs:
//!
//! - **Storage** - page-aligned, heap, custom-allocator and borrowed blocks
//!   behind one ownership tag ([`alloc`])
//! - **Components** - `u8`/`u16`/`i8`/`i16`/`f16`/`f32` with exact
//!   unorm/snorm conversion rules ([`component`])
//! - **Color spaces** - a runtime model with canonicalized equality and
//!   scalar transfer functions ([`colorspace`])
//! - **Alpha modes** - premultiplied/postmultiplied metadata, inference,
//!   and conversion ([`alpha`], [`convert`])
//! - **Lookup tables** - lazily built 8-bit fast paths that are
//!   bit-identical to the scalar math ([`luts`])
//!
//! # Architecture
//!
//! ```text
//!   raster-ops   raster-io
//!        |           |
//!        +-----+-----+
//!              |
//!         raster-core
//!              |
//!         raster-math
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use raster_core::{AlphaMode, ColorSpace, Image};
//!
//! let mut img = Image::<u8>::from_vec(
//!     vec![200, 100, 50, 128],
//!     1, 1, 4,
//!     ColorSpace::Srgb,
//!     AlphaMode::Postmultiplied,
//! )?;
//!
//! // Premultiplication happens in linear light, via an 8-bit table.
//! img.convert_alpha_mode(AlphaMode::Premultiplied);
//!
//! // Clones share storage; the first write through either side copies.
//! let thumbnail_source = img.clone();
//! # Ok::<(), raster_core::Error>(())
//! ```
//!
//! # Dependencies
//!
//! - [`raster-math`](raster_math) - chromaticities, matrices, chromatic
//!   adaptation
//! - [`half`] - `f16` component support
//! - [`thiserror`] - error derive
//!
//! # Used By
//!
//! - `raster-ops` - sampling, resize, mip generation
//! - `raster-io` - decoder/encoder backend contracts

pub mod alloc;
pub mod alpha;
pub mod colorspace;
pub mod component;
pub mod convert;
pub mod error;
pub mod image;
pub mod luts;

pub use alloc::{AllocatorTag, Storage, StorageAllocator, PAGE_SIZE};
pub use alpha::{infer_alpha_mode, AlphaMode};
pub use colorspace::{
    convert_scalar, linear_to_srgb, srgb_to_linear, ColorSpace, TransferFunction,
    CHROMATICITY_EPSILON,
};
pub use component::Component;
pub use error::{Error, Result};
pub use image::Image;
