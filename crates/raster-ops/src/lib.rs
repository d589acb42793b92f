//! # raster-ops
//!
//! Sampling, resize and mip-chain generation for [`raster_core`] images.
//!
//! - **Sampling** - bilinear and bicubic point samples with per-axis wrap
//!   modes ([`sample`])
//! - **Resize** - separable filter kernel with a color-managed processing
//!   policy: linearize, premultiply, filter, restore ([`resize`])
//! - **Mip chains** - block-size-aware half-resolution pyramids ([`mip`])
//!
//! # Quick Start
//!
//! ```rust
//! use raster_core::{AlphaMode, ColorSpace, Image};
//! use raster_ops::{generate_mip_chain, resize, Filter};
//!
//! let base = Image::<u8>::new(256, 256, 4, ColorSpace::Srgb, AlphaMode::Postmultiplied);
//! let half = resize(&base, 128, 128, Filter::Lanczos3);
//! let chain = generate_mip_chain(&base, 4, None, Filter::Bilinear);
//! assert_eq!(chain.len(), 7); // 256 down to 4, whole 4x4 blocks throughout
//! ```
//!
//! # Features
//!
//! - `parallel` (default) - rayon row-parallel resize passes
//!
//! # Dependencies
//!
//! - [`raster-core`](raster_core) - image type, conversions
//! - [`thiserror`] - error derive
//! - [`tracing`] - debug events
//! - [`rayon`] - optional parallelism
//!
//! # Used By
//!
//! - `raster-tests` - cross-crate integration scenarios

pub mod error;
pub mod mip;
pub mod resize;
pub mod sample;

pub use error::{OpsError, Result};
pub use mip::generate_mip_chain;
pub use resize::{resize, Filter};
pub use sample::{sample_into, SampleFilter, WrapMode};
