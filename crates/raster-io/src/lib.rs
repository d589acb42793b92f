//! # raster-io
//!
//! Decoder/encoder backend contracts for [`raster_core`] images.
//!
//! This crate deliberately contains no real container-format parsers. It
//! defines what a backend looks like and how backends compose:
//!
//! - **Contracts** - object-safe [`PixelDecoder`] and [`PixelEncoder`]
//!   traits ([`traits`])
//! - **Metadata** - [`FileInfo`] probing and the [`DecodedImage`] tagged
//!   union over component types ([`info`])
//! - **Fallback** - [`DecoderChain`], ordered backends with
//!   log-and-continue semantics ([`chain`])
//! - **Raw codec** - a minimal uncompressed dump format that exercises the
//!   contracts in tests ([`raw`])
//!
//! # Quick Start
//!
//! ```rust
//! use raster_core::{AlphaMode, ColorSpace, Image};
//! use raster_io::{raw::RawCodec, DecoderChain, DecodedImage, PixelEncoder, SampleKind};
//!
//! let img = Image::<f32>::new(4, 4, 3, ColorSpace::LinearSrgb, AlphaMode::None);
//! let bytes = RawCodec.encode(&DecodedImage::F32(img))?;
//!
//! let mut chain = DecoderChain::new();
//! chain.register(Box::new(RawCodec));
//! let info = chain.probe(&bytes)?;
//! assert_eq!((info.width, info.height), (4, 4));
//! let decoded = chain.decode(&bytes, SampleKind::F32)?;
//! assert_eq!(decoded.kind(), SampleKind::F32);
//! # Ok::<(), raster_io::IoError>(())
//! ```
//!
//! # Dependencies
//!
//! - [`raster-core`](raster_core) - image type, color/alpha metadata
//! - [`half`] - `f16` sample support
//! - [`thiserror`] - error derive
//! - [`tracing`] - fallback-chain debug events
//! - [`byteorder`] - little-endian sample packing in the raw codec
//!
//! # Used By
//!
//! - `raster-tests` - cross-crate integration scenarios

pub mod chain;
pub mod error;
pub mod info;
pub mod raw;
pub mod traits;

pub use chain::DecoderChain;
pub use error::{IoError, Result};
pub use info::{DecodedImage, FileInfo, SampleKind};
pub use traits::{PixelDecoder, PixelEncoder};
