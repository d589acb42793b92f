//! Backend contracts for pluggable decoders and encoders.
//!
//! A backend wraps one container format. Both traits are object safe so
//! backends can live behind `Box<dyn ...>` in registries and fallback
//! chains; they take byte slices rather than readers so probing never
//! consumes input.
//!
//! Format requirements on the *content* (a format that only stores
//! premultiplied alpha, or only sRGB) are not enforced here: callers convert
//! with the core operations before encoding.

use crate::error::Result;
use crate::info::{DecodedImage, FileInfo, SampleKind};

/// A decoding backend for one container format.
pub trait PixelDecoder: Send + Sync {
    /// Short backend name for diagnostics ("raw", "exr", ...).
    fn name(&self) -> &str;

    /// Cheap header sniff: whether the leading bytes look like this format.
    /// Must not allocate or scan past the header.
    fn can_decode(&self, header: &[u8]) -> bool;

    /// Reads file metadata without decoding pixel data.
    fn probe(&self, bytes: &[u8]) -> Result<FileInfo>;

    /// Decodes the pixel data, delivering components as `kind`.
    ///
    /// Backends decode in the file's native component type and convert;
    /// requesting the native kind is lossless.
    fn decode(&self, bytes: &[u8], kind: SampleKind) -> Result<DecodedImage>;
}

/// An encoding backend for one container format.
pub trait PixelEncoder: Send + Sync {
    /// Short backend name for diagnostics.
    fn name(&self) -> &str;

    /// Encodes the image into the backend's container format.
    fn encode(&self, image: &DecodedImage) -> Result<Vec<u8>>;
}
